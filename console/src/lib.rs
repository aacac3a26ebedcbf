//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Termdesk Console Library
//!
//! An embedded operator console reachable over telnet on the loopback
//! interface. The host registers commands, starts the listener, and
//! operators connect with any telnet client to run them with line editing,
//! shared history and repeat-last-command.

pub mod command;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod history;
pub mod session;
pub mod telnet;
pub mod tokenizer;

// Re-export commonly used types
pub use command::{CommandHandler, CommandOutput, CommandRegistry};
pub use context::ConsoleContext;
pub use error::{ConsoleError, ConsoleResult};
pub use telnet::{ConsoleHandle, ConsoleServer};
