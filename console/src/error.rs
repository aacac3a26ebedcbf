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

//! Console error types

use thiserror::Error;

/// Errors raised by the console listener, sessions and registry.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Socket or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line reached the scratch cap without a terminator.
    #[error("Line exceeded {limit} bytes without a terminator")]
    LineTooLong { limit: usize },

    /// A command was registered with `min_args > max_args`.
    #[error("Invalid arity for command {name}: min {min_args} > max {max_args}")]
    InvalidArity {
        name: String,
        min_args: usize,
        max_args: usize,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
