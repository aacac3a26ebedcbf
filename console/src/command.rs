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

//! Console command registry
//!
//! Commands are registered by the host process before the listener starts
//! and looked up by exact, case-sensitive name. Argument bounds count the
//! command name itself, so a command taking one parameter has
//! `min_args = max_args = 2`.

pub mod builtin;

use crate::error::{ConsoleError, ConsoleResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Response produced by a command handler
#[derive(Debug)]
pub struct CommandOutput {
    /// Text written back to the operator
    pub text: String,
    /// Advisory failure, logged but never shown beyond `text`
    pub failure: Option<anyhow::Error>,
}

impl CommandOutput {
    /// Successful response
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failure: None,
        }
    }

    /// Response carrying a failure for the logs
    pub fn failed(text: impl Into<String>, failure: impl Into<anyhow::Error>) -> Self {
        Self {
            text: text.into(),
            failure: Some(failure.into()),
        }
    }
}

impl From<String> for CommandOutput {
    fn from(text: String) -> Self {
        Self::ok(text)
    }
}

impl From<&str> for CommandOutput {
    fn from(text: &str) -> Self {
        Self::ok(text)
    }
}

/// Executes a console command.
///
/// `args` is the full token list, command name first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn invoke(&self, args: &[String]) -> CommandOutput;
}

#[async_trait]
impl<F> CommandHandler for F
where
    F: Fn(&[String]) -> CommandOutput + Send + Sync,
{
    async fn invoke(&self, args: &[String]) -> CommandOutput {
        (self)(args)
    }
}

/// A registered command
pub struct CommandDescriptor {
    name: String,
    min_args: usize,
    max_args: usize,
    repeatable: bool,
    handler: Box<dyn CommandHandler>,
}

impl CommandDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_args(&self) -> usize {
        self.min_args
    }

    pub fn max_args(&self) -> usize {
        self.max_args
    }

    /// Whether an empty line replays this command
    pub fn repeatable(&self) -> bool {
        self.repeatable
    }

    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }

    /// Whether `count` tokens (name included) fall within the bounds
    pub fn accepts(&self, count: usize) -> bool {
        (self.min_args..=self.max_args).contains(&count)
    }
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .field("repeatable", &self.repeatable)
            .finish_non_exhaustive()
    }
}

/// Name to descriptor mapping, read-only once the listener runs
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<CommandDescriptor>>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any previous one with the same name.
    ///
    /// * `max_args` - maximum token count, command name included
    /// * `min_args` - minimum token count, command name included
    /// * `repeatable` - whether an empty line re-runs the command
    pub fn register<H>(
        &mut self,
        name: impl Into<String>,
        max_args: usize,
        min_args: usize,
        repeatable: bool,
        handler: H,
    ) -> ConsoleResult<()>
    where
        H: CommandHandler + 'static,
    {
        let name = name.into();
        if min_args > max_args {
            return Err(ConsoleError::InvalidArity {
                name,
                min_args,
                max_args,
            });
        }

        tracing::debug!(
            "Registering console command {} ({} - {} args, repeatable: {})",
            name,
            min_args,
            max_args,
            repeatable
        );
        let descriptor = CommandDescriptor {
            name: name.clone(),
            min_args,
            max_args,
            repeatable,
            handler: Box::new(handler),
        };
        if self.commands.insert(name, Arc::new(descriptor)).is_some() {
            tracing::warn!("Console command replaced by a later registration");
        }
        Ok(())
    }

    /// Look up a command by exact name
    pub fn get(&self, name: &str) -> Option<Arc<CommandDescriptor>> {
        self.commands.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered descriptors sorted by name
    pub fn descriptors(&self) -> Vec<Arc<CommandDescriptor>> {
        let mut descriptors: Vec<_> = self.commands.values().cloned().collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
