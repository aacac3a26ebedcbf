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

use crate::command::CommandRegistry;
use crate::command::builtin::register_builtins;
use crate::dispatcher::Dispatcher;
use crate::error::ConsoleResult;
use crate::history::{HistoryBuffer, SharedHistory};
use crate::session::manager::SessionManager;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Console context containing state shared by every session
///
/// History and the last-command slot are global. All operators browse one
/// history, and an empty line replays the last repeatable command issued
/// from any session.
#[derive(Clone)]
pub struct ConsoleContext {
    /// Dispatcher holding the registry and last-command slot
    pub dispatcher: Arc<Dispatcher>,

    /// Command history shared by every session
    pub history: SharedHistory,

    /// Open session tracking
    pub session_manager: Arc<SessionManager>,
}

impl ConsoleContext {
    /// Create a context around a registry as-is
    pub fn new(registry: CommandRegistry) -> Self {
        Self::assemble(
            registry,
            Arc::new(Mutex::new(HistoryBuffer::new())),
            Arc::new(SessionManager::new()),
        )
    }

    /// Create a context after adding the built-in commands to `registry`
    pub fn with_builtins(mut registry: CommandRegistry) -> ConsoleResult<Self> {
        let history: SharedHistory = Arc::new(Mutex::new(HistoryBuffer::new()));
        let session_manager = Arc::new(SessionManager::new());
        register_builtins(&mut registry, history.clone(), session_manager.clone())?;
        Ok(Self::assemble(registry, history, session_manager))
    }

    fn assemble(
        registry: CommandRegistry,
        history: SharedHistory,
        session_manager: Arc<SessionManager>,
    ) -> Self {
        tracing::debug!("Console registry holds {} command(s)", registry.len());
        Self {
            dispatcher: Arc::new(Dispatcher::new(Arc::new(registry))),
            history,
            session_manager,
        }
    }

    /// Get the dispatcher
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Get the shared history
    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    /// Get the session manager
    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.session_manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;

    #[test]
    fn test_new_keeps_registry_untouched() {
        let mut registry = CommandRegistry::new();
        registry
            .register("ping", 1, 1, false, |_: &[String]| CommandOutput::ok("pong"))
            .unwrap();
        let context = ConsoleContext::new(registry);

        assert_eq!(context.dispatcher().registry().len(), 1);
    }

    #[test]
    fn test_with_builtins_adds_commands() {
        let context = ConsoleContext::with_builtins(CommandRegistry::new()).unwrap();
        let registry = context.dispatcher().registry();
        assert!(registry.contains("help"));
        assert!(registry.contains("history"));
    }

    #[tokio::test]
    async fn test_clones_share_history() {
        let context = ConsoleContext::new(CommandRegistry::new());
        let other = context.clone();

        context.history().lock().await.push("status");
        assert_eq!(other.history().lock().await.len(), 1);
    }
}
