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

//! Command dispatch
//!
//! Validates a token list against the [`CommandRegistry`], runs the handler
//! and keeps the last repeatable command for empty-line replay. The
//! last-command slot is shared by every session, so one operator pressing
//! enter on an empty line replays whatever repeatable command any session
//! ran last.

use crate::command::{CommandDescriptor, CommandOutput, CommandRegistry};
use std::sync::Arc;
use tokio::sync::RwLock;

/// First tokens that end the session
pub const CLOSE_COMMANDS: [&str; 3] = ["exit", "quit", "bye"];

/// What the session should do with a dispatched line
#[derive(Debug)]
pub enum Dispatch {
    /// Write `text` (already CRLF terminated); log `failure` if present
    Reply {
        text: String,
        failure: Option<anyhow::Error>,
    },
    /// Nothing to write
    Silent,
    /// Close the connection without a response
    Close,
}

impl Dispatch {
    fn reply(text: String) -> Self {
        Dispatch::Reply {
            text,
            failure: None,
        }
    }

    fn from_output(output: CommandOutput) -> Self {
        Dispatch::Reply {
            text: format!("{}\r\n", output.text),
            failure: output.failure,
        }
    }
}

/// Most recent repeatable command and the tokens it ran with
#[derive(Debug, Clone)]
pub struct LastCommand {
    pub descriptor: Arc<CommandDescriptor>,
    pub args: Vec<String>,
}

/// Runs command lines against a registry
#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    last_command: RwLock<Option<LastCommand>>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            last_command: RwLock::new(None),
        }
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Snapshot of the replay slot
    pub async fn last_command(&self) -> Option<LastCommand> {
        self.last_command.read().await.clone()
    }

    /// Dispatch one tokenized line
    pub async fn dispatch(&self, tokens: &[String]) -> Dispatch {
        let Some(name) = tokens.first() else {
            return self.replay().await;
        };

        if CLOSE_COMMANDS.contains(&name.as_str()) {
            return Dispatch::Close;
        }

        let Some(descriptor) = self.registry.get(name) else {
            metrics::counter!("console.commands.dispatched", "outcome" => "not_found")
                .increment(1);
            return Dispatch::reply(format!("Not found term command {}\r\n", name));
        };

        if !descriptor.accepts(tokens.len()) {
            metrics::counter!("console.commands.dispatched", "outcome" => "bad_arity")
                .increment(1);
            return Dispatch::reply(format!(
                "Params of command {} should be {} - {}\r\n",
                descriptor.name(),
                descriptor.min_args(),
                descriptor.max_args()
            ));
        }

        tracing::debug!("Dispatching console command {}", descriptor.name());
        let output = descriptor.handler().invoke(tokens).await;
        Self::record(&output);

        {
            let mut last = self.last_command.write().await;
            *last = descriptor.repeatable().then(|| LastCommand {
                descriptor: Arc::clone(&descriptor),
                args: tokens.to_vec(),
            });
        }

        Dispatch::from_output(output)
    }

    /// Re-run the last repeatable command verbatim, without re-validation
    async fn replay(&self) -> Dispatch {
        let Some(last) = self.last_command().await else {
            return Dispatch::Silent;
        };

        tracing::debug!("Replaying console command {}", last.descriptor.name());
        let output = last.descriptor.handler().invoke(&last.args).await;
        Self::record(&output);
        Dispatch::from_output(output)
    }

    fn record(output: &CommandOutput) {
        let outcome = if output.failure.is_some() {
            metrics::counter!("console.commands.failed").increment(1);
            "failed"
        } else {
            "ok"
        };
        metrics::counter!("console.commands.dispatched", "outcome" => outcome).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MockCommandHandler;

    fn tokens(line: &[&str]) -> Vec<String> {
        line.iter().map(|t| t.to_string()).collect()
    }

    fn reply_text(dispatch: Dispatch) -> String {
        match dispatch {
            Dispatch::Reply { text, .. } => text,
            other => panic!("expected a reply, got {:?}", other),
        }
    }

    fn dispatcher_with(register: impl FnOnce(&mut CommandRegistry)) -> Dispatcher {
        let mut registry = CommandRegistry::new();
        register(&mut registry);
        Dispatcher::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let dispatcher = dispatcher_with(|_| {});
        let text = reply_text(dispatcher.dispatch(&tokens(&["frobnicate"])).await);
        assert_eq!(text, "Not found term command frobnicate\r\n");
    }

    #[tokio::test]
    async fn test_arity_bounds() {
        let dispatcher = dispatcher_with(|registry| {
            registry
                .register("set", 3, 1, false, |_: &[String]| CommandOutput::ok("done"))
                .unwrap();
        });

        let text = reply_text(dispatcher.dispatch(&tokens(&["set", "a", "b", "c"])).await);
        assert_eq!(text, "Params of command set should be 1 - 3\r\n");

        let text = reply_text(dispatcher.dispatch(&tokens(&["set", "a"])).await);
        assert_eq!(text, "done\r\n");
    }

    #[tokio::test]
    async fn test_close_commands() {
        let dispatcher = dispatcher_with(|_| {});
        for name in CLOSE_COMMANDS {
            assert!(matches!(
                dispatcher.dispatch(&tokens(&[name])).await,
                Dispatch::Close
            ));
        }
        // Arguments after the close word do not matter
        assert!(matches!(
            dispatcher.dispatch(&tokens(&["bye", "now"])).await,
            Dispatch::Close
        ));
    }

    #[tokio::test]
    async fn test_empty_line_without_history_is_silent() {
        let dispatcher = dispatcher_with(|_| {});
        assert!(matches!(dispatcher.dispatch(&[]).await, Dispatch::Silent));
    }

    #[tokio::test]
    async fn test_repeatable_command_is_replayed_verbatim() {
        let mut mock = MockCommandHandler::new();
        mock.expect_invoke()
            .withf(|args: &[String]| args == ["foo".to_string(), "1".to_string()])
            .times(2)
            .returning(|_| CommandOutput::ok("ran"));

        let dispatcher = dispatcher_with(|registry| {
            registry.register("foo", 2, 2, true, mock).unwrap();
        });

        let text = reply_text(dispatcher.dispatch(&tokens(&["foo", "1"])).await);
        assert_eq!(text, "ran\r\n");

        let text = reply_text(dispatcher.dispatch(&[]).await);
        assert_eq!(text, "ran\r\n");
    }

    #[tokio::test]
    async fn test_non_repeatable_command_clears_last() {
        let dispatcher = dispatcher_with(|registry| {
            registry
                .register("poll", 1, 1, true, |_: &[String]| CommandOutput::ok("polled"))
                .unwrap();
            registry
                .register("reset", 1, 1, false, |_: &[String]| CommandOutput::ok("reset"))
                .unwrap();
        });

        dispatcher.dispatch(&tokens(&["poll"])).await;
        assert!(dispatcher.last_command().await.is_some());

        dispatcher.dispatch(&tokens(&["reset"])).await;
        assert!(dispatcher.last_command().await.is_none());
        assert!(matches!(dispatcher.dispatch(&[]).await, Dispatch::Silent));
    }

    #[tokio::test]
    async fn test_rejected_lines_keep_last_command() {
        let dispatcher = dispatcher_with(|registry| {
            registry
                .register("poll", 1, 1, true, |_: &[String]| CommandOutput::ok("polled"))
                .unwrap();
        });

        dispatcher.dispatch(&tokens(&["poll"])).await;
        dispatcher.dispatch(&tokens(&["missing"])).await;
        dispatcher.dispatch(&tokens(&["poll", "extra"])).await;

        let last = dispatcher.last_command().await.expect("last command lost");
        assert_eq!(last.args, tokens(&["poll"]));
    }

    #[tokio::test]
    async fn test_handler_failure_is_advisory() {
        let dispatcher = dispatcher_with(|registry| {
            registry
                .register("sync", 1, 1, false, |_: &[String]| {
                    CommandOutput::failed("sync incomplete", anyhow::anyhow!("peer timeout"))
                })
                .unwrap();
        });

        match dispatcher.dispatch(&tokens(&["sync"])).await {
            Dispatch::Reply { text, failure } => {
                assert_eq!(text, "sync incomplete\r\n");
                assert_eq!(failure.unwrap().to_string(), "peer timeout");
            }
            other => panic!("expected a reply, got {:?}", other),
        }
    }
}
