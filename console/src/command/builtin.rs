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

//! Built-in console commands
//!
//! Registered after the host's own commands; a host command with the same
//! name wins.

use crate::command::{CommandHandler, CommandOutput, CommandRegistry};
use crate::error::ConsoleResult;
use crate::history::SharedHistory;
use crate::session::manager::SessionManager;
use async_trait::async_trait;
use std::sync::Arc;

/// Register `echo`, `history`, `sessions` and `help` unless the host already
/// claimed the name. `help` goes last so its listing covers everything.
pub fn register_builtins(
    registry: &mut CommandRegistry,
    history: SharedHistory,
    sessions: Arc<SessionManager>,
) -> ConsoleResult<()> {
    if !registry.contains("echo") {
        registry.register("echo", 64, 1, true, |args: &[String]| {
            CommandOutput::ok(args[1..].join(" "))
        })?;
    }
    if !registry.contains("history") {
        registry.register("history", 1, 1, false, HistoryCommand { history })?;
    }
    if !registry.contains("sessions") {
        registry.register("sessions", 1, 1, true, SessionsCommand { sessions })?;
    }
    if !registry.contains("help") {
        let help = HelpCommand::from_registry(registry);
        registry.register("help", 2, 1, false, help)?;
    }
    Ok(())
}

/// Lists commands or describes one
pub struct HelpCommand {
    entries: Vec<HelpEntry>,
}

struct HelpEntry {
    name: String,
    min_args: usize,
    max_args: usize,
    repeatable: bool,
}

impl HelpCommand {
    /// Snapshot the registry; `help` itself is always included.
    pub fn from_registry(registry: &CommandRegistry) -> Self {
        let mut entries: Vec<HelpEntry> = registry
            .descriptors()
            .iter()
            .filter(|d| d.name() != "help")
            .map(|d| HelpEntry {
                name: d.name().to_string(),
                min_args: d.min_args(),
                max_args: d.max_args(),
                repeatable: d.repeatable(),
            })
            .collect();
        entries.push(HelpEntry {
            name: "help".to_string(),
            min_args: 1,
            max_args: 2,
            repeatable: false,
        });
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    fn describe(entry: &HelpEntry) -> String {
        format!(
            "  {:<16} {} - {} args{}",
            entry.name,
            entry.min_args,
            entry.max_args,
            if entry.repeatable { ", repeatable" } else { "" }
        )
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn invoke(&self, args: &[String]) -> CommandOutput {
        if let Some(topic) = args.get(1) {
            return match self.entries.iter().find(|e| &e.name == topic) {
                Some(entry) => CommandOutput::ok(Self::describe(entry)),
                None => CommandOutput::ok(format!("No help for {}", topic)),
            };
        }

        let mut lines = vec!["Commands (argument counts include the name):".to_string()];
        lines.extend(self.entries.iter().map(Self::describe));
        lines.push("  exit, quit, bye  close the console".to_string());
        CommandOutput::ok(lines.join("\r\n"))
    }
}

/// Prints the shared command history
pub struct HistoryCommand {
    history: SharedHistory,
}

#[async_trait]
impl CommandHandler for HistoryCommand {
    async fn invoke(&self, _args: &[String]) -> CommandOutput {
        let history = self.history.lock().await;
        if history.is_empty() {
            return CommandOutput::from("No history");
        }
        let lines: Vec<String> = history
            .entries()
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{:>4}  {}", i + 1, line))
            .collect();
        CommandOutput::ok(lines.join("\r\n"))
    }
}

/// Reports open console sessions
pub struct SessionsCommand {
    sessions: Arc<SessionManager>,
}

#[async_trait]
impl CommandHandler for SessionsCommand {
    async fn invoke(&self, _args: &[String]) -> CommandOutput {
        let sessions = self.sessions.list().await;
        let mut lines: Vec<String> = sessions
            .iter()
            .map(|s| {
                format!(
                    "  {} {} since {}",
                    s.id,
                    s.peer_addr,
                    s.connected_at.format("%Y-%m-%d %H:%M:%S")
                )
            })
            .collect();
        lines.push(format!("Total: {} session(s)", sessions.len()));
        CommandOutput::ok(lines.join("\r\n"))
    }
}
