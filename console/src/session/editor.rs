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

//! Byte-driven line editor
//!
//! [`LineEditor`] turns raw, possibly telnet-framed client bytes into
//! completed command lines. It never touches the socket: bytes that must be
//! echoed or rendered on the client accumulate in an outbox drained with
//! [`LineEditor::take_output`], and history browsing is requested from the
//! caller through [`Step::Recall`] so the editor stays independent of the
//! shared history lock.

use crate::error::{ConsoleError, ConsoleResult};
use crate::history::Direction;
use crate::telnet::protocol::{IAC, Verb, key, render_back_erase};

/// Maximum bytes consumed for a single line before it is rejected.
pub const SCRATCH_CAP: usize = 1000;

/// Number of bytes following an `IAC` that are swallowed unparsed.
const IAC_TRAILER: u8 = 2;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Ordinary input
    AwaitingByte,
    /// Inside a telnet command, `remaining` bytes still to discard
    InIac { remaining: u8 },
    /// After `ESC`, expecting `[`
    InEscape,
    /// After `ESC [`, expecting the final byte
    InCsi,
}

/// A finished input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedLine {
    /// Line content without the terminator
    pub text: String,
    /// Whether the content came from history browsing
    pub recalled: bool,
}

/// Result of feeding one byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep reading
    Pending,
    /// The user asked for a history entry; answer with
    /// [`LineEditor::apply_recall`].
    Recall(Direction),
    /// A terminator arrived
    Line(CompletedLine),
}

/// Per-session input state machine
#[derive(Debug)]
pub struct LineEditor {
    state: State,
    line: Vec<u8>,
    recalled: bool,
    scratch: usize,
    output: Vec<u8>,
}

impl LineEditor {
    pub fn new() -> Self {
        Self {
            state: State::AwaitingByte,
            line: Vec::new(),
            recalled: false,
            scratch: 0,
            output: Vec::new(),
        }
    }

    /// Current (incomplete) line content
    pub fn line(&self) -> &[u8] {
        &self.line
    }

    /// Whether the current line was loaded from history
    pub fn is_recalled(&self) -> bool {
        self.recalled
    }

    /// Drain the bytes that should be written back to the client.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Advance the state machine by one input byte.
    pub fn feed(&mut self, byte: u8) -> ConsoleResult<Step> {
        let step = match self.state {
            State::AwaitingByte => self.on_byte(byte),
            State::InIac { remaining } => self.on_iac(byte, remaining),
            State::InEscape => self.on_escape(byte),
            State::InCsi => self.on_csi(byte),
        };

        if self.scratch.max(self.line.len()) >= SCRATCH_CAP {
            return Err(ConsoleError::LineTooLong { limit: SCRATCH_CAP });
        }
        Ok(step)
    }

    /// Replace the current line with a history entry, repainting the client.
    pub fn apply_recall(&mut self, text: &str) {
        if !self.line.is_empty() {
            self.output.extend(render_back_erase(self.line.len()));
        }
        self.line.clear();
        self.line.extend_from_slice(text.as_bytes());
        self.output.extend_from_slice(text.as_bytes());
        self.recalled = true;
    }

    fn on_byte(&mut self, byte: u8) -> Step {
        match byte {
            IAC => {
                // Negotiation mid-line aborts whatever was typed so far
                self.line.clear();
                self.scratch = 0;
                self.state = State::InIac {
                    remaining: IAC_TRAILER,
                };
            }
            key::NUL => self.scratch += 1,
            key::ESC => {
                self.scratch += 1;
                self.state = State::InEscape;
            }
            key::CR | key::LF => {
                self.output.extend_from_slice(b"\r\n");
                return Step::Line(self.finish());
            }
            key::BACKSPACE => {
                if self.line.pop().is_some() {
                    self.output.extend(render_back_erase(1));
                    self.scratch = self.scratch.saturating_sub(1);
                }
                self.recalled = false;
            }
            // Reserved for completion
            key::TAB => self.scratch += 1,
            _ => {
                self.scratch += 1;
                self.line.push(byte);
                self.output.push(byte);
                self.recalled = false;
            }
        }
        Step::Pending
    }

    fn on_iac(&mut self, byte: u8, remaining: u8) -> Step {
        if remaining == IAC_TRAILER {
            match Verb::try_from(byte) {
                Ok(verb) => tracing::trace!("Discarding client negotiation {:?}", verb),
                Err(code) => tracing::trace!("Discarding telnet command {}", code),
            }
        }
        self.state = match remaining.saturating_sub(1) {
            0 => State::AwaitingByte,
            remaining => State::InIac { remaining },
        };
        Step::Pending
    }

    fn on_escape(&mut self, byte: u8) -> Step {
        self.scratch += 1;
        self.state = if byte == key::CSI {
            State::InCsi
        } else {
            State::AwaitingByte
        };
        Step::Pending
    }

    fn on_csi(&mut self, byte: u8) -> Step {
        self.scratch += 1;
        self.state = State::AwaitingByte;
        match byte {
            key::UP => Step::Recall(Direction::Up),
            key::DOWN => Step::Recall(Direction::Down),
            // Cursor movement within the line is not supported
            key::RIGHT | key::LEFT => Step::Pending,
            _ => Step::Pending,
        }
    }

    fn finish(&mut self) -> CompletedLine {
        let line = CompletedLine {
            text: String::from_utf8_lossy(&self.line).into_owned(),
            recalled: self.recalled,
        };
        self.line.clear();
        self.recalled = false;
        self.scratch = 0;
        line
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}
