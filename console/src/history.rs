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

//! Command history ring
//!
//! A fixed-capacity ring of accepted lines with an independent browse cursor.
//! One buffer is shared by every console session; see
//! [`ConsoleContext`](crate::context::ConsoleContext).

use std::sync::Arc;
use tokio::sync::Mutex;

/// Number of slots in the history ring.
pub const HISTORY_CAPACITY: usize = 200;

/// History ring shared between sessions
pub type SharedHistory = Arc<Mutex<HistoryBuffer>>;

/// Browse direction for [`HistoryBuffer::recall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Previous (older) entry, `ESC [ A`
    Up,
    /// Next (newer) entry, `ESC [ B`
    Down,
}

/// Fixed-capacity ring of past command lines
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    slots: Vec<String>,
    write_index: usize,
    cursor: usize,
    filled: usize,
}

impl HistoryBuffer {
    /// Create an empty history ring
    pub fn new() -> Self {
        Self {
            slots: vec![String::new(); HISTORY_CAPACITY],
            write_index: 0,
            cursor: 0,
            filled: 0,
        }
    }

    /// Slot the next accepted line will be written to.
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Current browse position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of slots holding a line.
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Store an accepted line. Blank lines are dropped.
    pub fn push(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        self.slots[self.write_index] = line.to_string();
        self.write_index = (self.write_index + 1) % HISTORY_CAPACITY;
        self.filled = (self.filled + 1).min(HISTORY_CAPACITY);
        self.cursor = self.write_index;
    }

    /// Move the browse cursor back to the write position.
    pub fn reset_cursor(&mut self) {
        self.cursor = self.write_index;
    }

    /// Step the cursor and return the line under it.
    ///
    /// The returned string is empty when the slot was never written.
    pub fn recall(&mut self, direction: Direction) -> String {
        let span = self.span();
        match direction {
            Direction::Up => {
                self.cursor = if self.cursor == 0 {
                    span.saturating_sub(1)
                } else {
                    self.cursor - 1
                };
            }
            Direction::Down => {
                self.cursor += 1;
                if span == 0 || self.cursor >= span {
                    self.cursor = 0;
                }
            }
        }
        self.slots[self.cursor].clone()
    }

    /// Stored lines from oldest to newest.
    pub fn entries(&self) -> Vec<&str> {
        let start = if self.filled < HISTORY_CAPACITY {
            0
        } else {
            self.write_index
        };
        (0..self.filled)
            .map(|offset| self.slots[(start + offset) % HISTORY_CAPACITY].as_str())
            .collect()
    }

    /// Exclusive upper bound of the browsable region: one past the newest
    /// entry, counting a fully wrapped ring as the whole capacity.
    fn span(&self) -> usize {
        if self.filled == 0 {
            0
        } else if self.write_index == 0 {
            HISTORY_CAPACITY
        } else {
            self.write_index
        }
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
