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

//! Telnet protocol constants and utilities
//!
//! Only the handful of codes the console needs are modelled: the server
//! announces `WILL SUPPRESS-GO-AHEAD` and `WILL ECHO`, and everything the
//! client sends back after an `IAC` is swallowed unparsed.

/// Interpret As Command: every telnet command starts with this byte.
pub const IAC: u8 = 255;

/// Option negotiation verbs that follow [`IAC`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Will,
    Wont,
    Do,
    Dont,
}

impl TryFrom<u8> for Verb {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            251 => Verb::Will,
            252 => Verb::Wont,
            253 => Verb::Do,
            254 => Verb::Dont,
            other => return Err(other),
        })
    }
}

impl From<Verb> for u8 {
    fn from(verb: Verb) -> u8 {
        match verb {
            Verb::Will => 251,
            Verb::Wont => 252,
            Verb::Do => 253,
            Verb::Dont => 254,
        }
    }
}

/// The two options the console announces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleOption {
    Echo,
    SuppressGoAhead,
}

impl From<ConsoleOption> for u8 {
    fn from(option: ConsoleOption) -> u8 {
        match option {
            ConsoleOption::Echo => 1,
            ConsoleOption::SuppressGoAhead => 3,
        }
    }
}

/// Terminal control bytes seen on the input side.
pub mod key {
    pub const NUL: u8 = 0;
    pub const BACKSPACE: u8 = 8;
    pub const TAB: u8 = b'\t';
    pub const LF: u8 = 10;
    pub const CR: u8 = 13;
    pub const ESC: u8 = 27;
    /// Second byte of a control sequence introducer (`ESC [`).
    pub const CSI: u8 = b'[';
    pub const UP: u8 = b'A';
    pub const DOWN: u8 = b'B';
    pub const RIGHT: u8 = b'C';
    pub const LEFT: u8 = b'D';
}

/// `IAC <verb> <option>`
pub fn negotiation(verb: Verb, option: ConsoleOption) -> [u8; 3] {
    [IAC, verb.into(), option.into()]
}

/// Bytes sent to every client on connect: the server suppresses go-ahead and
/// performs echo itself, so the client must not echo locally.
pub fn handshake() -> Vec<u8> {
    [
        negotiation(Verb::Will, ConsoleOption::SuppressGoAhead),
        negotiation(Verb::Will, ConsoleOption::Echo),
    ]
    .concat()
}

/// `ESC [ <n> D`: move the client cursor `n` columns left.
pub fn cursor_left(n: usize) -> Vec<u8> {
    format!("\x1b[{}D", n).into_bytes()
}

/// Visually erase the last `n` characters on the client: move left, blank
/// them with spaces, then move left again.
pub fn render_back_erase(n: usize) -> Vec<u8> {
    let mut bytes = cursor_left(n);
    bytes.extend(std::iter::repeat_n(b' ', n));
    bytes.extend(cursor_left(n));
    bytes
}
