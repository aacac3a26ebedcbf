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

//! Quote-aware command line splitting

const SPACE: char = ' ';
const QUOTE: char = '"';

#[derive(Debug, Clone, Copy)]
enum Scan {
    Between,
    Bare(usize),
    Quoted(usize),
}

/// Split a completed line into tokens.
///
/// Tokens are separated by runs of spaces. A double quote starts a token that
/// runs verbatim to the next double quote or the end of the line; empty
/// quoted tokens are dropped. A blank line produces no tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    let line = line.trim();
    let mut tokens = Vec::new();
    let mut scan = Scan::Between;

    for (i, ch) in line.char_indices() {
        scan = match (scan, ch) {
            (Scan::Between, SPACE) => Scan::Between,
            (Scan::Between, QUOTE) => Scan::Quoted(i + 1),
            (Scan::Between, _) => Scan::Bare(i),
            (Scan::Bare(start), SPACE) => {
                tokens.push(line[start..i].to_string());
                Scan::Between
            }
            (Scan::Bare(start), QUOTE) => {
                tokens.push(line[start..i].to_string());
                Scan::Quoted(i + 1)
            }
            (Scan::Bare(start), _) => Scan::Bare(start),
            (Scan::Quoted(start), QUOTE) => {
                if i > start {
                    tokens.push(line[start..i].to_string());
                }
                Scan::Between
            }
            (Scan::Quoted(start), _) => Scan::Quoted(start),
        };
    }

    match scan {
        Scan::Between => {}
        Scan::Bare(start) => tokens.push(line[start..].to_string()),
        // Unterminated quote keeps the remainder
        Scan::Quoted(start) => {
            if start < line.len() {
                tokens.push(line[start..].to_string());
            }
        }
    }
    tokens
}
