// Dweve TOMD - TOML Document Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! String escaping per flavor, key quoting, and multiline wrapping.

use tomd_core::lex::is_bare_key;

/// Escapes a value for a single-line basic string.
pub fn escape_basic(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Escapes a value for a multiline basic string: newlines stay raw, and up
/// to two consecutive quotes stay raw (a third would close the delimiter).
pub fn escape_multiline(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut quotes = 0usize;
    for c in s.chars() {
        if c == '"' {
            quotes += 1;
            if quotes == 3 {
                out.push_str("\\\"");
                quotes = 0;
            } else {
                out.push('"');
            }
            continue;
        }
        quotes = 0;
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push('\n'),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Emits a key, quoting it as a basic string when it is not bare.
pub fn quote_key(key: &str) -> String {
    if is_bare_key(key) {
        key.to_string()
    } else {
        format!("\"{}\"", escape_basic(key))
    }
}

/// Breaks a long single-line body into lines of roughly 72 columns at
/// whitespace/punctuation boundaries, joining them with the TOML
/// line-continuation backslash. Semantics are preserved: the scanner strips
/// the backslash-newline and the following indentation.
pub fn text_wrap(s: &str) -> String {
    const LENGTH: usize = 72;
    const LIMIT: usize = 8;
    const BOUNDARIES: &[char] = &[' ', '\t', '.', '?', ',', '!', ';'];

    let mut parts: Vec<&str> = Vec::new();
    let mut rest = s;
    loop {
        let mut cut = 0usize;
        let mut prev = 0usize;
        let mut found = true;
        while cut < LENGTH {
            match rest[cut..].find(BOUNDARIES) {
                Some(x) => {
                    prev = cut;
                    cut = cut + x + 1;
                }
                None => {
                    found = false;
                    break;
                }
            }
        }
        if !found || cut >= rest.len() {
            parts.push(rest);
            break;
        }
        if cut >= LENGTH + LIMIT && prev > 0 {
            cut = prev;
        }
        parts.push(&rest[..cut]);
        rest = &rest[cut..];
    }
    parts.join("\\\n")
}
