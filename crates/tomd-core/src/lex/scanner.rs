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

//! The TOML scanner.
//!
//! [`Scanner`] turns a byte buffer into a stream of [`Token`]s. It is
//! context-aware: a **Key**/**Value** mode plus a container-nesting counter
//! disambiguate constructs that depend on where they appear. `1979-05-27` is
//! a bare key on the left of `=` and a date on the right; `[` opens a table
//! header in key context and an array in value context; signed numbers and
//! `inf`/`nan` are only numeric in value context.
//!
//! Input is normalized on ingest: a UTF-8 BOM is stripped and CRLF collapses
//! to LF. Malformed runs produce an `Illegal` token capturing the offending
//! text, and scanning continues so callers may surface several diagnostics;
//! the parser stops at the first one.
//!
//! # Examples
//!
//! ```
//! use tomd_core::lex::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new(b"key = 255");
//! assert_eq!(scanner.scan().kind, TokenKind::Ident);
//! assert_eq!(scanner.scan().kind, TokenKind::Equal);
//! let value = scanner.scan();
//! assert_eq!(value.kind, TokenKind::Integer);
//! assert_eq!(value.literal, "255");
//! assert_eq!(scanner.scan().kind, TokenKind::Eof);
//! ```

use crate::lex::{Position, StringKind, Token, TokenKind};

/// Characters that may appear in a bare key.
#[inline]
pub(crate) fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

#[inline]
fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[inline]
fn is_punct(c: char) -> bool {
    matches!(c, '=' | '.' | ',' | '[' | ']' | '{' | '}')
}

/// A token boundary: blank, newline, or punctuation.
#[inline]
fn is_boundary(c: char) -> bool {
    is_blank(c) || c == '\n' || is_punct(c)
}

fn flavor(basic: bool, multi: bool) -> StringKind {
    match (basic, multi) {
        (true, false) => StringKind::Basic,
        (true, true) => StringKind::BasicMulti,
        (false, false) => StringKind::Literal,
        (false, true) => StringKind::LiteralMulti,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanMode {
    Key,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Char(char),
    /// Invalid UTF-8 was hit; reported once as `Illegal`, then `Eof`.
    Corrupt,
    Eof,
}

/// A context-sensitive TOML scanner over a normalized character buffer.
///
/// The scanner is a synchronous pull interface: each call to [`scan`]
/// returns the next token; after the end of input every call returns `Eof`.
///
/// [`scan`]: Scanner::scan
#[derive(Debug)]
pub struct Scanner {
    chars: Vec<char>,
    /// Index of the next unread character; the current one is at `next - 1`.
    next: usize,
    cur: Cursor,
    corrupt: bool,

    mode: ScanMode,
    depth: u32,

    keep_comments: bool,
    keep_blank_lines: bool,

    line: usize,
    column: usize,
    /// Column count of the previous line, for unreading across a newline.
    prev_row_len: usize,
}

impl Scanner {
    /// Creates a scanner over `input`.
    ///
    /// Strips a leading UTF-8 BOM, collapses CRLF to LF, and skips any
    /// leading newline run so the first `scan` returns the first real token.
    /// If the input contains invalid UTF-8, the valid prefix is scanned
    /// normally and a single `Illegal` token marks the corruption point.
    pub fn new(input: &[u8]) -> Self {
        let input = input.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(input);
        let (text, corrupt) = match std::str::from_utf8(input) {
            Ok(text) => (text, false),
            Err(err) => {
                let valid = std::str::from_utf8(&input[..err.valid_up_to()]).unwrap_or("");
                (valid, true)
            }
        };
        let text = text.replace("\r\n", "\n");
        let mut scanner = Self {
            chars: text.chars().collect(),
            next: 0,
            cur: Cursor::Eof,
            corrupt,
            mode: ScanMode::Key,
            depth: 0,
            keep_comments: false,
            keep_blank_lines: false,
            line: 1,
            column: 0,
            prev_row_len: 0,
        };
        scanner.read();
        while scanner.cur == Cursor::Char('\n') {
            scanner.read();
        }
        scanner
    }

    /// Keep `Comment` tokens instead of discarding them.
    pub fn with_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Emit one `Newline` per physical newline instead of collapsing runs.
    pub fn with_blank_lines(mut self, keep: bool) -> Self {
        self.keep_blank_lines = keep;
        self
    }

    /// Returns the next token.
    pub fn scan(&mut self) -> Token {
        loop {
            match self.cur {
                Cursor::Eof => return Token::eof(),
                Cursor::Corrupt => {
                    let tok = Token::new(
                        TokenKind::Illegal,
                        "invalid UTF-8 sequence",
                        Position::new(self.line, self.column),
                    );
                    self.read();
                    return tok;
                }
                Cursor::Char(_) => {}
            }
            self.skip_blank();
            let c = match self.cur {
                Cursor::Eof => return Token::eof(),
                Cursor::Corrupt => continue,
                Cursor::Char(c) => c,
            };
            let pos = Position::new(self.line, self.column);
            let start = self.next - 1;
            self.switch_mode(c);

            let mut tok = Token::new(TokenKind::Illegal, "", pos);
            match c {
                '#' => {
                    self.scan_comment(&mut tok);
                    self.read();
                    if !self.keep_comments {
                        continue;
                    }
                    return tok;
                }
                '\n' => {
                    if !self.keep_blank_lines && self.peek() == Some('\n') {
                        self.read();
                        continue;
                    }
                    tok.kind = TokenKind::Newline;
                }
                '"' | '\'' => self.scan_string(&mut tok),
                _ if self.mode == ScanMode::Key && is_key_char(c) => self.scan_ident(&mut tok),
                _ if self.mode == ScanMode::Value && c.is_ascii_alphabetic() => {
                    self.scan_ident(&mut tok)
                }
                _ if self.mode == ScanMode::Value
                    && (c.is_ascii_digit() || c == '+' || c == '-') =>
                {
                    self.scan_number(&mut tok)
                }
                '=' => tok.kind = TokenKind::Equal,
                '.' => tok.kind = TokenKind::Dot,
                ',' => tok.kind = TokenKind::Comma,
                '{' => tok.kind = TokenKind::BegInline,
                '}' => tok.kind = TokenKind::EndInline,
                '[' => {
                    tok.kind = if self.mode == ScanMode::Key {
                        if self.peek() == Some('[') {
                            self.read();
                            TokenKind::BegArrayTable
                        } else {
                            TokenKind::BegRegularTable
                        }
                    } else {
                        TokenKind::BegArray
                    };
                }
                ']' => {
                    tok.kind = if self.mode == ScanMode::Key {
                        if self.peek() == Some(']') {
                            self.read();
                            TokenKind::EndArrayTable
                        } else {
                            TokenKind::EndRegularTable
                        }
                    } else {
                        TokenKind::EndArray
                    };
                }
                _ => self.scan_illegal(&mut tok),
            }
            self.read();
            if tok.is_value() {
                tok.raw = Some(self.raw_span(start));
            }
            return tok;
        }
    }

    // ==================== mode and cursor ====================

    fn switch_mode(&mut self, c: char) {
        if c == '\n' && self.mode == ScanMode::Value && self.depth == 0 {
            self.mode = ScanMode::Key;
            return;
        }
        match c {
            '{' | '[' if self.mode == ScanMode::Value => self.depth += 1,
            '}' | ']' if self.mode == ScanMode::Value => {
                self.depth = self.depth.saturating_sub(1)
            }
            '=' if self.mode == ScanMode::Key => self.mode = ScanMode::Value,
            _ => {}
        }
    }

    fn read(&mut self) {
        loop {
            if self.next >= self.chars.len() {
                self.cur = if self.corrupt {
                    self.corrupt = false;
                    Cursor::Corrupt
                } else {
                    Cursor::Eof
                };
                return;
            }
            let c = self.chars[self.next];
            self.next += 1;
            if c == '\r' {
                // lone carriage returns; CRLF was normalized at ingest
                continue;
            }
            self.cur = Cursor::Char(c);
            if c == '\n' {
                self.line += 1;
                self.prev_row_len = self.column;
                self.column = 0;
            } else {
                self.column += 1;
            }
            return;
        }
    }

    /// Steps back one character. Only a single step is supported, and
    /// unreading past the start of input or at end of input is a no-op.
    fn unread(&mut self) {
        if self.next < 2 {
            return;
        }
        let c = match self.cur {
            Cursor::Char(c) => c,
            Cursor::Eof | Cursor::Corrupt => return,
        };
        if c == '\n' {
            self.line -= 1;
            self.column = self.prev_row_len;
        } else {
            self.column -= 1;
        }
        self.next -= 1;
        self.cur = Cursor::Char(self.chars[self.next - 1]);
    }

    fn peek(&self) -> Option<char> {
        let mut i = self.next;
        while i < self.chars.len() && self.chars[i] == '\r' {
            i += 1;
        }
        self.chars.get(i).copied()
    }

    fn skip_blank(&mut self) {
        while matches!(self.cur, Cursor::Char(c) if is_blank(c)) {
            self.read();
        }
    }

    /// Source span from `start` up to (excluding) the current character.
    fn raw_span(&self, start: usize) -> String {
        let end = match self.cur {
            Cursor::Char(_) => self.next - 1,
            Cursor::Eof | Cursor::Corrupt => self.chars.len(),
        };
        self.chars[start..end].iter().collect()
    }

    // ==================== token scanners ====================

    fn scan_ident(&mut self, tok: &mut Token) {
        let mut literal = String::new();
        while let Cursor::Char(c) = self.cur {
            if !is_key_char(c) {
                break;
            }
            literal.push(c);
            self.read();
        }
        self.unread();
        tok.kind = match literal.as_str() {
            "true" | "false" => TokenKind::Bool,
            "inf" | "nan" if self.mode == ScanMode::Value => TokenKind::Float,
            _ => TokenKind::Ident,
        };
        tok.literal = literal;
    }

    fn scan_comment(&mut self, tok: &mut Token) {
        tok.kind = TokenKind::Comment;
        self.read();
        self.skip_blank();
        let mut literal = String::new();
        while let Cursor::Char(c) = self.cur {
            if c == '\n' {
                break;
            }
            literal.push(c);
            self.read();
        }
        self.unread();
        tok.literal = literal;
    }

    /// Consumes a malformed run up to the next boundary.
    fn scan_illegal(&mut self, tok: &mut Token) {
        let mut literal = String::new();
        while let Cursor::Char(c) = self.cur {
            if is_boundary(c) {
                break;
            }
            literal.push(c);
            self.read();
        }
        self.unread();
        tok.kind = TokenKind::Illegal;
        tok.literal = literal;
    }

    /// Marks the token `Illegal`, capturing the consumed text plus whatever
    /// remains of the run up to the next boundary.
    fn fail_run(&mut self, tok: &mut Token, mut literal: String) {
        while let Cursor::Char(c) = self.cur {
            if is_boundary(c) {
                break;
            }
            literal.push(c);
            self.read();
        }
        self.unread();
        tok.kind = TokenKind::Illegal;
        tok.literal = literal;
    }

    /// Boundary check and sign cleanup shared by every number form.
    fn finish_number(&mut self, tok: &mut Token, mut literal: String, kind: TokenKind) {
        match self.cur {
            Cursor::Eof | Cursor::Corrupt => {}
            Cursor::Char(c) if is_boundary(c) => {}
            _ => return self.fail_run(tok, literal),
        }
        self.unread();
        if literal.starts_with('+') {
            // a leading plus is the identity; the literal drops it
            literal.remove(0);
        }
        tok.kind = kind;
        tok.literal = literal;
    }

    /// Digits in `radix`, with underscores required to sit between digits.
    /// Returns `false` when the run is empty or an underscore is misplaced.
    fn scan_digits(&mut self, literal: &mut String, radix: u32) -> bool {
        let mut prev_digit = false;
        let mut count = 0usize;
        let mut ok = true;
        loop {
            match self.cur {
                Cursor::Char('_') => {
                    let next_digit = self.peek().map(|c| c.is_digit(radix)).unwrap_or(false);
                    if !prev_digit || !next_digit {
                        ok = false;
                    }
                    literal.push('_');
                    prev_digit = false;
                    self.read();
                }
                Cursor::Char(c) if c.is_digit(radix) => {
                    literal.push(c);
                    prev_digit = true;
                    count += 1;
                    self.read();
                }
                _ => break,
            }
        }
        ok && count > 0
    }

    fn read_fixed_digits(&mut self, literal: &mut String, n: usize) -> bool {
        for _ in 0..n {
            match self.cur {
                Cursor::Char(c) if c.is_ascii_digit() => {
                    literal.push(c);
                    self.read();
                }
                _ => return false,
            }
        }
        true
    }

    fn scan_number(&mut self, tok: &mut Token) {
        let mut literal = String::new();
        let mut signed = false;
        if let Cursor::Char(c @ ('+' | '-')) = self.cur {
            signed = true;
            literal.push(c);
            self.read();
        }

        // signed inf / nan
        if matches!(self.cur, Cursor::Char('i') | Cursor::Char('n')) {
            let mut word = String::new();
            while let Cursor::Char(c) = self.cur {
                if !is_key_char(c) {
                    break;
                }
                word.push(c);
                self.read();
            }
            literal.push_str(&word);
            if matches!(word.as_str(), "inf" | "nan") {
                return self.finish_number(tok, literal, TokenKind::Float);
            }
            return self.fail_run(tok, literal);
        }

        let run_start = literal.len();
        if !self.scan_digits(&mut literal, 10) {
            return self.fail_run(tok, literal);
        }
        let run: String = literal[run_start..].to_string();

        // 0x / 0o / 0b lock an accept set
        if run == "0" {
            if let Cursor::Char(p @ ('x' | 'o' | 'b')) = self.cur {
                literal.push(p);
                self.read();
                if signed {
                    return self.fail_run(tok, literal);
                }
                let radix = match p {
                    'x' => 16,
                    'o' => 8,
                    _ => 2,
                };
                if !self.scan_digits(&mut literal, radix) {
                    return self.fail_run(tok, literal);
                }
                return self.finish_number(tok, literal, TokenKind::Integer);
            }
        }

        let leading_zero = run.len() > 1 && run.starts_with('0');
        match self.cur {
            Cursor::Char('-') => {
                if signed || run.len() != 4 || run.contains('_') {
                    return self.fail_run(tok, literal);
                }
                self.scan_date(tok, literal);
            }
            Cursor::Char(':') => {
                if signed || run.len() != 2 || run.contains('_') {
                    return self.fail_run(tok, literal);
                }
                self.scan_time_value(tok, literal);
            }
            Cursor::Char('.') | Cursor::Char('e') | Cursor::Char('E') => {
                if leading_zero {
                    return self.fail_run(tok, literal);
                }
                self.scan_float(tok, literal);
            }
            _ => {
                if leading_zero {
                    return self.fail_run(tok, literal);
                }
                self.finish_number(tok, literal, TokenKind::Integer);
            }
        }
    }

    fn scan_float(&mut self, tok: &mut Token, mut literal: String) {
        if self.cur == Cursor::Char('.') {
            literal.push('.');
            self.read();
            if !self.scan_digits(&mut literal, 10) {
                return self.fail_run(tok, literal);
            }
        }
        if let Cursor::Char(e @ ('e' | 'E')) = self.cur {
            literal.push(e);
            self.read();
            if let Cursor::Char(s @ ('+' | '-')) = self.cur {
                literal.push(s);
                self.read();
            }
            if !self.scan_digits(&mut literal, 10) {
                return self.fail_run(tok, literal);
            }
        }
        self.finish_number(tok, literal, TokenKind::Float);
    }

    fn scan_date(&mut self, tok: &mut Token, mut literal: String) {
        literal.push('-');
        self.read();
        if !self.read_fixed_digits(&mut literal, 2) {
            return self.fail_run(tok, literal);
        }
        if self.cur != Cursor::Char('-') {
            return self.fail_run(tok, literal);
        }
        literal.push('-');
        self.read();
        if !self.read_fixed_digits(&mut literal, 2) {
            return self.fail_run(tok, literal);
        }
        match self.cur {
            Cursor::Char('T') => {
                literal.push('T');
                self.read();
                self.scan_datetime_time(tok, literal);
            }
            // a space joins date and time only when a time actually follows
            Cursor::Char(' ') if self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) => {
                literal.push(' ');
                self.read();
                self.scan_datetime_time(tok, literal);
            }
            _ => self.finish_number(tok, literal, TokenKind::Date),
        }
    }

    fn scan_datetime_time(&mut self, tok: &mut Token, mut literal: String) {
        if !self.read_fixed_digits(&mut literal, 2) {
            return self.fail_run(tok, literal);
        }
        if !self.scan_clock_rest(&mut literal) {
            return self.fail_run(tok, literal);
        }
        match self.cur {
            Cursor::Char('Z') => {
                literal.push('Z');
                self.read();
            }
            Cursor::Char(c @ ('+' | '-')) => {
                literal.push(c);
                self.read();
                if !self.read_fixed_digits(&mut literal, 2) {
                    return self.fail_run(tok, literal);
                }
                if self.cur != Cursor::Char(':') {
                    return self.fail_run(tok, literal);
                }
                literal.push(':');
                self.read();
                if !self.read_fixed_digits(&mut literal, 2) {
                    return self.fail_run(tok, literal);
                }
            }
            _ => {}
        }
        self.finish_number(tok, literal, TokenKind::Datetime);
    }

    fn scan_time_value(&mut self, tok: &mut Token, mut literal: String) {
        if !self.scan_clock_rest(&mut literal) {
            return self.fail_run(tok, literal);
        }
        self.finish_number(tok, literal, TokenKind::Time);
    }

    /// `:MM:SS` with an optional fraction of 1 to 9 digits.
    fn scan_clock_rest(&mut self, literal: &mut String) -> bool {
        if self.cur != Cursor::Char(':') {
            return false;
        }
        literal.push(':');
        self.read();
        if !self.read_fixed_digits(literal, 2) {
            return false;
        }
        if self.cur != Cursor::Char(':') {
            return false;
        }
        literal.push(':');
        self.read();
        if !self.read_fixed_digits(literal, 2) {
            return false;
        }
        if self.cur == Cursor::Char('.') {
            literal.push('.');
            self.read();
            let mut n = 0usize;
            while let Cursor::Char(c) = self.cur {
                if !c.is_ascii_digit() {
                    break;
                }
                literal.push(c);
                self.read();
                n += 1;
            }
            if n == 0 || n > 9 {
                return false;
            }
        }
        true
    }

    fn scan_string(&mut self, tok: &mut Token) {
        let (quote, basic) = match self.cur {
            Cursor::Char(c) => (c, c == '"'),
            Cursor::Eof | Cursor::Corrupt => return,
        };
        let mut multi = false;
        let mut literal = String::new();
        self.read();
        if self.cur == Cursor::Char(quote) {
            self.read();
            if self.cur != Cursor::Char(quote) {
                // empty single-line string; stay on the closing quote
                self.unread();
                tok.kind = TokenKind::Str(flavor(basic, false));
                return;
            }
            multi = true;
            self.read();
            // a newline right after the opening delimiter is trimmed
            if self.cur == Cursor::Char('\n') {
                self.read();
            }
        }
        loop {
            match self.cur {
                Cursor::Eof | Cursor::Corrupt => {
                    tok.kind = TokenKind::Illegal;
                    tok.literal = literal;
                    return;
                }
                Cursor::Char('\n') if !multi => {
                    self.unread();
                    tok.kind = TokenKind::Illegal;
                    tok.literal = literal;
                    return;
                }
                Cursor::Char(c) if c == quote => {
                    if !multi {
                        break;
                    }
                    let mut run = 1usize;
                    while run < 5 && self.peek() == Some(quote) {
                        self.read();
                        run += 1;
                    }
                    if run >= 3 {
                        for _ in 0..run - 3 {
                            literal.push(quote);
                        }
                        break;
                    }
                    for _ in 0..run {
                        literal.push(quote);
                    }
                    self.read();
                }
                Cursor::Char('\\') if basic => {
                    if !self.scan_escape(&mut literal, multi) {
                        tok.kind = TokenKind::Illegal;
                        tok.literal = literal;
                        return;
                    }
                }
                Cursor::Char(c) => {
                    if c.is_control() && c != '\t' && !(multi && c == '\n') {
                        tok.kind = TokenKind::Illegal;
                        tok.literal = literal;
                        return;
                    }
                    literal.push(c);
                    self.read();
                }
            }
        }
        tok.kind = TokenKind::Str(flavor(basic, multi));
        tok.literal = literal;
    }

    fn scan_escape(&mut self, literal: &mut String, multi: bool) -> bool {
        self.read();
        if multi && self.cur == Cursor::Char('\n') {
            // line-ending backslash joins the next line past its leading whitespace
            while matches!(self.cur, Cursor::Char(' ' | '\t' | '\n')) {
                self.read();
            }
            return true;
        }
        let c = match self.cur {
            Cursor::Char(c) => c,
            Cursor::Eof | Cursor::Corrupt => return false,
        };
        let escaped = match c {
            'b' => '\u{0008}',
            't' => '\t',
            'n' => '\n',
            'f' => '\u{000C}',
            'r' => '\r',
            '"' => '"',
            '\\' => '\\',
            'u' => return self.scan_unicode_escape(literal, 4),
            'U' => return self.scan_unicode_escape(literal, 8),
            _ => return false,
        };
        literal.push(escaped);
        self.read();
        true
    }

    fn scan_unicode_escape(&mut self, literal: &mut String, len: usize) -> bool {
        let mut value = 0u32;
        for _ in 0..len {
            self.read();
            let digit = match self.cur {
                Cursor::Char(c) => c.to_digit(16),
                Cursor::Eof | Cursor::Corrupt => None,
            };
            match digit {
                Some(d) => value = value * 16 + d,
                None => return false,
            }
        }
        match char::from_u32(value) {
            Some(c) => {
                literal.push(c);
                self.read();
                true
            }
            None => false,
        }
    }
}
