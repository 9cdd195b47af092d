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

//! The TOML parser.
//!
//! [`parse`] builds a single root [`Table`] from a token stream using
//! two-token lookahead (`curr`, `peek`). The grammar, conceptually:
//!
//! ```text
//! Document    := KeyValues (TableHeader KeyValues)* EOF
//! TableHeader := '[' DottedKey ']' | '[[' DottedKey ']]'
//! KeyValue    := DottedKey '=' Value Newline
//! DottedKey   := Key ('.' Key)*
//! Value       := Literal | InlineArray | InlineTable
//! InlineArray := '[' (Value (',' Value)* ','?)? ']'    -- newlines allowed
//! InlineTable := '{' (KeyValue (',' KeyValue)*)? '}'   -- newlines forbidden
//! ```
//!
//! The parser stops at the first error and returns no partial tree. The
//! structural invariants (key uniqueness, implicit promotion, inline
//! sealing, array-of-tables append) live in [`Table`]'s insertion methods.

use std::mem;

use crate::document::{Array, Comment, Entry, Literal, Node, Table, TableKind};
use crate::error::{TomlError, TomlResult};
use crate::lex::{Scanner, Token, TokenKind};

/// Parses a TOML document into its root table.
///
/// # Examples
///
/// ```
/// use tomd_core::parse;
///
/// let doc = parse(b"[server]\nhost = \"localhost\"\nport = 8080\n").unwrap();
/// let server = doc.get("server").and_then(|n| n.as_table()).unwrap();
/// assert_eq!(server.entries().len(), 2);
/// ```
///
/// # Errors
///
/// Returns the first lexical, syntactic, or semantic error, carrying the
/// offending position and, for conflicts, the original definition site.
pub fn parse(input: &[u8]) -> TomlResult<Table> {
    Parser::new(Scanner::new(input).with_comments(true)).parse_document()
}

/// A two-token-lookahead parser over a [`Scanner`].
#[derive(Debug)]
pub struct Parser {
    scanner: Scanner,
    curr: Token,
    peek: Token,
    /// Comment lines collected above the next item, joined by `\n`.
    pending_comment: String,
}

impl Parser {
    /// Creates a parser; the scanner should retain comments.
    pub fn new(mut scanner: Scanner) -> Self {
        let curr = scanner.scan();
        let peek = scanner.scan();
        Self {
            scanner,
            curr,
            peek,
            pending_comment: String::new(),
        }
    }

    /// Consumes the parser and builds the document tree.
    pub fn parse_document(mut self) -> TomlResult<Table> {
        let mut root = Table::root();
        self.parse_entries(&mut root)?;
        while !self.done() {
            let kind = match self.curr.kind {
                TokenKind::BegRegularTable => TableKind::Regular,
                TokenKind::BegArrayTable => TableKind::Item,
                _ => return Err(self.unexpected("'[' or '[['", "document")),
            };
            self.next();
            self.parse_table(&mut root, kind)?;
        }
        Ok(root)
    }

    /// Parses one `[a.b]` / `[[a.b]]` header and the key-values below it.
    fn parse_table(&mut self, root: &mut Table, kind: TableKind) -> TomlResult<()> {
        let mut table: &mut Table = root;
        loop {
            if !self.curr.is_key() {
                return Err(self.unexpected("key", "table"));
            }
            match self.peek.kind {
                TokenKind::Dot => {
                    let key = self.curr.clone();
                    table = table.retrieve(&key)?;
                    self.next();
                    self.next();
                }
                TokenKind::EndRegularTable | TokenKind::EndArrayTable => {
                    if kind == TableKind::Item && self.peek.kind != TokenKind::EndArrayTable {
                        return Err(self.unexpected("']]'", "table"));
                    }
                    if kind == TableKind::Regular && self.peek.kind != TokenKind::EndRegularTable
                    {
                        return Err(self.unexpected("']'", "table"));
                    }
                    let target = table.register_table(Table::new(self.curr.clone(), kind))?;
                    self.next();
                    self.next();
                    let post = self.take_post_comment();
                    target.comment = Comment::new(mem::take(&mut self.pending_comment), post);
                    if !self.curr.is_newline() && !self.done() {
                        return Err(self.unexpected("newline", "table"));
                    }
                    if self.curr.is_newline() {
                        self.next();
                    }
                    return self.parse_entries(target);
                }
                _ => return Err(self.unexpected("'.' or ']'", "table")),
            }
        }
    }

    /// Parses key-values until the next table header or end of input.
    fn parse_entries(&mut self, table: &mut Table) -> TomlResult<()> {
        loop {
            self.parse_comments();
            if self.curr.is_table_header() || self.done() {
                return Ok(());
            }
            self.parse_entry(table, true)?;
            if !self.curr.is_newline() && !self.done() {
                return Err(self.unexpected("newline", "body"));
            }
            if self.curr.is_newline() {
                self.next();
            }
        }
    }

    /// Parses one `key = value` binding, walking dotted prefixes.
    fn parse_entry(&mut self, table: &mut Table, dotted: bool) -> TomlResult<()> {
        if !self.curr.is_key() {
            return Err(self.unexpected("key", "entry"));
        }
        if dotted && self.peek.kind == TokenKind::Dot {
            let key = self.curr.clone();
            let sub = table.retrieve(&key)?;
            self.next();
            self.next();
            return self.parse_entry(sub, dotted);
        }
        let key = self.curr.clone();
        self.next();
        if self.curr.kind != TokenKind::Equal {
            return Err(self.unexpected("'='", "entry"));
        }
        self.next();
        let pre = mem::take(&mut self.pending_comment);
        let value = match self.curr.kind {
            TokenKind::BegArray => self.parse_array()?,
            TokenKind::BegInline => self.parse_inline()?,
            _ => {
                let literal = self.parse_literal()?;
                self.next();
                literal
            }
        };
        let post = self.take_post_comment();
        let mut entry = Entry::new(key, value);
        entry.comment = Comment::new(pre, post);
        table.register_entry(entry)
    }

    fn parse_literal(&mut self) -> TomlResult<Node> {
        if !self.curr.is_value() {
            return Err(self.unexpected("value", "value"));
        }
        Ok(Node::Literal(Literal::new(self.curr.clone())))
    }

    /// `[` value, value, ... `]` with newlines and per-element comments.
    fn parse_array(&mut self) -> TomlResult<Node> {
        let mut array = Array::new(self.curr.pos);
        self.next();
        while !self.done() && self.curr.kind != TokenKind::EndArray {
            self.parse_comments();
            if self.curr.kind == TokenKind::EndArray {
                break;
            }
            let pre = mem::take(&mut self.pending_comment);
            let mut node = match self.curr.kind {
                TokenKind::BegArray => self.parse_array()?,
                TokenKind::BegInline => self.parse_inline()?,
                _ => {
                    let literal = self.parse_literal()?;
                    self.next();
                    literal
                }
            };
            match self.curr.kind {
                TokenKind::EndArray | TokenKind::Comment => {}
                TokenKind::Comma => self.next(),
                TokenKind::Newline => {
                    while self.curr.is_newline() {
                        self.next();
                    }
                    match self.curr.kind {
                        TokenKind::Comma => self.next(),
                        TokenKind::EndArray => {}
                        _ => return Err(self.unexpected("','", "array")),
                    }
                }
                _ => return Err(self.unexpected("','", "array")),
            }
            let post = self.take_post_comment();
            node.set_comment(Comment::new(pre, post));
            array.nodes.push(node);
            while self.curr.is_newline() {
                self.next();
            }
        }
        if self.curr.kind != TokenKind::EndArray {
            return Err(self.unexpected("']'", "array"));
        }
        self.next();
        Ok(Node::Array(array))
    }

    /// `{` key = value, ... `}` on a single line.
    fn parse_inline(&mut self) -> TomlResult<Node> {
        let key = Token::new(TokenKind::Ident, "", self.curr.pos);
        self.next();
        let mut table = Table::new(key, TableKind::Inline);
        while !self.done() && self.curr.kind != TokenKind::EndInline {
            self.parse_entry(&mut table, true)?;
            match self.curr.kind {
                TokenKind::Comma => self.next(),
                TokenKind::EndInline => {}
                _ => return Err(self.unexpected("',' or '}'", "inline")),
            }
        }
        if self.curr.kind != TokenKind::EndInline {
            return Err(self.unexpected("'}'", "inline"));
        }
        self.next();
        Ok(Node::Table(table))
    }

    /// Collects comment lines (and surrounding blank lines) into
    /// `pending_comment` for attachment to the next item.
    fn parse_comments(&mut self) {
        self.pending_comment.clear();
        loop {
            while self.curr.is_newline() {
                self.next();
            }
            if !self.curr.is_comment() {
                return;
            }
            if !self.pending_comment.is_empty() {
                self.pending_comment.push('\n');
            }
            self.pending_comment.push_str(&self.curr.literal);
            self.next();
        }
    }

    fn take_post_comment(&mut self) -> String {
        if self.curr.is_comment() {
            let comment = self.curr.literal.clone();
            self.next();
            comment
        } else {
            String::new()
        }
    }

    fn next(&mut self) {
        if self.curr.kind == TokenKind::Eof {
            return;
        }
        self.curr = mem::replace(&mut self.peek, self.scanner.scan());
    }

    fn done(&self) -> bool {
        self.curr.kind == TokenKind::Eof
    }

    fn unexpected(&self, want: &str, context: &str) -> TomlError {
        if self.curr.kind == TokenKind::Illegal {
            TomlError::lexical(
                format!("[{}] malformed token '{}'", context, self.curr.literal),
                self.curr.pos,
            )
        } else {
            TomlError::syntax(
                format!(
                    "[{}] unexpected token {}, want {}",
                    context, self.curr, want
                ),
                self.curr.pos,
            )
        }
    }
}
