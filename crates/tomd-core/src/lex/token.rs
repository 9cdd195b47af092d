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

//! Token types produced by the scanner.
//!
//! A [`Token`] pairs a [`TokenKind`] with its semantic literal (unquoted,
//! unescaped, underscores preserved for numbers) and its source [`Position`].
//! Value tokens additionally carry the raw source span so a formatter can
//! re-emit them verbatim.

use std::fmt;

use crate::lex::Position;

/// The four TOML string flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringKind {
    /// `"..."` with backslash escapes.
    Basic,
    /// `"""..."""`, escapes plus literal newlines and line-ending backslash.
    BasicMulti,
    /// `'...'`, no escape processing.
    Literal,
    /// `'''...'''`, no escapes, literal newlines.
    LiteralMulti,
}

impl StringKind {
    /// Returns `true` for the multiline flavors.
    #[inline]
    pub const fn is_multiline(&self) -> bool {
        matches!(self, Self::BasicMulti | Self::LiteralMulti)
    }

    /// Returns the delimiter used by this flavor.
    pub const fn delimiter(&self) -> &'static str {
        match self {
            Self::Basic => "\"",
            Self::BasicMulti => "\"\"\"",
            Self::Literal => "'",
            Self::LiteralMulti => "'''",
        }
    }
}

/// The kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// End of input.
    Eof,
    /// A malformed run; the literal captures the offending text.
    Illegal,
    /// Line break.
    Newline,
    /// `# ...` comment (only produced with comment retention on).
    Comment,
    /// Bare identifier / key.
    Ident,
    /// String literal of one of the four flavors.
    Str(StringKind),
    /// Integer, decimal or `0x`/`0o`/`0b` prefixed.
    Integer,
    /// Float, including `inf` and `nan`.
    Float,
    /// `true` or `false`.
    Bool,
    /// `YYYY-MM-DD`.
    Date,
    /// `HH:MM:SS[.fff]`.
    Time,
    /// Full date-time, optionally zoned.
    Datetime,
    /// `=`
    Equal,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `[` in value context.
    BegArray,
    /// `]` in value context.
    EndArray,
    /// `{`
    BegInline,
    /// `}`
    EndInline,
    /// `[` in key context.
    BegRegularTable,
    /// `]` in key context.
    EndRegularTable,
    /// `[[` in key context.
    BegArrayTable,
    /// `]]` in key context.
    EndArrayTable,
}

impl TokenKind {
    /// Short lowercase name, used by error messages and the tree dump.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Eof => "eof",
            Self::Illegal => "illegal",
            Self::Newline => "newline",
            Self::Comment => "comment",
            Self::Ident => "ident",
            Self::Str(_) => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "boolean",
            Self::Date => "date",
            Self::Time => "time",
            Self::Datetime => "datetime",
            Self::Equal => "'='",
            Self::Dot => "'.'",
            Self::Comma => "','",
            Self::BegArray => "'['",
            Self::EndArray => "']'",
            Self::BegInline => "'{'",
            Self::EndInline => "'}'",
            Self::BegRegularTable => "'['",
            Self::EndRegularTable => "']'",
            Self::BegArrayTable => "'[['",
            Self::EndArrayTable => "']]'",
        }
    }
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// What was scanned.
    pub kind: TokenKind,
    /// Semantic value: unquoted, unescaped, number underscores preserved.
    pub literal: String,
    /// Where the token starts.
    pub pos: Position,
    /// Original source span for value tokens, post line-ending normalization.
    pub raw: Option<String>,
}

impl Token {
    /// Creates a token with no raw span.
    pub fn new(kind: TokenKind, literal: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            literal: literal.into(),
            pos,
            raw: None,
        }
    }

    /// The end-of-input token.
    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "", Position::default())
    }

    /// Returns `true` if this token can act as a key.
    ///
    /// Bare identifiers and quoted strings are keys anywhere; integers are
    /// accepted because digit-led bare keys scan as numbers in value context
    /// (inside inline tables).
    pub fn is_key(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Ident | TokenKind::Str(_) | TokenKind::Integer
        )
    }

    /// Returns `true` unless this token is `Illegal`.
    pub fn is_valid(&self) -> bool {
        self.kind != TokenKind::Illegal
    }

    /// Returns `true` for integer and float tokens.
    pub fn is_number(&self) -> bool {
        matches!(self.kind, TokenKind::Integer | TokenKind::Float)
    }

    /// Returns `true` for date, time, and datetime tokens.
    pub fn is_time(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Date | TokenKind::Time | TokenKind::Datetime
        )
    }

    /// Returns `true` for tokens that form a primitive value.
    pub fn is_value(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Str(_)
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::Bool
                | TokenKind::Date
                | TokenKind::Time
                | TokenKind::Datetime
        )
    }

    /// Returns `true` for `[` / `[[` header openers.
    pub fn is_table_header(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::BegRegularTable | TokenKind::BegArrayTable
        )
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    pub fn is_newline(&self) -> bool {
        self.kind == TokenKind::Newline
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "<newline>"),
            TokenKind::Eof => write!(f, "<eof>"),
            TokenKind::Equal
            | TokenKind::Dot
            | TokenKind::Comma
            | TokenKind::BegArray
            | TokenKind::EndArray
            | TokenKind::BegInline
            | TokenKind::EndInline
            | TokenKind::BegRegularTable
            | TokenKind::EndRegularTable
            | TokenKind::BegArrayTable
            | TokenKind::EndArrayTable => write!(f, "<punct({})>", self.kind.name()),
            _ => write!(f, "<{}({})>", self.kind.name(), self.literal),
        }
    }
}
