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

//! Error types for TOML scanning, parsing, and formatting.

use std::fmt;
use thiserror::Error;

use crate::lex::Position;

/// The kind of error that occurred while processing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed literal: bad number, unterminated string, invalid escape,
    /// invalid UTF-8, stray character.
    Lexical,
    /// Token expected X, got Y.
    Syntax,
    /// Same key bound twice within a table.
    DuplicateKey,
    /// Option key collides with an existing table.
    KeyIsTable,
    /// Table path collides with an existing option.
    KeyIsOption,
    /// Attempt to extend an inline table after it was sealed.
    InlineNotExtensible,
    /// `[[header]]` collides with a key that cannot become an array of tables.
    InvalidArrayAppend,
    /// Invalid formatter rule value.
    Format,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "LexicalError"),
            Self::Syntax => write!(f, "SyntaxError"),
            Self::DuplicateKey => write!(f, "DuplicateKeyError"),
            Self::KeyIsTable => write!(f, "KeyIsTableError"),
            Self::KeyIsOption => write!(f, "KeyIsOptionError"),
            Self::InlineNotExtensible => write!(f, "InlineNotExtensibleError"),
            Self::InvalidArrayAppend => write!(f, "InvalidArrayAppendError"),
            Self::Format => write!(f, "FormatError"),
        }
    }
}

impl ErrorKind {
    /// Returns `true` for the kinds raised by the parser's insertion rules.
    pub fn is_semantic(&self) -> bool {
        matches!(
            self,
            Self::DuplicateKey
                | Self::KeyIsTable
                | Self::KeyIsOption
                | Self::InlineNotExtensible
                | Self::InvalidArrayAppend
        )
    }
}

/// An error that occurred while scanning, parsing, or formatting TOML.
#[derive(Debug, Clone, Error)]
#[error("{kind} at {pos}: {message}")]
pub struct TomlError {
    /// The kind of error.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Source position of the offending token or definition.
    /// The zero position means the error is not tied to source text.
    pub pos: Position,
    /// Additional context. Semantic errors record the position of the
    /// original definition here (e.g. "first defined at line 3, column 1").
    pub context: Option<String>,
}

impl TomlError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            pos,
            context: None,
        }
    }

    /// Add context information.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    // Convenience constructors for each error kind
    pub fn lexical(message: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::Lexical, message, pos)
    }

    pub fn syntax(message: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::Syntax, message, pos)
    }

    pub fn duplicate_key(message: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::DuplicateKey, message, pos)
    }

    pub fn key_is_table(message: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::KeyIsTable, message, pos)
    }

    pub fn key_is_option(message: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::KeyIsOption, message, pos)
    }

    pub fn inline_not_extensible(message: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::InlineNotExtensible, message, pos)
    }

    pub fn invalid_array_append(message: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::InvalidArrayAppend, message, pos)
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Format, message, Position::default())
    }

    /// Record the position of the conflicting original definition.
    pub fn with_first_definition(self, pos: Position) -> Self {
        self.with_context(format!("first defined at {}", pos))
    }
}

/// Result type for TOML operations.
pub type TomlResult<T> = Result<T, TomlError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== ErrorKind Display tests ====================

    #[test]
    fn test_error_kind_display_lexical() {
        assert_eq!(format!("{}", ErrorKind::Lexical), "LexicalError");
    }

    #[test]
    fn test_error_kind_display_syntax() {
        assert_eq!(format!("{}", ErrorKind::Syntax), "SyntaxError");
    }

    #[test]
    fn test_error_kind_display_duplicate_key() {
        assert_eq!(format!("{}", ErrorKind::DuplicateKey), "DuplicateKeyError");
    }

    #[test]
    fn test_error_kind_display_key_is_table() {
        assert_eq!(format!("{}", ErrorKind::KeyIsTable), "KeyIsTableError");
    }

    #[test]
    fn test_error_kind_display_key_is_option() {
        assert_eq!(format!("{}", ErrorKind::KeyIsOption), "KeyIsOptionError");
    }

    #[test]
    fn test_error_kind_display_inline() {
        assert_eq!(
            format!("{}", ErrorKind::InlineNotExtensible),
            "InlineNotExtensibleError"
        );
    }

    #[test]
    fn test_error_kind_display_array_append() {
        assert_eq!(
            format!("{}", ErrorKind::InvalidArrayAppend),
            "InvalidArrayAppendError"
        );
    }

    #[test]
    fn test_error_kind_display_format() {
        assert_eq!(format!("{}", ErrorKind::Format), "FormatError");
    }

    #[test]
    fn test_error_kind_is_semantic() {
        assert!(ErrorKind::DuplicateKey.is_semantic());
        assert!(ErrorKind::KeyIsTable.is_semantic());
        assert!(ErrorKind::KeyIsOption.is_semantic());
        assert!(ErrorKind::InlineNotExtensible.is_semantic());
        assert!(ErrorKind::InvalidArrayAppend.is_semantic());
        assert!(!ErrorKind::Lexical.is_semantic());
        assert!(!ErrorKind::Syntax.is_semantic());
        assert!(!ErrorKind::Format.is_semantic());
    }

    // ==================== TomlError Display tests ====================

    #[test]
    fn test_error_display() {
        let err = TomlError::syntax("unexpected token", Position::new(42, 7));
        let msg = format!("{}", err);
        assert!(msg.contains("SyntaxError"));
        assert!(msg.contains("line 42, column 7"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn test_error_with_context() {
        let err = TomlError::duplicate_key("key a", Position::new(2, 1))
            .with_first_definition(Position::new(1, 1));
        assert_eq!(
            err.context.as_deref(),
            Some("first defined at line 1, column 1")
        );
    }

    // ==================== Convenience constructor tests ====================

    #[test]
    fn test_error_lexical() {
        let err = TomlError::lexical("bad number", Position::new(1, 5));
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert_eq!(err.pos, Position::new(1, 5));
    }

    #[test]
    fn test_error_syntax() {
        let err = TomlError::syntax("test", Position::new(2, 1));
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_error_duplicate_key() {
        let err = TomlError::duplicate_key("test", Position::new(3, 1));
        assert_eq!(err.kind, ErrorKind::DuplicateKey);
    }

    #[test]
    fn test_error_format_has_zero_position() {
        let err = TomlError::format("zzz: unsupported base");
        assert_eq!(err.kind, ErrorKind::Format);
        assert!(err.pos.is_zero());
    }

    // ==================== Error trait tests ====================

    #[test]
    fn test_error_is_std_error() {
        fn accepts_error<E: std::error::Error>(_: E) {}
        accepts_error(TomlError::syntax("test", Position::new(1, 1)));
    }

    #[test]
    fn test_error_clone() {
        let original =
            TomlError::key_is_option("path", Position::new(5, 2)).with_context("in table x");
        let cloned = original.clone();
        assert_eq!(original.kind, cloned.kind);
        assert_eq!(original.message, cloned.message);
        assert_eq!(original.pos, cloned.pos);
        assert_eq!(original.context, cloned.context);
    }
}
