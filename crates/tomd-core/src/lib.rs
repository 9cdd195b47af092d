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

//! Core scanner, parser, and document tree for TOML v1.0.
//!
//! The pipeline has two stages here, with the formatter living in the
//! companion `tomd-fmt` crate:
//!
//! 1. **Scanner** ([`lex::Scanner`]) - byte buffer to token stream.
//!    Context-aware: key and value positions tokenize differently, which is
//!    how bare keys, signed numbers, and date literals coexist.
//! 2. **Parser** ([`parse`]) - token stream to a [`Table`] tree with the
//!    TOML structural invariants enforced at insertion: unique keys,
//!    implicit-table promotion, array-of-tables append, sealed inline
//!    tables.
//!
//! Binding the tree onto host structures, command-line tooling, and file
//! I/O are intentionally out of scope; the crate consumes a byte slice and
//! produces a tree.
//!
//! # Examples
//!
//! ```
//! use tomd_core::{parse, TableKind};
//!
//! let doc = parse(b"a.b.c = 1\n").unwrap();
//! let a = doc.get("a").and_then(|n| n.as_table()).unwrap();
//! assert_eq!(a.kind, TableKind::Implicit);
//! ```

mod document;
mod dump;
mod error;
pub mod lex;
mod parser;

pub use document::{Array, Comment, Entry, Literal, Node, Table, TableKind};
pub use dump::dump;
pub use error::{ErrorKind, TomlError, TomlResult};
pub use parser::{parse, Parser};

// Re-export the lexical types most callers need directly.
pub use lex::{Position, Scanner, StringKind, Token, TokenKind};
