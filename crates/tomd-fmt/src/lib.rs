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

//! Style-rule formatter for `tomd-core` document trees.
//!
//! Walks a tree in declaration order and re-emits it as TOML under a
//! [`FormatConfig`]: indentation and nesting, numeric base and float
//! notation, digit grouping, datetime precision and UTC normalization,
//! array layout, inline-table promotion, end-of-line style, and comment
//! retention.
//!
//! Under the default rules a round trip is semantically lossless: scanned
//! literals are re-emitted verbatim, so `0xff`, `1_000`, and zoned
//! datetimes survive untouched. Rules rewrite values without changing
//! their meaning.
//!
//! # Examples
//!
//! ```
//! use tomd_core::parse;
//! use tomd_fmt::{format_with_config, FormatConfig, IntBase};
//!
//! let doc = parse(b"x = 255\n").unwrap();
//! let config = FormatConfig::new().with_int_base(IntBase::Hex);
//! let out = format_with_config(&doc, &config).unwrap();
//! assert_eq!(out, "x = 0xff\n\n");
//! ```

mod config;
mod num;
mod strings;
mod time;
mod writer;

pub use config::{
    ArrayLayout, FloatNotation, FormatConfig, FormatConfigBuilder, IntBase, LineEnding, TimeRule,
};
pub use writer::Formatter;

use tomd_core::{Table, TomlResult};

/// Formats a document tree with the default rules.
pub fn format(doc: &Table) -> TomlResult<String> {
    format_with_config(doc, &FormatConfig::default())
}

/// Formats a document tree under `config`.
///
/// # Errors
///
/// The formatter is total on a valid tree; errors only arise from literals
/// no scanner would produce (e.g. an integer overflowing re-basing), and
/// from rule construction, which happens before this call.
pub fn format_with_config(doc: &Table, config: &FormatConfig) -> TomlResult<String> {
    Formatter::new(config.clone()).format(doc)
}
