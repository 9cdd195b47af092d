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

//! Formatter configuration.
//!
//! Every rule is validated at construction: unknown rule spellings yield a
//! `FormatError` here, never during emission of a valid tree.

use std::str::FromStr;

use tomd_core::{TomlError, TomlResult};

/// Layout of array values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayLayout {
    /// Preserve the source layout: arrays that spanned several lines stay
    /// multiline, one-liners stay on one line.
    #[default]
    Mixed,
    /// Force every array onto one line.
    Single,
    /// Force one element per line (arrays of one element or fewer stay
    /// inline).
    Multi,
}

impl FromStr for ArrayLayout {
    type Err = TomlError;

    fn from_str(s: &str) -> TomlResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "mixed" => Ok(Self::Mixed),
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            _ => Err(TomlError::format(format!(
                "{}: unsupported array format",
                s
            ))),
        }
    }
}

/// Base used when re-emitting integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntBase {
    #[default]
    Dec,
    /// `0x` prefix, lowercase digits.
    Hex,
    /// `0o` prefix.
    Oct,
    /// `0b` prefix.
    Bin,
}

impl IntBase {
    pub(crate) const fn prefix(&self) -> &'static str {
        match self {
            Self::Dec => "",
            Self::Hex => "0x",
            Self::Oct => "0o",
            Self::Bin => "0b",
        }
    }
}

impl FromStr for IntBase {
    type Err = TomlError;

    fn from_str(s: &str) -> TomlResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "d" | "dec" | "decimal" => Ok(Self::Dec),
            "x" | "hex" | "hexa" => Ok(Self::Hex),
            "o" | "oct" | "octal" => Ok(Self::Oct),
            "b" | "bin" | "binary" => Ok(Self::Bin),
            _ => Err(TomlError::format(format!("{}: unsupported base", s))),
        }
    }
}

/// Notation used when re-emitting floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatNotation {
    /// Plain decimal notation.
    #[default]
    Fixed,
    /// Exponent notation.
    Scientific,
    /// Exponent notation for very large or very small magnitudes, plain
    /// decimal otherwise.
    Auto,
}

impl FromStr for FloatNotation {
    type Err = TomlError;

    fn from_str(s: &str) -> TomlResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "f" | "float" => Ok(Self::Fixed),
            "e" | "scientific" => Ok(Self::Scientific),
            "g" | "auto" => Ok(Self::Auto),
            _ => Err(TomlError::format(format!("{}: unsupported specifier", s))),
        }
    }
}

/// Line-ending style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub(crate) const fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

impl FromStr for LineEnding {
    type Err = TomlError;

    fn from_str(s: &str) -> TomlResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "lf" | "linux" => Ok(Self::Lf),
            "crlf" | "windows" => Ok(Self::Crlf),
            _ => Err(TomlError::format(format!(
                "{}: unsupported line ending",
                s
            ))),
        }
    }
}

/// Datetime re-emission rule.
///
/// Applied to `Datetime` literals only; bare dates and times pass through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRule {
    /// Fractional-second digits to emit, 0 to 9.
    pub millis: u8,
    /// Convert zoned datetimes to UTC (`Z` suffix). Zone-less datetimes are
    /// left in their local form.
    pub utc: bool,
}

impl TimeRule {
    pub fn new(millis: u8, utc: bool) -> Self {
        Self {
            millis: millis.min(9),
            utc,
        }
    }
}

/// The formatter rule set.
///
/// The default configuration round-trips a document semantically losslessly:
/// numbers, dates, and strings are re-emitted from their scanned literals,
/// comments are retained, and array layout follows the source.
///
/// # Examples
///
/// ```
/// use tomd_fmt::{FormatConfig, IntBase};
///
/// let config = FormatConfig::new()
///     .with_int_base(IntBase::Hex)
///     .with_underscore_every(4);
/// assert_eq!(config.int_base, Some(IntBase::Hex));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FormatConfig {
    /// Indent unit: 0 for a tab, n > 0 for n spaces.
    pub indent: usize,
    /// Emit headers for tables with no options.
    pub keep_empty: bool,
    /// Indent nested subtables beyond their parent's level.
    pub nest: bool,
    /// Retain pre/post comments.
    pub comments: bool,
    /// Emit the original source span for literals where available.
    pub raw: bool,
    /// Array layout strategy.
    pub array_layout: ArrayLayout,
    /// Rewrite inline tables (and arrays of tables) as `[header]` /
    /// `[[header]]` blocks.
    pub promote_inline: bool,
    /// Line-ending style.
    pub eol: LineEnding,
    /// Integer re-basing; `None` re-emits the scanned literal.
    pub int_base: Option<IntBase>,
    /// Float notation; `None` re-emits the scanned literal.
    pub float_notation: Option<FloatNotation>,
    /// Insert `_` every n digits in re-emitted numbers (0 disables).
    /// Grouping applies separately to the integer part, the fractional
    /// part, and the exponent digits.
    pub underscore_every: usize,
    /// Datetime normalization; `None` re-emits the scanned literal.
    pub time: Option<TimeRule>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: 0,
            keep_empty: false,
            nest: false,
            comments: true,
            raw: false,
            array_layout: ArrayLayout::Mixed,
            promote_inline: false,
            eol: LineEnding::Lf,
            int_base: None,
            float_notation: None,
            underscore_every: 0,
            time: None,
        }
    }
}

impl FormatConfig {
    /// Creates a configuration with all default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new builder.
    pub fn builder() -> FormatConfigBuilder {
        FormatConfigBuilder::new()
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_keep_empty(mut self, keep_empty: bool) -> Self {
        self.keep_empty = keep_empty;
        self
    }

    pub fn with_nest(mut self, nest: bool) -> Self {
        self.nest = nest;
        self
    }

    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn with_array_layout(mut self, layout: ArrayLayout) -> Self {
        self.array_layout = layout;
        self
    }

    pub fn with_promote_inline(mut self, promote: bool) -> Self {
        self.promote_inline = promote;
        self
    }

    pub fn with_eol(mut self, eol: LineEnding) -> Self {
        self.eol = eol;
        self
    }

    pub fn with_int_base(mut self, base: IntBase) -> Self {
        self.int_base = Some(base);
        self
    }

    pub fn with_float_notation(mut self, notation: FloatNotation) -> Self {
        self.float_notation = Some(notation);
        self
    }

    pub fn with_underscore_every(mut self, every: usize) -> Self {
        self.underscore_every = every;
        self
    }

    pub fn with_time(mut self, millis: u8, utc: bool) -> Self {
        self.time = Some(TimeRule::new(millis, utc));
        self
    }
}

/// Builder for [`FormatConfig`].
#[derive(Debug, Clone, Default)]
pub struct FormatConfigBuilder {
    config: FormatConfig,
}

impl FormatConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: FormatConfig::default(),
        }
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.config.indent = indent;
        self
    }

    pub fn keep_empty(mut self, keep_empty: bool) -> Self {
        self.config.keep_empty = keep_empty;
        self
    }

    pub fn nest(mut self, nest: bool) -> Self {
        self.config.nest = nest;
        self
    }

    pub fn comments(mut self, comments: bool) -> Self {
        self.config.comments = comments;
        self
    }

    pub fn raw(mut self, raw: bool) -> Self {
        self.config.raw = raw;
        self
    }

    pub fn array_layout(mut self, layout: ArrayLayout) -> Self {
        self.config.array_layout = layout;
        self
    }

    pub fn promote_inline(mut self, promote: bool) -> Self {
        self.config.promote_inline = promote;
        self
    }

    pub fn eol(mut self, eol: LineEnding) -> Self {
        self.config.eol = eol;
        self
    }

    pub fn int_base(mut self, base: IntBase) -> Self {
        self.config.int_base = Some(base);
        self
    }

    pub fn float_notation(mut self, notation: FloatNotation) -> Self {
        self.config.float_notation = Some(notation);
        self
    }

    pub fn underscore_every(mut self, every: usize) -> Self {
        self.config.underscore_every = every;
        self
    }

    pub fn time(mut self, millis: u8, utc: bool) -> Self {
        self.config.time = Some(TimeRule::new(millis, utc));
        self
    }

    pub fn build(self) -> FormatConfig {
        self.config
    }
}
