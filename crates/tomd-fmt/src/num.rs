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

//! Numeric re-emission: integer re-basing, float notation, digit grouping.

use tomd_core::{TomlError, TomlResult};

use crate::config::{FloatNotation, IntBase};

/// Re-emits an integer literal in `base`, grouping digits every
/// `underscore_every` (0 disables). Hex digits are lowercase. Prefixed
/// forms are unsigned in TOML, so negative values stay decimal.
pub fn format_integer(literal: &str, base: IntBase, underscore_every: usize) -> TomlResult<String> {
    let value = parse_integer(literal)?;
    let base = if value < 0 { IntBase::Dec } else { base };
    let (sign, magnitude) = if value < 0 {
        ("-", value.unsigned_abs())
    } else {
        ("", value.unsigned_abs())
    };
    let digits = match base {
        IntBase::Dec => format!("{}", magnitude),
        IntBase::Hex => format!("{:x}", magnitude),
        IntBase::Oct => format!("{:o}", magnitude),
        IntBase::Bin => format!("{:b}", magnitude),
    };
    Ok(format!(
        "{}{}{}",
        sign,
        base.prefix(),
        insert_underscores(&digits, underscore_every)
    ))
}

/// Re-emits a float literal in the requested notation, grouping the integer
/// part, the fractional part, and the exponent digits independently.
pub fn format_float(
    literal: &str,
    notation: FloatNotation,
    underscore_every: usize,
) -> TomlResult<String> {
    let cleaned: String = literal.chars().filter(|c| *c != '_').collect();
    let value: f64 = cleaned
        .parse()
        .map_err(|_| TomlError::format(format!("{}: not a float", literal)))?;
    if value.is_nan() {
        return Ok("nan".to_string());
    }
    if value.is_infinite() {
        return Ok(if value < 0.0 { "-inf" } else { "inf" }.to_string());
    }
    let text = match notation {
        FloatNotation::Fixed => fixed(value),
        FloatNotation::Scientific => format!("{:e}", value),
        FloatNotation::Auto => {
            let magnitude = value.abs();
            if magnitude != 0.0 && !(1e-4..1e15).contains(&magnitude) {
                format!("{:e}", value)
            } else {
                fixed(value)
            }
        }
    };
    Ok(group_number(&text, underscore_every))
}

fn fixed(value: f64) -> String {
    if value.fract() == 0.0 {
        // keep a fractional digit so the value re-parses as a float
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Parses an integer literal as the scanner produced it: optional sign,
/// optional `0x`/`0o`/`0b` prefix, underscores between digits.
fn parse_integer(literal: &str) -> TomlResult<i64> {
    let cleaned: String = literal.chars().filter(|c| *c != '_').collect();
    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    let parsed = if let Some(hex) = body.strip_prefix("0x") {
        i64::from_str_radix(hex, 16)
    } else if let Some(oct) = body.strip_prefix("0o") {
        i64::from_str_radix(oct, 8)
    } else if let Some(bin) = body.strip_prefix("0b") {
        i64::from_str_radix(bin, 2)
    } else {
        body.parse::<i64>()
    };
    let value = parsed.map_err(|_| TomlError::format(format!("{}: not an integer", literal)))?;
    Ok(if negative { -value } else { value })
}

/// Groups a full number string: the integer part from the right, the
/// fractional part and exponent digits from the left, sign and markers
/// untouched.
pub fn group_number(text: &str, every: usize) -> String {
    if every == 0 {
        return text.to_string();
    }
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let grouped = match rest.find('.') {
        None => match rest.find(['e', 'E']) {
            None => insert_underscores(rest, every),
            Some(e) => group_exponent(&insert_underscores(&rest[..e], every), &rest[e..], every),
        },
        Some(dot) => {
            let head = insert_underscores(&rest[..dot], every);
            let tail = &rest[dot + 1..];
            match tail.find(['e', 'E']) {
                None => format!("{}.{}", head, insert_underscores_ltr(tail, every)),
                Some(e) => group_exponent(
                    &format!("{}.{}", head, insert_underscores_ltr(&tail[..e], every)),
                    &tail[e..],
                    every,
                ),
            }
        }
    };
    format!("{}{}", sign, grouped)
}

fn group_exponent(head: &str, exponent: &str, every: usize) -> String {
    // exponent = "e" or "E", optional sign, digits
    let marker = &exponent[..1];
    let rest = &exponent[1..];
    let (sign, digits) = match rest.strip_prefix(['+', '-']) {
        Some(d) => (&rest[..1], d),
        None => ("", rest),
    };
    format!(
        "{}{}{}{}",
        head,
        marker,
        sign,
        insert_underscores_ltr(digits, every)
    )
}

/// Right-aligned grouping, for integer parts: `1234567` -> `1_234_567`.
fn insert_underscores(digits: &str, every: usize) -> String {
    if every == 0 || digits.len() <= every {
        return digits.to_string();
    }
    let mut out = String::new();
    let lead = digits.len() % every;
    if lead > 0 {
        out.push_str(&digits[..lead]);
        out.push('_');
    }
    let mut i = lead;
    while i < digits.len() {
        out.push_str(&digits[i..i + every]);
        if i + every < digits.len() {
            out.push('_');
        }
        i += every;
    }
    out
}

/// Left-aligned grouping, for fractional and exponent digits:
/// `123456` -> `123_456`, `12345` -> `123_45`.
fn insert_underscores_ltr(digits: &str, every: usize) -> String {
    if every == 0 || digits.len() <= every {
        return digits.to_string();
    }
    let mut out = String::new();
    let mut i = 0;
    while i < digits.len() {
        let end = (i + every).min(digits.len());
        out.push_str(&digits[i..end]);
        if end < digits.len() {
            out.push('_');
        }
        i = end;
    }
    out
}
