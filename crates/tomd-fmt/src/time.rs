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

//! Datetime re-emission.
//!
//! Conversion is applied to `Datetime` literals only when a [`TimeRule`] is
//! configured; bare dates and times, and unruled datetimes, pass through
//! verbatim. Zoned datetimes may be converted to UTC (`Z` suffix);
//! zone-less datetimes have no instant and only their fractional-second
//! precision is adjusted.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

use tomd_core::{TomlError, TomlResult};

use crate::config::TimeRule;

/// Re-emits a scanned datetime literal under `rule`.
pub fn format_datetime(literal: &str, rule: &TimeRule) -> TomlResult<String> {
    let normalized = normalize_separator(literal);
    if let Ok(zoned) = DateTime::parse_from_rfc3339(&normalized) {
        if rule.utc {
            let utc = zoned.with_timezone(&Utc);
            return Ok(emit(utc.naive_utc(), "Z", rule.millis));
        }
        let offset = if zoned.offset().local_minus_utc() == 0 {
            "Z".to_string()
        } else {
            format!("{}", zoned.offset())
        };
        return Ok(emit(zoned.naive_local(), &offset, rule.millis));
    }
    let naive = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|_| TomlError::format(format!("{}: not a datetime", literal)))?;
    Ok(emit(naive, "", rule.millis))
}

/// The scanner accepts a space between date and time; RFC 3339 wants `T`.
fn normalize_separator(literal: &str) -> String {
    let mut text = literal.to_string();
    if text.len() > 10 && text.as_bytes()[10] == b' ' {
        text.replace_range(10..11, "T");
    }
    text
}

fn emit(naive: NaiveDateTime, zone: &str, millis: u8) -> String {
    let mut out = naive.format("%Y-%m-%dT%H:%M:%S").to_string();
    if millis > 0 {
        let nanos = format!("{:09}", naive.nanosecond());
        out.push('.');
        out.push_str(&nanos[..millis as usize]);
    }
    out.push_str(zone);
    out
}
