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

//! Invariant tests for the formatter.
//!
//! This suite pins the core emission behaviors and the invariants that
//! must hold of them:
//! - Round-trip: parsing formatter output preserves document semantics
//! - Idempotency: formatting the parse of formatter output is a no-op
//! - Rule behavior: bases, notations, layouts, promotion, comments, eol

use tomd_core::parse;
use tomd_fmt::{
    format, format_with_config, ArrayLayout, FloatNotation, FormatConfig, IntBase, LineEnding,
};

fn roundtrip(input: &str) {
    let doc = parse(input.as_bytes()).unwrap();
    let out = format(&doc).unwrap();
    let reparsed = parse(out.as_bytes())
        .unwrap_or_else(|e| panic!("output failed to reparse: {}\n---\n{}", e, out));
    assert!(
        doc.semantic_eq(&reparsed),
        "semantics changed\ninput:\n{}\noutput:\n{}",
        input,
        out
    );
}

fn idempotent(input: &str, config: FormatConfig) {
    let doc = parse(input.as_bytes()).unwrap();
    let once = format_with_config(&doc, &config).unwrap();
    let reparsed = parse(once.as_bytes())
        .unwrap_or_else(|e| panic!("output failed to reparse: {}\n---\n{}", e, once));
    let twice = format_with_config(&reparsed, &config).unwrap();
    assert_eq!(once, twice, "formatting is not idempotent for:\n{}", input);
}

// =============================================================================
// Core emission behavior
// =============================================================================

#[test]
fn test_dotted_keys_format_as_single_header() {
    let doc = parse(b"a.b.c = 1\n").unwrap();
    assert_eq!(format(&doc).unwrap(), "[a.b]\nc = 1\n\n");
}

#[test]
fn test_array_of_tables_roundtrips_byte_equal() {
    let doc = parse(b"[[x]]\nn = 1\n[[x]]\nn = 2\n").unwrap();
    let once = format(&doc).unwrap();
    assert_eq!(once, "[[x]]\nn = 1\n\n[[x]]\nn = 2\n\n");
    let twice = format(&parse(once.as_bytes()).unwrap()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_integer_rebasing_to_hex() {
    let doc = parse(b"x = 255\n").unwrap();
    let config = FormatConfig::new()
        .with_int_base(IntBase::Hex)
        .with_underscore_every(0);
    assert_eq!(format_with_config(&doc, &config).unwrap(), "x = 0xff\n\n");
}

#[test]
fn test_datetime_default_rules_roundtrip() {
    let input = "t = 1979-05-27T00:32:00.999999-07:00\n";
    let doc = parse(input.as_bytes()).unwrap();
    let out = format(&doc).unwrap();
    assert_eq!(out, "t = 1979-05-27T00:32:00.999999-07:00\n\n");
    roundtrip(input);
}

#[test]
fn test_datetime_utc_conversion() {
    let doc = parse(b"t = 1979-05-27T00:32:00.999999-07:00\n").unwrap();
    let config = FormatConfig::new().with_time(6, true);
    assert_eq!(
        format_with_config(&doc, &config).unwrap(),
        "t = 1979-05-27T07:32:00.999999Z\n\n"
    );
}

// =============================================================================
// Round-trip semantics (default rules)
// =============================================================================

#[test]
fn test_roundtrip_scalars() {
    roundtrip(
        "int = 42\nneg = -17\nbig = 1_000_000\nhex = 0xdead_beef\noct = 0o755\nbin = 0b1101\n",
    );
}

#[test]
fn test_roundtrip_floats() {
    roundtrip("a = 3.14\nb = -0.01\nc = 5e22\nd = 6.26e-34\ne = inf\nf = -inf\ng = nan\n");
}

#[test]
fn test_roundtrip_strings() {
    roundtrip(
        "basic = \"hello\\tworld\"\nliteral = 'C:\\Users'\nunicode = \"snow\\u2603man\"\nempty = \"\"\n",
    );
}

#[test]
fn test_roundtrip_multiline_strings() {
    roundtrip("a = \"\"\"\nline one\nline two\"\"\"\nb = '''\nraw \\ text'''\n");
}

#[test]
fn test_roundtrip_dates_and_times() {
    roundtrip(
        "date = 1979-05-27\ntime = 07:32:00\nlocal = 1979-05-27T07:32:00\nzoned = 1979-05-27T07:32:00Z\n",
    );
}

#[test]
fn test_roundtrip_structure() {
    roundtrip(
        "top = 1\n[a]\nx = [1, 2, 3]\n[a.b]\ny = { p = 1, q = \"two\" }\n[[items]]\nn = 1\n[[items]]\nn = 2\n",
    );
}

#[test]
fn test_roundtrip_arrays() {
    roundtrip("single = [1, 2, 3]\nmulti = [\n  \"a\",\n  \"b\",\n]\nnested = [[1], [2, 3]]\nempty = []\n");
}

// =============================================================================
// Idempotency under assorted rule sets
// =============================================================================

const SAMPLE: &str = r#"# heading
title = "sample"
count = 1_000
ratio = 2.5
when = 1979-05-27T07:32:00Z

[server]
host = "localhost" # local only
ports = [8001, 8002]
tags = [
  "a",
  "b",
]
limits = { cpu = 2, mem = 512 }

[[jobs]]
name = "build"

[[jobs]]
name = "test"
"#;

#[test]
fn test_idempotent_default_rules() {
    idempotent(SAMPLE, FormatConfig::default());
}

#[test]
fn test_idempotent_without_comments() {
    idempotent(SAMPLE, FormatConfig::new().with_comments(false));
}

#[test]
fn test_idempotent_rebased_grouped() {
    idempotent(
        SAMPLE,
        FormatConfig::new()
            .with_int_base(IntBase::Hex)
            .with_underscore_every(4),
    );
}

#[test]
fn test_idempotent_forced_layouts() {
    idempotent(SAMPLE, FormatConfig::new().with_array_layout(ArrayLayout::Single));
    idempotent(SAMPLE, FormatConfig::new().with_array_layout(ArrayLayout::Multi));
}

#[test]
fn test_idempotent_nested_spaces() {
    idempotent(SAMPLE, FormatConfig::new().with_nest(true).with_indent(4));
}

#[test]
fn test_idempotent_crlf() {
    idempotent(SAMPLE, FormatConfig::new().with_eol(LineEnding::Crlf));
}

#[test]
fn test_idempotent_promotion() {
    idempotent(SAMPLE, FormatConfig::new().with_promote_inline(true));
}

#[test]
fn test_idempotent_time_normalization() {
    idempotent(SAMPLE, FormatConfig::new().with_time(3, true));
}

#[test]
fn test_idempotent_float_notations() {
    idempotent(SAMPLE, FormatConfig::new().with_float_notation(FloatNotation::Fixed));
    idempotent(
        SAMPLE,
        FormatConfig::new().with_float_notation(FloatNotation::Scientific),
    );
    idempotent(SAMPLE, FormatConfig::new().with_float_notation(FloatNotation::Auto));
}

// =============================================================================
// Rule behavior details
// =============================================================================

#[test]
fn test_comments_survive_roundtrip() {
    let input = "# heading\na = 1 # trailing\n";
    let doc = parse(input.as_bytes()).unwrap();
    let out = format(&doc).unwrap();
    let reparsed = parse(out.as_bytes()).unwrap();
    let entry = reparsed.get("a").and_then(|n| n.as_entry()).unwrap();
    assert_eq!(entry.comment.pre, "heading");
    assert_eq!(entry.comment.post, "trailing");
}

#[test]
fn test_promotion_roundtrips_semantically_for_pure_tables() {
    let input = "[s]\np = { x = 1, y = 2 }\n";
    let doc = parse(input.as_bytes()).unwrap();
    let config = FormatConfig::new().with_promote_inline(true);
    let out = format_with_config(&doc, &config).unwrap();
    let reparsed = parse(out.as_bytes()).unwrap();
    let s = reparsed.get("s").and_then(|n| n.as_table()).unwrap();
    let p = s.get("p").and_then(|n| n.as_table()).unwrap();
    assert!(p.get("x").is_some());
    assert!(p.get("y").is_some());
}

#[test]
fn test_mixed_layout_preserves_source_shape() {
    let input = "flat = [1, 2]\ntall = [\n  1,\n  2,\n]\n";
    let doc = parse(input.as_bytes()).unwrap();
    let out = format(&doc).unwrap();
    assert!(out.contains("flat = [1, 2]"));
    assert!(out.contains("tall = [\n"));
}

#[test]
fn test_long_multiline_string_wraps_and_roundtrips() {
    let body = "the quick brown fox jumps over the lazy dog again and again and keeps on jumping until done";
    let input = format!("a = \"\"\"\n{}\"\"\"\n", body);
    let doc = parse(input.as_bytes()).unwrap();
    let out = format(&doc).unwrap();
    assert!(out.contains("\\\n"), "long body should wrap:\n{}", out);
    let reparsed = parse(out.as_bytes()).unwrap();
    let entry = reparsed.get("a").and_then(|n| n.as_entry()).unwrap();
    assert_eq!(entry.value.as_literal().unwrap().token.literal, body);
}
