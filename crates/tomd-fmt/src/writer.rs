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

//! The emitter: walks a document tree depth-first in declaration order and
//! renders it under the configured rules.
//!
//! Emission is idempotent: formatting the parse of formatter output
//! reproduces that output byte for byte under the same rules. The
//! inline-promotion path is shaped around that invariant - a table whose
//! options are all lifted out loses its header exactly as it would on a
//! second pass.

use tomd_core::{Array, Entry, Node, StringKind, Table, TableKind, Token, TokenKind};
use tomd_core::{TomlError, TomlResult};

use crate::config::{ArrayLayout, FormatConfig};
use crate::num;
use crate::strings::{escape_basic, escape_multiline, quote_key, text_wrap};
use crate::time;

/// Initial output buffer capacity; most documents fit without reallocation.
const OUTPUT_CAPACITY: usize = 4096;

/// Renders document trees to TOML text under a rule set.
///
/// A formatter instance is reusable: each [`format`] call starts from a
/// clean buffer.
///
/// [`format`]: Formatter::format
#[derive(Debug)]
pub struct Formatter {
    config: FormatConfig,
    out: String,
    level: usize,
}

impl Formatter {
    pub fn new(config: FormatConfig) -> Self {
        Self {
            config,
            out: String::with_capacity(OUTPUT_CAPACITY),
            level: 0,
        }
    }

    /// Renders `doc` (usually a parse root) and returns the output text.
    ///
    /// The formatter is total on a valid tree: the only errors are numeric
    /// or datetime literals that no scanner would produce, surfaced as
    /// `FormatError`.
    pub fn format(&mut self, doc: &Table) -> TomlResult<String> {
        self.out.clear();
        self.level = 0;
        self.format_table(doc, &[])?;
        Ok(std::mem::take(&mut self.out))
    }

    fn format_table(&mut self, table: &Table, paths: &[String]) -> TomlResult<()> {
        if table.kind == TableKind::ArrayOfTables {
            let mut item_paths = paths.to_vec();
            item_paths.push(table.key.literal.clone());
            for item in table.tables() {
                self.format_table(item, &item_paths)?;
            }
            return Ok(());
        }
        let entries = table.entries();
        let mut child_paths = paths.to_vec();
        if !table.is_root() && table.kind != TableKind::Item {
            child_paths.push(table.key.literal.clone());
        }
        let plain = entries
            .iter()
            .filter(|e| !self.is_fully_promoted(e))
            .count();
        let show_block = self.config.keep_empty || plain > 0;
        if show_block || self.has_promotable(&entries) {
            if show_block {
                self.format_header(table, paths);
            }
            self.format_entries(&entries, &child_paths, show_block)?;
        }
        let nested = self.can_nest(table);
        if nested {
            self.enter_level(false);
        }
        for sub in table.tables() {
            self.format_table(sub, &child_paths)?;
        }
        if nested {
            self.leave_level(false);
        }
        Ok(())
    }

    /// An entry that promotion lifts out entirely, leaving no option line.
    fn is_fully_promoted(&self, entry: &Entry) -> bool {
        if !self.config.promote_inline {
            return false;
        }
        match &entry.value {
            Node::Table(_) => true,
            Node::Array(a) => !a.is_empty() && a.nodes.iter().all(|n| n.as_table().is_some()),
            _ => false,
        }
    }

    fn has_promotable(&self, entries: &[&Entry]) -> bool {
        if !self.config.promote_inline {
            return false;
        }
        entries.iter().any(|e| match &e.value {
            Node::Table(_) => true,
            Node::Array(a) => a.nodes.iter().any(|n| n.as_table().is_some()),
            _ => false,
        })
    }

    fn format_header(&mut self, table: &Table, paths: &[String]) {
        if table.is_root() {
            return;
        }
        self.format_comment_pre(&table.comment.pre);
        let mut full = paths.to_vec();
        if table.kind != TableKind::Item {
            full.push(table.key.literal.clone());
        }
        let joined = full
            .iter()
            .map(|segment| quote_key(segment))
            .collect::<Vec<_>>()
            .join(".");
        self.begin_line();
        if table.kind == TableKind::Item {
            self.out.push_str("[[");
            self.out.push_str(&joined);
            self.out.push_str("]]");
        } else {
            self.out.push('[');
            self.out.push_str(&joined);
            self.out.push(']');
        }
        self.format_comment_post(&table.comment.post);
        self.end_line();
    }

    fn format_entries(
        &mut self,
        entries: &[&Entry],
        paths: &[String],
        header_emitted: bool,
    ) -> TomlResult<()> {
        let width = entries
            .iter()
            .filter(|e| !self.is_fully_promoted(e))
            .map(|e| quote_key(&e.key.literal).len())
            .max()
            .unwrap_or(0);
        let mut promoted: Vec<(Option<String>, Table)> = Vec::new();
        let mut ordinal = 0usize;
        for entry in entries {
            if self.config.promote_inline {
                if let Node::Table(inline) = &entry.value {
                    let mut table = inline.clone();
                    table.kind = TableKind::Regular;
                    table.key = entry.key.clone();
                    table.comment = entry.comment.clone();
                    promoted.push((None, table));
                    continue;
                }
                if let Node::Array(array) = &entry.value {
                    if array.nodes.iter().any(|n| n.as_table().is_some()) {
                        let mut rest = Array::new(array.pos);
                        rest.comment = array.comment.clone();
                        let mut wrapper =
                            Table::new(entry.key.clone(), TableKind::ArrayOfTables);
                        for node in &array.nodes {
                            match node {
                                Node::Table(t) => {
                                    let mut item = t.clone();
                                    item.key = entry.key.clone();
                                    item.kind = TableKind::Item;
                                    wrapper.append_item(item);
                                }
                                other => rest.nodes.push(other.clone()),
                            }
                        }
                        // "#N" keys keep a mixed array's scalars and tables apart
                        let prefix = if rest.is_empty() {
                            None
                        } else {
                            let p = format!("#{}", ordinal);
                            ordinal += 1;
                            Some(p)
                        };
                        promoted.push((prefix, wrapper));
                        if rest.is_empty() {
                            continue;
                        }
                        self.emit_entry(entry, Some(Node::Array(rest)), width)?;
                        continue;
                    }
                }
            }
            self.emit_entry(entry, None, width)?;
        }
        if header_emitted {
            self.end_line();
        }
        if !promoted.is_empty() {
            self.enter_level(false);
            for (prefix, table) in &promoted {
                let mut parents = paths.to_vec();
                if let Some(p) = prefix {
                    parents.push(p.clone());
                }
                self.format_table(table, &parents)?;
            }
            self.leave_level(false);
        }
        Ok(())
    }

    fn emit_entry(
        &mut self,
        entry: &Entry,
        value_override: Option<Node>,
        width: usize,
    ) -> TomlResult<()> {
        self.format_comment_pre(&entry.comment.pre);
        self.begin_line();
        self.write_key(&entry.key.literal, width);
        let value = value_override.as_ref().unwrap_or(&entry.value);
        self.format_value(value)?;
        self.format_comment_post(&entry.comment.post);
        self.end_line();
        Ok(())
    }

    fn format_value(&mut self, node: &Node) -> TomlResult<()> {
        match node {
            Node::Literal(literal) => {
                if self.config.raw {
                    if let Some(raw) = &literal.token.raw {
                        self.out.push_str(raw);
                        return Ok(());
                    }
                }
                self.format_literal(&literal.token)
            }
            Node::Array(array) => self.format_array(array),
            Node::Table(table) => self.format_inline(table),
            Node::Entry(entry) => Err(TomlError::format(format!(
                "entry '{}' cannot be formatted as a value",
                entry.key.literal
            ))),
        }
    }

    fn format_literal(&mut self, token: &Token) -> TomlResult<()> {
        match token.kind {
            TokenKind::Str(kind) => {
                self.format_string(kind, &token.literal);
                Ok(())
            }
            TokenKind::Integer => {
                if self.config.int_base.is_some() || self.config.underscore_every > 0 {
                    let base = self.config.int_base.unwrap_or_default();
                    let text = num::format_integer(
                        &token.literal,
                        base,
                        self.config.underscore_every,
                    )?;
                    self.out.push_str(&text);
                } else {
                    self.out.push_str(&token.literal);
                }
                Ok(())
            }
            TokenKind::Float => {
                if self.config.float_notation.is_some() || self.config.underscore_every > 0 {
                    let notation = self.config.float_notation.unwrap_or_default();
                    let text = num::format_float(
                        &token.literal,
                        notation,
                        self.config.underscore_every,
                    )?;
                    self.out.push_str(&text);
                } else {
                    self.out.push_str(&token.literal);
                }
                Ok(())
            }
            TokenKind::Datetime => {
                if let Some(rule) = &self.config.time {
                    let text = time::format_datetime(&token.literal, rule)?;
                    self.out.push_str(&text);
                } else {
                    self.out.push_str(&token.literal);
                }
                Ok(())
            }
            _ => {
                self.out.push_str(&token.literal);
                Ok(())
            }
        }
    }

    fn format_string(&mut self, kind: StringKind, literal: &str) {
        match kind {
            StringKind::Basic => {
                self.out.push('"');
                self.out.push_str(&escape_basic(literal));
                self.out.push('"');
            }
            StringKind::Literal => {
                self.out.push('\'');
                self.out.push_str(literal);
                self.out.push('\'');
            }
            StringKind::BasicMulti => {
                self.out.push_str("\"\"\"");
                self.end_line();
                let mut body = escape_multiline(literal);
                if !body.contains('\n') {
                    body = text_wrap(&body);
                }
                self.out.push_str(&body);
                self.out.push_str("\"\"\"");
            }
            StringKind::LiteralMulti => {
                self.out.push_str("'''");
                self.end_line();
                self.out.push_str(literal);
                self.out.push_str("'''");
            }
        }
    }

    fn format_array(&mut self, array: &Array) -> TomlResult<()> {
        let single = array.len() <= 1
            || self.config.array_layout == ArrayLayout::Single
            || (self.config.array_layout == ArrayLayout::Mixed && !array.is_multiline());
        if single {
            self.out.push('[');
            for (i, node) in array.nodes.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.format_value(node)?;
            }
            self.out.push(']');
            return Ok(());
        }
        self.out.push('[');
        self.end_line();
        self.enter_level(true);
        for node in &array.nodes {
            self.format_comment_pre(&node.comment().pre);
            self.begin_line();
            self.format_value(node)?;
            self.out.push(',');
            self.format_comment_post(&node.comment().post);
            self.end_line();
        }
        self.leave_level(true);
        self.begin_line();
        self.out.push(']');
        Ok(())
    }

    /// Inline tables force single-line layout for their element arrays.
    fn format_inline(&mut self, table: &Table) -> TomlResult<()> {
        let saved = self.config.array_layout;
        self.config.array_layout = ArrayLayout::Single;
        self.out.push('{');
        let mut first = true;
        for entry in table.entries() {
            if !first {
                self.out.push_str(", ");
            }
            first = false;
            self.write_key(&entry.key.literal, 0);
            self.format_value(&entry.value)?;
        }
        // implicit subtables from dotted keys re-emit as nested inlines
        for sub in table.tables() {
            if !first {
                self.out.push_str(", ");
            }
            first = false;
            self.write_key(&sub.key.literal, 0);
            self.format_inline(sub)?;
        }
        self.out.push('}');
        self.config.array_layout = saved;
        Ok(())
    }

    // ==================== layout helpers ====================

    fn format_comment_pre(&mut self, comment: &str) {
        if !self.config.comments || comment.is_empty() {
            return;
        }
        for line in comment.lines() {
            self.begin_line();
            self.out.push_str("# ");
            self.out.push_str(line);
            self.end_line();
        }
    }

    fn format_comment_post(&mut self, comment: &str) {
        if !self.config.comments || comment.is_empty() {
            return;
        }
        self.out.push_str(" # ");
        self.out.push_str(comment);
    }

    fn write_key(&mut self, literal: &str, width: usize) {
        let key = quote_key(literal);
        let pad = width.saturating_sub(key.len());
        self.out.push_str(&key);
        for _ in 0..pad {
            self.out.push(' ');
        }
        self.out.push_str(" = ");
    }

    fn can_nest(&self, table: &Table) -> bool {
        if table.is_root() {
            return false;
        }
        if table.kind == TableKind::Implicit
            && table.entries().is_empty()
            && !self.config.keep_empty
        {
            // no header was emitted, so nothing to nest under
            return false;
        }
        true
    }

    fn enter_level(&mut self, force: bool) {
        if self.config.nest || force {
            self.level += 1;
        }
    }

    fn leave_level(&mut self, force: bool) {
        if self.config.nest || force {
            self.level -= 1;
        }
    }

    fn begin_line(&mut self) {
        if self.level == 0 {
            return;
        }
        let unit = if self.config.indent == 0 {
            "\t".to_string()
        } else {
            " ".repeat(self.config.indent)
        };
        for _ in 0..self.level {
            self.out.push_str(&unit);
        }
    }

    fn end_line(&mut self) {
        self.out.push_str(self.config.eol.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FloatNotation, IntBase, LineEnding};
    use tomd_core::parse;

    fn fmt(input: &str) -> String {
        fmt_with(input, FormatConfig::default())
    }

    fn fmt_with(input: &str, config: FormatConfig) -> String {
        let doc = parse(input.as_bytes()).unwrap();
        Formatter::new(config).format(&doc).unwrap()
    }

    // ==================== basic emission tests ====================

    #[test]
    fn test_format_simple_options() {
        assert_eq!(fmt("a = 1\nb = \"two\"\n"), "a = 1\nb = \"two\"\n\n");
    }

    #[test]
    fn test_format_key_padding() {
        assert_eq!(fmt("a = 1\nlong = 2\n"), "a    = 1\nlong = 2\n\n");
    }

    #[test]
    fn test_format_table_header() {
        assert_eq!(fmt("[t]\nx = 1\n"), "[t]\nx = 1\n\n");
    }

    #[test]
    fn test_format_dotted_key_as_header() {
        assert_eq!(fmt("a.b.c = 1\n"), "[a.b]\nc = 1\n\n");
    }

    #[test]
    fn test_format_array_of_tables() {
        assert_eq!(
            fmt("[[x]]\nn = 1\n[[x]]\nn = 2\n"),
            "[[x]]\nn = 1\n\n[[x]]\nn = 2\n\n"
        );
    }

    #[test]
    fn test_format_quoted_keys() {
        assert_eq!(fmt("\"a b\" = 1\n"), "\"a b\" = 1\n\n");
        assert_eq!(fmt("[\"x.y\"]\nz = 1\n"), "[\"x.y\"]\nz = 1\n\n");
    }

    #[test]
    fn test_format_empty_table_dropped_by_default() {
        assert_eq!(fmt("[t]\n"), "");
    }

    #[test]
    fn test_format_empty_table_kept_on_request() {
        let config = FormatConfig::new().with_keep_empty(true);
        assert_eq!(fmt_with("[t]\n", config), "[t]\n\n");
    }

    // ==================== value emission tests ====================

    #[test]
    fn test_literals_pass_through_by_default() {
        let out = fmt("a = 0xff\nb = 1_000\nc = 1979-05-27T00:32:00-07:00\n");
        assert!(out.contains("a = 0xff"));
        assert!(out.contains("b = 1_000"));
        assert!(out.contains("c = 1979-05-27T00:32:00-07:00"));
    }

    #[test]
    fn test_int_rebase_rule() {
        let config = FormatConfig::new().with_int_base(IntBase::Hex);
        assert_eq!(fmt_with("x = 255\n", config), "x = 0xff\n\n");
    }

    #[test]
    fn test_float_notation_rule() {
        let config = FormatConfig::new().with_float_notation(FloatNotation::Scientific);
        assert_eq!(fmt_with("x = 250.0\n", config), "x = 2.5e2\n\n");
    }

    #[test]
    fn test_underscore_rule() {
        let config = FormatConfig::new().with_underscore_every(3);
        assert_eq!(fmt_with("x = 1234567\n", config), "x = 1_234_567\n\n");
    }

    #[test]
    fn test_time_rule() {
        let config = FormatConfig::new().with_time(0, true);
        assert_eq!(
            fmt_with("t = 1979-05-27T00:32:00-07:00\n", config),
            "t = 1979-05-27T07:32:00Z\n\n"
        );
    }

    #[test]
    fn test_date_and_time_pass_through_time_rule() {
        let config = FormatConfig::new().with_time(3, true);
        let out = fmt_with("d = 1979-05-27\nt = 07:32:00\n", config);
        assert!(out.contains("d = 1979-05-27"));
        assert!(out.contains("t = 07:32:00"));
    }

    #[test]
    fn test_string_flavors_preserved() {
        let out = fmt("a = \"basic\"\nb = 'literal'\n");
        assert!(out.contains("a = \"basic\""));
        assert!(out.contains("b = 'literal'"));
    }

    #[test]
    fn test_multiline_string_emission() {
        let out = fmt("a = \"\"\"\nline one\nline two\"\"\"\n");
        assert!(out.contains("\"\"\"\nline one\nline two\"\"\""));
    }

    #[test]
    fn test_raw_rule_reemits_source_span() {
        let config = FormatConfig::new().with_raw(true).with_int_base(IntBase::Dec);
        assert_eq!(fmt_with("x = 0xff\n", config), "x = 0xff\n\n");
    }

    // ==================== array layout tests ====================

    #[test]
    fn test_array_single_line_preserved() {
        assert_eq!(fmt("a = [1, 2, 3]\n"), "a = [1, 2, 3]\n\n");
    }

    #[test]
    fn test_array_multiline_preserved() {
        assert_eq!(fmt("a = [\n1,\n2,\n]\n"), "a = [\n\t1,\n\t2,\n]\n\n");
    }

    #[test]
    fn test_array_forced_single() {
        let config = FormatConfig::new().with_array_layout(ArrayLayout::Single);
        assert_eq!(fmt_with("a = [\n1,\n2,\n]\n", config), "a = [1, 2]\n\n");
    }

    #[test]
    fn test_array_forced_multi_with_spaces() {
        let config = FormatConfig::new()
            .with_array_layout(ArrayLayout::Multi)
            .with_indent(2);
        assert_eq!(fmt_with("a = [1, 2]\n", config), "a = [\n  1,\n  2,\n]\n\n");
    }

    #[test]
    fn test_single_element_array_stays_inline() {
        let config = FormatConfig::new().with_array_layout(ArrayLayout::Multi);
        assert_eq!(fmt_with("a = [1]\n", config), "a = [1]\n\n");
    }

    #[test]
    fn test_inline_table_emission() {
        assert_eq!(fmt("p = { x = 1, y = 2 }\n"), "p = {x = 1, y = 2}\n\n");
    }

    #[test]
    fn test_inline_table_forces_single_arrays() {
        let config = FormatConfig::new().with_array_layout(ArrayLayout::Multi);
        assert_eq!(
            fmt_with("p = { a = [1, 2] }\n", config),
            "p = {a = [1, 2]}\n\n"
        );
    }

    #[test]
    fn test_dotted_inline_reemitted_nested() {
        assert_eq!(fmt("p = { a.b = 1 }\n"), "p = {a = {b = 1}}\n\n");
    }

    // ==================== comment tests ====================

    #[test]
    fn test_comments_retained() {
        assert_eq!(
            fmt("# above\na = 1 # after\n"),
            "# above\na = 1 # after\n\n"
        );
    }

    #[test]
    fn test_comments_dropped_when_disabled() {
        let config = FormatConfig::new().with_comments(false);
        assert_eq!(fmt_with("# above\na = 1 # after\n", config), "a = 1\n\n");
    }

    #[test]
    fn test_comments_in_multiline_arrays() {
        let out = fmt("a = [\n# first\n1, # one\n2,\n]\n");
        assert!(out.contains("\t# first\n"));
        assert!(out.contains("\t1, # one\n"));
    }

    // ==================== layout rule tests ====================

    #[test]
    fn test_crlf_rule() {
        let config = FormatConfig::new().with_eol(LineEnding::Crlf);
        assert_eq!(fmt_with("a = 1\n", config), "a = 1\r\n\r\n");
    }

    #[test]
    fn test_nest_rule_indents_subtables() {
        let config = FormatConfig::new().with_nest(true).with_indent(2);
        assert_eq!(
            fmt_with("[a]\nx = 1\n[a.b]\ny = 2\n", config),
            "[a]\nx = 1\n\n  [a.b]\n  y = 2\n\n"
        );
    }

    // ==================== promotion tests ====================

    #[test]
    fn test_promote_inline_table() {
        let config = FormatConfig::new().with_promote_inline(true);
        assert_eq!(
            fmt_with("[s]\np = { x = 1 }\n", config),
            "[s.p]\nx = 1\n\n"
        );
    }

    #[test]
    fn test_promote_keeps_remaining_options() {
        let config = FormatConfig::new().with_promote_inline(true);
        assert_eq!(
            fmt_with("[s]\na = 1\np = { x = 1 }\n", config),
            "[s]\na = 1\n\n[s.p]\nx = 1\n\n"
        );
    }

    #[test]
    fn test_promote_array_of_inline_tables() {
        let config = FormatConfig::new().with_promote_inline(true);
        let out = fmt_with("[s]\nitems = [{ n = 1 }, { n = 2 }]\n", config);
        assert_eq!(out, "[[s.items]]\nn = 1\n\n[[s.items]]\nn = 2\n\n");
    }

    #[test]
    fn test_promote_mixed_array_uses_ordinal_key() {
        let config = FormatConfig::new().with_promote_inline(true);
        assert_eq!(
            fmt_with("[s]\nmixed = [1, { n = 2 }]\n", config),
            "[s]\nmixed = [1]\n\n[[s.\"#0\".mixed]]\nn = 2\n\n"
        );
    }

    #[test]
    fn test_promote_is_idempotent() {
        let config = FormatConfig::new().with_promote_inline(true);
        let once = fmt_with("[s]\na = 1\np = { x = 1 }\nmixed = [1, { n = 2 }]\n", config.clone());
        let doc = parse(once.as_bytes()).unwrap();
        let twice = Formatter::new(config).format(&doc).unwrap();
        assert_eq!(once, twice);
    }
}
