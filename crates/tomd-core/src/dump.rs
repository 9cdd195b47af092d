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

//! Structural dump of a parsed tree, for debugging and golden tests.
//!
//! The output lists tables and options in declaration order with their token
//! type names and positions:
//!
//! ```text
//! table(<0:0>)[
//!   option(pos: 1:1, key: a, value: integer(1)),
//! ],
//! ```

use std::fmt::Write;

use crate::document::{Entry, Node, Table};

/// Renders `table` (usually a document root) as an indented listing.
pub fn dump(table: &Table) -> String {
    let mut out = String::new();
    dump_table(table, 0, &mut out);
    out
}

fn indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn dump_table(table: &Table, level: usize, out: &mut String) {
    indent(level, out);
    let _ = writeln!(
        out,
        "table({}<{}:{}>)[",
        table.key.literal,
        table.pos().line(),
        table.pos().column()
    );
    for entry in table.entries() {
        dump_entry(entry, level + 1, out);
    }
    for sub in table.tables() {
        dump_table(sub, level + 1, out);
    }
    indent(level, out);
    out.push_str("],\n");
}

fn dump_entry(entry: &Entry, level: usize, out: &mut String) {
    indent(level, out);
    let _ = writeln!(
        out,
        "option(pos: {}:{}, key: {}, value: {}),",
        entry.pos().line(),
        entry.pos().column(),
        entry.key.literal,
        dump_value(&entry.value)
    );
}

fn dump_value(node: &Node) -> String {
    match node {
        Node::Literal(l) => format!("{}({})", l.token.kind.name(), l.token.literal),
        Node::Array(a) => {
            let mut buf = String::from("array[");
            for n in &a.nodes {
                buf.push_str(&dump_value(n));
                buf.push_str(", ");
            }
            buf.push(']');
            buf
        }
        Node::Table(t) => {
            let mut buf = String::from("inline{");
            for entry in t.entries() {
                buf.push_str(&entry.key.literal);
                buf.push('=');
                buf.push_str(&dump_value(&entry.value));
                buf.push_str(", ");
            }
            buf.push('}');
            buf
        }
        Node::Entry(e) => format!("option({})", e.key.literal),
    }
}
