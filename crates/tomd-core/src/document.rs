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

//! The document tree and its structural invariants.
//!
//! A parsed document is a [`Table`] whose children are [`Node`]s. Tables keep
//! their children sorted by key so lookups are a binary search, while the
//! declaration order needed for faithful re-emission is recovered from token
//! positions ([`Table::entries`] / [`Table::tables`]).
//!
//! The insertion methods enforce the TOML uniqueness rules: a key is either a
//! table or an option, never both; duplicate keys are rejected at insertion;
//! implicit tables (created as dotted-path ancestors) may later be promoted
//! to regular by an explicit header but never redefined; inline tables are
//! sealed once parsed; array-of-tables grow only through `[[header]]`
//! append.

use crate::error::{TomlError, TomlResult};
use crate::lex::{Position, Token, TokenKind};

/// Pre/post comment pair attached to a node.
///
/// `pre` holds the comment lines above the node joined by `\n`; `post` holds
/// the trailing comment on the node's own line. Empty strings mean absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comment {
    pub pre: String,
    pub post: String,
}

impl Comment {
    pub fn new(pre: impl Into<String>, post: impl Into<String>) -> Self {
        Self {
            pre: pre.into(),
            post: post.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }
}

/// What a [`Table`] is, structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableKind {
    /// Created only as a dotted-path ancestor; an explicit `[header]` may
    /// promote it to `Regular`.
    Implicit,
    /// Defined by a `[header]` (or the synthesized root).
    Regular,
    /// The container grown by `[[header]]` blocks; children are `Item`s.
    ArrayOfTables,
    /// One element of an array of tables.
    Item,
    /// A `{...}` value; sealed once parsed.
    Inline,
}

/// A primitive value: one token plus its comments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    pub token: Token,
    pub comment: Comment,
}

impl Literal {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            comment: Comment::default(),
        }
    }

    pub fn pos(&self) -> Position {
        self.token.pos
    }
}

/// A key/value binding inside a table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    pub key: Token,
    pub value: Node,
    pub comment: Comment,
}

impl Entry {
    pub fn new(key: Token, value: Node) -> Self {
        Self {
            key,
            value,
            comment: Comment::default(),
        }
    }

    pub fn pos(&self) -> Position {
        self.key.pos
    }
}

/// An array value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Array {
    /// Position of the opening `[`.
    pub pos: Position,
    pub nodes: Vec<Node>,
    pub comment: Comment,
}

impl Array {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            nodes: Vec::new(),
            comment: Comment::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `true` when the array spanned several source lines, which the `mixed`
    /// formatter layout preserves.
    pub fn is_multiline(&self) -> bool {
        self.nodes
            .iter()
            .any(|n| n.pos().line() > self.pos.line())
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Literal(Literal),
    Entry(Box<Entry>),
    Array(Array),
    Table(Table),
}

impl Node {
    pub fn pos(&self) -> Position {
        match self {
            Self::Literal(l) => l.pos(),
            Self::Entry(e) => e.pos(),
            Self::Array(a) => a.pos,
            Self::Table(t) => t.pos(),
        }
    }

    pub fn comment(&self) -> &Comment {
        match self {
            Self::Literal(l) => &l.comment,
            Self::Entry(e) => &e.comment,
            Self::Array(a) => &a.comment,
            Self::Table(t) => &t.comment,
        }
    }

    pub fn set_comment(&mut self, comment: Comment) {
        match self {
            Self::Literal(l) => l.comment = comment,
            Self::Entry(e) => e.comment = comment,
            Self::Array(a) => a.comment = comment,
            Self::Table(t) => t.comment = comment,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            Self::Entry(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Structural equality over values: token kinds and literals, array
    /// elements, table children. Positions, raw spans, comments, and the
    /// implicit/regular distinction are not part of the comparison.
    pub fn semantic_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => {
                a.token.kind == b.token.kind && a.token.literal == b.token.literal
            }
            (Self::Entry(a), Self::Entry(b)) => {
                a.key.literal == b.key.literal && a.value.semantic_eq(&b.value)
            }
            (Self::Array(a), Self::Array(b)) => {
                a.nodes.len() == b.nodes.len()
                    && a.nodes
                        .iter()
                        .zip(b.nodes.iter())
                        .all(|(x, y)| x.semantic_eq(y))
            }
            (Self::Table(a), Self::Table(b)) => a.semantic_eq(b),
            // a subtable is equivalent to an entry whose value is a table
            // with the same children (dotted keys inside inline tables
            // re-emit as nested inline tables)
            (Self::Entry(e), Self::Table(t)) | (Self::Table(t), Self::Entry(e)) => {
                e.key.literal == t.key.literal
                    && matches!(&e.value, Node::Table(v) if v.children_semantic_eq(t))
            }
            _ => false,
        }
    }

    fn key_str(&self) -> &str {
        match self {
            Self::Entry(e) => &e.key.literal,
            Self::Table(t) => &t.key.literal,
            _ => "",
        }
    }
}

/// A table: the branching node of the tree.
///
/// Children are kept in key-sorted order; use [`entries`]/[`tables`] for the
/// declaration-order views the formatter emits.
///
/// [`entries`]: Table::entries
/// [`tables`]: Table::tables
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    pub key: Token,
    pub kind: TableKind,
    nodes: Vec<Node>,
    pub comment: Comment,
}

impl Table {
    pub fn new(key: Token, kind: TableKind) -> Self {
        Self {
            key,
            kind,
            nodes: Vec::new(),
            comment: Comment::default(),
        }
    }

    /// The synthesized document root: empty key, regular kind.
    pub fn root() -> Self {
        Self::new(Token::new(TokenKind::Ident, "", Position::default()), TableKind::Regular)
    }

    pub fn is_root(&self) -> bool {
        self.key.literal.is_empty() && self.key.pos.is_zero()
    }

    pub fn pos(&self) -> Position {
        self.key.pos
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children in key-sorted order.
    pub fn children(&self) -> &[Node] {
        &self.nodes
    }

    /// Looks up a direct child by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        let at = self.search(key);
        match self.nodes.get(at) {
            Some(node) if node.key_str() == key => Some(node),
            _ => None,
        }
    }

    /// Direct entries in declaration order.
    pub fn entries(&self) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self
            .nodes
            .iter()
            .filter_map(|n| n.as_entry())
            .collect();
        entries.sort_by_key(|e| e.pos().line());
        entries
    }

    /// Direct subtables in declaration order.
    pub fn tables(&self) -> Vec<&Table> {
        let mut tables: Vec<&Table> = self
            .nodes
            .iter()
            .filter_map(|n| n.as_table())
            .collect();
        tables.sort_by_key(|t| t.pos().line());
        tables
    }

    /// See [`Node::semantic_eq`]. Implicit and regular kinds compare equal;
    /// children are compared in key-sorted order, so declaration order and
    /// inline-table option order do not matter.
    pub fn semantic_eq(&self, other: &Table) -> bool {
        normalized(self.kind) == normalized(other.kind)
            && self.key.literal == other.key.literal
            && self.children_semantic_eq(other)
    }

    /// Child-by-child [`Node::semantic_eq`] in key-sorted order, ignoring
    /// the tables' own keys and kinds.
    pub fn children_semantic_eq(&self, other: &Table) -> bool {
        self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .iter()
                .zip(other.nodes.iter())
                .all(|(a, b)| a.semantic_eq(b))
    }

    /// First index whose key is not less than `key`.
    fn search(&self, key: &str) -> usize {
        self.nodes.partition_point(|n| n.key_str() < key)
    }

    /// Walks to (or creates) the subtable for one dotted-path segment.
    ///
    /// Missing segments become `Implicit` tables. An existing array of
    /// tables resolves to its last `Item`. Paths through options or sealed
    /// inline tables are rejected.
    pub fn retrieve(&mut self, key: &Token) -> TomlResult<&mut Table> {
        let at = self.search(&key.literal);
        let found = matches!(self.nodes.get(at), Some(n) if n.key_str() == key.literal);
        if found {
            return match &mut self.nodes[at] {
                Node::Entry(e) => {
                    if matches!(e.value, Node::Table(_)) {
                        Err(TomlError::inline_not_extensible(
                            format!("inline table '{}' cannot be extended", key.literal),
                            key.pos,
                        )
                        .with_first_definition(e.key.pos))
                    } else {
                        Err(TomlError::key_is_option(
                            format!("key '{}' is already an option", key.literal),
                            key.pos,
                        )
                        .with_first_definition(e.key.pos))
                    }
                }
                Node::Table(t) => match t.kind {
                    TableKind::Inline => Err(TomlError::inline_not_extensible(
                        format!("inline table '{}' cannot be extended", key.literal),
                        key.pos,
                    )
                    .with_first_definition(t.key.pos)),
                    TableKind::ArrayOfTables => match t.nodes.last_mut() {
                        Some(Node::Table(item)) => Ok(item),
                        // array-of-tables children are items by construction
                        _ => unreachable!("array of tables without items"),
                    },
                    _ => Ok(t),
                },
                _ => unreachable!("table children are entries or tables"),
            };
        }
        self.nodes
            .insert(at, Node::Table(Table::new(key.clone(), TableKind::Implicit)));
        match &mut self.nodes[at] {
            Node::Table(t) => Ok(t),
            _ => unreachable!("just inserted a table"),
        }
    }

    /// Binds an option into this table, rejecting duplicates and collisions.
    pub fn register_entry(&mut self, entry: Entry) -> TomlResult<()> {
        let at = self.search(&entry.key.literal);
        if let Some(node) = self.nodes.get(at) {
            if node.key_str() == entry.key.literal {
                return Err(match node {
                    Node::Entry(e) => TomlError::duplicate_key(
                        format!("option '{}' already exists", entry.key.literal),
                        entry.key.pos,
                    )
                    .with_first_definition(e.key.pos),
                    Node::Table(t) => TomlError::key_is_table(
                        format!("key '{}' is already a table", entry.key.literal),
                        entry.key.pos,
                    )
                    .with_first_definition(t.key.pos),
                    _ => TomlError::duplicate_key(
                        format!("key '{}' already exists", entry.key.literal),
                        entry.key.pos,
                    ),
                });
            }
        }
        self.nodes.insert(at, Node::Entry(Box::new(entry)));
        Ok(())
    }

    /// Inserts a table defined by a header, applying the merge rules:
    /// implicit tables are promoted by a regular header, items append to an
    /// existing array of tables, everything else collides.
    pub fn register_table(&mut self, table: Table) -> TomlResult<&mut Table> {
        let at = self.search(&table.key.literal);
        let found = matches!(self.nodes.get(at), Some(n) if n.key_str() == table.key.literal);
        if found {
            enum Action {
                Promote,
                Append,
            }
            let action = match &self.nodes[at] {
                Node::Entry(e) => {
                    return Err(if matches!(e.value, Node::Table(_)) {
                        TomlError::inline_not_extensible(
                            format!("inline table '{}' cannot be redefined", table.key.literal),
                            table.key.pos,
                        )
                        .with_first_definition(e.key.pos)
                    } else {
                        TomlError::key_is_option(
                            format!("key '{}' is already an option", table.key.literal),
                            table.key.pos,
                        )
                        .with_first_definition(e.key.pos)
                    });
                }
                Node::Table(existing) => match (existing.kind, table.kind) {
                    (TableKind::Implicit, TableKind::Regular) => Action::Promote,
                    (TableKind::ArrayOfTables, TableKind::Item) => Action::Append,
                    (_, TableKind::Item) => {
                        return Err(TomlError::invalid_array_append(
                            format!(
                                "key '{}' is not an array of tables",
                                table.key.literal
                            ),
                            table.key.pos,
                        )
                        .with_first_definition(existing.key.pos));
                    }
                    _ => {
                        return Err(TomlError::duplicate_key(
                            format!("table '{}' already exists", table.key.literal),
                            table.key.pos,
                        )
                        .with_first_definition(existing.key.pos));
                    }
                },
                _ => {
                    return Err(TomlError::duplicate_key(
                        format!("key '{}' already exists", table.key.literal),
                        table.key.pos,
                    ));
                }
            };
            return match (&mut self.nodes[at], action) {
                (Node::Table(existing), Action::Promote) => {
                    existing.key = table.key;
                    existing.kind = TableKind::Regular;
                    Ok(existing)
                }
                (Node::Table(existing), Action::Append) => {
                    existing.nodes.push(Node::Table(table));
                    match existing.nodes.last_mut() {
                        Some(Node::Table(item)) => Ok(item),
                        _ => unreachable!("just appended an item"),
                    }
                }
                _ => unreachable!("table children are entries or tables"),
            };
        }
        let node = if table.kind == TableKind::Item {
            let mut wrapper = Table::new(table.key.clone(), TableKind::ArrayOfTables);
            wrapper.nodes.push(Node::Table(table));
            wrapper
        } else {
            table
        };
        self.nodes.insert(at, Node::Table(node));
        match &mut self.nodes[at] {
            Node::Table(t) => {
                if t.kind == TableKind::ArrayOfTables {
                    match t.nodes.last_mut() {
                        Some(Node::Table(item)) => Ok(item),
                        _ => unreachable!("just inserted an item"),
                    }
                } else {
                    Ok(t)
                }
            }
            _ => unreachable!("just inserted a table"),
        }
    }

    /// Appends an item table without collision checks. Only meaningful on an
    /// `ArrayOfTables` container; items keep their append order.
    pub fn append_item(&mut self, item: Table) {
        self.nodes.push(Node::Table(item));
    }
}

fn normalized(kind: TableKind) -> TableKind {
    match kind {
        TableKind::Implicit => TableKind::Regular,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(literal: &str, line: usize) -> Token {
        Token::new(TokenKind::Ident, literal, Position::new(line, 1))
    }

    fn int(literal: &str, line: usize) -> Node {
        Node::Literal(Literal::new(Token::new(
            TokenKind::Integer,
            literal,
            Position::new(line, 5),
        )))
    }

    fn entry(name: &str, line: usize) -> Entry {
        Entry::new(key(name, line), int("1", line))
    }

    // ==================== sorted insertion tests ====================

    #[test]
    fn test_children_sorted_by_key() {
        let mut table = Table::root();
        table.register_entry(entry("zeta", 1)).unwrap();
        table.register_entry(entry("alpha", 2)).unwrap();
        table.register_entry(entry("mid", 3)).unwrap();
        let keys: Vec<&str> = table.children().iter().map(|n| n.key_str()).collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_entries_in_declaration_order() {
        let mut table = Table::root();
        table.register_entry(entry("zeta", 1)).unwrap();
        table.register_entry(entry("alpha", 2)).unwrap();
        let names: Vec<&str> = table
            .entries()
            .iter()
            .map(|e| e.key.literal.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_get_by_key() {
        let mut table = Table::root();
        table.register_entry(entry("b", 1)).unwrap();
        table.register_entry(entry("a", 2)).unwrap();
        assert!(table.get("a").is_some());
        assert!(table.get("b").is_some());
        assert!(table.get("c").is_none());
    }

    // ==================== duplicate rejection tests ====================

    #[test]
    fn test_duplicate_option_rejected() {
        let mut table = Table::root();
        table.register_entry(entry("a", 1)).unwrap();
        let err = table.register_entry(entry("a", 2)).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::DuplicateKey);
        assert_eq!(err.pos, Position::new(2, 1));
        assert_eq!(
            err.context.as_deref(),
            Some("first defined at line 1, column 1")
        );
    }

    #[test]
    fn test_option_over_table_rejected() {
        let mut table = Table::root();
        table
            .register_table(Table::new(key("a", 1), TableKind::Regular))
            .unwrap();
        let err = table.register_entry(entry("a", 2)).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::KeyIsTable);
    }

    #[test]
    fn test_table_over_option_rejected() {
        let mut table = Table::root();
        table.register_entry(entry("a", 1)).unwrap();
        let err = table
            .register_table(Table::new(key("a", 2), TableKind::Regular))
            .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::KeyIsOption);
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let mut table = Table::root();
        table
            .register_table(Table::new(key("a", 1), TableKind::Regular))
            .unwrap();
        let err = table
            .register_table(Table::new(key("a", 2), TableKind::Regular))
            .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::DuplicateKey);
    }

    // ==================== implicit promotion tests ====================

    #[test]
    fn test_retrieve_creates_implicit() {
        let mut table = Table::root();
        let sub = table.retrieve(&key("a", 1)).unwrap();
        assert_eq!(sub.kind, TableKind::Implicit);
    }

    #[test]
    fn test_implicit_promoted_to_regular() {
        let mut table = Table::root();
        table.retrieve(&key("a", 1)).unwrap().register_entry(entry("x", 1)).unwrap();
        let promoted = table
            .register_table(Table::new(key("a", 2), TableKind::Regular))
            .unwrap();
        assert_eq!(promoted.kind, TableKind::Regular);
        assert_eq!(promoted.len(), 1);
        assert_eq!(promoted.pos(), Position::new(2, 1));
    }

    #[test]
    fn test_implicit_cannot_become_array() {
        let mut table = Table::root();
        table.retrieve(&key("a", 1)).unwrap();
        let err = table
            .register_table(Table::new(key("a", 2), TableKind::Item))
            .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::InvalidArrayAppend);
    }

    #[test]
    fn test_regular_not_promotable_twice() {
        let mut table = Table::root();
        table
            .register_table(Table::new(key("a", 1), TableKind::Regular))
            .unwrap();
        assert!(table
            .register_table(Table::new(key("a", 2), TableKind::Regular))
            .is_err());
    }

    // ==================== array-of-tables tests ====================

    #[test]
    fn test_item_creates_array_container() {
        let mut table = Table::root();
        table
            .register_table(Table::new(key("x", 1), TableKind::Item))
            .unwrap();
        let container = table.get("x").and_then(|n| n.as_table()).unwrap();
        assert_eq!(container.kind, TableKind::ArrayOfTables);
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_items_append_in_order() {
        let mut table = Table::root();
        table
            .register_table(Table::new(key("x", 1), TableKind::Item))
            .unwrap();
        table
            .register_table(Table::new(key("x", 3), TableKind::Item))
            .unwrap();
        let container = table.get("x").and_then(|n| n.as_table()).unwrap();
        assert_eq!(container.len(), 2);
        let lines: Vec<usize> = container
            .tables()
            .iter()
            .map(|t| t.pos().line())
            .collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_retrieve_resolves_to_last_item() {
        let mut table = Table::root();
        table
            .register_table(Table::new(key("x", 1), TableKind::Item))
            .unwrap();
        table
            .register_table(Table::new(key("x", 3), TableKind::Item))
            .unwrap();
        let item = table.retrieve(&key("x", 4)).unwrap();
        assert_eq!(item.kind, TableKind::Item);
        assert_eq!(item.pos(), Position::new(3, 1));
    }

    #[test]
    fn test_regular_header_over_array_rejected() {
        let mut table = Table::root();
        table
            .register_table(Table::new(key("x", 1), TableKind::Item))
            .unwrap();
        let err = table
            .register_table(Table::new(key("x", 2), TableKind::Regular))
            .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::DuplicateKey);
    }

    #[test]
    fn test_item_over_regular_rejected() {
        let mut table = Table::root();
        table
            .register_table(Table::new(key("x", 1), TableKind::Regular))
            .unwrap();
        let err = table
            .register_table(Table::new(key("x", 2), TableKind::Item))
            .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::InvalidArrayAppend);
    }

    // ==================== inline sealing tests ====================

    fn inline_entry(name: &str, line: usize) -> Entry {
        let inner = Table::new(
            Token::new(TokenKind::Ident, "", Position::new(line, 5)),
            TableKind::Inline,
        );
        Entry::new(key(name, line), Node::Table(inner))
    }

    #[test]
    fn test_inline_value_not_extensible() {
        let mut table = Table::root();
        table.register_entry(inline_entry("t", 1)).unwrap();
        let err = table.retrieve(&key("t", 2)).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::InlineNotExtensible);
    }

    #[test]
    fn test_inline_value_not_redefinable() {
        let mut table = Table::root();
        table.register_entry(inline_entry("t", 1)).unwrap();
        let err = table
            .register_table(Table::new(key("t", 2), TableKind::Regular))
            .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::InlineNotExtensible);
    }

    #[test]
    fn test_plain_option_path_is_key_is_option() {
        let mut table = Table::root();
        table.register_entry(entry("a", 1)).unwrap();
        let err = table.retrieve(&key("a", 2)).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::KeyIsOption);
    }

    // ==================== misc tests ====================

    #[test]
    fn test_root_table() {
        let root = Table::root();
        assert!(root.is_root());
        assert_eq!(root.kind, TableKind::Regular);
        assert!(root.is_empty());
    }

    #[test]
    fn test_array_is_multiline() {
        let mut array = Array::new(Position::new(1, 5));
        array.nodes.push(int("1", 1));
        assert!(!array.is_multiline());
        array.nodes.push(int("2", 2));
        assert!(array.is_multiline());
    }

    #[test]
    fn test_comment_is_empty() {
        assert!(Comment::default().is_empty());
        assert!(!Comment::new("pre", "").is_empty());
        assert!(!Comment::new("", "post").is_empty());
    }

    #[test]
    fn test_semantic_eq_ignores_positions() {
        let mut a = Table::root();
        a.register_entry(entry("x", 1)).unwrap();
        let mut b = Table::root();
        b.register_entry(entry("x", 9)).unwrap();
        assert!(a.semantic_eq(&b));
    }

    #[test]
    fn test_semantic_eq_implicit_matches_regular() {
        let mut a = Table::root();
        a.retrieve(&key("t", 1)).unwrap();
        let mut b = Table::root();
        b.register_table(Table::new(key("t", 1), TableKind::Regular))
            .unwrap();
        assert!(a.semantic_eq(&b));
    }

    #[test]
    fn test_semantic_eq_detects_value_change() {
        let mut a = Table::root();
        a.register_entry(Entry::new(key("x", 1), int("1", 1))).unwrap();
        let mut b = Table::root();
        b.register_entry(Entry::new(key("x", 1), int("2", 1))).unwrap();
        assert!(!a.semantic_eq(&b));
    }

    #[test]
    fn test_node_accessors() {
        let node = int("42", 1);
        assert!(node.as_literal().is_some());
        assert!(node.as_table().is_none());
        assert_eq!(node.pos(), Position::new(1, 5));
    }
}
