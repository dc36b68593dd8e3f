// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Node tree
//!
//! A [`Node`] is one element of a lowered SQL statement. It carries:
//! - its [`NodeKind`]
//! - the SQL text it was rendered from
//! - the 1-based source line it starts on (`0` when unknown)
//! - kind-specific attributes (`name`, `alias`, `qualifier`, `negated`, `distinct`)
//! - its children, in source order
//!
//! ## Examples
//!
//! ```
//! use sqlscope_ir::{Node, NodeKind};
//!
//! let select = Node::new(NodeKind::Select, "SELECT id FROM users")
//!     .with_child(Node::new(NodeKind::Projection, "id")
//!         .with_child(Node::new(NodeKind::Column, "id").with_name("id")))
//!     .with_child(Node::new(NodeKind::From, "users")
//!         .with_child(Node::new(NodeKind::Table, "users").with_name("users")));
//!
//! assert_eq!(select.find_all(NodeKind::Column).len(), 1);
//! assert_eq!(select.find_first(NodeKind::Table).and_then(|t| t.name.as_deref()), Some("users"));
//! ```

use crate::kind::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A node in the lowered SQL tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,

    /// SQL text of the node
    pub text: String,

    /// Table, column, function, CTE or join-type name
    pub name: Option<String>,

    /// Alias bound by this node (`AS x`)
    pub alias: Option<String>,

    /// Table qualifier of a column reference (`t` in `t.id`)
    pub qualifier: Option<String>,

    /// `NOT IN`, `NOT EXISTS`, `IS NOT`, `NOT LIKE`, `NOT BETWEEN`
    pub negated: bool,

    /// `COUNT(DISTINCT ..)`, `UNION` without `ALL`
    pub distinct: bool,

    /// 1-based start line, `0` when unknown
    pub line: usize,

    pub children: Vec<Node>,
}

impl Node {
    /// Create a leaf node
    pub fn new(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            name: None,
            alias: None,
            qualifier: None,
            negated: false,
            distinct: false,
            line: 0,
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    pub fn with_negated(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Alias if present, otherwise the name
    pub fn alias_or_name(&self) -> Option<&str> {
        self.alias.as_deref().or(self.name.as_deref())
    }

    /// Name a column qualifier uses to refer to this relation
    ///
    /// The alias when present, otherwise the last part of a dotted name
    /// without quotes, so `sch.orders` binds as `orders`.
    pub fn binding(&self) -> Option<&str> {
        if let Some(alias) = self.alias.as_deref() {
            return Some(alias);
        }
        let name = self.name.as_deref()?;
        let last = name.rsplit('.').next().unwrap_or(name);
        Some(last.trim_matches(|c: char| matches!(c, '"' | '`' | '[' | ']')))
    }

    /// Whether this node is of `kind` or belongs to the category `kind`
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind.is_a(kind)
    }

    /// Direct children of the given kind
    pub fn children_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |c| c.is(kind))
    }

    /// First direct child of the given kind
    pub fn child(&self, kind: NodeKind) -> Option<&Node> {
        self.children_of_kind(kind).next()
    }

    /// Pre-order traversal of this node and all descendants
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Breadth-first search for the first descendant (or self) of `kind`
    pub fn find_first(&self, kind: NodeKind) -> Option<&Node> {
        let mut queue = VecDeque::from([self]);
        while let Some(node) = queue.pop_front() {
            if node.is(kind) {
                return Some(node);
            }
            queue.extend(node.children.iter());
        }
        None
    }

    /// Every descendant (or self) of `kind`, in pre-order
    pub fn find_all(&self, kind: NodeKind) -> Vec<&Node> {
        self.walk().filter(|n| n.is(kind)).collect()
    }

    /// Whether any strict descendant is of `kind`
    pub fn contains(&self, kind: NodeKind) -> bool {
        self.children.iter().any(|c| c.walk().any(|n| n.is(kind)))
    }
}

/// Pre-order iterator over a node tree
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::new(NodeKind::Select, "SELECT a FROM t WHERE a IN (SELECT b FROM u)")
            .with_child(
                Node::new(NodeKind::Projection, "a")
                    .with_child(Node::new(NodeKind::Column, "a").with_name("a")),
            )
            .with_child(
                Node::new(NodeKind::From, "t")
                    .with_child(Node::new(NodeKind::Table, "t").with_name("t")),
            )
            .with_child(
                Node::new(NodeKind::Where, "a IN (SELECT b FROM u)").with_child(
                    Node::new(NodeKind::In, "a IN (SELECT b FROM u)")
                        .with_child(Node::new(NodeKind::Column, "a").with_name("a"))
                        .with_child(
                            Node::new(NodeKind::Subquery, "(SELECT b FROM u)").with_child(
                                Node::new(NodeKind::Select, "SELECT b FROM u").with_child(
                                    Node::new(NodeKind::From, "u").with_child(
                                        Node::new(NodeKind::Table, "u").with_name("u"),
                                    ),
                                ),
                            ),
                        ),
                ),
            )
    }

    #[test]
    fn test_walk_is_preorder() {
        let root = sample();
        let kinds: Vec<NodeKind> = root.walk().map(|n| n.kind).take(4).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Select,
                NodeKind::Projection,
                NodeKind::Column,
                NodeKind::From
            ]
        );
    }

    #[test]
    fn test_find_first_is_breadth_first() {
        let root = sample();
        let table = root.find_first(NodeKind::Table).unwrap();
        assert_eq!(table.name.as_deref(), Some("t"));
    }

    #[test]
    fn test_find_all_matches_categories() {
        let root = sample();
        assert_eq!(root.find_all(NodeKind::Query).len(), 2);
        assert_eq!(root.find_all(NodeKind::Predicate).len(), 1);
    }

    #[test]
    fn test_alias_or_name() {
        let t = Node::new(NodeKind::Table, "orders o").with_name("orders");
        assert_eq!(t.alias_or_name(), Some("orders"));
        let t = t.with_alias("o");
        assert_eq!(t.alias_or_name(), Some("o"));
    }

    #[test]
    fn test_binding_drops_schema() {
        let t = Node::new(NodeKind::Table, "sch.orders").with_name("sch.orders");
        assert_eq!(t.binding(), Some("orders"));
        let quoted = Node::new(NodeKind::Table, "\"sch\".\"Orders\"").with_name("\"sch\".\"Orders\"");
        assert_eq!(quoted.binding(), Some("Orders"));
        assert_eq!(t.with_alias("o").binding(), Some("o"));
        assert_eq!(Node::new(NodeKind::Subquery, "(SELECT 1)").binding(), None);
    }

    #[test]
    fn test_contains_excludes_self() {
        let root = sample();
        assert!(root.contains(NodeKind::Subquery));
        let leaf = Node::new(NodeKind::Subquery, "(x)");
        assert!(!leaf.contains(NodeKind::Subquery));
    }
}
