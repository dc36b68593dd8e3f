// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Scope-aware tree helpers shared by the analyzers

use sqlscope_ir::{Node, NodeKind};

/// Nodes of `root` that are not inside a `Subquery`, in pre-order
///
/// A `Subquery` node itself is included when its parent is outside every
/// subquery; its descendants are not.
pub fn outside_subqueries(root: &Node) -> Vec<&Node> {
    fn visit<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
        out.push(node);
        if node.kind == NodeKind::Subquery {
            return;
        }
        for child in &node.children {
            visit(child, out);
        }
    }

    let mut out = Vec::new();
    visit(root, &mut out);
    out
}

/// The `Select` a query-shaped node evaluates first
///
/// For a `Select` this is the node itself, for a `Subquery` or set
/// operation the shallowest `Select` beneath it. `UPDATE` and `DELETE` have
/// no query body.
pub fn query_body(node: &Node) -> Option<&Node> {
    match node.kind {
        NodeKind::Select => Some(node),
        NodeKind::Update | NodeKind::Delete => None,
        _ => node.find_first(NodeKind::Select),
    }
}

/// `WHERE` clause that filters `node` itself
///
/// The statement's own clause for `UPDATE` and `DELETE`, otherwise the one
/// of its query body.
pub fn own_where(node: &Node) -> Option<&Node> {
    match node.kind {
        NodeKind::Update | NodeKind::Delete => node.child(NodeKind::Where),
        _ => query_body(node).and_then(|select| select.child(NodeKind::Where)),
    }
}

/// Strip any number of enclosing parentheses
pub fn unparen(mut node: &Node) -> &Node {
    while node.kind == NodeKind::Paren && node.children.len() == 1 {
        node = &node.children[0];
    }
    node
}

/// Lowercased qualifier of a column reference
pub fn qualifier_of(node: &Node) -> Option<String> {
    node.qualifier.as_deref().map(str::to_ascii_lowercase)
}

/// Truncate to at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
