// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Node builders for tests that need a tree without going through the parser

use sqlscope_ir::{Node, NodeKind};

/// Helper functions for creating common node shapes
///
/// Text is rendered the way lowering renders it, so predicates that look at
/// node text behave the same on built and parsed trees.
pub struct NodeBuilder;

impl NodeBuilder {
    /// Column reference, optionally qualified
    pub fn column(qualifier: Option<&str>, name: &str) -> Node {
        match qualifier {
            Some(q) => Node::new(NodeKind::Column, format!("{q}.{name}"))
                .with_name(name)
                .with_qualifier(q),
            None => Node::new(NodeKind::Column, name).with_name(name),
        }
    }

    /// Table reference, optionally aliased
    pub fn table(name: &str, alias: Option<&str>) -> Node {
        match alias {
            Some(a) => Node::new(NodeKind::Table, format!("{name} {a}"))
                .with_name(name)
                .with_alias(a),
            None => Node::new(NodeKind::Table, name).with_name(name),
        }
    }

    pub fn number(value: i64) -> Node {
        Node::new(NodeKind::NumberLiteral, value.to_string())
    }

    pub fn string(value: &str) -> Node {
        Node::new(NodeKind::StringLiteral, format!("'{value}'"))
    }

    /// Binary node `left <op> right` of the given kind
    pub fn binary(kind: NodeKind, op: &str, left: Node, right: Node) -> Node {
        Node::new(kind, format!("{} {op} {}", left.text, right.text))
            .with_child(left)
            .with_child(right)
    }

    pub fn eq(left: Node, right: Node) -> Node {
        Self::binary(NodeKind::Eq, "=", left, right)
    }

    /// Left-nested `AND` chain over `conditions`
    pub fn and(conditions: impl IntoIterator<Item = Node>) -> Option<Node> {
        conditions
            .into_iter()
            .reduce(|left, right| Self::binary(NodeKind::And, "AND", left, right))
    }

    /// `SELECT <projection> FROM <tables> [WHERE <condition>]`
    pub fn select(projection: Vec<Node>, tables: Vec<Node>, condition: Option<Node>) -> Node {
        let projection_text = join_text(&projection);
        let from_text = join_text(&tables);
        let mut text = format!("SELECT {projection_text} FROM {from_text}");
        let mut select = Node::new(NodeKind::Select, String::new())
            .with_child(Node::new(NodeKind::Projection, projection_text).with_children(projection))
            .with_child(Node::new(NodeKind::From, from_text).with_children(tables));
        if let Some(condition) = condition {
            text.push_str(&format!(" WHERE {}", condition.text));
            select = select
                .with_child(Node::new(NodeKind::Where, condition.text.clone()).with_child(condition));
        }
        select.text = text;
        select
    }

    /// Parenthesized subquery around `query`
    pub fn subquery(query: Node) -> Node {
        Node::new(NodeKind::Subquery, format!("({})", query.text)).with_child(query)
    }
}

fn join_text(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|n| n.text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_shape() {
        let select = NodeBuilder::select(
            vec![NodeBuilder::column(Some("u"), "id")],
            vec![NodeBuilder::table("users", Some("u"))],
            Some(NodeBuilder::eq(
                NodeBuilder::column(Some("u"), "id"),
                NodeBuilder::number(1),
            )),
        );

        assert_eq!(select.text, "SELECT u.id FROM users u WHERE u.id = 1");
        assert_eq!(select.children.len(), 3);
        assert!(select.child(NodeKind::Where).is_some());
        assert_eq!(
            select.find_first(NodeKind::Table).and_then(|t| t.alias_or_name()),
            Some("u")
        );
    }

    #[test]
    fn test_and_chain() {
        let chain = NodeBuilder::and([
            NodeBuilder::column(None, "a"),
            NodeBuilder::column(None, "b"),
            NodeBuilder::column(None, "c"),
        ])
        .unwrap();
        assert_eq!(chain.kind, NodeKind::And);
        assert_eq!(chain.text, "a AND b AND c");
        assert_eq!(chain.children[0].kind, NodeKind::And);
        assert!(NodeBuilder::and([]).is_none());
    }
}
