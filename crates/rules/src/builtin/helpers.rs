// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Node predicates shared by the builtin rules

use crate::rule::{CheckResult, Match};
use sqlscope_context::TraversalContext;
use sqlscope_ir::{Node, NodeKind};
use sqlscope_semantic::CorrelationAnalyzer;
use sqlscope_semantic::tree::{qualifier_of, unparen};

/// One match on `node` when `fired`, none otherwise
pub fn fire_if<'a>(fired: bool, node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    Ok(if fired {
        vec![Match::new(node, ctx)]
    } else {
        Vec::new()
    })
}

/// Fires on every node that passes the pre-filter
pub fn always<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(true, node, ctx)
}

/// Operands of a node with parentheses stripped
pub fn operands(node: &Node) -> impl Iterator<Item = &Node> {
    node.children.iter().map(unparen)
}

pub fn has_column_operand(node: &Node) -> bool {
    operands(node).any(|c| c.kind == NodeKind::Column)
}

/// Integer value of a number literal
pub fn integer_value(node: &Node) -> Option<u64> {
    let node = unparen(node);
    if node.kind != NodeKind::NumberLiteral {
        return None;
    }
    node.text.trim().parse().ok()
}

/// Text of a string literal without its quotes
pub fn string_value(node: &Node) -> Option<&str> {
    let node = unparen(node);
    if node.kind != NodeKind::StringLiteral {
        return None;
    }
    let text = node.text.trim();
    let quoted = text
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .or_else(|| text.strip_prefix('"').and_then(|t| t.strip_suffix('"')));
    Some(quoted.unwrap_or(text))
}

/// Whether a `CASE` node has an `ELSE` branch
pub fn case_has_else(node: &Node) -> bool {
    node.child(NodeKind::Else).is_some()
}

/// Whether a subquery uses a qualifier it does not bind itself
///
/// Qualifiers always bind somewhere, so a free one belongs to an enclosing
/// query.
pub fn references_enclosing_query(subquery: &Node) -> bool {
    let local = CorrelationAnalyzer::local_aliases(subquery);
    subquery
        .walk()
        .filter(|n| n.kind == NodeKind::Column)
        .filter_map(qualifier_of)
        .any(|q| !local.contains(&q))
}

/// Whether an expression is a literal that is always true
pub fn is_tautology(node: &Node) -> bool {
    let node = unparen(node);
    match node.kind {
        NodeKind::BooleanLiteral => node.text.eq_ignore_ascii_case("true"),
        NodeKind::Eq => {
            let sides: Vec<&Node> = operands(node).collect();
            matches!(
                sides.as_slice(),
                [left, right] if left.kind.is_a(NodeKind::Literal)
                    && left.kind == right.kind
                    && left.kind != NodeKind::Null
                    && left.text == right.text
            )
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_value_strips_quotes() {
        let node = Node::new(NodeKind::StringLiteral, "'%abc'");
        assert_eq!(string_value(&node), Some("%abc"));
        assert_eq!(string_value(&Node::new(NodeKind::NumberLiteral, "1")), None);
    }

    #[test]
    fn test_case_has_else() {
        let searched = Node::new(NodeKind::Case, "CASE WHEN a THEN 1 END")
            .with_child(Node::new(NodeKind::Column, "a"))
            .with_child(Node::new(NodeKind::NumberLiteral, "1"));
        assert!(!case_has_else(&searched));

        let simple = Node::new(NodeKind::Case, "CASE x WHEN 1 THEN 2 ELSE 3 END")
            .with_child(Node::new(NodeKind::Column, "x"))
            .with_child(Node::new(NodeKind::NumberLiteral, "1"))
            .with_child(Node::new(NodeKind::NumberLiteral, "2"))
            .with_child(
                Node::new(NodeKind::Else, "3").with_child(Node::new(NodeKind::NumberLiteral, "3")),
            );
        assert!(case_has_else(&simple));
    }

    #[test]
    fn test_tautology() {
        let one_eq_one = Node::new(NodeKind::Eq, "1 = 1")
            .with_child(Node::new(NodeKind::NumberLiteral, "1"))
            .with_child(Node::new(NodeKind::NumberLiteral, "1"));
        assert!(is_tautology(&one_eq_one));

        let one_eq_two = Node::new(NodeKind::Eq, "1 = 2")
            .with_child(Node::new(NodeKind::NumberLiteral, "1"))
            .with_child(Node::new(NodeKind::NumberLiteral, "2"));
        assert!(!is_tautology(&one_eq_two));
        assert!(is_tautology(&Node::new(NodeKind::BooleanLiteral, "TRUE")));
    }
}
