// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Style rules

use super::helpers::{fire_if, integer_value};
use crate::rule::{CheckResult, Match, RuleCategory, RuleSpec, Severity};
use sqlscope_context::TraversalContext;
use sqlscope_ir::{Node, NodeKind};

/// Get all builtin style rules
pub fn all_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new("SQL-STYLE-001", "Implicit Comma Join", &[NodeKind::From], comma_join)
            .with_severity(Severity::Low, 5)
            .with_category(RuleCategory::Style)
            .with_description("Comma-separated FROM items hide the join condition in WHERE")
            .with_suggestion("Use explicit JOIN ... ON syntax"),
        RuleSpec::new("SQL-STYLE-002", "Ordinal ORDER BY", &[NodeKind::Ordered], ordinal_order)
            .with_severity(Severity::Low, 3)
            .with_category(RuleCategory::Style)
            .with_description("ORDER BY a column position breaks when the select list changes")
            .with_suggestion("Order by column names or aliases")
            .with_should_check(|_, ctx| !ctx.in_window),
        RuleSpec::new("SQL-STYLE-003", "Ordinal GROUP BY", &[NodeKind::Group], ordinal_group)
            .with_severity(Severity::Low, 3)
            .with_category(RuleCategory::Style)
            .with_description("GROUP BY a column position breaks when the select list changes")
            .with_suggestion("Group by column names or expressions"),
    ]
}

fn comma_join<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(node.children.len() > 1, node, ctx)
}

fn ordinal_order<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let ordinal = node.children.first().and_then(integer_value).is_some();
    fire_if(ordinal, node, ctx)
}

fn ordinal_group<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    Ok(node
        .children
        .iter()
        .filter(|expr| integer_value(expr).is_some())
        .map(|expr| Match::new(node, ctx).with_matched_text(format!("GROUP BY {}", expr.text)))
        .take(1)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_group() {
        let ctx = TraversalContext::root("");
        let group = Node::new(NodeKind::Group, "1, b")
            .with_child(Node::new(NodeKind::NumberLiteral, "1"))
            .with_child(Node::new(NodeKind::Column, "b"));
        let matches = ordinal_group(&group, &ctx).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_text, "GROUP BY 1");

        let named = Node::new(NodeKind::Group, "a").with_child(Node::new(NodeKind::Column, "a"));
        assert!(ordinal_group(&named, &ctx).unwrap().is_empty());
    }
}
