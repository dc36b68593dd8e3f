// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Optimization hints and informational rules

use super::helpers::{fire_if, integer_value, operands};
use crate::rule::{CheckResult, RuleCategory, RuleSpec, Severity};
use sqlscope_context::TraversalContext;
use sqlscope_ir::{Node, NodeKind};
use sqlscope_semantic::tree::query_body;

/// Get all builtin optimization and info rules
pub fn all_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new("SQL-OPT-001", "IN Subquery Rewrite", &[NodeKind::In], in_subquery)
            .with_severity(Severity::Optimization, 2)
            .with_category(RuleCategory::Optimization)
            .with_description("IN (SELECT ...) can often run faster as EXISTS or a semi-join")
            .with_suggestion("Consider EXISTS with a correlated condition, or a JOIN"),
        RuleSpec::new(
            "SQL-OPT-002",
            "COUNT For Existence",
            &[NodeKind::Gt, NodeKind::Gte, NodeKind::Neq],
            count_for_existence,
        )
        .with_severity(Severity::Optimization, 3)
        .with_category(RuleCategory::Optimization)
        .with_description("Counting rows only to test for existence scans more than needed")
        .with_suggestion("Use EXISTS (SELECT 1 ...)"),
        RuleSpec::new("SQL-INFO-001", "Recursive CTE", &[NodeKind::With], recursive_cte)
            .with_severity(Severity::Info, 0)
            .with_category(RuleCategory::Info)
            .with_description("Recursive CTEs need a termination condition")
            .with_suggestion("Make sure the recursive member converges"),
    ]
}

fn in_subquery<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(
        !node.negated && node.child(NodeKind::Subquery).is_some(),
        node,
        ctx,
    )
}

/// `(SELECT COUNT(..) ...)` compared against the threshold meaning "any row"
fn count_for_existence<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let threshold = match node.kind {
        NodeKind::Gte => 1,
        _ => 0,
    };
    let sides: Vec<&Node> = operands(node).collect();
    let [left, right] = sides.as_slice() else {
        return Ok(Vec::new());
    };
    let fired = (is_count_subquery(left) && integer_value(right) == Some(threshold))
        || (node.kind == NodeKind::Neq
            && is_count_subquery(right)
            && integer_value(left) == Some(threshold));
    fire_if(fired, node, ctx)
}

fn is_count_subquery(node: &Node) -> bool {
    node.kind == NodeKind::Subquery
        && query_body(node)
            .and_then(|select| select.child(NodeKind::Projection))
            .and_then(|projection| projection.children.first())
            .is_some_and(|item| item.kind == NodeKind::Count)
}

fn recursive_cte<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let recursive = node
        .text
        .get(..14)
        .is_some_and(|head| head.eq_ignore_ascii_case("WITH RECURSIVE"));
    fire_if(recursive, node, ctx)
}
