// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Performance rules

use super::helpers::{
    always, fire_if, has_column_operand, integer_value, operands, references_enclosing_query,
    string_value,
};
use crate::rule::{CheckResult, Match, RuleSpec, Severity};
use sqlscope_context::TraversalContext;
use sqlscope_ir::{Node, NodeKind};

/// Lists longer than this are flagged
const MAX_IN_LIST: usize = 50;

/// Offsets larger than this are flagged
const MAX_OFFSET: u64 = 10_000;

/// Subquery nesting depth at which nesting is flagged
const DEEP_SUBQUERY_DEPTH: usize = 3;

/// Get all builtin performance rules
pub fn all_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new("SQL-PERF-001", "Select Star", &[NodeKind::Star], always)
            .with_severity(Severity::Medium, 10)
            .with_description("SELECT * reads every column, including ones the query never uses")
            .with_suggestion("List the columns the query needs")
            .with_should_check(|_, ctx| ctx.in_select_list && !ctx.in_exists),
        RuleSpec::new(
            "SQL-PERF-002",
            "Leading Wildcard LIKE",
            &[NodeKind::Like, NodeKind::ILike],
            leading_wildcard,
        )
        .with_severity(Severity::Medium, 10)
        .with_description("A LIKE pattern starting with a wildcard cannot use an index")
        .with_suggestion("Anchor the pattern, or use full-text search"),
        RuleSpec::new(
            "SQL-PERF-003",
            "Function On Filtered Column",
            &[NodeKind::Function],
            function_on_column,
        )
        .with_severity(Severity::Medium, 10)
        .with_description("Wrapping a filtered column in a function prevents index use")
        .with_suggestion("Compare the bare column, or index the expression")
        .with_should_check(|_, ctx| {
            ctx.in_own_clause(&[NodeKind::Where, NodeKind::Join]) && !ctx.in_window
        }),
        RuleSpec::new("SQL-PERF-004", "OR In Join Condition", &[NodeKind::Or], always)
            .with_severity(Severity::Medium, 10)
            .with_description("OR in a join condition usually forces a nested-loop join")
            .with_suggestion("Split the join into a UNION ALL of simpler joins")
            .with_should_check(|_, ctx| ctx.in_own_clause(&[NodeKind::Join])),
        RuleSpec::new(
            "SQL-PERF-005",
            "Correlated Subquery In Select List",
            &[NodeKind::Subquery],
            correlated_select_subquery,
        )
        .with_severity(Severity::High, 15)
        .with_description("A correlated subquery in the select list runs once per outer row")
        .with_suggestion("Rewrite as a JOIN against a grouped derived table")
        .with_should_check(|_, ctx| ctx.in_select_list && ctx.subquery_depth == 1),
        RuleSpec::new(
            "SQL-PERF-006",
            "Deeply Nested Subquery",
            &[NodeKind::Subquery],
            always,
        )
        .with_severity(Severity::Medium, 10)
        .with_description("Subqueries nested three or more levels deep are hard to optimize")
        .with_suggestion("Flatten the query with CTEs or joins")
        .with_should_check(|_, ctx| ctx.subquery_depth >= DEEP_SUBQUERY_DEPTH),
        RuleSpec::new("SQL-PERF-007", "Large IN List", &[NodeKind::In], large_in_list)
            .with_severity(Severity::Low, 5)
            .with_description("A long IN list is expensive to parse and plan")
            .with_suggestion("Load the values into a temporary table and join"),
        RuleSpec::new("SQL-PERF-008", "Large OFFSET", &[NodeKind::Offset], large_offset)
            .with_severity(Severity::Medium, 10)
            .with_description("A large OFFSET still reads and discards every skipped row")
            .with_suggestion("Use keyset pagination on an indexed column"),
        RuleSpec::new("SQL-PERF-009", "Cartesian Join", &[NodeKind::Join], cartesian_join)
            .with_severity(Severity::High, 20)
            .with_description("A join without a condition produces the cartesian product")
            .with_suggestion("Add an ON condition relating the two relations"),
        RuleSpec::new("SQL-PERF-010", "UNION Without ALL", &[NodeKind::Union], union_distinct)
            .with_severity(Severity::Low, 5)
            .with_description("UNION sorts or hashes the result to remove duplicates")
            .with_suggestion("Use UNION ALL when duplicates are impossible or acceptable"),
        RuleSpec::new(
            "SQL-PERF-011",
            "ORDER BY In Subquery",
            &[NodeKind::Subquery],
            ordered_subquery,
        )
        .with_severity(Severity::Low, 5)
        .with_description("ORDER BY in a subquery without LIMIT has no effect on the result")
        .with_suggestion("Remove the ORDER BY, or sort in the outer query"),
        RuleSpec::new(
            "SQL-PERF-012",
            "Arithmetic On Filtered Column",
            &[NodeKind::Arithmetic],
            arithmetic_on_column,
        )
        .with_severity(Severity::Low, 5)
        .with_description("Arithmetic on a filtered column prevents index use")
        .with_suggestion("Move the arithmetic to the other side of the comparison")
        .with_should_check(|_, ctx| ctx.in_own_clause(&[NodeKind::Where])),
        RuleSpec::new(
            "SQL-PERF-013",
            "HAVING Without Aggregate",
            &[NodeKind::Having],
            having_without_aggregate,
        )
        .with_severity(Severity::Medium, 10)
        .with_description("HAVING without an aggregate filters after grouping instead of before")
        .with_suggestion("Move the condition to WHERE"),
        RuleSpec::new(
            "SQL-PERF-014",
            "Window Without PARTITION BY",
            &[NodeKind::Window],
            window_without_partition,
        )
        .with_severity(Severity::Low, 5)
        .with_description("A window without PARTITION BY processes the whole result as one partition")
        .with_suggestion("Partition the window if the computation is per group"),
        RuleSpec::new("SQL-PERF-015", "SELECT DISTINCT", &[NodeKind::Distinct], always)
            .with_severity(Severity::Low, 5)
            .with_description("DISTINCT often hides a join that multiplies rows")
            .with_suggestion("Check the joins, or use EXISTS instead of joining"),
    ]
}

fn leading_wildcard<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let leading = node
        .children
        .get(1)
        .and_then(string_value)
        .is_some_and(|pattern| pattern.starts_with('%'));
    fire_if(leading, node, ctx)
}

fn function_on_column<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let scalar = !node.kind.is_a(NodeKind::AggregateFunction) && node.kind != NodeKind::Rand;
    fire_if(scalar && has_column_operand(node), node, ctx)
}

fn correlated_select_subquery<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(references_enclosing_query(node), node, ctx)
}

fn large_in_list<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    if node.child(NodeKind::Subquery).is_some() {
        return Ok(Vec::new());
    }
    let values = node.children.len().saturating_sub(1);
    if values <= MAX_IN_LIST {
        return Ok(Vec::new());
    }
    let head = node.text.chars().take(60).collect::<String>();
    Ok(vec![
        Match::new(node, ctx)
            .with_message(format!("IN list with {values} values"))
            .with_matched_text(format!("{head}...")),
    ])
}

fn large_offset<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let large = node
        .children
        .first()
        .and_then(integer_value)
        .is_some_and(|offset| offset > MAX_OFFSET);
    fire_if(large, node, ctx)
}

fn cartesian_join<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let cartesian = match node.name.as_deref() {
        Some("CROSS") => true,
        Some("INNER" | "LEFT" | "RIGHT" | "FULL") => node.children.len() < 2,
        _ => false,
    };
    fire_if(cartesian, node, ctx)
}

fn union_distinct<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(node.distinct, node, ctx)
}

fn ordered_subquery<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let Some(body) = node.children.first() else {
        return Ok(Vec::new());
    };
    let ordered = body.child(NodeKind::Order).is_some()
        && body.child(NodeKind::Limit).is_none()
        && body.child(NodeKind::Offset).is_none();
    fire_if(ordered, node, ctx)
}

fn arithmetic_on_column<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let nested = operands(node).any(|c| c.kind.is_a(NodeKind::Arithmetic));
    // The outermost arithmetic node reports
    fire_if(has_column_operand(node) && !nested, node, ctx)
}

fn having_without_aggregate<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let aggregate = node
        .walk()
        .any(|n| n.kind.is_a(NodeKind::AggregateFunction));
    fire_if(!aggregate, node, ctx)
}

fn window_without_partition<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let unpartitioned =
        node.name.is_none() && node.children.iter().skip(1).all(|c| c.kind == NodeKind::Order);
    fire_if(unpartitioned, node, ctx)
}
