// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Correctness rules

use super::helpers::{always, case_has_else, fire_if, operands};
use crate::rule::{CheckResult, Match, RuleCategory, RuleSpec, Severity};
use sqlscope_context::TraversalContext;
use sqlscope_ir::{Node, NodeKind};
use sqlscope_semantic::PredicateClassifier;
use sqlscope_semantic::tree::{qualifier_of, unparen};

/// Get all builtin correctness rules
pub fn all_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new(
            "SQL-CORR-001",
            "NULL Comparison",
            &[NodeKind::Eq, NodeKind::Neq],
            null_comparison,
        )
        .with_severity(Severity::High, 20)
        .with_category(RuleCategory::Correctness)
        .with_description("Comparing with NULL using = or <> is never true")
        .with_suggestion("Use IS NULL or IS NOT NULL"),
        RuleSpec::new("SQL-CORR-002", "NOT IN Subquery", &[NodeKind::In], not_in_subquery)
            .with_severity(Severity::High, 15)
            .with_category(RuleCategory::Correctness)
            .with_description("NOT IN returns no rows when the subquery yields a NULL")
            .with_suggestion("Use NOT EXISTS"),
        RuleSpec::new(
            "SQL-CORR-003",
            "Unfiltered Write",
            &[NodeKind::Update, NodeKind::Delete],
            unfiltered_write,
        )
        .with_severity(Severity::Critical, 40)
        .with_category(RuleCategory::Correctness)
        .with_description("UPDATE or DELETE without WHERE touches every row of the table")
        .with_suggestion("Add a WHERE clause, or use TRUNCATE if clearing the table is intended"),
        RuleSpec::new(
            "SQL-CORR-004",
            "LIMIT Without ORDER BY",
            &[NodeKind::Query, NodeKind::SetOperation],
            limit_without_order,
        )
        .with_severity(Severity::Medium, 10)
        .with_category(RuleCategory::Correctness)
        .with_description("LIMIT without ORDER BY returns an arbitrary subset of rows")
        .with_suggestion("Add an ORDER BY that makes the result deterministic")
        .with_should_check(|_, ctx| !ctx.in_exists),
        RuleSpec::new("SQL-CORR-005", "CASE Without ELSE", &[NodeKind::Case], case_without_else)
            .with_severity(Severity::Low, 5)
            .with_category(RuleCategory::Correctness)
            .with_description("CASE without ELSE yields NULL for unmatched rows")
            .with_suggestion("Add an explicit ELSE branch"),
        RuleSpec::new(
            "SQL-CORR-006",
            "Aggregate In WHERE",
            &[NodeKind::AggregateFunction],
            always,
        )
        .with_severity(Severity::High, 20)
        .with_category(RuleCategory::Correctness)
        .with_description("Aggregate functions are not allowed in WHERE")
        .with_suggestion("Move the condition to HAVING")
        .with_should_check(|_, ctx| ctx.in_own_clause(&[NodeKind::Where]) && !ctx.in_window),
        RuleSpec::new(
            "SQL-CORR-007",
            "Outer Join Nullified By WHERE",
            &[NodeKind::Select],
            nullified_outer_join,
        )
        .with_severity(Severity::Medium, 10)
        .with_category(RuleCategory::Correctness)
        .with_description("A WHERE filter on the optional side of a LEFT JOIN drops its NULL rows")
        .with_suggestion("Move the condition into the ON clause, or use an INNER JOIN"),
    ]
}

fn null_comparison<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(operands(node).any(|c| c.kind == NodeKind::Null), node, ctx)
}

fn not_in_subquery<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(
        node.negated && node.child(NodeKind::Subquery).is_some(),
        node,
        ctx,
    )
}

fn unfiltered_write<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(node.child(NodeKind::Where).is_none(), node, ctx)
}

fn limit_without_order<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let Some(limit) = node.child(NodeKind::Limit) else {
        return Ok(Vec::new());
    };
    if node.child(NodeKind::Order).is_some() {
        return Ok(Vec::new());
    }
    Ok(vec![
        Match::new(node, ctx).with_matched_text(format!("LIMIT {}", limit.text)),
    ])
}

fn case_without_else<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(!case_has_else(node), node, ctx)
}

fn nullified_outer_join<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let Some(clause) = node.child(NodeKind::Where) else {
        return Ok(Vec::new());
    };
    let optional: Vec<String> = node
        .children_of_kind(NodeKind::Join)
        .filter(|join| join.name.as_deref() == Some("LEFT"))
        .filter_map(|join| join.children.first())
        .filter_map(Node::binding)
        .map(str::to_ascii_lowercase)
        .collect();
    if optional.is_empty() {
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for cond in PredicateClassifier::split_conjuncts(clause) {
        let shape = unparen(cond);
        let rejects_null = shape.kind.is_comparison()
            || matches!(
                shape.kind,
                NodeKind::Like | NodeKind::ILike | NodeKind::In | NodeKind::Between
            )
            || (shape.kind == NodeKind::Is && shape.negated);
        if !rejects_null {
            continue;
        }
        let hit = operands(shape)
            .filter(|c| c.kind == NodeKind::Column)
            .filter_map(qualifier_of)
            .find(|q| optional.contains(q));
        if let Some(alias) = hit {
            matches.push(
                Match::new(node, ctx)
                    .with_message(format!(
                        "WHERE condition on {alias} turns the LEFT JOIN into an inner join"
                    ))
                    .with_matched_text(cond.text.clone()),
            );
            break;
        }
    }
    Ok(matches)
}
