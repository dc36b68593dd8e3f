// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Dialect-specific rules

use super::helpers::fire_if;
use crate::rule::{CheckResult, RuleCategory, RuleSpec, Severity};
use sqlscope_context::TraversalContext;
use sqlscope_ir::{Dialect, Node, NodeKind};

const RANDOM_DIALECTS: &[Dialect] = &[Dialect::PostgreSQL, Dialect::DuckDB, Dialect::SQLite];
const WAREHOUSE_DIALECTS: &[Dialect] = &[Dialect::Snowflake, Dialect::BigQuery, Dialect::DuckDB];

/// Get all builtin dialect-specific rules
pub fn all_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new("SQL-MYSQL-001", "ORDER BY RAND()", &[NodeKind::Rand], rand_ordering)
            .with_severity(Severity::Medium, 10)
            .with_dialects(&[Dialect::MySQL])
            .with_description("ORDER BY RAND() sorts the whole table to pick random rows")
            .with_suggestion("Pick random keys in application code, or sample by id range")
            .with_should_check(|_, ctx| ctx.in_order_by),
        RuleSpec::new("SQL-PG-001", "ORDER BY RANDOM()", &[NodeKind::Rand], random_ordering)
            .with_severity(Severity::Medium, 10)
            .with_dialects(RANDOM_DIALECTS)
            .with_description("ORDER BY RANDOM() sorts the whole table to pick random rows")
            .with_suggestion("Use TABLESAMPLE, or sample by id range")
            .with_should_check(|_, ctx| ctx.in_order_by),
        RuleSpec::new(
            "SQL-WH-001",
            "Exact COUNT DISTINCT",
            &[NodeKind::Count],
            exact_count_distinct,
        )
        .with_severity(Severity::Optimization, 2)
        .with_category(RuleCategory::Optimization)
        .with_dialects(WAREHOUSE_DIALECTS)
        .with_description("Exact COUNT(DISTINCT ...) is expensive on large tables")
        .with_suggestion("Use APPROX_COUNT_DISTINCT when an estimate is enough"),
    ]
}

fn function_named(node: &Node, name: &str) -> bool {
    node.name
        .as_deref()
        .is_some_and(|n| n.eq_ignore_ascii_case(name))
}

fn rand_ordering<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(function_named(node, "RAND"), node, ctx)
}

fn random_ordering<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(function_named(node, "RANDOM"), node, ctx)
}

fn exact_count_distinct<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    fire_if(node.distinct, node, ctx)
}
