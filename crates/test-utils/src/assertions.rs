// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Rule-level helpers and custom assertions
//!
//! These run a single rule over parsed SQL the same way the detector walks a
//! tree, without dedup or severity filtering.

use sqlscope_context::TraversalContext;
use sqlscope_ir::{Dialect, Node};
use sqlscope_lowering::parse;
use sqlscope_rules::RuleSpec;

/// One rule match, rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub location: String,
    pub matched_text: String,
    pub message: Option<String>,
}

/// Custom assertion helpers for rule testing
pub struct SqlAssertions;

impl SqlAssertions {
    /// Every match `rule` yields on `sql`, in walk order
    ///
    /// Panics when `sql` does not parse or the rule faults.
    pub fn hits(rule: &RuleSpec, sql: &str, dialect: Dialect) -> Vec<RuleHit> {
        let statements = parse(sql, dialect)
            .unwrap_or_else(|e| panic!("fixture failed to parse: {e}\n{sql}"));
        let root = TraversalContext::root(sql);
        let mut hits = Vec::new();
        if rule.applies_to(dialect) {
            for statement in &statements {
                collect(rule, statement, &root, &mut hits);
            }
        }
        hits
    }

    /// Assert that `rule` fires at least once on `sql`
    pub fn assert_fires(rule: &RuleSpec, sql: &str, dialect: Dialect) -> Vec<RuleHit> {
        let hits = Self::hits(rule, sql, dialect);
        assert!(
            !hits.is_empty(),
            "Expected {} to fire on:\n{}",
            rule.id,
            sql
        );
        hits
    }

    /// Assert that `rule` never fires on `sql`
    pub fn assert_silent(rule: &RuleSpec, sql: &str, dialect: Dialect) {
        let hits = Self::hits(rule, sql, dialect);
        assert!(
            hits.is_empty(),
            "Expected {} to stay silent on:\n{}\nfound {:?}",
            rule.id,
            sql,
            hits
        );
    }
}

fn collect(rule: &RuleSpec, node: &Node, parent: &TraversalContext, hits: &mut Vec<RuleHit>) {
    let ctx = parent.enter(node);
    let targeted = rule.targets.iter().any(|&kind| node.is(kind));
    if targeted && rule.should_check(node, &ctx) {
        let matches = rule
            .check(node, &ctx)
            .unwrap_or_else(|fault| panic!("{} faulted: {fault}", rule.id));
        hits.extend(matches.into_iter().map(|m| RuleHit {
            location: m.context.location(m.node),
            matched_text: m.matched_text,
            message: m.message,
        }));
    }
    for child in &node.children {
        collect(rule, child, &ctx, hits);
    }
}
