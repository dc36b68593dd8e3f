// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock rules for exercising the registry and detector
//!
//! Each constructor returns a plain [`RuleSpec`], so tests can assemble a
//! registry with exactly the rules they need.

use sqlscope_context::TraversalContext;
use sqlscope_ir::{Dialect, Node, NodeKind};
use sqlscope_rules::{
    CheckResult, Match, RegistryError, RuleCategory, RuleFault, RuleRegistry, RuleSpec, Severity,
};

/// Rule id of [`MockRules::select_star`]
pub const SELECT_STAR_ID: &str = "MOCK-STAR-001";
/// Rule id of [`MockRules::failing`]
pub const FAILING_ID: &str = "MOCK-FAIL-001";
/// Rule id of [`MockRules::panicking`]
pub const PANICKING_ID: &str = "MOCK-PANIC-001";
/// Rule id of [`MockRules::mysql_only`]
pub const MYSQL_ONLY_ID: &str = "MOCK-MYSQL-001";
/// Rule id of [`MockRules::every_column`]
pub const EVERY_COLUMN_ID: &str = "MOCK-COLUMN-001";

/// Constructors for mock rules
pub struct MockRules;

impl MockRules {
    /// Fires on every `*`
    pub fn select_star() -> RuleSpec {
        RuleSpec::new(SELECT_STAR_ID, "SelectStar", &[NodeKind::Star], fire)
            .with_severity(Severity::Medium, 10)
            .with_description("Wildcard projection")
            .with_suggestion("List the columns")
    }

    /// Fails on every table it sees
    pub fn failing() -> RuleSpec {
        RuleSpec::new(FAILING_ID, "Always Faults", &[NodeKind::Table], fault)
            .with_severity(Severity::High, 20)
            .with_category(RuleCategory::Correctness)
    }

    /// Panics on every table it sees
    pub fn panicking() -> RuleSpec {
        RuleSpec::new(PANICKING_ID, "Always Panics", &[NodeKind::Table], panic_check)
            .with_severity(Severity::High, 20)
            .with_category(RuleCategory::Correctness)
    }

    /// Fires on every `*`, MySQL only
    pub fn mysql_only() -> RuleSpec {
        RuleSpec::new(MYSQL_ONLY_ID, "MySQL Star", &[NodeKind::Star], fire)
            .with_severity(Severity::Low, 5)
            .with_dialects(&[Dialect::MySQL])
    }

    /// Fires on every column reference
    pub fn every_column() -> RuleSpec {
        RuleSpec::new(EVERY_COLUMN_ID, "Any Column", &[NodeKind::Column], fire)
            .with_severity(Severity::Info, 0)
            .with_category(RuleCategory::Info)
    }

    /// Registry holding `rules`, in order
    pub fn registry(rules: impl IntoIterator<Item = RuleSpec>) -> Result<RuleRegistry, RegistryError> {
        let mut registry = RuleRegistry::new();
        for rule in rules {
            registry.register(rule)?;
        }
        Ok(registry)
    }
}

fn fire<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    Ok(vec![Match::new(node, ctx)])
}

fn fault<'a>(node: &'a Node, _ctx: &TraversalContext) -> CheckResult<'a> {
    Err(RuleFault::malformed(node.kind, "mock fault"))
}

fn panic_check<'a>(node: &'a Node, _ctx: &TraversalContext) -> CheckResult<'a> {
    panic!("mock panic on {}", node.kind.as_str())
}
