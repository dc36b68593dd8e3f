// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Security rules

use super::helpers::{fire_if, is_tautology};
use crate::rule::{CheckResult, Match, RuleCategory, RuleSpec, Severity};
use regex::Regex;
use sqlscope_context::TraversalContext;
use sqlscope_ir::{Node, NodeKind};
use std::sync::LazyLock;

/// Column names that usually hold credentials or personal data
static SENSITIVE_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(password|passwd|pwd|pass_hash|password_hash|secret|api_key|apikey|access_token|refresh_token|ssn|social_security_number|credit_card|card_number|cvv)$",
    )
    .expect("valid sensitive column pattern")
});

/// Get all builtin security rules
pub fn all_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new("SQL-SEC-001", "OR Tautology", &[NodeKind::Or], or_tautology)
            .with_severity(Severity::Critical, 30)
            .with_category(RuleCategory::Security)
            .with_description("An always-true OR operand is a common SQL injection signature")
            .with_suggestion("Use bound parameters instead of string concatenation"),
        RuleSpec::new(
            "SQL-SEC-002",
            "Sensitive Column Exposed",
            &[NodeKind::Column],
            sensitive_column,
        )
        .with_severity(Severity::Medium, 10)
        .with_category(RuleCategory::Security)
        .with_description("The select list returns a column that looks like a credential")
        .with_suggestion("Select only the columns the caller is allowed to see")
        .with_should_check(|_, ctx| ctx.in_own_clause(&[NodeKind::Projection])),
    ]
}

fn or_tautology<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    Ok(node
        .children
        .iter()
        .find(|operand| is_tautology(operand))
        .map(|operand| {
            vec![
                Match::new(node, ctx)
                    .with_message(format!("OR operand `{}` is always true", operand.text)),
            ]
        })
        .unwrap_or_default())
}

fn sensitive_column<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    let sensitive = node
        .name
        .as_deref()
        .is_some_and(|name| SENSITIVE_COLUMN.is_match(name));
    fire_if(sensitive, node, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_column_pattern() {
        assert!(SENSITIVE_COLUMN.is_match("password"));
        assert!(SENSITIVE_COLUMN.is_match("API_KEY"));
        assert!(!SENSITIVE_COLUMN.is_match("password_reset_at"));
        assert!(!SENSITIVE_COLUMN.is_match("username"));
    }

    #[test]
    fn test_or_tautology_message() {
        let node = Node::new(NodeKind::Or, "name = 'x' OR 1 = 1")
            .with_child(Node::new(NodeKind::Eq, "name = 'x'"))
            .with_child(
                Node::new(NodeKind::Eq, "1 = 1")
                    .with_child(Node::new(NodeKind::NumberLiteral, "1"))
                    .with_child(Node::new(NodeKind::NumberLiteral, "1")),
            );
        let matches = or_tautology(&node, &TraversalContext::root("")).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(
            matches[0].message.as_deref(),
            Some("OR operand `1 = 1` is always true")
        );
    }
}
