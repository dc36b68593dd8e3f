// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Issues
//!
//! An [`Issue`] is the externally visible form of a rule match: the rule's
//! metadata plus where it fired and what it matched. Parse failures and
//! timeouts are reported as synthetic issues so callers only ever handle one
//! result type.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlscope_rules::{Match, RuleCategory, RuleSpec, Severity};
use sqlscope_semantic::tree::truncate_chars;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

/// Rule id of the issue reported for unparsable input
pub const PARSE_FAILURE_ID: &str = "SQL-PARSE-001";

/// Rule id of the issue reported when analysis misses its deadline
pub const TIMEOUT_ID: &str = "SQL-TIMEOUT-001";

/// Longest parser message or source excerpt carried by a synthetic issue
pub const SYNTHETIC_TEXT_LIMIT: usize = 200;

/// Location of synthetic issues
const STATEMENT_START: &str = "main:1";

/// ANSI escape sequences and other control characters
static CONTROL_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|[\x00-\x08\x0b\x0c\x0e-\x1f\x7f]")
        .expect("valid control sequence pattern")
});

/// One finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub rule_id: String,
    pub name: String,
    pub severity: Severity,
    pub category: RuleCategory,
    pub penalty: u32,

    /// Match message, or the rule description when the match has none
    pub description: String,

    /// `"<scope>:<line>"`
    pub location: String,

    pub matched_text: String,
    pub suggestion: String,
}

impl Issue {
    /// Issue for one match of `rule`
    pub fn from_match(rule: &RuleSpec, m: &Match<'_>, max_matched_text: usize) -> Self {
        Self {
            rule_id: rule.id.to_string(),
            name: rule.name.to_string(),
            severity: rule.severity,
            category: rule.category,
            penalty: rule.penalty,
            description: m
                .message
                .clone()
                .unwrap_or_else(|| rule.description.to_string()),
            location: m.context.location(m.node),
            matched_text: truncate_chars(&m.matched_text, max_matched_text),
            suggestion: rule.suggestion.to_string(),
        }
    }

    /// The single issue reported when `source` does not parse
    pub fn parse_failure(message: &str, source: &str) -> Self {
        let cleaned = CONTROL_SEQUENCE.replace_all(message, "");
        Self {
            rule_id: PARSE_FAILURE_ID.to_string(),
            name: "Parse Failure".to_string(),
            severity: Severity::High,
            category: RuleCategory::Correctness,
            penalty: 30,
            description: truncate_chars(cleaned.trim(), SYNTHETIC_TEXT_LIMIT),
            location: STATEMENT_START.to_string(),
            matched_text: truncate_chars(source, SYNTHETIC_TEXT_LIMIT),
            suggestion: "Check the statement syntax for the selected dialect".to_string(),
        }
    }

    /// The single issue reported when analysis of `source` outlives `deadline`
    pub fn timeout(source: &str, deadline: Duration) -> Self {
        Self {
            rule_id: TIMEOUT_ID.to_string(),
            name: "Analysis Timeout".to_string(),
            severity: Severity::High,
            category: RuleCategory::Correctness,
            penalty: 30,
            description: format!(
                "Analysis did not finish within {} ms",
                deadline.as_millis()
            ),
            location: STATEMENT_START.to_string(),
            matched_text: truncate_chars(source, SYNTHETIC_TEXT_LIMIT),
            suggestion: "Split the statement, or raise the deadline".to_string(),
        }
    }

    /// Whether this issue stands in for a failed analysis
    pub fn is_synthetic(&self) -> bool {
        self.rule_id == PARSE_FAILURE_ID || self.rule_id == TIMEOUT_ID
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} ({}): {}",
            self.location, self.severity, self.rule_id, self.name, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_strips_control_sequences() {
        let issue = Issue::parse_failure("\x1b[31mExpected: an expression\x1b[0m\x07", "SELEC 1");
        assert_eq!(issue.rule_id, PARSE_FAILURE_ID);
        assert_eq!(issue.description, "Expected: an expression");
        assert_eq!(issue.matched_text, "SELEC 1");
        assert_eq!(issue.location, "main:1");
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(issue.penalty, 30);
        assert!(issue.is_synthetic());
    }

    #[test]
    fn test_parse_failure_truncates() {
        let message = "x".repeat(500);
        let source = "y".repeat(500);
        let issue = Issue::parse_failure(&message, &source);
        assert_eq!(issue.description.chars().count(), SYNTHETIC_TEXT_LIMIT);
        assert_eq!(issue.matched_text.chars().count(), SYNTHETIC_TEXT_LIMIT);
    }

    #[test]
    fn test_timeout_issue() {
        let issue = Issue::timeout("SELECT 1", Duration::from_millis(250));
        assert_eq!(issue.rule_id, TIMEOUT_ID);
        assert_eq!(issue.description, "Analysis did not finish within 250 ms");
        assert_eq!(issue.severity, Severity::High);
    }

    #[test]
    fn test_json_fields() {
        let issue = Issue::timeout("SELECT 1", Duration::from_millis(5));
        let json = serde_json::to_value(&issue).unwrap();
        for field in [
            "rule_id",
            "name",
            "severity",
            "category",
            "penalty",
            "description",
            "location",
            "matched_text",
            "suggestion",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["severity"], "high");
        assert_eq!(json["category"], "correctness");
    }
}
