// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Rule descriptors
//!
//! A rule is plain data: a [`RuleSpec`] holding its metadata, the node kinds
//! it targets, the dialects it applies to, and function pointers for the
//! check itself and an optional cheap pre-filter.
//!
//! ## Example
//!
//! ```rust
//! use sqlscope_context::TraversalContext;
//! use sqlscope_ir::{Node, NodeKind};
//! use sqlscope_rules::{Match, RuleFault, RuleSpec, Severity, RuleCategory};
//!
//! fn check<'a>(node: &'a Node, ctx: &TraversalContext) -> Result<Vec<Match<'a>>, RuleFault> {
//!     Ok(vec![Match::new(node, ctx)])
//! }
//!
//! let rule = RuleSpec::new("X-001", "Any Star", &[NodeKind::Star], check)
//!     .with_severity(Severity::Medium, 10)
//!     .with_category(RuleCategory::Performance);
//! assert_eq!(rule.penalty, 10);
//! ```

use serde::{Deserialize, Serialize};
use sqlscope_context::TraversalContext;
use sqlscope_ir::{Dialect, Node, NodeKind};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity of a finding, least severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Optimization,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Optimization => "optimization",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a severity name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown severity: '{0}'")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "optimization" => Ok(Severity::Optimization),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

/// Rule grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Performance,
    Correctness,
    Security,
    Style,
    Optimization,
    Info,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Performance => "performance",
            RuleCategory::Correctness => "correctness",
            RuleCategory::Security => "security",
            RuleCategory::Style => "style",
            RuleCategory::Optimization => "optimization",
            RuleCategory::Info => "info",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule check failed on a node it was dispatched to
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleFault {
    /// The node lacks structure the rule relies on
    #[error("Malformed {kind} node: {reason}")]
    MalformedNode { kind: NodeKind, reason: String },
}

impl RuleFault {
    pub fn malformed(kind: NodeKind, reason: impl Into<String>) -> Self {
        Self::MalformedNode {
            kind,
            reason: reason.into(),
        }
    }
}

/// One place a rule fired
#[derive(Debug, Clone)]
pub struct Match<'a> {
    pub node: &'a Node,

    /// Context the rule was checked under
    pub context: TraversalContext,

    /// Replaces the rule description when set
    pub message: Option<String>,

    pub matched_text: String,
}

impl<'a> Match<'a> {
    /// Match on `node`, excerpting the node's own text
    pub fn new(node: &'a Node, ctx: &TraversalContext) -> Self {
        Self {
            node,
            context: ctx.clone(),
            message: None,
            matched_text: node.text.clone(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_matched_text(mut self, text: impl Into<String>) -> Self {
        self.matched_text = text.into();
        self
    }
}

/// Result of one rule check on one node
pub type CheckResult<'a> = Result<Vec<Match<'a>>, RuleFault>;

/// Inspect a node and report zero or more matches
pub type CheckFn = for<'a> fn(&'a Node, &TraversalContext) -> CheckResult<'a>;

/// Cheap pre-filter evaluated before [`CheckFn`]
pub type ShouldCheckFn = fn(&Node, &TraversalContext) -> bool;

/// Immutable rule descriptor
#[derive(Clone, Copy)]
pub struct RuleSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub severity: Severity,
    pub category: RuleCategory,
    pub penalty: u32,
    pub description: &'static str,
    pub suggestion: &'static str,

    /// Node kinds (concrete or abstract) the rule is dispatched on
    pub targets: &'static [NodeKind],

    /// Dialects the rule applies to; empty means all
    pub dialects: &'static [Dialect],

    pub check: CheckFn,
    pub should_check: Option<ShouldCheckFn>,
}

impl RuleSpec {
    /// Rule with `medium` severity, `performance` category and no dialect restriction
    pub fn new(
        id: &'static str,
        name: &'static str,
        targets: &'static [NodeKind],
        check: CheckFn,
    ) -> Self {
        Self {
            id,
            name,
            severity: Severity::Medium,
            category: RuleCategory::Performance,
            penalty: 0,
            description: "",
            suggestion: "",
            targets,
            dialects: &[],
            check,
            should_check: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity, penalty: u32) -> Self {
        self.severity = severity;
        self.penalty = penalty;
        self
    }

    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn with_suggestion(mut self, suggestion: &'static str) -> Self {
        self.suggestion = suggestion;
        self
    }

    pub fn with_dialects(mut self, dialects: &'static [Dialect]) -> Self {
        self.dialects = dialects;
        self
    }

    pub fn with_should_check(mut self, should_check: ShouldCheckFn) -> Self {
        self.should_check = Some(should_check);
        self
    }

    /// Whether the rule runs under `dialect`
    pub fn applies_to(&self, dialect: Dialect) -> bool {
        self.dialects.is_empty() || self.dialects.contains(&dialect)
    }

    /// Run the pre-filter, if any
    pub fn should_check(&self, node: &Node, ctx: &TraversalContext) -> bool {
        self.should_check.is_none_or(|f| f(node, ctx))
    }

    /// Run the check
    pub fn check<'a>(&self, node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
        (self.check)(node, ctx)
    }
}

impl fmt::Debug for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSpec")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("severity", &self.severity)
            .field("category", &self.category)
            .field("penalty", &self.penalty)
            .field("targets", &self.targets)
            .field("dialects", &self.dialects)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never<'a>(_: &'a Node, _: &TraversalContext) -> CheckResult<'a> {
        Ok(Vec::new())
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Low > Severity::Optimization);
        assert!(Severity::Optimization > Severity::Info);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!(" optimization ".parse::<Severity>().unwrap(), Severity::Optimization);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_builder() {
        let rule = RuleSpec::new("T-001", "Test", &[NodeKind::Star], never)
            .with_severity(Severity::High, 20)
            .with_category(RuleCategory::Correctness)
            .with_dialects(&[Dialect::MySQL]);
        assert_eq!(rule.severity, Severity::High);
        assert_eq!(rule.penalty, 20);
        assert!(rule.applies_to(Dialect::MySQL));
        assert!(!rule.applies_to(Dialect::PostgreSQL));
    }

    #[test]
    fn test_should_check_defaults_to_true() {
        let rule = RuleSpec::new("T-001", "Test", &[NodeKind::Star], never);
        let ctx = TraversalContext::root("SELECT *");
        assert!(rule.should_check(&Node::new(NodeKind::Star, "*"), &ctx));

        let filtered = rule.with_should_check(|_, ctx| ctx.in_where);
        assert!(!filtered.should_check(&Node::new(NodeKind::Star, "*"), &ctx));
    }

    #[test]
    fn test_match_defaults_to_node_text() {
        let node = Node::new(NodeKind::Star, "*");
        let ctx = TraversalContext::root("SELECT *");
        let m = Match::new(&node, &ctx).with_message("found it");
        assert_eq!(m.matched_text, "*");
        assert_eq!(m.message.as_deref(), Some("found it"));
    }
}
