// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Detector
//!
//! Walks every lowered statement depth-first, deriving a
//! [`TraversalContext`] per node, and runs the rules the registry indexes
//! under the node's kind.
//!
//! ## Failure handling
//!
//! - Unparsable input becomes one `SQL-PARSE-001` issue
//! - A rule returning [`RuleFault`](sqlscope_rules::RuleFault) or panicking is
//!   logged and skipped; the walk continues
//!
//! ## Example
//!
//! ```rust
//! use sqlscope_detector::Detector;
//! use sqlscope_ir::Dialect;
//!
//! let detector = Detector::default();
//! let issues = detector.detect("DELETE FROM users", Dialect::Generic);
//! assert!(issues.iter().any(|i| i.rule_id == "SQL-CORR-003"));
//! assert!(detector.detect("-- nothing", Dialect::Generic).is_empty());
//! ```

use crate::config::DetectorConfig;
use crate::issue::Issue;
use regex::Regex;
use sqlscope_context::TraversalContext;
use sqlscope_ir::{Dialect, Node};
use sqlscope_lowering::{LoweringError, LoweringResult, parse};
use sqlscope_rules::{Match, RuleRegistry, RuleSpec};
use sqlscope_semantic::QueryMetadata;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// `--` line comments and `/* */` block comments
static SQL_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)/\*.*?\*/|--[^\n]*").expect("valid SQL comment pattern")
});

/// Whether `sql` holds nothing but whitespace and comments
pub fn is_blank(sql: &str) -> bool {
    SQL_COMMENT.replace_all(sql, "").trim().is_empty()
}

/// Rule-driven SQL analyzer
///
/// The registry is read-only after construction, so one detector can be
/// shared across threads behind an `Arc`.
#[derive(Debug)]
pub struct Detector {
    registry: RuleRegistry,
    config: DetectorConfig,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl Detector {
    /// Detector over the builtin rule library
    pub fn new(config: DetectorConfig) -> Self {
        Self::with_registry(RuleRegistry::with_builtin_rules(), config)
    }

    pub fn with_registry(registry: RuleRegistry, config: DetectorConfig) -> Self {
        debug!(rules = registry.count(), "Detector ready");
        Self { registry, config }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Analyze `sql` with the configured dialect
    pub fn detect_default(&self, sql: &str) -> Vec<Issue> {
        self.detect(sql, self.config.dialect)
    }

    /// Analyze `sql` and return its issues in traversal order
    ///
    /// Never fails: parse errors come back as one `SQL-PARSE-001` issue.
    pub fn detect(&self, sql: &str, dialect: Dialect) -> Vec<Issue> {
        if is_blank(sql) {
            return Vec::new();
        }

        let statements = match parse(sql, dialect) {
            Ok(statements) => statements,
            Err(e) => {
                debug!(%dialect, error = %e, "Parse failed");
                return vec![Issue::parse_failure(&parse_message(&e), sql)];
            }
        };

        let root = TraversalContext::root(sql);
        let mut issues = Vec::new();
        for statement in &statements {
            self.walk(statement, &root, dialect, &mut issues);
        }
        debug!(
            statements = statements.len(),
            issues = issues.len(),
            "Walk complete"
        );

        let mut seen = HashSet::new();
        issues.retain(|issue| {
            issue.severity >= self.config.min_severity
                && seen.insert((issue.rule_id.clone(), issue.location.clone()))
        });
        issues
    }

    /// Structural summary of the first statement in `sql`
    pub fn extract_metadata(&self, sql: &str, dialect: Dialect) -> LoweringResult<QueryMetadata> {
        if is_blank(sql) {
            return Ok(QueryMetadata::default());
        }
        let statements = parse(sql, dialect)?;
        Ok(statements
            .first()
            .map(QueryMetadata::from_statement)
            .unwrap_or_default())
    }

    fn walk(&self, node: &Node, parent: &TraversalContext, dialect: Dialect, issues: &mut Vec<Issue>) {
        let ctx = parent.enter(node);

        for rule in self.registry.rules_for(node.kind, dialect) {
            if self.config.is_disabled(rule.id) || !rule.should_check(node, &ctx) {
                continue;
            }
            for m in run_check(rule, node, &ctx) {
                issues.push(Issue::from_match(rule, &m, self.config.max_matched_text));
            }
        }

        for child in &node.children {
            self.walk(child, &ctx, dialect, issues);
        }
    }
}

/// Run one check, containing faults and panics
fn run_check<'a>(rule: &RuleSpec, node: &'a Node, ctx: &TraversalContext) -> Vec<Match<'a>> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.check(node, ctx))) {
        Ok(Ok(matches)) => matches,
        Ok(Err(fault)) => {
            warn!(rule = rule.id, kind = %node.kind, error = %fault, "Rule check failed");
            Vec::new()
        }
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!(rule = rule.id, kind = %node.kind, %reason, "Rule check panicked");
            Vec::new()
        }
    }
}

fn parse_message(error: &LoweringError) -> String {
    match error {
        LoweringError::Parse { message } => message.clone(),
        other => other.to_string(),
    }
}
