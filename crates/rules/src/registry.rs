// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use crate::builtin;
use crate::rule::{RuleCategory, RuleSpec};
use sqlscope_ir::{Dialect, NodeKind};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::warn;

/// Errors raised while registering a rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Rule {0} has no target node kinds")]
    EmptyTargets(String),

    #[error("Rule id {0} is already registered")]
    DuplicateId(String),
}

/// Rule registry indexed by target node kind
///
/// Built once, then only read. Lookups walk a node kind's ancestor
/// categories so a rule targeting `AggregateFunction` is dispatched on
/// `Count`, `Sum`, ...
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    /// Rules in registration order
    rules: Vec<RuleSpec>,

    /// Target kind → indices into `rules`
    by_kind: HashMap<NodeKind, Vec<usize>>,

    by_id: HashMap<&'static str, usize>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every builtin rule
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sqlscope_rules::RuleRegistry;
    ///
    /// let registry = RuleRegistry::with_builtin_rules();
    /// assert!(registry.by_id("SQL-PERF-001").is_some());
    /// ```
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        for rule in builtin::all_rules() {
            if let Err(err) = registry.register(rule) {
                warn!(%err, "Skipping builtin rule");
            }
        }
        registry
    }

    /// Register a rule under every kind it targets
    ///
    /// # Errors
    ///
    /// * [`RegistryError::EmptyTargets`] - the rule targets no node kind
    /// * [`RegistryError::DuplicateId`] - a rule with the same id exists
    pub fn register(&mut self, rule: RuleSpec) -> Result<(), RegistryError> {
        if rule.targets.is_empty() {
            return Err(RegistryError::EmptyTargets(rule.id.to_string()));
        }
        if self.by_id.contains_key(rule.id) {
            return Err(RegistryError::DuplicateId(rule.id.to_string()));
        }

        let index = self.rules.len();
        for kind in rule.targets {
            let slot = self.by_kind.entry(*kind).or_default();
            if !slot.contains(&index) {
                slot.push(index);
            }
        }
        self.by_id.insert(rule.id, index);
        self.rules.push(rule);
        Ok(())
    }

    /// Rules to run on a node of `kind` under `dialect`
    ///
    /// # Arguments
    ///
    /// * `kind` - The concrete kind of the node being visited
    /// * `dialect` - The dialect the statement was parsed with
    ///
    /// # Returns
    ///
    /// Rules registered under `kind` first, then rules registered under its
    /// ancestor categories, each group in registration order. A rule
    /// reachable both ways appears once.
    pub fn rules_for(&self, kind: NodeKind, dialect: Dialect) -> Vec<&RuleSpec> {
        let mut seen = HashSet::new();
        std::iter::once(kind)
            .chain(kind.ancestors().iter().copied())
            .filter_map(|k| self.by_kind.get(&k))
            .flatten()
            .copied()
            .filter(|index| seen.insert(*index))
            .map(|index| &self.rules[index])
            .filter(|rule| rule.applies_to(dialect))
            .collect()
    }

    /// Lookup a rule by id
    pub fn by_id(&self, id: &str) -> Option<&RuleSpec> {
        self.by_id.get(id).map(|index| &self.rules[*index])
    }

    /// All rules of a category, in registration order
    pub fn by_category(&self, category: RuleCategory) -> Vec<&RuleSpec> {
        self.rules
            .iter()
            .filter(|rule| rule.category == category)
            .collect()
    }

    /// Number of registered rules
    pub fn count(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleSpec> {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{CheckResult, Severity};
    use sqlscope_context::TraversalContext;
    use sqlscope_ir::Node;

    fn never<'a>(_: &'a Node, _: &TraversalContext) -> CheckResult<'a> {
        Ok(Vec::new())
    }

    #[test]
    fn test_rejects_empty_targets() {
        let mut registry = RuleRegistry::new();
        let err = registry
            .register(RuleSpec::new("T-001", "Nothing", &[], never))
            .unwrap_err();
        assert_eq!(err, RegistryError::EmptyTargets("T-001".to_string()));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let mut registry = RuleRegistry::new();
        registry
            .register(RuleSpec::new("T-001", "Star", &[NodeKind::Star], never))
            .unwrap();
        let err = registry
            .register(RuleSpec::new("T-001", "Column", &[NodeKind::Column], never))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId("T-001".to_string()));
        assert!(registry.rules_for(NodeKind::Column, Dialect::Generic).is_empty());
    }

    #[test]
    fn test_ancestor_dispatch_fires_once() {
        let mut registry = RuleRegistry::new();
        registry
            .register(RuleSpec::new(
                "T-001",
                "Both",
                &[NodeKind::Count, NodeKind::AggregateFunction],
                never,
            ))
            .unwrap();
        registry
            .register(RuleSpec::new("T-002", "Functions", &[NodeKind::Function], never))
            .unwrap();
        registry
            .register(RuleSpec::new("T-003", "Count", &[NodeKind::Count], never))
            .unwrap();

        let ids: Vec<&str> = registry
            .rules_for(NodeKind::Count, Dialect::Generic)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["T-001", "T-003", "T-002"]);

        let ids: Vec<&str> = registry
            .rules_for(NodeKind::Lower, Dialect::Generic)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["T-002"]);
    }

    #[test]
    fn test_dialect_filter() {
        let mut registry = RuleRegistry::new();
        registry
            .register(
                RuleSpec::new("T-001", "MySQL only", &[NodeKind::Rand], never)
                    .with_dialects(&[Dialect::MySQL]),
            )
            .unwrap();
        assert_eq!(registry.rules_for(NodeKind::Rand, Dialect::MySQL).len(), 1);
        assert!(registry.rules_for(NodeKind::Rand, Dialect::PostgreSQL).is_empty());
    }

    #[test]
    fn test_by_category() {
        let mut registry = RuleRegistry::new();
        registry
            .register(
                RuleSpec::new("T-001", "Security", &[NodeKind::Or], never)
                    .with_category(RuleCategory::Security)
                    .with_severity(Severity::Critical, 30),
            )
            .unwrap();
        registry
            .register(RuleSpec::new("T-002", "Perf", &[NodeKind::Star], never))
            .unwrap();
        assert_eq!(registry.by_category(RuleCategory::Security).len(), 1);
        assert_eq!(registry.by_category(RuleCategory::Style).len(), 0);
    }

    #[test]
    fn test_builtin_rules_load() {
        let registry = RuleRegistry::with_builtin_rules();
        assert_eq!(registry.count(), builtin::all_rules().len());
        assert!(registry.by_id("SQL-CORR-003").is_some());
        assert!(registry.by_id("SQL-NOPE-999").is_none());
    }
}
