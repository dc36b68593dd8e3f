// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Builtin rule definitions
//!
//! This module contains the builtin rules, grouped by category.

pub mod correctness;
pub mod dialect;
pub mod helpers;
pub mod optimization;
pub mod performance;
pub mod security;
pub mod style;

use crate::rule::RuleSpec;

/// Every builtin rule, in registration order
pub fn all_rules() -> Vec<RuleSpec> {
    let mut rules = performance::all_rules();
    rules.extend(correctness::all_rules());
    rules.extend(security::all_rules());
    rules.extend(style::all_rules());
    rules.extend(optimization::all_rules());
    rules.extend(dialect::all_rules());
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_are_unique() {
        let rules = all_rules();
        let ids: HashSet<&str> = rules.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_builtin_rules_are_documented() {
        for rule in all_rules() {
            assert!(!rule.targets.is_empty(), "{} has no targets", rule.id);
            assert!(!rule.description.is_empty(), "{} has no description", rule.id);
            assert!(!rule.suggestion.is_empty(), "{} has no suggestion", rule.id);
        }
    }
}
