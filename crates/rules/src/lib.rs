// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Rule Registry
//!
//! This crate provides rule descriptors, the registry that dispatches them
//! by node kind, and the builtin rule library.
//!
//! ## Features
//!
//! - Rules as plain data ([`RuleSpec`]) with function pointers, no trait objects
//! - Dispatch by concrete node kind and by abstract category
//!   (`AggregateFunction`, `Predicate`, ...)
//! - Per-rule dialect restriction
//!
//! ## Usage
//!
//! ```rust
//! use sqlscope_rules::{Dialect, NodeKind, RuleRegistry};
//!
//! let registry = RuleRegistry::with_builtin_rules();
//! let star_rules = registry.rules_for(NodeKind::Star, Dialect::Generic);
//! assert!(star_rules.iter().any(|rule| rule.id == "SQL-PERF-001"));
//! ```

pub mod builtin;
pub mod registry;
pub mod rule;

// Re-exports from ir for convenience
pub use sqlscope_ir::{Dialect, NodeKind};

pub use registry::{RegistryError, RuleRegistry};
pub use rule::{
    CheckFn, CheckResult, Match, RuleCategory, RuleFault, RuleSpec, Severity, ShouldCheckFn,
    UnknownSeverity,
};
