// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # sqlscope - Semantic Analysis Layer
//!
//! Scope-sensitive analyses over lowered statements.
//!
//! ## Overview
//!
//! - **Predicate classification**: split a `WHERE` tree into conjuncts and
//!   label each as a join, a filter, or a correlation ([`PredicateClassifier`])
//! - **Correlation analysis**: decide whether a subquery references the
//!   enclosing query and summarize it ([`CorrelationAnalyzer`])
//! - **Dependencies**: the tables the outer query reads, excluding those
//!   that only appear inside subqueries ([`DependencyResolver`])
//! - **Metadata**: all of the above for one statement ([`QueryMetadata`])
//!
//! ## Example
//!
//! ```rust
//! use sqlscope_ir::Dialect;
//! use sqlscope_semantic::{QueryMetadata, SubqueryKind};
//!
//! let sql = "SELECT * FROM t1 WHERE x > (SELECT AVG(y) FROM t2 WHERE t2.k = t1.k)";
//! let statements = sqlscope_lowering::parse(sql, Dialect::Generic).unwrap();
//! let metadata = QueryMetadata::from_statement(&statements[0]);
//!
//! let subquery = &metadata.subqueries[0];
//! assert_eq!(subquery.kind, SubqueryKind::ScalarAggregate);
//! assert_eq!(subquery.correlation_predicate.as_deref(), Some("t2.k = t1.k"));
//! ```

pub mod correlation;
pub mod dependency;
pub mod error;
pub mod metadata;
pub mod predicate;
pub mod tree;

pub use correlation::{CorrelationAnalyzer, SubqueryInfo, SubqueryKind};
pub use dependency::{DependencyEntry, DependencyResolver, DependencyRole};
pub use error::{SemanticError, SemanticResult};
pub use metadata::QueryMetadata;
pub use predicate::{PredicateCategory, PredicateClassification, PredicateClassifier};
