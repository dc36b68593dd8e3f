// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlscope - Traversal Context
//!
//! This crate provides the scope snapshot threaded through the rule walk.
//!
//! ## Overview
//!
//! While the detector walks a statement depth-first, every node derives a
//! new [`TraversalContext`] from its parent's. The context answers the
//! questions rules ask about where a node sits:
//!
//! - inside `EXISTS`, a subquery, a CTE, a `CASE`, a window?
//! - inside `WHERE`, `HAVING`, a join condition, `ORDER BY`, `GROUP BY`, `FROM`?
//! - in the select list?
//! - how deep, and under which CTE scope?
//!
//! ## Core Concepts
//!
//! ### Derivation
//!
//! [`TraversalContext::enter`] applies the [`ContextOverrides`] of a node kind
//! and returns a fresh value. Flags are only ever set, so they hold for the
//! whole subtree and never leak to siblings.
//!
//! ### Source Lines
//!
//! The [`source`] module resolves a node to its source line when the parser
//! did not record one.
//!
//! ## Examples
//!
//! ```
//! use sqlscope_context::TraversalContext;
//! use sqlscope_ir::{Node, NodeKind};
//!
//! let root = TraversalContext::root("SELECT * FROM t WHERE EXISTS (SELECT 1)");
//! let exists = Node::new(NodeKind::Exists, "EXISTS (SELECT 1)");
//! let inner = root.enter(&exists);
//!
//! assert!(inner.in_exists);
//! assert!(!root.in_exists);
//! ```

pub mod source;
pub mod traversal;

// Re-export commonly used types
pub use source::{byte_to_line, find_line};
pub use traversal::{ContextOverrides, MAIN_SCOPE, TraversalContext};
