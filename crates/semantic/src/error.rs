// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Error types for semantic analysis
//!
//! This module defines error types used throughout the semantic analysis layer.

use sqlscope_ir::NodeKind;
use thiserror::Error;

/// Result type alias for semantic operations
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Errors that can occur during semantic analysis
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// An operation that needs a `Subquery` node was handed something else
    #[error("Expected a Subquery node, found {0}")]
    NotASubquery(NodeKind),

    /// A node is missing a child the lowering layer always produces
    #[error("Malformed {context} node: missing {expected}")]
    MissingChild { context: NodeKind, expected: String },
}
