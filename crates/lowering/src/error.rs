// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Errors raised while parsing SQL and lowering it to the node tree

use serde::Serialize;

/// Result type alias for lowering operations
pub type LoweringResult<T> = Result<T, LoweringError>;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum LoweringError {
    /// The parser rejected the input
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Construct the node tree does not model, kept as an `Unknown` node.
    /// Only ever recorded on the context; lowering continues past it.
    #[error("Syntax not supported by {dialect}: {feature}. {suggestion}")]
    UnsupportedSyntax {
        dialect: String,
        feature: String,
        suggestion: String,
    },

    #[error("Recursion limit exceeded: {context} (depth: {depth}, limit: {limit})")]
    RecursionLimitExceeded {
        context: String,
        depth: usize,
        limit: usize,
    },
}
