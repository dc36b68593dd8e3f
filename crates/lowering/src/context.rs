// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Lowering context for tracking state during conversion

use crate::error::LoweringError;
use sqlscope_ir::Dialect;

/// Default bound on nested query/expression lowering
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 256;

/// Context for tracking state during AST → node-tree lowering
///
/// The context maintains:
/// - Recoverable errors (unsupported constructs kept as `Unknown` nodes)
/// - Recursion depth tracking
/// - Dialect information
pub struct LoweringContext {
    /// Target SQL dialect
    dialect: Dialect,

    /// Accumulated recoverable errors
    errors: Vec<LoweringError>,

    /// Current recursion depth
    recursion_depth: usize,

    /// Maximum recursion depth allowed
    max_recursion_depth: usize,
}

impl LoweringContext {
    /// Create a new lowering context
    pub fn new(dialect: Dialect) -> Self {
        Self::with_max_depth(dialect, DEFAULT_MAX_RECURSION_DEPTH)
    }

    /// Create a new lowering context with custom max recursion depth
    pub fn with_max_depth(dialect: Dialect, max_depth: usize) -> Self {
        Self {
            dialect,
            errors: Vec::new(),
            recursion_depth: 0,
            max_recursion_depth: max_depth,
        }
    }

    /// Get the target dialect
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Record a recoverable error
    pub fn add_error(&mut self, error: LoweringError) {
        self.errors.push(error);
    }

    /// Get all accumulated errors
    pub fn errors(&self) -> &[LoweringError] {
        &self.errors
    }

    /// Check if any errors were accumulated
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Record an unsupported construct for this context's dialect
    pub fn unsupported(&mut self, feature: impl Into<String>) {
        let error = LoweringError::UnsupportedSyntax {
            dialect: self.dialect.to_string(),
            feature: feature.into(),
            suggestion: "Lowered as an opaque expression".to_string(),
        };
        self.add_error(error);
    }

    /// Increment recursion depth and check for overflow
    pub fn enter_recursive_context(&mut self, context: &str) -> Result<(), LoweringError> {
        self.recursion_depth += 1;
        if self.recursion_depth > self.max_recursion_depth {
            let error = LoweringError::RecursionLimitExceeded {
                context: context.to_string(),
                depth: self.recursion_depth,
                limit: self.max_recursion_depth,
            };
            self.recursion_depth -= 1;
            return Err(error);
        }
        Ok(())
    }

    /// Decrement recursion depth
    pub fn exit_recursive_context(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    /// Get current recursion depth
    pub fn recursion_depth(&self) -> usize {
        self.recursion_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creation() {
        let ctx = LoweringContext::new(Dialect::MySQL);
        assert_eq!(ctx.dialect(), Dialect::MySQL);
        assert!(!ctx.has_errors());
        assert_eq!(ctx.recursion_depth(), 0);
    }

    #[test]
    fn test_recursion_limit() {
        let mut ctx = LoweringContext::with_max_depth(Dialect::Generic, 2);
        assert!(ctx.enter_recursive_context("query").is_ok());
        assert!(ctx.enter_recursive_context("query").is_ok());
        let err = ctx.enter_recursive_context("query").unwrap_err();
        assert!(matches!(
            err,
            LoweringError::RecursionLimitExceeded { depth: 3, limit: 2, .. }
        ));
        assert_eq!(ctx.recursion_depth(), 2);

        ctx.exit_recursive_context();
        ctx.exit_recursive_context();
        ctx.exit_recursive_context();
        assert_eq!(ctx.recursion_depth(), 0);
    }

    #[test]
    fn test_unsupported_records_dialect() {
        let mut ctx = LoweringContext::new(Dialect::PostgreSQL);
        ctx.unsupported("ARRAY subscript");
        assert!(ctx.has_errors());
        assert!(ctx.errors()[0].to_string().contains("postgresql"));
        assert!(matches!(
            ctx.errors()[0],
            LoweringError::UnsupportedSyntax { .. }
        ));
    }
}
