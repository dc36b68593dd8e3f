// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlscope - Lowering Layer
//!
//! This crate parses SQL text with `sqlparser` and lowers the resulting AST
//! into the closed [`Node`] tree every analysis runs on.
//!
//! ## Overview
//!
//! The lowering layer is responsible for:
//! - Picking the parser dialect that matches the requested [`Dialect`]
//! - Converting each parsed statement to a [`Node`] tree
//! - Recording constructs it does not model (kept as `Unknown` nodes)
//! - Bounding recursion on pathological nesting
//!
//! ## Lowering Process
//!
//! ```text
//! SQL text → sqlparser AST → Lowering → Node tree → Detector / metadata
//! ```
//!
//! ## Error Handling Strategy
//!
//! - **Parse failure**: [`LoweringError::Parse`]; nothing is lowered
//! - **Unsupported construct**: recorded on the [`LoweringContext`], lowering continues
//! - **Nesting too deep**: [`LoweringError::RecursionLimitExceeded`]
//!
//! ## Usage
//!
//! ```
//! use sqlscope_ir::{Dialect, NodeKind};
//! use sqlscope_lowering::parse;
//!
//! let statements = parse("SELECT id FROM users WHERE id = 1", Dialect::Generic).unwrap();
//! assert_eq!(statements.len(), 1);
//! assert_eq!(statements[0].kind, NodeKind::Select);
//! assert!(statements[0].child(NodeKind::Where).is_some());
//! ```

pub mod ast;
pub mod context;
pub mod dialect;
pub mod error;

pub use ast::AstLowering;
pub use context::{DEFAULT_MAX_RECURSION_DEPTH, LoweringContext};
pub use error::{LoweringError, LoweringResult};

use sqlparser::parser::Parser;
use sqlscope_ir::{Dialect, Node};
use tracing::debug;

/// Parse `sql` and lower every statement
pub fn parse(sql: &str, dialect: Dialect) -> LoweringResult<Vec<Node>> {
    let mut ctx = LoweringContext::new(dialect);
    parse_with_context(&mut ctx, sql)
}

/// Parse `sql` with a caller-supplied context
///
/// Recoverable errors stay on `ctx` for the caller to inspect.
pub fn parse_with_context(ctx: &mut LoweringContext, sql: &str) -> LoweringResult<Vec<Node>> {
    let parser_dialect = dialect::parser_dialect(ctx.dialect());
    let statements =
        Parser::parse_sql(parser_dialect.as_ref(), sql).map_err(|e| LoweringError::Parse {
            message: e.to_string(),
        })?;
    debug!(
        dialect = %ctx.dialect(),
        statements = statements.len(),
        "Parsed SQL"
    );

    let lowering = AstLowering::new();
    let nodes = statements
        .iter()
        .map(|stmt| lowering.lower_statement(ctx, stmt))
        .collect::<LoweringResult<Vec<_>>>()?;

    if ctx.has_errors() {
        debug!(
            unsupported = ctx.errors().len(),
            "Lowered with unsupported constructs"
        );
    }
    Ok(nodes)
}
