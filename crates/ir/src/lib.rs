// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlscope - Intermediate Representation
//!
//! This crate provides the closed node tree every analysis runs on.
//! The IR is designed to:
//! - Be dialect-agnostic (the parser adapter does the dialect work)
//! - Tag every node with a [`NodeKind`] from a closed enum
//! - Relate concrete kinds to abstract categories through a static table
//! - Keep the rendered SQL text and source line of every node

pub mod dialect;
pub mod kind;
pub mod node;

// Re-export commonly used types
pub use dialect::{Dialect, UnknownDialect};
pub use kind::NodeKind;
pub use node::{Node, Walk};
