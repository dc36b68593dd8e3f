// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for sqlscope
//!
//! This crate provides common testing components including:
//! - Sample SQL fixtures
//! - Node builders for tests that skip the parser
//! - Mock rules for registry and detector tests
//! - Rule-level helpers and assertions

pub mod assertions;
pub mod fixtures;
pub mod mock_rules;
pub mod node_builder;

// Re-exports for convenience
pub use assertions::{RuleHit, SqlAssertions};
pub use fixtures::SqlFixtures;
pub use mock_rules::MockRules;
pub use node_builder::NodeBuilder;
