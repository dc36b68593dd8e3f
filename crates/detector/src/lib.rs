// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlscope - Detector
//!
//! Entry point of the analysis pipeline:
//!
//! ```text
//! SQL text → lowering → Node tree → Detector walk → rules → Issues
//!                                 ↘ QueryMetadata (predicates, dependencies, subqueries)
//! ```
//!
//! - [`Detector::detect`] runs the rule library and returns deduplicated
//!   [`Issue`]s in traversal order
//! - [`Detector::extract_metadata`] summarizes the first statement
//! - [`detect_batch`] analyzes many inputs on the tokio blocking pool under a
//!   per-input deadline
//! - [`DetectorConfig`] carries the dialect, disabled rules, severity floor,
//!   deadline and excerpt length, loadable from YAML or JSON

pub mod batch;
pub mod config;
pub mod detector;
pub mod issue;

pub use batch::{BatchReport, detect_batch};
pub use config::{ConfigError, DetectorConfig};
pub use detector::{Detector, is_blank};
pub use issue::{Issue, PARSE_FAILURE_ID, TIMEOUT_ID};
