// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Batch analysis on the tokio blocking pool
//!
//! Every input runs as its own blocking task under its own deadline. An input
//! that misses the deadline reports one `SQL-TIMEOUT-001` issue; its task is
//! left to finish in the background since blocking tasks cannot be aborted.

use crate::detector::Detector;
use crate::issue::Issue;
use serde::Serialize;
use sqlscope_ir::Dialect;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tokio::time::timeout;
use tracing::warn;

/// Result of analyzing one batch input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Position of the input in the batch
    pub index: usize,
    pub issues: Vec<Issue>,
    pub timed_out: bool,
}

/// Analyze every input concurrently; reports come back in input order
pub async fn detect_batch(
    detector: Arc<Detector>,
    inputs: Vec<String>,
    dialect: Dialect,
    deadline: Duration,
) -> Vec<BatchReport> {
    let handles: Vec<JoinHandle<BatchReport>> = inputs
        .into_iter()
        .enumerate()
        .map(|(index, sql)| {
            let detector = Arc::clone(&detector);
            task::spawn(analyze_one(detector, index, sql, dialect, deadline))
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!(index, error = %e, "Batch task failed");
                reports.push(BatchReport {
                    index,
                    issues: Vec::new(),
                    timed_out: false,
                });
            }
        }
    }
    reports
}

async fn analyze_one(
    detector: Arc<Detector>,
    index: usize,
    sql: String,
    dialect: Dialect,
    deadline: Duration,
) -> BatchReport {
    let source = sql.clone();
    let work = task::spawn_blocking(move || detector.detect(&sql, dialect));

    match timeout(deadline, work).await {
        Ok(Ok(issues)) => BatchReport {
            index,
            issues,
            timed_out: false,
        },
        Ok(Err(e)) => {
            warn!(index, error = %e, "Detection task failed");
            BatchReport {
                index,
                issues: Vec::new(),
                timed_out: false,
            }
        }
        Err(_) => {
            warn!(index, deadline_ms = deadline.as_millis() as u64, "Detection timed out");
            BatchReport {
                index,
                issues: vec![Issue::timeout(&source, deadline)],
                timed_out: true,
            }
        }
    }
}
