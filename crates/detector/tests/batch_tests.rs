// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Batch analysis tests

use pretty_assertions::assert_eq;
use sqlscope_context::TraversalContext;
use sqlscope_detector::{Detector, DetectorConfig, PARSE_FAILURE_ID, TIMEOUT_ID, detect_batch};
use sqlscope_ir::{Dialect, Node, NodeKind};
use sqlscope_rules::{CheckResult, Match, RuleRegistry, RuleSpec, Severity};
use sqlscope_test_utils::SqlFixtures;
use std::sync::Arc;
use std::time::Duration;

fn slow_check<'a>(node: &'a Node, ctx: &TraversalContext) -> CheckResult<'a> {
    std::thread::sleep(Duration::from_millis(300));
    Ok(vec![Match::new(node, ctx)])
}

fn slow_detector() -> Detector {
    let mut registry = RuleRegistry::new();
    registry
        .register(
            RuleSpec::new("SLOW-001", "Slow Star", &[NodeKind::Star], slow_check)
                .with_severity(Severity::Low, 1),
        )
        .unwrap();
    Detector::with_registry(registry, DetectorConfig::default())
}

#[tokio::test]
async fn test_batch_preserves_input_order() {
    let detector = Arc::new(Detector::default());
    let inputs = vec![
        SqlFixtures::unfiltered_delete().to_string(),
        SqlFixtures::clean_select().to_string(),
        SqlFixtures::unparsable().to_string(),
    ];

    let reports = detect_batch(
        Arc::clone(&detector),
        inputs.clone(),
        Dialect::Generic,
        Duration::from_secs(10),
    )
    .await;

    assert_eq!(reports.len(), 3);
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.index, i);
        assert!(!report.timed_out);
        assert_eq!(report.issues, detector.detect(&inputs[i], Dialect::Generic));
    }
    assert!(reports[0].issues.iter().any(|i| i.rule_id == "SQL-CORR-003"));
    assert!(reports[1].issues.is_empty());
    assert_eq!(reports[2].issues[0].rule_id, PARSE_FAILURE_ID);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_batch_timeout_reports_synthetic_issue() {
    let detector = Arc::new(slow_detector());
    let inputs = vec![
        SqlFixtures::select_star().to_string(),
        SqlFixtures::clean_select().to_string(),
    ];

    let reports = detect_batch(detector, inputs, Dialect::Generic, Duration::from_millis(50)).await;

    assert!(reports[0].timed_out);
    assert_eq!(reports[0].issues.len(), 1);
    assert_eq!(reports[0].issues[0].rule_id, TIMEOUT_ID);
    assert_eq!(reports[0].issues[0].severity, Severity::High);
    assert_eq!(reports[0].issues[0].penalty, 30);
    assert_eq!(reports[0].issues[0].matched_text, SqlFixtures::select_star());

    assert!(!reports[1].timed_out);
    assert!(reports[1].issues.is_empty());
}

#[tokio::test]
async fn test_empty_batch() {
    let reports = detect_batch(
        Arc::new(Detector::default()),
        Vec::new(),
        Dialect::Generic,
        Duration::from_secs(1),
    )
    .await;
    assert!(reports.is_empty());
}
