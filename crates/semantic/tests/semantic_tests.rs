// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Semantic analysis over lowered statements

use pretty_assertions::assert_eq;
use sqlscope_ir::{Dialect, Node, NodeKind};
use sqlscope_semantic::{
    CorrelationAnalyzer, DependencyResolver, PredicateCategory, PredicateClassifier,
    QueryMetadata, SemanticError, SubqueryKind,
};
use std::collections::HashSet;

fn lower(sql: &str) -> Node {
    let mut nodes = sqlscope_lowering::parse(sql, Dialect::Generic).expect("query should parse");
    nodes.remove(0)
}

#[test]
fn test_correlated_scalar_aggregate() {
    let root = lower("SELECT * FROM t1 WHERE x > (SELECT AVG(y) FROM t2 WHERE t2.k = t1.k)");
    let outer = CorrelationAnalyzer::outer_aliases(&root);
    assert_eq!(outer, HashSet::from(["t1".to_string()]));

    let top = CorrelationAnalyzer::top_level_subqueries(&root);
    assert_eq!(top.len(), 1);
    let (subquery, parent) = top[0];
    assert_eq!(parent, Some(NodeKind::Gt));
    assert!(CorrelationAnalyzer::is_correlated(subquery, &outer));

    let info = CorrelationAnalyzer::summarize(subquery, parent, &outer).unwrap();
    assert_eq!(info.kind, SubqueryKind::ScalarAggregate);
    assert!(info.is_correlated);
    assert_eq!(info.correlation_predicate.as_deref(), Some("t2.k = t1.k"));
    assert_eq!(info.tables, vec!["t2".to_string()]);
    assert_eq!(info.filters, vec!["t2.k = t1.k".to_string()]);
}

#[test]
fn test_correlated_exists() {
    let root = lower(
        "SELECT * FROM orders o WHERE EXISTS \
         (SELECT 1 FROM items i WHERE i.order_id = o.id AND i.qty > 0)",
    );
    let info = &CorrelationAnalyzer::summarize_all(&root)[0];
    assert_eq!(info.kind, SubqueryKind::CorrelatedExists);
    assert_eq!(info.correlation_predicate.as_deref(), Some("i.order_id = o.id"));
    assert_eq!(info.tables, vec!["items i".to_string()]);
    assert_eq!(
        info.filters,
        vec!["i.order_id = o.id".to_string(), "i.qty > 0".to_string()]
    );
}

#[test]
fn test_uncorrelated_in_list() {
    let root = lower("SELECT * FROM a WHERE a.id IN (SELECT id FROM c)");
    let info = &CorrelationAnalyzer::summarize_all(&root)[0];
    assert_eq!(info.kind, SubqueryKind::InList);
    assert!(!info.is_correlated);
    assert_eq!(info.correlation_predicate, None);
}

#[test]
fn test_local_alias_shadows_outer() {
    // The inner `a` is bound locally, so `a.x` is not an outer reference
    let root = lower("SELECT * FROM a WHERE y = (SELECT MAX(a.x) FROM a)");
    let info = &CorrelationAnalyzer::summarize_all(&root)[0];
    assert!(!info.is_correlated);
}

#[test]
fn test_outer_reference_outside_where() {
    let root = lower("SELECT (SELECT t1.a + u.b FROM u) AS v FROM t1");
    let info = &CorrelationAnalyzer::summarize_all(&root)[0];
    assert_eq!(info.kind, SubqueryKind::Scalar);
    assert_eq!(info.correlation_predicate.as_deref(), Some("t1.a (outer ref)"));
}

#[test]
fn test_only_top_level_subqueries_are_summarized() {
    let root = lower("SELECT * FROM t WHERE x IN (SELECT y FROM u WHERE u.z IN (SELECT z FROM v))");
    assert_eq!(CorrelationAnalyzer::top_level_subqueries(&root).len(), 1);
    let info = &CorrelationAnalyzer::summarize_all(&root)[0];
    assert_eq!(info.tables, vec!["u".to_string(), "v".to_string()]);
}

#[test]
fn test_summarize_rejects_non_subquery() {
    let root = lower("SELECT 1");
    let err = CorrelationAnalyzer::summarize(&root, None, &HashSet::new()).unwrap_err();
    assert_eq!(err, SemanticError::NotASubquery(NodeKind::Select));
}

#[test]
fn test_dependencies_exclude_subquery_tables() {
    let root = lower("SELECT * FROM a JOIN b ON a.id = b.id WHERE a.id IN (SELECT id FROM c)");
    let deps: Vec<String> = DependencyResolver::resolve(&root)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(deps, vec!["a".to_string(), "b(join)".to_string()]);
}

#[test]
fn test_dependencies_render_aliases() {
    let root = lower("SELECT * FROM a x JOIN b y ON x.id = y.id JOIN b y2 ON y2.id = x.id");
    let deps: Vec<String> = DependencyResolver::resolve(&root)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        deps,
        vec![
            "a x".to_string(),
            "b y(join)".to_string(),
            "b y2(join)".to_string()
        ]
    );
}

#[test]
fn test_classification_labels() {
    let root = lower("SELECT * FROM a, b WHERE a.id = b.id AND a.status = 'X' AND a.n > 5");
    let clause = root.child(NodeKind::Where).unwrap();
    let conjuncts = PredicateClassifier::split_conjuncts(clause);
    assert_eq!(conjuncts.len(), 3);

    let labels: Vec<PredicateCategory> = conjuncts
        .iter()
        .filter_map(|cond| PredicateClassifier::classify(cond, &HashSet::new()))
        .map(|c| c.category)
        .collect();
    assert_eq!(
        labels,
        vec![
            PredicateCategory::Join,
            PredicateCategory::Filter,
            PredicateCategory::Filter
        ]
    );
}

#[test]
fn test_long_subquery_condition_is_abbreviated() {
    let root = lower(
        "SELECT SUM(l_extendedprice) / 7.0 AS avg_yearly FROM lineitem, part \
         WHERE p_partkey = l_partkey AND p_brand = 'Brand#23' \
         AND l_quantity < (SELECT 0.2 * AVG(l_quantity) FROM lineitem WHERE l_partkey = p_partkey)",
    );
    let metadata = QueryMetadata::from_statement(&root);
    assert_eq!(metadata.joins, vec!["p_partkey = l_partkey".to_string()]);
    assert_eq!(
        metadata.filters,
        vec![
            "p_brand = 'Brand#23'".to_string(),
            "l_quantity < (SELECT 0.2 * AVG(l_quantity) ...) (per partkey)".to_string(),
        ]
    );
}

#[test]
fn test_metadata_collects_everything() {
    let root = lower(
        "SELECT o.id FROM orders o LEFT JOIN customers c ON o.customer_id = c.id \
         WHERE o.total > 100 ORDER BY o.id DESC LIMIT 10",
    );
    let metadata = QueryMetadata::from_statement(&root);
    assert_eq!(metadata.joins, vec!["o.customer_id = c.id".to_string()]);
    assert_eq!(metadata.filters, vec!["o.total > 100".to_string()]);
    assert_eq!(metadata.order_by, vec!["o.id DESC".to_string()]);
    assert_eq!(metadata.limit.as_deref(), Some("10"));
    assert_eq!(metadata.correlated_detail, None);
    assert_eq!(metadata.table_aliases.get("o").map(String::as_str), Some("orders"));
    assert_eq!(metadata.table_aliases.get("c").map(String::as_str), Some("customers"));
    assert_eq!(metadata.dependencies.len(), 2);
}

#[test]
fn test_metadata_correlated_detail() {
    let root = lower("SELECT * FROM t1 WHERE x > (SELECT AVG(y) FROM t2 WHERE t2.k = t1.k)");
    let metadata = QueryMetadata::from_statement(&root);
    assert_eq!(
        metadata.correlated_detail.as_deref(),
        Some("scalar aggregate: t2.k = t1.k")
    );
}

#[test]
fn test_schema_qualified_tables_correlate() {
    let root =
        lower("SELECT * FROM sch.t1 WHERE x > (SELECT AVG(y) FROM sch.t2 WHERE t2.k = t1.k)");
    let outer = CorrelationAnalyzer::outer_aliases(&root);
    assert_eq!(outer, HashSet::from(["t1".to_string()]));

    let info = &CorrelationAnalyzer::summarize_all(&root)[0];
    assert_eq!(info.kind, SubqueryKind::ScalarAggregate);
    assert!(info.is_correlated);
    assert_eq!(info.correlation_predicate.as_deref(), Some("t2.k = t1.k"));
    assert_eq!(info.tables, vec!["sch.t2".to_string()]);

    let deps: Vec<String> = DependencyResolver::resolve(&root)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(deps, vec!["sch.t1".to_string()]);
}

#[test]
fn test_schema_qualified_local_table_is_not_outer() {
    let root = lower("SELECT (SELECT MAX(u.x) FROM sch.u) AS m FROM sch.t");
    let (subquery, _) = CorrelationAnalyzer::top_level_subqueries(&root)[0];
    assert!(CorrelationAnalyzer::local_aliases(subquery).contains("u"));
    assert!(!CorrelationAnalyzer::summarize_all(&root)[0].is_correlated);
}

#[test]
fn test_delete_metadata_uses_statement_where() {
    let root = lower("DELETE FROM t WHERE t.a = 1 AND t.id IN (SELECT id FROM u WHERE u.z = 2)");
    let metadata = QueryMetadata::from_statement(&root);
    assert_eq!(
        metadata.filters,
        vec![
            "t.a = 1".to_string(),
            "t.id IN (SELECT id FROM u WHERE u.z = 2)".to_string(),
        ]
    );
    let deps: Vec<String> = metadata.dependencies.iter().map(ToString::to_string).collect();
    assert_eq!(deps, vec!["t".to_string()]);
    assert_eq!(metadata.subqueries.len(), 1);
    assert_eq!(metadata.subqueries[0].kind, SubqueryKind::InList);
    assert_eq!(metadata.subqueries[0].filters, vec!["u.z = 2".to_string()]);
}

#[test]
fn test_update_metadata_uses_statement_where() {
    let root = lower(
        "UPDATE accounts SET flag = 1 WHERE accounts.owner = 5 \
         AND EXISTS (SELECT 1 FROM owners o WHERE o.id = accounts.owner)",
    );
    let metadata = QueryMetadata::from_statement(&root);
    assert_eq!(metadata.filters[0], "accounts.owner = 5");
    assert_eq!(metadata.filters.len(), 2);

    let info = &metadata.subqueries[0];
    assert_eq!(info.kind, SubqueryKind::CorrelatedExists);
    assert_eq!(info.correlation_predicate.as_deref(), Some("o.id = accounts.owner"));
    assert_eq!(
        metadata.correlated_detail.as_deref(),
        Some("correlated exists: o.id = accounts.owner")
    );
}
