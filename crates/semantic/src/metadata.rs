// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Query metadata
//!
//! Structured summary of one statement, combining predicate classification,
//! subquery summaries and table dependencies. Consumed by report
//! generators, never by rules.

use crate::correlation::{CorrelationAnalyzer, SubqueryInfo};
use crate::dependency::{DependencyEntry, DependencyResolver};
use crate::predicate::{PredicateCategory, PredicateClassifier};
use crate::tree::{outside_subqueries, own_where};
use serde::Serialize;
use sqlscope_ir::{Node, NodeKind};
use std::collections::{BTreeMap, HashSet};
use tracing::trace;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryMetadata {
    /// Join and correlated predicates, from `WHERE` and `ON`
    pub joins: Vec<String>,
    pub filters: Vec<String>,
    pub dependencies: Vec<DependencyEntry>,
    pub subqueries: Vec<SubqueryInfo>,
    pub order_by: Vec<String>,
    pub limit: Option<String>,
    /// `"<kind>: <predicate>"` of the first correlated subquery
    pub correlated_detail: Option<String>,
    /// alias → table name, for aliased tables outside subqueries
    pub table_aliases: BTreeMap<String, String>,
}

impl QueryMetadata {
    /// Build metadata for a lowered statement
    pub fn from_statement(root: &Node) -> Self {
        let mut metadata = Self::default();
        let top_level = HashSet::new();

        let mut conditions: Vec<&Node> = Vec::new();
        if let Some(clause) = own_where(root) {
            conditions.extend(PredicateClassifier::split_conjuncts(clause));
        }
        for join in outside_subqueries(root)
            .into_iter()
            .filter(|n| n.kind == NodeKind::Join)
        {
            if let Some(on) = join.children.get(1).filter(|c| c.kind != NodeKind::Tuple) {
                conditions.extend(PredicateClassifier::split_conjuncts(on));
            }
        }

        for cond in conditions {
            let Some(classification) = PredicateClassifier::classify(cond, &top_level) else {
                trace!("dropping unclassifiable predicate");
                continue;
            };
            match classification.category {
                PredicateCategory::Join | PredicateCategory::Correlated => {
                    metadata.joins.push(classification.text)
                }
                PredicateCategory::Filter => metadata.filters.push(classification.text),
            }
        }

        metadata.dependencies = DependencyResolver::resolve(root);
        metadata.subqueries = CorrelationAnalyzer::summarize_all(root);
        metadata.correlated_detail = metadata.subqueries.iter().find_map(|info| {
            info.correlation_predicate
                .as_ref()
                .map(|predicate| format!("{}: {predicate}", info.kind))
        });

        if let Some(order) = root.child(NodeKind::Order) {
            metadata.order_by = order
                .children_of_kind(NodeKind::Ordered)
                .map(|ordered| ordered.text.clone())
                .collect();
        }
        metadata.limit = root
            .child(NodeKind::Limit)
            .map(|limit| limit.text.clone());

        for table in outside_subqueries(root)
            .into_iter()
            .filter(|n| n.kind == NodeKind::Table)
        {
            if let (Some(alias), Some(name)) = (&table.alias, &table.name) {
                metadata.table_aliases.insert(alias.clone(), name.clone());
            }
        }

        metadata
    }
}
