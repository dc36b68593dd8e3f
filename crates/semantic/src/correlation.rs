// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Correlation analysis
//!
//! Decides whether a subquery references a binding of an enclosing query
//! and summarizes its shape.
//!
//! Only top-level subqueries (those with no `Subquery` ancestor) are
//! summarized against the outer query. A nested subquery is analyzed on its
//! own pass, so [`CorrelationAnalyzer::local_aliases`] can take every table
//! in the subtree without further scoping.

use crate::error::{SemanticError, SemanticResult};
use crate::predicate::PredicateClassifier;
use crate::tree::{outside_subqueries, own_where, query_body, qualifier_of, truncate_chars};
use serde::{Deserialize, Serialize};
use sqlscope_ir::{Node, NodeKind};
use std::collections::HashSet;
use std::fmt;

/// Subquery filters are cut to this many characters
pub const FILTER_RENDER_LIMIT: usize = 80;

/// Own-`WHERE` conjuncts kept per subquery summary
pub const MAX_SUMMARY_FILTERS: usize = 2;

/// Shape of a subquery, from its parent and projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubqueryKind {
    Scalar,
    ScalarAggregate,
    InList,
    CorrelatedExists,
}

impl fmt::Display for SubqueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubqueryKind::Scalar => "scalar",
            SubqueryKind::ScalarAggregate => "scalar aggregate",
            SubqueryKind::InList => "in-list",
            SubqueryKind::CorrelatedExists => "correlated exists",
        })
    }
}

/// Summary of one top-level subquery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubqueryInfo {
    pub kind: SubqueryKind,
    pub is_correlated: bool,
    pub correlation_predicate: Option<String>,
    /// `name` or `name alias`, deduplicated
    pub tables: Vec<String>,
    /// Up to the first two own-`WHERE` conjuncts
    pub filters: Vec<String>,
}

/// Outer-reference detection and subquery summaries
#[derive(Debug, Default, Clone, Copy)]
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    /// Lowercased bindings of every relation inside `subquery`
    pub fn local_aliases(subquery: &Node) -> HashSet<String> {
        subquery
            .walk()
            .filter(|n| {
                n.kind == NodeKind::Table
                    || (n.kind == NodeKind::Subquery && !std::ptr::eq(*n, subquery))
            })
            .filter_map(Node::binding)
            .map(str::to_ascii_lowercase)
            .collect()
    }

    /// Lowercased bindings of relations in `root` outside every subquery
    pub fn outer_aliases(root: &Node) -> HashSet<String> {
        outside_subqueries(root)
            .into_iter()
            .filter(|n| matches!(n.kind, NodeKind::Table | NodeKind::Subquery))
            .filter_map(Node::binding)
            .map(str::to_ascii_lowercase)
            .collect()
    }

    /// First column inside `subquery` qualified by an outer, non-local alias
    pub fn outer_reference<'a>(
        subquery: &'a Node,
        outer_aliases: &HashSet<String>,
    ) -> Option<&'a Node> {
        let local = Self::local_aliases(subquery);
        subquery.walk().find(|n| {
            n.kind == NodeKind::Column
                && qualifier_of(n).is_some_and(|q| outer_aliases.contains(&q) && !local.contains(&q))
        })
    }

    /// Whether `subquery` references a binding of the enclosing query
    pub fn is_correlated(subquery: &Node, outer_aliases: &HashSet<String>) -> bool {
        Self::outer_reference(subquery, outer_aliases).is_some()
    }

    /// Conjunct of the subquery's own `WHERE` that ties it to the outer query
    ///
    /// Falls back to `"<qualifier>.<column> (outer ref)"` when the reference
    /// is not in `WHERE`. `None` when the subquery is not correlated.
    pub fn correlation_predicate(
        subquery: &Node,
        outer_aliases: &HashSet<String>,
    ) -> Option<String> {
        let reference = Self::outer_reference(subquery, outer_aliases)?;
        let needle = format!("{}.", qualifier_of(reference)?);
        let from_where = own_where(subquery).and_then(|clause| {
            PredicateClassifier::split_conjuncts(clause)
                .into_iter()
                .find(|cond| cond.text.to_ascii_lowercase().contains(&needle))
                .map(|cond| cond.text.clone())
        });
        Some(from_where.unwrap_or_else(|| format!("{} (outer ref)", reference.text)))
    }

    /// Shape of `subquery` given the kind of its parent node
    pub fn classify_kind(subquery: &Node, parent_kind: Option<NodeKind>) -> SubqueryKind {
        match parent_kind {
            Some(NodeKind::Exists) => SubqueryKind::CorrelatedExists,
            Some(NodeKind::In) => SubqueryKind::InList,
            _ => {
                let aggregates = query_body(subquery)
                    .and_then(|select| select.child(NodeKind::Projection))
                    .is_some_and(|projection| {
                        projection.walk().any(|n| {
                            matches!(
                                n.kind,
                                NodeKind::Count
                                    | NodeKind::Sum
                                    | NodeKind::Avg
                                    | NodeKind::Min
                                    | NodeKind::Max
                            )
                        })
                    });
                if aggregates {
                    SubqueryKind::ScalarAggregate
                } else {
                    SubqueryKind::Scalar
                }
            }
        }
    }

    /// Summarize a top-level subquery
    ///
    /// # Errors
    ///
    /// [`SemanticError::NotASubquery`] when `subquery` is not a `Subquery` node
    pub fn summarize(
        subquery: &Node,
        parent_kind: Option<NodeKind>,
        outer_aliases: &HashSet<String>,
    ) -> SemanticResult<SubqueryInfo> {
        if subquery.kind != NodeKind::Subquery {
            return Err(SemanticError::NotASubquery(subquery.kind));
        }
        if subquery.children.is_empty() {
            return Err(SemanticError::MissingChild {
                context: NodeKind::Subquery,
                expected: "query body".to_string(),
            });
        }

        let correlation_predicate = Self::correlation_predicate(subquery, outer_aliases);

        let mut tables: Vec<String> = Vec::new();
        for table in subquery.find_all(NodeKind::Table) {
            let Some(name) = table.name.as_deref() else {
                continue;
            };
            let rendered = match table.alias.as_deref() {
                Some(alias) => format!("{name} {alias}"),
                None => name.to_string(),
            };
            if !tables.contains(&rendered) {
                tables.push(rendered);
            }
        }

        let filters = own_where(subquery)
            .map(|clause| {
                PredicateClassifier::split_conjuncts(clause)
                    .into_iter()
                    .take(MAX_SUMMARY_FILTERS)
                    .map(|cond| truncate_chars(&cond.text, FILTER_RENDER_LIMIT))
                    .collect()
            })
            .unwrap_or_default();

        Ok(SubqueryInfo {
            kind: Self::classify_kind(subquery, parent_kind),
            is_correlated: correlation_predicate.is_some(),
            correlation_predicate,
            tables,
            filters,
        })
    }

    /// Subqueries with no `Subquery` ancestor, each with its parent's kind
    pub fn top_level_subqueries(root: &Node) -> Vec<(&Node, Option<NodeKind>)> {
        fn visit<'a>(
            node: &'a Node,
            parent_kind: Option<NodeKind>,
            out: &mut Vec<(&'a Node, Option<NodeKind>)>,
        ) {
            if node.kind == NodeKind::Subquery {
                out.push((node, parent_kind));
                return;
            }
            for child in &node.children {
                visit(child, Some(node.kind), out);
            }
        }

        let mut out = Vec::new();
        visit(root, None, &mut out);
        out
    }

    /// Summaries of every top-level subquery of `root`, in source order
    pub fn summarize_all(root: &Node) -> Vec<SubqueryInfo> {
        let outer = Self::outer_aliases(root);
        Self::top_level_subqueries(root)
            .into_iter()
            .filter_map(|(subquery, parent_kind)| {
                Self::summarize(subquery, parent_kind, &outer).ok()
            })
            .collect()
    }
}
