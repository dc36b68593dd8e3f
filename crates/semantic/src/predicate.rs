// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Predicate classification
//!
//! Splits a `WHERE`/`ON` condition into its top-level conjuncts and labels
//! each one as a join, a filter, or a correlation with an enclosing query.
//!
//! Conjuncts that match none of the recognized shapes and are too long to
//! be a useful filter label are dropped rather than guessed.

use crate::tree::{own_where, query_body, qualifier_of, truncate_chars, unparen};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlscope_ir::{Node, NodeKind};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

/// Rendered conditions longer than this are abbreviated when they hold a subquery
pub const SUBQUERY_RENDER_LIMIT: usize = 80;

/// Projected expressions longer than this collapse to `AGG(...)`
pub const PROJECTION_RENDER_LIMIT: usize = 60;

/// Unrecognized conjuncts at or above this length are dropped
pub const UNCLASSIFIED_LIMIT: usize = 200;

/// Short table-prefix column naming (`l_partkey`, `ps_suppkey`, `o_orderkey`)
static TABLE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z]{1,2}_").expect("valid table prefix pattern"));

/// Label of a classified conjunct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateCategory {
    Join,
    Filter,
    /// Equates a local column with a column of an enclosing query
    Correlated,
}

impl fmt::Display for PredicateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PredicateCategory::Join => "join",
            PredicateCategory::Filter => "filter",
            PredicateCategory::Correlated => "correlated",
        })
    }
}

/// A classified conjunct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateClassification {
    pub category: PredicateCategory,
    pub text: String,
}

impl PredicateClassification {
    pub fn new(category: PredicateCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }
}

/// Conjunct splitting and classification
#[derive(Debug, Default, Clone, Copy)]
pub struct PredicateClassifier;

impl PredicateClassifier {
    /// Flatten a nested `AND` tree into its leaf conditions, in source order
    ///
    /// Looks through an enclosing `Where`/`Having` clause node and through
    /// parentheses wrapping an `AND`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlscope_ir::{Node, NodeKind};
    /// use sqlscope_semantic::PredicateClassifier;
    ///
    /// let cond = Node::new(NodeKind::And, "a = 1 AND b = 2")
    ///     .with_child(Node::new(NodeKind::Eq, "a = 1"))
    ///     .with_child(Node::new(NodeKind::Eq, "b = 2"));
    /// let conjuncts = PredicateClassifier::split_conjuncts(&cond);
    /// assert_eq!(conjuncts.len(), 2);
    /// assert_eq!(conjuncts[1].text, "b = 2");
    /// ```
    pub fn split_conjuncts(expr: &Node) -> Vec<&Node> {
        fn collect<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
            let inner = unparen(node);
            match inner.kind {
                NodeKind::And => {
                    for child in &inner.children {
                        collect(child, out);
                    }
                }
                NodeKind::Where | NodeKind::Having if inner.children.len() == 1 => {
                    collect(&inner.children[0], out);
                }
                _ => out.push(node),
            }
        }

        let mut out = Vec::new();
        collect(expr, &mut out);
        out
    }

    /// Classify one conjunct
    ///
    /// # Arguments
    ///
    /// * `cond` - A leaf condition, usually from [`Self::split_conjuncts`]
    /// * `outer_aliases` - Lowercased aliases bound by enclosing queries
    ///
    /// # Returns
    ///
    /// `None` when the condition is unrecognized and too long to label
    pub fn classify(
        cond: &Node,
        outer_aliases: &HashSet<String>,
    ) -> Option<PredicateClassification> {
        if cond.kind == NodeKind::Subquery || cond.contains(NodeKind::Subquery) {
            return Some(PredicateClassification::new(
                PredicateCategory::Filter,
                Self::render_with_subquery(cond),
            ));
        }

        let shape = unparen(cond);
        match shape.kind {
            NodeKind::Eq | NodeKind::Is => {
                let columns: Vec<&Node> = shape
                    .children
                    .iter()
                    .map(unparen)
                    .filter(|c| c.kind == NodeKind::Column)
                    .collect();
                match columns.len() {
                    2 => {
                        let category = if Self::is_correlation(&columns, outer_aliases) {
                            PredicateCategory::Correlated
                        } else {
                            PredicateCategory::Join
                        };
                        Some(PredicateClassification::new(category, &cond.text))
                    }
                    1 => Some(PredicateClassification::new(
                        PredicateCategory::Filter,
                        &cond.text,
                    )),
                    _ => Self::fallback(cond),
                }
            }
            NodeKind::Neq
            | NodeKind::Gt
            | NodeKind::Gte
            | NodeKind::Lt
            | NodeKind::Lte
            | NodeKind::In => Some(PredicateClassification::new(
                PredicateCategory::Filter,
                &cond.text,
            )),
            _ => Self::fallback(cond),
        }
    }

    /// Split and classify a whole condition, dropping unclassifiable conjuncts
    pub fn classify_all(
        expr: &Node,
        outer_aliases: &HashSet<String>,
    ) -> Vec<PredicateClassification> {
        Self::split_conjuncts(expr)
            .into_iter()
            .filter_map(|cond| Self::classify(cond, outer_aliases))
            .collect()
    }

    fn fallback(cond: &Node) -> Option<PredicateClassification> {
        (cond.text.chars().count() < UNCLASSIFIED_LIMIT)
            .then(|| PredicateClassification::new(PredicateCategory::Filter, &cond.text))
    }

    /// Exactly one side is qualified by an enclosing query's alias
    fn is_correlation(columns: &[&Node], outer_aliases: &HashSet<String>) -> bool {
        columns
            .iter()
            .filter(|c| qualifier_of(c).is_some_and(|q| outer_aliases.contains(&q)))
            .count()
            == 1
    }

    /// Render a condition holding a subquery, abbreviating long ones
    ///
    /// `x < (SELECT 0.2 * AVG(l_quantity) FROM lineitem WHERE l_partkey = p_partkey)`
    /// renders as `x < (SELECT 0.2 * AVG(l_quantity) ...) (per partkey)`.
    pub fn render_with_subquery(cond: &Node) -> String {
        if cond.text.chars().count() <= SUBQUERY_RENDER_LIMIT {
            return cond.text.clone();
        }
        let Some(subquery) = cond.find_first(NodeKind::Subquery) else {
            return cond.text.clone();
        };

        let projection = query_body(subquery)
            .and_then(|select| select.child(NodeKind::Projection))
            .and_then(|projection| projection.children.first());
        let projected = match projection {
            Some(expr) if expr.text.chars().count() > PROJECTION_RENDER_LIMIT => {
                match expr.find_first(NodeKind::AggregateFunction) {
                    Some(agg) => format!("{}(...)", Self::function_name(agg)),
                    None => format!("{}...", truncate_chars(&expr.text, PROJECTION_RENDER_LIMIT)),
                }
            }
            Some(expr) => expr.text.clone(),
            None => "*".to_string(),
        };

        let abbreviated = format!("(SELECT {projected} ...)");
        let mut rendered = if subquery.text.is_empty() {
            abbreviated
        } else {
            cond.text.replacen(&subquery.text, &abbreviated, 1)
        };

        if let Some(column) = Self::first_equality_column(subquery) {
            rendered.push_str(&format!(" (per {column})"));
        }
        rendered
    }

    fn function_name(node: &Node) -> String {
        node.name
            .as_deref()
            .unwrap_or(node.kind.as_str())
            .to_ascii_uppercase()
    }

    /// First column of the first equality in the subquery's own `WHERE`,
    /// with a short table prefix removed
    fn first_equality_column(subquery: &Node) -> Option<String> {
        let eq = Self::split_conjuncts(own_where(subquery)?)
            .into_iter()
            .map(unparen)
            .find(|cond| cond.kind == NodeKind::Eq)?;
        let column = eq
            .children
            .iter()
            .map(unparen)
            .find(|c| c.kind == NodeKind::Column)?;
        let name = column.name.as_deref()?;
        Some(TABLE_PREFIX.replace(name, "").into_owned())
    }
}
