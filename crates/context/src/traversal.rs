// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Traversal context
//!
//! A [`TraversalContext`] is the scope snapshot a rule sees at one node. The
//! walker never mutates a context: entering a node derives a new value from
//! the parent's, so sibling subtrees cannot observe each other's changes.
//!
//! Flags only ever turn on while descending. [`ContextOverrides`] holds
//! flags to set, never to clear, so a flag set at a node stays set for every
//! descendant of that node. [`TraversalContext::current_clause`] is the one
//! field that is replaced rather than accumulated: it names the clause of the
//! innermost query, and resets on entering a subquery.

use crate::source::find_line;
use sqlscope_ir::{Node, NodeKind};
use std::sync::Arc;

/// Scope name of the outermost query
pub const MAIN_SCOPE: &str = "main";

/// Scope flags in effect at one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalContext {
    pub in_exists: bool,
    pub in_subquery: bool,
    pub in_cte: bool,
    pub in_where: bool,
    pub in_having: bool,
    pub in_join_condition: bool,
    pub in_case: bool,
    pub in_window: bool,
    pub in_select_list: bool,
    pub in_order_by: bool,
    pub in_group_by: bool,
    pub in_from: bool,

    /// `"main"`, or the alias of the enclosing CTE
    pub current_scope: Arc<str>,

    /// Number of nodes entered from the root
    pub nesting_depth: usize,

    /// Number of `Subquery` nodes entered from the root
    pub subquery_depth: usize,

    /// Nearest clause (`Projection`, `Where`, `Join`, ...) of the innermost
    /// query; `None` at a query body or subquery boundary
    pub current_clause: Option<NodeKind>,

    source: Arc<str>,
}

/// Changes a node applies to the context of its subtree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOverrides {
    pub in_exists: bool,
    pub in_subquery: bool,
    pub in_cte: bool,
    pub in_where: bool,
    pub in_having: bool,
    pub in_join_condition: bool,
    pub in_case: bool,
    pub in_window: bool,
    pub in_select_list: bool,
    pub in_order_by: bool,
    pub in_group_by: bool,
    pub in_from: bool,

    /// Increments `subquery_depth`
    pub enters_subquery: bool,

    /// Replaces `current_scope`
    pub scope: Option<Arc<str>>,

    /// Replaces `current_clause`
    pub clause: Option<NodeKind>,
}

impl ContextOverrides {
    /// Overrides applied when entering `node`
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlscope_context::ContextOverrides;
    /// use sqlscope_ir::{Node, NodeKind};
    ///
    /// let overrides = ContextOverrides::for_node(&Node::new(NodeKind::Where, "a = 1"));
    /// assert!(overrides.in_where);
    /// assert!(!overrides.in_having);
    /// ```
    pub fn for_node(node: &Node) -> Self {
        let mut overrides = Self::default();
        match node.kind {
            NodeKind::Exists => overrides.in_exists = true,
            NodeKind::Subquery => {
                overrides.in_subquery = true;
                overrides.enters_subquery = true;
            }
            NodeKind::Cte => {
                overrides.in_cte = true;
                overrides.scope = node.alias_or_name().map(Arc::from);
            }
            NodeKind::Case => overrides.in_case = true,
            NodeKind::Window => overrides.in_window = true,
            NodeKind::Where => overrides.in_where = true,
            NodeKind::Join => overrides.in_join_condition = true,
            NodeKind::Having => overrides.in_having = true,
            NodeKind::Order => overrides.in_order_by = true,
            NodeKind::Group => overrides.in_group_by = true,
            NodeKind::From => overrides.in_from = true,
            NodeKind::Projection => overrides.in_select_list = true,
            _ => {}
        }
        if is_clause(node.kind) {
            overrides.clause = Some(node.kind);
        }
        overrides
    }
}

impl TraversalContext {
    /// Root context for a statement parsed from `source`
    pub fn root(source: impl Into<Arc<str>>) -> Self {
        Self {
            in_exists: false,
            in_subquery: false,
            in_cte: false,
            in_where: false,
            in_having: false,
            in_join_condition: false,
            in_case: false,
            in_window: false,
            in_select_list: false,
            in_order_by: false,
            in_group_by: false,
            in_from: false,
            current_scope: Arc::from(MAIN_SCOPE),
            nesting_depth: 0,
            subquery_depth: 0,
            current_clause: None,
            source: source.into(),
        }
    }

    /// Child context: this one with `overrides` applied
    pub fn derive(&self, overrides: &ContextOverrides) -> Self {
        Self {
            in_exists: self.in_exists || overrides.in_exists,
            in_subquery: self.in_subquery || overrides.in_subquery,
            in_cte: self.in_cte || overrides.in_cte,
            in_where: self.in_where || overrides.in_where,
            in_having: self.in_having || overrides.in_having,
            in_join_condition: self.in_join_condition || overrides.in_join_condition,
            in_case: self.in_case || overrides.in_case,
            in_window: self.in_window || overrides.in_window,
            in_select_list: self.in_select_list || overrides.in_select_list,
            in_order_by: self.in_order_by || overrides.in_order_by,
            in_group_by: self.in_group_by || overrides.in_group_by,
            in_from: self.in_from || overrides.in_from,
            current_scope: overrides
                .scope
                .clone()
                .unwrap_or_else(|| Arc::clone(&self.current_scope)),
            nesting_depth: self.nesting_depth + 1,
            subquery_depth: self.subquery_depth + usize::from(overrides.enters_subquery),
            current_clause: if overrides.enters_subquery {
                None
            } else {
                overrides.clause.or(self.current_clause)
            },
            source: Arc::clone(&self.source),
        }
    }

    /// Context for the subtree of `node`
    pub fn enter(&self, node: &Node) -> Self {
        self.derive(&ContextOverrides::for_node(node))
    }

    /// Source text the statement was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 1-based line of `node`
    ///
    /// Uses the parser span when known, otherwise the first case-insensitive
    /// occurrence of the node text in the source, otherwise line 1.
    pub fn line_of(&self, node: &Node) -> usize {
        if node.line > 0 {
            return node.line;
        }
        find_line(&self.source, &node.text).unwrap_or(1)
    }

    /// `"<scope>:<line>"` location of `node`
    pub fn location(&self, node: &Node) -> String {
        format!("{}:{}", self.current_scope, self.line_of(node))
    }

    /// Whether the innermost query's current clause is one of `clauses`
    pub fn in_own_clause(&self, clauses: &[NodeKind]) -> bool {
        self.current_clause.is_some_and(|clause| clauses.contains(&clause))
    }
}

fn is_clause(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Projection
            | NodeKind::From
            | NodeKind::Join
            | NodeKind::Where
            | NodeKind::Group
            | NodeKind::Having
            | NodeKind::Qualify
            | NodeKind::Order
    )
}
