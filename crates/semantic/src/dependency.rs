// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Table dependencies of the outer query

use crate::tree::outside_subqueries;
use serde::{Deserialize, Serialize};
use sqlscope_ir::{Node, NodeKind};
use std::collections::HashSet;
use std::fmt;

/// How a table enters the outer query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyRole {
    Base,
    Join,
}

/// One table the outer query reads
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEntry {
    pub name: String,
    pub alias: Option<String>,
    pub role: DependencyRole,
}

impl DependencyEntry {
    fn from_table(table: &Node, role: DependencyRole) -> Option<Self> {
        Some(Self {
            name: table.name.clone()?,
            alias: table.alias.clone(),
            role,
        })
    }

    fn key(&self) -> (String, Option<String>) {
        table_key(&self.name, self.alias.as_deref())
    }
}

impl fmt::Display for DependencyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(alias) = &self.alias {
            write!(f, " {alias}")?;
        }
        if self.role == DependencyRole::Join {
            write!(f, "(join)")?;
        }
        Ok(())
    }
}

fn table_key(name: &str, alias: Option<&str>) -> (String, Option<String>) {
    (
        name.to_ascii_lowercase(),
        alias.map(str::to_ascii_lowercase),
    )
}

/// Resolves the tables a statement depends on directly
///
/// Tables that only appear inside subqueries are excluded; they belong to
/// the subquery summaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct DependencyResolver;

impl DependencyResolver {
    /// Base table(s) first, then joined tables in source order
    pub fn resolve(root: &Node) -> Vec<DependencyEntry> {
        let nested: HashSet<(String, Option<String>)> = root
            .find_all(NodeKind::Subquery)
            .into_iter()
            .flat_map(|subquery| subquery.find_all(NodeKind::Table))
            .filter_map(|table| {
                let name = table.name.as_deref()?;
                Some(table_key(name, table.alias.as_deref()))
            })
            .collect();

        let base = root
            .find_first(NodeKind::From)
            .into_iter()
            .flat_map(|from| from.children_of_kind(NodeKind::Table))
            .filter_map(|table| DependencyEntry::from_table(table, DependencyRole::Base));

        let joined = outside_subqueries(root)
            .into_iter()
            .filter(|n| n.kind == NodeKind::Join)
            .flat_map(|join| join.children_of_kind(NodeKind::Table))
            .filter_map(|table| DependencyEntry::from_table(table, DependencyRole::Join));

        let mut seen = HashSet::new();
        base.chain(joined)
            .filter(|entry| !nested.contains(&entry.key()))
            .filter(|entry| seen.insert(entry.key()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, alias: Option<&str>) -> Node {
        let mut node = Node::new(NodeKind::Table, name).with_name(name);
        node.alias = alias.map(str::to_string);
        node
    }

    #[test]
    fn test_display() {
        let entry = DependencyEntry {
            name: "orders".to_string(),
            alias: Some("o".to_string()),
            role: DependencyRole::Join,
        };
        assert_eq!(entry.to_string(), "orders o(join)");

        let base = DependencyEntry {
            name: "a".to_string(),
            alias: None,
            role: DependencyRole::Base,
        };
        assert_eq!(base.to_string(), "a");
    }

    #[test]
    fn test_resolve_base_and_join() {
        let root = Node::new(NodeKind::Select, "SELECT ...")
            .with_child(Node::new(NodeKind::From, "a").with_child(table("a", None)))
            .with_child(
                Node::new(NodeKind::Join, "JOIN b")
                    .with_name("INNER")
                    .with_child(table("b", None)),
            );

        let deps = DependencyResolver::resolve(&root);
        let rendered: Vec<String> = deps.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["a", "b(join)"]);
    }

    #[test]
    fn test_resolve_excludes_subquery_tables() {
        let subquery = Node::new(NodeKind::Subquery, "(SELECT ...)").with_child(
            Node::new(NodeKind::Select, "SELECT ...")
                .with_child(Node::new(NodeKind::From, "b").with_child(table("b", None))),
        );
        let root = Node::new(NodeKind::Select, "SELECT ...")
            .with_child(Node::new(NodeKind::From, "a").with_child(table("a", None)))
            .with_child(Node::new(NodeKind::Where, "...").with_child(subquery));

        let deps = DependencyResolver::resolve(&root);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "a");
    }
}
