// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Node kinds
//!
//! [`NodeKind`] is the closed set of tags a [`crate::Node`] can carry, plus the
//! abstract categories rules may target (`AggregateFunction`, `Predicate`, ...).
//!
//! Concrete kinds relate to categories through the static table returned by
//! [`NodeKind::ancestors`]. Nodes never carry an abstract kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag of a node in the lowered SQL tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    // ===== Abstract categories =====
    Query,
    SetOperation,
    Literal,
    Binary,
    Connector,
    Predicate,
    Arithmetic,
    Function,
    AggregateFunction,

    // ===== Statements and query bodies =====
    Select,
    Union,
    Intersect,
    Except,
    Values,
    Insert,
    Update,
    Delete,
    /// Any statement the analyzer does not model
    Command,

    // ===== Clauses =====
    With,
    Cte,
    Projection,
    From,
    Join,
    Where,
    Group,
    Having,
    Qualify,
    Order,
    Ordered,
    Limit,
    Offset,
    Window,
    Distinct,

    // ===== Relations and references =====
    Table,
    TableFunction,
    Subquery,
    Column,
    Star,
    Alias,
    Paren,
    Tuple,

    // ===== Literals =====
    NumberLiteral,
    StringLiteral,
    BooleanLiteral,
    Null,
    Placeholder,
    Interval,

    // ===== Logical and comparison operators =====
    And,
    Or,
    Not,
    Neg,
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Is,
    Like,
    ILike,
    In,
    Between,
    Exists,

    // ===== Arithmetic and other binary operators =====
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    /// Binary operator without a dedicated kind
    Operator,

    // ===== Expressions with structure =====
    Case,
    /// `ELSE` branch of a `CASE`, wrapping its result
    Else,
    Cast,

    // ===== Functions =====
    Count,
    Sum,
    Avg,
    Min,
    Max,
    ArrayAgg,
    StringAgg,
    Coalesce,
    Lower,
    Upper,
    Trim,
    Substring,
    Rand,
    /// Function call without a dedicated kind
    Anonymous,

    /// Expression the lowering layer does not model
    Unknown,
}

use NodeKind::*;

const QUERY: &[NodeKind] = &[Query];
const SET_OPERATION: &[NodeKind] = &[SetOperation, Query];
const LITERAL: &[NodeKind] = &[Literal];
const CONNECTOR: &[NodeKind] = &[Connector, Binary];
const COMPARISON: &[NodeKind] = &[Predicate, Binary];
const PREDICATE: &[NodeKind] = &[Predicate];
const ARITHMETIC: &[NodeKind] = &[Arithmetic, Binary];
const BINARY: &[NodeKind] = &[Binary];
const AGGREGATE: &[NodeKind] = &[AggregateFunction, Function];
const FUNCTION: &[NodeKind] = &[Function];
const NONE: &[NodeKind] = &[];

impl NodeKind {
    /// Abstract categories this kind belongs to, nearest first
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlscope_ir::NodeKind;
    ///
    /// assert!(NodeKind::Count.ancestors().contains(&NodeKind::AggregateFunction));
    /// assert!(NodeKind::Union.ancestors().contains(&NodeKind::Query));
    /// assert!(NodeKind::Table.ancestors().is_empty());
    /// ```
    pub fn ancestors(self) -> &'static [NodeKind] {
        match self {
            Select | Values => QUERY,
            Union | Intersect | Except => SET_OPERATION,
            NumberLiteral | StringLiteral | BooleanLiteral | Null | Placeholder | Interval => {
                LITERAL
            }
            And | Or => CONNECTOR,
            Eq | Neq | Gt | Gte | Lt | Lte | Is | Like | ILike => COMPARISON,
            In | Between | Exists => PREDICATE,
            Add | Sub | Mul | Div | Mod => ARITHMETIC,
            Concat | Operator => BINARY,
            Count | Sum | Avg | Min | Max | ArrayAgg | StringAgg => AGGREGATE,
            Coalesce | Lower | Upper | Trim | Substring | Rand | Anonymous | Cast => FUNCTION,
            _ => NONE,
        }
    }

    /// True when `self` is `other` or one of its ancestor categories is
    pub fn is_a(self, other: NodeKind) -> bool {
        self == other || self.ancestors().contains(&other)
    }

    /// Abstract categories only appear as rule targets
    pub fn is_abstract(self) -> bool {
        matches!(
            self,
            Query
                | SetOperation
                | Literal
                | Binary
                | Connector
                | Predicate
                | Arithmetic
                | Function
                | AggregateFunction
        )
    }

    /// Whether this is one of the comparison kinds (`=`, `<>`, `<`, ...)
    pub fn is_comparison(self) -> bool {
        matches!(self, Eq | Neq | Gt | Gte | Lt | Lte)
    }

    /// Map a function name to its kind (case-insensitive)
    ///
    /// Unrecognized names map to [`NodeKind::Anonymous`].
    pub fn from_function_name(name: &str) -> NodeKind {
        match name.to_ascii_uppercase().as_str() {
            "COUNT" => Count,
            "SUM" => Sum,
            "AVG" | "MEAN" => Avg,
            "MIN" => Min,
            "MAX" => Max,
            "ARRAY_AGG" | "LIST" => ArrayAgg,
            "STRING_AGG" | "GROUP_CONCAT" | "LISTAGG" => StringAgg,
            "COALESCE" | "IFNULL" | "NVL" => Coalesce,
            "LOWER" | "LCASE" => Lower,
            "UPPER" | "UCASE" => Upper,
            "TRIM" | "LTRIM" | "RTRIM" => Trim,
            "SUBSTRING" | "SUBSTR" => Substring,
            "RAND" | "RANDOM" => Rand,
            _ => Anonymous,
        }
    }

    /// Name of the kind as it appears in logs and rule listings
    pub fn as_str(self) -> &'static str {
        match self {
            Query => "Query",
            SetOperation => "SetOperation",
            Literal => "Literal",
            Binary => "Binary",
            Connector => "Connector",
            Predicate => "Predicate",
            Arithmetic => "Arithmetic",
            Function => "Function",
            AggregateFunction => "AggregateFunction",
            Select => "Select",
            Union => "Union",
            Intersect => "Intersect",
            Except => "Except",
            Values => "Values",
            Insert => "Insert",
            Update => "Update",
            Delete => "Delete",
            Command => "Command",
            With => "With",
            Cte => "CTE",
            Projection => "Projection",
            From => "From",
            Join => "Join",
            Where => "Where",
            Group => "Group",
            Having => "Having",
            Qualify => "Qualify",
            Order => "Order",
            Ordered => "Ordered",
            Limit => "Limit",
            Offset => "Offset",
            Window => "Window",
            Distinct => "Distinct",
            Table => "Table",
            TableFunction => "TableFunction",
            Subquery => "Subquery",
            Column => "Column",
            Star => "Star",
            Alias => "Alias",
            Paren => "Paren",
            Tuple => "Tuple",
            NumberLiteral => "NumberLiteral",
            StringLiteral => "StringLiteral",
            BooleanLiteral => "BooleanLiteral",
            Null => "Null",
            Placeholder => "Placeholder",
            Interval => "Interval",
            And => "And",
            Or => "Or",
            Not => "Not",
            Neg => "Neg",
            Eq => "EQ",
            Neq => "NEQ",
            Gt => "GT",
            Gte => "GTE",
            Lt => "LT",
            Lte => "LTE",
            Is => "Is",
            Like => "Like",
            ILike => "ILike",
            In => "In",
            Between => "Between",
            Exists => "Exists",
            Add => "Add",
            Sub => "Sub",
            Mul => "Mul",
            Div => "Div",
            Mod => "Mod",
            Concat => "Concat",
            Operator => "Operator",
            Case => "Case",
            Else => "Else",
            Cast => "Cast",
            Count => "Count",
            Sum => "Sum",
            Avg => "Avg",
            Min => "Min",
            Max => "Max",
            ArrayAgg => "ArrayAgg",
            StringAgg => "StringAgg",
            Coalesce => "Coalesce",
            Lower => "Lower",
            Upper => "Upper",
            Trim => "Trim",
            Substring => "Substring",
            Rand => "Rand",
            Anonymous => "Anonymous",
            Unknown => "Unknown",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
