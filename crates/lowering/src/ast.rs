// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! sqlparser AST → node tree
//!
//! [`AstLowering`] turns one parsed statement into a [`Node`] tree. Layout
//! conventions the analyzers rely on:
//!
//! - A query lowers to its body (`Select`, `Union`, ...). `WITH` is the first
//!   child of the body, `ORDER BY`/`LIMIT`/`OFFSET` are trailing children.
//! - Every nested query is wrapped in a `Subquery` node.
//! - `Join` nodes hold the joined relation first and the `ON` condition second.
//! - Window calls lower to a `Window` node wrapping the function, followed by
//!   the `PARTITION BY` expressions and an `Order` node.

use crate::context::LoweringContext;
use crate::error::LoweringResult;
use sqlparser::ast::{
    BinaryOperator, DuplicateTreatment, Expr, FromTable, Function, FunctionArg, FunctionArgExpr,
    FunctionArguments, GroupByExpr, Join, JoinConstraint, JoinOperator, OrderByExpr, Query,
    Select, SelectItem, SetExpr, SetOperator, SetQuantifier, Spanned, Statement, TableFactor,
    TableWithJoins, UnaryOperator, Value, WindowType,
};
use sqlparser::tokenizer::Span;
use sqlscope_ir::{Node, NodeKind};

/// Line of a span, or `fallback` when the span is empty
fn line_of(span: Span, fallback: usize) -> usize {
    match span.start.line {
        0 => fallback,
        line => line as usize,
    }
}

fn join_list<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lowers sqlparser statements into [`Node`] trees
#[derive(Debug, Default, Clone, Copy)]
pub struct AstLowering;

impl AstLowering {
    pub fn new() -> Self {
        Self
    }

    /// Lower a complete statement
    pub fn lower_statement(
        &self,
        ctx: &mut LoweringContext,
        stmt: &Statement,
    ) -> LoweringResult<Node> {
        let line = line_of(stmt.span(), 1);
        match stmt {
            Statement::Query(query) => self.lower_query(ctx, query, line),
            Statement::Explain { statement, .. } => self.lower_statement(ctx, statement),
            Statement::Insert(insert) => {
                let mut node = Node::new(NodeKind::Insert, stmt.to_string()).at_line(line);
                if let Some(source) = &insert.source {
                    node.children.push(self.lower_query(ctx, source, line)?);
                }
                Ok(node)
            }
            Statement::Update {
                table, selection, ..
            } => {
                let mut node = Node::new(NodeKind::Update, stmt.to_string()).at_line(line);
                node.children
                    .push(self.lower_from(ctx, std::slice::from_ref(table), line)?);
                node.children
                    .extend(self.lower_joins(ctx, std::slice::from_ref(table), line)?);
                if let Some(selection) = selection {
                    node.children.push(self.lower_clause(
                        ctx,
                        NodeKind::Where,
                        selection,
                        line,
                    )?);
                }
                Ok(node)
            }
            Statement::Delete(delete) => {
                let mut node = Node::new(NodeKind::Delete, stmt.to_string()).at_line(line);
                let tables = match &delete.from {
                    FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables) => {
                        tables
                    }
                };
                if !tables.is_empty() {
                    node.children.push(self.lower_from(ctx, tables, line)?);
                    node.children.extend(self.lower_joins(ctx, tables, line)?);
                }
                if let Some(selection) = &delete.selection {
                    node.children.push(self.lower_clause(
                        ctx,
                        NodeKind::Where,
                        selection,
                        line,
                    )?);
                }
                Ok(node)
            }
            _ => Ok(Node::new(NodeKind::Command, stmt.to_string()).at_line(line)),
        }
    }

    /// Lower a query to its body node
    pub fn lower_query(
        &self,
        ctx: &mut LoweringContext,
        query: &Query,
        parent_line: usize,
    ) -> LoweringResult<Node> {
        ctx.enter_recursive_context("query lowering")?;
        let result = self.lower_query_inner(ctx, query, parent_line);
        ctx.exit_recursive_context();
        result
    }

    fn lower_query_inner(
        &self,
        ctx: &mut LoweringContext,
        query: &Query,
        parent_line: usize,
    ) -> LoweringResult<Node> {
        let line = line_of(query.span(), parent_line);
        let mut body = self.lower_set_expr(ctx, &query.body, line)?;

        if let Some(with) = &query.with {
            let mut with_node = Node::new(NodeKind::With, with.to_string()).at_line(line);
            for cte in &with.cte_tables {
                let alias = cte.alias.name.value.clone();
                let cte_line = line_of(cte.alias.name.span, line);
                let cte_node = Node::new(NodeKind::Cte, cte.to_string())
                    .with_name(alias.clone())
                    .with_alias(alias)
                    .at_line(cte_line)
                    .with_child(self.lower_query(ctx, &cte.query, cte_line)?);
                with_node.children.push(cte_node);
            }
            body.children.insert(0, with_node);
        }

        if let Some(order_by) = &query.order_by {
            if !order_by.exprs.is_empty() {
                body.children
                    .push(self.lower_order_by(ctx, &order_by.exprs, line)?);
            }
        }

        if let Some(limit) = &query.limit {
            body.children
                .push(self.lower_clause(ctx, NodeKind::Limit, limit, line)?);
        }

        if let Some(offset) = &query.offset {
            body.children
                .push(self.lower_clause(ctx, NodeKind::Offset, &offset.value, line)?);
        }

        Ok(body)
    }

    fn lower_set_expr(
        &self,
        ctx: &mut LoweringContext,
        set_expr: &SetExpr,
        line: usize,
    ) -> LoweringResult<Node> {
        match set_expr {
            SetExpr::Select(select) => self.lower_select(ctx, select, line),
            SetExpr::Query(query) => {
                let inner = self.lower_query(ctx, query, line)?;
                Ok(Node::new(NodeKind::Subquery, format!("({query})"))
                    .at_line(inner.line.max(line))
                    .with_child(inner))
            }
            SetExpr::SetOperation {
                op,
                set_quantifier,
                left,
                right,
            } => {
                let kind = match op {
                    SetOperator::Union => NodeKind::Union,
                    SetOperator::Intersect => NodeKind::Intersect,
                    _ => NodeKind::Except,
                };
                let distinct = !matches!(
                    set_quantifier,
                    SetQuantifier::All | SetQuantifier::AllByName
                );
                let left = self.lower_set_expr(ctx, left, line)?;
                let right = self.lower_set_expr(ctx, right, line)?;
                Ok(Node::new(kind, set_expr.to_string())
                    .with_distinct(distinct)
                    .at_line(left.line.max(line))
                    .with_child(left)
                    .with_child(right))
            }
            SetExpr::Values(values) => {
                let mut node = Node::new(NodeKind::Values, set_expr.to_string()).at_line(line);
                for row in &values.rows {
                    let mut tuple = Node::new(NodeKind::Tuple, format!("({})", join_list(row)))
                        .at_line(line);
                    for expr in row {
                        tuple.children.push(self.lower_expr(ctx, expr, line)?);
                    }
                    node.children.push(tuple);
                }
                Ok(node)
            }
            _ => {
                ctx.unsupported("set expression");
                Ok(Node::new(NodeKind::Unknown, set_expr.to_string()).at_line(line))
            }
        }
    }

    fn lower_select(
        &self,
        ctx: &mut LoweringContext,
        select: &Select,
        parent_line: usize,
    ) -> LoweringResult<Node> {
        let line = line_of(select.span(), parent_line);
        let mut node = Node::new(NodeKind::Select, select.to_string()).at_line(line);

        if let Some(distinct) = &select.distinct {
            node.children
                .push(Node::new(NodeKind::Distinct, distinct.to_string()).at_line(line));
        }

        let mut projection =
            Node::new(NodeKind::Projection, join_list(&select.projection)).at_line(line);
        for item in &select.projection {
            projection
                .children
                .push(self.lower_select_item(ctx, item, line)?);
        }
        node.children.push(projection);

        if !select.from.is_empty() {
            node.children.push(self.lower_from(ctx, &select.from, line)?);
            node.children
                .extend(self.lower_joins(ctx, &select.from, line)?);
        }

        if let Some(selection) = &select.selection {
            node.children
                .push(self.lower_clause(ctx, NodeKind::Where, selection, line)?);
        }

        match &select.group_by {
            GroupByExpr::Expressions(exprs, _) if !exprs.is_empty() => {
                let mut group = Node::new(NodeKind::Group, join_list(exprs)).at_line(line);
                for expr in exprs {
                    group.children.push(self.lower_expr(ctx, expr, line)?);
                }
                node.children.push(group);
            }
            GroupByExpr::All(_) => {
                node.children
                    .push(Node::new(NodeKind::Group, "ALL").at_line(line));
            }
            _ => {}
        }

        if let Some(having) = &select.having {
            node.children
                .push(self.lower_clause(ctx, NodeKind::Having, having, line)?);
        }

        if let Some(qualify) = &select.qualify {
            node.children
                .push(self.lower_clause(ctx, NodeKind::Qualify, qualify, line)?);
        }

        Ok(node)
    }

    fn lower_select_item(
        &self,
        ctx: &mut LoweringContext,
        item: &SelectItem,
        line: usize,
    ) -> LoweringResult<Node> {
        match item {
            SelectItem::UnnamedExpr(expr) => self.lower_expr(ctx, expr, line),
            SelectItem::ExprWithAlias { expr, alias } => {
                let inner = self.lower_expr(ctx, expr, line)?;
                Ok(Node::new(NodeKind::Alias, item.to_string())
                    .with_alias(alias.value.clone())
                    .at_line(inner.line)
                    .with_child(inner))
            }
            SelectItem::QualifiedWildcard(name, _) => Ok(Node::new(NodeKind::Star, item.to_string())
                .with_qualifier(name.to_string())
                .at_line(line)),
            SelectItem::Wildcard(_) => Ok(Node::new(NodeKind::Star, item.to_string()).at_line(line)),
        }
    }

    /// `From` node holding the first relation of every comma-separated item
    fn lower_from(
        &self,
        ctx: &mut LoweringContext,
        from: &[TableWithJoins],
        line: usize,
    ) -> LoweringResult<Node> {
        let text = from
            .iter()
            .map(|twj| twj.relation.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let mut node = Node::new(NodeKind::From, text).at_line(line);
        for twj in from {
            node.children
                .push(self.lower_table_factor(ctx, &twj.relation, line)?);
        }
        Ok(node)
    }

    fn lower_joins(
        &self,
        ctx: &mut LoweringContext,
        from: &[TableWithJoins],
        line: usize,
    ) -> LoweringResult<Vec<Node>> {
        let mut joins = Vec::new();
        for twj in from {
            for join in &twj.joins {
                joins.push(self.lower_join(ctx, join, line)?);
            }
        }
        Ok(joins)
    }

    fn lower_join(
        &self,
        ctx: &mut LoweringContext,
        join: &Join,
        parent_line: usize,
    ) -> LoweringResult<Node> {
        let relation = self.lower_table_factor(ctx, &join.relation, parent_line)?;
        let (join_type, constraint) = match &join.join_operator {
            JoinOperator::Inner(c) => ("INNER", Some(c)),
            JoinOperator::LeftOuter(c) => ("LEFT", Some(c)),
            JoinOperator::RightOuter(c) => ("RIGHT", Some(c)),
            JoinOperator::FullOuter(c) => ("FULL", Some(c)),
            JoinOperator::CrossJoin => ("CROSS", None),
            _ => ("OTHER", None),
        };

        let line = relation.line.max(parent_line);
        let mut node = Node::new(NodeKind::Join, join.to_string())
            .with_name(join_type)
            .at_line(line)
            .with_child(relation);

        match constraint {
            Some(JoinConstraint::On(expr)) => node.children.push(self.lower_expr(ctx, expr, line)?),
            Some(JoinConstraint::Using(_)) => {
                node.children
                    .push(Node::new(NodeKind::Tuple, "USING").at_line(line));
            }
            Some(JoinConstraint::Natural) => node.name = Some("NATURAL".to_string()),
            _ => {}
        }
        Ok(node)
    }

    fn lower_table_factor(
        &self,
        ctx: &mut LoweringContext,
        factor: &TableFactor,
        parent_line: usize,
    ) -> LoweringResult<Node> {
        match factor {
            TableFactor::Table { name, alias, .. } => {
                let line = name
                    .0
                    .first()
                    .map(|ident| line_of(ident.span, parent_line))
                    .unwrap_or(parent_line);
                let mut node = Node::new(NodeKind::Table, factor.to_string())
                    .with_name(name.to_string())
                    .at_line(line);
                if let Some(alias) = alias {
                    node.alias = Some(alias.name.value.clone());
                }
                Ok(node)
            }
            TableFactor::Derived {
                subquery, alias, ..
            } => {
                let inner = self.lower_query(ctx, subquery, parent_line)?;
                let mut node = Node::new(NodeKind::Subquery, factor.to_string())
                    .at_line(inner.line.max(parent_line))
                    .with_child(inner);
                if let Some(alias) = alias {
                    node.alias = Some(alias.name.value.clone());
                }
                Ok(node)
            }
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => {
                let from = std::slice::from_ref(table_with_joins.as_ref());
                let mut node = Node::new(NodeKind::Paren, factor.to_string()).at_line(parent_line);
                node.children
                    .push(self.lower_table_factor(ctx, &table_with_joins.relation, parent_line)?);
                node.children
                    .extend(self.lower_joins(ctx, from, parent_line)?);
                Ok(node)
            }
            TableFactor::TableFunction { expr, alias } => {
                let mut node = Node::new(NodeKind::TableFunction, factor.to_string())
                    .at_line(parent_line)
                    .with_child(self.lower_expr(ctx, expr, parent_line)?);
                if let Some(alias) = alias {
                    node.alias = Some(alias.name.value.clone());
                }
                Ok(node)
            }
            _ => Ok(Node::new(NodeKind::TableFunction, factor.to_string()).at_line(parent_line)),
        }
    }

    /// Clause node (`Where`, `Having`, `Limit`, ...) wrapping one expression
    fn lower_clause(
        &self,
        ctx: &mut LoweringContext,
        kind: NodeKind,
        expr: &Expr,
        parent_line: usize,
    ) -> LoweringResult<Node> {
        let inner = self.lower_expr(ctx, expr, parent_line)?;
        Ok(Node::new(kind, expr.to_string())
            .at_line(inner.line)
            .with_child(inner))
    }

    fn lower_order_by(
        &self,
        ctx: &mut LoweringContext,
        exprs: &[OrderByExpr],
        line: usize,
    ) -> LoweringResult<Node> {
        let mut node = Node::new(NodeKind::Order, join_list(exprs)).at_line(line);
        for ordered in exprs {
            let inner = self.lower_expr(ctx, &ordered.expr, line)?;
            node.children.push(
                Node::new(NodeKind::Ordered, ordered.to_string())
                    .at_line(inner.line)
                    .with_child(inner),
            );
        }
        if let Some(first) = node.children.first() {
            node.line = first.line;
        }
        Ok(node)
    }

    /// Lower an expression
    pub fn lower_expr(
        &self,
        ctx: &mut LoweringContext,
        expr: &Expr,
        parent_line: usize,
    ) -> LoweringResult<Node> {
        ctx.enter_recursive_context("expression lowering")?;
        let result = self.lower_expr_inner(ctx, expr, parent_line);
        ctx.exit_recursive_context();
        result
    }

    fn lower_expr_inner(
        &self,
        ctx: &mut LoweringContext,
        expr: &Expr,
        parent_line: usize,
    ) -> LoweringResult<Node> {
        let line = line_of(expr.span(), parent_line);
        let text = expr.to_string();
        let node = match expr {
            Expr::Identifier(ident) => Node::new(NodeKind::Column, text).with_name(ident.value.clone()),
            Expr::CompoundIdentifier(idents) => {
                let mut node = Node::new(NodeKind::Column, text);
                if let Some(last) = idents.last() {
                    node.name = Some(last.value.clone());
                }
                if idents.len() >= 2 {
                    node.qualifier = Some(idents[idents.len() - 2].value.clone());
                }
                node
            }
            Expr::Wildcard(..) => Node::new(NodeKind::Star, text),
            Expr::QualifiedWildcard(name, ..) => {
                Node::new(NodeKind::Star, text).with_qualifier(name.to_string())
            }
            Expr::Value(value) => {
                let kind = match value {
                    Value::Number(..) => NodeKind::NumberLiteral,
                    Value::Boolean(_) => NodeKind::BooleanLiteral,
                    Value::Null => NodeKind::Null,
                    Value::Placeholder(_) => NodeKind::Placeholder,
                    _ => NodeKind::StringLiteral,
                };
                Node::new(kind, text)
            }
            Expr::Interval(_) => Node::new(NodeKind::Interval, text),
            Expr::Nested(inner) => {
                Node::new(NodeKind::Paren, text).with_child(self.lower_expr(ctx, inner, line)?)
            }
            Expr::BinaryOp { left, op, right } => {
                let kind = binary_kind(op);
                let mut node = Node::new(kind, text);
                if kind == NodeKind::Operator {
                    node.name = Some(op.to_string());
                }
                node.with_child(self.lower_expr(ctx, left, line)?)
                    .with_child(self.lower_expr(ctx, right, line)?)
            }
            Expr::UnaryOp { op, expr: inner } => match op {
                UnaryOperator::Not => {
                    Node::new(NodeKind::Not, text).with_child(self.lower_expr(ctx, inner, line)?)
                }
                UnaryOperator::Minus => {
                    Node::new(NodeKind::Neg, text).with_child(self.lower_expr(ctx, inner, line)?)
                }
                UnaryOperator::Plus => return self.lower_expr(ctx, inner, line),
                _ => Node::new(NodeKind::Operator, text)
                    .with_name(op.to_string())
                    .with_child(self.lower_expr(ctx, inner, line)?),
            },
            Expr::IsNull(inner) | Expr::IsNotNull(inner) => Node::new(NodeKind::Is, text)
                .with_negated(matches!(expr, Expr::IsNotNull(_)))
                .with_child(self.lower_expr(ctx, inner, line)?)
                .with_child(Node::new(NodeKind::Null, "NULL").at_line(line)),
            Expr::IsTrue(inner) | Expr::IsNotTrue(inner) => Node::new(NodeKind::Is, text)
                .with_negated(matches!(expr, Expr::IsNotTrue(_)))
                .with_child(self.lower_expr(ctx, inner, line)?)
                .with_child(Node::new(NodeKind::BooleanLiteral, "TRUE").at_line(line)),
            Expr::IsFalse(inner) | Expr::IsNotFalse(inner) => Node::new(NodeKind::Is, text)
                .with_negated(matches!(expr, Expr::IsNotFalse(_)))
                .with_child(self.lower_expr(ctx, inner, line)?)
                .with_child(Node::new(NodeKind::BooleanLiteral, "FALSE").at_line(line)),
            Expr::IsDistinctFrom(a, b) | Expr::IsNotDistinctFrom(a, b) => {
                Node::new(NodeKind::Is, text)
                    .with_negated(matches!(expr, Expr::IsDistinctFrom(..)))
                    .with_child(self.lower_expr(ctx, a, line)?)
                    .with_child(self.lower_expr(ctx, b, line)?)
            }
            Expr::InList {
                expr: inner,
                list,
                negated,
                ..
            } => {
                let mut node = Node::new(NodeKind::In, text)
                    .with_negated(*negated)
                    .with_child(self.lower_expr(ctx, inner, line)?);
                for item in list {
                    node.children.push(self.lower_expr(ctx, item, line)?);
                }
                node
            }
            Expr::InSubquery {
                expr: inner,
                subquery,
                negated,
                ..
            } => Node::new(NodeKind::In, text)
                .with_negated(*negated)
                .with_child(self.lower_expr(ctx, inner, line)?)
                .with_child(self.lower_subquery(ctx, subquery, line)?),
            Expr::Between {
                expr: inner,
                negated,
                low,
                high,
                ..
            } => Node::new(NodeKind::Between, text)
                .with_negated(*negated)
                .with_child(self.lower_expr(ctx, inner, line)?)
                .with_child(self.lower_expr(ctx, low, line)?)
                .with_child(self.lower_expr(ctx, high, line)?),
            Expr::Like {
                negated,
                expr: inner,
                pattern,
                ..
            }
            | Expr::SimilarTo {
                negated,
                expr: inner,
                pattern,
                ..
            } => Node::new(NodeKind::Like, text)
                .with_negated(*negated)
                .with_child(self.lower_expr(ctx, inner, line)?)
                .with_child(self.lower_expr(ctx, pattern, line)?),
            Expr::ILike {
                negated,
                expr: inner,
                pattern,
                ..
            } => Node::new(NodeKind::ILike, text)
                .with_negated(*negated)
                .with_child(self.lower_expr(ctx, inner, line)?)
                .with_child(self.lower_expr(ctx, pattern, line)?),
            Expr::Exists {
                subquery, negated, ..
            } => Node::new(NodeKind::Exists, text)
                .with_negated(*negated)
                .with_child(self.lower_subquery(ctx, subquery, line)?),
            Expr::Subquery(subquery) => return self.lower_subquery(ctx, subquery, line),
            Expr::Function(function) => return self.lower_function(ctx, function, &text, line),
            Expr::Case {
                operand,
                conditions,
                results,
                else_result,
                ..
            } => {
                let mut node = Node::new(NodeKind::Case, text);
                if let Some(operand) = operand {
                    node.children.push(self.lower_expr(ctx, operand, line)?);
                }
                for (condition, result) in conditions.iter().zip(results) {
                    node.children.push(self.lower_expr(ctx, condition, line)?);
                    node.children.push(self.lower_expr(ctx, result, line)?);
                }
                if let Some(else_result) = else_result {
                    let result = self.lower_expr(ctx, else_result, line)?;
                    node.children.push(
                        Node::new(NodeKind::Else, result.text.clone())
                            .at_line(result.line)
                            .with_child(result),
                    );
                }
                node
            }
            Expr::Cast {
                expr: inner,
                data_type,
                ..
            } => Node::new(NodeKind::Cast, text)
                .with_name(data_type.to_string())
                .with_child(self.lower_expr(ctx, inner, line)?),
            Expr::Tuple(items) => {
                let mut node = Node::new(NodeKind::Tuple, text);
                for item in items {
                    node.children.push(self.lower_expr(ctx, item, line)?);
                }
                node
            }
            Expr::Substring { expr: inner, .. } => Node::new(NodeKind::Substring, text)
                .with_name("SUBSTRING")
                .with_child(self.lower_expr(ctx, inner, line)?),
            Expr::Trim { expr: inner, .. } => Node::new(NodeKind::Trim, text)
                .with_name("TRIM")
                .with_child(self.lower_expr(ctx, inner, line)?),
            Expr::Extract { expr: inner, .. } => Node::new(NodeKind::Anonymous, text)
                .with_name("EXTRACT")
                .with_child(self.lower_expr(ctx, inner, line)?),
            Expr::Collate { expr: inner, .. } => return self.lower_expr(ctx, inner, line),
            _ => {
                ctx.unsupported(format!("expression `{text}`"));
                Node::new(NodeKind::Unknown, text)
            }
        };
        Ok(node.at_line(line))
    }

    fn lower_subquery(
        &self,
        ctx: &mut LoweringContext,
        query: &Query,
        line: usize,
    ) -> LoweringResult<Node> {
        let inner = self.lower_query(ctx, query, line)?;
        Ok(Node::new(NodeKind::Subquery, format!("({query})"))
            .at_line(inner.line.max(line))
            .with_child(inner))
    }

    fn lower_function(
        &self,
        ctx: &mut LoweringContext,
        function: &Function,
        text: &str,
        line: usize,
    ) -> LoweringResult<Node> {
        let name = function.name.to_string();
        let short_name = name.rsplit('.').next().unwrap_or(&name);
        let kind = NodeKind::from_function_name(short_name);

        let mut call = Node::new(kind, text).with_name(name.as_str()).at_line(line);
        match &function.args {
            FunctionArguments::List(list) => {
                call.distinct = matches!(
                    list.duplicate_treatment,
                    Some(DuplicateTreatment::Distinct)
                );
                for arg in &list.args {
                    let arg = match arg {
                        FunctionArg::Unnamed(arg) | FunctionArg::Named { arg, .. } => arg,
                        _ => continue,
                    };
                    match arg {
                        FunctionArgExpr::Expr(expr) => {
                            call.children.push(self.lower_expr(ctx, expr, line)?)
                        }
                        FunctionArgExpr::QualifiedWildcard(_) | FunctionArgExpr::Wildcard => {}
                    }
                }
            }
            FunctionArguments::Subquery(query) => {
                call.children.push(self.lower_subquery(ctx, query, line)?);
            }
            FunctionArguments::None => {}
        }

        match &function.over {
            Some(WindowType::WindowSpec(spec)) => {
                // Window children: call, partition expressions, then ordering
                let mut window = Node::new(NodeKind::Window, text).at_line(line);
                window.children.push(call);
                for expr in &spec.partition_by {
                    window.children.push(self.lower_expr(ctx, expr, line)?);
                }
                if !spec.order_by.is_empty() {
                    window
                        .children
                        .push(self.lower_order_by(ctx, &spec.order_by, line)?);
                }
                Ok(window)
            }
            Some(WindowType::NamedWindow(window_name)) => Ok(Node::new(NodeKind::Window, text)
                .with_name(window_name.value.clone())
                .at_line(line)
                .with_child(call)),
            None => Ok(call),
        }
    }
}

fn binary_kind(op: &BinaryOperator) -> NodeKind {
    match op {
        BinaryOperator::And => NodeKind::And,
        BinaryOperator::Or => NodeKind::Or,
        BinaryOperator::Eq => NodeKind::Eq,
        BinaryOperator::NotEq => NodeKind::Neq,
        BinaryOperator::Gt => NodeKind::Gt,
        BinaryOperator::GtEq => NodeKind::Gte,
        BinaryOperator::Lt => NodeKind::Lt,
        BinaryOperator::LtEq => NodeKind::Lte,
        BinaryOperator::Plus => NodeKind::Add,
        BinaryOperator::Minus => NodeKind::Sub,
        BinaryOperator::Multiply => NodeKind::Mul,
        BinaryOperator::Divide => NodeKind::Div,
        BinaryOperator::Modulo => NodeKind::Mod,
        BinaryOperator::StringConcat => NodeKind::Concat,
        _ => NodeKind::Operator,
    }
}
