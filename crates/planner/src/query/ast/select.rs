//! Statement tree for the one statement shape the compiler emits: a
//! projection over a base relation, its joins, an optional filter, an
//! ordering and a window.

use crate::query::ast::{
    common::{JoinKind, OrderDir, TableRef},
    expr::Expr,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Select {
    pub distinct: bool,
    pub columns: Vec<Expr>,
    pub from: Option<FromClause>,
    /// Rendered in declaration order.
    pub joins: Vec<JoinClause>,
    pub where_clause: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    /// Window bounds; `None` on count statements and unpaged fetches.
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub source: TableSource,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    Table(TableRef),
    /// The filtered statement a count is taken over.
    Subquery(Box<Select>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: TableRef,
    pub alias: Option<String>,
    pub on: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: Option<OrderDir>,
}
