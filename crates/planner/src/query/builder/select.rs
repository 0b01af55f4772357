//! Typestate builder for [`Select`]: the projection comes first, then the
//! source, and only then the optional clauses.

use crate::query::ast::{
    common::{JoinKind, OrderDir, TableRef},
    expr::Expr,
    select::{FromClause, JoinClause, OrderByExpr, Select, TableSource},
};

#[derive(Debug, Default, Clone)]
pub struct InitialState;

#[derive(Debug, Default, Clone)]
pub struct SelectState;

#[derive(Debug, Default, Clone)]
pub struct FromState;

#[derive(Debug, Clone)]
pub struct SelectBuilder<State> {
    ast: Select,
    _state: State,
}

impl<S> SelectBuilder<S> {
    fn advance<N>(self, next: N) -> SelectBuilder<N> {
        SelectBuilder {
            ast: self.ast,
            _state: next,
        }
    }

    fn with_source(mut self, source: TableSource, alias: Option<String>) -> SelectBuilder<FromState> {
        self.ast.from = Some(FromClause { source, alias });
        self.advance(FromState)
    }
}

impl Default for SelectBuilder<InitialState> {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectBuilder<InitialState> {
    pub fn new() -> Self {
        Self {
            ast: Select::default(),
            _state: InitialState,
        }
    }

    pub fn select(mut self, columns: Vec<Expr>) -> SelectBuilder<SelectState> {
        self.ast.columns = columns;
        self.advance(SelectState)
    }
}

impl SelectBuilder<SelectState> {
    pub fn from(self, table: TableRef, alias: Option<&str>) -> SelectBuilder<FromState> {
        self.with_source(TableSource::Table(table), alias.map(String::from))
    }

    /// `FROM (<inner>) AS alias`; the alias is mandatory for derived tables.
    pub fn from_subquery(self, inner: Select, alias: &str) -> SelectBuilder<FromState> {
        self.with_source(TableSource::Subquery(Box::new(inner)), Some(alias.to_string()))
    }
}

impl SelectBuilder<FromState> {
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.ast.distinct = distinct;
        self
    }

    pub fn join(mut self, kind: JoinKind, table: TableRef, alias: Option<&str>, on: Expr) -> Self {
        self.ast.joins.push(JoinClause {
            kind,
            table,
            alias: alias.map(String::from),
            on,
        });
        self
    }

    /// Repeated calls are `AND`-ed onto the existing condition.
    pub fn where_clause(mut self, condition: Expr) -> Self {
        let combined = match self.ast.where_clause.take() {
            Some(existing) => Expr::and(existing, condition),
            None => condition,
        };
        self.ast.where_clause = Some(combined);
        self
    }

    pub fn order_by(mut self, expr: Expr, direction: Option<OrderDir>) -> Self {
        self.ast.order_by.push(OrderByExpr { expr, direction });
        self
    }

    pub fn limit(mut self, limit: Expr) -> Self {
        self.ast.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: Expr) -> Self {
        self.ast.offset = Some(offset);
        self
    }

    pub fn build(self) -> Select {
        self.ast
    }
}
