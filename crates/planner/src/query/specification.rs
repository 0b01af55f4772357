//! The validated description of a single page request.

use crate::{
    error::ValidationError,
    query::{
        join::JoinSpec,
        predicate::{ColumnRef, Operand, Predicate},
        schema::{ColumnDef, Relation},
    },
};
use model::pagination::request::{PageRequest, SortDirection, SortOrder};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub index: u64,
    pub size: u64,
}

impl PageWindow {
    /// Rows skipped before this page. Bounded by validation.
    pub fn offset(&self) -> u64 {
        self.index * self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    Paged(PageWindow),
    Unpaged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: ColumnRef,
    pub direction: SortDirection,
}

/// Allow-list mapping request-level sort properties to columns.
#[derive(Debug, Clone, Default)]
pub struct SortFields {
    fields: Vec<(String, ColumnRef)>,
}

impl SortFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, property: &str, column: impl Into<ColumnRef>) -> Self {
        self.fields.push((property.to_string(), column.into()));
        self
    }

    pub fn resolve(&self, order: &SortOrder) -> Result<OrderTerm, ValidationError> {
        self.fields
            .iter()
            .find(|(property, _)| property == &order.property)
            .map(|(_, column)| OrderTerm {
                column: column.clone(),
                direction: order.direction,
            })
            .ok_or_else(|| ValidationError::UnknownSortProperty(order.property.clone()))
    }
}

/// A query over one base relation, its joins, a filter, an ordering and a
/// pagination window.
///
/// Only obtainable through [`QuerySpecBuilder::build`], so every value of
/// this type has passed validation. Rows are returned in `ordering`; with
/// no ordering the row order is whatever storage yields, and repeated calls
/// are only stable if storage guarantees it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub(crate) base: Relation,
    pub(crate) base_alias: String,
    pub(crate) joins: Vec<JoinSpec>,
    pub(crate) predicate: Predicate,
    pub(crate) ordering: Vec<OrderTerm>,
    pub(crate) pagination: Pagination,
    pub(crate) distinct: bool,
}

impl QuerySpec {
    pub fn base(&self) -> &Relation {
        &self.base
    }

    pub fn base_alias(&self) -> &str {
        &self.base_alias
    }

    pub fn joins(&self) -> &[JoinSpec] {
        &self.joins
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn ordering(&self) -> &[OrderTerm] {
        &self.ordering
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn window(&self) -> Option<PageWindow> {
        match self.pagination {
            Pagination::Paged(window) => Some(window),
            Pagination::Unpaged => None,
        }
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// The same query over the whole filtered row set.
    pub fn without_pagination(mut self) -> Self {
        self.pagination = Pagination::Unpaged;
        self
    }
}

pub struct QuerySpecBuilder {
    base: Relation,
    base_alias: String,
    joins: Vec<JoinSpec>,
    predicate: Predicate,
    ordering: Vec<OrderTerm>,
    pagination: Pagination,
    distinct: bool,
    deferred: Option<ValidationError>,
}

impl QuerySpecBuilder {
    pub fn new(base: Relation, alias: &str) -> Self {
        QuerySpecBuilder {
            base,
            base_alias: alias.to_string(),
            joins: Vec::new(),
            predicate: Predicate::Always,
            ordering: Vec::new(),
            pagination: Pagination::Unpaged,
            distinct: false,
            deferred: None,
        }
    }

    pub fn base_alias(&self) -> &str {
        &self.base_alias
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    /// Narrows the query; successive filters are AND-combined. Disabled
    /// nodes are kept until `build` so their columns are still checked.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = match std::mem::take(&mut self.predicate) {
            Predicate::Always => predicate,
            existing => existing.and(predicate),
        };
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn order_by(mut self, column: impl Into<ColumnRef>, direction: SortDirection) -> Self {
        self.ordering.push(OrderTerm {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn page(mut self, index: u64, size: u64) -> Self {
        self.pagination = Pagination::Paged(PageWindow { index, size });
        self
    }

    pub fn unpaged(mut self) -> Self {
        self.pagination = Pagination::Unpaged;
        self
    }

    /// Applies a request's window and its sort orders, resolved through
    /// `sort_fields`. An unknown sort property fails the final `build`.
    pub fn pageable(mut self, request: &PageRequest, sort_fields: &SortFields) -> Self {
        for order in &request.sort {
            match sort_fields.resolve(order) {
                Ok(term) => self.ordering.push(term),
                Err(e) => {
                    self.deferred.get_or_insert(e);
                }
            }
        }
        self.page(request.index, request.size)
    }

    /// Adds `column ASC` unless the ordering already mentions it, so that
    /// pages stay disjoint when the requested sort has ties.
    pub fn tie_breaker(mut self, column: impl Into<ColumnRef>) -> Self {
        let column = column.into();
        if !self.ordering.iter().any(|t| t.column == column) {
            self.ordering.push(OrderTerm {
                column,
                direction: SortDirection::Asc,
            });
        }
        self
    }

    pub fn build(self) -> Result<QuerySpec, ValidationError> {
        if let Some(e) = self.deferred {
            return Err(e);
        }

        let mut scope: Vec<(&str, &Relation)> = vec![(self.base_alias.as_str(), &self.base)];
        for join in &self.joins {
            if scope.iter().any(|(alias, _)| *alias == join.alias) {
                return Err(ValidationError::DuplicateAlias(join.alias.clone()));
            }
            let on = join
                .on
                .as_ref()
                .ok_or_else(|| ValidationError::MissingJoinCondition(join.alias.clone()))?;
            // An ON condition sees the base relation and the joined one only.
            let on_scope = [
                (self.base_alias.as_str(), &self.base),
                (join.alias.as_str(), &join.relation),
            ];
            check_predicate(on, &Resolver::new(&on_scope, &self.base_alias))?;
            scope.push((join.alias.as_str(), &join.relation));
        }

        let resolver = Resolver::new(&scope, &self.base_alias);
        check_predicate(&self.predicate, &resolver)?;

        for term in &self.ordering {
            resolver.resolve(&term.column)?;
            if self.distinct && term.column.qualifier_or(&self.base_alias) != self.base_alias {
                return Err(ValidationError::OrderingOutsideProjection(
                    term.column.to_string(),
                ));
            }
        }

        if let Pagination::Paged(PageWindow { index, size }) = self.pagination {
            if size == 0 {
                return Err(ValidationError::InvalidPageSize);
            }
            let fits = i64::try_from(size).is_ok()
                && index
                    .checked_mul(size)
                    .is_some_and(|offset| i64::try_from(offset).is_ok());
            if !fits {
                return Err(ValidationError::PageOutOfRange { index, size });
            }
        }

        Ok(QuerySpec {
            base: self.base,
            base_alias: self.base_alias,
            joins: self.joins,
            predicate: self.predicate.simplify(),
            ordering: self.ordering,
            pagination: self.pagination,
            distinct: self.distinct,
        })
    }
}

/// Aliases visible at one point of the specification.
struct Resolver<'a> {
    scope: &'a [(&'a str, &'a Relation)],
    default_alias: &'a str,
}

impl<'a> Resolver<'a> {
    fn new(scope: &'a [(&'a str, &'a Relation)], default_alias: &'a str) -> Self {
        Resolver {
            scope,
            default_alias,
        }
    }

    fn resolve(&self, column: &ColumnRef) -> Result<&'a ColumnDef, ValidationError> {
        let alias = column.qualifier_or(self.default_alias);
        let relation = self
            .scope
            .iter()
            .find(|(a, _)| *a == alias)
            .map(|(_, r)| *r)
            .ok_or_else(|| ValidationError::DanglingAlias {
                alias: alias.to_string(),
                column: column.to_string(),
            })?;
        relation
            .column(&column.name)
            .ok_or_else(|| ValidationError::UnknownColumn {
                relation: relation.name.clone(),
                column: column.to_string(),
            })
    }
}

/// Resolves every column, then checks operators and operands of enabled nodes.
fn check_predicate(predicate: &Predicate, resolver: &Resolver) -> Result<(), ValidationError> {
    for column in predicate.columns() {
        resolver.resolve(column)?;
    }
    check_types(predicate, resolver)
}

fn check_types(predicate: &Predicate, resolver: &Resolver) -> Result<(), ValidationError> {
    match predicate {
        Predicate::Always | Predicate::IsNull { .. } => Ok(()),
        Predicate::Comparison { operand: None, .. } | Predicate::PatternMatch { pattern: None, .. } => {
            Ok(())
        }
        Predicate::Comparison {
            column,
            op,
            operand: Some(operand),
        } => {
            let def = resolver.resolve(column)?;
            if op.is_ordering() && !def.data_type.is_ordered() {
                return Err(ValidationError::UnsupportedOperator {
                    column: column.to_string(),
                    op: op.symbol().to_string(),
                    data_type: def.data_type,
                });
            }
            let found = match operand {
                Operand::Value(v) => v.data_type(),
                Operand::Column(other) => resolver.resolve(other)?.data_type,
            };
            if !def.data_type.is_compatible(&found) {
                return Err(ValidationError::TypeMismatch {
                    column: column.to_string(),
                    expected: def.data_type,
                    found,
                });
            }
            Ok(())
        }
        Predicate::PatternMatch {
            column,
            pattern: Some(pattern),
        } => {
            let def = resolver.resolve(column)?;
            if !def.data_type.is_textual() {
                return Err(ValidationError::UnsupportedOperator {
                    column: column.to_string(),
                    op: "regex".to_string(),
                    data_type: def.data_type,
                });
            }
            Regex::new(pattern).map_err(|e| ValidationError::InvalidPattern {
                column: column.to_string(),
                reason: e.to_string(),
            })?;
            Ok(())
        }
        Predicate::And(l, r) | Predicate::Or(l, r) => {
            check_types(l, resolver)?;
            check_types(r, resolver)
        }
    }
}
