//! Executes a `Select` AST over in-memory tables.

use crate::error::DbError;
use model::{
    core::value::Value,
    records::row::{FieldValue, RowData},
};
use planner::query::{
    ast::{
        common::{JoinKind, OrderDir},
        expr::Expr,
        select::{OrderByExpr, Select, TableSource},
    },
    eval::{AliasedRow, Evaluator},
    schema::ColumnDef,
};
use std::{cmp::Ordering, collections::HashMap};

pub(crate) type Tables = HashMap<String, Vec<RowData>>;

/// One candidate result: a source row per alias, `None` on the null side
/// of a left join.
type Combo<'t> = Vec<(&'t str, Option<&'t RowData>)>;

pub(crate) fn run_select(
    tables: &Tables,
    select: &Select,
    entity: &str,
    columns: &[ColumnDef],
) -> Result<Vec<RowData>, DbError> {
    let mut evaluator = Evaluator::default();
    let mut combos = filtered_combos(tables, select, &mut evaluator)?;

    if !select.order_by.is_empty() {
        combos.sort_by(|a, b| compare_combos(&select.order_by, a, b));
    }

    let mut rows: Vec<RowData> = combos
        .iter()
        .map(|combo| project(&select.columns, combo, entity, columns, &mut evaluator))
        .collect();

    if select.distinct {
        let mut unique: Vec<RowData> = Vec::with_capacity(rows.len());
        for row in rows {
            if !unique.iter().any(|seen| seen.same_values(&row)) {
                unique.push(row);
            }
        }
        rows = unique;
    }

    let offset = window_bound(select.offset.as_ref(), &mut evaluator)?.unwrap_or(0);
    let limit = window_bound(select.limit.as_ref(), &mut evaluator)?;
    Ok(rows
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect())
}

/// `SELECT COUNT(*) FROM (<inner>) AS alias`.
pub(crate) fn run_count(tables: &Tables, select: &Select, entity: &str) -> Result<u64, DbError> {
    match select.from.as_ref().map(|f| &f.source) {
        Some(TableSource::Subquery(inner)) => {
            let rows = run_select(tables, inner, entity, &[])?;
            Ok(rows.len() as u64)
        }
        _ => Err(DbError::UnsupportedStatement(
            "count statements must select from a derived table".to_string(),
        )),
    }
}

fn filtered_combos<'t>(
    tables: &'t Tables,
    select: &'t Select,
    evaluator: &mut Evaluator,
) -> Result<Vec<Combo<'t>>, DbError> {
    let from = select
        .from
        .as_ref()
        .ok_or_else(|| DbError::UnsupportedStatement("statement has no FROM clause".into()))?;
    let base = match &from.source {
        TableSource::Table(table) => table,
        TableSource::Subquery(_) => {
            return Err(DbError::UnsupportedStatement(
                "derived tables are only supported in count statements".into(),
            ));
        }
    };
    let base_alias = from.alias.as_deref().unwrap_or(&base.name);
    let base_rows = lookup(tables, &base.name)?;

    let mut combos: Vec<Combo> = base_rows.iter().map(|row| vec![(base_alias, Some(row))]).collect();

    for join in &select.joins {
        let alias = join.alias.as_deref().unwrap_or(&join.table.name);
        let candidates = lookup(tables, &join.table.name)?;
        let mut joined = Vec::new();
        for combo in combos {
            let mut matched = false;
            for candidate in candidates {
                let scope = bind(&combo).bind(alias, Some(candidate));
                if evaluator.is_true(&join.on, &scope) {
                    matched = true;
                    let mut next = combo.clone();
                    next.push((alias, Some(candidate)));
                    joined.push(next);
                }
            }
            if !matched && join.kind == JoinKind::Left {
                let mut next = combo;
                next.push((alias, None));
                joined.push(next);
            }
        }
        combos = joined;
    }

    if let Some(condition) = &select.where_clause {
        combos.retain(|combo| evaluator.is_true(condition, &bind(combo)));
    }
    Ok(combos)
}

fn lookup<'t>(tables: &'t Tables, name: &str) -> Result<&'t Vec<RowData>, DbError> {
    tables
        .get(name)
        .ok_or_else(|| DbError::UnknownRelation(name.to_string()))
}

fn bind<'a>(combo: &[(&'a str, Option<&'a RowData>)]) -> AliasedRow<'a> {
    combo
        .iter()
        .fold(AliasedRow::new(), |scope, (alias, row)| scope.bind(alias, *row))
}

/// `NULL` sorts after every value ascending and first descending.
fn compare_combos(order_by: &[OrderByExpr], a: &Combo, b: &Combo) -> Ordering {
    let mut evaluator = Evaluator::default();
    let (scope_a, scope_b) = (bind(a), bind(b));
    for term in order_by {
        let left = evaluator.eval(&term.expr, &scope_a);
        let right = evaluator.eval(&term.expr, &scope_b);
        let ord = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => left.compare(&right).unwrap_or(Ordering::Equal),
        };
        let ord = match term.direction {
            Some(OrderDir::Desc) => ord.reverse(),
            _ => ord,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn project(
    projection: &[Expr],
    combo: &Combo,
    entity: &str,
    columns: &[ColumnDef],
    evaluator: &mut Evaluator,
) -> RowData {
    let scope = bind(combo);
    let mut fields = Vec::new();
    for expr in projection {
        match expr {
            Expr::Wildcard { qualifier } => {
                let row = match qualifier {
                    Some(q) => scope.row(q),
                    None => combo.first().and_then(|(_, row)| *row),
                };
                if let Some(row) = row {
                    fields.extend(row.field_values.iter().cloned());
                }
            }
            Expr::Identifier(ident) => {
                let value = evaluator.eval(expr, &scope);
                let data_type = columns
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(&ident.name))
                    .map(|c| c.data_type)
                    .unwrap_or_else(|| value.data_type());
                let value = (!value.is_null()).then_some(value);
                fields.push(FieldValue::new(&ident.name, value, data_type));
            }
            other => {
                let value = evaluator.eval(other, &scope);
                let name = match other {
                    Expr::Alias { alias, .. } => alias.clone(),
                    _ => format!("col{}", fields.len()),
                };
                let data_type = value.data_type();
                fields.push(FieldValue::new(name, (!value.is_null()).then_some(value), data_type));
            }
        }
    }
    RowData::new(entity, fields)
}

fn window_bound(expr: Option<&Expr>, evaluator: &mut Evaluator) -> Result<Option<usize>, DbError> {
    let Some(expr) = expr else {
        return Ok(None);
    };
    match evaluator.eval(expr, &AliasedRow::new()) {
        Value::Int(n) if n >= 0 => Ok(Some(usize::try_from(n).unwrap_or(usize::MAX))),
        other => Err(DbError::UnsupportedStatement(format!(
            "LIMIT/OFFSET must be a non-negative integer, got {other}"
        ))),
    }
}
