//! In-process evaluation of lowered expressions over rows.
//!
//! Follows SQL three-valued logic: comparisons involving `NULL` are unknown
//! (`Value::Null`), and only a definite `true` selects a row.

use crate::query::ast::expr::{BinaryOperator, Expr, Ident};
use model::{core::value::Value, records::row::RowData};
use regex::Regex;
use std::{cmp::Ordering, collections::HashMap};

/// Resolves identifiers to values.
pub trait Scope {
    fn lookup(&self, ident: &Ident) -> Value;
}

/// A single row answers every identifier by column name.
impl Scope for RowData {
    fn lookup(&self, ident: &Ident) -> Value {
        self.get_value(&ident.name)
    }
}

/// A joined row: one optional source row per alias, in declaration order.
///
/// An unbound alias (the null side of a `LEFT JOIN`) reads as `NULL`.
/// Unqualified identifiers resolve against the first binding.
#[derive(Debug, Default)]
pub struct AliasedRow<'a> {
    bindings: Vec<(&'a str, Option<&'a RowData>)>,
}

impl<'a> AliasedRow<'a> {
    pub fn new() -> Self {
        AliasedRow {
            bindings: Vec::new(),
        }
    }

    pub fn bind(mut self, alias: &'a str, row: Option<&'a RowData>) -> Self {
        self.bindings.push((alias, row));
        self
    }

    pub fn row(&self, alias: &str) -> Option<&'a RowData> {
        self.bindings
            .iter()
            .find(|(a, _)| *a == alias)
            .and_then(|(_, row)| *row)
    }
}

impl Scope for AliasedRow<'_> {
    fn lookup(&self, ident: &Ident) -> Value {
        let row = match &ident.qualifier {
            Some(q) => self.row(q),
            None => self.bindings.first().and_then(|(_, row)| *row),
        };
        row.map_or(Value::Null, |r| r.get_value(&ident.name))
    }
}

#[derive(Debug, Default)]
pub struct Evaluator {
    patterns: HashMap<String, Option<Regex>>,
}

impl Evaluator {
    /// Whether `expr` evaluates to a definite `true`.
    pub fn is_true(&mut self, expr: &Expr, scope: &dyn Scope) -> bool {
        matches!(self.eval(expr, scope), Value::Boolean(true))
    }

    pub fn eval(&mut self, expr: &Expr, scope: &dyn Scope) -> Value {
        match expr {
            Expr::Identifier(ident) => scope.lookup(ident),
            Expr::Value(v) => v.clone(),
            Expr::IsNull { expr, negated } => {
                Value::Boolean(self.eval(expr, scope).is_null() != *negated)
            }
            Expr::Alias { expr, .. } => self.eval(expr, scope),
            Expr::BinaryOp(op) => {
                let left = self.eval(&op.left, scope);
                let right = self.eval(&op.right, scope);
                self.apply(op.op, &left, &right)
            }
            // Projections only; never part of a filter.
            Expr::Wildcard { .. } | Expr::FunctionCall(_) => Value::Null,
        }
    }

    fn apply(&mut self, op: BinaryOperator, left: &Value, right: &Value) -> Value {
        match op {
            BinaryOperator::And => logic(truth(left), truth(right), false),
            BinaryOperator::Or => logic(truth(left), truth(right), true),
            BinaryOperator::RegexMatch => match (left.as_str(), right.as_str()) {
                (Some(text), Some(pattern)) => match self.regex(pattern) {
                    Some(re) => Value::Boolean(re.is_match(text)),
                    None => Value::Null,
                },
                _ => Value::Null,
            },
            cmp => match left.compare(right) {
                None => Value::Null,
                Some(ord) => Value::Boolean(match cmp {
                    BinaryOperator::Eq => ord == Ordering::Equal,
                    BinaryOperator::NotEq => ord != Ordering::Equal,
                    BinaryOperator::Lt => ord == Ordering::Less,
                    BinaryOperator::LtEq => ord != Ordering::Greater,
                    BinaryOperator::Gt => ord == Ordering::Greater,
                    _ => ord != Ordering::Less,
                }),
            },
        }
    }

    fn regex(&mut self, pattern: &str) -> Option<&Regex> {
        self.patterns
            .entry(pattern.to_string())
            .or_insert_with(|| Regex::new(pattern).ok())
            .as_ref()
    }
}

fn truth(v: &Value) -> Option<bool> {
    match v {
        Value::Boolean(b) => Some(*b),
        _ => None,
    }
}

/// Kleene logic; `dominant` is the value that decides the result on its own
/// (`false` for AND, `true` for OR).
fn logic(left: Option<bool>, right: Option<bool>, dominant: bool) -> Value {
    match (left, right) {
        (Some(l), _) if l == dominant => Value::Boolean(dominant),
        (_, Some(r)) if r == dominant => Value::Boolean(dominant),
        (Some(_), Some(_)) => Value::Boolean(!dominant),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ident, value};
    use model::{core::data_type::DataType, records::row::FieldValue};

    fn row(entity: &str, fields: Vec<(&str, Option<Value>)>) -> RowData {
        RowData::new(
            entity,
            fields
                .into_iter()
                .map(|(n, v)| FieldValue::new(n, v, DataType::String))
                .collect(),
        )
    }

    #[test]
    fn test_three_valued_logic() {
        let scope = row("t", vec![("a", None)]);
        let mut ev = Evaluator::default();
        let unknown = Expr::binary(ident!("a"), BinaryOperator::Eq, value!(Value::from("x")));

        assert_eq!(ev.eval(&unknown, &scope), Value::Null);
        let or_true = Expr::or(unknown.clone(), value!(Value::Boolean(true)));
        assert!(ev.is_true(&or_true, &scope));
        let and_false = Expr::and(unknown.clone(), value!(Value::Boolean(false)));
        assert_eq!(ev.eval(&and_false, &scope), Value::Boolean(false));
        let and_true = Expr::and(unknown, value!(Value::Boolean(true)));
        assert!(!ev.is_true(&and_true, &scope));
    }

    #[test]
    fn test_invalid_regex_is_unknown_not_a_panic() {
        let scope = row("t", vec![("a", Some(Value::from("abc")))]);
        let mut ev = Evaluator::default();
        let bad = Expr::binary(ident!("a"), BinaryOperator::RegexMatch, value!(Value::from("(")));
        assert_eq!(ev.eval(&bad, &scope), Value::Null);
    }

    #[test]
    fn test_aliased_lookup_and_unbound_side() {
        let release = row("release", vec![("id", Some(Value::from("r1")))]);
        let scope = AliasedRow::new().bind("r", Some(&release)).bind("rc", None);
        let mut ev = Evaluator::default();

        assert_eq!(scope.lookup(&Ident { qualifier: None, name: "id".into() }), Value::from("r1"));
        let is_null = Expr::IsNull {
            expr: Box::new(ident!("rc", "release_id")),
            negated: false,
        };
        assert!(ev.is_true(&is_null, &scope));
        let join_on = Expr::binary(ident!("r", "id"), BinaryOperator::Eq, ident!("rc", "release_id"));
        assert!(!ev.is_true(&join_on, &scope));
    }
}
