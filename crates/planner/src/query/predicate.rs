//! Composable, null-safe filter expressions.
//!
//! A [`Predicate`] is built from optional criteria: a comparison or pattern
//! whose bound value is absent is *disabled* and matches every row, so an
//! unset request parameter never narrows a result set. Trees are plain
//! values; every combinator consumes its inputs and returns a new tree.

use crate::query::{
    ast::expr::{BinaryOperator, Expr, Ident},
    eval::Evaluator,
};
use model::{core::value::Value, records::row::RowData};
use std::{convert::Infallible, fmt, str::FromStr};

/// A column, optionally qualified by a relation alias (`rc.release_id`).
///
/// Unqualified references resolve to the base relation of the query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn new(name: &str) -> Self {
        ColumnRef {
            qualifier: None,
            name: name.to_string(),
        }
    }

    pub fn qualified(qualifier: &str, name: &str) -> Self {
        ColumnRef {
            qualifier: Some(qualifier.to_string()),
            name: name.to_string(),
        }
    }

    pub fn qualifier_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.qualifier.as_deref().unwrap_or(default)
    }

    pub fn to_expr(&self, default_qualifier: Option<&str>) -> Expr {
        Expr::Identifier(Ident::new(
            self.qualifier.as_deref().or(default_qualifier),
            &self.name,
        ))
    }
}

/// Shorthand for `ColumnRef::from("alias.column")`.
pub fn col(reference: &str) -> ColumnRef {
    ColumnRef::from(reference)
}

impl FromStr for ColumnRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ColumnRef::from(s))
    }
}

impl From<&str> for ColumnRef {
    fn from(s: &str) -> Self {
        match s.split_once('.') {
            Some((qualifier, name)) => ColumnRef::qualified(qualifier, name),
            None => ColumnRef::new(s),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    /// Ordering comparisons need a column type with a total order.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            CompareOp::Lt | CompareOp::LtEq | CompareOp::Gt | CompareOp::GtEq
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "<>",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        }
    }
}

impl From<CompareOp> for BinaryOperator {
    fn from(op: CompareOp) -> Self {
        match op {
            CompareOp::Eq => BinaryOperator::Eq,
            CompareOp::NotEq => BinaryOperator::NotEq,
            CompareOp::Lt => BinaryOperator::Lt,
            CompareOp::LtEq => BinaryOperator::LtEq,
            CompareOp::Gt => BinaryOperator::Gt,
            CompareOp::GtEq => BinaryOperator::GtEq,
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Column(ColumnRef),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Predicate {
    /// Matches every row. Compiles to no `WHERE` clause at all.
    #[default]
    Always,

    /// `column <op> operand`; disabled (always true) when `operand` is `None`.
    Comparison {
        column: ColumnRef,
        op: CompareOp,
        operand: Option<Operand>,
    },

    /// Regular expression match; disabled (always true) when `pattern` is `None`.
    PatternMatch {
        column: ColumnRef,
        pattern: Option<String>,
    },

    IsNull {
        column: ColumnRef,
        negated: bool,
    },

    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn always() -> Self {
        Predicate::Always
    }

    /// `column = value`. A `NULL` value (e.g. from `None`) disables the node.
    pub fn equals(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn equals_opt<T: Into<Value>>(column: impl Into<ColumnRef>, value: Option<T>) -> Self {
        Self::compare(column, CompareOp::Eq, Value::from(value))
    }

    /// `column <op> value`. A `NULL` value disables the node.
    pub fn compare(column: impl Into<ColumnRef>, op: CompareOp, value: impl Into<Value>) -> Self {
        let value = value.into();
        Predicate::Comparison {
            column: column.into(),
            op,
            operand: (!value.is_null()).then_some(Operand::Value(value)),
        }
    }

    /// Column-to-column equality, mostly used for join conditions.
    pub fn equals_column(left: impl Into<ColumnRef>, right: impl Into<ColumnRef>) -> Self {
        Predicate::Comparison {
            column: left.into(),
            op: CompareOp::Eq,
            operand: Some(Operand::Column(right.into())),
        }
    }

    pub fn matches_pattern(column: impl Into<ColumnRef>, pattern: impl Into<String>) -> Self {
        Predicate::PatternMatch {
            column: column.into(),
            pattern: Some(pattern.into()),
        }
    }

    pub fn matches_opt<S: Into<String>>(column: impl Into<ColumnRef>, pattern: Option<S>) -> Self {
        Predicate::PatternMatch {
            column: column.into(),
            pattern: pattern.map(Into::into),
        }
    }

    pub fn is_null(column: impl Into<ColumnRef>) -> Self {
        Predicate::IsNull {
            column: column.into(),
            negated: false,
        }
    }

    pub fn is_not_null(column: impl Into<ColumnRef>) -> Self {
        Predicate::IsNull {
            column: column.into(),
            negated: true,
        }
    }

    /// `build(value)` when `value` is present, [`Predicate::Always`] otherwise.
    pub fn when_present<T>(value: Option<T>, build: impl FnOnce(T) -> Predicate) -> Self {
        value.map_or(Predicate::Always, build)
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// Conjunction of every predicate; empty input yields `Always`.
    ///
    /// The tree is left unsimplified so disabled members keep their columns.
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        predicates
            .into_iter()
            .reduce(Predicate::and)
            .unwrap_or(Predicate::Always)
    }

    /// Whether the node is a disabled comparison or pattern.
    pub fn is_disabled(&self) -> bool {
        matches!(
            self,
            Predicate::Comparison { operand: None, .. } | Predicate::PatternMatch { pattern: None, .. }
        )
    }

    /// Folds disabled nodes into `Always` and drops neutral branches.
    pub fn simplify(self) -> Self {
        match self {
            p if p.is_disabled() => Predicate::Always,
            Predicate::And(l, r) => match (l.simplify(), r.simplify()) {
                (Predicate::Always, other) | (other, Predicate::Always) => other,
                (l, r) => l.and(r),
            },
            Predicate::Or(l, r) => match (l.simplify(), r.simplify()) {
                (Predicate::Always, _) | (_, Predicate::Always) => Predicate::Always,
                (l, r) => l.or(r),
            },
            other => other,
        }
    }

    /// Every column referenced by the tree, disabled nodes included.
    pub fn columns(&self) -> Vec<&ColumnRef> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Predicate::Always => {}
            Predicate::Comparison {
                column, operand, ..
            } => {
                out.push(column);
                if let Some(Operand::Column(other)) = operand {
                    out.push(other);
                }
            }
            Predicate::PatternMatch { column, .. } | Predicate::IsNull { column, .. } => {
                out.push(column)
            }
            Predicate::And(l, r) | Predicate::Or(l, r) => {
                l.collect_columns(out);
                r.collect_columns(out);
            }
        }
    }

    /// Lowers the tree into a SQL expression. `None` means "match all".
    ///
    /// Unqualified columns get `default_qualifier`.
    pub fn lower(&self, default_qualifier: Option<&str>) -> Option<Expr> {
        match self {
            Predicate::Always => None,
            Predicate::Comparison {
                operand: None, ..
            }
            | Predicate::PatternMatch { pattern: None, .. } => None,
            Predicate::Comparison {
                column,
                op,
                operand: Some(operand),
            } => {
                let right = match operand {
                    Operand::Value(v) => Expr::Value(v.clone()),
                    Operand::Column(c) => c.to_expr(default_qualifier),
                };
                Some(Expr::binary(
                    column.to_expr(default_qualifier),
                    (*op).into(),
                    right,
                ))
            }
            Predicate::PatternMatch {
                column,
                pattern: Some(pattern),
            } => Some(Expr::binary(
                column.to_expr(default_qualifier),
                BinaryOperator::RegexMatch,
                Expr::Value(Value::String(pattern.clone())),
            )),
            Predicate::IsNull { column, negated } => Some(Expr::IsNull {
                expr: Box::new(column.to_expr(default_qualifier)),
                negated: *negated,
            }),
            Predicate::And(l, r) => match (l.lower(default_qualifier), r.lower(default_qualifier)) {
                (Some(l), Some(r)) => Some(Expr::and(l, r)),
                (one, None) | (None, one) => one,
            },
            Predicate::Or(l, r) => match (l.lower(default_qualifier), r.lower(default_qualifier)) {
                (Some(l), Some(r)) => Some(Expr::or(l, r)),
                _ => None,
            },
        }
    }

    /// Evaluates the tree against a single row, ignoring qualifiers.
    ///
    /// `NULL` outcomes do not match, as in a SQL `WHERE` clause.
    pub fn matches(&self, row: &RowData) -> bool {
        match self.lower(None) {
            None => true,
            Some(expr) => Evaluator::default().is_true(&expr, row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{core::data_type::DataType, records::row::FieldValue};

    fn release(name: &str, snapshot: Option<bool>) -> RowData {
        RowData::new(
            "release",
            vec![
                FieldValue::new("name", Some(Value::from(name)), DataType::String),
                FieldValue::new("is_snapshot", snapshot.map(Value::from), DataType::Boolean),
            ],
        )
    }

    #[test]
    fn test_column_ref_parsing() {
        assert_eq!(col("rc.release_id"), ColumnRef::qualified("rc", "release_id"));
        assert_eq!("name".parse::<ColumnRef>().unwrap(), ColumnRef::new("name"));
        assert_eq!("rc.release_id".parse::<ColumnRef>().unwrap(), col("rc.release_id"));
        assert_eq!(col("r.name").to_string(), "r.name");
    }

    #[test]
    fn test_absent_values_disable_nodes() {
        let p = Predicate::equals_opt("game_version_id", None::<i64>);
        assert!(p.is_disabled());
        assert!(Predicate::matches_opt("name", None::<String>).is_disabled());
        assert!(Predicate::equals("name", Value::Null).is_disabled());
        assert!(p.matches(&release("a1", Some(true))));
    }

    #[test]
    fn test_when_present() {
        let absent = Predicate::when_present(None::<&str>, |v| Predicate::matches_pattern("name", v));
        assert_eq!(absent, Predicate::Always);

        let present = Predicate::when_present(Some("^a"), |v| Predicate::matches_pattern("name", v));
        assert!(present.matches(&release("a1", None)));
        assert!(!present.matches(&release("b1", None)));
    }

    #[test]
    fn test_simplify_folds_disabled_branches() {
        let p = Predicate::equals_opt("a", None::<i64>)
            .and(Predicate::equals("b", 1))
            .and(Predicate::matches_opt("c", None::<String>));
        assert_eq!(p.simplify(), Predicate::equals("b", 1));

        let q = Predicate::equals("b", 1).or(Predicate::equals_opt("a", None::<i64>));
        assert_eq!(q.simplify(), Predicate::Always);
    }

    #[test]
    fn test_lower_qualifies_and_drops_disabled() {
        let p = Predicate::equals("is_snapshot", false)
            .and(Predicate::equals_opt("name", None::<String>));
        let expr = p.lower(Some("r")).unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                crate::ident!("r", "is_snapshot"),
                BinaryOperator::Eq,
                Expr::Value(Value::Boolean(false)),
            )
        );
        assert!(Predicate::Always.lower(Some("r")).is_none());
    }

    #[test]
    fn test_null_rows_do_not_match_comparisons() {
        let p = Predicate::equals("is_snapshot", true);
        assert!(!p.matches(&release("a1", None)));
        assert!(Predicate::is_null("is_snapshot").matches(&release("a1", None)));
        assert!(Predicate::is_not_null("is_snapshot").matches(&release("a1", Some(false))));
    }

    #[test]
    fn test_columns_include_disabled_nodes() {
        let p = Predicate::equals_opt("r.a", None::<i64>)
            .or(Predicate::equals_column("r.id", "rc.release_id"));
        let cols: Vec<String> = p.columns().iter().map(|c| c.to_string()).collect();
        assert_eq!(cols, vec!["r.a", "r.id", "rc.release_id"]);
    }
}
