//! Compiles a [`QuerySpec`] into a data statement and its count statement.
//!
//! Both statements are rendered from one *filtered* `Select` (projection,
//! joins, `WHERE`): the data statement adds ordering and the page window,
//! while the count statement wraps the filtered select as a derived table.
//! The count therefore covers exactly the rows the data statement pages
//! through.

use crate::{
    error::CompilationError,
    query::{
        ast::{
            common::OrderDir,
            expr::{BinaryOperator, Expr},
            select::{OrderByExpr, Select},
        },
        builder::select::SelectBuilder,
        dialect::Dialect,
        predicate::ColumnRef,
        renderer::{Render, Renderer},
        schema::ColumnDef,
        specification::{PageWindow, QuerySpec},
    },
};
use model::core::value::Value;
use std::fmt;

pub const COUNT_COLUMN: &str = "total";
const COUNT_ALIAS: &str = "filtered";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Data,
    Count,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Data => f.write_str("data"),
            StatementKind::Count => f.write_str("count"),
        }
    }
}

/// A rendered statement with its bound parameters.
///
/// `select` is the AST the text was rendered from; `columns` is the
/// declared shape of every returned row (empty for count statements).
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub sql: String,
    pub params: Vec<Value>,
    pub select: Select,
    pub entity: String,
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub data: Statement,
    pub count: Statement,
    pub window: Option<PageWindow>,
}

pub struct StatementCompiler<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> StatementCompiler<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        StatementCompiler { dialect }
    }

    pub fn compile(&self, spec: QuerySpec) -> Result<CompiledQuery, CompilationError> {
        let aliases: Vec<&str> = std::iter::once(spec.base_alias())
            .chain(spec.joins().iter().map(|j| j.alias.as_str()))
            .collect();

        let alias = spec.base_alias();
        let projection = spec
            .base()
            .columns
            .iter()
            .map(|c| ColumnRef::qualified(alias, &c.name).to_expr(None))
            .collect();

        let mut filtered = SelectBuilder::new()
            .select(projection)
            .from(spec.base().table_ref(), Some(alias))
            .distinct(spec.is_distinct());

        for join in spec.joins() {
            // An `Always` condition pairs every row.
            let on = join
                .on
                .as_ref()
                .and_then(|p| p.lower(Some(alias)))
                .unwrap_or(Expr::Value(Value::Boolean(true)));
            self.check_expr(&on, &aliases)?;
            filtered = filtered.join(join.kind, join.relation.table_ref(), Some(join.alias.as_str()), on);
        }

        if let Some(condition) = spec.predicate().lower(Some(alias)) {
            self.check_expr(&condition, &aliases)?;
            filtered = filtered.where_clause(condition);
        }

        let filtered = filtered.build();

        let count_select = SelectBuilder::new()
            .select(vec![Expr::count_star().alias(COUNT_COLUMN)])
            .from_subquery(filtered.clone(), COUNT_ALIAS)
            .build();

        let mut data_select = filtered;
        for term in spec.ordering() {
            let expr = term.column.to_expr(Some(alias));
            self.check_expr(&expr, &aliases)?;
            data_select.order_by.push(OrderByExpr {
                expr,
                direction: Some(OrderDir::from(term.direction)),
            });
        }
        if let Some(window) = spec.window() {
            data_select.limit = Some(Expr::Value(Value::Int(window.size as i64)));
            data_select.offset = Some(Expr::Value(Value::Int(window.offset() as i64)));
        }

        let entity = spec.base().name.clone();
        Ok(CompiledQuery {
            data: self.render(
                StatementKind::Data,
                data_select,
                &entity,
                spec.base().columns.clone(),
            ),
            count: self.render(StatementKind::Count, count_select, &entity, Vec::new()),
            window: spec.window(),
        })
    }

    fn render(
        &self,
        kind: StatementKind,
        select: Select,
        entity: &str,
        columns: Vec<ColumnDef>,
    ) -> Statement {
        let mut renderer = Renderer::new(self.dialect);
        select.render(&mut renderer);
        let (sql, params) = renderer.finish();
        Statement {
            kind,
            sql,
            params,
            select,
            entity: entity.to_string(),
            columns,
        }
    }

    /// Every qualifier must name a declared alias, and every operator must
    /// have a spelling in the dialect.
    fn check_expr(&self, expr: &Expr, aliases: &[&str]) -> Result<(), CompilationError> {
        match expr {
            Expr::Identifier(ident) => match &ident.qualifier {
                Some(q) if !aliases.contains(&q.as_str()) => {
                    Err(CompilationError::UnresolvedAlias {
                        alias: q.clone(),
                        column: format!("{}.{}", q, ident.name),
                    })
                }
                _ => Ok(()),
            },
            Expr::BinaryOp(op) => {
                if op.op == BinaryOperator::RegexMatch && self.dialect.regex_operator().is_none() {
                    let column = match &op.left {
                        Expr::Identifier(ident) => match &ident.qualifier {
                            Some(q) => format!("{}.{}", q, ident.name),
                            None => ident.name.clone(),
                        },
                        _ => String::from("<expression>"),
                    };
                    return Err(CompilationError::UnsupportedOperator {
                        dialect: self.dialect.name().to_string(),
                        op: "regex".to_string(),
                        column,
                    });
                }
                self.check_expr(&op.left, aliases)?;
                self.check_expr(&op.right, aliases)
            }
            Expr::IsNull { expr, .. } | Expr::Alias { expr, .. } => self.check_expr(expr, aliases),
            Expr::FunctionCall(call) => call
                .args
                .iter()
                .try_for_each(|arg| self.check_expr(arg, aliases)),
            Expr::Value(_) | Expr::Wildcard { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{
        dialect::{MySql, Postgres, Sqlite},
        join::JoinSpec,
        predicate::Predicate,
        schema::Relation,
        specification::{Pagination, QuerySpecBuilder},
    };
    use model::{core::data_type::DataType, pagination::request::SortDirection};

    fn release() -> Relation {
        Relation::new(
            "release",
            vec![
                ColumnDef::new("id", DataType::Uuid),
                ColumnDef::new("name", DataType::String),
                ColumnDef::new("is_snapshot", DataType::Boolean),
            ],
        )
    }

    fn release_component() -> Relation {
        Relation::new(
            "release_component",
            vec![
                ColumnDef::new("release_id", DataType::Uuid),
                ColumnDef::new("mapping_id", DataType::Uuid),
            ],
        )
    }

    #[test]
    fn test_empty_predicate_has_no_where_clause() {
        let spec = QuerySpecBuilder::new(release(), "r")
            .filter(Predicate::matches_opt("name", None::<String>))
            .page(0, 10)
            .build()
            .unwrap();
        let compiled = StatementCompiler::new(&Postgres).compile(spec).unwrap();

        assert_eq!(
            compiled.data.sql,
            r#"SELECT "r"."id", "r"."name", "r"."is_snapshot" FROM "release" AS "r" LIMIT $1 OFFSET $2"#
        );
        assert_eq!(compiled.data.params, vec![Value::Int(10), Value::Int(0)]);
        assert!(!compiled.count.sql.contains("WHERE"));
        assert!(compiled.count.params.is_empty());
    }

    #[test]
    fn test_count_wraps_filtered_select() {
        let spec = QuerySpecBuilder::new(release(), "r")
            .distinct(true)
            .join(
                JoinSpec::inner(release_component(), "rc")
                    .on(Predicate::equals_column("r.id", "rc.release_id")),
            )
            .filter(Predicate::matches_pattern("name", "^a"))
            .order_by("name", SortDirection::Asc)
            .page(2, 5)
            .build()
            .unwrap();
        let compiled = StatementCompiler::new(&Postgres).compile(spec).unwrap();

        let filtered = r#"SELECT DISTINCT "r"."id", "r"."name", "r"."is_snapshot" FROM "release" AS "r" INNER JOIN "release_component" AS "rc" ON ("r"."id" = "rc"."release_id") WHERE ("r"."name" ~ $1)"#;
        assert_eq!(
            compiled.data.sql,
            format!(r#"{filtered} ORDER BY "r"."name" ASC LIMIT $2 OFFSET $3"#)
        );
        assert_eq!(
            compiled.count.sql,
            format!(r#"SELECT COUNT(*) AS "total" FROM ({filtered}) AS "filtered""#)
        );
        assert_eq!(
            compiled.data.params,
            vec![Value::from("^a"), Value::Int(5), Value::Int(10)]
        );
        assert_eq!(compiled.count.params, vec![Value::from("^a")]);
        assert_eq!(compiled.count.kind, StatementKind::Count);
    }

    #[test]
    fn test_mysql_placeholders_and_regexp() {
        let spec = QuerySpecBuilder::new(release(), "r")
            .filter(Predicate::matches_pattern("name", "^a"))
            .filter(Predicate::equals("is_snapshot", false))
            .build()
            .unwrap();
        let compiled = StatementCompiler::new(&MySql).compile(spec).unwrap();
        assert!(compiled.data.sql.ends_with(
            "WHERE ((`r`.`name` REGEXP ?) AND (`r`.`is_snapshot` = ?))"
        ));
        assert_eq!(compiled.window, None);
    }

    #[test]
    fn test_regex_unsupported_on_sqlite() {
        let spec = QuerySpecBuilder::new(release(), "r")
            .filter(Predicate::matches_pattern("name", "^a"))
            .build()
            .unwrap();
        let err = StatementCompiler::new(&Sqlite).compile(spec).unwrap_err();
        assert_eq!(
            err,
            CompilationError::UnsupportedOperator {
                dialect: "SQLite".into(),
                op: "regex".into(),
                column: "r.name".into(),
            }
        );
    }

    #[test]
    fn test_unresolved_alias_is_reported() {
        // Bypasses the builder to hand the compiler an unvalidated spec.
        let spec = QuerySpec {
            base: release(),
            base_alias: "r".into(),
            joins: Vec::new(),
            predicate: Predicate::equals("x.name", "a"),
            ordering: Vec::new(),
            pagination: Pagination::Unpaged,
            distinct: false,
        };
        let err = StatementCompiler::new(&Postgres).compile(spec).unwrap_err();
        assert_eq!(
            err,
            CompilationError::UnresolvedAlias {
                alias: "x".into(),
                column: "x.name".into()
            }
        );
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let build = || {
            QuerySpecBuilder::new(release(), "r")
                .filter(Predicate::equals("is_snapshot", true))
                .page(1, 3)
                .build()
                .unwrap()
        };
        let compiler = StatementCompiler::new(&Postgres);
        assert_eq!(compiler.compile(build()).unwrap(), compiler.compile(build()).unwrap());
    }
}
