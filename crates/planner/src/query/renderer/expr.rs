use crate::query::{
    ast::expr::{BinaryOp, BinaryOperator, Expr, FunctionCall, Ident},
    renderer::{Render, Renderer},
};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Identifier(ident) => ident.render(r),
            Expr::Wildcard { qualifier } => {
                r.push_qualifier(qualifier.as_deref());
                r.sql.push('*');
            }
            Expr::Value(val) => r.add_param(val.clone()),
            Expr::BinaryOp(op) => op.render(r),
            Expr::IsNull { expr, negated } => r.parenthesized(|r| {
                expr.render(r);
                r.sql.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }),
            Expr::FunctionCall(func) => func.render(r),
            Expr::Alias { expr, alias } => {
                expr.render(r);
                r.push_alias(alias);
            }
        }
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        r.push_qualifier(self.qualifier.as_deref());
        r.push_identifier(&self.name);
    }
}

fn operator_text(op: &BinaryOperator, r: &Renderer) -> &'static str {
    match op {
        BinaryOperator::Eq => "=",
        BinaryOperator::NotEq => "<>",
        BinaryOperator::Lt => "<",
        BinaryOperator::LtEq => "<=",
        BinaryOperator::Gt => ">",
        BinaryOperator::GtEq => ">=",
        // The compiler refuses regex matches for dialects without an operator.
        BinaryOperator::RegexMatch => r.dialect.regex_operator().unwrap_or("REGEXP"),
        BinaryOperator::And => "AND",
        BinaryOperator::Or => "OR",
    }
}

impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        let op = operator_text(&self.op, r);
        r.parenthesized(|r| {
            self.left.render(r);
            r.sql.push(' ');
            r.sql.push_str(op);
            r.sql.push(' ');
            self.right.render(r);
        });
    }
}

impl Render for FunctionCall {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(&self.name);
        r.parenthesized(|r| {
            if self.wildcard {
                r.sql.push('*');
            } else {
                r.push_list(&self.args);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use model::core::value::Value;

    use crate::{
        ident,
        query::{
            ast::expr::{BinaryOperator, Expr},
            dialect::{MySql, Postgres},
            renderer::{Render, Renderer},
        },
        value,
    };

    fn render_pg(expr: &Expr) -> (String, Vec<Value>) {
        let dialect = Postgres;
        let mut renderer = Renderer::new(&dialect);
        expr.render(&mut renderer);
        renderer.finish()
    }

    #[test]
    fn test_regex_operator_follows_dialect() {
        let expr = Expr::binary(
            ident!("r", "name"),
            BinaryOperator::RegexMatch,
            value!(Value::from("^a")),
        );
        let (sql, params) = render_pg(&expr);
        assert_eq!(sql, r#"("r"."name" ~ $1)"#);
        assert_eq!(params, vec![Value::from("^a")]);

        let dialect = MySql;
        let mut renderer = Renderer::new(&dialect);
        expr.render(&mut renderer);
        assert_eq!(renderer.finish().0, "(`r`.`name` REGEXP ?)");
    }

    #[test]
    fn test_is_null_and_logical_nesting() {
        let expr = Expr::or(
            Expr::IsNull {
                expr: Box::new(ident!("r", "created_by")),
                negated: false,
            },
            Expr::binary(ident!("r", "created_by"), BinaryOperator::NotEq, value!(Value::Int(7))),
        );
        let (sql, params) = render_pg(&expr);
        assert_eq!(
            sql,
            r#"(("r"."created_by" IS NULL) OR ("r"."created_by" <> $1))"#
        );
        assert_eq!(params, vec![Value::Int(7)]);
    }

    #[test]
    fn test_values_never_reach_sql_text() {
        let hostile = "x'); DROP TABLE release; --";
        let expr = Expr::binary(ident!("name"), BinaryOperator::Eq, value!(Value::from(hostile)));
        let (sql, params) = render_pg(&expr);
        assert!(!sql.contains("DROP"));
        assert_eq!(params, vec![Value::from(hostile)]);
    }

    #[test]
    fn test_count_star_alias() {
        let (sql, params) = render_pg(&Expr::count_star().alias("total"));
        assert_eq!(sql, r#"COUNT(*) AS "total""#);
        assert!(params.is_empty());
    }
}
