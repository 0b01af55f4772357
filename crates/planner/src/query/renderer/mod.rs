//! Turns statement ASTs into dialect-specific SQL text plus positional
//! parameters. Values are never inlined; every literal becomes a
//! placeholder.

use model::core::value::Value;

use crate::query::{ast::common::TableRef, dialect::Dialect};

pub mod expr;
pub mod select;

pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// Output buffer for one statement.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: &'a dyn Dialect,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::with_capacity(128),
            params: Vec::new(),
            dialect,
        }
    }

    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    /// Binds `value` and writes its placeholder (`$n` or `?`).
    pub fn add_param(&mut self, value: Value) {
        let position = self.params.len();
        self.params.push(value);
        let placeholder = self.dialect.get_placeholder(position);
        self.sql.push_str(&placeholder);
    }

    pub fn push_identifier(&mut self, ident: &str) {
        let quoted = self.dialect.quote_identifier(ident);
        self.sql.push_str(&quoted);
    }

    /// `"qualifier".` when a qualifier is present, nothing otherwise.
    pub fn push_qualifier(&mut self, qualifier: Option<&str>) {
        if let Some(qualifier) = qualifier {
            self.push_identifier(qualifier);
            self.sql.push('.');
        }
    }

    /// Writes a clause keyword separated from what precedes it.
    pub fn push_keyword(&mut self, keyword: &str) {
        if !self.sql.is_empty() && !self.sql.ends_with([' ', '(']) {
            self.sql.push(' ');
        }
        self.sql.push_str(keyword);
        self.sql.push(' ');
    }

    /// ` AS "alias"`.
    pub fn push_alias(&mut self, alias: &str) {
        self.sql.push_str(" AS ");
        self.push_identifier(alias);
    }

    pub fn push_list<T: Render>(&mut self, items: &[T]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            item.render(self);
        }
    }

    pub fn parenthesized(&mut self, body: impl FnOnce(&mut Self)) {
        self.sql.push('(');
        body(self);
        self.sql.push(')');
    }

    pub fn render_table_ref(&mut self, table: &TableRef) {
        self.push_qualifier(table.schema.as_deref());
        self.push_identifier(&table.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::dialect::{MySql, Postgres};

    #[test]
    fn test_placeholders_follow_dialect() {
        let mut pg = Renderer::new(&Postgres);
        pg.add_param(Value::Int(1));
        pg.sql.push_str(", ");
        pg.add_param(Value::Int(2));
        assert_eq!(pg.finish(), ("$1, $2".to_string(), vec![Value::Int(1), Value::Int(2)]));

        let mut my = Renderer::new(&MySql);
        my.add_param(Value::Boolean(true));
        assert_eq!(my.finish().0, "?");
    }

    #[test]
    fn test_keywords_are_spaced() {
        let mut r = Renderer::new(&Postgres);
        r.push_keyword("SELECT");
        r.sql.push('*');
        r.push_keyword("FROM");
        r.render_table_ref(&TableRef {
            schema: Some("public".into()),
            name: "release".into(),
        });
        r.push_alias("r");
        assert_eq!(r.finish().0, r#"SELECT * FROM "public"."release" AS "r""#);
    }
}
