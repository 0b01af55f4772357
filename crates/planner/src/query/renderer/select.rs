use crate::query::{
    ast::{
        common::{JoinKind, OrderDir},
        select::{FromClause, JoinClause, OrderByExpr, Select, TableSource},
    },
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        r.push_keyword("SELECT");
        if self.distinct {
            r.push_keyword("DISTINCT");
        }
        r.push_list(&self.columns);

        if let Some(from) = &self.from {
            from.render(r);
        }
        for join in &self.joins {
            join.render(r);
        }
        if let Some(condition) = &self.where_clause {
            r.push_keyword("WHERE");
            condition.render(r);
        }
        if !self.order_by.is_empty() {
            r.push_keyword("ORDER BY");
            r.push_list(&self.order_by);
        }
        // Window bounds are bound parameters like any other value.
        if let Some(limit) = &self.limit {
            r.push_keyword("LIMIT");
            limit.render(r);
        }
        if let Some(offset) = &self.offset {
            r.push_keyword("OFFSET");
            offset.render(r);
        }
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.push_keyword("FROM");
        match &self.source {
            TableSource::Table(table) => r.render_table_ref(table),
            TableSource::Subquery(inner) => r.parenthesized(|r| inner.render(r)),
        }
        if let Some(alias) = &self.alias {
            r.push_alias(alias);
        }
    }
}

impl Render for JoinClause {
    fn render(&self, r: &mut Renderer) {
        r.push_keyword(match self.kind {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        });
        r.render_table_ref(&self.table);
        if let Some(alias) = &self.alias {
            r.push_alias(alias);
        }
        r.push_keyword("ON");
        self.on.render(r);
    }
}

impl Render for OrderByExpr {
    fn render(&self, r: &mut Renderer) {
        self.expr.render(r);
        match self.direction {
            Some(OrderDir::Asc) => r.sql.push_str(" ASC"),
            Some(OrderDir::Desc) => r.sql.push_str(" DESC"),
            None => {}
        }
    }
}
