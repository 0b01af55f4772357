//! Test and builder shorthands for AST nodes.

/// A bound literal: `value!(Value::Int(1))`.
#[macro_export]
macro_rules! value {
    ($val:expr) => {
        $crate::query::ast::expr::Expr::Value($val)
    };
}

/// `table_ref!("release")` or `table_ref!("public", "release")`.
#[macro_export]
macro_rules! table_ref {
    ($name:expr) => {
        $crate::query::ast::common::TableRef::new(None, &$name)
    };
    ($schema:expr, $name:expr) => {
        $crate::query::ast::common::TableRef::new(Some(&*$schema), &$name)
    };
}

/// A column expression, optionally qualified by a relation alias:
/// `ident!("name")`, `ident!("rc", "mapping_id")`.
#[macro_export]
macro_rules! ident {
    ($name:expr) => {
        $crate::query::ast::expr::Expr::Identifier($crate::query::ast::expr::Ident::new(
            None, &$name,
        ))
    };
    ($qualifier:expr, $name:expr) => {
        $crate::query::ast::expr::Expr::Identifier($crate::query::ast::expr::Ident::new(
            Some(&*$qualifier),
            &$name,
        ))
    };
}
