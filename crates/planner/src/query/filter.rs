//! Imperative surface over [`QuerySpecBuilder`]: callers register narrowing
//! callbacks, often conditionally, and fold them into one specification.
//!
//! The builder is single-use. [`FilterBuilder::build`] consumes it, so a
//! built specification can never be extended and a new accumulation always
//! starts from a fresh builder.

use crate::{
    error::ValidationError,
    query::specification::{QuerySpec, QuerySpecBuilder},
};

type Callback = Box<dyn FnOnce(QuerySpecBuilder) -> QuerySpecBuilder + Send>;

pub struct FilterBuilder {
    source: QuerySpecBuilder,
    callbacks: Vec<Callback>,
}

impl FilterBuilder {
    pub fn new(source: QuerySpecBuilder) -> Self {
        FilterBuilder {
            source,
            callbacks: Vec::new(),
        }
    }

    pub fn add_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(QuerySpecBuilder) -> QuerySpecBuilder + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Registers `callback` only when `value` is present; an absent value
    /// leaves the query untouched.
    pub fn add_callback_when<T, F>(self, value: Option<T>, callback: F) -> Self
    where
        T: Send + 'static,
        F: FnOnce(QuerySpecBuilder, T) -> QuerySpecBuilder + Send + 'static,
    {
        match value {
            Some(v) => self.add_callback(move |query| callback(query, v)),
            None => self,
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Applies the callbacks in registration order and validates the result.
    pub fn build(self) -> Result<QuerySpec, ValidationError> {
        self.callbacks
            .into_iter()
            .fold(self.source, |query, callback| callback(query))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{
        predicate::Predicate,
        schema::{ColumnDef, Relation},
    };
    use model::{core::data_type::DataType, pagination::request::SortDirection};

    fn mapping_type() -> Relation {
        Relation::new(
            "mapping_type",
            vec![
                ColumnDef::new("id", DataType::Uuid),
                ColumnDef::new("name", DataType::String),
                ColumnDef::new("editable", DataType::Boolean),
                ColumnDef::new("visible", DataType::Boolean),
            ],
        )
    }

    #[test]
    fn test_absent_values_register_nothing() {
        let builder = FilterBuilder::new(QuerySpecBuilder::new(mapping_type(), "mt"))
            .add_callback_when(None::<String>, |q, regex| {
                q.filter(Predicate::matches_pattern("name", regex))
            })
            .add_callback_when(None::<bool>, |q, editable| {
                q.filter(Predicate::equals("editable", editable))
            });
        assert!(builder.is_empty());
        assert_eq!(builder.build().unwrap().predicate(), &Predicate::Always);
    }

    #[test]
    fn test_callbacks_apply_in_order_and_match_declarative_tree() {
        let spec = FilterBuilder::new(QuerySpecBuilder::new(mapping_type(), "mt"))
            .add_callback_when(Some("^y".to_string()), |q, regex| {
                q.filter(Predicate::matches_pattern("name", regex))
            })
            .add_callback_when(Some(true), |q, editable| {
                q.filter(Predicate::equals("editable", editable))
            })
            .add_callback(|q| q.order_by("name", SortDirection::Desc))
            .build()
            .unwrap();

        let declarative = QuerySpecBuilder::new(mapping_type(), "mt")
            .filter(
                Predicate::matches_pattern("name", "^y").and(Predicate::equals("editable", true)),
            )
            .order_by("name", SortDirection::Desc)
            .build()
            .unwrap();
        assert_eq!(spec, declarative);
    }

    #[test]
    fn test_validation_runs_on_build() {
        let err = FilterBuilder::new(QuerySpecBuilder::new(mapping_type(), "mt"))
            .add_callback(|q| q.filter(Predicate::equals("missing", 1)))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownColumn { .. }));
    }
}
