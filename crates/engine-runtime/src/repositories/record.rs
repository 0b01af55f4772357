//! Typed records decoded from [`RowData`].

use crate::error::RepositoryError;
use chrono::{DateTime, Utc};
use model::{core::value::Value, records::row::RowData};
use uuid::Uuid;

pub trait Record: Sized {
    const ENTITY: &'static str;

    fn from_row(row: &RowData) -> Result<Self, RepositoryError>;
}

/// Typed access to the fields of one row.
pub(crate) struct Fields<'a> {
    row: &'a RowData,
    entity: &'static str,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(row: &'a RowData, entity: &'static str) -> Self {
        Fields { row, entity }
    }

    fn error(&self, name: &str, expected: &str, found: &Value) -> RepositoryError {
        RepositoryError::Decode {
            entity: self.entity,
            reason: format!("field '{name}' should be {expected}, found {found}"),
        }
    }

    fn optional<T>(
        &self,
        name: &str,
        expected: &str,
        convert: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<Option<T>, RepositoryError> {
        match self.row.get_value(name) {
            Value::Null => Ok(None),
            value => convert(&value)
                .map(Some)
                .ok_or_else(|| self.error(name, expected, &value)),
        }
    }

    fn required<T>(
        &self,
        name: &str,
        expected: &str,
        convert: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<T, RepositoryError> {
        self.optional(name, expected, convert)?
            .ok_or_else(|| self.error(name, expected, &Value::Null))
    }

    pub(crate) fn uuid(&self, name: &str) -> Result<Uuid, RepositoryError> {
        self.required(name, "a uuid", Value::as_uuid)
    }

    pub(crate) fn opt_uuid(&self, name: &str) -> Result<Option<Uuid>, RepositoryError> {
        self.optional(name, "a uuid", Value::as_uuid)
    }

    pub(crate) fn string(&self, name: &str) -> Result<String, RepositoryError> {
        self.required(name, "a string", |v| v.as_str().map(String::from))
    }

    pub(crate) fn opt_string(&self, name: &str) -> Result<Option<String>, RepositoryError> {
        self.optional(name, "a string", |v| v.as_str().map(String::from))
    }

    pub(crate) fn bool(&self, name: &str) -> Result<bool, RepositoryError> {
        self.required(name, "a boolean", Value::as_bool)
    }

    pub(crate) fn timestamp(&self, name: &str) -> Result<DateTime<Utc>, RepositoryError> {
        self.required(name, "a timestamp", |v| match v {
            Value::Timestamp(ts) => Some(*ts),
            Value::Date(d) => d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{core::data_type::DataType, records::row::FieldValue};

    fn row() -> RowData {
        RowData::new(
            "release",
            vec![
                FieldValue::new("id", Some(Value::from("not-a-uuid")), DataType::String),
                FieldValue::new("name", Some(Value::from("a1")), DataType::String),
                FieldValue::new("created_by", None, DataType::Uuid),
            ],
        )
    }

    #[test]
    fn test_typed_access() {
        let row = row();
        let fields = Fields::new(&row, "Release");
        assert_eq!(fields.string("name").unwrap(), "a1");
        assert_eq!(fields.opt_uuid("created_by").unwrap(), None);
        assert_eq!(fields.opt_string("missing").unwrap(), None);
    }

    #[test]
    fn test_decode_errors_name_the_field() {
        let row = row();
        let fields = Fields::new(&row, "Release");

        let err = fields.uuid("id").unwrap_err();
        assert!(err.to_string().contains("field 'id' should be a uuid"));

        let err = fields.bool("is_snapshot").unwrap_err();
        assert!(matches!(err, RepositoryError::Decode { entity: "Release", .. }));
    }
}
