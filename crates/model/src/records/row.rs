use crate::core::{data_type::DataType, value::Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldValue {
    pub name: String,
    pub value: Option<Value>,
    pub data_type: DataType,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: Option<Value>, data_type: DataType) -> Self {
        FieldValue {
            name: name.into(),
            value,
            data_type,
        }
    }
}

/// A single row returned by a relational executor.
///
/// `entity` names the relation the row was projected from; field names are
/// unqualified column names of that relation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowData {
    pub entity: String,
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(entity: &str, field_values: Vec<FieldValue>) -> Self {
        RowData {
            entity: entity.to_string(),
            field_values,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .and_then(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    /// Row equality over values only; used for `DISTINCT` semantics.
    pub fn same_values(&self, other: &RowData) -> bool {
        self.field_values.len() == other.field_values.len()
            && self
                .field_values
                .iter()
                .zip(&other.field_values)
                .all(|(a, b)| a.name == b.name && a.value == b.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> RowData {
        RowData::new(
            "release",
            vec![
                FieldValue::new("name", Some(Value::from(name)), DataType::String),
                FieldValue::new("is_snapshot", None, DataType::Boolean),
            ],
        )
    }

    #[test]
    fn test_get_value_is_case_insensitive() {
        let row = row("a1");
        assert_eq!(row.get_value("NAME"), Value::from("a1"));
    }

    #[test]
    fn test_missing_and_null_fields_read_as_null() {
        let row = row("a1");
        assert_eq!(row.get_value("is_snapshot"), Value::Null);
        assert_eq!(row.get_value("unknown"), Value::Null);
    }

    #[test]
    fn test_same_values() {
        assert!(row("a1").same_values(&row("a1")));
        assert!(!row("a1").same_values(&row("a2")));
    }
}
