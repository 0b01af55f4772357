use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a relation column.
///
/// The query engine uses it to reject comparisons whose bound value cannot
/// be compared with the column, and the executors use it to decode rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DataType {
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    VarChar,
    Char,
    String,
    Uuid,
    Date,
    Timestamp,
    Json,
    Bytea,
    Null,
}

impl DataType {
    pub fn is_textual(&self) -> bool {
        matches!(self, DataType::VarChar | DataType::Char | DataType::String)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Short | DataType::Int | DataType::Long | DataType::Float | DataType::Double
        )
    }

    /// Whether `<`, `<=`, `>` and `>=` have a meaning for this type.
    pub fn is_ordered(&self) -> bool {
        self.is_numeric()
            || self.is_textual()
            || matches!(self, DataType::Date | DataType::Timestamp)
    }

    pub fn is_compatible(&self, other: &DataType) -> bool {
        match (self, other) {
            (a, b) if a.is_numeric() && b.is_numeric() => true,
            (a, b) if a.is_textual() && b.is_textual() => true,
            (DataType::Date, DataType::Timestamp) | (DataType::Timestamp, DataType::Date) => true,
            _ => self == other,
        }
    }

    /// Returns `true` when `value` may be bound against a column of this type.
    ///
    /// `NULL` is never accepted: comparing with `NULL` is unknown in SQL, so
    /// callers must express it with an `IS NULL` check instead.
    pub fn accepts(&self, value: &Value) -> bool {
        match value {
            Value::Null => false,
            other => self.is_compatible(&other.data_type()),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Short => "SMALLINT",
            DataType::Int => "INTEGER",
            DataType::Long => "BIGINT",
            DataType::Float => "REAL",
            DataType::Double => "DOUBLE PRECISION",
            DataType::Boolean => "BOOLEAN",
            DataType::VarChar => "VARCHAR",
            DataType::Char => "CHAR",
            DataType::String => "TEXT",
            DataType::Uuid => "UUID",
            DataType::Date => "DATE",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Json => "JSON",
            DataType::Bytea => "BYTEA",
            DataType::Null => "NULL",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_numeric_types_are_mutually_compatible() {
        assert!(DataType::Int.is_compatible(&DataType::Long));
        assert!(DataType::Double.is_compatible(&DataType::Short));
        assert!(!DataType::Int.is_compatible(&DataType::String));
    }

    #[test]
    fn test_accepts_rejects_null_and_foreign_types() {
        assert!(DataType::Uuid.accepts(&Value::Uuid(Uuid::nil())));
        assert!(!DataType::Uuid.accepts(&Value::String("x".into())));
        assert!(!DataType::String.accepts(&Value::Null));
        assert!(DataType::VarChar.accepts(&Value::String("x".into())));
    }

    #[test]
    fn test_ordering_support() {
        assert!(DataType::Timestamp.is_ordered());
        assert!(!DataType::Boolean.is_ordered());
        assert!(!DataType::Uuid.is_ordered());
        assert!(!DataType::Json.is_ordered());
    }
}
