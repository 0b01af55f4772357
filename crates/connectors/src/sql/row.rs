use crate::error::DbError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use core::fmt;
use model::{
    core::{data_type::DataType, value::Value},
    records::row::{FieldValue, RowData},
};
use mysql_async::{FromValueError, Row as MySqlRow, prelude::FromValue};
use planner::query::schema::ColumnDef;
use std::fmt::Formatter;
use tokio_postgres::{Row as PgRow, types::FromSqlOwned, types::Json as PgJson};
use uuid::Uuid;

/// A driver row decoded against the columns a statement declared.
pub enum DbRow<'a> {
    MySqlRow(&'a MySqlRow),
    PostgresRow(&'a PgRow),
}

impl DbRow<'_> {
    pub fn to_row_data(&self, entity: &str, columns: &[ColumnDef]) -> Result<RowData, DbError> {
        let fields = columns
            .iter()
            .map(|column| {
                let value = self.get_value(&column.data_type, &column.name)?;
                Ok(FieldValue::new(&column.name, value, column.data_type))
            })
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(RowData::new(entity, fields))
    }

    pub fn get_value(&self, data_type: &DataType, name: &str) -> Result<Option<Value>, DbError> {
        let value = match data_type {
            DataType::Short => self.try_get::<i16>(name)?.map(Value::from),
            DataType::Int => self.try_get::<i32>(name)?.map(Value::from),
            DataType::Long => self.try_get::<i64>(name)?.map(Value::Int),
            DataType::Float => self.try_get::<f32>(name)?.map(|v| Value::Float(v as f64)),
            DataType::Double => self.try_get::<f64>(name)?.map(Value::Float),
            DataType::Boolean => self.try_get::<bool>(name)?.map(Value::Boolean),
            DataType::VarChar | DataType::Char | DataType::String => {
                self.try_get::<String>(name)?.map(Value::String)
            }
            DataType::Uuid => self.try_get_uuid(name)?.map(Value::Uuid),
            DataType::Date => self.try_get::<NaiveDate>(name)?.map(Value::Date),
            DataType::Timestamp => self.try_get_timestamp(name)?.map(Value::Timestamp),
            DataType::Json => self.try_get_json(name)?.map(Value::Json),
            DataType::Bytea => self.try_get::<Vec<u8>>(name)?.map(Value::Bytes),
            DataType::Null => None,
        };
        Ok(value)
    }

    /// Reads the single integer of a count statement.
    pub fn try_get_count(&self, name: &str) -> Result<u64, DbError> {
        let count = self.try_get::<i64>(name)?.unwrap_or_default();
        u64::try_from(count).map_err(|e| decode_error(name, e))
    }

    fn try_get<T>(&self, name: &str) -> Result<Option<T>, DbError>
    where
        T: FromSqlOwned + FromValue,
    {
        match self {
            DbRow::PostgresRow(row) => row
                .try_get::<_, Option<T>>(name)
                .map_err(|e| decode_error(name, e)),
            DbRow::MySqlRow(row) => mysql_get::<Option<T>>(row, name),
        }
    }

    fn try_get_uuid(&self, name: &str) -> Result<Option<Uuid>, DbError> {
        match self {
            DbRow::PostgresRow(row) => row
                .try_get::<_, Option<Uuid>>(name)
                .map_err(|e| decode_error(name, e)),
            // CHAR(36) text or BINARY(16)
            DbRow::MySqlRow(row) => match mysql_get::<Option<Vec<u8>>>(row, name)? {
                None => Ok(None),
                Some(raw) if raw.len() == 16 => {
                    Uuid::from_slice(&raw).map(Some).map_err(|e| decode_error(name, e))
                }
                Some(raw) => {
                    let text = String::from_utf8(raw).map_err(|e| decode_error(name, e))?;
                    Uuid::parse_str(&text).map(Some).map_err(|e| decode_error(name, e))
                }
            },
        }
    }

    fn try_get_timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>, DbError> {
        match self {
            DbRow::PostgresRow(row) => match row.try_get::<_, Option<DateTime<Utc>>>(name) {
                Ok(v) => Ok(v),
                // `timestamp without time zone` columns are read as UTC.
                Err(_) => row
                    .try_get::<_, Option<NaiveDateTime>>(name)
                    .map(|v| v.map(|naive| naive.and_utc()))
                    .map_err(|e| decode_error(name, e)),
            },
            DbRow::MySqlRow(row) => {
                mysql_get::<Option<NaiveDateTime>>(row, name).map(|v| v.map(|n| n.and_utc()))
            }
        }
    }

    fn try_get_json(&self, name: &str) -> Result<Option<serde_json::Value>, DbError> {
        match self {
            DbRow::PostgresRow(row) => row
                .try_get::<_, Option<PgJson<serde_json::Value>>>(name)
                .map(|v| v.map(|json| json.0))
                .map_err(|e| decode_error(name, e)),
            DbRow::MySqlRow(row) => match mysql_get::<Option<String>>(row, name)? {
                None => Ok(None),
                Some(text) => serde_json::from_str(&text)
                    .map(Some)
                    .map_err(|e| decode_error(name, e)),
            },
        }
    }
}

fn mysql_get<T: FromValue>(row: &MySqlRow, name: &str) -> Result<T, DbError> {
    match row.get_opt::<T, _>(name) {
        Some(Ok(v)) => Ok(v),
        Some(Err(FromValueError(raw))) => Err(DbError::Decode {
            column: name.to_string(),
            reason: format!("unexpected value {raw:?}"),
        }),
        None => Err(DbError::Decode {
            column: name.to_string(),
            reason: "column missing from result set".to_string(),
        }),
    }
}

fn decode_error(column: &str, err: impl fmt::Display) -> DbError {
    DbError::Decode {
        column: column.to_string(),
        reason: err.to_string(),
    }
}

impl fmt::Debug for DbRow<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DbRow::MySqlRow(row) => write!(f, "{row:?}"),
            DbRow::PostgresRow(row) => write!(f, "{row:?}"),
        }
    }
}
