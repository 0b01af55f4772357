use chrono::{Datelike, NaiveDateTime, Timelike};
use model::core::value::Value;
use mysql_async::Value as MyValue;
use mysql_common::params::Params;

/// Positional parameters for a `?`-placeholder statement.
pub fn positional(values: &[Value]) -> Params {
    if values.is_empty() {
        Params::Empty
    } else {
        Params::Positional(values.iter().map(to_mysql).collect())
    }
}

fn to_mysql(value: &Value) -> MyValue {
    match value {
        Value::Null => MyValue::NULL,
        Value::Int(n) => MyValue::Int(*n),
        Value::Float(f) => MyValue::Double(*f),
        Value::Boolean(b) => MyValue::Int(i64::from(*b)),
        Value::String(s) => MyValue::Bytes(s.as_bytes().to_vec()),
        Value::Bytes(b) => MyValue::Bytes(b.clone()),
        // UUIDs live in CHAR(36) columns.
        Value::Uuid(u) => MyValue::Bytes(u.hyphenated().to_string().into_bytes()),
        Value::Json(j) => MyValue::Bytes(j.to_string().into_bytes()),
        Value::Date(d) => datetime(d.and_hms_opt(0, 0, 0).unwrap_or_default(), 0),
        Value::Timestamp(ts) => datetime(ts.naive_utc(), ts.timestamp_subsec_micros()),
    }
}

fn datetime(at: NaiveDateTime, micros: u32) -> MyValue {
    MyValue::Date(
        at.year() as u16,
        at.month() as u8,
        at.day() as u8,
        at.hour() as u8,
        at.minute() as u8,
        at.second() as u8,
        micros,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn test_booleans_and_uuids_bind_as_mysql_stores_them() {
        let id = Uuid::nil();
        match positional(&[Value::Boolean(true), Value::Uuid(id), Value::Null]) {
            Params::Positional(values) => assert_eq!(
                values,
                vec![
                    MyValue::Int(1),
                    MyValue::Bytes(b"00000000-0000-0000-0000-000000000000".to_vec()),
                    MyValue::NULL,
                ]
            ),
            other => panic!("expected positional params, got {other:?}"),
        }
    }

    #[test]
    fn test_dates_and_timestamps() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 5).unwrap();
        match positional(&[Value::Date(day), Value::Timestamp(ts)]) {
            Params::Positional(values) => {
                assert_eq!(values[0], MyValue::Date(2024, 3, 9, 0, 0, 0, 0));
                assert_eq!(values[1], MyValue::Date(2024, 3, 9, 12, 30, 5, 0));
            }
            other => panic!("expected positional params, got {other:?}"),
        }
    }

    #[test]
    fn test_no_values_means_no_params() {
        assert_eq!(positional(&[]), Params::Empty);
    }
}
