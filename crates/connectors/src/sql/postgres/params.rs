use model::core::value::Value;
use tokio_postgres::types::{Json, ToSql, Type};

type Boxed = Box<dyn ToSql + Sync + Send>;

/// Statement parameters converted for the placeholder types reported by
/// `prepare`. `tokio-postgres` checks Rust types strictly, so an `i64`
/// bound to an `int4` placeholder would be rejected.
pub struct PgBindings(Vec<Boxed>);

impl PgBindings {
    pub fn new(values: &[Value], types: &[Type]) -> Self {
        let bound = values
            .iter()
            .enumerate()
            .map(|(position, value)| bind(value, types.get(position)))
            .collect();
        PgBindings(bound)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.0.iter().map(|b| &**b as &(dyn ToSql + Sync)).collect()
    }
}

fn bind(value: &Value, target: Option<&Type>) -> Boxed {
    let target = target.cloned().unwrap_or(Type::UNKNOWN);
    match value {
        // Out-of-range integers stay `i64` so the server reports the mismatch.
        Value::Int(n) if target == Type::INT2 => match i16::try_from(*n) {
            Ok(narrow) => Box::new(narrow),
            Err(_) => Box::new(*n),
        },
        Value::Int(n) if target == Type::INT4 => match i32::try_from(*n) {
            Ok(narrow) => Box::new(narrow),
            Err(_) => Box::new(*n),
        },
        Value::Int(n) if target == Type::FLOAT4 => Box::new(*n as f32),
        Value::Int(n) if target == Type::FLOAT8 => Box::new(*n as f64),
        Value::Int(n) => Box::new(*n),
        Value::Float(f) if target == Type::FLOAT4 => Box::new(*f as f32),
        Value::Float(f) => Box::new(*f),
        Value::String(s) => Box::new(s.clone()),
        Value::Boolean(b) => Box::new(*b),
        Value::Json(j) => Box::new(Json(j.clone())),
        Value::Uuid(u) => Box::new(*u),
        Value::Bytes(b) => Box::new(b.clone()),
        Value::Date(d) => Box::new(*d),
        // `timestamp` (without time zone) columns such as `created_on`.
        Value::Timestamp(ts) if target == Type::TIMESTAMP => Box::new(ts.naive_utc()),
        Value::Timestamp(ts) => Box::new(*ts),
        Value::Null => Box::new(None::<String>),
    }
}
