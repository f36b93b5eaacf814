//! Typed nullable scan destinations for result columns.

use crate::backend::Backend;
use crate::error::BackendError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};

/// Scan destination for one result cell, created fresh per column per row.
/// The variant fixes which wire types the cell may decode as; the cell is
/// marshaled to JSON and the container discarded.
#[derive(Clone, Debug, PartialEq)]
pub enum NullableValue {
    Text(Option<String>),
    Int(Option<i64>),
    Float(Option<f64>),
    Bool(Option<bool>),
    Timestamp(Option<DateTime<Utc>>),
}

impl NullableValue {
    /// Scan the cell at `index` into this container. A value the container
    /// cannot hold is an execution failure, propagated to the caller.
    pub fn scan(&mut self, row: &PgRow, index: usize) -> Result<(), sqlx::Error> {
        match self {
            NullableValue::Text(slot) => *slot = scan_text(row, index)?,
            NullableValue::Int(slot) => *slot = scan_int(row, index)?,
            NullableValue::Float(slot) => *slot = scan_float(row, index)?,
            NullableValue::Bool(slot) => *slot = row.try_get::<Option<bool>, _>(index)?,
            NullableValue::Timestamp(slot) => *slot = scan_temporal(row, index)?,
        }
        Ok(())
    }

    /// JSON representation for response marshaling. NULL cells become JSON
    /// null regardless of variant.
    pub fn into_json(self) -> Value {
        match self {
            NullableValue::Text(v) => v.map(Value::String).unwrap_or(Value::Null),
            NullableValue::Int(v) => v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null),
            NullableValue::Float(v) => v
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            NullableValue::Bool(v) => v.map(Value::Bool).unwrap_or(Value::Null),
            NullableValue::Timestamp(v) => v.map(|d| Value::String(d.to_rfc3339())).unwrap_or(Value::Null),
        }
    }
}

fn scan_text(row: &PgRow, index: usize) -> Result<Option<String>, sqlx::Error> {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v);
    }
    // BYTEA and unrecognized types arrive as raw bytes
    let v = row.try_get::<Option<Vec<u8>>, _>(index)?;
    Ok(v.map(|b| String::from_utf8_lossy(&b).into_owned()))
}

fn scan_int(row: &PgRow, index: usize) -> Result<Option<i64>, sqlx::Error> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v);
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return Ok(v.map(i64::from));
    }
    let v = row.try_get::<Option<i16>, _>(index)?;
    Ok(v.map(i64::from))
}

fn scan_float(row: &PgRow, index: usize) -> Result<Option<f64>, sqlx::Error> {
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v);
    }
    let v = row.try_get::<Option<f32>, _>(index)?;
    Ok(v.map(f64::from))
}

fn scan_temporal(row: &PgRow, index: usize) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
    if let Ok(v) = row.try_get::<Option<DateTime<Utc>>, _>(index) {
        return Ok(v);
    }
    if let Ok(v) = row.try_get::<Option<NaiveDateTime>, _>(index) {
        return Ok(v.map(|d| d.and_utc()));
    }
    if let Ok(v) = row.try_get::<Option<NaiveDate>, _>(index) {
        return Ok(v.map(|d| d.and_time(NaiveTime::MIN).and_utc()));
    }
    // TIME/TIMETZ: time-of-day values anchor to the epoch date
    let v = row.try_get::<Option<NaiveTime>, _>(index)?;
    Ok(v.and_then(|t| NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(t).and_utc())))
}

/// Decode a full row into a JSON object, picking each cell's scan target from
/// the backend's type mapping.
pub fn row_to_json(backend: &dyn Backend, row: &PgRow) -> Result<Value, BackendError> {
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let mut target = backend.scan_target(col.type_info().name());
        target.scan(row, col.ordinal())?;
        map.insert(col.name().to_string(), target.into_json());
    }
    Ok(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn null_cells_marshal_to_json_null() {
        assert_eq!(NullableValue::Text(None).into_json(), Value::Null);
        assert_eq!(NullableValue::Int(None).into_json(), Value::Null);
        assert_eq!(NullableValue::Float(None).into_json(), Value::Null);
        assert_eq!(NullableValue::Bool(None).into_json(), Value::Null);
        assert_eq!(NullableValue::Timestamp(None).into_json(), Value::Null);
    }

    #[test]
    fn populated_cells_marshal_to_matching_json() {
        assert_eq!(
            NullableValue::Text(Some("ok".into())).into_json(),
            Value::String("ok".into())
        );
        assert_eq!(NullableValue::Int(Some(42)).into_json(), Value::Number(42.into()));
        assert_eq!(NullableValue::Bool(Some(true)).into_json(), Value::Bool(true));
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(
            NullableValue::Timestamp(Some(ts)).into_json(),
            Value::String(ts.to_rfc3339())
        );
    }

    #[test]
    fn non_finite_floats_marshal_to_null() {
        assert_eq!(NullableValue::Float(Some(f64::NAN)).into_json(), Value::Null);
        assert_eq!(NullableValue::Float(Some(1.5)).into_json(), serde_json::json!(1.5));
    }
}
