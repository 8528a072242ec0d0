//! Row-to-value conversion helpers.
//!
//! Typed repos read through these instead of `row.get::<T>()` for numeric
//! columns: the browse, restore, and console paths can leave values of any
//! storage class in any column, and a mismatch must surface as an error
//! rather than a driver panic.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDate, Utc};
use libsql::Value;
use serde_json::Number;

use dl_core::responses::ResultSet;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::InvalidState(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a calendar date. A datetime string is truncated to its date part.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return Some(date);
    }
    parse_datetime(s).ok().map(|dt| dt.date_naive())
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    Ok(match row.get_value(idx)? {
        Value::Null => None,
        Value::Text(s) if s.is_empty() => None,
        Value::Text(s) => Some(s),
        Value::Integer(n) => Some(n.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Blob(b) => Some(STANDARD.encode(b)),
    })
}

/// Read a required TEXT column.
///
/// # Errors
///
/// `InvalidState` when the column is NULL or empty.
pub fn get_string(row: &libsql::Row, idx: i32) -> Result<String, DatabaseError> {
    get_opt_string(row, idx)?
        .ok_or_else(|| DatabaseError::InvalidState(format!("column {idx} is NULL")))
}

/// # Errors
///
/// `InvalidState` when the value is not numeric.
pub fn get_opt_f64(row: &libsql::Row, idx: i32) -> Result<Option<f64>, DatabaseError> {
    let value = row.get_value(idx)?;
    if matches!(value, Value::Null) {
        return Ok(None);
    }
    value_as_f64(&value)
        .map(Some)
        .ok_or_else(|| DatabaseError::InvalidState(format!("column {idx} is not numeric")))
}

/// Numeric column, NULL read as 0.
///
/// # Errors
///
/// `InvalidState` when the value is not numeric.
pub fn get_f64(row: &libsql::Row, idx: i32) -> Result<f64, DatabaseError> {
    Ok(get_opt_f64(row, idx)?.unwrap_or(0.0))
}

/// # Errors
///
/// `InvalidState` when the value is not an integer.
pub fn get_opt_i64(row: &libsql::Row, idx: i32) -> Result<Option<i64>, DatabaseError> {
    let value = row.get_value(idx)?;
    if matches!(value, Value::Null) {
        return Ok(None);
    }
    value_as_i64(&value)
        .map(Some)
        .ok_or_else(|| DatabaseError::InvalidState(format!("column {idx} is not an integer")))
}

/// Integer column, NULL read as 0.
///
/// # Errors
///
/// `InvalidState` when the value is not an integer.
pub fn get_i64(row: &libsql::Row, idx: i32) -> Result<i64, DatabaseError> {
    Ok(get_opt_i64(row, idx)?.unwrap_or(0))
}

/// # Errors
///
/// `InvalidState` when a non-empty value is not a date.
pub fn get_opt_date(row: &libsql::Row, idx: i32) -> Result<Option<NaiveDate>, DatabaseError> {
    match get_opt_string(row, idx)? {
        Some(s) => parse_date(&s)
            .map(Some)
            .ok_or_else(|| DatabaseError::InvalidState(format!("Failed to parse date '{s}'"))),
        None => Ok(None),
    }
}

/// # Errors
///
/// `InvalidState` when the value is NULL or not a date.
pub fn get_date(row: &libsql::Row, idx: i32) -> Result<NaiveDate, DatabaseError> {
    get_opt_date(row, idx)?
        .ok_or_else(|| DatabaseError::InvalidState(format!("column {idx} is NULL")))
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::InvalidState(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Numeric view of a stored value. Text is parsed; NULL and blobs are `None`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(n) => Some(*n as f64),
        Value::Real(f) => Some(*f),
        Value::Text(s) => s.trim().parse().ok(),
        Value::Null | Value::Blob(_) => None,
    }
}

/// Integer view of a stored value. Whole reals and numeric text convert.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(n) => Some(*n),
        Value::Real(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Convert a stored value to JSON.
///
/// Blobs become base64 strings and non-finite reals their text form, so any
/// row can be written to a backup document.
#[must_use]
pub fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(n) => serde_json::Value::Number(n.into()),
        Value::Real(f) => Number::from_f64(f)
            .map_or_else(|| serde_json::Value::String(f.to_string()), serde_json::Value::Number),
        Value::Text(s) => serde_json::Value::String(s),
        Value::Blob(b) => serde_json::Value::String(STANDARD.encode(b)),
    }
}

/// Convert a JSON value to a bind parameter.
///
/// Booleans bind as 0/1; arrays and objects bind as their JSON text.
#[must_use]
pub fn json_to_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Integer(i64::from(*b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .or_else(|| n.as_f64().map(Value::Real))
            .unwrap_or(Value::Null),
        serde_json::Value::String(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

/// Quote an identifier for interpolation into SQL.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Drain a row stream into a `ResultSet`, keeping column order.
///
/// # Errors
///
/// Returns `DatabaseError` if reading a row fails.
pub async fn collect_result_set(mut rows: libsql::Rows) -> Result<ResultSet, DatabaseError> {
    let count = rows.column_count();
    let columns = (0..count)
        .map(|i| rows.column_name(i).unwrap_or_default().to_string())
        .collect::<Vec<_>>();

    let mut result = ResultSet {
        columns,
        rows: Vec::new(),
    };
    while let Some(row) = rows.next().await? {
        let mut values = Vec::with_capacity(result.columns.len());
        for i in 0..count {
            values.push(value_to_json(row.get_value(i)?));
        }
        result.rows.push(values);
    }
    Ok(result)
}
