//! Conversion of driver rows into JSON row mappings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};

use crate::error::GatewayError;

/// A single result row: column name to value, in column order.
pub type RowMap = serde_json::Map<String, Value>;

/// Converts a driver row into a [`RowMap`].
///
/// `NULL` becomes JSON `null`. Dates render as `YYYY-MM-DD`, timestamps
/// as RFC 3339.
///
/// # Errors
///
/// Returns [`GatewayError::Query`] if a column has a type this gateway
/// does not know how to render, or fails to decode.
pub fn row_to_map(row: &PgRow) -> Result<RowMap, GatewayError> {
    let mut map = RowMap::new();
    for column in row.columns() {
        let index = column.ordinal();
        let type_name = column.type_info().name();
        let value = decode_column(row, index, type_name).map_err(|e| {
            GatewayError::Query(format!("column {}: {e}", column.name()))
        })?;
        map.insert(column.name().to_string(), value);
    }
    Ok(map)
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::from),
        "INT2" => row.try_get::<Option<i16>, _>(index)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(index)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)?
            .map(|v| Value::from(f64::from(v))),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.map(Value::from),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => {
            row.try_get::<Option<String>, _>(index)?.map(Value::from)
        }
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)?
            .map(|d| Value::String(d.to_string())),
        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(index)?
            .map(|t| Value::String(t.to_string())),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(|t| Value::String(t.format("%Y-%m-%dT%H:%M:%S%.f").to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)?
            .map(|t| Value::String(t.to_rfc3339())),
        other => {
            return Err(sqlx::Error::Decode(
                format!("unsupported column type {other}").into(),
            ));
        }
    };
    Ok(value.unwrap_or(Value::Null))
}
