/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Money codec
//!
//! The API carries every currency amount as a signed integer number of minor
//! units (cents). In memory amounts are decimals of major units. This module
//! converts named fields of JSON records between both representations:
//!
//! - [`to_major`] / [`to_major_list`]: wire (`150`) to domain (`1.5`)
//! - [`to_minor`] / [`to_minor_list`]: domain (`1.5`) to wire (`150`)
//!
//! All arithmetic goes through [`Decimal`]. A JSON float is only produced at
//! the very end, from the decimal's exact string, so `major -> minor -> major`
//! reproduces any two decimal value.
//!
//! Fields that are absent or `null` are skipped, fields outside the requested
//! set are left untouched. Nothing here takes a lock.

use crate::constants::{MINOR_UNIT_SCALE, MINOR_UNITS_PER_MAJOR};
use crate::error::AppError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Number, Value};
use std::str::FromStr;

/// A decoded JSON object representing one entity
pub type Record = Map<String, Value>;

/// Names of the fields of a record holding currency amounts
pub type MoneyFields = [&'static str];

/// Converts an amount of minor units into major units
#[must_use]
pub fn minor_to_major(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

/// Converts an amount of major units into minor units
///
/// Sub-cent digits are rounded half away from zero.
pub fn major_to_minor(major: Decimal) -> Result<i64, AppError> {
    let scaled = major
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .ok_or_else(|| AppError::Conversion(format!("amount {major} overflows")))?;
    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| AppError::Conversion(format!("amount {major} does not fit in minor units")))
}

/// Replaces the listed fields of `record` by their major unit value
///
/// # Arguments
///
/// * `record` - Record as received from the API
/// * `fields` - Names of the fields holding minor units
///
/// # Returns
///
/// The record with every listed, non-null field divided by 100. Other
/// fields are untouched.
///
/// # Errors
///
/// [`AppError::Conversion`] when a listed field holds something other than an
/// integral number.
///
/// # Example
///
/// ```
/// use msc_client::model::money::to_major;
/// use serde_json::json;
///
/// let record = json!({"a": 150, "b": "x"}).as_object().cloned().unwrap();
/// let out = to_major(record, &["a"]).unwrap();
/// assert_eq!(out["a"], json!(1.5));
/// assert_eq!(out["b"], json!("x"));
/// ```
pub fn to_major(mut record: Record, fields: &MoneyFields) -> Result<Record, AppError> {
    for field in fields {
        if let Some(value) = present(&mut record, field) {
            let minor = wire_minor(field, value)?;
            *value = decimal_to_json(field, minor_to_major(minor))?;
        }
    }
    Ok(record)
}

/// Replaces the listed fields of `record` by their minor unit value
///
/// # Arguments
///
/// * `record` - Record in domain form
/// * `fields` - Names of the fields holding major units
///
/// # Returns
///
/// The record with every listed, non-null field as an integer number of
/// cents, rounded half away from zero
///
/// # Errors
///
/// [`AppError::Conversion`] when a listed field is not numeric.
///
/// # Example
///
/// ```
/// use msc_client::model::money::to_minor;
/// use serde_json::json;
///
/// let record = json!({"amount": 0.29}).as_object().cloned().unwrap();
/// assert_eq!(to_minor(record, &["amount"]).unwrap()["amount"], json!(29));
/// ```
pub fn to_minor(mut record: Record, fields: &MoneyFields) -> Result<Record, AppError> {
    for field in fields {
        if let Some(value) = present(&mut record, field) {
            let major = json_to_decimal(field, value)?;
            *value = Value::from(major_to_minor(major)?);
        }
    }
    Ok(record)
}

/// Applies [`to_major`] to every record, preserving order and length
pub fn to_major_list(records: Vec<Record>, fields: &MoneyFields) -> Result<Vec<Record>, AppError> {
    records
        .into_iter()
        .map(|record| to_major(record, fields))
        .collect()
}

/// Applies [`to_minor`] to every record, preserving order and length
pub fn to_minor_list(records: Vec<Record>, fields: &MoneyFields) -> Result<Vec<Record>, AppError> {
    records
        .into_iter()
        .map(|record| to_minor(record, fields))
        .collect()
}

/// [`to_major`] for a JSON object or [`to_major_list`] for a JSON array
///
/// Array elements that are not objects are left as they are. Any other value
/// is returned unchanged.
pub fn to_major_value(value: Value, fields: &MoneyFields) -> Result<Value, AppError> {
    map_records(value, fields, to_major)
}

/// [`to_minor`] for a JSON object or [`to_minor_list`] for a JSON array
pub fn to_minor_value(value: Value, fields: &MoneyFields) -> Result<Value, AppError> {
    map_records(value, fields, to_minor)
}

fn map_records(
    value: Value,
    fields: &MoneyFields,
    convert: fn(Record, &MoneyFields) -> Result<Record, AppError>,
) -> Result<Value, AppError> {
    match value {
        Value::Object(record) => Ok(Value::Object(convert(record, fields)?)),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => convert(record, fields).map(Value::Object),
                other => Ok(other),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other),
    }
}

fn present<'a>(record: &'a mut Record, field: &str) -> Option<&'a mut Value> {
    record.get_mut(field).filter(|value| !value.is_null())
}

fn wire_minor(field: &str, value: &Value) -> Result<i64, AppError> {
    if let Some(minor) = value.as_i64() {
        return Ok(minor);
    }
    let decimal = json_to_decimal(field, value)?;
    if !decimal.fract().is_zero() {
        return Err(AppError::Conversion(format!(
            "field '{field}' holds fractional minor units: {decimal}"
        )));
    }
    decimal.to_i64().ok_or_else(|| {
        AppError::Conversion(format!("field '{field}' is out of range: {decimal}"))
    })
}

fn json_to_decimal(field: &str, value: &Value) -> Result<Decimal, AppError> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        other => {
            return Err(AppError::Conversion(format!(
                "field '{field}' is not numeric: {other}"
            )));
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| AppError::Conversion(format!("field '{field}' is not numeric ({text}): {e}")))
}

fn decimal_to_json(field: &str, decimal: Decimal) -> Result<Value, AppError> {
    let normalized = decimal.normalize();
    if normalized.fract().is_zero() {
        if let Some(whole) = normalized.to_i64() {
            return Ok(Value::from(whole));
        }
    }
    normalized
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| AppError::Conversion(format!("field '{field}' cannot be encoded: {decimal}")))
}
