//! Record Access
//!
//! Records are schemaless JSON objects. Nested fields are addressed with
//! dotted key paths such as `address.city`.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A single grid row
pub type Record = Map<String, Value>;

/// Separator between segments of a nested key path
pub const PATH_SEPARATOR: char = '.';

/// Resolve a dotted key path by descending into nested objects.
///
/// Every intermediate segment must name an object; a missing key at any
/// level is reported as [`Error::MalformedRecord`].
pub fn resolve_path<'a>(record: &'a Record, path: &str) -> Result<&'a Value> {
    let mut object = record;
    let mut segments = path.split(PATH_SEPARATOR).peekable();

    while let Some(segment) = segments.next() {
        let value = object
            .get(segment)
            .ok_or_else(|| Error::malformed(path, format!("missing key `{segment}`")))?;

        if segments.peek().is_none() {
            return Ok(value);
        }

        object = value
            .as_object()
            .ok_or_else(|| Error::malformed(path, format!("`{segment}` is not a mapping")))?;
    }

    Err(Error::malformed(path, "empty key path"))
}

/// Resolve a path that must end at a scalar (or array) value
pub fn resolve_scalar<'a>(record: &'a Record, path: &str) -> Result<&'a Value> {
    let value = resolve_path(record, path)?;
    if value.is_object() {
        return Err(Error::malformed(path, "expected a scalar, found a mapping"));
    }
    Ok(value)
}

/// Text used for keyword matching
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over cell values.
///
/// Values of the same type compare naturally (numbers numerically, strings
/// lexicographically); mixed types order as null < bool < number < string < array.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(_), Value::Array(_)) => a.to_string().cmp(&b.to_string()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
