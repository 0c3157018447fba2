//! Permissive numeric decoding for upstream payloads.
//!
//! A counter that is missing, null, or not a number decodes to zero
//! instead of failing the whole match. Numeric strings are parsed and
//! booleans map to 1/0.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce an arbitrary JSON value to a finite `f64`, defaulting to 0.
pub fn number_from_value(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };

    if number.is_finite() {
        number
    } else {
        0.0
    }
}

pub fn f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(number_from_value).unwrap_or(0.0))
}

pub fn i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .unwrap_or_else(|| number_from_value(&Value::Number(n)) as i64),
        Some(other) => number_from_value(&other) as i64,
        None => 0,
    })
}

pub fn u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64(deserializer)?;
    Ok(value.clamp(0, u32::MAX as i64) as u32)
}

pub fn i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64(deserializer)?;
    Ok(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// A list of participant ids. Entries that are not positive ids are dropped.
pub fn ids<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(number_from_value)
            .filter(|id| *id >= 1.0 && *id <= u32::MAX as f64)
            .map(|id| id as u32)
            .collect(),
        _ => Vec::new(),
    })
}

/// A nested value that decodes to `None` instead of failing when malformed.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

pub fn bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => {
            let lower = s.trim().to_ascii_lowercase();
            lower == "true" || lower == "1"
        }
        Some(other) => number_from_value(&other) != 0.0,
        None => false,
    })
}
