use serde::Serialize;

pub use serde_json::Value;

use crate::error::{Error, Result};

/// Convert a caller value into the value model.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// String form of a map key.
///
/// Generated maps are JSON objects, so keys must be scalars. Integer and bool
/// keys keep their textual form and deserialize back into typed keys.
pub fn map_key(value: &Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(Error::InvalidMapKey(other.to_string())),
    }
}
