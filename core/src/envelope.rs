//! Response envelope decoding.
//!
//! The backend wraps payloads as `{"data": payload}`, but some routes (and
//! some backends) return the payload bare. An object whose only member is
//! `data` is always an envelope, so its payload must decode. Any other
//! object carrying `data` tries the wrapped shape first and falls back to
//! the bare shape. A body matching neither is an explicit
//! `DeserializationError`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

const DATA_KEY: &str = "data";

/// Decode `body` as `{"data": T}` or as `T`.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    decode_value(value)
}

/// Same as [`decode`] for an already parsed document.
pub fn decode_value<T: DeserializeOwned>(mut value: Value) -> Result<T, ApiError> {
    if is_envelope(&value) {
        return match take_wrapped(&mut value) {
            Some(inner) => from_value(inner),
            None => Err(ApiError::DeserializationError(
                "envelope carries no data".to_string(),
            )),
        };
    }
    if let Some(inner) = take_wrapped(&mut value) {
        match serde_json::from_value::<T>(inner.clone()) {
            Ok(decoded) => return Ok(decoded),
            Err(_) => restore_wrapped(&mut value, inner),
        }
    }
    from_value(value)
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// `{"data": ...}` with no other members.
fn is_envelope(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.len() == 1 && object.contains_key(DATA_KEY))
}

/// Detach a non-null `data` member from a JSON object.
fn take_wrapped(value: &mut Value) -> Option<Value> {
    let object = value.as_object_mut()?;
    match object.get(DATA_KEY) {
        Some(Value::Null) | None => None,
        Some(_) => object.remove(DATA_KEY),
    }
}

fn restore_wrapped(value: &mut Value, inner: Value) {
    if let Some(object) = value.as_object_mut() {
        object.insert(DATA_KEY.to_string(), inner);
    }
}
