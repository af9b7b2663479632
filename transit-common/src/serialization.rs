//! JSON encoding for payloads crossing the native boundary.
//!
//! DTOs mark every optional field with `skip_serializing_if`, so encoded
//! documents never carry `null` for an absent value.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

/// Encode a value as a compact JSON string.
pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Error::from)
}

/// Encode a value as indented JSON, for human consumption.
pub fn encode_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Error::from)
}

/// Decode a JSON document.
pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(Error::from)
}

/// Decode a JSON array.
///
/// A literal `null` decodes to an empty list, which is what a Go `nil` slice
/// marshals to.
pub fn decode_list<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    let list: Option<Vec<T>> = serde_json::from_str(json)?;
    Ok(list.unwrap_or_default())
}
