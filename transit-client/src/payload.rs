//! Reading DTO documents from disk.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Result, TransitError};

/// Read and decode a JSON document.
pub fn load_payload<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    transit_common::decode(&content).map_err(|e| {
        TransitError::Serialization(format!("{}: {}", path.display(), e))
    })
}
