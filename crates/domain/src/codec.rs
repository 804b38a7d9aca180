//! Serialized list columns
//!
//! Profiles keep their equipment and rest days as JSON arrays in a single text column.

use serde::{Serialize, de::DeserializeOwned};

use crate::StorageError;

pub fn encode_list<T: Serialize>(values: &[T]) -> Result<String, StorageError> {
    serde_json::to_string(values).map_err(|err| StorageError::Other(Box::new(err)))
}

/// An empty column is read as an empty list.
pub fn decode_list<T: DeserializeOwned>(value: &str) -> Result<Vec<T>, StorageError> {
    if value.trim().is_empty() {
        return Ok(vec![]);
    }
    serde_json::from_str(value).map_err(|err| StorageError::CorruptRecord(err.to_string()))
}
