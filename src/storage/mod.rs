// ABOUTME: Persistence gateway abstraction for the client session
// ABOUTME: String key-value store trait with JSON helpers and file and memory backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Persistence Gateway
//!
//! The session persists three JSON values under the keys in
//! `calorie_core::constants::storage_keys`. Backends only move strings; the
//! typed helpers on [`KeyValueStore`] do the (de)serialization and report a
//! value that fails to parse as `StorageCorrupted` so the caller can recover.

/// Directory-backed store, one JSON file per key
pub mod file;
/// In-memory store for tests and ephemeral sessions
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{AppError, AppResult};

/// String key-value store backing the session
///
/// # Examples
///
/// ```rust
/// use calorie_mentor::storage::{KeyValueStore, MemoryStore};
/// # fn example() -> Result<(), calorie_mentor::errors::AppError> {
/// let mut store = MemoryStore::new();
/// store.set_json("foodLogs", &Vec::<String>::new())?;
/// let logs: Option<Vec<String>> = store.get_json("foodLogs")?;
/// assert_eq!(logs, Some(vec![]));
/// # Ok(())
/// # }
/// ```
pub trait KeyValueStore: Send {
    /// Read the raw value for `key`, `None` when absent
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be written
    fn set(&mut self, key: &str, value: &str) -> AppResult<()>;

    /// Remove `key`; removing an absent key succeeds
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be written
    fn remove(&mut self, key: &str) -> AppResult<()>;

    /// Read and deserialize the value for `key`
    ///
    /// # Errors
    ///
    /// Returns `StorageCorrupted` if a value is present but does not parse
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>>
    where
        Self: Sized,
    {
        self.get(key)?
            .map(|raw| serde_json::from_str(&raw).map_err(|e| AppError::storage_corrupted(key, e)))
            .transpose()
    }

    /// Serialize `value` and write it under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> AppResult<()>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_get_json_reports_corruption_with_key() {
        let mut store = MemoryStore::new();
        store.set("userDetails", "{not json").unwrap();

        let error = store.get_json::<u32>("userDetails").unwrap_err();
        assert_eq!(error.code, ErrorCode::StorageCorrupted);
        assert!(error.message.contains("userDetails"));
    }

    #[test]
    fn test_get_json_absent_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get_json::<u32>("foodLogs").unwrap(), None);
    }
}
