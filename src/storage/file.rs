// ABOUTME: File-backed key-value store persisting each key as a JSON file
// ABOUTME: Writes go through a temporary file and rename so a crash never leaves half a value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::KeyValueStore;
use crate::errors::{AppError, AppResult};

/// Extension of value files
const VALUE_EXTENSION: &str = "json";

/// Extension of in-flight writes
const TEMP_EXTENSION: &str = "json.tmp";

/// Store rooted at a directory; key `foodLogs` lives in `foodLogs.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store at `root`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory cannot be created
    pub fn open(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            AppError::storage(format!(
                "cannot create data directory {}: {e}",
                root.display()
            ))
            .with_source(e)
        })?;
        debug!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    /// Directory holding the value files
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str, extension: &str) -> AppResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{extension}")))
    }
}

/// Keys become file names, so only plain identifiers are accepted
fn validate_key(key: &str) -> AppResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!("invalid storage key '{key}'")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key, VALUE_EXTENSION)?;
        match fs::read_to_string(&path) {
            Ok(raw) => {
                trace!(key, bytes = raw.len(), "Read stored value");
                Ok(Some(raw))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // Non-UTF-8 content is a damaged value, not an I/O failure
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                Err(AppError::storage_corrupted(key, e))
            }
            Err(e) => Err(AppError::from(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key, VALUE_EXTENSION)?;
        let temp = self.path_for(key, TEMP_EXTENSION)?;
        fs::write(&temp, value)?;
        fs::rename(&temp, &path)?;
        trace!(key, bytes = value.len(), "Wrote stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        let path = self.path_for(key, VALUE_EXTENSION)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::from(e)),
        }
    }
}
