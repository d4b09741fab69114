//! Key-addressed JSON file store with atomic writes.
//!
//! Each key maps to `<root>/<key>.json`. Reads are fail-soft: a missing,
//! unreadable or corrupt file is reported as absent. Writes go to a temp
//! file in the same directory which is then renamed over the target, so a
//! crash mid-write leaves either the old record or the new one.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{AppError, Result};

/// A directory of pretty-printed JSON records.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Creates a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the file path for a key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Returns true if a record file exists for the key.
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    /// Loads and decodes the record for `key`.
    ///
    /// Returns None when the file is missing, unreadable or does not decode
    /// as `T`. Only the last two are logged.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Cache file {} is unreadable, ignoring it: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Cache file {} is corrupt, ignoring it: {}", path.display(), e);
                None
            }
        }
    }

    /// Atomically writes the record for `key`.
    pub fn try_save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.path_for(key);

        fs::create_dir_all(&self.root).map_err(|e| AppError::cache_io(&self.root, e))?;

        let mut tmp = NamedTempFile::new_in(&self.root).map_err(|e| AppError::cache_io(&path, e))?;
        serde_json::to_writer_pretty(&mut tmp, value)
            .map_err(|e| AppError::cache_io(&path, io::Error::from(e)))?;
        tmp.write_all(b"\n").map_err(|e| AppError::cache_io(&path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| AppError::cache_io(&path, e))?;
        tmp.persist(&path)
            .map_err(|e| AppError::cache_io(&path, e.error))?;

        debug!("Wrote cache file {}", path.display());
        Ok(())
    }

    /// Writes the record for `key`, logging instead of failing.
    ///
    /// Returns true if the record was persisted.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match self.try_save(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not save cache record '{}': {}", key, e.message);
                false
            }
        }
    }
}
