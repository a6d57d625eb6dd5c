//! Key-keyed durable JSON store.
//!
//! Each key maps to one JSON file under the store directory. Writes
//! replace the whole value (last writer wins, no merge) and go through
//! a temp file + rename so readers never observe a partial document.
//! Persistence failures are logged and swallowed: the in-memory value
//! held by the caller stays authoritative for the session.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::error::Result;

pub struct PersistentStore {
    dir: PathBuf,
}

impl PersistentStore {
    /// Open a store rooted at the given directory, creating it if
    /// needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open a store at the default data directory.
    pub fn open_default() -> Result<Self> {
        let dir = crate::config::get_data_dir()?;
        Self::new(dir)
    }

    /// Read the value for `key`, falling back to `default` when the
    /// file is absent or unparsable. A fallback never writes anything;
    /// the first explicit `set` does.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Unparsable value for key '{}', using default: {}", key, e);
                    default
                }
            },
            Err(_) => default,
        }
    }

    /// Serialize the full value for `key` and replace the previous one.
    /// Failures are logged, not propagated.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.write(key, value) {
            warn!("Failed to persist key '{}': {}", key, e);
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let serialized = serde_json::to_string(value)?;
        let path = self.key_path(key);
        let tmp_path = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp_path, serialized)?;
        fs::rename(&tmp_path, &path)?;
        debug!("Persisted key '{}'", key);
        Ok(())
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}
