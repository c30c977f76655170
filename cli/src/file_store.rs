//! Session store backed by a JSON object on disk.
//!
//! The file holds a flat `{"key": "value"}` map. A missing file is an empty
//! session; every write rewrites the whole file.

#[cfg(test)]
#[path = "file_store_test.rs"]
mod file_store_test;

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use vitals::SessionStore;
use vitals::session::StoreError;

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| self.error(&e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.error(&e)),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let rendered = serde_json::to_string_pretty(entries).map_err(|e| self.error(&e))?;
        std::fs::write(&self.path, rendered).map_err(|e| self.error(&e))
    }

    fn error(&self, err: &dyn std::fmt::Display) -> StoreError {
        StoreError(format!("{}: {err}", self.path.display()))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable session file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(self.error(&e)),
            _ => Ok(()),
        }
    }
}
