//! Key-value settings persistence.
//!
//! The daily card and history stores only ever need `get` and `set` on a
//! flat key space, so that is all [`SettingsStore`] exposes. Two backends are
//! provided: an in-memory map and a JSON file with file locking.

use crate::{Error, Result};
use fs2::FileExt;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Narrow key-value capability injected into the stores
pub trait SettingsStore {
    /// Read a value, `None` if the key was never written
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value, replacing any previous one (last write wins)
    fn set(&self, key: &str, value: Value) -> Result<()>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for &T {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Process-local settings, lost on exit
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RefCell<HashMap<String, Value>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// JSON file backend
// ============================================================================

/// Settings persisted as a single JSON object on disk
///
/// Every `set` rewrites the whole file atomically. A missing or corrupted
/// file reads as empty.
#[derive(Clone, Debug)]
pub struct JsonSettingsFile {
    path: PathBuf,
}

impl JsonSettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all settings with shared locking
    fn load_map(&self) -> Map<String, Value> {
        if !self.path.exists() {
            tracing::debug!("No settings file at {:?}, starting empty", self.path);
            return Map::new();
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open settings file {:?}: {}. Using empty settings.",
                    self.path,
                    e
                );
                return Map::new();
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock settings file {:?}: {}. Using empty settings.",
                self.path,
                e
            );
            return Map::new();
        }

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        let _ = file.unlock();

        if let Err(e) = read {
            tracing::warn!(
                "Failed to read settings file {:?}: {}. Using empty settings.",
                self.path,
                e
            );
            return Map::new();
        }

        match serde_json::from_str::<Map<String, Value>>(&contents) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(
                    "Failed to parse settings file {:?}: {}. Using empty settings.",
                    self.path,
                    e
                );
                Map::new()
            }
        }
    }

    /// Write all settings through a temp file and rename over the original
    fn save_map(&self, map: &Map<String, Value>) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Settings(format!("{:?} has no parent directory", self.path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, map)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} settings to {:?}", map.len(), self.path);
        Ok(())
    }
}

impl SettingsStore for JsonSettingsFile {
    fn get(&self, key: &str) -> Option<Value> {
        self.load_map().remove(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut map = self.load_map();
        map.insert(key.to_string(), value);
        self.save_map(&map)
    }
}
