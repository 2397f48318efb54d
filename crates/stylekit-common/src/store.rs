//! Key-value option storage.
//!
//! The core never touches a database directly; it reads and writes
//! loosely typed JSON values through [`OptionStore`]. Two implementations
//! ship here: [`MemoryStore`] for tests and embedding, and
//! [`JsonFileStore`] which persists every option in one JSON file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::StoreError;

/// Host key-value option store.
pub trait OptionStore: Send + Sync {
    /// Read an option, `None` when it has never been set.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write an option, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Read an option, returning `default` when it is absent.
    fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Read a string option; non-string values read as absent.
    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of options currently set.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Value>> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OptionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self
            .values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store that keeps all options in a single JSON object on disk.
///
/// The file is read once on open and rewritten atomically (write to
/// `.tmp`, then rename) after every `set`. A `set` whose write fails
/// leaves the in-memory values untouched.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&content) {
                    Ok(Value::Object(map)) => map,
                    Ok(_) => {
                        return Err(StoreError::Corrupt(format!(
                            "{} does not contain a JSON object",
                            path.display()
                        )))
                    }
                    Err(e) => {
                        return Err(StoreError::Corrupt(format!(
                            "failed to parse {}: {e}",
                            path.display()
                        )))
                    }
                }
            }
        } else {
            debug!(path = %path.display(), "option file does not exist yet");
            Map::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            warn!("atomic rename failed ({}), falling back to direct write", e);
            std::fs::write(&self.path, &json).map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

impl OptionStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.lock();
        let mut next = values.clone();
        next.insert(key.to_string(), value);
        self.persist(&next)?;
        *values = next;
        debug!(key, path = %self.path.display(), "option saved");
        Ok(())
    }
}
