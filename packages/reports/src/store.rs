//! Durable key-value storage for client-side state.
//!
//! Values are JSON documents keyed by string. [`JsonFileStore`] keeps the
//! whole map in one file and rewrites it on every `put`; there is no
//! compaction and no size bound.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Errors from key-value storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored data does not have the expected shape.
    #[error("Corrupt store: {message}")]
    Corrupt {
        /// Description of the problem.
        message: String,
    },
}

/// A string-keyed store of JSON values.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Replaces the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;
}

/// In-process store. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, serde_json::Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, serde_json::Value>> {
        // A poisoned map is still a valid map.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// A store persisted as a single JSON object on disk.
///
/// The file is created on first `put`. A missing file reads as empty.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (without creating) the store at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<serde_json::Map<String, serde_json::Value>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(serde_json::Map::new());
            }
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(serde_json::Map::new());
        }

        match serde_json::from_str(&text)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(StoreError::Corrupt {
                message: format!(
                    "{} holds a JSON {} instead of an object",
                    self.path.display(),
                    json_kind(&other)
                ),
            }),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut map = self.read_all()?;
        map.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write to a sibling file first so a crash never leaves half a map.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&map)?)?;
        std::fs::rename(&tmp, &self.path)?;

        log::trace!("Wrote key {key:?} to {}", self.path.display());
        Ok(())
    }
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("clearpath_store_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir.join("store.json")
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.put("k", serde_json::json!([1, 2])).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(serde_json::json!([1, 2])));
    }

    #[test]
    fn file_store_missing_file_reads_empty() {
        let path = temp_path("missing");
        let store = JsonFileStore::new(&path);
        assert!(store.get("submissions").unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let path = temp_path("persist");
        JsonFileStore::new(&path)
            .put("a", serde_json::json!({"x": 1}))
            .unwrap();
        JsonFileStore::new(&path)
            .put("b", serde_json::json!("y"))
            .unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("a").unwrap(), Some(serde_json::json!({"x": 1})));
        assert_eq!(reopened.get("b").unwrap(), Some(serde_json::json!("y")));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn file_store_rejects_non_object() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.get("a"), Err(StoreError::Corrupt { .. })));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
