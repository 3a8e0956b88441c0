//! Key-value persistence backends for the learned keyword store

use crate::error::{AtsError, Result};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Minimal durable key-value capability the learned store is persisted through.
///
/// The host picks a backend at construction time; the engine never inspects
/// which one it was given.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Process-local backend; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AtsError::Persistence("Memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AtsError::Persistence("Memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Durable backend holding every key in one JSON object file.
///
/// Writes go to a temp file in the same directory which is then renamed over
/// the target, so a crash mid-write leaves the previous file intact.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(AtsError::Persistence(format!(
                "Expected a JSON object in {}, found {}",
                self.path.display(),
                json_kind(&other)
            ))),
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        let content = serde_json::to_string_pretty(map)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| AtsError::Persistence(format!("Failed to persist {}: {}", self.path.display(), e)))?;

        debug!("Wrote {} key(s) to {}", map.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut map = recoverable_base(self.read_all(), &self.path)?;
        map.insert(key.to_string(), value);
        self.write_all(&map)
    }
}

/// Existing content to merge a write into. Unparseable content is replaced;
/// I/O failures abort the write so the file is left untouched.
fn recoverable_base(read: Result<Map<String, Value>>, path: &Path) -> Result<Map<String, Value>> {
    match read {
        Ok(map) => Ok(map),
        Err(e @ AtsError::Io(_)) => Err(e),
        Err(e) => {
            warn!("Replacing unreadable store {}: {}", path.display(), e);
            Ok(Map::new())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").unwrap().is_none());
        store.set("k", json!(["a", "b"])).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!(["a", "b"])));
    }

    #[test]
    fn test_json_file_store_missing_file() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_json_file_store_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let store = JsonFileStore::new(&path);

        store.set("first", json!(1)).unwrap();
        store.set("second", json!(["x"])).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("first").unwrap(), Some(json!(1)));
        assert_eq!(reopened.get("second").unwrap(), Some(json!(["x"])));
    }

    #[test]
    fn test_json_file_store_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.get("k").is_err());

        store.set("k", json!("v")).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!("v")));
    }

    #[test]
    fn test_io_errors_are_not_treated_as_corruption() {
        let path = Path::new("store.json");
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(recoverable_base(Err(AtsError::Io(denied)), path), Err(AtsError::Io(_))));

        let corrupt = serde_json::from_str::<Value>("{not json").unwrap_err();
        let base = recoverable_base(Err(AtsError::Serialization(corrupt)), path).unwrap();
        assert!(base.is_empty());
    }

    #[test]
    fn test_json_file_store_replaces_non_object_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let store = JsonFileStore::new(&path);
        store.set("k", json!(true)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!(true)));
    }
}
