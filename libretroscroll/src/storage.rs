//! Key-value persistence for RetroScroll records
//!
//! Four logical records live in the store, each under a namespaced key
//! (`retroScroll:stats`, ...) and serialized as JSON:
//!
//! - `settings`: reserved for the settings UI
//! - `stats`: the XP/level state owned by the stats engine
//! - `games`: reserved for per-game high scores
//! - `identity`: the pseudonymous handle and avatar
//!
//! # Backends
//!
//! - `MemoryStore`: in-process map, for tests and throwaway sessions
//! - `FileStore`: one file per key; writes land in a temp file that is
//!   renamed over the target so readers never see a partial record
//!
//! # Example
//!
//! ```no_run
//! use libretroscroll::storage::{FileStore, KeyValueStore, StorageKeys};
//!
//! # fn example() -> libretroscroll::Result<()> {
//! let store = FileStore::new("/tmp/retroscroll")?;
//! let keys = StorageKeys::new("retroScroll");
//! store.set(&keys.stats, r#"{"xp":0}"#)?;
//! assert!(store.get(&keys.stats)?.is_some());
//! # Ok(())
//! # }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, StorageError};

/// String-keyed store with synchronous get/set semantics
///
/// Implementations must make `set` atomic from the caller's perspective:
/// a concurrent `get` sees either the old or the new value.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Human-readable backend name for logs
    fn backend_name(&self) -> &str;
}

/// Namespaced keys of the four persisted records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub settings: String,
    pub stats: String,
    pub games: String,
    pub identity: String,
}

impl StorageKeys {
    pub fn new(namespace: &str) -> Self {
        Self {
            settings: format!("{}:settings", namespace),
            stats: format!("{}:stats", namespace),
            games: format!("{}:games", namespace),
            identity: format!("{}:identity", namespace),
        }
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

/// File-per-key store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn file_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()).into());
        }
        Ok(self
            .base_path
            .join(format!("{}.json", key.replace(':', "."))))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.file_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(e).into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.file_path(key)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).map_err(StorageError::IoError)?;
        fs::rename(&tmp_path, &path).map_err(StorageError::IoError)?;
        tracing::trace!(key, path = %path.display(), "record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.file_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e).into()),
        }
    }

    fn backend_name(&self) -> &str {
        "file"
    }
}

/// Load and deserialize a record
///
/// Unreadable and unparseable records are both treated as absent: the
/// caller falls back to its initial state. The condition is logged.
pub fn load_record<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, backend = store.backend_name(), error = %e, "record unreadable, treating as absent");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "record corrupted, treating as absent");
            None
        }
    }
}

/// Serialize and store a record
pub fn save_record<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(StorageError::Serialize)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_storage_keys_are_namespaced() {
        let keys = StorageKeys::new("retroScroll");
        assert_eq!(keys.settings, "retroScroll:settings");
        assert_eq!(keys.stats, "retroScroll:stats");
        assert_eq!(keys.games, "retroScroll:games");
        assert_eq!(keys.identity, "retroScroll:identity");
    }

    #[test]
    fn test_memory_store_get_set_remove() {
        let store = MemoryStore::new();
        assert!(store.get("a").unwrap().is_none());

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("2".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();
        store.set("retroScroll:stats", "{\"xp\":5}").unwrap();

        let reopened = FileStore::new(temp_dir.path()).unwrap();
        assert_eq!(
            reopened.get("retroScroll:stats").unwrap(),
            Some("{\"xp\":5}".to_string())
        );
        assert!(temp_dir.path().join("retroScroll.stats.json").exists());
        assert!(!temp_dir.path().join("retroScroll.stats.json.tmp").exists());
    }

    #[test]
    fn test_file_store_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();
        assert!(store.get("retroScroll:games").unwrap().is_none());
        assert!(store.remove("retroScroll:games").is_ok());
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();

        assert!(store.set("../escape", "x").is_err());
        assert!(store.set("a/b", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_file_store_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("deep").join("er");
        let store = FileStore::new(&nested).unwrap();
        assert_eq!(store.base_path(), nested.as_path());
        assert!(nested.is_dir());
    }

    #[test]
    fn test_record_round_trip() {
        let store = MemoryStore::new();
        let sample = Sample {
            name: "pixel".to_string(),
            count: 3,
        };

        save_record(&store, "k", &sample).unwrap();
        let loaded: Option<Sample> = load_record(&store, "k");
        assert_eq!(loaded, Some(sample));
    }

    #[test]
    fn test_corrupted_record_treated_as_absent() {
        let store = MemoryStore::new();
        store.set("k", "{not json").unwrap();

        let loaded: Option<Sample> = load_record(&store, "k");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_wrong_shape_treated_as_absent() {
        let store = MemoryStore::new();
        store.set("k", "[1,2,3]").unwrap();

        let loaded: Option<Sample> = load_record(&store, "k");
        assert!(loaded.is_none());
    }
}
