//! Session-scoped key-value persistence

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

/// Key holding the session mode string
pub const MODE_KEY: &str = "horizonops_mode";
/// Key holding the JSON-serialized identity; absent when there is none
pub const IDENTITY_KEY: &str = "horizonops_user";

/// Errors raised by session storage backends
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String key-value store scoped to one console session
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// In-memory storage, lost when dropped
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated storage (used to simulate a restored session)
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// One JSON object file per session scope
///
/// The file is removed once its last key is removed.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Storage file for `scope` inside `dir`
    pub fn for_scope(dir: impl AsRef<Path>, scope: &str) -> Self {
        let safe: String = scope
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        Self::new(dir.as_ref().join(format!("session-{}.json", safe)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if map.is_empty() {
            match std::fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(map)?)?;
        Ok(())
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock();
        match self.read_map() {
            Ok(mut map) => map.remove(key),
            Err(e) => {
                debug!(path = %self.path.display(), %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map().unwrap_or_default();
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_roundtrip() {
        let storage = MemorySessionStorage::new();
        storage.set(MODE_KEY, "demo").unwrap();
        assert_eq!(storage.get(MODE_KEY).as_deref(), Some("demo"));
        storage.remove(MODE_KEY).unwrap();
        assert!(storage.get(MODE_KEY).is_none());
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let first = FileSessionStorage::for_scope(dir.path(), "1234");
        first.set(MODE_KEY, "authenticated").unwrap();
        first.set(IDENTITY_KEY, r#"{"email":"a@b.com"}"#).unwrap();

        let second = FileSessionStorage::for_scope(dir.path(), "1234");
        assert_eq!(second.get(MODE_KEY).as_deref(), Some("authenticated"));

        let other_scope = FileSessionStorage::for_scope(dir.path(), "5678");
        assert!(other_scope.get(MODE_KEY).is_none());
    }

    #[test]
    fn file_removed_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::for_scope(dir.path(), "tty/1");
        storage.set(MODE_KEY, "guest").unwrap();
        assert!(storage.path().exists());
        storage.remove(MODE_KEY).unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::for_scope(dir.path(), "x");
        std::fs::write(storage.path(), "not json").unwrap();
        assert!(storage.get(MODE_KEY).is_none());
        storage.set(MODE_KEY, "demo").unwrap();
        assert_eq!(storage.get(MODE_KEY).as_deref(), Some("demo"));
    }
}
