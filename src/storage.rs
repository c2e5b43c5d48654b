//! Text key-value persistence seam the store and theme preference write through.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to prepare storage directory {path}: {source}")]
    Init { path: PathBuf, source: io::Error },
    #[error("Failed to read stored value for '{key}': {source}")]
    Read { key: String, source: io::Error },
    #[error("Failed to write stored value for '{key}': {source}")]
    Write { key: String, source: io::Error },
}

/// Minimal persistent store contract: text in, text out, absent keys are `None`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One file per key under the configured data directory.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(config: &AppConfig) -> Result<Self, StorageError> {
        let root = config.data_dir().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StorageError::Init {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value).map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }
}

/// In-memory store for tests and embedding without a data directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (FileStore, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf());
        let store = FileStore::open(&config).expect("open store");
        (store, dir)
    }

    #[test]
    fn file_store_roundtrips_text() {
        let (mut store, _guard) = temp_store();
        assert_eq!(store.get("theme").unwrap(), None);

        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn file_store_keeps_keys_separate() {
        let (mut store, _guard) = temp_store();
        store.set("taskdeck-tasks", "[]").unwrap();
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("taskdeck-tasks").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn memory_store_roundtrips_text() {
        let mut store = MemoryStore::default();
        assert_eq!(store.get("missing").unwrap(), None);
        store.set("key", "value").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("value"));
    }
}
