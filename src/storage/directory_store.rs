use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use snafu::ResultExt;
use tracing::debug;

use crate::storage::key_value_store::IoSnafu;
use crate::storage::{KeyValueStore, StoreError, validate_key};

const TEMP_SUFFIX: &str = ".tmp";

/// Stores every key as a file named after the key inside `directory`.
///
/// The directory is created on first write. Values are written to a sibling
/// temporary file first and renamed over the target, so a reader sees either
/// the previous value or the new one.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    directory: PathBuf,
}

impl DirectoryStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.directory.join(key))
    }
}

impl KeyValueStore for DirectoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => {
                debug!("Read {} bytes from {}", value.len(), path.display());
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context(IoSnafu { path }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.directory).context(IoSnafu {
            path: self.directory.clone(),
        })?;

        let temp_path = self.directory.join(format!("{key}{TEMP_SUFFIX}"));
        fs::write(&temp_path, value).context(IoSnafu {
            path: temp_path.clone(),
        })?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e).context(IoSnafu { path });
        }

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_key_reads_as_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = DirectoryStore::new(temp_dir.path().join("state"));
        assert_eq!(store.get("shareplaceFS").unwrap(), None);
    }

    #[test]
    fn set_creates_directory_and_persists_value() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let directory = temp_dir.path().join("nested").join("state");
        let mut store = DirectoryStore::new(&directory);

        store.set("shareplaceFS", "{}").unwrap();

        assert!(directory.join("shareplaceFS").is_file());
        assert!(!directory.join("shareplaceFS.tmp").exists());
        let reopened = DirectoryStore::new(&directory);
        assert_eq!(reopened.get("shareplaceFS").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn set_overwrites_wholesale() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut store = DirectoryStore::new(temp_dir.path());

        store.set("k", "a much longer first value").unwrap();
        store.set("k", "short").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn invalid_key_is_rejected_before_io() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut store = DirectoryStore::new(temp_dir.path());

        assert!(matches!(
            store.set("../escape", "x"),
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            store.get("a/b"),
            Err(StoreError::InvalidKey { .. })
        ));
    }

    #[test]
    fn directory_occupied_by_file_is_an_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let mut store = DirectoryStore::new(&blocker);

        assert!(matches!(store.set("k", "v"), Err(StoreError::Io { .. })));
    }
}
