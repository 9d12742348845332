//! `KeyValueStore` backed by one JSON file per key.
//!
//! Writes go to a temporary file in the same directory, are synced to disk,
//! and are then renamed into place, so a crash never leaves a half-written
//! blob behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use multiplicathlon_core::error::DomainError;
use multiplicathlon_core::storage::KeyValueStore;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// A store rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, DomainError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DomainError::Validation(format!(
                "invalid storage key '{key}'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> DomainError {
    DomainError::Infrastructure(format!("failed to {action} {}: {e}", path.display()))
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        let path = self.path_for(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key, "no stored value");
                return Ok(None);
            }
            Err(e) => return Err(io_error("read", &path, &e)),
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "stored file is not valid JSON, ignoring it");
                Ok(None)
            }
        }
    }

    async fn save(&self, key: &str, value: serde_json::Value) -> Result<(), DomainError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("create", &self.dir, &e))?;
        let bytes = serde_json::to_vec_pretty(&value)
            .map_err(|e| DomainError::Infrastructure(format!("serialization failed: {e}")))?;
        let tmp_path = path.with_extension("json.tmp");
        let mut tmp_file = tokio::fs::File::create(&tmp_path)
            .await
            .map_err(|e| io_error("create", &tmp_path, &e))?;
        tmp_file
            .write_all(&bytes)
            .await
            .map_err(|e| io_error("write", &tmp_path, &e))?;
        tmp_file
            .sync_all()
            .await
            .map_err(|e| io_error("sync", &tmp_path, &e))?;
        drop(tmp_file);
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| io_error("rename", &tmp_path, &e))?;
        debug!(key, path = %path.display(), "value saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.load("options").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));

        store
            .save("profiles", serde_json::json!([{"name": "Alice"}]))
            .await
            .unwrap();

        let path = dir.path().join("nested").join("profiles.json");
        assert!(path.exists());
        assert!(!dir.path().join("nested").join("profiles.json.tmp").exists());
        assert_eq!(
            store.load("profiles").await.unwrap(),
            Some(serde_json::json!([{"name": "Alice"}]))
        );
    }

    #[tokio::test]
    async fn test_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.save("options", serde_json::json!({"v": 1})).await.unwrap();

        store.save("options", serde_json::json!({"v": 2})).await.unwrap();

        let on_disk = std::fs::read_to_string(dir.path().join("options.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(value, serde_json::json!({"v": 2}));
        assert!(!dir.path().join("options.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_invalid_json_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("options.json"), b"{ not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.load("options").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_keys_that_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let result = store.save("../outside", serde_json::json!(1)).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
