use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::{KeyValueStore, StorageError};

/// Store backed by a single JSON object on disk.
///
/// The file is created on first write. Writes go to a sibling temp file that
/// is renamed over the target, so a crash never leaves a half-written store.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, data: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let content = serde_json::to_string_pretty(data)?;
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), entries = data.len(), "Store persisted");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut data = self.load().await?;
        data.insert(key.to_string(), value.to_string());
        self.persist(&data).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let _guard = self.lock.lock().await;
        let mut data = self.load().await?;
        if data.remove(key).is_none() {
            return Ok(false);
        }
        self.persist(&data).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));

        assert_eq!(store.get("anything").await.unwrap(), None);
        assert!(!store.delete("anything").await.unwrap());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::new(&path);
        store.set("recovery.pending_email", "fan@furia.gg").await.unwrap();
        store.set("auth.access_token", "jwt").await.unwrap();
        drop(store);

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("recovery.pending_email").await.unwrap().as_deref(),
            Some("fan@furia.gg")
        );
        assert!(reopened.delete("auth.access_token").await.unwrap());
        assert!(!reopened.exists("auth.access_token").await.unwrap());
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupted_file_reports_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
