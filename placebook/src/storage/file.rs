//! File-backed storage provider.
//!
//! Each key maps to one file directly under the store directory. Writes go
//! to a temporary sibling first and are renamed into place, so readers see
//! either the previous value or the new one, never a partial write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::random_base36;
use crate::storage::traits::{validate_key, BoxFuture, KeyValueStore, StorageError};

/// Durable key-value store rooted at a directory.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory holding the stored values.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.directory.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), StorageError>> {
        let key = key.to_string();
        Box::pin(async move {
            let path = self.path_for(&key)?;
            tokio::fs::create_dir_all(&self.directory).await?;

            let tmp_path = self
                .directory
                .join(format!(".{}.{}.tmp", key, random_base36(6)));
            if let Err(e) = tokio::fs::write(&tmp_path, &value).await {
                let _ = tokio::fs::remove_file(&tmp_path).await;
                return Err(e.into());
            }
            if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
                let _ = tokio::fs::remove_file(&tmp_path).await;
                return Err(e.into());
            }

            debug!(key = %key, bytes = value.len(), "Stored value");
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StorageError>> {
        let key = key.to_string();
        Box::pin(async move {
            let path = self.path_for(&key)?;
            match tokio::fs::read(&path).await {
                Ok(data) => Ok(Some(data)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StorageError>> {
        let key = key.to_string();
        Box::pin(async move {
            let path = self.path_for(&key)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, StorageError>> {
        let key = key.to_string();
        Box::pin(async move {
            let path = self.path_for(&key)?;
            Ok(tokio::fs::try_exists(&path).await?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_set_and_get() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.set("gpsFlowers", b"[]".to_vec()).await.unwrap();

        assert_eq!(store.get("gpsFlowers").await.unwrap(), Some(b"[]".to_vec()));
        assert!(dir.path().join("gpsFlowers").exists());
    }

    #[tokio::test]
    async fn test_file_store_missing_key() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("not-created-yet"));

        assert!(store.get("absent").await.unwrap().is_none());
        assert!(!store.contains("absent").await.unwrap());
        assert!(!store.delete("absent").await.unwrap());
    }

    #[tokio::test]
    async fn test_file_store_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(&nested);

        store.set("key", vec![7]).await.unwrap();
        assert!(nested.join("key").exists());
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();

        FileStore::new(dir.path())
            .set("placebook_user_id", b"user_1".to_vec())
            .await
            .unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(
            reopened.get("placebook_user_id").await.unwrap(),
            Some(b"user_1".to_vec())
        );
    }

    #[tokio::test]
    async fn test_file_store_overwrite_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.set("key", vec![1]).await.unwrap();
        store.set("key", vec![2, 3]).await.unwrap();

        assert_eq!(store.get("key").await.unwrap(), Some(vec![2, 3]));
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_file_store_delete() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.set("key", vec![1]).await.unwrap();
        assert!(store.delete("key").await.unwrap());
        assert!(!store.contains("key").await.unwrap());
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let err = store.set("../outside", vec![1]).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
