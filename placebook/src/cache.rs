//! Local art snapshot cache.
//!
//! This client wraps a generic `KeyValueStore` with:
//! - Key translation: the whole collection lives under [`SNAPSHOT_KEY`]
//! - JSON encoding of the record list
//!
//! The snapshot is a non-authoritative replica of the remote collection.
//! Reads and clears operate on the whole snapshot; there is no per-record
//! CRUD.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::model::{ArtRecord, ModelError};
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the JSON array snapshot.
pub const SNAPSHOT_KEY: &str = "gpsFlowers";

/// Errors from the local snapshot.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    /// The underlying store failed (I/O, quota, ...).
    #[error("Local storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The snapshot could not be encoded.
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// The stored snapshot is not a JSON array of records.
    #[error("Stored snapshot is unreadable: {0}")]
    Corrupt(#[from] ModelError),
}

/// Snapshot cache of art records.
#[derive(Clone)]
pub struct LocalCache {
    /// The underlying generic store.
    store: Arc<dyn KeyValueStore>,
}

impl LocalCache {
    /// Create a new cache over `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the whole snapshot.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(records))` if a snapshot exists (possibly empty)
    /// - `Ok(None)` if nothing has been stored
    /// - `Err(_)` if the store fails or the snapshot is unreadable
    pub async fn read_snapshot(&self) -> Result<Option<Vec<ArtRecord>>, LocalStoreError> {
        let Some(bytes) = self.store.get(SNAPSHOT_KEY).await? else {
            return Ok(None);
        };
        let records = ArtRecord::decode_list(&bytes)?;
        debug!(count = records.len(), "Read local snapshot");
        Ok(Some(records))
    }

    /// Replace the whole snapshot with `records`.
    pub async fn write_snapshot(&self, records: &[ArtRecord]) -> Result<(), LocalStoreError> {
        let bytes = serde_json::to_vec(records)?;
        self.store.set(SNAPSHOT_KEY, bytes).await?;
        debug!(count = records.len(), "Wrote local snapshot");
        Ok(())
    }

    /// Remove the snapshot.
    pub async fn clear(&self) -> Result<(), LocalStoreError> {
        let existed = self.store.delete(SNAPSHOT_KEY).await?;
        debug!(existed, "Cleared local snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Position;
    use crate::model::{ArtOptions, IDENTITY_TRANSFORM};
    use crate::storage::{FailingStore, MemoryStore};

    fn record(lat: f64) -> ArtRecord {
        let position = Position::new(lat, 10.0).unwrap();
        ArtRecord::new(&position, IDENTITY_TRANSFORM, "user_1", ArtOptions::default())
    }

    #[tokio::test]
    async fn test_empty_cache_reads_none() {
        let cache = LocalCache::new(Arc::new(MemoryStore::new()));
        assert!(cache.read_snapshot().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let cache = LocalCache::new(Arc::new(MemoryStore::new()));
        let records = vec![record(1.0), record(2.0)];

        cache.write_snapshot(&records).await.unwrap();

        let read = cache.read_snapshot().await.unwrap().unwrap();
        assert_eq!(read, records);
    }

    #[tokio::test]
    async fn test_write_replaces_snapshot() {
        let cache = LocalCache::new(Arc::new(MemoryStore::new()));

        cache.write_snapshot(&[record(1.0), record(2.0)]).await.unwrap();
        cache.write_snapshot(&[record(3.0)]).await.unwrap();

        let read = cache.read_snapshot().await.unwrap().unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].latitude, 3.0);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = LocalCache::new(Arc::new(MemoryStore::new()));

        cache.write_snapshot(&[record(1.0)]).await.unwrap();
        cache.clear().await.unwrap();

        assert!(cache.read_snapshot().await.unwrap().is_none());
        // Clearing twice is fine
        cache.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(SNAPSHOT_KEY, b"not json".to_vec()).await.unwrap();

        let cache = LocalCache::new(store);
        let err = cache.read_snapshot().await.unwrap_err();
        assert!(matches!(err, LocalStoreError::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_quota_failure_surfaces() {
        let cache = LocalCache::new(Arc::new(MemoryStore::with_quota(8)));
        let err = cache.write_snapshot(&[record(1.0)]).await.unwrap_err();
        assert!(matches!(
            err,
            LocalStoreError::Storage(StorageError::QuotaExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let cache = LocalCache::new(Arc::new(FailingStore));
        assert!(cache.read_snapshot().await.is_err());
        assert!(cache.clear().await.is_err());
    }
}
