//! In-memory storage provider using moka.
//!
//! Values live for the lifetime of the provider. Useful for tests, for
//! `--offline` sessions without a data directory, and as a stand-in for
//! browser-style storage with a per-value quota.

use moka::future::Cache as MokaCache;

use crate::storage::traits::{validate_key, BoxFuture, KeyValueStore, StorageError};

/// In-memory key-value store.
///
/// Entries are never evicted; the optional quota rejects oversized values
/// with `StorageError::QuotaExceeded` instead.
pub struct MemoryStore {
    /// The underlying moka cache (unbounded).
    cache: MokaCache<String, Vec<u8>>,

    /// Maximum size of a single value in bytes.
    max_value_bytes: Option<usize>,
}

impl MemoryStore {
    /// Create a new memory store without a quota.
    pub fn new() -> Self {
        Self {
            cache: MokaCache::builder().build(),
            max_value_bytes: None,
        }
    }

    /// Create a new memory store that rejects values above `max_value_bytes`.
    pub fn with_quota(max_value_bytes: usize) -> Self {
        Self {
            cache: MokaCache::builder().build(),
            max_value_bytes: Some(max_value_bytes),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), StorageError>> {
        let key = key.to_string();
        Box::pin(async move {
            validate_key(&key)?;
            if let Some(max) = self.max_value_bytes {
                if value.len() > max {
                    return Err(StorageError::QuotaExceeded {
                        size: value.len(),
                        max,
                    });
                }
            }
            self.cache.insert(key, value).await;
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StorageError>> {
        let key = key.to_string();
        Box::pin(async move {
            validate_key(&key)?;
            Ok(self.cache.get(&key).await)
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StorageError>> {
        let key = key.to_string();
        Box::pin(async move {
            validate_key(&key)?;
            Ok(self.cache.remove(&key).await.is_some())
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, StorageError>> {
        let key = key.to_string();
        Box::pin(async move {
            validate_key(&key)?;
            Ok(self.cache.contains_key(&key))
        })
    }
}
