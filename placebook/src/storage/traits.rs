//! Core traits for durable key-value storage.
//!
//! The `KeyValueStore` trait is the persistence collaborator behind the
//! local art snapshot, the device identity, and the backend server's
//! collection. Providers implement it for memory or disk.
//!
//! # Design Principles
//!
//! - **String keys**: Human-readable, restricted to `[A-Za-z0-9_.-]`
//! - **Vec<u8> values**: Raw bytes, callers own serialization
//! - **Whole-value writes**: `set` replaces the value atomically
//! - **Dyn-compatible**: Uses `Pin<Box<dyn Future>>` for trait object support
//!
//! # Example
//!
//! ```ignore
//! use placebook::storage::{FileStore, KeyValueStore};
//!
//! let store = FileStore::new("/home/me/.placebook/data");
//! store.set("placebook_user_id", b"user_1".to_vec()).await?;
//! let value = store.get("placebook_user_id").await?;
//! ```

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Maximum key length accepted by providers.
pub const MAX_KEY_LEN: usize = 128;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during storage operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key is empty, too long, or contains unsupported characters.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Value exceeds the provider's quota.
    #[error("Storage quota exceeded: {size} bytes (max: {max})")]
    QuotaExceeded { size: usize, max: usize },

    /// Provider-specific error.
    #[error("Provider error: {0}")]
    Provider(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Checks that a key is usable by every provider.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Durable key-value storage.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` for use across async tasks.
pub trait KeyValueStore: Send + Sync {
    /// Store a value, replacing any existing value for the key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key is invalid, I/O fails, or the
    /// value exceeds a quota.
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), StorageError>>;

    /// Retrieve a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))` if the key exists
    /// - `Ok(None)` if the key is not found
    /// - `Err(_)` if an error occurs
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StorageError>>;

    /// Delete a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the key existed and was deleted
    /// - `Ok(false)` if the key did not exist
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StorageError>>;

    /// Check if a key exists without retrieving the value.
    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, StorageError>>;
}
