//! Per-device user identity.
//!
//! The identity is a single opaque token, `user_{unixMillis}_{base36}`,
//! created on first use and persisted indefinitely. It is never rotated.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::model::generate_id;
use crate::storage::KeyValueStore;

/// Storage key holding the identity string.
pub const USER_ID_KEY: &str = "placebook_user_id";

const USER_ID_PREFIX: &str = "user";

/// Produces and persists the stable per-device user identifier.
pub struct IdentityProvider {
    store: Arc<dyn KeyValueStore>,
    user_id: OnceCell<String>,
}

impl IdentityProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            user_id: OnceCell::new(),
        }
    }

    /// Returns the persisted user id, creating and persisting one if absent.
    ///
    /// The first successful call memoizes the value. If the store cannot be
    /// read or written, a freshly generated id is still returned and kept for
    /// the lifetime of this provider, so a session never changes identity.
    pub async fn get_or_create_user_id(&self) -> String {
        self.user_id
            .get_or_init(|| self.load_or_create())
            .await
            .clone()
    }

    async fn load_or_create(&self) -> String {
        match self.store.get(USER_ID_KEY).await {
            Ok(Some(bytes)) => match String::from_utf8(bytes) {
                Ok(id) if !id.trim().is_empty() => return id.trim().to_string(),
                _ => warn!(key = USER_ID_KEY, "Stored user id is unreadable, replacing it"),
            },
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, key = USER_ID_KEY, "Failed to read user id");
            }
        }

        let id = generate_id(USER_ID_PREFIX);
        match self.store.set(USER_ID_KEY, id.clone().into_bytes()).await {
            Ok(()) => info!(user_id = %id, "Created new user id"),
            Err(e) => warn!(
                error = %e,
                user_id = %id,
                "Failed to persist user id, using it for this session only"
            ),
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailingStore, MemoryStore};

    #[tokio::test]
    async fn test_creates_and_persists_id() {
        let store = Arc::new(MemoryStore::new());
        let provider = IdentityProvider::new(store.clone());

        let id = provider.get_or_create_user_id().await;
        assert!(id.starts_with("user_"));
        assert_eq!(id.split('_').count(), 3);

        let stored = store.get(USER_ID_KEY).await.unwrap().unwrap();
        assert_eq!(String::from_utf8(stored).unwrap(), id);
    }

    #[tokio::test]
    async fn test_idempotent_within_store_scope() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let first = IdentityProvider::new(store.clone())
            .get_or_create_user_id()
            .await;
        let provider = IdentityProvider::new(store);
        assert_eq!(provider.get_or_create_user_id().await, first);
        assert_eq!(provider.get_or_create_user_id().await, first);
    }

    #[tokio::test]
    async fn test_reads_existing_id() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(USER_ID_KEY, b"user_42_abcdefghi".to_vec())
            .await
            .unwrap();

        let provider = IdentityProvider::new(store);
        assert_eq!(provider.get_or_create_user_id().await, "user_42_abcdefghi");
    }

    #[tokio::test]
    async fn test_storage_failure_still_stable_in_session() {
        let provider = IdentityProvider::new(Arc::new(FailingStore));

        let first = provider.get_or_create_user_id().await;
        assert!(first.starts_with("user_"));
        assert_eq!(provider.get_or_create_user_id().await, first);
    }
}
