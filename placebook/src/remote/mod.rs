//! Remote art store abstraction
//!
//! This module provides the client side of the backend HTTP contract:
//! create, list, nearby query, and delete-all over `/api/flowers`.
//!
//! Callers only distinguish success from failure; the [`RemoteError`]
//! variants exist for logging and failure reports.
//!
//! ```ignore
//! use placebook::remote::{HttpRemoteStore, RemoteStore};
//!
//! let remote = HttpRemoteStore::new("http://localhost:3000/api")?;
//! let records = remote.list_nearby(48.85, 2.35, 20.0).await?;
//! ```

mod http;
mod offline;

pub use http::{HttpRemoteStore, DEFAULT_TIMEOUT};
pub use offline::OfflineRemoteStore;

use thiserror::Error;

use crate::model::ArtRecord;
use crate::storage::BoxFuture;

/// Failure talking to the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    /// Transport failure: connection refused, DNS, timeout, TLS.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with a non-2xx status.
    #[error("Backend rejected request with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered 2xx with a body that could not be decoded.
    #[error("Malformed backend response: {0}")]
    Malformed(String),
}

/// Trait for the authoritative art store.
///
/// This abstraction allows for dependency injection and easier testing by
/// enabling mock or offline stores.
pub trait RemoteStore: Send + Sync {
    /// `POST /flowers`: stores a record and returns the server's copy,
    /// which may normalize fields such as `id`.
    fn create<'a>(&'a self, record: &'a ArtRecord)
        -> BoxFuture<'a, Result<ArtRecord, RemoteError>>;

    /// `GET /flowers`: the full collection.
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<ArtRecord>, RemoteError>>;

    /// `GET /flowers/nearby`: records within `distance_m` meters of the point.
    fn list_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        distance_m: f64,
    ) -> BoxFuture<'_, Result<Vec<ArtRecord>, RemoteError>>;

    /// `DELETE /flowers`: removes the entire collection.
    fn delete_all(&self) -> BoxFuture<'_, Result<(), RemoteError>>;
}

#[cfg(test)]
pub use tests::MockRemoteStore;

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::geo::distance_meters;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-process backend with an on/off switch.
    ///
    /// While online it behaves like the real server: nearby queries filter by
    /// radius only and created records get a server-assigned id.
    pub struct MockRemoteStore {
        records: Mutex<Vec<ArtRecord>>,
        online: AtomicBool,
        failure: Mutex<RemoteError>,
        next_id: AtomicUsize,
        pub calls: AtomicUsize,
    }

    impl MockRemoteStore {
        pub fn online() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                online: AtomicBool::new(true),
                failure: Mutex::new(RemoteError::Unavailable("connection refused".to_string())),
                next_id: AtomicUsize::new(1),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn offline() -> Self {
            let store = Self::online();
            store.set_online(false);
            store
        }

        /// Fails every call with `error` until switched back online.
        pub fn failing_with(error: RemoteError) -> Self {
            let store = Self::offline();
            *store.failure.lock() = error;
            store
        }

        pub fn set_online(&self, online: bool) {
            self.online.store(online, Ordering::SeqCst);
        }

        pub fn seed(&self, records: Vec<ArtRecord>) {
            self.records.lock().extend(records);
        }

        pub fn stored(&self) -> Vec<ArtRecord> {
            self.records.lock().clone()
        }

        fn check(&self) -> Result<(), RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.online.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(self.failure.lock().clone())
            }
        }
    }

    impl RemoteStore for MockRemoteStore {
        fn create<'a>(
            &'a self,
            record: &'a ArtRecord,
        ) -> BoxFuture<'a, Result<ArtRecord, RemoteError>> {
            Box::pin(async move {
                self.check()?;
                let mut saved = record.clone();
                saved.id = format!("srv_{}", self.next_id.fetch_add(1, Ordering::SeqCst));
                self.records.lock().push(saved.clone());
                Ok(saved)
            })
        }

        fn list_all(&self) -> BoxFuture<'_, Result<Vec<ArtRecord>, RemoteError>> {
            Box::pin(async move {
                self.check()?;
                Ok(self.stored())
            })
        }

        fn list_nearby(
            &self,
            latitude: f64,
            longitude: f64,
            distance_m: f64,
        ) -> BoxFuture<'_, Result<Vec<ArtRecord>, RemoteError>> {
            Box::pin(async move {
                self.check()?;
                Ok(self
                    .stored()
                    .into_iter()
                    .filter(|r| {
                        distance_meters(latitude, longitude, r.latitude, r.longitude)
                            <= distance_m
                    })
                    .collect())
            })
        }

        fn delete_all(&self) -> BoxFuture<'_, Result<(), RemoteError>> {
            Box::pin(async move {
                self.check()?;
                self.records.lock().clear();
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn test_mock_offline_fails_every_call() {
        let remote = MockRemoteStore::offline();
        assert!(remote.list_all().await.is_err());
        assert!(remote.delete_all().await.is_err());
        assert_eq!(remote.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::Rejected {
            status: 400,
            message: "Missing required flower data".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("Missing required flower data"));
    }
}
