//! Remote store used when the backend is deliberately disabled.

use crate::model::ArtRecord;
use crate::remote::{RemoteError, RemoteStore};
use crate::storage::BoxFuture;

const OFFLINE_REASON: &str = "offline mode";

/// Remote store that is never reachable.
///
/// Every call fails with `RemoteError::Unavailable`, so the repository
/// always takes its local path.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineRemoteStore;

impl OfflineRemoteStore {
    fn unavailable<T>() -> Result<T, RemoteError> {
        Err(RemoteError::Unavailable(OFFLINE_REASON.to_string()))
    }
}

impl RemoteStore for OfflineRemoteStore {
    fn create<'a>(
        &'a self,
        _record: &'a ArtRecord,
    ) -> BoxFuture<'a, Result<ArtRecord, RemoteError>> {
        Box::pin(async { Self::unavailable() })
    }

    fn list_all(&self) -> BoxFuture<'_, Result<Vec<ArtRecord>, RemoteError>> {
        Box::pin(async { Self::unavailable() })
    }

    fn list_nearby(
        &self,
        _latitude: f64,
        _longitude: f64,
        _distance_m: f64,
    ) -> BoxFuture<'_, Result<Vec<ArtRecord>, RemoteError>> {
        Box::pin(async { Self::unavailable() })
    }

    fn delete_all(&self) -> BoxFuture<'_, Result<(), RemoteError>> {
        Box::pin(async { Self::unavailable() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_store_is_unavailable() {
        let remote = OfflineRemoteStore;
        assert!(matches!(
            remote.list_all().await,
            Err(RemoteError::Unavailable(_))
        ));
        assert!(matches!(
            remote.list_nearby(0.0, 0.0, 20.0).await,
            Err(RemoteError::Unavailable(_))
        ));
        assert!(remote.delete_all().await.is_err());
    }
}
