//! Offline-first art repository.
//!
//! The repository composes the identity provider, local snapshot cache and
//! remote store into four operations that never fail to their caller:
//!
//! | operation        | remote path                         | fallback path                     |
//! |------------------|-------------------------------------|-----------------------------------|
//! | `save_art`       | POST, keep server copy              | merge into snapshot               |
//! | `get_nearby_art` | nearby query, replace list          | Haversine over in-memory list     |
//! | `load_all`       | full fetch, write-through snapshot  | hydrate list from snapshot        |
//! | `clear_all`      | best-effort DELETE                  | always clears list and snapshot   |
//!
//! Every remote and local step yields a [`StoreOutcome`], and each fallback
//! is a match arm on it. Absorbed failures are logged and broadcast as
//! [`FailureReport`]s to [`ArtRepository::subscribe_failures`] subscribers.
//!
//! # Concurrency
//!
//! Operations take `&mut self`: one operation runs at a time per repository,
//! because neither the in-memory list nor the snapshot is versioned.

mod outcome;

pub use outcome::{FailureKind, FailureReport, Operation, StoreOutcome};

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::cache::{LocalCache, LocalStoreError};
use crate::geo::Position;
use crate::identity::IdentityProvider;
use crate::model::{is_visible, ArtOptions, ArtRecord, Transform};
use crate::remote::RemoteStore;

/// Default nearby radius in meters.
pub const DEFAULT_NEARBY_DISTANCE_M: f64 = 20.0;

/// Buffered failure reports per subscriber before the oldest are dropped.
const FAILURE_CHANNEL_CAPACITY: usize = 64;

/// Parameters of a nearby query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    /// Radius in meters; records at exactly this distance are included.
    pub distance_m: f64,
    /// When false, only public records and the viewer's own are returned.
    pub include_private: bool,
}

impl Default for NearbyQuery {
    fn default() -> Self {
        Self {
            distance_m: DEFAULT_NEARBY_DISTANCE_M,
            include_private: true,
        }
    }
}

impl NearbyQuery {
    pub fn within(distance_m: f64) -> Self {
        Self {
            distance_m,
            ..Default::default()
        }
    }

    pub fn public_only(mut self) -> Self {
        self.include_private = false;
        self
    }

    pub fn with_private(mut self, include_private: bool) -> Self {
        self.include_private = include_private;
        self
    }
}

/// Art store with remote-first, local-fallback semantics.
pub struct ArtRepository {
    remote: Arc<dyn RemoteStore>,
    cache: LocalCache,
    identity: IdentityProvider,
    /// In-memory working set, replaced by remote reads.
    records: Vec<ArtRecord>,
    failures: broadcast::Sender<FailureReport>,
}

impl ArtRepository {
    /// Create a repository with an empty working set.
    ///
    /// Call [`load_all`](Self::load_all) to hydrate it.
    pub fn new(remote: Arc<dyn RemoteStore>, cache: LocalCache, identity: IdentityProvider) -> Self {
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        Self {
            remote,
            cache,
            identity,
            records: Vec::new(),
            failures,
        }
    }

    /// Subscribe to reports of failures absorbed by this repository.
    pub fn subscribe_failures(&self) -> broadcast::Receiver<FailureReport> {
        self.failures.subscribe()
    }

    /// The in-memory working set.
    pub fn records(&self) -> &[ArtRecord] {
        &self.records
    }

    /// The identity used as `creatorId` and for audience filtering.
    pub async fn current_user_id(&self) -> String {
        self.identity.get_or_create_user_id().await
    }

    /// Save a new art record at `position`.
    ///
    /// Returns the server's copy when the backend accepts it, otherwise the
    /// locally built record after merging it into the snapshot.
    pub async fn save_art(
        &mut self,
        position: &Position,
        transform: Transform,
        options: ArtOptions,
    ) -> ArtRecord {
        let creator_id = self.identity.get_or_create_user_id().await;
        let record = ArtRecord::new(position, transform, creator_id, options);

        match StoreOutcome::from_remote(self.remote.create(&record).await) {
            StoreOutcome::Ok(saved) => {
                info!(
                    id = %saved.id,
                    art_type = %saved.art_type,
                    lat = saved.latitude,
                    lng = saved.longitude,
                    "Saved art to backend"
                );
                self.records.push(saved.clone());
                saved
            }
            failed => {
                self.report(Operation::SaveArt, &failed);
                self.append_to_snapshot(&record).await;
                self.records.push(record.clone());
                info!(id = %record.id, art_type = %record.art_type, "Saved art locally");
                record
            }
        }
    }

    /// Records near `position`, filtered by the audience rule.
    pub async fn get_nearby_art(&mut self, position: &Position, query: NearbyQuery) -> Vec<ArtRecord> {
        let user_id = self.identity.get_or_create_user_id().await;

        let outcome = StoreOutcome::from_remote(
            self.remote
                .list_nearby(position.latitude(), position.longitude(), query.distance_m)
                .await,
        );

        match outcome {
            StoreOutcome::Ok(nearby) => {
                self.records = nearby;
                let visible: Vec<ArtRecord> = self
                    .records
                    .iter()
                    .filter(|r| is_visible(r, query.include_private, &user_id))
                    .cloned()
                    .collect();
                info!(
                    loaded = self.records.len(),
                    visible = visible.len(),
                    "Loaded nearby art from backend"
                );
                visible
            }
            failed => {
                self.report(Operation::GetNearbyArt, &failed);
                let visible: Vec<ArtRecord> = self
                    .records
                    .iter()
                    .filter(|r| {
                        let distance = r.distance_to(position);
                        debug!(id = %r.id, distance_m = distance, "Local distance check");
                        distance <= query.distance_m
                            && is_visible(r, query.include_private, &user_id)
                    })
                    .cloned()
                    .collect();
                info!(
                    scanned = self.records.len(),
                    visible = visible.len(),
                    "Computed nearby art locally"
                );
                visible
            }
        }
    }

    /// Hydrate the working set, preferring the backend.
    ///
    /// A successful remote read replaces the snapshot wholesale. Without the
    /// backend the snapshot is loaded; an empty or unreadable snapshot yields
    /// an empty working set.
    pub async fn load_all(&mut self) -> Vec<ArtRecord> {
        match StoreOutcome::from_remote(self.remote.list_all().await) {
            StoreOutcome::Ok(all) => {
                self.records = all;
                info!(count = self.records.len(), "Loaded art from backend");

                let backup = StoreOutcome::from_local(self.cache.write_snapshot(&self.records).await);
                self.report(Operation::LoadAll, &backup);
            }
            failed => {
                self.report(Operation::LoadAll, &failed);

                match StoreOutcome::from_local(self.cache.read_snapshot().await) {
                    StoreOutcome::Ok(Some(snapshot)) => {
                        info!(count = snapshot.len(), "Loaded art from local snapshot");
                        self.records = snapshot;
                    }
                    StoreOutcome::Ok(None) => {
                        debug!("No local snapshot");
                        self.records.clear();
                    }
                    unreadable => {
                        self.report(Operation::LoadAll, &unreadable);
                        self.records.clear();
                    }
                }
            }
        }

        self.records.clone()
    }

    /// Clear local state unconditionally and the backend best-effort.
    pub async fn clear_all(&mut self) {
        let remote = StoreOutcome::from_remote(self.remote.delete_all().await);
        if remote.is_ok() {
            info!("Cleared art on backend");
        } else {
            self.report(Operation::ClearAll, &remote);
        }

        self.records.clear();
        let local = StoreOutcome::from_local(self.cache.clear().await);
        self.report(Operation::ClearAll, &local);
        info!("Cleared local art");
    }

    /// Merge `record` into the snapshot: read, append, write back.
    ///
    /// A corrupt snapshot is replaced; a store that cannot be read is left
    /// alone so cached records are not overwritten.
    async fn append_to_snapshot(&self, record: &ArtRecord) {
        let mut snapshot = match StoreOutcome::from_local(self.cache.read_snapshot().await) {
            StoreOutcome::Ok(existing) => existing.unwrap_or_default(),
            StoreOutcome::LocalFailed(LocalStoreError::Corrupt(e)) => {
                warn!(error = %e, "Replacing unreadable local snapshot");
                Vec::new()
            }
            failed => {
                self.report(Operation::SaveArt, &failed);
                return;
            }
        };

        snapshot.push(record.clone());
        let written = StoreOutcome::from_local(self.cache.write_snapshot(&snapshot).await);
        self.report(Operation::SaveArt, &written);
    }

    /// Log and broadcast a failed outcome; no-op for `Ok`.
    fn report<T>(&self, operation: Operation, outcome: &StoreOutcome<T>) {
        let (Some(kind), Some(detail)) = (outcome.failure_kind(), outcome.failure_detail()) else {
            return;
        };

        if kind.is_remote() {
            warn!(%operation, ?kind, error = %detail, "Backend call failed, using local data");
        } else {
            warn!(%operation, ?kind, error = %detail, "Local storage failed");
        }

        // No subscribers is fine
        let _ = self.failures.send(FailureReport {
            operation,
            kind,
            detail,
        });
    }
}
