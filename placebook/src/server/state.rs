//! Shared server state: the art collection and its persistence.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::geo::distance_meters;
use crate::model::ArtRecord;
use crate::storage::{KeyValueStore, StorageError};

/// Key under which the server persists its collection.
pub const COLLECTION_KEY: &str = "flowers";

/// The collection served by the backend.
pub struct ServerState {
    records: RwLock<Vec<ArtRecord>>,
    /// Orders collection writes; readers never wait on it.
    write_gate: Mutex<()>,
    store: Arc<dyn KeyValueStore>,
    require_creator: bool,
}

impl ServerState {
    /// Load the persisted collection from `store`.
    ///
    /// A missing key starts empty. Content that does not decode is logged
    /// and replaced on the next write.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        require_creator: bool,
    ) -> Result<Self, StorageError> {
        let records = match store.get(COLLECTION_KEY).await? {
            Some(bytes) => match ArtRecord::decode_list(&bytes) {
                Ok(records) => {
                    info!(count = records.len(), "Loaded art collection");
                    records
                }
                Err(e) => {
                    error!(error = %e, "Stored art collection is unreadable, starting empty");
                    Vec::new()
                }
            },
            None => {
                info!("No stored art collection, starting empty");
                Vec::new()
            }
        };

        Ok(Self {
            records: RwLock::new(records),
            write_gate: Mutex::new(()),
            store,
            require_creator,
        })
    }

    pub fn require_creator(&self) -> bool {
        self.require_creator
    }

    pub async fn all(&self) -> Vec<ArtRecord> {
        self.records.read().await.clone()
    }

    /// Records within `distance_m` meters of the point. No audience filtering.
    pub async fn nearby(&self, latitude: f64, longitude: f64, distance_m: f64) -> Vec<ArtRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| distance_meters(latitude, longitude, r.latitude, r.longitude) <= distance_m)
            .cloned()
            .collect()
    }

    pub async fn insert(&self, record: ArtRecord) {
        let _gate = self.write_gate.lock().await;
        let encoded = {
            let mut records = self.records.write().await;
            records.push(record);
            encode(&records)
        };
        self.persist(encoded).await;
    }

    pub async fn clear(&self) {
        let _gate = self.write_gate.lock().await;
        let encoded = {
            let mut records = self.records.write().await;
            records.clear();
            encode(&records)
        };
        self.persist(encoded).await;
    }

    /// Write an encoded snapshot back; memory stays authoritative on failure.
    ///
    /// Called with the write gate held and the records lock released.
    async fn persist(&self, encoded: Option<(Vec<u8>, usize)>) {
        let Some((bytes, count)) = encoded else {
            return;
        };
        match self.store.set(COLLECTION_KEY, bytes).await {
            Ok(()) => info!(count, "Saved art collection"),
            Err(e) => warn!(error = %e, "Failed to save art collection"),
        }
    }
}

fn encode(records: &[ArtRecord]) -> Option<(Vec<u8>, usize)> {
    match serde_json::to_vec(records) {
        Ok(bytes) => Some((bytes, records.len())),
        Err(e) => {
            error!(error = %e, "Failed to encode art collection");
            None
        }
    }
}
