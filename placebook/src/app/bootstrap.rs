//! Application bootstrap implementation.

use std::sync::Arc;

use tracing::info;

use super::config::{AppConfig, RemoteMode, StorageBackend};
use super::error::AppError;
use crate::cache::LocalCache;
use crate::identity::IdentityProvider;
use crate::remote::{HttpRemoteStore, OfflineRemoteStore, RemoteStore};
use crate::repository::ArtRepository;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// A hydrated art repository plus the settings it was built from.
pub struct PlacebookApp {
    repository: ArtRepository,
    config: AppConfig,
}

impl PlacebookApp {
    /// Build every collaborator and run the initial `load_all`.
    ///
    /// # Errors
    ///
    /// Only setup failures are reported. An unreachable backend is not an
    /// error: the repository hydrates from the local snapshot instead.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        let store: Arc<dyn KeyValueStore> = match &config.storage {
            StorageBackend::File(directory) => {
                info!(directory = %directory.display(), "Using file storage");
                Arc::new(FileStore::new(directory.clone()))
            }
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };

        let remote: Arc<dyn RemoteStore> = match &config.remote {
            RemoteMode::Http { url, timeout } => {
                if url.trim().is_empty() {
                    return Err(AppError::Config("backend URL is empty".to_string()));
                }
                info!(url = %url, "Using backend");
                Arc::new(HttpRemoteStore::with_timeout(url.clone(), *timeout)?)
            }
            RemoteMode::Offline => {
                info!("Offline mode, backend disabled");
                Arc::new(OfflineRemoteStore)
            }
        };

        let mut repository = ArtRepository::new(
            remote,
            LocalCache::new(store.clone()),
            IdentityProvider::new(store),
        );

        let loaded = repository.load_all().await;
        info!(count = loaded.len(), "Art repository ready");

        Ok(Self { repository, config })
    }

    pub fn repository(&self) -> &ArtRepository {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut ArtRepository {
        &mut self.repository
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
