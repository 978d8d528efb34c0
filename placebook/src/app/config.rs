//! Application configuration for `PlacebookApp`.
//!
//! `AppConfig` is what the bootstrap needs; it is usually derived from the
//! user's `ConfigFile` with command-line overrides applied on top.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConfigFile;
use crate::repository::NearbyQuery;

/// Which backend the repository talks to.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteMode {
    /// HTTP backend rooted at `url` (e.g. `http://localhost:3000/api`).
    Http { url: String, timeout: Duration },
    /// No backend; every operation takes the local path.
    Offline,
}

/// Where identity and snapshot are persisted.
#[derive(Clone, Debug, PartialEq)]
pub enum StorageBackend {
    /// One file per key under this directory.
    File(PathBuf),
    /// Process memory; nothing survives a restart.
    Memory,
}

/// Settings consumed by `PlacebookApp::start()`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub remote: RemoteMode,
    pub storage: StorageBackend,
    /// Default parameters for nearby queries.
    pub query: NearbyQuery,
}

impl AppConfig {
    pub fn new(remote: RemoteMode, storage: StorageBackend) -> Self {
        Self {
            remote,
            storage,
            query: NearbyQuery::default(),
        }
    }

    /// Translate the user's configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            remote: RemoteMode::Http {
                url: config.remote.effective_url().to_string(),
                timeout: Duration::from_secs(config.remote.timeout_secs),
            },
            storage: StorageBackend::File(config.storage.directory.clone()),
            query: NearbyQuery::within(config.query.distance_m)
                .with_private(config.query.include_private),
        }
    }

    /// Disable the backend.
    pub fn offline(mut self) -> Self {
        self.remote = RemoteMode::Offline;
        self
    }

    /// Point at a different backend, keeping the configured timeout.
    ///
    /// Has no effect in offline mode.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        if let RemoteMode::Http { url: current, .. } = &mut self.remote {
            *current = url.into();
        }
        self
    }

    pub fn with_query(mut self, query: NearbyQuery) -> Self {
        self.query = query;
        self
    }

    pub fn is_offline(&self) -> bool {
        self.remote == RemoteMode::Offline
    }
}
