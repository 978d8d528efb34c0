//! Typed configuration sections and INI persistence.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use super::{config_dir, config_file_path, ConfigError, ConfigKey};
use crate::remote::DEFAULT_TIMEOUT;
use crate::repository::DEFAULT_NEARBY_DISTANCE_M;

/// Hosted backend.
pub const DEFAULT_API_URL: &str = "https://ar-flowers-server.onrender.com/api";

/// Backend started with `placebook serve`.
pub const DEFAULT_LOCAL_URL: &str = "http://localhost:3000/api";

/// Backend selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSettings {
    pub api_url: String,
    pub local_url: String,
    /// Use `local_url` instead of `api_url`.
    pub use_local_server: bool,
    pub timeout_secs: u64,
}

impl RemoteSettings {
    /// The URL the client should talk to.
    pub fn effective_url(&self) -> &str {
        if self.use_local_server {
            &self.local_url
        } else {
            &self.api_url
        }
    }
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            local_url: DEFAULT_LOCAL_URL.to_string(),
            use_local_server: false,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Where the client keeps its identity and snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    pub directory: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            directory: config_dir().join("data"),
        }
    }
}

/// Defaults for nearby queries.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySettings {
    pub distance_m: f64,
    pub include_private: bool,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            distance_m: DEFAULT_NEARBY_DISTANCE_M,
            include_private: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    pub data_directory: PathBuf,
    pub require_creator: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_directory: config_dir().join("server"),
            require_creator: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Directory for daily log files; `None` logs to stderr only.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: Some(config_dir().join("logs")),
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub remote: RemoteSettings,
    pub storage: StorageSettings,
    pub query: QuerySettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location; defaults when the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Apply every known key present in `ini` over the defaults.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Write to the default location, creating `~/.placebook` if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }
}
