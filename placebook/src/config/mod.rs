//! User configuration stored in `~/.placebook/config.ini`.
//!
//! ```ini
//! [remote]
//! api_url = https://ar-flowers-server.onrender.com/api
//! local_url = http://localhost:3000/api
//! use_local_server = false
//! timeout_secs = 10
//!
//! [storage]
//! directory = ~/.placebook/data
//!
//! [query]
//! distance_m = 20
//! include_private = true
//!
//! [server]
//! bind = 127.0.0.1:3000
//! data_directory = ~/.placebook/server
//! require_creator = true
//!
//! [logging]
//! level = info
//! directory = ~/.placebook/logs
//! ```
//!
//! Missing files and keys fall back to defaults. Every key is addressable
//! as `section.key` through [`ConfigKey`].

mod file;
mod keys;

pub use file::{
    ConfigFile, LoggingSettings, QuerySettings, RemoteSettings, ServerSettings, StorageSettings,
    DEFAULT_API_URL, DEFAULT_LOCAL_URL,
};
pub use keys::ConfigKey;

use std::path::PathBuf;

use thiserror::Error;

/// Name of the per-user configuration directory.
const CONFIG_DIR_NAME: &str = ".placebook";

/// Errors reading, writing, or editing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// `~/.placebook`, or `./.placebook` when there is no home directory.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR_NAME))
}

/// Path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.ini")
}
