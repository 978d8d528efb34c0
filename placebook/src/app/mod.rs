//! Application bootstrap.
//!
//! [`PlacebookApp`] wires the collaborators of an [`ArtRepository`]
//! together in one place and hydrates it before handing it out:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     PlacebookApp                     │
//! │                                                      │
//! │  1. KeyValueStore (file or memory)                   │
//! │     ├── IdentityProvider   (placebook_user_id)       │
//! │     └── LocalCache         (gpsFlowers snapshot)     │
//! │                                                      │
//! │  2. RemoteStore (HTTP backend or offline)            │
//! │                                                      │
//! │  3. ArtRepository ── load_all() on start             │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use placebook::app::{AppConfig, PlacebookApp};
//! use placebook::config::ConfigFile;
//!
//! let config = AppConfig::from_config_file(&ConfigFile::load()?);
//! let mut app = PlacebookApp::start(config).await?;
//! let query = app.config().query;
//! let nearby = app.repository_mut().get_nearby_art(&position, query).await;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::PlacebookApp;
pub use config::{AppConfig, RemoteMode, StorageBackend};
pub use error::AppError;
