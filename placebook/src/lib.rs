//! Placebook - geotagged art that works offline
//!
//! This library stores art records (flowers, messages, paintings, drawings)
//! pinned to GPS coordinates. A remote backend is authoritative when it is
//! reachable; otherwise every operation falls back to a local snapshot, so
//! saving and browsing never fail from the caller's point of view.
//!
//! The entry point is [`app::PlacebookApp`], which builds an
//! [`repository::ArtRepository`] from configuration. The `server` feature
//! (on by default) adds the HTTP backend the client talks to.

pub mod app;
pub mod cache;
pub mod config;
pub mod geo;
pub mod geolocation;
pub mod identity;
pub mod logging;
pub mod model;
pub mod remote;
pub mod repository;
#[cfg(feature = "server")]
pub mod server;
pub mod storage;
