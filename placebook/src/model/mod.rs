//! Art record data model.
//!
//! An [`ArtRecord`] is the unit of persistence: a geotagged flower, message,
//! painting, or drawing. Records are built once by the repository (or the
//! backend server) and never mutated afterwards.
//!
//! # Wire Format
//!
//! Records serialize to camelCase JSON, matching the backend HTTP surface and
//! the local snapshot:
//!
//! ```text
//! {
//!   "id": "flower_1718000000000_k3j9x0abc",
//!   "latitude": 48.8566, "longitude": 2.3522,
//!   "accuracy": 5.0,
//!   "timestamp": "2024-06-10T08:00:00.000Z",
//!   "transform": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
//!   "audience": "public",
//!   "creatorId": "user_1717990000000_a1b2c3d4e",
//!   "artType": "message",
//!   "artData": { "text": "hello" }
//! }
//! ```

mod art_data;
mod id;
mod record;

pub use art_data::{ArtData, ArtPayload, IMAGE_DATA_KEY, TEXT_KEY};
pub use id::generate_id;
pub(crate) use id::random_base36;
pub use record::{
    is_visible, ArtOptions, ArtRecord, ArtType, Audience, Transform, IDENTITY_TRANSFORM,
};

use thiserror::Error;

/// Errors raised while building, validating, or decoding art records.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A type-specific payload key is missing.
    #[error("{art_type} art requires artData.{field}")]
    MissingField {
        art_type: ArtType,
        field: &'static str,
    },

    /// A field is present but holds an unusable value.
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Unknown art type name.
    #[error("Unknown art type '{0}' (expected flower, message, painting or drawing)")]
    UnknownArtType(String),

    /// Unknown audience name.
    #[error("Unknown audience '{0}' (expected public or friends)")]
    UnknownAudience(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
