//! The `ArtRecord` type and its enums.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{generate_id, ArtData, ModelError};
use crate::geo::{Position, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Flattened 4×4 placement matrix, opaque to the store.
pub type Transform = [f64; 16];

/// Identity placement, used when a record carries no transform.
pub const IDENTITY_TRANSFORM: Transform = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

fn identity_transform() -> Transform {
    IDENTITY_TRANSFORM
}

/// Visibility scope of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    Public,
    Friends,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Public => "public",
            Audience::Friends => "friends",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Audience::Public),
            "friends" => Ok(Audience::Friends),
            _ => Err(ModelError::UnknownAudience(s.to_string())),
        }
    }
}

/// Kind of art placed at a location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtType {
    #[default]
    Flower,
    Message,
    Painting,
    Drawing,
}

impl ArtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtType::Flower => "flower",
            ArtType::Message => "message",
            ArtType::Painting => "painting",
            ArtType::Drawing => "drawing",
        }
    }
}

impl fmt::Display for ArtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flower" => Ok(ArtType::Flower),
            "message" => Ok(ArtType::Message),
            "painting" => Ok(ArtType::Painting),
            "drawing" => Ok(ArtType::Drawing),
            _ => Err(ModelError::UnknownArtType(s.to_string())),
        }
    }
}

/// Optional settings for a new record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtOptions {
    pub audience: Audience,
    pub art_type: ArtType,
    pub art_data: ArtData,
}

impl ArtOptions {
    pub fn new(art_type: ArtType) -> Self {
        Self {
            art_type,
            ..Default::default()
        }
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_data(mut self, art_data: ArtData) -> Self {
        self.art_data = art_data;
        self
    }
}

/// A geotagged art object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtRecord {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "matrix", default = "identity_transform")]
    pub transform: Transform,
    #[serde(default)]
    pub audience: Audience,
    pub creator_id: String,
    #[serde(default)]
    pub art_type: ArtType,
    #[serde(default)]
    pub art_data: ArtData,
}

impl ArtRecord {
    /// Builds a new record at `position` with a freshly generated id and
    /// the current time.
    pub fn new(
        position: &Position,
        transform: Transform,
        creator_id: impl Into<String>,
        options: ArtOptions,
    ) -> Self {
        Self {
            id: generate_id(options.art_type.as_str()),
            latitude: position.latitude(),
            longitude: position.longitude(),
            accuracy: position.accuracy(),
            altitude: position.altitude(),
            timestamp: Utc::now(),
            transform,
            audience: options.audience,
            creator_id: creator_id.into(),
            art_type: options.art_type,
            art_data: options.art_data,
        }
    }

    /// Checks the record invariants: a non-empty id and creator, and finite
    /// in-range coordinates.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.id.trim().is_empty() {
            return Err(ModelError::InvalidField {
                field: "id",
                reason: "must not be empty".to_string(),
            });
        }
        if !self.latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&self.latitude) {
            return Err(ModelError::InvalidField {
                field: "latitude",
                reason: format!("{} is not a valid latitude", self.latitude),
            });
        }
        if !self.longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&self.longitude) {
            return Err(ModelError::InvalidField {
                field: "longitude",
                reason: format!("{} is not a valid longitude", self.longitude),
            });
        }
        if self.creator_id.trim().is_empty() {
            return Err(ModelError::InvalidField {
                field: "creatorId",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Distance from this record to `position` in meters.
    pub fn distance_to(&self, position: &Position) -> f64 {
        crate::geo::distance_meters(
            position.latitude(),
            position.longitude(),
            self.latitude,
            self.longitude,
        )
    }

    /// Decodes a JSON array of records.
    ///
    /// The body must be a JSON array. Elements that fail to decode or violate
    /// the record invariants are dropped with a warning rather than failing
    /// the whole list.
    pub fn decode_list(bytes: &[u8]) -> Result<Vec<ArtRecord>, ModelError> {
        let items: Vec<Value> = serde_json::from_slice(bytes)?;
        let total = items.len();

        let records: Vec<ArtRecord> = items
            .into_iter()
            .filter_map(|item| {
                let record = match serde_json::from_value::<ArtRecord>(item) {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(error = %e, "Dropping undecodable art record");
                        return None;
                    }
                };
                match record.validate() {
                    Ok(()) => Some(record),
                    Err(e) => {
                        warn!(error = %e, id = %record.id, "Dropping invalid art record");
                        None
                    }
                }
            })
            .collect();

        if records.len() != total {
            warn!(
                kept = records.len(),
                dropped = total - records.len(),
                "Art record list contained invalid entries"
            );
        }

        Ok(records)
    }
}

/// Audience rule shared by every query path.
///
/// A record is visible when private records are requested, when it is
/// public, or when the viewer created it.
pub fn is_visible(record: &ArtRecord, include_private: bool, current_user_id: &str) -> bool {
    include_private || record.audience == Audience::Public || record.creator_id == current_user_id
}
