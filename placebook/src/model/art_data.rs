//! Type-specific art payloads.
//!
//! `artData` is an open JSON object so clients can attach extra keys, but
//! each art type documents the keys it relies on:
//!
//! | art type              | required key | value                       |
//! |-----------------------|--------------|-----------------------------|
//! | `flower`              | none         |                             |
//! | `message`             | `text`       | non-empty string            |
//! | `painting`, `drawing` | `imageData`  | `data:image/...` URI string |
//!
//! [`ArtData::validate`] enforces the table at input boundaries and
//! [`ArtData::payload`] gives a typed view of it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ArtType, ModelError};

/// Key holding the text of a message.
pub const TEXT_KEY: &str = "text";

/// Key holding the image data URI of a painting or drawing.
pub const IMAGE_DATA_KEY: &str = "imageData";

const IMAGE_DATA_URI_PREFIX: &str = "data:image/";

/// Free-form payload attached to an art record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtData(Map<String, Value>);

/// Typed view over [`ArtData`] for a given art type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArtPayload<'a> {
    Flower,
    Message { text: &'a str },
    Image { data_uri: &'a str },
}

impl ArtData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload for a `message` record.
    pub fn message(text: impl Into<String>) -> Self {
        Self::new().with(TEXT_KEY, Value::String(text.into()))
    }

    /// Payload for a `painting` or `drawing` record.
    pub fn image(data_uri: impl Into<String>) -> Self {
        Self::new().with(IMAGE_DATA_KEY, Value::String(data_uri.into()))
    }

    /// Adds or replaces a key.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn text(&self) -> Option<&str> {
        self.0.get(TEXT_KEY).and_then(Value::as_str)
    }

    pub fn image_data(&self) -> Option<&str> {
        self.0.get(IMAGE_DATA_KEY).and_then(Value::as_str)
    }

    /// Checks the documented keys for `art_type`.
    pub fn validate(&self, art_type: ArtType) -> Result<(), ModelError> {
        match art_type {
            ArtType::Flower => Ok(()),
            ArtType::Message => match self.text() {
                Some(text) if !text.trim().is_empty() => Ok(()),
                Some(_) => Err(ModelError::InvalidField {
                    field: TEXT_KEY,
                    reason: "message text is empty".to_string(),
                }),
                None => Err(ModelError::MissingField {
                    art_type,
                    field: TEXT_KEY,
                }),
            },
            ArtType::Painting | ArtType::Drawing => match self.image_data() {
                Some(uri) if uri.starts_with(IMAGE_DATA_URI_PREFIX) => Ok(()),
                Some(_) => Err(ModelError::InvalidField {
                    field: IMAGE_DATA_KEY,
                    reason: format!("expected a '{}' URI", IMAGE_DATA_URI_PREFIX),
                }),
                None => Err(ModelError::MissingField {
                    art_type,
                    field: IMAGE_DATA_KEY,
                }),
            },
        }
    }

    /// Typed view of the payload, or `None` when the documented keys are absent.
    pub fn payload(&self, art_type: ArtType) -> Option<ArtPayload<'_>> {
        match art_type {
            ArtType::Flower => Some(ArtPayload::Flower),
            ArtType::Message => self.text().map(|text| ArtPayload::Message { text }),
            ArtType::Painting | ArtType::Drawing => self
                .image_data()
                .map(|data_uri| ArtPayload::Image { data_uri }),
        }
    }
}
