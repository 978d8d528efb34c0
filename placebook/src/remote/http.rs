//! HTTP client for the art backend.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

use crate::model::ArtRecord;
use crate::remote::{RemoteError, RemoteStore};
use crate::storage::BoxFuture;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest error body echoed into a `Rejected` message.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Real remote store implementation using reqwest.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    /// Creates a store for the API rooted at `base_url`
    /// (e.g. `http://localhost:3000/api`) with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a store with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            RemoteError::Unavailable(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn flowers_url(&self) -> String {
        format!("{}/flowers", self.base_url)
    }

    /// Sends a request and returns the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::Unavailable(format!("Failed to read response: {}", e)))?;

        debug!(status = status.as_u16(), bytes = body.len(), "Backend response");

        if !status.is_success() {
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body.to_vec())
    }

    async fn fetch_list(&self, request: RequestBuilder) -> Result<Vec<ArtRecord>, RemoteError> {
        let body = self.send(request).await?;
        ArtRecord::decode_list(&body).map_err(|e| RemoteError::Malformed(e.to_string()))
    }
}

/// Extracts `{"error": "..."}` from a failure body, or a truncated raw body.
fn error_message(body: &[u8]) -> String {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        return envelope.error;
    }
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        "(empty body)".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}

impl RemoteStore for HttpRemoteStore {
    fn create<'a>(
        &'a self,
        record: &'a ArtRecord,
    ) -> BoxFuture<'a, Result<ArtRecord, RemoteError>> {
        Box::pin(async move {
            let body = self
                .send(self.client.post(self.flowers_url()).json(record))
                .await?;

            let saved: ArtRecord = serde_json::from_slice(&body)
                .map_err(|e| RemoteError::Malformed(e.to_string()))?;
            saved
                .validate()
                .map_err(|e| RemoteError::Malformed(e.to_string()))?;
            Ok(saved)
        })
    }

    fn list_all(&self) -> BoxFuture<'_, Result<Vec<ArtRecord>, RemoteError>> {
        Box::pin(async move { self.fetch_list(self.client.get(self.flowers_url())).await })
    }

    fn list_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        distance_m: f64,
    ) -> BoxFuture<'_, Result<Vec<ArtRecord>, RemoteError>> {
        Box::pin(async move {
            let request = self
                .client
                .get(format!("{}/nearby", self.flowers_url()))
                .query(&[
                    ("lat", latitude.to_string()),
                    ("lng", longitude.to_string()),
                    ("distance", distance_m.to_string()),
                ]);
            self.fetch_list(request).await
        })
    }

    fn delete_all(&self) -> BoxFuture<'_, Result<(), RemoteError>> {
        Box::pin(async move {
            self.send(self.client.delete(self.flowers_url())).await?;
            Ok(())
        })
    }
}
