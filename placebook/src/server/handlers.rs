//! HTTP handlers for `/api/flowers`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::state::ServerState;
use crate::model::{generate_id, ArtRecord, ArtType};
use crate::repository::DEFAULT_NEARBY_DISTANCE_M;

const MISSING_DATA: &str = "Missing required flower data";
const MISSING_COORDS: &str = "Missing latitude or longitude";
const MISSING_CREATOR: &str = "Missing creatorId";

fn bad_request(message: impl Into<String>) -> Response {
    let message = message.into();
    debug!(%message, "Rejecting request");
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn list_all(State(state): State<Arc<ServerState>>) -> Json<Vec<ArtRecord>> {
    Json(state.all().await)
}

/// Store a record, assigning `id` and `timestamp` when absent.
pub async fn create(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> Response {
    let Value::Object(mut fields) = body else {
        return bad_request(MISSING_DATA);
    };

    let has_coordinate = |name: &str| {
        fields
            .get(name)
            .and_then(Value::as_f64)
            .is_some_and(f64::is_finite)
    };
    if !has_coordinate("latitude") || !has_coordinate("longitude") {
        return bad_request(MISSING_DATA);
    }

    let has_creator = fields
        .get("creatorId")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    if !has_creator {
        if state.require_creator() {
            return bad_request(MISSING_CREATOR);
        }
        fields.insert("creatorId".to_string(), Value::from("anonymous"));
    }

    let missing_id = fields
        .get("id")
        .and_then(Value::as_str)
        .map_or(true, str::is_empty);
    if missing_id {
        let prefix = fields
            .get("artType")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<ArtType>().ok())
            .unwrap_or_default();
        fields.insert("id".to_string(), Value::from(generate_id(prefix.as_str())));
    }
    if fields.get("timestamp").map_or(true, Value::is_null) {
        fields.insert("timestamp".to_string(), Value::from(Utc::now().to_rfc3339()));
    }

    let record: ArtRecord = match serde_json::from_value(Value::Object(fields)) {
        Ok(record) => record,
        Err(e) => return bad_request(format!("Invalid flower data: {}", e)),
    };
    // artData is stored as sent; its per-type keys are checked where art is made
    if let Err(e) = record.validate() {
        return bad_request(format!("Invalid flower data: {}", e));
    }

    info!(id = %record.id, art_type = %record.art_type, "Stored art");
    state.insert(record.clone()).await;
    (StatusCode::CREATED, Json(record)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    lat: Option<String>,
    lng: Option<String>,
    distance: Option<String>,
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

pub async fn nearby(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<NearbyParams>,
) -> Response {
    let (Some(lat), Some(lng)) = (
        parse_number(params.lat.as_deref()),
        parse_number(params.lng.as_deref()),
    ) else {
        return bad_request(MISSING_COORDS);
    };

    let distance = match params.distance.as_deref() {
        None => DEFAULT_NEARBY_DISTANCE_M,
        Some(raw) => match parse_number(Some(raw)) {
            Some(d) if d >= 0.0 => d,
            _ => return bad_request("Invalid distance"),
        },
    };

    let records = state.nearby(lat, lng, distance).await;
    debug!(lat, lng, distance, count = records.len(), "Nearby query");
    Json(records).into_response()
}

pub async fn delete_all(State(state): State<Arc<ServerState>>) -> Json<Value> {
    state.clear().await;
    info!("Deleted all art");
    Json(json!({ "message": "All flowers deleted" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    async fn state(require_creator: bool) -> Arc<ServerState> {
        Arc::new(
            ServerState::load(Arc::new(MemoryStore::new()), require_creator)
                .await
                .unwrap(),
        )
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let state = state(true).await;
        let body = json!({
            "latitude": 48.85,
            "longitude": 2.35,
            "creatorId": "u1",
            "artType": "message",
            "artData": { "text": "hi" }
        });

        let response = create(State(state.clone()), Json(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let stored = body_json(response).await;
        assert!(stored["id"].as_str().unwrap().starts_with("message_"));
        assert!(stored["timestamp"].is_string());
        assert_eq!(state.all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_keeps_client_id() {
        let state = state(true).await;
        let body = json!({
            "id": "flower_1_abc",
            "latitude": 1.0,
            "longitude": 2.0,
            "creatorId": "u1"
        });

        let stored = body_json(create(State(state), Json(body)).await).await;
        assert_eq!(stored["id"], "flower_1_abc");
    }

    #[tokio::test]
    async fn test_create_rejects_missing_coordinates() {
        let state = state(true).await;
        let response = create(
            State(state.clone()),
            Json(json!({ "longitude": 2.0, "creatorId": "u1" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], MISSING_DATA);
        assert!(state.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_creator_requirement() {
        let body = json!({ "latitude": 1.0, "longitude": 2.0 });

        let response = create(State(state(true).await), Json(body.clone())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], MISSING_CREATOR);

        let response = create(State(state(false).await), Json(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["creatorId"], "anonymous");
    }

    #[tokio::test]
    async fn test_create_accepts_painting_without_image() {
        let state = state(true).await;
        let body = json!({
            "latitude": 1.0,
            "longitude": 2.0,
            "creatorId": "u1",
            "artType": "painting",
            "artData": {}
        });

        let response = create(State(state.clone()), Json(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let stored = state.all().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].art_type, ArtType::Painting);
        assert!(stored[0].art_data.is_empty());
    }

    #[tokio::test]
    async fn test_nearby_requires_coordinates() {
        let params = NearbyParams {
            lat: Some("1.0".to_string()),
            lng: None,
            distance: None,
        };
        let response = nearby(State(state(true).await), Query(params)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], MISSING_COORDS);

        let params = NearbyParams {
            lat: Some("abc".to_string()),
            lng: Some("1.0".to_string()),
            distance: None,
        };
        let response = nearby(State(state(true).await), Query(params)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nearby_default_distance() {
        let state = state(true).await;
        for lat in [0.0001, 0.001] {
            let body = json!({ "latitude": lat, "longitude": 0.0, "creatorId": "u1" });
            create(State(state.clone()), Json(body)).await;
        }

        let params = NearbyParams {
            lat: Some("0".to_string()),
            lng: Some("0".to_string()),
            distance: None,
        };
        let found = body_json(nearby(State(state), Query(params)).await).await;
        // ~11m is inside the default radius, ~111m is not
        assert_eq!(found.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all() {
        let state = state(true).await;
        create(
            State(state.clone()),
            Json(json!({ "latitude": 1.0, "longitude": 1.0, "creatorId": "u1" })),
        )
        .await;

        let Json(message) = delete_all(State(state.clone())).await;
        assert_eq!(message, json!({ "message": "All flowers deleted" }));
        assert!(state.all().await.is_empty());
    }
}
