//! Integration tests for the repository against the real HTTP backend.
//!
//! These tests start the axum server on an ephemeral port and drive it
//! through `HttpRemoteStore`, covering:
//! - save → load round trips through the server
//! - nearby radius and audience filtering
//! - offline fallback when the server goes away
//! - server-side validation errors
//!
//! Run with: `cargo test --test backend_integration`

#![cfg(feature = "server")]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use placebook::cache::LocalCache;
use placebook::geo::Position;
use placebook::identity::IdentityProvider;
use placebook::model::{ArtData, ArtOptions, ArtRecord, ArtType, Audience, IDENTITY_TRANSFORM};
use placebook::remote::{HttpRemoteStore, RemoteError, RemoteStore};
use placebook::repository::{ArtRepository, FailureKind, NearbyQuery};
use placebook::server::{self, ServerState};
use placebook::storage::{KeyValueStore, MemoryStore};

// ============================================================================
// Helper Functions
// ============================================================================

const BASE_LAT: f64 = 35.6762;
const BASE_LNG: f64 = 139.6503;

/// A running backend bound to 127.0.0.1 on an ephemeral port.
struct TestServer {
    api_url: String,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let state = Arc::new(ServerState::load(store, true).await.unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let handle = tokio::spawn(async move {
            server::run(listener, state, async move { token.cancelled().await })
                .await
                .unwrap();
        });

        Self {
            api_url: format!("http://{}/api", addr),
            shutdown,
            handle,
        }
    }

    async fn stop(self) {
        self.shutdown.cancel();
        self.handle.await.unwrap();
    }

    fn remote(&self) -> Arc<HttpRemoteStore> {
        Arc::new(HttpRemoteStore::with_timeout(&self.api_url, Duration::from_secs(5)).unwrap())
    }
}

/// Repository for a fresh device with its own local storage.
fn device(remote: Arc<dyn RemoteStore>) -> ArtRepository {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    ArtRepository::new(
        remote,
        LocalCache::new(store.clone()),
        IdentityProvider::new(store),
    )
}

fn offset(lat_delta: f64) -> Position {
    Position::new(BASE_LAT + lat_delta, BASE_LNG).unwrap()
}

// ============================================================================
// Round trips
// ============================================================================

#[tokio::test]
async fn test_save_then_load_through_server() {
    let server = TestServer::start().await;
    let mut repo = device(server.remote());

    let options = ArtOptions::new(ArtType::Message)
        .with_audience(Audience::Public)
        .with_data(ArtData::message("hello from the park"));
    let saved = repo.save_art(&offset(0.0), IDENTITY_TRANSFORM, options).await;

    let loaded = repo.load_all().await;
    assert_eq!(loaded, vec![saved.clone()]);

    // Another device sees the same record
    let mut other = device(server.remote());
    let seen = other.load_all().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].id, saved.id);
    assert_eq!(seen[0].art_data.text(), Some("hello from the park"));

    server.stop().await;
}

#[tokio::test]
async fn test_painting_without_image_reaches_server() {
    let server = TestServer::start().await;
    let remote = server.remote();
    let mut repo = device(remote.clone());
    let mut failures = repo.subscribe_failures();

    let saved = repo
        .save_art(&offset(0.0), IDENTITY_TRANSFORM, ArtOptions::new(ArtType::Painting))
        .await;
    assert!(failures.try_recv().is_err());

    let stored = remote.list_all().await.unwrap();
    assert_eq!(stored, vec![saved.clone()]);

    // A later full load keeps it
    assert_eq!(repo.load_all().await, vec![saved]);

    server.stop().await;
}

#[tokio::test]
async fn test_nearby_through_server() {
    let server = TestServer::start().await;
    let mut repo = device(server.remote());

    let near = repo
        .save_art(&offset(0.000045), IDENTITY_TRANSFORM, ArtOptions::default())
        .await;
    repo.save_art(&offset(0.009), IDENTITY_TRANSFORM, ArtOptions::default())
        .await;

    let nearby = repo.get_nearby_art(&offset(0.0), NearbyQuery::within(20.0)).await;
    assert_eq!(nearby, vec![near]);

    server.stop().await;
}

#[tokio::test]
async fn test_audience_filter_across_devices() {
    let server = TestServer::start().await;
    let mut alice = device(server.remote());
    let mut bob = device(server.remote());

    let public = alice
        .save_art(&offset(0.0), IDENTITY_TRANSFORM, ArtOptions::default())
        .await;
    let private = alice
        .save_art(
            &offset(0.0),
            IDENTITY_TRANSFORM,
            ArtOptions::default().with_audience(Audience::Friends),
        )
        .await;

    let bob_view = bob
        .get_nearby_art(&offset(0.0), NearbyQuery::default().public_only())
        .await;
    assert_eq!(bob_view, vec![public.clone()]);

    let alice_view = alice
        .get_nearby_art(&offset(0.0), NearbyQuery::default().public_only())
        .await;
    assert_eq!(alice_view, vec![public, private]);

    server.stop().await;
}

// ============================================================================
// Offline behavior
// ============================================================================

#[tokio::test]
async fn test_fallback_after_server_stops() {
    let server = TestServer::start().await;
    let remote = server.remote();
    let mut repo = device(remote);
    let mut failures = repo.subscribe_failures();

    let online = repo
        .save_art(&offset(0.0), IDENTITY_TRANSFORM, ArtOptions::default())
        .await;
    repo.load_all().await;
    server.stop().await;

    let offline = repo
        .save_art(&offset(0.00001), IDENTITY_TRANSFORM, ArtOptions::default())
        .await;
    assert_ne!(offline.id, online.id);
    assert_eq!(
        failures.recv().await.unwrap().kind,
        FailureKind::RemoteUnavailable
    );

    let nearby = repo.get_nearby_art(&offset(0.0), NearbyQuery::default()).await;
    assert_eq!(nearby, vec![online, offline]);
}

#[tokio::test]
async fn test_clear_then_load_while_offline() {
    let server = TestServer::start().await;
    let mut repo = device(server.remote());

    repo.save_art(&offset(0.0), IDENTITY_TRANSFORM, ArtOptions::default())
        .await;
    repo.load_all().await;
    repo.clear_all().await;

    // The server was cleared too
    let mut other = device(server.remote());
    assert!(other.load_all().await.is_empty());

    server.stop().await;
    assert!(repo.load_all().await.is_empty());
}

// ============================================================================
// Server validation
// ============================================================================

#[tokio::test]
async fn test_server_rejects_invalid_records() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/flowers", server.api_url))
        .json(&json!({ "longitude": 1.0, "creatorId": "u1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing required flower data");

    let response = client
        .get(format!("{}/flowers/nearby?lat=1", server.api_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // The typed client surfaces the server's message
    let anonymous = ArtRecord::new(&offset(0.0), IDENTITY_TRANSFORM, "", ArtOptions::default());
    match server.remote().create(&anonymous).await {
        Err(RemoteError::Rejected { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Missing creatorId");
        }
        other => panic!("expected rejection, got {:?}", other),
    }

    server.stop().await;
}

#[tokio::test]
async fn test_healthz_and_delete_message() {
    let server = TestServer::start().await;
    let base = server.api_url.trim_end_matches("/api").to_string();
    let client = reqwest::Client::new();

    let health = client
        .get(format!("{}/healthz", base))
        .send()
        .await
        .unwrap();
    assert_eq!(health.text().await.unwrap(), "ok");

    let deleted: serde_json::Value = client
        .delete(format!("{}/flowers", server.api_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deleted, json!({ "message": "All flowers deleted" }));

    server.stop().await;
}
