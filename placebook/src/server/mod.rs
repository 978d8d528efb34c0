//! Backend HTTP server for the art collection.
//!
//! Serves the JSON contract consumed by [`HttpRemoteStore`](crate::remote::HttpRemoteStore):
//!
//! | method | path                   | response                          |
//! |--------|------------------------|-----------------------------------|
//! | GET    | `/api/flowers`         | all records                       |
//! | POST   | `/api/flowers`         | 201 + stored record, 400 invalid  |
//! | GET    | `/api/flowers/nearby`  | records within `distance` meters  |
//! | DELETE | `/api/flowers`         | `{"message": ...}`                |
//! | GET    | `/healthz`             | `ok`                              |
//!
//! The collection is persisted to a [`FileStore`] after every mutation.

mod handlers;
mod state;

pub use state::{ServerState, COLLECTION_KEY};

use std::future::{Future, IntoFuture};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::storage::{FileStore, StorageError};

/// Time allowed for in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Errors starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Failed to load art collection: {0}")]
    Load(#[from] StorageError),

    #[error("Server failed: {0}")]
    Serve(#[source] io::Error),

    #[error("Server shutdown timed out after {0:?}")]
    ShutdownTimeout(Duration),
}

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub data_directory: PathBuf,
    /// Reject records without `creatorId`.
    pub require_creator: bool,
}

/// Build the router over `state`.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/api/flowers",
            get(handlers::list_all)
                .post(handlers::create)
                .delete(handlers::delete_all),
        )
        .route("/api/flowers/nearby", get(handlers::nearby))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until Ctrl-C or SIGTERM.
pub async fn serve(config: ServeConfig) -> Result<(), ServerError> {
    let store = Arc::new(FileStore::new(config.data_directory.clone()));
    let state = Arc::new(ServerState::load(store, config.require_creator).await?);

    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;

    info!(
        addr = %config.bind,
        data = %config.data_directory.display(),
        "Server listening"
    );

    run(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn run<F>(
    listener: TcpListener,
    state: Arc<ServerState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = stop_rx.await;
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result.map_err(ServerError::Serve)?,
        _ = shutdown => {
            info!("Shutting down server");
            let _ = stop_tx.send(());
            match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
                Ok(result) => result.map_err(ServerError::Serve)?,
                Err(_) => return Err(ServerError::ShutdownTimeout(SHUTDOWN_GRACE)),
            }
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}
