//! Device position service.
//!
//! [`GeolocationService`] wraps a [`PositionSource`] (a GPS receiver, a fixed
//! point, or lines read from stdin) and exposes one-shot fixes with a
//! timeout plus a cancellable watch subscription.
//!
//! # Watch lifecycle
//!
//! ```text
//! start_watching(cb) ──► task: source.watch() ──► cb(position) ...
//!        │                                              ▲
//!        └── WatchHandle ── stop(handle) ── cancel + wait for gate
//! ```
//!
//! Only one watch may be active. After [`GeolocationService::stop`] returns,
//! the callback is never invoked again.

mod sources;

pub use sources::{
    parse_position_line, ChannelPositionSource, LinePositionSource, StaticPositionSource,
};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::geo::{GeoError, Position};
use crate::storage::BoxFuture;

/// Timeout applied to one-shot position requests.
pub const POSITION_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors produced by position sources and the service.
#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("Geolocation is not available: {0}")]
    Unavailable(String),

    #[error("Timed out after {0:?} waiting for a position")]
    Timeout(Duration),

    #[error("Invalid position: {0}")]
    InvalidPosition(#[from] GeoError),

    #[error("Cannot parse position '{line}': {reason}")]
    Parse { line: String, reason: String },

    #[error("Position source failed: {0}")]
    Source(String),

    #[error("A position watch is already active")]
    AlreadyWatching,
}

/// Stream of fixes delivered by a watching source.
pub type PositionStream = mpsc::Receiver<Result<Position, GeolocationError>>;

/// A provider of device positions.
pub trait PositionSource: Send + Sync {
    /// Whether the source can produce positions at all.
    fn is_available(&self) -> bool;

    /// A single fix. May wait; the service applies the timeout.
    fn current_position(&self) -> BoxFuture<'_, Result<Position, GeolocationError>>;

    /// Start producing fixes. The stream ends when the source is exhausted.
    fn watch(&self) -> Result<PositionStream, GeolocationError>;
}

/// Outcome of the last permission request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionStatus {
    #[default]
    Unknown,
    Granted,
    Denied,
    Unavailable,
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionStatus::Unknown => "unknown",
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
            PermissionStatus::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

/// Identifies an active watch; pass it to [`GeolocationService::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchHandle {
    id: u64,
}

struct ActiveWatch {
    id: u64,
    cancel: CancellationToken,
    /// Held while a callback runs; `stop` takes it after cancelling.
    gate: Arc<Mutex<()>>,
}

#[derive(Default)]
struct ServiceState {
    permission: PermissionStatus,
    last_position: Option<Position>,
    watch: Option<ActiveWatch>,
}

/// Position service over a pluggable source.
pub struct GeolocationService {
    source: Arc<dyn PositionSource>,
    state: Arc<Mutex<ServiceState>>,
    next_watch_id: AtomicU64,
    timeout: Duration,
}

impl GeolocationService {
    pub fn new(source: Arc<dyn PositionSource>) -> Self {
        Self::with_timeout(source, POSITION_TIMEOUT)
    }

    pub fn with_timeout(source: Arc<dyn PositionSource>, timeout: Duration) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(ServiceState::default())),
            next_watch_id: AtomicU64::new(1),
            timeout,
        }
    }

    pub fn is_available(&self) -> bool {
        self.source.is_available()
    }

    pub fn permission_status(&self) -> PermissionStatus {
        self.state.lock().permission
    }

    /// Most recent fix from either a one-shot request or the watch.
    pub fn last_position(&self) -> Option<Position> {
        self.state.lock().last_position
    }

    pub fn is_watching(&self) -> bool {
        self.state.lock().watch.is_some()
    }

    /// Probe the source by requesting one fix.
    pub async fn request_permission(&self) -> PermissionStatus {
        let status = if !self.source.is_available() {
            warn!("Geolocation source is not available");
            PermissionStatus::Unavailable
        } else {
            match self.current_position().await {
                Ok(_) => PermissionStatus::Granted,
                Err(e) => {
                    warn!(error = %e, "Geolocation permission request failed");
                    PermissionStatus::Denied
                }
            }
        };

        self.state.lock().permission = status;
        status
    }

    /// One fix, bounded by the service timeout.
    pub async fn current_position(&self) -> Result<Position, GeolocationError> {
        if !self.source.is_available() {
            return Err(GeolocationError::Unavailable(
                "no position source".to_string(),
            ));
        }

        let position = tokio::time::timeout(self.timeout, self.source.current_position())
            .await
            .map_err(|_| GeolocationError::Timeout(self.timeout))??;

        debug!(%position, "Current position");
        self.state.lock().last_position = Some(position);
        Ok(position)
    }

    /// Deliver every fix from the source to `callback` until stopped.
    ///
    /// Source errors are logged and skipped. Must be called within a tokio
    /// runtime. The callback must not call [`stop`](Self::stop).
    pub fn start_watching<F>(&self, mut callback: F) -> Result<WatchHandle, GeolocationError>
    where
        F: FnMut(Position) + Send + 'static,
    {
        let mut state = self.state.lock();
        if state.watch.is_some() {
            return Err(GeolocationError::AlreadyWatching);
        }
        if !self.source.is_available() {
            return Err(GeolocationError::Unavailable(
                "no position source".to_string(),
            ));
        }

        let mut stream = self.source.watch()?;
        let id = self.next_watch_id.fetch_add(1, Ordering::SeqCst);
        let cancel = CancellationToken::new();
        let gate = Arc::new(Mutex::new(()));

        state.watch = Some(ActiveWatch {
            id,
            cancel: cancel.clone(),
            gate: gate.clone(),
        });
        drop(state);

        let shared = self.state.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => break,

                    item = stream.recv() => match item {
                        Some(Ok(position)) => {
                            let _delivering = gate.lock();
                            if cancel.is_cancelled() {
                                break;
                            }
                            shared.lock().last_position = Some(position);
                            debug!(%position, "Position updated");
                            callback(position);
                        }
                        Some(Err(e)) => warn!(error = %e, "Error watching position"),
                        None => {
                            debug!("Position source exhausted");
                            break;
                        }
                    },
                }
            }
            debug!(watch = id, "Watch task finished");
        });

        info!(watch = id, "Started watching position");
        Ok(WatchHandle { id })
    }

    /// Stop the watch identified by `handle`.
    ///
    /// Returns false if it is not the active watch. Once this returns true
    /// the callback will not run again.
    pub fn stop(&self, handle: WatchHandle) -> bool {
        let active = {
            let mut state = self.state.lock();
            match &state.watch {
                Some(watch) if watch.id == handle.id => state.watch.take(),
                _ => None,
            }
        };

        let Some(active) = active else {
            return false;
        };

        active.cancel.cancel();
        // Waits out a callback that was already running
        drop(active.gate.lock());
        info!(watch = handle.id, "Stopped watching position");
        true
    }
}

impl Drop for GeolocationService {
    fn drop(&mut self) {
        if let Some(watch) = self.state.lock().watch.take() {
            watch.cancel.cancel();
        }
    }
}
