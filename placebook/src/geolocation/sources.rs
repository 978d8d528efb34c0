//! Position source implementations.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use super::{GeolocationError, PositionSource, PositionStream};
use crate::geo::Position;
use crate::storage::BoxFuture;

/// Buffered fixes per watcher.
const WATCH_BUFFER: usize = 16;

/// Source that always reports the same position.
#[derive(Debug, Clone)]
pub struct StaticPositionSource {
    position: Option<Position>,
}

impl StaticPositionSource {
    pub fn new(position: Position) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// A source that reports itself unavailable.
    pub fn unavailable() -> Self {
        Self { position: None }
    }
}

impl PositionSource for StaticPositionSource {
    fn is_available(&self) -> bool {
        self.position.is_some()
    }

    fn current_position(&self) -> BoxFuture<'_, Result<Position, GeolocationError>> {
        Box::pin(async move {
            self.position
                .ok_or_else(|| GeolocationError::Unavailable("no fixed position".to_string()))
        })
    }

    fn watch(&self) -> Result<PositionStream, GeolocationError> {
        let position = self
            .position
            .ok_or_else(|| GeolocationError::Unavailable("no fixed position".to_string()))?;
        let (tx, rx) = mpsc::channel(1);
        // Capacity 1 guarantees room for the single fix
        let _ = tx.try_send(Ok(position));
        Ok(rx)
    }
}

/// Source fed programmatically via [`push`](ChannelPositionSource::push).
#[derive(Default)]
pub struct ChannelPositionSource {
    latest: Mutex<Option<Position>>,
    watchers: Mutex<Vec<mpsc::Sender<Result<Position, GeolocationError>>>>,
}

impl ChannelPositionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new fix and forward it to every live watcher.
    pub fn push(&self, position: Position) {
        *self.latest.lock() = Some(position);
        self.watchers.lock().retain(|tx| match tx.try_send(Ok(position)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("Position watcher is lagging, dropping fix");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }
}

impl PositionSource for ChannelPositionSource {
    fn is_available(&self) -> bool {
        true
    }

    fn current_position(&self) -> BoxFuture<'_, Result<Position, GeolocationError>> {
        Box::pin(async move {
            self.latest
                .lock()
                .ok_or_else(|| GeolocationError::Source("no position received yet".to_string()))
        })
    }

    fn watch(&self) -> Result<PositionStream, GeolocationError> {
        let (tx, rx) = mpsc::channel(WATCH_BUFFER);
        self.watchers.lock().push(tx);
        Ok(rx)
    }
}

/// Source reading `lat,lng[,accuracy]` lines from an async reader.
///
/// Blank lines and lines starting with `#` are ignored. The reader can be
/// consumed by a single watch; afterwards the last parsed fix remains
/// available through `current_position`.
pub struct LinePositionSource<R> {
    reader: Mutex<Option<R>>,
    latest: Arc<Mutex<Option<Position>>>,
}

impl<R> LinePositionSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(Some(reader)),
            latest: Arc::new(Mutex::new(None)),
        }
    }
}

impl<R> PositionSource for LinePositionSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn is_available(&self) -> bool {
        self.reader.lock().is_some() || self.latest.lock().is_some()
    }

    fn current_position(&self) -> BoxFuture<'_, Result<Position, GeolocationError>> {
        Box::pin(async move {
            self.latest
                .lock()
                .ok_or_else(|| GeolocationError::Source("no position read yet".to_string()))
        })
    }

    fn watch(&self) -> Result<PositionStream, GeolocationError> {
        let reader = self.reader.lock().take().ok_or_else(|| {
            GeolocationError::Unavailable("line input already consumed".to_string())
        })?;

        let (tx, rx) = mpsc::channel(WATCH_BUFFER);
        let latest = self.latest.clone();

        tokio::spawn(async move {
            let mut lines = reader.lines();
            loop {
                let item = match lines.next_line().await {
                    Ok(Some(line)) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() || trimmed.starts_with('#') {
                            continue;
                        }
                        let parsed = parse_position_line(trimmed);
                        if let Ok(position) = &parsed {
                            *latest.lock() = Some(*position);
                        }
                        parsed
                    }
                    Ok(None) => break,
                    Err(e) => Err(GeolocationError::Source(e.to_string())),
                };

                if tx.send(item).await.is_err() {
                    break;
                }
            }
            debug!("Line position input closed");
        });

        Ok(rx)
    }
}

/// Parse `lat,lng` or `lat,lng,accuracy`.
pub fn parse_position_line(line: &str) -> Result<Position, GeolocationError> {
    let parse_err = |reason: &str| GeolocationError::Parse {
        line: line.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 2 || fields.len() > 3 {
        return Err(parse_err("expected lat,lng[,accuracy]"));
    }

    let number = |s: &str, what: &str| -> Result<f64, GeolocationError> {
        s.parse::<f64>()
            .map_err(|_| parse_err(&format!("{} is not a number", what)))
    };

    let mut position = Position::new(number(fields[0], "latitude")?, number(fields[1], "longitude")?)?;
    if let Some(accuracy) = fields.get(2) {
        position = position.with_accuracy(number(accuracy, "accuracy")?)?;
    }
    Ok(position)
}
