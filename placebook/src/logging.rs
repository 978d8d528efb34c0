//! Tracing subscriber setup.
//!
//! Installs a registry with an `EnvFilter` (`RUST_LOG` wins over the
//! configured level), a stderr layer, and an optional daily-rolling file
//! layer written through a non-blocking appender.

use std::path::PathBuf;

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// Prefix of rolled log files, e.g. `placebook.log.2026-10-19`.
const LOG_FILE_PREFIX: &str = "placebook.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log filter '{filter}': {message}")]
    Filter { filter: String, message: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Keeps the file writer alive; buffered lines are flushed on drop.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// `verbose` raises the default level to `debug` when `RUST_LOG` is unset.
pub fn init_logging(settings: &LoggingSettings, verbose: bool) -> Result<LoggingGuard, LoggingError> {
    let level = if verbose { "debug" } else { settings.level.as_str() };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| LoggingError::Filter {
            filter: level.to_string(),
            message: e.to_string(),
        })?,
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(LocalTime::new(Rfc3339));

    let (file_layer, file_guard) = match &settings.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory).map_err(|source| LoggingError::Directory {
                path: directory.clone(),
                source,
            })?;

            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(LocalTime::new(Rfc3339));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(LoggingGuard { _file: file_guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_directory_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let settings = LoggingSettings {
            level: "info".to_string(),
            directory: Some(blocker.join("logs")),
        };
        assert!(matches!(
            init_logging(&settings, false),
            Err(LoggingError::Directory { .. })
        ));
    }

    #[test]
    fn test_second_init_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = LoggingSettings {
            level: "warn".to_string(),
            directory: Some(dir.path().to_path_buf()),
        };

        // Another test in this binary may have installed a subscriber first
        let first = init_logging(&settings, false);
        let second = init_logging(&settings, false);
        assert!(matches!(second, Err(LoggingError::AlreadyInitialized(_))));
        drop(first);
    }
}
