//! Application error types.

use std::fmt;

use crate::remote::RemoteError;

/// Errors that can occur while bootstrapping the application.
#[derive(Debug)]
pub enum AppError {
    /// The HTTP client could not be built.
    RemoteSetup(RemoteError),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::RemoteSetup(e) => write!(f, "Failed to set up backend client: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::RemoteSetup(e) => Some(e),
            AppError::Config(_) => None,
        }
    }
}

impl From<RemoteError> for AppError {
    fn from(e: RemoteError) -> Self {
        AppError::RemoteSetup(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config("empty backend url".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("empty backend url"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_app_error_from_remote_error() {
        let app_err: AppError = RemoteError::Unavailable("tls".to_string()).into();
        assert!(matches!(app_err, AppError::RemoteSetup(_)));
        assert!(app_err.source().is_some());
    }
}
