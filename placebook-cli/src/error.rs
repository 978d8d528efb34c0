//! CLI error type and exit codes.

use std::fmt;

use placebook::app::AppError;
use placebook::config::ConfigError;
use placebook::geo::GeoError;
use placebook::geolocation::GeolocationError;
use placebook::logging::LoggingError;
use placebook::model::ModelError;
use placebook::server::ServerError;

/// Errors surfaced to the user by `placebook` commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be read, written, or parsed.
    Config(String),
    /// Bad command-line input (coordinates, art data).
    Input(String),
    /// Logging could not be set up.
    Logging(LoggingError),
    /// The application failed to start.
    App(AppError),
    /// The position stream failed.
    Geolocation(GeolocationError),
    /// The backend server failed.
    Server(ServerError),
    /// Terminal interaction failed.
    Terminal(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Input(_) => 2,
            CliError::Config(_) => 3,
            CliError::Logging(_) | CliError::App(_) => 4,
            CliError::Geolocation(_) => 5,
            CliError::Server(_) => 6,
            CliError::Terminal(_) => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Input(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Geolocation(e) => write!(f, "{}", e),
            CliError::Server(e) => write!(f, "{}", e),
            CliError::Terminal(msg) => write!(f, "Terminal error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Logging(e) => Some(e),
            CliError::App(e) => Some(e),
            CliError::Geolocation(e) => Some(e),
            CliError::Server(e) => Some(e),
            CliError::Config(_) | CliError::Input(_) | CliError::Terminal(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<GeoError> for CliError {
    fn from(e: GeoError) -> Self {
        CliError::Input(e.to_string())
    }
}

impl From<ModelError> for CliError {
    fn from(e: ModelError) -> Self {
        CliError::Input(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<GeolocationError> for CliError {
    fn from(e: GeolocationError) -> Self {
        CliError::Geolocation(e)
    }
}

impl From<ServerError> for CliError {
    fn from(e: ServerError) -> Self {
        CliError::Server(e)
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::Terminal(e.to_string())
    }
}
