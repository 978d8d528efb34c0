//! Shared command setup: configuration, logging, and app bootstrap.

use placebook::app::{AppConfig, PlacebookApp};
use placebook::config::ConfigFile;
use placebook::logging::{init_logging, LoggingGuard};
use tracing::{debug, warn};

use crate::error::CliError;

/// Flags accepted by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub offline: bool,
    pub api_url: Option<String>,
    pub verbose: bool,
}

/// Loaded configuration plus an installed subscriber.
pub struct CliRunner {
    config: ConfigFile,
    options: GlobalOptions,
    _logging: LoggingGuard,
}

impl CliRunner {
    pub fn new(options: GlobalOptions) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;
        let logging = init_logging(&config.logging, options.verbose)?;
        Ok(Self {
            config,
            options,
            _logging: logging,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        debug!(
            command,
            version = env!("CARGO_PKG_VERSION"),
            offline = self.options.offline,
            "placebook starting"
        );
    }

    /// Bootstrap settings with CLI overrides applied.
    pub fn app_config(&self) -> AppConfig {
        let mut app = AppConfig::from_config_file(&self.config);
        if let Some(url) = &self.options.api_url {
            app = app.with_api_url(url.trim_end_matches('/'));
        }
        if self.options.offline {
            if self.options.api_url.is_some() {
                warn!("--api-url is ignored in offline mode");
            }
            app = app.offline();
        }
        app
    }

    pub async fn start_app(&self) -> Result<PlacebookApp, CliError> {
        Ok(PlacebookApp::start(self.app_config()).await?)
    }
}
