//! Serve command - run the backend HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;

use console::style;
use placebook::server::{self, ServeConfig};

use super::common::display_path;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the serve command.
pub struct ServeArgs {
    pub bind: Option<SocketAddr>,
    pub data_dir: Option<PathBuf>,
    pub allow_anonymous: bool,
}

/// Run the serve command until interrupted.
pub async fn run(runner: &CliRunner, args: ServeArgs) -> Result<(), CliError> {
    runner.log_startup("serve");
    let settings = &runner.config().server;

    let config = ServeConfig {
        bind: args.bind.unwrap_or(settings.bind),
        data_directory: args
            .data_dir
            .unwrap_or_else(|| settings.data_directory.clone()),
        require_creator: settings.require_creator && !args.allow_anonymous,
    };

    println!(
        "Serving {} on {} (data: {})",
        style("/api/flowers").cyan(),
        style(format!("http://{}", config.bind)).bold(),
        display_path(&config.data_directory)
    );

    server::serve(config).await?;
    Ok(())
}
