//! Placebook CLI - Command-line interface
//!
//! This binary drops and discovers geotagged art through the placebook
//! library, and can run the backend server itself.

mod commands;
mod error;
mod runner;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;

use commands::common::{ArtKind, PositionArgs};
use commands::config::ConfigCommands;
use error::CliError;
use runner::{CliRunner, GlobalOptions};

#[derive(Debug, Parser)]
#[command(name = "placebook", version, about = "Drop and discover geotagged art, online or offline")]
struct Cli {
    /// Never contact the backend; use only data stored on this device
    #[arg(long, global = true)]
    offline: bool,

    /// Backend API root, overriding the configured URL
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Place a piece of art at a position
    Drop {
        #[command(flatten)]
        position: PositionArgs,

        /// Kind of art
        #[arg(long = "type", value_enum, default_value_t = ArtKind::Flower)]
        kind: ArtKind,

        /// Message text (for --type message)
        #[arg(long)]
        text: Option<String>,

        /// Image as a data: URI (for --type painting or drawing)
        #[arg(long, value_name = "DATA_URI")]
        image_data: Option<String>,

        /// Only visible to you unless others include private art
        #[arg(long)]
        private: bool,
    },

    /// Show art near a position
    Nearby {
        #[command(flatten)]
        position: PositionArgs,

        /// Search radius in meters (default from config)
        #[arg(long)]
        distance: Option<f64>,

        /// Hide other people's private art
        #[arg(long)]
        public_only: bool,
    },

    /// List all known art
    List,

    /// Delete all art on this device and the backend
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print this device's user id
    Whoami,

    /// Read positions from stdin and show nearby art for each
    Watch {
        /// Search radius in meters (default from config)
        #[arg(long)]
        distance: Option<f64>,

        /// Hide other people's private art
        #[arg(long)]
        public_only: bool,
    },

    /// Run the backend server
    Serve {
        /// Address to listen on (default from config)
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Directory for the stored collection (default from config)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Accept records without a creatorId
        #[arg(long)]
        allow_anonymous: bool,
    },

    /// View or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let options = GlobalOptions {
        offline: cli.offline,
        api_url: cli.api_url,
        verbose: cli.verbose,
    };

    // Config commands must work even when the config file is broken
    let command = match cli.command {
        Commands::Config { command } => return commands::config::run(command),
        other => other,
    };

    let runner = CliRunner::new(options)?;
    match command {
        Commands::Drop {
            position,
            kind,
            text,
            image_data,
            private,
        } => {
            let args = commands::drop::DropArgs {
                position,
                kind,
                text,
                image_data,
                private,
            };
            commands::drop::run(&runner, args).await
        }
        Commands::Nearby {
            position,
            distance,
            public_only,
        } => {
            let args = commands::nearby::NearbyArgs {
                position,
                distance,
                public_only,
            };
            commands::nearby::run(&runner, args).await
        }
        Commands::List => commands::list::run(&runner).await,
        Commands::Clear { yes } => commands::clear::run(&runner, yes).await,
        Commands::Whoami => commands::whoami::run(&runner).await,
        Commands::Watch {
            distance,
            public_only,
        } => {
            let args = commands::watch::WatchArgs {
                distance,
                public_only,
            };
            commands::watch::run(&runner, args).await
        }
        Commands::Serve {
            bind,
            data_dir,
            allow_anonymous,
        } => {
            let args = commands::serve::ServeArgs {
                bind,
                data_dir,
                allow_anonymous,
            };
            commands::serve::run(&runner, args).await
        }
        Commands::Config { .. } => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{} Failed to create Tokio runtime: {}", style("error:").red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run(cli));
    // A stdin read from `watch` can still be parked on a blocking thread
    runtime.shutdown_background();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}
