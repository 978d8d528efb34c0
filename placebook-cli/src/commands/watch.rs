//! Watch command - follow positions from stdin and show nearby art.
//!
//! Each input line is `lat,lng[,accuracy]`; for example a GPS daemon piped
//! through a formatter. The command exits at end of input or on Ctrl-C.

use std::sync::Arc;

use console::style;
use placebook::geolocation::{GeolocationService, LinePositionSource};
use tokio::io::BufReader;
use tokio::sync::mpsc;

use super::nearby::{print_nearby, resolve_query};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the watch command.
pub struct WatchArgs {
    pub distance: Option<f64>,
    pub public_only: bool,
}

/// Run the watch command.
pub async fn run(runner: &CliRunner, args: WatchArgs) -> Result<(), CliError> {
    runner.log_startup("watch");
    let mut app = runner.start_app().await?;
    let query = resolve_query(app.config().query, args.distance, args.public_only);

    let source = Arc::new(LinePositionSource::new(BufReader::new(tokio::io::stdin())));
    let geolocation = GeolocationService::new(source);

    let (tx, mut positions) = mpsc::unbounded_channel();
    let handle = geolocation.start_watching(move |position| {
        let _ = tx.send(position);
    })?;

    eprintln!(
        "{}",
        style("Reading positions from stdin (lat,lng[,accuracy]), Ctrl-C to stop").dim()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = positions.recv() => match next {
                Some(position) => {
                    let records = app.repository_mut().get_nearby_art(&position, query).await;
                    print_nearby(&position, query, &records);
                }
                None => break,
            },
        }
    }

    geolocation.stop(handle);
    Ok(())
}
