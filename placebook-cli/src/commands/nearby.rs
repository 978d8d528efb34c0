//! Nearby command - list art around a position.

use console::style;
use placebook::geo::Position;
use placebook::model::ArtRecord;
use placebook::repository::NearbyQuery;

use super::common::{format_record, PositionArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the nearby command.
pub struct NearbyArgs {
    pub position: PositionArgs,
    pub distance: Option<f64>,
    pub public_only: bool,
}

/// Merge CLI flags over the configured query.
pub fn resolve_query(base: NearbyQuery, distance: Option<f64>, public_only: bool) -> NearbyQuery {
    let mut query = base;
    if let Some(distance) = distance {
        query.distance_m = distance;
    }
    if public_only {
        query.include_private = false;
    }
    query
}

/// Run the nearby command.
pub async fn run(runner: &CliRunner, args: NearbyArgs) -> Result<(), CliError> {
    runner.log_startup("nearby");
    let position = args.position.to_position()?;
    if matches!(args.distance, Some(d) if !d.is_finite() || d < 0.0) {
        return Err(CliError::Input("--distance must be a non-negative number".to_string()));
    }

    let mut app = runner.start_app().await?;
    let query = resolve_query(app.config().query, args.distance, args.public_only);
    let records = app.repository_mut().get_nearby_art(&position, query).await;

    print_nearby(&position, query, &records);
    Ok(())
}

/// Print a nearby result with per-record distances.
pub fn print_nearby(position: &Position, query: NearbyQuery, records: &[ArtRecord]) {
    println!(
        "{} within {} m of {}",
        style(format!("{} pieces", records.len())).bold(),
        query.distance_m,
        position
    );
    for record in records {
        println!("  {}", format_record(record, Some(record.distance_to(position))));
    }
}
