//! List command - show every known record.

use console::style;

use super::common::format_record;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the list command.
pub async fn run(runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("list");
    let app = runner.start_app().await?;
    let records = app.repository().records();

    if records.is_empty() {
        println!("{}", style("No art yet").dim());
        return Ok(());
    }

    println!("{}", style(format!("{} pieces", records.len())).bold());
    for record in records {
        println!(
            "  {}  {}",
            format_record(record, None),
            style(record.timestamp.format("%Y-%m-%d %H:%M")).dim()
        );
    }
    Ok(())
}
