//! Clear command - delete all art locally and on the backend.

use console::style;
use dialoguer::Confirm;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the clear command.
pub async fn run(runner: &CliRunner, yes: bool) -> Result<(), CliError> {
    runner.log_startup("clear");

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete all art on this device and the backend?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    let mut app = runner.start_app().await?;
    app.repository_mut().clear_all().await;
    println!("{}", style("All art cleared").green());
    Ok(())
}
