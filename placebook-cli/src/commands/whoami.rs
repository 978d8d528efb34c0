//! Whoami command - print this device's identity.

use crate::error::CliError;
use crate::runner::CliRunner;

pub async fn run(runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("whoami");
    let app = runner.start_app().await?;
    println!("{}", app.repository().current_user_id().await);
    Ok(())
}
