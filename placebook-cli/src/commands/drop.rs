//! Drop command - place art at a position.

use console::style;
use placebook::model::{ArtData, ArtOptions, ArtType, Audience, IDENTITY_TRANSFORM};
use placebook::repository::FailureKind;

use super::common::{format_record, ArtKind, PositionArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the drop command.
pub struct DropArgs {
    pub position: PositionArgs,
    pub kind: ArtKind,
    pub text: Option<String>,
    pub image_data: Option<String>,
    pub private: bool,
}

impl DropArgs {
    /// Build and validate the record options.
    fn options(&self) -> Result<ArtOptions, CliError> {
        let art_type = ArtType::from(self.kind);
        let data = match (&self.text, &self.image_data) {
            (Some(text), None) => ArtData::message(text.clone()),
            (None, Some(uri)) => ArtData::image(uri.clone()),
            (None, None) => ArtData::new(),
            (Some(_), Some(_)) => {
                return Err(CliError::Input(
                    "--text and --image-data cannot be combined".to_string(),
                ))
            }
        };
        data.validate(art_type)?;

        let audience = if self.private {
            Audience::Friends
        } else {
            Audience::Public
        };
        Ok(ArtOptions::new(art_type)
            .with_audience(audience)
            .with_data(data))
    }
}

/// Run the drop command.
pub async fn run(runner: &CliRunner, args: DropArgs) -> Result<(), CliError> {
    runner.log_startup("drop");
    let position = args.position.to_position()?;
    let options = args.options()?;

    let mut app = runner.start_app().await?;
    let mut failures = app.repository().subscribe_failures();

    let record = app
        .repository_mut()
        .save_art(&position, IDENTITY_TRANSFORM, options)
        .await;

    let mut saved_remotely = true;
    while let Ok(report) = failures.try_recv() {
        if report.kind.is_remote() {
            saved_remotely = false;
        } else if report.kind == FailureKind::LocalStorage {
            eprintln!("{} {}", style("warning:").yellow().bold(), report.detail);
        }
    }

    println!("{}", format_record(&record, None));
    if saved_remotely {
        println!("{}", style("Saved to backend").green());
    } else {
        println!(
            "{}",
            style("Backend unavailable, saved on this device").yellow()
        );
    }
    Ok(())
}
