//! Common types and utilities shared across CLI commands.

use std::path::Path;

use clap::{Args, ValueEnum};
use console::style;
use placebook::geo::Position;
use placebook::model::{ArtRecord, ArtType, Audience};

use crate::error::CliError;

/// Art type selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum ArtKind {
    /// A flower (no extra data)
    #[default]
    Flower,
    /// A text message (requires --text)
    Message,
    /// A painting (requires --image-data)
    Painting,
    /// A drawing (requires --image-data)
    Drawing,
}

impl From<ArtKind> for ArtType {
    fn from(kind: ArtKind) -> Self {
        match kind {
            ArtKind::Flower => ArtType::Flower,
            ArtKind::Message => ArtType::Message,
            ArtKind::Painting => ArtType::Painting,
            ArtKind::Drawing => ArtType::Drawing,
        }
    }
}

/// `--lat`/`--lng`/`--accuracy` arguments.
#[derive(Debug, Clone, Args)]
pub struct PositionArgs {
    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Horizontal accuracy in meters
    #[arg(long)]
    pub accuracy: Option<f64>,
}

impl PositionArgs {
    pub fn to_position(&self) -> Result<Position, CliError> {
        let position = Position::new(self.lat, self.lng)?;
        match self.accuracy {
            Some(accuracy) => Ok(position.with_accuracy(accuracy)?),
            None => Ok(position),
        }
    }
}

/// Show `path` with the home directory abbreviated to `~`.
pub fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => path.display().to_string(),
    }
}

/// One-line summary of a record.
pub fn format_record(record: &ArtRecord, distance_m: Option<f64>) -> String {
    let audience = match record.audience {
        Audience::Public => style(record.audience.as_str()).green(),
        Audience::Friends => style(record.audience.as_str()).yellow(),
    };

    let mut line = format!(
        "{:<9} {:<8} {:>11.6}, {:>11.6}  {}",
        style(record.art_type.as_str()).cyan().bold(),
        audience,
        record.latitude,
        record.longitude,
        style(&record.id).dim(),
    );

    if let Some(distance) = distance_m {
        line.push_str(&format!("  {:.1} m", distance));
    }
    if let Some(text) = record.art_data.text() {
        line.push_str(&format!("  \"{}\"", text));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_args() {
        let args = PositionArgs {
            lat: -33.86,
            lng: 151.2,
            accuracy: Some(4.0),
        };
        let position = args.to_position().unwrap();
        assert_eq!(position.latitude(), -33.86);
        assert_eq!(position.accuracy(), Some(4.0));

        let bad = PositionArgs {
            lat: 95.0,
            lng: 0.0,
            accuracy: None,
        };
        assert!(matches!(bad.to_position(), Err(CliError::Input(_))));
    }

    #[test]
    fn test_display_path_outside_home() {
        let dir = tempfile::TempDir::new().unwrap();
        let shown = display_path(dir.path());
        assert!(shown.ends_with(&dir.path().file_name().unwrap().to_string_lossy().to_string()));
    }

    #[test]
    fn test_art_kind_mapping() {
        assert_eq!(ArtType::from(ArtKind::Drawing), ArtType::Drawing);
        assert_eq!(ArtType::from(ArtKind::default()), ArtType::Flower);
    }
}
