//! Position type and validation errors.

use std::fmt;

use thiserror::Error;

use super::distance_meters;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced when validating geographic input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("Invalid latitude: {0} (must be finite and within -90..=90)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be finite and within -180..=180)")]
    InvalidLongitude(f64),

    #[error("Invalid accuracy: {0} (must be finite and non-negative)")]
    InvalidAccuracy(f64),

    #[error("Invalid altitude: {0} (must be finite)")]
    InvalidAltitude(f64),
}

/// A validated geographic fix.
///
/// Latitude and longitude are always finite and in range. Accuracy and
/// altitude are informational and carried through to saved art.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    latitude: f64,
    longitude: f64,
    accuracy: Option<f64>,
    altitude: Option<f64>,
}

impl Position {
    /// Creates a position, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
            accuracy: None,
            altitude: None,
        })
    }

    /// Attaches a horizontal accuracy radius in meters.
    pub fn with_accuracy(mut self, accuracy: f64) -> Result<Self, GeoError> {
        if !accuracy.is_finite() || accuracy < 0.0 {
            return Err(GeoError::InvalidAccuracy(accuracy));
        }
        self.accuracy = Some(accuracy);
        Ok(self)
    }

    /// Attaches an altitude in meters.
    pub fn with_altitude(mut self, altitude: f64) -> Result<Self, GeoError> {
        if !altitude.is_finite() {
            return Err(GeoError::InvalidAltitude(altitude));
        }
        self.altitude = Some(altitude);
        Ok(self)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.accuracy
    }

    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    /// Great-circle distance to another position in meters.
    pub fn distance_to(&self, other: &Position) -> f64 {
        distance_meters(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_position() {
        let pos = Position::new(40.7128, -74.0060).unwrap();
        assert_eq!(pos.latitude(), 40.7128);
        assert_eq!(pos.longitude(), -74.0060);
        assert!(pos.accuracy().is_none());
        assert!(pos.altitude().is_none());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(
            Position::new(f64::NAN, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Position::new(0.0, f64::INFINITY),
            Err(GeoError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Position::new(90.5, 0.0).is_err());
        assert!(Position::new(0.0, -180.5).is_err());
        assert!(Position::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_optional_fields() {
        let pos = Position::new(1.0, 2.0)
            .unwrap()
            .with_accuracy(12.5)
            .unwrap()
            .with_altitude(-3.0)
            .unwrap();
        assert_eq!(pos.accuracy(), Some(12.5));
        assert_eq!(pos.altitude(), Some(-3.0));

        assert!(Position::new(1.0, 2.0).unwrap().with_accuracy(-1.0).is_err());
    }

    #[test]
    fn test_distance_to_matches_free_function() {
        let a = Position::new(51.5074, -0.1278).unwrap();
        let b = Position::new(48.8566, 2.3522).unwrap();
        assert_eq!(a.distance_to(&b), distance_meters(51.5074, -0.1278, 48.8566, 2.3522));
    }

    #[test]
    fn test_display() {
        let pos = Position::new(1.5, -2.25).unwrap();
        assert_eq!(pos.to_string(), "1.500000, -2.250000");
    }
}
