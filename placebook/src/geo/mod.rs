//! Geographic math module
//!
//! Provides great-circle distance between geographic coordinates and the
//! validated [`Position`] type that art records are placed at.

mod types;

pub use types::{GeoError, Position, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters used by the Haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Computes the great-circle distance between two coordinates in meters.
///
/// Uses the Haversine formula with a spherical Earth of radius
/// [`EARTH_RADIUS_M`]. The result is symmetric and never negative.
///
/// NaN inputs produce a NaN result; callers validate coordinates upstream.
///
/// # Arguments
///
/// * `lat1`, `lon1` - First point in degrees
/// * `lat2`, `lon2` - Second point in degrees
#[inline]
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Clamp guards sqrt(1 - a) against rounding just above 1.0 for antipodes
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
