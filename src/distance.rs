//! Great-circle distance between two coordinates.
//!
//! Haversine on a spherical Earth. All results are in meters.

use crate::model::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distance in meters between two coordinates.
pub fn between(a: Coordinate, b: Coordinate) -> f64 {
    haversine(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Haversine distance in meters between two points given in decimal degrees.
///
/// Never panics. Out-of-range inputs still give a finite distance unless they
/// are large enough to overflow the coordinate difference, in which case the
/// result is NaN.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` slightly past 1 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_M * c
}
