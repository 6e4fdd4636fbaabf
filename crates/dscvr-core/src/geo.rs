//! Coordinates and great-circle distance.
//!
//! Distances use the haversine formula on a spherical Earth. The error versus
//! an ellipsoidal model is well under 1% at city and continental scale, which
//! is all venue discovery needs.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 latitude/longitude pair in degrees.
///
/// Construct through [`Coordinate::new`] whenever the values come from
/// outside the process; the struct fields are public for literals in tests
/// and for already-validated data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Validates and builds a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] if either value is not finite,
    /// latitude is outside `[-90, 90]`, or longitude is outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let invalid = |reason| CoreError::InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("coordinate is not a finite number"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude out of range [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude out of range [-180, 180]"));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Great-circle distance between `a` and `b` in meters.
///
/// Symmetric and zero for identical points. Inputs are expected to satisfy
/// the [`Coordinate`] range invariant.
#[must_use]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi_a = a.latitude.to_radians();
    let phi_b = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1.0 for antipodal points.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}
