//! Great-circle distance between coordinates.
//!
//! Coordinates are trusted: nothing here checks that a latitude lies in
//! [-90, 90]. Non-finite inputs simply produce non-finite distances.

use serde::{Deserialize, Serialize};

use crate::error::{CafeScoutError, Result};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fallback user coordinate (Hanoi city centre).
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint {
    lat: 21.028511,
    lng: 105.804817,
};

/// A WGS-84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point without range checks.
    pub const fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    /// Create a point, rejecting out-of-range or non-finite coordinates.
    ///
    /// Used at input boundaries (CLI flags, config files). The distance
    /// functions themselves accept anything.
    pub fn checked(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CafeScoutError::invalid_argument(format!(
                "Invalid latitude: {lat} (must be between -90 and 90)"
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CafeScoutError::invalid_argument(format!(
                "Invalid longitude: {lng} (must be between -180 and 180)"
            )));
        }
        Ok(GeoPoint { lat, lng })
    }

    /// Haversine distance to another point in kilometers.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Haversine great-circle distance in kilometers between two coordinates
/// given in decimal degrees.
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
