//! Geographic primitives - coordinates and great-circle distance

use serde::{Deserialize, Serialize};

/// Mean earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Collect range violations into `issues`
    pub fn check(&self, field: &str, issues: &mut Vec<String>) {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            issues.push(format!("{field}: latitude {} out of range [-90, 90]", self.lat));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            issues.push(format!(
                "{field}: longitude {} out of range [-180, 180]",
                self.lng
            ));
        }
    }
}

/// A named place: optional street address plus coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Human-readable address, when collected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    pub coordinates: Coordinates,
}

impl Location {
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            address: None,
            coordinates: Coordinates::new(lat, lng),
        }
    }
}

/// Great-circle distance between two coordinates (haversine formula)
///
/// Symmetric and non-negative; zero exactly when both coordinates are equal.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
