//! Haversine distance matrix provider (fallback when OSRM unavailable).
//!
//! Uses great-circle distance to estimate travel time.
//! Less accurate than OSRM (ignores roads) but always available.

use crate::matrix::{DistanceCell, DistanceMatrix, round2};
use crate::traits::DistanceMatrixProvider;

/// Average driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 30.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine-based distance matrix provider.
///
/// Estimates travel time using straight-line distance and an assumed speed.
/// Output is rounded to two decimals, so repeated calls on the same input
/// give identical matrices.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Calculate haversine distance between two points in kilometers.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Convert distance in km to travel time in minutes.
    fn km_to_minutes(&self, km: f64) -> f64 {
        km / self.speed_kmh * 60.0
    }

    /// Estimated cell for a single pair of points.
    pub fn estimate(&self, from: (f64, f64), to: (f64, f64)) -> DistanceCell {
        let km = Self::haversine_km(from, to);
        DistanceCell::new(round2(km), round2(self.km_to_minutes(km)))
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> DistanceMatrix {
        DistanceMatrix::from_fn(locations.len(), |i, j| {
            self.estimate(locations[i], locations[j])
        })
    }
}
