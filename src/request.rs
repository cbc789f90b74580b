//! Inbound optimization requests and their validation.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::location::{Location, TimeWindows, sorted_windows};

/// Body of an optimize-route request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub pickup: Location,
    #[serde(default)]
    pub via_points: Vec<Location>,
    pub destination: Location,
    /// Defaults to the time the request is planned.
    #[serde(default)]
    pub pickup_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_windows: TimeWindows,
}

impl OptimizeRequest {
    pub fn new(pickup: Location, destination: Location) -> Self {
        Self {
            pickup,
            via_points: Vec::new(),
            destination,
            pickup_time: None,
            time_windows: TimeWindows::new(),
        }
    }

    pub fn with_via_points(mut self, via_points: Vec<Location>) -> Self {
        self.via_points = via_points;
        self
    }

    pub fn with_pickup_time(mut self, pickup_time: DateTime<Utc>) -> Self {
        self.pickup_time = Some(pickup_time);
        self
    }

    pub fn with_time_windows(mut self, time_windows: TimeWindows) -> Self {
        self.time_windows = time_windows;
        self
    }

    /// Checks coordinates and time windows.
    pub fn validate(&self) -> Result<(), RequestError> {
        check_coordinates("pickup", &self.pickup)?;
        check_coordinates("destination", &self.destination)?;
        for (i, via) in self.via_points.iter().enumerate() {
            check_coordinates(&format!("viaPoints[{}]", i), via)?;
        }

        for (stop_id, window) in sorted_windows(&self.time_windows) {
            if window.earliest > window.latest {
                return Err(RequestError::InvertedTimeWindow {
                    stop_id: stop_id.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Cache key for this request.
    ///
    /// Covers the stops in caller order at six decimals, plus the explicit
    /// pickup time and the time windows. Stop ids are not part of the key.
    pub fn cache_key(&self) -> String {
        let stops = std::iter::once(&self.pickup)
            .chain(&self.via_points)
            .chain(std::iter::once(&self.destination))
            .map(|stop| format!("{:.6},{:.6}", stop.latitude, stop.longitude))
            .collect::<Vec<_>>()
            .join("|");

        let mut key = format!("route_{}", stops);
        if let Some(pickup_time) = self.pickup_time {
            let _ = write!(key, "@{}", pickup_time.timestamp_millis());
        }
        for (stop_id, window) in sorted_windows(&self.time_windows) {
            let _ = write!(
                key,
                "#{}={}..{}",
                stop_id,
                window.earliest.timestamp_millis(),
                window.latest.timestamp_millis()
            );
        }
        key
    }
}

fn check_coordinates(field: &str, stop: &Location) -> Result<(), RequestError> {
    let valid = stop.latitude.is_finite()
        && stop.longitude.is_finite()
        && (-90.0..=90.0).contains(&stop.latitude)
        && (-180.0..=180.0).contains(&stop.longitude);

    if valid {
        Ok(())
    } else {
        Err(RequestError::InvalidCoordinates {
            field: field.to_string(),
        })
    }
}
