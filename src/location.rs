//! Stops and arrival-time constraints.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic stop.
///
/// `id` only keys time-window lookups; matrix rows are addressed by the
/// stop's index in the request, never by its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Coordinates as a (lat, lng) tuple.
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Key used to find this stop's time window when it sits at `position`
    /// in a route.
    pub fn window_key(&self, position: usize) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("stop_{}", position),
        }
    }
}

/// Soft arrival constraint for a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(earliest: DateTime<Utc>, latest: DateTime<Utc>) -> Self {
        Self { earliest, latest }
    }
}

/// Time windows keyed by stop identifier.
pub type TimeWindows = HashMap<String, TimeWindow>;

/// Deterministically ordered view of a window map, for hashing into keys.
pub(crate) fn sorted_windows(windows: &TimeWindows) -> BTreeMap<&str, &TimeWindow> {
    windows.iter().map(|(k, v)| (k.as_str(), v)).collect()
}
