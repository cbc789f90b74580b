//! Optimization output, shaped for JSON responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::Location;

/// A stop on the chosen route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedStop {
    #[serde(flatten)]
    pub location: Location,
    pub sequence_number: usize,
    pub arrival_time: DateTime<Utc>,
    pub waiting_time_minutes: f64,
}

/// A stop on the caller's original route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalStop {
    #[serde(flatten)]
    pub location: Location,
    pub sequence_number: usize,
    pub arrival_time: DateTime<Utc>,
}

/// Time-window penalty totals for both orderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Penalties {
    pub optimized: f64,
    pub original: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    pub permutations_evaluated: usize,
    pub pickup_time: DateTime<Utc>,
    pub optimization_score: f64,
    pub original_score: f64,
}

/// Best ordering found, with the original ordering for comparison.
///
/// Savings are original minus optimized; they are zero (up to rounding)
/// when the caller's order was already optimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub optimized_route: Vec<OptimizedStop>,
    pub original_route: Vec<OriginalStop>,
    pub total_distance_km: f64,
    pub total_time_minutes: f64,
    pub time_saved_minutes: f64,
    pub distance_saved_km: f64,
    pub optimization_applied: bool,
    pub penalties: Penalties,
    pub metadata: SearchMetadata,
}

/// An [`OptimizationResult`] as returned by the planner, noting whether it
/// was served from cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    #[serde(flatten)]
    pub result: OptimizationResult,
    pub cached: bool,
}
