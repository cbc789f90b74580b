//! Test fixtures for route-optimizer.
//!
//! Real Las Vegas / Henderson coordinates (from OpenStreetMap) plus a
//! couple of request builders.

#![allow(dead_code)]

pub mod las_vegas_places;

pub use las_vegas_places::*;

use chrono::{DateTime, TimeZone, Utc};

/// Fixed pickup time so runs are reproducible.
pub fn eight_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}
