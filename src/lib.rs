//! route-optimizer
//!
//! Orders the via points of a pickup-to-destination trip under soft arrival
//! time windows, using a pluggable distance/time matrix.

pub mod cache;
pub mod config;
pub mod error;
pub mod haversine;
pub mod location;
pub mod matrix;
pub mod osrm;
pub mod planner;
pub mod request;
pub mod result;
pub mod solver;
pub mod traits;

pub use config::{MatrixStrategy, PlannerConfig, PlannerSettings, ProviderKind};
pub use error::{ConfigError, OptimizeError, PlannerError, RequestError};
pub use location::{Location, TimeWindow, TimeWindows};
pub use matrix::{DistanceCell, DistanceMatrix};
pub use planner::RoutePlanner;
pub use request::OptimizeRequest;
pub use result::{OptimizationResult, PlannedRoute};
pub use solver::{OptimizeOptions, optimize};
pub use traits::DistanceMatrixProvider;
