//! Error types for the route optimizer.

use std::sync::Arc;

use thiserror::Error;

/// Reasons a request is rejected before optimization runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// A stop's coordinates are not finite numbers within range.
    #[error("{field} must have a valid latitude and longitude")]
    InvalidCoordinates {
        /// Which stop failed, e.g. `pickup` or `viaPoints[2]`.
        field: String,
    },
    /// A time window closes before it opens.
    #[error("time window for {stop_id} has earliest after latest")]
    InvertedTimeWindow { stop_id: String },
}

/// Failures of the optimizer itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizeError {
    /// Exhaustive search would evaluate `count!` permutations.
    #[error("{count} via points exceeds the limit of {max}")]
    TooManyViaPoints { count: usize, max: usize },
}

/// Errors returned by [`crate::planner::RoutePlanner::plan`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}

/// Invalid configuration values.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration layering failed (files, env).
    #[error("failed to load configuration: {0}")]
    Load(#[from] Arc<ortho_config::OrthoError>),
    #[error("{key} has invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown matrix provider {0:?} (expected `haversine` or `osrm`)")]
    UnknownProvider(String),
}

/// Why a precise matrix could not be used. Always recovered by falling back
/// to the haversine estimate.
#[derive(Debug, Error)]
pub(crate) enum MatrixFetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned {code}: {message}")]
    Service { code: String, message: String },
    #[error("response is missing the {0} annotation")]
    MissingAnnotation(&'static str),
    #[error("expected a {expected}x{expected} table")]
    Shape { expected: usize },
}
