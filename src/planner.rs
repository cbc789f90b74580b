//! Request-level entry point: validation, caching and optimization.

use chrono::Utc;
use tracing::{debug, info};

use crate::cache::RouteCache;
use crate::config::{MatrixStrategy, PlannerConfig};
use crate::error::PlannerError;
use crate::request::OptimizeRequest;
use crate::result::PlannedRoute;
use crate::solver::{OptimizeOptions, optimize};
use crate::traits::DistanceMatrixProvider;

/// Plans routes for incoming requests, reusing cached results.
///
/// Safe to share between threads when the provider is.
#[derive(Debug)]
pub struct RoutePlanner<M = MatrixStrategy> {
    provider: M,
    options: OptimizeOptions,
    cache: RouteCache,
}

impl RoutePlanner<MatrixStrategy> {
    /// Builds the provider selected by `config`.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, reqwest::Error> {
        let provider = config.matrix_strategy()?;
        info!(
            provider = ?config.provider,
            ttl_secs = config.cache_ttl.as_secs(),
            "route planner ready"
        );
        Ok(Self::new(
            provider,
            config.optimize_options(),
            RouteCache::new(config.cache_ttl),
        ))
    }
}

impl<M: DistanceMatrixProvider> RoutePlanner<M> {
    pub fn new(provider: M, options: OptimizeOptions, cache: RouteCache) -> Self {
        Self {
            provider,
            options,
            cache,
        }
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    /// Validates `request` and returns the cached or freshly optimized route.
    pub fn plan(&self, request: &OptimizeRequest) -> Result<PlannedRoute, PlannerError> {
        request.validate()?;

        let key = request.cache_key();
        if let Some(result) = self.cache.get(&key) {
            debug!(%key, "route served from cache");
            return Ok(PlannedRoute {
                result,
                cached: true,
            });
        }

        debug!(%key, via_points = request.via_points.len(), "optimizing route");
        let result = optimize(
            &request.pickup,
            &request.via_points,
            &request.destination,
            request.pickup_time.unwrap_or_else(Utc::now),
            &request.time_windows,
            &self.provider,
            &self.options,
        )?;

        self.cache.insert(key, result.clone());
        Ok(PlannedRoute {
            result,
            cached: false,
        })
    }
}
