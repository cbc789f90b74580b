//! Planner configuration, layered from defaults and `ROUTE_*` environment
//! variables.

use std::str::FromStr;
use std::time::Duration;

use ortho_config::{MergeLayer, OrthoConfig};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::haversine::{DEFAULT_SPEED_KMH, HaversineMatrix};
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::solver::{DEFAULT_MAX_VIA_POINTS, OptimizeOptions};
use crate::traits::DistanceMatrixProvider;

/// Which matrix provider the planner builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Haversine,
    Osrm,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "haversine" => Ok(Self::Haversine),
            "osrm" => Ok(Self::Osrm),
            _ => Err(ConfigError::UnknownProvider(value.to_string())),
        }
    }
}

/// Raw settings as merged from configuration layers. Unset fields keep the
/// [`PlannerConfig`] defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "ROUTE")]
pub struct PlannerSettings {
    /// `haversine` or `osrm`.
    #[serde(default)]
    pub matrix_provider: Option<String>,
    #[serde(default)]
    pub osrm_base_url: Option<String>,
    #[serde(default)]
    pub osrm_profile: Option<String>,
    #[serde(default)]
    pub osrm_timeout_secs: Option<u64>,
    #[serde(default)]
    pub average_speed_kmh: Option<f64>,
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
    #[serde(default)]
    pub max_via_points: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub provider: ProviderKind,
    pub osrm: OsrmConfig,
    /// Assumed average speed for haversine estimates.
    pub average_speed_kmh: f64,
    pub cache_ttl: Duration,
    pub max_via_points: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            osrm: OsrmConfig::default(),
            average_speed_kmh: DEFAULT_SPEED_KMH,
            cache_ttl: Duration::from_secs(3600),
            max_via_points: DEFAULT_MAX_VIA_POINTS,
        }
    }
}

impl PlannerConfig {
    /// Loads `ROUTE_*` environment variables (and any config file the loader
    /// finds), keeping defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = PlannerSettings::load_from_iter([env!("CARGO_PKG_NAME")])?;
        Self::try_from(settings)
    }

    /// Merges explicit configuration layers, lowest precedence first.
    pub fn from_layers(layers: Vec<MergeLayer<'static>>) -> Result<Self, ConfigError> {
        let settings = PlannerSettings::merge_from_layers(layers)?;
        Self::try_from(settings)
    }

    pub fn optimize_options(&self) -> OptimizeOptions {
        OptimizeOptions {
            max_via_points: self.max_via_points,
        }
    }

    /// Builds the configured matrix provider.
    pub fn matrix_strategy(&self) -> Result<MatrixStrategy, reqwest::Error> {
        let haversine = HaversineMatrix::new(self.average_speed_kmh);
        Ok(match self.provider {
            ProviderKind::Haversine => MatrixStrategy::Haversine(haversine),
            ProviderKind::Osrm => {
                MatrixStrategy::Osrm(OsrmClient::new(self.osrm.clone(), haversine)?)
            }
        })
    }
}

impl TryFrom<PlannerSettings> for PlannerConfig {
    type Error = ConfigError;

    fn try_from(settings: PlannerSettings) -> Result<Self, Self::Error> {
        let mut config = Self::default();

        if let Some(provider) = settings.matrix_provider {
            config.provider = provider.parse()?;
        }
        if let Some(base_url) = settings.osrm_base_url {
            config.osrm.base_url = base_url;
        }
        if let Some(profile) = settings.osrm_profile {
            config.osrm.profile = profile;
        }
        if let Some(timeout_secs) = settings.osrm_timeout_secs {
            config.osrm.timeout_secs = timeout_secs;
        }
        if let Some(speed) = settings.average_speed_kmh {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: "average_speed_kmh",
                    value: speed.to_string(),
                });
            }
            config.average_speed_kmh = speed;
        }
        if let Some(ttl_secs) = settings.cache_ttl_secs {
            config.cache_ttl = Duration::from_secs(ttl_secs);
        }
        if let Some(max_via_points) = settings.max_via_points {
            config.max_via_points = max_via_points;
        }

        Ok(config)
    }
}

/// The matrix provider chosen at construction time.
#[derive(Debug, Clone)]
pub enum MatrixStrategy {
    Haversine(HaversineMatrix),
    /// OSRM with haversine fallback.
    Osrm(OsrmClient),
}

impl DistanceMatrixProvider for MatrixStrategy {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> crate::matrix::DistanceMatrix {
        match self {
            Self::Haversine(provider) => provider.matrix_for(locations),
            Self::Osrm(provider) => provider.matrix_for(locations),
        }
    }
}
