//! OSRM HTTP adapter for distance matrices.
//!
//! One Table request covers every pair. A failed request falls back to the
//! haversine estimate for the whole matrix; an unroutable pair inside a good
//! response falls back for that cell only.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::MatrixFetchError;
use crate::haversine::HaversineMatrix;
use crate::matrix::{DistanceCell, DistanceMatrix};
use crate::traits::DistanceMatrixProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
    fallback: HaversineMatrix,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig, fallback: HaversineMatrix) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            fallback,
        })
    }

    fn table_url(&self, locations: &[(f64, f64)]) -> String {
        let coords = locations
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=duration,distance",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }

    fn fetch_table(&self, locations: &[(f64, f64)]) -> Result<TableResponse, MatrixFetchError> {
        let response = self
            .client
            .get(self.table_url(locations))
            .send()?
            .error_for_status()?
            .json::<TableResponse>()?;
        Ok(response)
    }

    /// Turns a Table response into a matrix, patching unroutable cells with
    /// the haversine estimate.
    fn convert_response(
        &self,
        locations: &[(f64, f64)],
        response: TableResponse,
    ) -> Result<DistanceMatrix, MatrixFetchError> {
        if response.code != "Ok" {
            return Err(MatrixFetchError::Service {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        let n = locations.len();
        let durations = response
            .durations
            .ok_or(MatrixFetchError::MissingAnnotation("duration"))?;
        let distances = response
            .distances
            .ok_or(MatrixFetchError::MissingAnnotation("distance"))?;
        if !is_square(&durations, n) || !is_square(&distances, n) {
            return Err(MatrixFetchError::Shape { expected: n });
        }

        let mut patched = 0;
        let matrix = DistanceMatrix::from_fn(n, |i, j| {
            match (valid(durations[i][j]), valid(distances[i][j])) {
                (Some(seconds), Some(meters)) => DistanceCell::new(meters / 1000.0, seconds / 60.0),
                _ => {
                    patched += 1;
                    self.fallback.estimate(locations[i], locations[j])
                }
            }
        });

        if patched > 0 {
            debug!(patched, "unroutable OSRM pairs replaced with haversine estimates");
        }
        Ok(matrix)
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> DistanceMatrix {
        if locations.len() < 2 {
            return DistanceMatrix::zeros(locations.len());
        }

        let result = self
            .fetch_table(locations)
            .and_then(|response| self.convert_response(locations, response));

        match result {
            Ok(matrix) => matrix,
            Err(err) => {
                warn!(error = %err, "OSRM table failed, falling back to haversine");
                self.fallback.matrix_for(locations)
            }
        }
    }
}

fn is_square(rows: &[Vec<Option<f64>>], n: usize) -> bool {
    rows.len() == n && rows.iter().all(|row| row.len() == n)
}

fn valid(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

/// OSRM Table service response. Cells are `null` when no route exists.
#[derive(Debug, Deserialize)]
struct TableResponse {
    code: String,
    message: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}
