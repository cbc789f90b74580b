//! Pairwise distance/time matrix types.

use serde::{Deserialize, Serialize};

/// Travel distance and time between two stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceCell {
    pub distance_km: f64,
    pub time_minutes: f64,
}

impl DistanceCell {
    pub fn new(distance_km: f64, time_minutes: f64) -> Self {
        Self {
            distance_km,
            time_minutes,
        }
    }
}

/// Square matrix of [`DistanceCell`]s, indexed by stop order.
///
/// Row `i`, column `j` holds the trip from stop `i` to stop `j`. Cells need
/// not be symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    cells: Vec<Vec<DistanceCell>>,
}

impl DistanceMatrix {
    /// An `n`×`n` matrix of zero cells.
    pub fn zeros(n: usize) -> Self {
        Self {
            cells: vec![vec![DistanceCell::default(); n]; n],
        }
    }

    /// Builds a matrix by evaluating `cell` for every off-diagonal pair.
    /// Diagonal cells stay zero.
    pub fn from_fn(n: usize, mut cell: impl FnMut(usize, usize) -> DistanceCell) -> Self {
        let mut matrix = Self::zeros(n);
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix.cells[i][j] = cell(i, j);
                }
            }
        }
        matrix
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, from: usize, to: usize) -> DistanceCell {
        self.cells[from][to]
    }

    pub fn rows(&self) -> &[Vec<DistanceCell>] {
        &self.cells
    }
}

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
