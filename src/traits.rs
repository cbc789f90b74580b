//! Core traits for the route optimizer.
//!
//! The optimizer only needs travel figures between stops; where they come
//! from is decided by whichever provider the caller constructs.

use crate::matrix::{DistanceCell, DistanceMatrix};

/// Provides a distance/time matrix for a set of locations.
///
/// The matrix is indexed by the provided location order. Implementations
/// are expected to recover from their own failures; the optimizer treats the
/// returned matrix as complete.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> DistanceMatrix;

    /// Travel from one location to another, as a 2×2 matrix lookup.
    fn distance(&self, from: (f64, f64), to: (f64, f64)) -> DistanceCell {
        self.matrix_for(&[from, to]).get(0, 1)
    }
}
