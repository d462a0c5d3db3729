use crate::error::Result;

/// Trait shared by the neighbor search structures.
/// This allows swapping the cell list for a linear scan, e.g. to cross-check results.
pub trait SpatialIndex: Send + Sync {
    /// The indexed point set, in original order.
    fn points(&self) -> &[[f64; 3]];

    /// Indices of all points within Euclidean distance `radius` of `center`.
    ///
    /// The order of the result is implementation defined.
    fn query_radius(&self, center: &[f64; 3], radius: f64) -> Result<Vec<usize>>;
}
