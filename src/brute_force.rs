use crate::distance::distance;
use crate::error::Result;
use crate::index::SpatialIndex;

/// Linear scan over all points.
///
/// Every query costs `O(n)`. Useful as a reference for [`crate::CellList`] and
/// for very small point sets where building a grid does not pay off.
#[derive(Clone, Debug, Default)]
pub struct BruteForce {
    points: Vec<[f64; 3]>,
}

impl BruteForce {
    pub fn new(points: impl Into<Vec<[f64; 3]>>) -> Self {
        Self { points: points.into() }
    }
}

impl SpatialIndex for BruteForce {
    fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    fn query_radius(&self, center: &[f64; 3], radius: f64) -> Result<Vec<usize>> {
        Ok(distance(&self.points, center)
            .into_iter()
            .enumerate()
            .filter(|&(_, d)| d <= radius)
            .map(|(i, _)| i)
            .collect())
    }
}
