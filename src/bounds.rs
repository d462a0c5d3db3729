use crate::error::{CellListError, Result};

/// Axis-aligned bounding box in 3D space.
///
/// Both ends are inclusive: a coordinate lying exactly on `min` or `max`
/// is inside the box.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Computes the tight bounding box of a point set.
    ///
    /// Fails with [`CellListError::InvalidInput`] when `points` is empty or
    /// holds a non-finite coordinate.
    pub fn from_points(points: &[[f64; 3]]) -> Result<Self> {
        if points.is_empty() {
            return Err(CellListError::InvalidInput(
                "cannot compute the bounding box of an empty point set".to_string(),
            ));
        }

        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];

        for (i, p) in points.iter().enumerate() {
            for axis in 0..3 {
                let v = p[axis];
                if !v.is_finite() {
                    return Err(CellListError::InvalidInput(format!(
                        "point {} has a non-finite coordinate {:?}",
                        i, p
                    )));
                }
                if v < min[axis] { min[axis] = v; }
                if v > max[axis] { max[axis] = v; }
            }
        }

        Ok(Self { min, max })
    }

    /// Returns true if `coord` lies within the box on every axis, bounds included.
    pub fn contains(&self, coord: &[f64; 3]) -> bool {
        (0..3).all(|axis| coord[axis] >= self.min[axis] && coord[axis] <= self.max[axis])
    }

    /// Edge lengths of the box along each axis.
    pub fn extent(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}
