use crate::bounds::BoundingBox;
use crate::error::{CellListError, Result};

/// Number of cells along each axis of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridShape {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridShape {
    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Cell count along the given axis (0 = x, 1 = y, 2 = z).
    pub fn dim(&self, axis: usize) -> usize {
        match axis {
            0 => self.nx,
            1 => self.ny,
            _ => self.nz,
        }
    }

    /// Largest cell count along any axis.
    pub fn max_dim(&self) -> usize {
        self.nx.max(self.ny).max(self.nz)
    }

    /// Linear index of the cell `(i, j, k)`.
    pub fn linear(&self, [i, j, k]: [usize; 3]) -> usize {
        i + j * self.nx + k * self.nx * self.ny
    }

    /// Returns true if `(i, j, k)` addresses a cell of the grid.
    pub fn in_grid(&self, [i, j, k]: [usize; 3]) -> bool {
        i < self.nx && j < self.ny && k < self.nz
    }

    /// Returns true if the signed cell coordinate lies inside the grid.
    pub fn contains(&self, [i, j, k]: [isize; 3]) -> bool {
        i >= 0 && i < self.nx as isize &&
        j >= 0 && j < self.ny as isize &&
        k >= 0 && k < self.nz as isize
    }
}

/// Maps coordinates to the integer coordinates of the cell containing them.
///
/// The mapping is fixed by the bounding box and the cell size at construction.
/// Along each axis there are `floor((max - min) / cell_size) + 1` cells, so a
/// point lying exactly on `max` still falls into the last cell.
#[derive(Clone, Copy, Debug)]
pub struct GridIndexer {
    bounds: BoundingBox,
    cell_size: f64,
    shape: GridShape,
}

impl GridIndexer {
    /// Creates an indexer over `bounds` with cubic cells of edge `cell_size`.
    ///
    /// Fails with [`CellListError::InvalidConfiguration`] if `cell_size` is not
    /// a positive finite number or the resulting cell count overflows.
    pub fn new(bounds: BoundingBox, cell_size: f64) -> Result<Self> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(CellListError::InvalidConfiguration(format!(
                "cell size must be positive and finite, got {}",
                cell_size
            )));
        }

        let extent = bounds.extent();
        let mut dims = [0usize; 3];
        for axis in 0..3 {
            let steps = (extent[axis] / cell_size).floor();
            // `as usize` saturates, so anything this large cannot be allocated anyway.
            if steps >= usize::MAX as f64 {
                return Err(too_many_cells(cell_size));
            }
            dims[axis] = (steps as usize).checked_add(1).ok_or_else(|| too_many_cells(cell_size))?;
        }

        let shape = GridShape { nx: dims[0], ny: dims[1], nz: dims[2] };
        dims[0]
            .checked_mul(dims[1])
            .and_then(|n| n.checked_mul(dims[2]))
            .ok_or_else(|| too_many_cells(cell_size))?;

        Ok(Self { bounds, cell_size, shape })
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Returns true if `coord` lies inside the bounding box, bounds included.
    pub fn in_bounds(&self, coord: &[f64; 3]) -> bool {
        self.bounds.contains(coord)
    }

    /// Cell coordinate `(i, j, k)` of `coord`.
    ///
    /// The caller must have checked [`GridIndexer::in_bounds`]; for such
    /// coordinates every component lies in `[0, dim)`.
    pub fn cell_index(&self, coord: &[f64; 3]) -> [usize; 3] {
        let mut cell = [0usize; 3];
        for axis in 0..3 {
            let steps = ((coord[axis] - self.bounds.min[axis]) / self.cell_size).floor();
            cell[axis] = steps as usize;
        }
        debug_assert!(
            cell[0] < self.shape.nx && cell[1] < self.shape.ny && cell[2] < self.shape.nz,
            "cell {:?} outside grid {:?}",
            cell,
            self.shape
        );
        cell
    }

    /// Checked variant of [`GridIndexer::cell_index`].
    pub fn try_cell_index(&self, coord: &[f64; 3]) -> Result<[usize; 3]> {
        if !self.in_bounds(coord) {
            return Err(CellListError::OutOfRange {
                coord: *coord,
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }
        Ok(self.cell_index(coord))
    }
}

fn too_many_cells(cell_size: f64) -> CellListError {
    CellListError::InvalidConfiguration(format!(
        "cell size {} yields more cells than can be addressed",
        cell_size
    ))
}
