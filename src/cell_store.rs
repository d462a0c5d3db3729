use crate::error::{CellListError, Result};
use crate::indexer::GridShape;

/// Per-cell storage of point indices.
///
/// Each cell owns a growable list of indices kept in insertion order. Lists grow
/// by amortized doubling, so filling the store with `n` points costs `O(n)`.
/// The store owns every list, and all of them are released together when the
/// store is dropped.
#[derive(Clone, Debug)]
pub struct CellStore {
    shape: GridShape,
    cells: Vec<Vec<usize>>,
    len: usize,
    max_population: usize,
}

impl CellStore {
    /// Allocates one empty list per cell of `shape`.
    ///
    /// Fails with [`CellListError::InvalidConfiguration`] if the cell table
    /// cannot be allocated.
    pub(crate) fn new(shape: GridShape) -> Result<Self> {
        let count = shape.cell_count();
        let mut cells = Vec::new();
        cells.try_reserve_exact(count).map_err(|e| {
            CellListError::InvalidConfiguration(format!(
                "cannot allocate {} cells for grid {:?}: {}",
                count, shape, e
            ))
        })?;
        cells.resize_with(count, Vec::new);

        Ok(Self {
            shape,
            cells,
            len: 0,
            max_population: 0,
        })
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Appends `point` to the list of `cell`, tracking the largest population.
    ///
    /// `cell` must lie inside the grid; the builder only passes cells computed
    /// by [`crate::GridIndexer::cell_index`] from in-bounds points.
    pub(crate) fn append(&mut self, cell: [usize; 3], point: usize) {
        let bin = &mut self.cells[self.shape.linear(cell)];
        bin.push(point);
        self.max_population = self.max_population.max(bin.len());
        self.len += 1;
    }

    /// Indices stored in `cell`, in insertion order.
    ///
    /// `cell` must lie inside the grid, see [`GridShape::in_grid`]. Use
    /// [`CellStore::get`] for unchecked cell coordinates.
    pub fn contents(&self, cell: [usize; 3]) -> &[usize] {
        debug_assert!(self.shape.in_grid(cell), "cell {:?} outside grid {:?}", cell, self.shape);
        &self.cells[self.shape.linear(cell)]
    }

    /// Number of indices stored in `cell`. Same precondition as [`CellStore::contents`].
    pub fn count(&self, cell: [usize; 3]) -> usize {
        self.contents(cell).len()
    }

    /// Indices stored in `cell`, or `None` if `cell` lies outside the grid.
    pub fn get(&self, cell: [usize; 3]) -> Option<&[usize]> {
        if !self.shape.in_grid(cell) {
            return None;
        }
        Some(&self.cells[self.shape.linear(cell)])
    }

    /// Population of the fullest cell.
    pub fn max_population(&self) -> usize {
        self.max_population
    }

    /// Total number of stored indices.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over all cells in linear order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.cells.iter().map(|bin| bin.as_slice())
    }
}
