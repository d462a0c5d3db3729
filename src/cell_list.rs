use crate::adjacency::AdjacencyMatrix;
use crate::bounds::BoundingBox;
use crate::cell_store::CellStore;
use crate::distance::distance_iter;
use crate::error::{CellListError, Result};
use crate::hits::Hits;
use crate::index::SpatialIndex;
use crate::indexer::{GridIndexer, GridShape};
use rayon::prelude::*;
use std::cell::Cell;
use tracing::{debug, info_span};

/// A uniform cell list over an immutable set of 3D points.
///
/// The bounding box of the points is divided into cubic cells of edge
/// `cell_size`, and every point index is stored in the cell containing it.
/// Neighbor queries then only inspect the cells around the query location
/// instead of scanning every point:
///
/// - [`CellList::query_box`] returns all points in the cube of cells within a
///   given number of cells of the query cell.
/// - [`CellList::query_radius`] derives the smallest such cube covering a sphere
///   and keeps only candidates within the exact Euclidean radius.
///
/// The structure never changes after construction, so it can be queried from
/// many threads at once.
#[derive(Clone, Debug)]
pub struct CellList {
    points: Vec<[f64; 3]>,
    indexer: GridIndexer,
    store: CellStore,
}

/// Collects the construction parameters of a [`CellList`].
#[derive(Clone, Debug, Default)]
pub struct CellListBuilder {
    points: Vec<[f64; 3]>,
    cell_size: Option<f64>,
    selection: Option<Vec<bool>>,
}

impl CellListBuilder {
    pub fn new(points: impl Into<Vec<[f64; 3]>>) -> Self {
        Self {
            points: points.into(),
            cell_size: None,
            selection: None,
        }
    }

    /// Edge length of the cubic cells.
    pub fn cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    /// Only points whose entry is `true` are stored and can be found by queries.
    ///
    /// The bounding box still spans all points, and returned indices always
    /// refer to the full point sequence.
    pub fn selection(mut self, selection: impl Into<Vec<bool>>) -> Self {
        self.selection = Some(selection.into());
        self
    }

    pub fn build(self) -> Result<CellList> {
        let cell_size = self.cell_size.ok_or_else(|| {
            CellListError::InvalidConfiguration("no cell size given".to_string())
        })?;
        if !(cell_size > 0.0) {
            return Err(CellListError::InvalidConfiguration(format!(
                "cell size must be positive, got {}",
                cell_size
            )));
        }
        if let Some(selection) = &self.selection {
            if selection.len() != self.points.len() {
                return Err(CellListError::InvalidInput(format!(
                    "selection has {} entries but there are {} points",
                    selection.len(),
                    self.points.len()
                )));
            }
        }

        let _span = info_span!("CellList::build", n_points = self.points.len(), cell_size).entered();

        let bounds = BoundingBox::from_points(&self.points)?;
        let indexer = GridIndexer::new(bounds, cell_size)?;
        let mut store = CellStore::new(indexer.shape())?;

        for (i, p) in self.points.iter().enumerate() {
            if let Some(selection) = &self.selection {
                if !selection[i] {
                    continue;
                }
            }
            store.append(indexer.cell_index(p), i);
        }

        debug!(
            shape = ?indexer.shape(),
            cells = indexer.shape().cell_count(),
            indexed = store.len(),
            max_population = store.max_population(),
            "cell list built"
        );

        Ok(CellList {
            points: self.points,
            indexer,
            store,
        })
    }
}

impl CellList {
    /// Builds a cell list over all `points` with cubic cells of edge `cell_size`.
    ///
    /// Fails with [`CellListError::InvalidConfiguration`] for a non-positive cell
    /// size and with [`CellListError::InvalidInput`] for an empty point set or
    /// non-finite coordinates.
    pub fn new(points: impl Into<Vec<[f64; 3]>>, cell_size: f64) -> Result<Self> {
        CellListBuilder::new(points).cell_size(cell_size).build()
    }

    /// Builds a cell list from a flat array `[x0, y0, z0, x1, y1, z1, ...]`.
    pub fn from_flat(coords: &[f64], cell_size: f64) -> Result<Self> {
        Self::new(points_from_flat(coords)?, cell_size)
    }

    pub fn builder(points: impl Into<Vec<[f64; 3]>>) -> CellListBuilder {
        CellListBuilder::new(points)
    }

    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Number of points the list was built over, selected or not.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> &BoundingBox {
        self.indexer.bounds()
    }

    pub fn cell_size(&self) -> f64 {
        self.indexer.cell_size()
    }

    pub fn shape(&self) -> GridShape {
        self.indexer.shape()
    }

    pub fn indexer(&self) -> &GridIndexer {
        &self.indexer
    }

    pub fn cells(&self) -> &CellStore {
        &self.store
    }

    /// Population of the fullest cell.
    pub fn max_population(&self) -> usize {
        self.store.max_population()
    }

    /// Returns true if `coord` can be used as a query center.
    pub fn in_bounds(&self, coord: &[f64; 3]) -> bool {
        self.indexer.in_bounds(coord)
    }

    /// Scratch length needed by [`CellList::query_box_into`] for `box_radius`.
    ///
    /// This is `(2 * box_radius + 1)^3 * max_population`, with `box_radius` capped
    /// at the largest grid dimension since a wider cube visits no further cells.
    /// Saturates at `usize::MAX`.
    pub fn buffer_len(&self, box_radius: usize) -> usize {
        let r = box_radius.min(self.shape().max_dim());
        r.checked_mul(2)
            .and_then(|w| w.checked_add(1))
            .and_then(|w| w.checked_mul(w)?.checked_mul(w))
            .and_then(|cells| cells.checked_mul(self.max_population()))
            .unwrap_or(usize::MAX)
    }

    /// Box radius whose cube of cells covers a sphere of `radius`.
    ///
    /// Returns `floor(radius / cell_size) + 1`, capped at the largest grid
    /// dimension, or `None` when `radius` is negative or NaN and no point can
    /// be within it.
    pub fn box_radius_for(&self, radius: f64) -> Option<usize> {
        if !(radius >= 0.0) {
            return None;
        }
        let max_dim = self.shape().max_dim();
        let r = (radius / self.cell_size()).floor() + 1.0;
        if r >= max_dim as f64 {
            Some(max_dim)
        } else {
            Some(r as usize)
        }
    }

    /// All indexed points whose cell lies within `box_radius` cells of the cell
    /// of `center` along every axis.
    ///
    /// No distance filtering takes place. Cells are visited with `i` ascending,
    /// then `j`, then `k`, and each cell yields its points in insertion order.
    pub fn query_box(&self, center: &[f64; 3], box_radius: usize) -> Result<Vec<usize>> {
        let cell = self.indexer.try_cell_index(center)?;
        let mut out = Vec::with_capacity(self.count_box(cell, box_radius));
        self.for_each_cell(cell, box_radius, |bin| out.extend_from_slice(bin));
        Ok(out)
    }

    /// Like [`CellList::query_box`], but writes into `buffer` and returns the
    /// number of entries written.
    ///
    /// `buffer` must hold at least [`CellList::buffer_len`] entries for
    /// `box_radius`, otherwise this fails with [`CellListError::BufferSize`].
    /// Reusing one buffer across calls avoids allocation; concurrent callers each
    /// need their own buffer.
    pub fn query_box_into(&self, center: &[f64; 3], box_radius: usize, buffer: &mut [usize]) -> Result<usize> {
        let cell = self.indexer.try_cell_index(center)?;
        self.check_buffer(box_radius, buffer.len())?;
        Ok(self.fill_box(cell, box_radius, buffer))
    }

    /// Runs [`CellList::query_box_into`] when a scratch buffer is given and
    /// [`CellList::query_box`] otherwise.
    pub fn query_box_with<'a>(
        &self,
        center: &[f64; 3],
        box_radius: usize,
        scratch: Option<&'a mut [usize]>,
    ) -> Result<Hits<'a>> {
        match scratch {
            Some(buffer) => {
                let len = self.query_box_into(center, box_radius, buffer)?;
                let filled: &'a [usize] = buffer;
                Ok(Hits::Scratch(&filled[..len]))
            }
            None => self.query_box(center, box_radius).map(Hits::Owned),
        }
    }

    /// Mask of length [`CellList::len`] marking the result of [`CellList::query_box`].
    pub fn query_box_mask(&self, center: &[f64; 3], box_radius: usize) -> Result<Vec<bool>> {
        Ok(self.to_mask(&self.query_box(center, box_radius)?))
    }

    /// Runs [`CellList::query_box`] for every center in parallel.
    ///
    /// Each worker gathers into its own reused buffer. Fails as a whole if any
    /// center lies outside the bounding box.
    pub fn query_box_many(&self, centers: &[[f64; 3]], box_radius: usize) -> Result<Vec<Vec<usize>>> {
        let _span = info_span!("CellList::query_box_many", centers = centers.len(), box_radius).entered();
        centers
            .par_iter()
            .map_init(
                Vec::new,
                |scratch: &mut Vec<usize>, center| -> Result<Vec<usize>> {
                    let cell = self.indexer.try_cell_index(center)?;
                    self.gather_box(cell, box_radius, scratch);
                    Ok(scratch.as_slice().to_vec())
                },
            )
            .collect()
    }

    /// All indexed points within Euclidean distance `radius` of `center`, bounds
    /// included.
    ///
    /// Candidates come from [`CellList::query_box`] with the box radius from
    /// [`CellList::box_radius_for`] and are then filtered by exact distance. The
    /// result keeps the candidate order.
    pub fn query_radius(&self, center: &[f64; 3], radius: f64) -> Result<Vec<usize>> {
        let cell = self.indexer.try_cell_index(center)?;
        let Some(box_radius) = self.box_radius_for(radius) else {
            return Ok(Vec::new());
        };

        let mut candidates = Vec::with_capacity(self.count_box(cell, box_radius));
        self.for_each_cell(cell, box_radius, |bin| candidates.extend_from_slice(bin));
        Ok(self.filter_radius(candidates.iter().copied(), center, radius).collect())
    }

    /// Like [`CellList::query_radius`], but writes into `buffer` and returns the
    /// number of entries written.
    ///
    /// `buffer` must hold at least [`CellList::buffer_len`] entries for the box
    /// radius derived from `radius`.
    pub fn query_radius_into(&self, center: &[f64; 3], radius: f64, buffer: &mut [usize]) -> Result<usize> {
        let cell = self.indexer.try_cell_index(center)?;
        let Some(box_radius) = self.box_radius_for(radius) else {
            return Ok(0);
        };
        self.check_buffer(box_radius, buffer.len())?;

        let candidates = self.fill_box(cell, box_radius, buffer);

        // Compact in place: slot `kept` is only written after position `kept`
        // has been read.
        let slots = Cell::from_mut(&mut buffer[..candidates]).as_slice_of_cells();
        let mut kept = 0;
        for i in self.filter_radius(slots.iter().map(Cell::get), center, radius) {
            slots[kept].set(i);
            kept += 1;
        }
        Ok(kept)
    }

    /// Runs [`CellList::query_radius_into`] when a scratch buffer is given and
    /// [`CellList::query_radius`] otherwise.
    pub fn query_radius_with<'a>(
        &self,
        center: &[f64; 3],
        radius: f64,
        scratch: Option<&'a mut [usize]>,
    ) -> Result<Hits<'a>> {
        match scratch {
            Some(buffer) => {
                let len = self.query_radius_into(center, radius, buffer)?;
                let filled: &'a [usize] = buffer;
                Ok(Hits::Scratch(&filled[..len]))
            }
            None => self.query_radius(center, radius).map(Hits::Owned),
        }
    }

    /// Mask of length [`CellList::len`] marking the result of [`CellList::query_radius`].
    pub fn query_radius_mask(&self, center: &[f64; 3], radius: f64) -> Result<Vec<bool>> {
        Ok(self.to_mask(&self.query_radius(center, radius)?))
    }

    /// Runs [`CellList::query_radius`] for every center in parallel.
    ///
    /// Each worker reuses its own candidate buffer. Fails as a whole if any
    /// center lies outside the bounding box.
    pub fn query_radius_many(&self, centers: &[[f64; 3]], radius: f64) -> Result<Vec<Vec<usize>>> {
        let _span = info_span!("CellList::query_radius_many", centers = centers.len(), radius).entered();
        let box_radius = self.box_radius_for(radius);

        centers
            .par_iter()
            .map_init(
                Vec::new,
                |candidates: &mut Vec<usize>, center| -> Result<Vec<usize>> {
                    let cell = self.indexer.try_cell_index(center)?;
                    let Some(box_radius) = box_radius else {
                        return Ok(Vec::new());
                    };
                    self.gather_box(cell, box_radius, candidates);
                    Ok(self.filter_radius(candidates.iter().copied(), center, radius).collect())
                },
            )
            .collect()
    }

    /// Dense adjacency of the point set: entry `(i, j)` is set if point `j` is
    /// indexed and lies within `threshold` of point `i`.
    pub fn adjacency_matrix(&self, threshold: f64) -> Result<AdjacencyMatrix> {
        let rows = self.query_radius_many(&self.points, threshold)?;
        let mut matrix = AdjacencyMatrix::new(self.len());
        for (i, row) in rows.iter().enumerate() {
            for &j in row {
                matrix.set(i, j);
            }
        }
        Ok(matrix)
    }

    fn check_buffer(&self, box_radius: usize, actual: usize) -> Result<()> {
        let required = self.buffer_len(box_radius);
        if actual < required {
            return Err(CellListError::BufferSize {
                box_radius,
                required,
                actual,
            });
        }
        Ok(())
    }

    fn to_mask(&self, indices: &[usize]) -> Vec<bool> {
        let mut mask = vec![false; self.len()];
        for &i in indices {
            mask[i] = true;
        }
        mask
    }

    /// Keeps the candidates within Euclidean distance `radius` of `center`, in
    /// candidate order. Every radius query filters through here.
    fn filter_radius<'a, I>(&'a self, candidates: I, center: &'a [f64; 3], radius: f64) -> impl Iterator<Item = usize> + 'a
    where
        I: Iterator<Item = usize> + Clone + 'a,
    {
        let coords = candidates.clone().map(move |i| self.points[i]);
        candidates
            .zip(distance_iter(coords, center))
            .filter(move |&(_, d)| d <= radius)
            .map(|(i, _)| i)
    }

    fn gather_box(&self, cell: [usize; 3], box_radius: usize, out: &mut Vec<usize>) {
        out.clear();
        self.for_each_cell(cell, box_radius, |bin| out.extend_from_slice(bin));
    }

    fn count_box(&self, cell: [usize; 3], box_radius: usize) -> usize {
        let mut count = 0;
        self.for_each_cell(cell, box_radius, |bin| count += bin.len());
        count
    }

    fn fill_box(&self, cell: [usize; 3], box_radius: usize, buffer: &mut [usize]) -> usize {
        let mut len = 0;
        self.for_each_cell(cell, box_radius, |bin| {
            buffer[len..len + bin.len()].copy_from_slice(bin);
            len += bin.len();
        });
        len
    }

    /// Visits the contents of every cell `(i + di, j + dj, k + dk)` with offsets
    /// in `[-box_radius, box_radius]` that lies inside the grid, `i` outermost.
    ///
    /// Clamping the offset ranges to the grid skips exactly the out-of-range
    /// neighbors, without wrapping.
    fn for_each_cell<F>(&self, [ci, cj, ck]: [usize; 3], box_radius: usize, mut visitor: F)
    where
        F: FnMut(&[usize]),
    {
        let shape = self.shape();
        let span = |c: usize, dim: usize| c.saturating_sub(box_radius)..=c.saturating_add(box_radius).min(dim - 1);

        for i in span(ci, shape.nx) {
            for j in span(cj, shape.ny) {
                for k in span(ck, shape.nz) {
                    visitor(self.store.contents([i, j, k]));
                }
            }
        }
    }
}

impl SpatialIndex for CellList {
    fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    fn query_radius(&self, center: &[f64; 3], radius: f64) -> Result<Vec<usize>> {
        CellList::query_radius(self, center, radius)
    }
}

/// Splits a flat coordinate array into points.
pub fn points_from_flat(coords: &[f64]) -> Result<Vec<[f64; 3]>> {
    if coords.len() % 3 != 0 {
        return Err(CellListError::InvalidInput(format!(
            "flat coordinate array has length {}, which is not a multiple of 3",
            coords.len()
        )));
    }
    Ok(coords.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}
