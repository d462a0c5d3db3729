use crate::cell_list::{points_from_flat, CellList};
use js_sys::{Array, Uint32Array};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

/// WASM wrapper for [`CellList`].
///
/// Coordinates are passed as flat arrays `[x0, y0, z0, x1, ...]` and point
/// indices are returned as `Uint32Array`s.
#[wasm_bindgen(js_name = CellList)]
pub struct CellListJs {
    inner: CellList,
}

#[wasm_bindgen(js_class = CellList)]
impl CellListJs {
    #[wasm_bindgen(constructor)]
    pub fn new(coords: &[f64], cell_size: f64) -> Result<CellListJs, JsError> {
        Ok(CellListJs {
            inner: CellList::from_flat(coords, cell_size)?,
        })
    }

    /// Builds a cell list that only indexes points whose `selection` entry is non-zero.
    #[wasm_bindgen(js_name = withSelection)]
    pub fn with_selection(coords: &[f64], cell_size: f64, selection: &[u8]) -> Result<CellListJs, JsError> {
        let inner = CellList::builder(points_from_flat(coords)?)
            .cell_size(cell_size)
            .selection(selection.iter().map(|&s| s != 0).collect::<Vec<_>>())
            .build()?;
        Ok(CellListJs { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn count_points(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter)]
    pub fn cell_size(&self) -> f64 {
        self.inner.cell_size()
    }

    #[wasm_bindgen(getter)]
    pub fn max_population(&self) -> usize {
        self.inner.max_population()
    }

    /// Grid shape as `[nx, ny, nz]`.
    #[wasm_bindgen(getter)]
    pub fn shape(&self) -> Vec<u32> {
        let s = self.inner.shape();
        vec![s.nx as u32, s.ny as u32, s.nz as u32]
    }

    /// Bounding box as `[min_x, min_y, min_z, max_x, max_y, max_z]`.
    #[wasm_bindgen(getter)]
    pub fn bounds(&self) -> Vec<f64> {
        let b = self.inner.bounds();
        vec![b.min[0], b.min[1], b.min[2], b.max[0], b.max[1], b.max[2]]
    }

    #[wasm_bindgen(js_name = queryBox)]
    pub fn query_box(&self, x: f64, y: f64, z: f64, box_radius: usize) -> Result<Vec<u32>, JsError> {
        Ok(to_u32(&self.inner.query_box(&[x, y, z], box_radius)?))
    }

    #[wasm_bindgen(js_name = queryRadius)]
    pub fn query_radius(&self, x: f64, y: f64, z: f64, radius: f64) -> Result<Vec<u32>, JsError> {
        Ok(to_u32(&self.inner.query_radius(&[x, y, z], radius)?))
    }

    /// Result of `queryRadius` as a mask with one byte per point.
    #[wasm_bindgen(js_name = queryRadiusMask)]
    pub fn query_radius_mask(&self, x: f64, y: f64, z: f64, radius: f64) -> Result<Vec<u8>, JsError> {
        let mask = self.inner.query_radius_mask(&[x, y, z], radius)?;
        Ok(mask.into_iter().map(u8::from).collect())
    }

    /// Runs `queryRadius` for every center of a flat array, returning one
    /// `Uint32Array` per center.
    #[wasm_bindgen(js_name = queryRadiusMany)]
    pub fn query_radius_many(&self, centers: &[f64], radius: f64) -> Result<Array, JsError> {
        let centers = points_from_flat(centers)?;
        let results = self.inner.query_radius_many(&centers, radius)?;
        Ok(results
            .iter()
            .map(|hits| Uint32Array::from(to_u32(hits).as_slice()))
            .collect())
    }
}

fn to_u32(indices: &[usize]) -> Vec<u32> {
    indices.iter().map(|&i| i as u32).collect()
}
