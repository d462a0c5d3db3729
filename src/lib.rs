//! # cellgrid
//!
//! `cellgrid` is a Rust library for fixed-radius neighbor queries over static 3D point sets,
//! such as the atom positions of a molecule. It can be used in Rust as well as compiled to
//! WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Cell Lists**: Points are binned once into a uniform grid of cubic cells; queries only
//!   visit the cells around the query location, so their cost depends on local density rather
//!   than on the total number of points.
//! - **Exact Results**: Radius queries prune with a cube of cells and then filter by exact
//!   Euclidean distance. Results match a brute-force scan.
//! - **Buffer Reuse**: Every query comes in an allocating form and a form writing into a
//!   caller-owned scratch buffer.
//! - **Batch Queries**: Many centers can be queried in parallel with `rayon`.
//! - **WASM-first**: Built with `wasm-bindgen` for use from JavaScript and TypeScript.
//!
//! ## Example
//!
//! ```
//! use cellgrid::CellList;
//!
//! let points = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [10.0, 10.0, 10.0]];
//! let list = CellList::new(points, 5.0).unwrap();
//!
//! let mut near = list.query_radius(&[0.0, 0.0, 0.0], 2.0).unwrap();
//! near.sort_unstable();
//! assert_eq!(near, vec![0, 1]);
//! ```
//!
//! ## Main Interface
//!
//! The primary entry point is the [`CellList`] struct, built with [`CellList::new`] or
//! [`CellListBuilder`].

mod adjacency;
mod bounds;
mod brute_force;
mod cell_list;
mod cell_store;
pub mod distance;
mod error;
mod hits;
mod index;
mod indexer;
mod wasm;

pub use adjacency::AdjacencyMatrix;
pub use bounds::BoundingBox;
pub use brute_force::BruteForce;
pub use cell_list::CellList;
pub use cell_list::CellListBuilder;
pub use cell_list::points_from_flat;
pub use cell_store::CellStore;
pub use error::CellListError;
pub use error::Result;
pub use hits::Hits;
pub use index::SpatialIndex;
pub use indexer::GridIndexer;
pub use indexer::GridShape;
pub use wasm::CellListJs;
