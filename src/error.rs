use thiserror::Error;

/// Errors raised while building or querying a [`crate::CellList`].
///
/// Every failure is local and deterministic: a failed query never hands back
/// a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CellListError {
    /// The cell size is not a positive finite number, or it yields more cells
    /// than can be addressed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The point data is empty, malformed or contains non-finite values.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A query coordinate lies outside the bounding box fixed at construction.
    #[error("coordinate {coord:?} lies outside the bounding box {min:?}..={max:?}")]
    OutOfRange {
        coord: [f64; 3],
        min: [f64; 3],
        max: [f64; 3],
    },

    /// A caller supplied scratch buffer is too small for the requested box radius.
    #[error("scratch buffer holds {actual} indices but box radius {box_radius} needs {required}")]
    BufferSize {
        box_radius: usize,
        required: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, CellListError>;
