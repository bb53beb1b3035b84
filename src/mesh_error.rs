//! MeshError: Unified error type for cell2point public APIs
//!
//! This error type is used throughout the library to provide robust,
//! non-panicking error handling for topology construction, attribute
//! allocation and the averaging kernels.

use crate::data::scalar::ScalarType;
use crate::topology::cell_type::CellType;
use crate::topology::mesh::DataSetKind;
use thiserror::Error;

/// Unified error type for cell2point operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A point index past the end of the mesh.
    #[error("point {point} out of range (mesh has {n_points} points)")]
    PointOutOfRange { point: usize, n_points: usize },
    /// A cell index past the end of the mesh.
    #[error("cell {cell} out of range (mesh has {n_cells} cells)")]
    CellOutOfRange { cell: usize, n_cells: usize },
    /// Cell offsets do not describe the connectivity buffer.
    #[error("connectivity mismatch: offsets describe {expected} entries, found {found}")]
    ConnectivityMismatch { expected: usize, found: usize },
    /// Per-cell metadata (types, ghosts, faces) has the wrong length.
    #[error("cell metadata length mismatch for `{what}`: expected {expected}, found {found}")]
    CellMetadataMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// The dataset family cannot hold this cell type.
    #[error("cell type {cell_type:?} is not allowed in {kind:?}")]
    UnsupportedCellType {
        cell_type: CellType,
        kind: DataSetKind,
    },
    /// A polyhedron needs at least one non-empty face.
    #[error("polyhedron cell has no faces")]
    EmptyPolyhedron,
    /// An attribute array does not hold one tuple per element.
    #[error("array `{name}` has {found} tuples, expected {expected}")]
    ArrayLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    /// Paired arrays disagree on their component count.
    #[error("array `{name}` has {found} components, expected {expected}")]
    ComponentMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    /// Attribute arrays need at least one component per tuple.
    #[error("array `{0}` must have at least one component")]
    ZeroComponents(String),
    /// Paired arrays disagree on their value type.
    #[error("scalar type mismatch: expected {}, found {}", expected.as_str(), found.as_str())]
    ScalarTypeMismatch {
        expected: ScalarType,
        found: ScalarType,
    },
    /// Interpolation weights and source ids differ in length.
    #[error("interpolation got {cells} source ids but {weights} weights")]
    WeightCountMismatch { cells: usize, weights: usize },
    /// A point of a blanked grid touches more cells than the grid topology allows.
    #[error("point {point} has {found} incident cells, limit is {limit}")]
    TooManyCellsPerPoint {
        point: usize,
        found: usize,
        limit: usize,
    },
    /// Structured grid dimensions must all be non-zero.
    #[error("invalid structured dimensions {0:?}")]
    InvalidDimensions([usize; 3]),
    /// Blanking/visibility arrays must match the element count.
    #[error("blanking array length mismatch: expected {expected}, found {found}")]
    BlankingLengthMismatch { expected: usize, found: usize },
    /// The worker pool could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(String),
    /// Point-to-cell links violate their structural invariants.
    #[error("invalid cell links: {0}")]
    InvalidLinks(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_context() {
        let err = MeshError::TooManyCellsPerPoint {
            point: 3,
            found: 9,
            limit: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("point 3") && msg.contains("limit is 8"), "{msg}");

        let err = MeshError::ScalarTypeMismatch {
            expected: ScalarType::F64,
            found: ScalarType::I32,
        };
        assert_eq!(err.to_string(), "scalar type mismatch: expected f64, found i32");
    }
}
