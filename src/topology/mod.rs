//! Mesh topology consumed by the averaging kernels.
//!
//! This module provides:
//! - [`MeshTopology`], the adjacency interface every mesh exposes
//! - [`UnstructuredMesh`] for unstructured grids and polygonal data
//! - [`StructuredGrid`] for structured/uniform grids with blanking
//! - [`CellLinks`], the prebuilt point→cell adjacency used by the fast path
//!
//! Points and cells are addressed by dense indices `0..n`.

pub mod cell_type;
pub mod ghost;
pub mod links;
pub mod mesh;
pub mod structured;
pub mod unstructured;

/// Dense index of a mesh point.
pub type PointIdx = usize;
/// Dense index of a mesh cell.
pub type CellIdx = usize;

pub use cell_type::{CellDimension, CellType};
pub use links::CellLinks;
pub use mesh::{DataSetKind, MeshTopology};
pub use structured::StructuredGrid;
pub use unstructured::UnstructuredMesh;
