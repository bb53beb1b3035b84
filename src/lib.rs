#![cfg_attr(docsrs, feature(doc_cfg))]
//! # cell2point
//!
//! cell2point maps per-cell attribute arrays onto mesh points. Each point
//! receives the mean of the values carried by the cells that touch it, with
//! policies for mixed-dimension meshes and support for blanked structured
//! grids.
//!
//! ## Features
//! - Point/cell topology interface ([`topology::MeshTopology`]) with
//!   unstructured-grid, polygonal and structured/uniform grid implementations
//! - Deterministic CSR point→cell links built once per mesh
//! - Typed attribute arrays over a closed set of numeric types, dispatched
//!   per array so every kernel runs in the array's native type
//! - Threaded averaging on a configurable rayon pool, with a serial fallback
//!   that produces identical results
//! - `Patch` and `DataSetMax` contributing-cell policies
//! - Progress reporting and cooperative cancellation
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! cell2point = "0.3"
//! # Optional features:
//! # default-features = false   # serial only, no rayon
//! # features = ["check-invariants"]
//! ```
//!
//! ## Determinism
//!
//! A point's value is summed over its cells in link order (ascending cell
//! index), so outputs are bit-identical across runs and worker counts for a
//! fixed mesh.
//!
//! ## Threads
//!
//! The threaded path uses the executor passed to
//! [`CellToPoint::with_executor`](algs::CellToPoint::with_executor), or the
//! process-wide one from [`algs::smp::global`]. The latter honours the
//! `CELL2POINT_MAX_THREADS` environment variable, capped at the hardware
//! concurrency.

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::cell_to_point::{
        AveragingPath, CellToPoint, CellToPointOptions, CellToPointOutput, Completion,
        ContributingCells,
    };
    pub use crate::algs::monitor::{AbortHandle, Monitor, NoMonitor};
    pub use crate::algs::smp::{Executor, SmpConfig};
    pub use crate::data::{
        ArrayList, AttributeArray, AttributeSet, Scalar, ScalarType, TaggedArray,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::{
        CellDimension, CellIdx, CellLinks, CellType, DataSetKind, MeshTopology, PointIdx,
        StructuredGrid, UnstructuredMesh,
    };
}
