//! The topology interface the averaging kernels consume.
//!
//! A mesh answers four kinds of questions: how many points and cells it has,
//! which points a cell touches, which cells touch a point, and whether a cell
//! is visible. Everything else about the mesh (geometry, rendering, pipeline
//! plumbing) is invisible to the kernels.

use super::cell_type::{CellDimension, CellType};
use super::ghost;
use super::links::CellLinks;
use super::{CellIdx, PointIdx};

/// Concrete dataset family. Selects the averaging path.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DataSetKind {
    /// Arbitrary cells of any dimension.
    UnstructuredGrid,
    /// Vertices, lines, polygons and strips only.
    PolyData,
    /// Curvilinear grid with implicit topology.
    StructuredGrid,
    /// Axis-aligned image grid with implicit topology.
    UniformGrid,
}

impl DataSetKind {
    /// True for datasets with explicit connectivity.
    #[inline]
    pub fn is_unstructured(self) -> bool {
        matches!(self, DataSetKind::UnstructuredGrid | DataSetKind::PolyData)
    }

    /// Largest cell dimension the dataset family can hold.
    #[inline]
    pub fn max_cell_dimension(self) -> u8 {
        match self {
            DataSetKind::PolyData => 2,
            _ => 3,
        }
    }
}

/// Point/cell adjacency of a mesh.
///
/// Index arguments must be in range; implementations panic otherwise, the same
/// way slice indexing does. Query methods that return lists fill a caller
/// supplied buffer so hot loops can reuse one allocation.
pub trait MeshTopology: Sync {
    /// Dataset family.
    fn kind(&self) -> DataSetKind;

    /// Number of points.
    fn n_points(&self) -> usize;

    /// Number of cells.
    fn n_cells(&self) -> usize;

    /// Type of `cell`.
    fn cell_type(&self, cell: CellIdx) -> CellType;

    /// Replace the contents of `out` with the points of `cell`.
    fn cell_points(&self, cell: CellIdx, out: &mut Vec<PointIdx>);

    /// Replace the contents of `out` with the cells incident to `point`.
    fn point_cells(&self, point: PointIdx, out: &mut Vec<CellIdx>);

    /// Ghost flags of `cell` (see [`ghost`]).
    fn cell_ghost(&self, _cell: CellIdx) -> u8 {
        0
    }

    /// False if `cell` is blanked.
    fn is_cell_visible(&self, cell: CellIdx) -> bool {
        !ghost::is_hidden_cell(self.cell_ghost(cell))
    }

    /// True if any cell may report `is_cell_visible == false`.
    fn has_any_blank_cells(&self) -> bool {
        false
    }

    /// Prebuilt point→cell links, if the mesh keeps them.
    fn links(&self) -> Option<&CellLinks> {
        None
    }

    /// Dimension of `cell`, a pure function of its type.
    #[inline]
    fn cell_dimension(&self, cell: CellIdx) -> CellDimension {
        self.cell_type(cell).cell_dimension()
    }
}
