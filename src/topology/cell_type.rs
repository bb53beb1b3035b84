//! Cell type metadata for mesh cells.

use serde::{Deserialize, Serialize};

/// Common cell types for mesh elements.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum CellType {
    /// Placeholder cell with no points.
    #[default]
    Empty,
    /// 0D vertex.
    Vertex,
    /// 0D set of vertices.
    PolyVertex,
    /// 1D segment/edge.
    Segment,
    /// 1D chain of segments.
    PolyLine,
    /// 2D simplex (triangle).
    Triangle,
    /// 2D strip of triangles.
    TriangleStrip,
    /// 2D polygon.
    Polygon,
    /// 2D axis-aligned quad (structured ordering).
    Pixel,
    /// 2D tensor-product cell (quad).
    Quadrilateral,
    /// 3D simplex (tet).
    Tetrahedron,
    /// 3D axis-aligned hex (structured ordering).
    Voxel,
    /// 3D tensor-product cell (hex).
    Hexahedron,
    /// 3D wedge/prism.
    Prism,
    /// 3D pyramid.
    Pyramid,
    /// Generic polyhedron described by a face stream.
    Polyhedron,
}

impl CellType {
    /// Returns the topological dimension of the cell.
    ///
    /// `Empty` reports dimension 0 so it never raises a dataset maximum.
    pub fn dimension(self) -> u8 {
        self.cell_dimension().index() as u8
    }

    /// Dimension as a [`CellDimension`] tag.
    pub fn cell_dimension(self) -> CellDimension {
        match self {
            CellType::Empty | CellType::Vertex | CellType::PolyVertex => CellDimension::Point,
            CellType::Segment | CellType::PolyLine => CellDimension::Line,
            CellType::Triangle
            | CellType::TriangleStrip
            | CellType::Polygon
            | CellType::Pixel
            | CellType::Quadrilateral => CellDimension::Surface,
            CellType::Tetrahedron
            | CellType::Voxel
            | CellType::Hexahedron
            | CellType::Prism
            | CellType::Pyramid
            | CellType::Polyhedron => CellDimension::Volume,
        }
    }

    /// True for the placeholder type.
    #[inline]
    pub fn is_empty(self) -> bool {
        self == CellType::Empty
    }
}

/// Topological dimension of a cell, bounded by geometry.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum CellDimension {
    Point = 0,
    Line = 1,
    Surface = 2,
    Volume = 3,
}

impl CellDimension {
    /// Number of distinct dimensions.
    pub const COUNT: usize = 4;

    /// All dimensions, highest first.
    pub const DESCENDING: [CellDimension; 4] = [
        CellDimension::Volume,
        CellDimension::Surface,
        CellDimension::Line,
        CellDimension::Point,
    ];

    /// Slot index in `0..COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}
