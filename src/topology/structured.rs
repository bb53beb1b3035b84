//! Implicit-topology grids with optional blanking.
//!
//! A grid of `dims = [nx, ny, nz]` points has `max(n - 1, 1)` cells along each
//! axis; axes with a single point are inactive and do not contribute to the
//! cell dimension. Point and cell indices run fastest along x.
//!
//! Blanking is carried by ghost flags: a cell is invisible if its own flags
//! carry `HIDDEN_CELL` or any of its points carries `HIDDEN_POINT`. No point
//! of a grid touches more than 8 cells.

use super::cell_type::CellType;
use super::ghost::{self, HIDDEN_CELL, HIDDEN_POINT};
use super::mesh::{DataSetKind, MeshTopology};
use super::{CellIdx, PointIdx};
use crate::mesh_error::MeshError;

/// Largest number of cells incident to one grid point (3D interior point).
pub const MAX_GRID_CELLS_PER_POINT: usize = 8;

/// Structured or uniform grid.
#[derive(Clone, Debug)]
pub struct StructuredGrid {
    kind: DataSetKind,
    dims: [usize; 3],
    point_ghosts: Option<Vec<u8>>,
    cell_ghosts: Option<Vec<u8>>,
}

impl StructuredGrid {
    fn with_kind(kind: DataSetKind, dims: [usize; 3]) -> Result<Self, MeshError> {
        if dims.contains(&0) {
            return Err(MeshError::InvalidDimensions(dims));
        }
        Ok(Self {
            kind,
            dims,
            point_ghosts: None,
            cell_ghosts: None,
        })
    }

    /// Curvilinear grid with `dims` points per axis.
    pub fn structured(dims: [usize; 3]) -> Result<Self, MeshError> {
        Self::with_kind(DataSetKind::StructuredGrid, dims)
    }

    /// Axis-aligned image grid with `dims` points per axis.
    pub fn uniform(dims: [usize; 3]) -> Result<Self, MeshError> {
        Self::with_kind(DataSetKind::UniformGrid, dims)
    }

    /// Points per axis.
    pub fn dimensions(&self) -> [usize; 3] {
        self.dims
    }

    /// Number of active axes (0..=3).
    pub fn data_dimension(&self) -> usize {
        self.dims.iter().filter(|&&d| d > 1).count()
    }

    fn cell_dims(&self) -> [usize; 3] {
        self.dims.map(|d| if d > 1 { d - 1 } else { 1 })
    }

    fn point_ijk(&self, point: PointIdx) -> [usize; 3] {
        let [nx, ny, _] = self.dims;
        [point % nx, (point / nx) % ny, point / (nx * ny)]
    }

    fn cell_ijk(&self, cell: CellIdx) -> [usize; 3] {
        let [cx, cy, _] = self.cell_dims();
        [cell % cx, (cell / cx) % cy, cell / (cx * cy)]
    }

    fn point_index(&self, ijk: [usize; 3]) -> PointIdx {
        let [nx, ny, _] = self.dims;
        ijk[0] + ijk[1] * nx + ijk[2] * nx * ny
    }

    fn cell_index(&self, ijk: [usize; 3]) -> CellIdx {
        let [cx, cy, _] = self.cell_dims();
        ijk[0] + ijk[1] * cx + ijk[2] * cx * cy
    }

    fn active_axes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..3).filter(move |&a| self.dims[a] > 1)
    }

    /// Install per-point ghost flags.
    pub fn set_point_ghosts(&mut self, flags: Vec<u8>) -> Result<(), MeshError> {
        if flags.len() != self.n_points() {
            return Err(MeshError::BlankingLengthMismatch {
                expected: self.n_points(),
                found: flags.len(),
            });
        }
        self.point_ghosts = Some(flags);
        Ok(())
    }

    /// Install per-cell ghost flags.
    pub fn set_cell_ghosts(&mut self, flags: Vec<u8>) -> Result<(), MeshError> {
        if flags.len() != self.n_cells() {
            return Err(MeshError::BlankingLengthMismatch {
                expected: self.n_cells(),
                found: flags.len(),
            });
        }
        self.cell_ghosts = Some(flags);
        Ok(())
    }

    /// Hide `point` and with it every cell using it.
    pub fn blank_point(&mut self, point: PointIdx) -> Result<(), MeshError> {
        self.update_point_flag(point, |f| f | HIDDEN_POINT)
    }

    /// Undo [`blank_point`](Self::blank_point).
    pub fn unblank_point(&mut self, point: PointIdx) -> Result<(), MeshError> {
        self.update_point_flag(point, |f| f & !HIDDEN_POINT)
    }

    /// Hide `cell`.
    pub fn blank_cell(&mut self, cell: CellIdx) -> Result<(), MeshError> {
        self.update_cell_flag(cell, |f| f | HIDDEN_CELL)
    }

    /// Undo [`blank_cell`](Self::blank_cell).
    pub fn unblank_cell(&mut self, cell: CellIdx) -> Result<(), MeshError> {
        self.update_cell_flag(cell, |f| f & !HIDDEN_CELL)
    }

    fn update_point_flag(
        &mut self,
        point: PointIdx,
        f: impl Fn(u8) -> u8,
    ) -> Result<(), MeshError> {
        let n_points = self.n_points();
        if point >= n_points {
            return Err(MeshError::PointOutOfRange { point, n_points });
        }
        let flags = self.point_ghosts.get_or_insert_with(|| vec![0; n_points]);
        flags[point] = f(flags[point]);
        Ok(())
    }

    fn update_cell_flag(&mut self, cell: CellIdx, f: impl Fn(u8) -> u8) -> Result<(), MeshError> {
        let n_cells = self.n_cells();
        if cell >= n_cells {
            return Err(MeshError::CellOutOfRange { cell, n_cells });
        }
        let flags = self.cell_ghosts.get_or_insert_with(|| vec![0; n_cells]);
        flags[cell] = f(flags[cell]);
        Ok(())
    }

    /// True if `point` is not blanked.
    pub fn is_point_visible(&self, point: PointIdx) -> bool {
        self.point_ghosts
            .as_ref()
            .is_none_or(|g| !ghost::is_hidden_point(g[point]))
    }

    /// True if any point is blanked.
    pub fn has_any_blank_points(&self) -> bool {
        self.point_ghosts
            .as_ref()
            .is_some_and(|g| g.iter().any(|&f| ghost::is_hidden_point(f)))
    }
}

impl MeshTopology for StructuredGrid {
    fn kind(&self) -> DataSetKind {
        self.kind
    }

    fn n_points(&self) -> usize {
        self.dims.iter().product()
    }

    fn n_cells(&self) -> usize {
        self.cell_dims().iter().product()
    }

    fn cell_type(&self, _cell: CellIdx) -> CellType {
        let uniform = self.kind == DataSetKind::UniformGrid;
        match self.data_dimension() {
            0 => CellType::Vertex,
            1 => CellType::Segment,
            2 if uniform => CellType::Pixel,
            2 => CellType::Quadrilateral,
            _ if uniform => CellType::Voxel,
            _ => CellType::Hexahedron,
        }
    }

    fn cell_points(&self, cell: CellIdx, out: &mut Vec<PointIdx>) {
        out.clear();
        let base = self.cell_ijk(cell);
        let axes: Vec<usize> = self.active_axes().collect();
        for corner in 0..(1usize << axes.len()) {
            let mut ijk = base;
            for (bit, &axis) in axes.iter().enumerate() {
                ijk[axis] += (corner >> bit) & 1;
            }
            out.push(self.point_index(ijk));
        }
    }

    fn point_cells(&self, point: PointIdx, out: &mut Vec<CellIdx>) {
        out.clear();
        let ijk = self.point_ijk(point);
        let cdims = self.cell_dims();
        // candidate cell coordinates along each axis: {i - 1, i} clipped to the grid
        let ranges: [Vec<usize>; 3] = std::array::from_fn(|a| {
            if self.dims[a] == 1 {
                vec![0]
            } else {
                (ijk[a].saturating_sub(1)..=ijk[a].min(cdims[a] - 1)).collect()
            }
        });
        for &k in &ranges[2] {
            for &j in &ranges[1] {
                for &i in &ranges[0] {
                    out.push(self.cell_index([i, j, k]));
                }
            }
        }
    }

    fn cell_ghost(&self, cell: CellIdx) -> u8 {
        self.cell_ghosts.as_ref().map_or(0, |g| g[cell])
    }

    fn is_cell_visible(&self, cell: CellIdx) -> bool {
        if ghost::is_hidden_cell(self.cell_ghost(cell)) {
            return false;
        }
        if self.point_ghosts.is_none() {
            return true;
        }
        let mut pts = Vec::with_capacity(MAX_GRID_CELLS_PER_POINT);
        self.cell_points(cell, &mut pts);
        pts.iter().all(|&p| self.is_point_visible(p))
    }

    fn has_any_blank_cells(&self) -> bool {
        let hidden_cells = self
            .cell_ghosts
            .as_ref()
            .is_some_and(|g| g.iter().any(|&f| ghost::is_hidden_cell(f)));
        hidden_cells || self.has_any_blank_points()
    }
}
