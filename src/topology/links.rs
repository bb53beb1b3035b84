//! Point→cell links in CSR (Compressed Sparse Row) layout.
//!
//! Immutable, cache-friendly adjacency with deterministic order: the cells of
//! every point are stored in ascending cell index, so any reduction that walks
//! a link list in order is reproducible for a fixed mesh. Built in two passes
//! over the cell connectivity (degree count, then fill) and intended to be
//! built once per mesh and shared read-only across workers.

use std::sync::Arc;

use super::mesh::MeshTopology;
use super::{CellIdx, PointIdx};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;

/// Immutable point→cell adjacency.
///
/// # Invariants
/// - `offsets.len() == n_points + 1`, `offsets[0] == 0`, offsets are non-decreasing
/// - `offsets[n_points] == cells.len()`
/// - each point's cell list is strictly increasing (no duplicates)
#[derive(Clone, Debug)]
pub struct CellLinks {
    offsets: Arc<[usize]>,
    cells: Arc<[CellIdx]>,
}

impl Default for CellLinks {
    fn default() -> Self {
        Self {
            offsets: Arc::from([0]),
            cells: Arc::from([]),
        }
    }
}

impl CellLinks {
    /// Links over every cell of `mesh`.
    pub fn build<M>(mesh: &M) -> Self
    where
        M: MeshTopology + ?Sized,
    {
        Self::build_filtered(mesh, |_| true)
    }

    /// Links over the cells of `mesh` that are not hidden.
    ///
    /// Hidden cells never appear in any point's list, so every consumer of
    /// these links skips them without a per-cell ghost test.
    pub fn build_visible<M>(mesh: &M) -> Self
    where
        M: MeshTopology + ?Sized,
    {
        Self::build_filtered(mesh, |cell| mesh.is_cell_visible(cell))
    }

    /// Links over the cells for which `keep` returns true.
    pub fn build_filtered<M, F>(mesh: &M, keep: F) -> Self
    where
        M: MeshTopology + ?Sized,
        F: Fn(CellIdx) -> bool,
    {
        let n_points = mesh.n_points();
        let n_cells = mesh.n_cells();
        let kept: Vec<bool> = (0..n_cells).map(&keep).collect();

        // 1) degree counts; `last` drops a point listed twice by one cell
        let mut degree = vec![0usize; n_points];
        let mut last = vec![usize::MAX; n_points];
        let mut pts = Vec::new();
        for cell in (0..n_cells).filter(|&c| kept[c]) {
            mesh.cell_points(cell, &mut pts);
            for &p in &pts {
                if last[p] != cell {
                    last[p] = cell;
                    degree[p] += 1;
                }
            }
        }

        // prefix sums
        let mut offsets = vec![0usize; n_points + 1];
        for p in 0..n_points {
            offsets[p + 1] = offsets[p] + degree[p];
        }

        // 2) fill in ascending cell order
        let mut cells = vec![0 as CellIdx; offsets[n_points]];
        let mut write = offsets.clone();
        last.fill(usize::MAX);
        for cell in (0..n_cells).filter(|&c| kept[c]) {
            mesh.cell_points(cell, &mut pts);
            for &p in &pts {
                if last[p] != cell {
                    last[p] = cell;
                    cells[write[p]] = cell;
                    write[p] += 1;
                }
            }
        }

        let links = Self {
            offsets: offsets.into(),
            cells: cells.into(),
        };
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        links.debug_assert_invariants();
        links
    }

    /// Number of points covered.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of cells incident to `point`.
    ///
    /// # Panics
    /// Panics if `point >= self.n_points()`.
    #[inline]
    pub fn n_cells(&self, point: PointIdx) -> usize {
        self.offsets[point + 1] - self.offsets[point]
    }

    /// Cells incident to `point`, ascending.
    ///
    /// # Panics
    /// Panics if `point >= self.n_points()`.
    #[inline]
    pub fn cells(&self, point: PointIdx) -> &[CellIdx] {
        &self.cells[self.offsets[point]..self.offsets[point + 1]]
    }

    /// Checked variant of [`cells`](Self::cells).
    pub fn try_cells(&self, point: PointIdx) -> Result<&[CellIdx], MeshError> {
        if point >= self.n_points() {
            return Err(MeshError::PointOutOfRange {
                point,
                n_points: self.n_points(),
            });
        }
        Ok(self.cells(point))
    }

    /// Total number of (point, cell) incidences.
    #[inline]
    pub fn n_incidences(&self) -> usize {
        self.cells.len()
    }
}

impl DebugInvariants for CellLinks {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        if self.offsets.first() != Some(&0) {
            return Err(MeshError::InvalidLinks("offsets must start at 0".into()));
        }
        if self.offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(MeshError::InvalidLinks("offsets must be non-decreasing".into()));
        }
        if self.offsets[self.n_points()] != self.cells.len() {
            return Err(MeshError::InvalidLinks(format!(
                "last offset {} does not match {} incidences",
                self.offsets[self.n_points()],
                self.cells.len()
            )));
        }
        for p in 0..self.n_points() {
            if self.cells(p).windows(2).any(|w| w[0] >= w[1]) {
                return Err(MeshError::InvalidLinks(format!(
                    "cells of point {p} are not strictly increasing"
                )));
            }
        }
        Ok(())
    }
}
