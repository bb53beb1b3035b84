//! Explicit-connectivity meshes: unstructured grids and polygonal data.
//!
//! Cells are stored as a flat connectivity buffer with per-cell offsets.
//! Polyhedra additionally keep their face stream; their connectivity entry is
//! the unique set of face vertices in first-seen order.

use std::collections::BTreeMap;

use itertools::Itertools;
use once_cell::sync::OnceCell;

use super::cell_type::{CellDimension, CellType};
use super::links::CellLinks;
use super::mesh::{DataSetKind, MeshTopology};
use super::{CellIdx, PointIdx};
use crate::mesh_error::MeshError;

/// Mesh with explicit cell connectivity.
#[derive(Clone, Debug)]
pub struct UnstructuredMesh {
    kind: DataSetKind,
    n_points: usize,
    /// `offsets[c]..offsets[c + 1]` indexes `connectivity` for cell `c`.
    offsets: Vec<usize>,
    connectivity: Vec<PointIdx>,
    types: Vec<CellType>,
    /// Face stream of each polyhedron cell.
    faces: BTreeMap<CellIdx, Vec<Vec<PointIdx>>>,
    ghosts: Option<Vec<u8>>,
    /// Lazily built visible-cell links.
    links: OnceCell<CellLinks>,
}

impl UnstructuredMesh {
    fn with_kind(kind: DataSetKind, n_points: usize) -> Self {
        Self {
            kind,
            n_points,
            offsets: vec![0],
            connectivity: Vec::new(),
            types: Vec::new(),
            faces: BTreeMap::new(),
            ghosts: None,
            links: OnceCell::new(),
        }
    }

    /// Empty unstructured grid over `n_points` points.
    pub fn unstructured_grid(n_points: usize) -> Self {
        Self::with_kind(DataSetKind::UnstructuredGrid, n_points)
    }

    /// Empty polygonal dataset over `n_points` points.
    pub fn poly_data(n_points: usize) -> Self {
        Self::with_kind(DataSetKind::PolyData, n_points)
    }

    /// Build an unstructured grid from flat arrays.
    ///
    /// # Errors
    /// - `CellMetadataMismatch` if `offsets.len() != types.len() + 1`
    /// - `ConnectivityMismatch` if offsets are not a valid partition of `connectivity`
    /// - `PointOutOfRange` for any connectivity entry `>= n_points`
    /// - `UnsupportedCellType` for `Polyhedron`
    pub fn from_parts(
        n_points: usize,
        types: Vec<CellType>,
        offsets: Vec<usize>,
        connectivity: Vec<PointIdx>,
    ) -> Result<Self, MeshError> {
        if offsets.len() != types.len() + 1 {
            return Err(MeshError::CellMetadataMismatch {
                what: "offsets",
                expected: types.len() + 1,
                found: offsets.len(),
            });
        }
        let last = offsets.last().copied().unwrap_or(0);
        if offsets[0] != 0 || offsets.windows(2).any(|w| w[0] > w[1]) || last != connectivity.len()
        {
            return Err(MeshError::ConnectivityMismatch {
                expected: last,
                found: connectivity.len(),
            });
        }
        if let Some(&bad) = connectivity.iter().find(|&&p| p >= n_points) {
            return Err(MeshError::PointOutOfRange {
                point: bad,
                n_points,
            });
        }
        let mut mesh = Self::unstructured_grid(n_points);
        // polyhedra need a face stream; use `push_polyhedron`
        if types.contains(&CellType::Polyhedron) {
            return Err(MeshError::UnsupportedCellType {
                cell_type: CellType::Polyhedron,
                kind: mesh.kind,
            });
        }
        mesh.types = types;
        mesh.offsets = offsets;
        mesh.connectivity = connectivity;
        Ok(mesh)
    }

    fn check_points(&self, points: &[PointIdx]) -> Result<(), MeshError> {
        match points.iter().find(|&&p| p >= self.n_points) {
            Some(&point) => Err(MeshError::PointOutOfRange {
                point,
                n_points: self.n_points,
            }),
            None => Ok(()),
        }
    }

    fn check_type(&self, cell_type: CellType) -> Result<(), MeshError> {
        let dim = cell_type.cell_dimension();
        if self.kind == DataSetKind::PolyData && dim == CellDimension::Volume {
            return Err(MeshError::UnsupportedCellType {
                cell_type,
                kind: self.kind,
            });
        }
        Ok(())
    }

    /// Append a cell and return its index.
    ///
    /// Use [`push_polyhedron`](Self::push_polyhedron) for polyhedra.
    ///
    /// # Errors
    /// - `PointOutOfRange` if any point is not in the mesh
    /// - `UnsupportedCellType` for volume cells in polygonal data, or `Polyhedron`
    pub fn push_cell(
        &mut self,
        cell_type: CellType,
        points: &[PointIdx],
    ) -> Result<CellIdx, MeshError> {
        self.check_type(cell_type)?;
        if cell_type == CellType::Polyhedron {
            return Err(MeshError::UnsupportedCellType {
                cell_type,
                kind: self.kind,
            });
        }
        self.check_points(points)?;
        let cell = self.types.len();
        self.types.push(cell_type);
        self.connectivity.extend_from_slice(points);
        self.offsets.push(self.connectivity.len());
        if let Some(ghosts) = &mut self.ghosts {
            ghosts.push(0);
        }
        self.invalidate_links();
        Ok(cell)
    }

    /// Append a polyhedron described by its faces and return its index.
    ///
    /// # Errors
    /// - `EmptyPolyhedron` if no face has any point
    /// - `PointOutOfRange` if any face point is not in the mesh
    /// - `UnsupportedCellType` in polygonal data
    pub fn push_polyhedron(&mut self, faces: Vec<Vec<PointIdx>>) -> Result<CellIdx, MeshError> {
        self.check_type(CellType::Polyhedron)?;
        let unique: Vec<PointIdx> = faces.iter().flatten().copied().unique().collect();
        if unique.is_empty() {
            return Err(MeshError::EmptyPolyhedron);
        }
        self.check_points(&unique)?;
        let cell = self.types.len();
        self.types.push(CellType::Polyhedron);
        self.connectivity.extend_from_slice(&unique);
        self.offsets.push(self.connectivity.len());
        self.faces.insert(cell, faces);
        if let Some(ghosts) = &mut self.ghosts {
            ghosts.push(0);
        }
        self.invalidate_links();
        Ok(cell)
    }

    /// Points of `cell` as a slice of the connectivity buffer.
    ///
    /// # Panics
    /// Panics if `cell >= self.n_cells()`.
    #[inline]
    pub fn cell_point_slice(&self, cell: CellIdx) -> &[PointIdx] {
        &self.connectivity[self.offsets[cell]..self.offsets[cell + 1]]
    }

    /// Face stream of a polyhedron cell, `None` for any other cell.
    pub fn polyhedron_faces(&self, cell: CellIdx) -> Option<&[Vec<PointIdx>]> {
        self.faces.get(&cell).map(Vec::as_slice)
    }

    /// Install per-cell ghost flags.
    ///
    /// # Errors
    /// `CellMetadataMismatch` unless there is exactly one flag per cell.
    pub fn set_cell_ghosts(&mut self, ghosts: Vec<u8>) -> Result<(), MeshError> {
        if ghosts.len() != self.types.len() {
            return Err(MeshError::CellMetadataMismatch {
                what: "ghosts",
                expected: self.types.len(),
                found: ghosts.len(),
            });
        }
        self.ghosts = Some(ghosts);
        self.invalidate_links();
        Ok(())
    }

    /// Per-cell ghost flags, if any were installed.
    pub fn cell_ghosts(&self) -> Option<&[u8]> {
        self.ghosts.as_deref()
    }

    /// Drop cached links after any connectivity or ghost edit.
    fn invalidate_links(&mut self) {
        self.links.take();
    }

    /// Build (once) and return the visible-cell links.
    pub fn build_links(&self) -> &CellLinks {
        self.links.get_or_init(|| {
            log::trace!(
                "building cell links for {} points / {} cells",
                self.n_points,
                self.types.len()
            );
            CellLinks::build_visible(self)
        })
    }
}

impl MeshTopology for UnstructuredMesh {
    fn kind(&self) -> DataSetKind {
        self.kind
    }

    fn n_points(&self) -> usize {
        self.n_points
    }

    fn n_cells(&self) -> usize {
        self.types.len()
    }

    fn cell_type(&self, cell: CellIdx) -> CellType {
        self.types[cell]
    }

    fn cell_points(&self, cell: CellIdx, out: &mut Vec<PointIdx>) {
        out.clear();
        out.extend_from_slice(self.cell_point_slice(cell));
    }

    /// Visible cells incident to `point`, from the prebuilt links.
    fn point_cells(&self, point: PointIdx, out: &mut Vec<CellIdx>) {
        out.clear();
        out.extend_from_slice(self.build_links().cells(point));
    }

    fn cell_ghost(&self, cell: CellIdx) -> u8 {
        self.ghosts.as_ref().map_or(0, |g| g[cell])
    }

    fn has_any_blank_cells(&self) -> bool {
        self.ghosts
            .as_ref()
            .is_some_and(|g| g.iter().any(|&f| super::ghost::is_hidden_cell(f)))
    }

    fn links(&self) -> Option<&CellLinks> {
        Some(self.build_links())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::ghost::{DUPLICATE_CELL, HIDDEN_CELL};

    #[test]
    fn push_and_query_cells() {
        let mut mesh = UnstructuredMesh::unstructured_grid(5);
        let tet = mesh.push_cell(CellType::Tetrahedron, &[0, 1, 2, 3]).unwrap();
        let tri = mesh.push_cell(CellType::Triangle, &[1, 2, 4]).unwrap();
        assert_eq!((tet, tri), (0, 1));
        assert_eq!(mesh.n_cells(), 2);
        assert_eq!(mesh.cell_point_slice(1), &[1, 2, 4]);
        assert_eq!(mesh.cell_dimension(0), CellDimension::Volume);

        let mut cells = Vec::new();
        mesh.point_cells(2, &mut cells);
        assert_eq!(cells, vec![0, 1]);
    }

    #[test]
    fn out_of_range_point_is_rejected() {
        let mut mesh = UnstructuredMesh::unstructured_grid(2);
        let err = mesh.push_cell(CellType::Segment, &[0, 2]).unwrap_err();
        assert_eq!(
            err,
            MeshError::PointOutOfRange {
                point: 2,
                n_points: 2
            }
        );
    }

    #[test]
    fn polydata_rejects_volume_cells() {
        let mut mesh = UnstructuredMesh::poly_data(4);
        assert!(matches!(
            mesh.push_cell(CellType::Tetrahedron, &[0, 1, 2, 3]),
            Err(MeshError::UnsupportedCellType { .. })
        ));
        assert!(mesh.push_polyhedron(vec![vec![0, 1, 2]]).is_err());
    }

    #[test]
    fn polyhedron_points_are_unique_face_vertices() {
        let mut mesh = UnstructuredMesh::unstructured_grid(4);
        let faces = vec![vec![0, 1, 2], vec![0, 1, 3], vec![1, 2, 3], vec![0, 2, 3]];
        let cell = mesh.push_polyhedron(faces.clone()).unwrap();
        assert_eq!(mesh.cell_point_slice(cell), &[0, 1, 2, 3]);
        assert_eq!(mesh.polyhedron_faces(cell), Some(faces.as_slice()));
        assert_eq!(mesh.cell_type(cell).dimension(), 3);
        assert!(matches!(
            mesh.push_polyhedron(vec![vec![]]),
            Err(MeshError::EmptyPolyhedron)
        ));
    }

    #[test]
    fn from_parts_validates_offsets() {
        let ok = UnstructuredMesh::from_parts(
            3,
            vec![CellType::Segment, CellType::Segment],
            vec![0, 2, 4],
            vec![0, 1, 1, 2],
        )
        .unwrap();
        assert_eq!(ok.n_cells(), 2);

        let bad = UnstructuredMesh::from_parts(3, vec![CellType::Segment], vec![0, 3], vec![0, 1]);
        assert!(matches!(bad, Err(MeshError::ConnectivityMismatch { .. })));

        let bad = UnstructuredMesh::from_parts(3, vec![CellType::Segment], vec![0], vec![]);
        assert!(matches!(bad, Err(MeshError::CellMetadataMismatch { .. })));
    }

    #[test]
    fn ghosts_invalidate_links() {
        let mut mesh = UnstructuredMesh::unstructured_grid(3);
        mesh.push_cell(CellType::Segment, &[0, 1]).unwrap();
        mesh.push_cell(CellType::Segment, &[1, 2]).unwrap();
        assert_eq!(mesh.build_links().cells(1), &[0, 1]);
        assert!(!mesh.has_any_blank_cells());

        mesh.set_cell_ghosts(vec![DUPLICATE_CELL, HIDDEN_CELL]).unwrap();
        assert_eq!(mesh.build_links().cells(1), &[0]);
        assert!(mesh.has_any_blank_cells());
        assert!(mesh.is_cell_visible(0));
        assert!(!mesh.is_cell_visible(1));

        // cells pushed after ghosts were installed start visible
        let c = mesh.push_cell(CellType::Vertex, &[2]).unwrap();
        assert_eq!(mesh.cell_ghost(c), 0);
        assert!(mesh.set_cell_ghosts(vec![0]).is_err());
    }
}
