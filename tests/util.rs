#![allow(dead_code)]
use std::sync::Arc;

use cell2point::prelude::*;

/// Filter that runs the threaded path on the calling thread.
pub fn serial_filter() -> CellToPoint {
    CellToPoint::new().with_executor(Arc::new(Executor::serial()))
}

/// Single-array attribute set.
pub fn scalars<T: Scalar>(name: &str, values: Vec<T>) -> AttributeSet {
    let mut set = AttributeSet::new();
    set.insert(AttributeArray::scalars(name, values));
    set
}

/// `k` segments fanning out of point 0 to points `1..=k`.
pub fn fan(k: usize) -> UnstructuredMesh {
    let mut mesh = UnstructuredMesh::unstructured_grid(k + 1);
    for i in 1..=k {
        mesh.push_cell(CellType::Segment, &[0, i]).unwrap();
    }
    mesh
}

/// Hexahedron on points 0..8 and a triangle on (0, 8, 9); point 10 is isolated.
pub fn volume_and_surface() -> UnstructuredMesh {
    let mut mesh = UnstructuredMesh::unstructured_grid(11);
    mesh.push_cell(CellType::Hexahedron, &[0, 1, 2, 3, 4, 5, 6, 7])
        .unwrap();
    mesh.push_cell(CellType::Triangle, &[0, 8, 9]).unwrap();
    mesh
}

/// Point values of the `f64` array `name`.
pub fn point_values(out: &CellToPointOutput, name: &str) -> Vec<f64> {
    out.point_data
        .get::<f64>(name)
        .unwrap_or_else(|| panic!("missing f64 point array {name}"))
        .values()
        .to_vec()
}
