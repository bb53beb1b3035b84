mod util;
use util::*;

use cell2point::prelude::*;
use cell2point::topology::ghost::HIDDEN_CELL;

fn run(mesh: &UnstructuredMesh, policy: ContributingCells) -> CellToPointOutput {
    let mut filter = serial_filter();
    filter.set_contributing_cells(policy);
    filter
        .execute(mesh, &AttributeSet::new(), &scalars("s", vec![10.0f64, 2.0]))
        .unwrap()
}

#[test]
fn patch_keeps_only_the_highest_dimension_at_a_point() {
    let mesh = volume_and_surface();

    let all = run(&mesh, ContributingCells::All);
    assert_eq!(all.path, AveragingPath::Fast);
    assert_eq!(point_values(&all, "s")[0], 6.0);

    let patch = run(&mesh, ContributingCells::Patch);
    assert_eq!(patch.path, AveragingPath::Patch);
    let s = point_values(&patch, "s");
    assert_eq!(s[0], 10.0);
    // point 8 only sees the triangle, so its patch is the surface
    assert_eq!(s[8], 2.0);
    assert_eq!(s[10], 0.0);
}

#[test]
fn dataset_max_drops_lower_dimensional_cells_everywhere() {
    let mesh = volume_and_surface();
    let out = run(&mesh, ContributingCells::DataSetMax);
    assert_eq!(out.path, AveragingPath::Spread);
    let s = point_values(&out, "s");
    assert_eq!(s[0], 10.0);
    assert_eq!(&s[1..8], &[10.0; 7]);
    assert_eq!(s[8], 0.0);
    assert_eq!(s[9], 0.0);
    assert!(s.iter().all(|v| v.is_finite()));
}

#[test]
fn dataset_max_on_flat_polydata_uses_surfaces() -> Result<(), MeshError> {
    let mut mesh = UnstructuredMesh::poly_data(4);
    mesh.push_cell(CellType::Triangle, &[0, 1, 2])?;
    mesh.push_cell(CellType::Segment, &[2, 3])?;
    mesh.push_cell(CellType::Vertex, &[3])?;
    let mut filter = serial_filter();
    filter.set_contributing_cells(ContributingCells::DataSetMax);
    let out = filter.execute(&mesh, &AttributeSet::new(), &scalars("s", vec![4.0f64, 8.0, 16.0]))?;
    assert_eq!(point_values(&out, "s"), vec![4.0, 4.0, 4.0, 0.0]);
    Ok(())
}

#[test]
fn patch_matches_all_on_single_dimension_meshes() -> Result<(), MeshError> {
    let mesh = fan(5);
    let cd = scalars("s", vec![1.0f64, 2.0, 3.0, 4.0, 5.0]);
    let all = serial_filter().execute(&mesh, &AttributeSet::new(), &cd)?;
    let mut filter = serial_filter();
    filter.set_contributing_cells(ContributingCells::Patch);
    let patch = filter.execute(&mesh, &AttributeSet::new(), &cd)?;
    assert_eq!(all.point_data, patch.point_data);
    Ok(())
}

#[test]
fn slow_paths_skip_hidden_cells() -> Result<(), MeshError> {
    let mut mesh = volume_and_surface();
    mesh.set_cell_ghosts(vec![HIDDEN_CELL, 0])?;

    let patch = run(&mesh, ContributingCells::Patch);
    assert_eq!(point_values(&patch, "s")[0], 2.0);

    // with the volume hidden the dataset maximum drops to surfaces
    let max = run(&mesh, ContributingCells::DataSetMax);
    let s = point_values(&max, "s");
    assert_eq!(s[0], 2.0);
    assert_eq!(s[1], 0.0);
    Ok(())
}

#[test]
fn integer_patch_average_truncates() -> Result<(), MeshError> {
    let mut mesh = UnstructuredMesh::unstructured_grid(3);
    mesh.push_cell(CellType::Triangle, &[0, 1, 2])?;
    mesh.push_cell(CellType::Triangle, &[0, 2, 1])?;
    let mut filter = serial_filter();
    filter.set_contributing_cells(ContributingCells::Patch);
    let out = filter.execute(&mesh, &AttributeSet::new(), &scalars("n", vec![3u8, 4]))?;
    assert_eq!(out.point_data.get::<u8>("n").unwrap().values(), &[3, 3, 3]);
    Ok(())
}
