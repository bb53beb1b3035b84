mod util;
use util::*;

use cell2point::prelude::*;
use cell2point::topology::ghost::HIDDEN_CELL;

/// 3x3 points, 2x2 pixels numbered 0..4; point 4 is the center.
fn grid_2x2() -> StructuredGrid {
    StructuredGrid::uniform([3, 3, 1]).unwrap()
}

#[test]
fn blanked_cells_are_excluded_with_equal_weights() -> Result<(), MeshError> {
    let mut grid = grid_2x2();
    grid.blank_cell(0)?;
    grid.blank_cell(3)?;
    let cd = scalars("s", vec![1.0f64, 2.0, 3.0, 4.0]);
    let out = serial_filter().execute(&grid, &AttributeSet::new(), &cd)?;
    assert_eq!(out.path, AveragingPath::Masked);
    let s = point_values(&out, "s");
    assert_eq!(s[4], 0.5 * 2.0 + 0.5 * 3.0);
    // corner 0 only touches the blanked cell 0
    assert_eq!(s[0], 0.0);
    assert_eq!(s[2], 2.0);
    Ok(())
}

#[test]
fn blanked_points_hide_their_cells() -> Result<(), MeshError> {
    let mut grid = grid_2x2();
    // point 0 belongs to cell 0 only
    grid.blank_point(0)?;
    assert!(grid.has_any_blank_cells());
    let cd = scalars("s", vec![8.0f64, 2.0, 2.0, 2.0]);
    let out = serial_filter().execute(&grid, &AttributeSet::new(), &cd)?;
    assert_eq!(out.path, AveragingPath::Masked);
    assert!((point_values(&out, "s")[4] - 2.0).abs() < 1e-12);
    Ok(())
}

#[test]
fn unblanked_grid_interpolates_over_every_cell() -> Result<(), MeshError> {
    let grid = StructuredGrid::structured([3, 3, 3])?;
    let values: Vec<f64> = (0..8).map(|c| c as f64).collect();
    let mut filter = serial_filter();
    // grids ignore the policy
    filter.set_contributing_cells(ContributingCells::DataSetMax);
    let out = filter.execute(&grid, &AttributeSet::new(), &scalars("s", values))?;
    assert_eq!(out.path, AveragingPath::Interpolate);
    let s = point_values(&out, "s");
    // center point 13 touches all eight hexahedra
    assert!((s[13] - 3.5).abs() < 1e-12);
    assert_eq!(s[0], 0.0);
    assert_eq!(s[26], 7.0);
    Ok(())
}

#[test]
fn integer_interpolation_rounds() -> Result<(), MeshError> {
    let grid = StructuredGrid::uniform([3, 2, 1])?;
    let out = serial_filter().execute(&grid, &AttributeSet::new(), &scalars("n", vec![1i16, 2]))?;
    // the middle column touches both cells: 1.5 rounds away from zero
    assert_eq!(out.point_data.get::<i16>("n").unwrap().values(), &[1, 2, 2, 1, 2, 2]);
    Ok(())
}

/// A grid-like mesh whose single point claims nine cells.
struct Overfull;

impl MeshTopology for Overfull {
    fn kind(&self) -> DataSetKind {
        DataSetKind::StructuredGrid
    }
    fn n_points(&self) -> usize {
        1
    }
    fn n_cells(&self) -> usize {
        9
    }
    fn cell_type(&self, _cell: CellIdx) -> CellType {
        CellType::Hexahedron
    }
    fn cell_points(&self, _cell: CellIdx, out: &mut Vec<PointIdx>) {
        out.clear();
        out.push(0);
    }
    fn point_cells(&self, _point: PointIdx, out: &mut Vec<CellIdx>) {
        out.clear();
        out.extend(0..9);
    }
    fn cell_ghost(&self, cell: CellIdx) -> u8 {
        if cell == 0 { HIDDEN_CELL } else { 0 }
    }
    fn has_any_blank_cells(&self) -> bool {
        true
    }
}

#[test]
fn overfull_masked_point_is_an_error() {
    let err = serial_filter()
        .execute(&Overfull, &AttributeSet::new(), &scalars("s", vec![1.0f64; 9]))
        .unwrap_err();
    assert_eq!(
        err,
        MeshError::TooManyCellsPerPoint {
            point: 0,
            found: 9,
            limit: 8
        }
    );
}
