mod util;
use util::*;

use std::sync::Arc;

use cell2point::prelude::*;
use proptest::prelude::*;

/// Random triangles over `n_points` points with one value per cell.
fn triangle_soup() -> impl Strategy<Value = (usize, Vec<[usize; 3]>, Vec<f64>)> {
    (3usize..40).prop_flat_map(|n_points| {
        let tri = prop::array::uniform3(0..n_points);
        prop::collection::vec((tri, -1.0e3..1.0e3f64), 1..80).prop_map(move |cells| {
            let (tris, values): (Vec<_>, Vec<_>) = cells.into_iter().unzip();
            (n_points, tris, values)
        })
    })
}

fn build(n_points: usize, tris: &[[usize; 3]]) -> UnstructuredMesh {
    let mut mesh = UnstructuredMesh::unstructured_grid(n_points);
    for t in tris {
        mesh.push_cell(CellType::Triangle, t).unwrap();
    }
    mesh
}

proptest! {
    #[test]
    fn fast_path_matches_a_direct_mean((n_points, tris, values) in triangle_soup()) {
        let mesh = build(n_points, &tris);
        let out = serial_filter()
            .execute(&mesh, &AttributeSet::new(), &scalars("s", values.clone()))
            .unwrap();
        let got = point_values(&out, "s");
        for p in 0..n_points {
            let incident: Vec<f64> = tris
                .iter()
                .zip(&values)
                .filter(|(t, _)| t.contains(&p))
                .map(|(_, &v)| v)
                .collect();
            if incident.is_empty() {
                prop_assert_eq!(got[p], 0.0);
            } else {
                let mean = incident.iter().sum::<f64>() / incident.len() as f64;
                prop_assert!((got[p] - mean).abs() <= 1e-9 * (1.0 + mean.abs()), "point {}", p);
            }
        }
    }

    #[test]
    fn every_path_is_deterministic((n_points, tris, values) in triangle_soup()) {
        let mesh = build(n_points, &tris);
        let cd = scalars("s", values);
        let pooled = Arc::new(Executor::new(&SmpConfig::new(3)).unwrap());
        for policy in [
            ContributingCells::All,
            ContributingCells::Patch,
            ContributingCells::DataSetMax,
        ] {
            let mut filter = CellToPoint::new().with_executor(Arc::clone(&pooled));
            filter.set_contributing_cells(policy);
            let a = filter.execute(&mesh, &AttributeSet::new(), &cd).unwrap();
            let b = filter.execute(&mesh, &AttributeSet::new(), &cd).unwrap();
            prop_assert_eq!(&a.point_data, &b.point_data);
            prop_assert!(point_values(&a, "s").iter().all(|v| v.is_finite()));
        }
    }
}
