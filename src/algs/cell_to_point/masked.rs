//! Interpolation over point→cell queries for implicit-topology grids.
//!
//! Grids answer `point_cells` on the fly, so these sweeps never build links.
//! With blanking, each point keeps only its visible cells; a grid point can
//! touch at most [`MAX_GRID_CELLS_PER_POINT`] cells and anything above that
//! is reported as an error instead of being truncated.

use crate::algs::cell_to_point::Completion;
use crate::algs::monitor::Monitor;
use crate::data::array_list::ArrayList;
use crate::mesh_error::MeshError;
use crate::topology::PointIdx;
use crate::topology::mesh::MeshTopology;
use crate::topology::structured::MAX_GRID_CELLS_PER_POINT;

/// Points with this many incident cells or more are nulled by the general
/// interpolation sweep.
pub const MAX_CELLS_PER_POINT: usize = 4096;

fn uniform_weights(n: usize, weights: &mut Vec<f64>) {
    weights.clear();
    weights.resize(n, 1.0 / n as f64);
}

/// Visit every point in order, reporting progress and polling for an abort
/// every `n_points / 20 + 1` points.
fn sweep_points<F>(
    n_points: usize,
    monitor: &dyn Monitor,
    mut f: F,
) -> Result<Completion, MeshError>
where
    F: FnMut(PointIdx) -> Result<(), MeshError>,
{
    let interval = n_points / 20 + 1;
    for p in 0..n_points {
        if p % interval == 0 {
            monitor.update_progress(p as f64 / n_points as f64);
            if monitor.check_abort() {
                return Ok(Completion::Aborted);
            }
        }
        f(p)?;
    }
    Ok(Completion::Finished)
}

/// Equal-weight interpolation from the visible cells of each point.
///
/// Points whose incident cells are all blanked are nulled.
///
/// # Errors
/// `TooManyCellsPerPoint` if a point reports more than
/// [`MAX_GRID_CELLS_PER_POINT`] incident cells.
pub(super) fn interpolate_masked<M>(
    mesh: &M,
    arrays: &mut ArrayList<'_>,
    monitor: &dyn Monitor,
) -> Result<Completion, MeshError>
where
    M: MeshTopology + ?Sized,
{
    let mut incident = Vec::with_capacity(MAX_GRID_CELLS_PER_POINT);
    let mut visible = Vec::with_capacity(MAX_GRID_CELLS_PER_POINT);
    let mut weights = Vec::with_capacity(MAX_GRID_CELLS_PER_POINT);
    sweep_points(mesh.n_points(), monitor, |p| {
        mesh.point_cells(p, &mut incident);
        if incident.len() > MAX_GRID_CELLS_PER_POINT {
            return Err(MeshError::TooManyCellsPerPoint {
                point: p,
                found: incident.len(),
                limit: MAX_GRID_CELLS_PER_POINT,
            });
        }
        visible.clear();
        visible.extend(incident.iter().copied().filter(|&c| mesh.is_cell_visible(c)));
        if visible.is_empty() {
            return arrays.null_tuple(p);
        }
        uniform_weights(visible.len(), &mut weights);
        arrays.interpolate(&visible, &weights, p)
    })
}

/// Equal-weight interpolation from every incident cell of each point.
///
/// Points with no incident cells, or with [`MAX_CELLS_PER_POINT`] or more,
/// are nulled.
pub(super) fn interpolate_all<M>(
    mesh: &M,
    arrays: &mut ArrayList<'_>,
    monitor: &dyn Monitor,
) -> Result<Completion, MeshError>
where
    M: MeshTopology + ?Sized,
{
    let mut cells = Vec::new();
    let mut weights = Vec::new();
    sweep_points(mesh.n_points(), monitor, |p| {
        mesh.point_cells(p, &mut cells);
        if cells.is_empty() || cells.len() >= MAX_CELLS_PER_POINT {
            return arrays.null_tuple(p);
        }
        uniform_weights(cells.len(), &mut weights);
        arrays.interpolate(&cells, &weights, p)
    })
}
