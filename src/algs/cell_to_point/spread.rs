//! General averaging for the `Patch` and `DataSetMax` policies.
//!
//! Serial by construction: the non-patch mode scatters cell values onto
//! their points, so several cells write the same point tuple. Hidden cells
//! are skipped explicitly.

use num_traits::Zero;

use crate::algs::cell_to_point::Completion;
use crate::algs::monitor::Monitor;
use crate::data::array::AttributeArray;
use crate::data::array_list::ArrayList;
use crate::data::scalar::Scalar;
use crate::data::tagged::{PairVisitor, TaggedArray};
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellDimension;
use crate::topology::mesh::MeshTopology;

/// Largest dimension among the visible cells of `mesh`.
///
/// The scan stops early once the structural maximum of the dataset family
/// is reached.
pub fn highest_cell_dimension<M>(mesh: &M) -> u8
where
    M: MeshTopology + ?Sized,
{
    let cap = mesh.kind().max_cell_dimension();
    let mut highest = 0;
    for cell in 0..mesh.n_cells() {
        if !mesh.is_cell_visible(cell) {
            continue;
        }
        let dim = mesh.cell_type(cell).dimension();
        if dim > highest {
            highest = dim;
            if highest == cap {
                break;
            }
        }
    }
    highest
}

/// Per point, the number of visible cells of dimension `>= threshold`
/// listing it. A point listed twice by one cell is counted twice, matching
/// the scatter in the accumulate pass.
pub fn count_contributing_cells<M>(mesh: &M, threshold: u8) -> Vec<usize>
where
    M: MeshTopology + ?Sized,
{
    let mut counts = vec![0usize; mesh.n_points()];
    let mut points = Vec::new();
    for cell in 0..mesh.n_cells() {
        if !mesh.is_cell_visible(cell) || mesh.cell_type(cell).dimension() < threshold {
            continue;
        }
        mesh.cell_points(cell, &mut points);
        for &p in &points {
            counts[p] += 1;
        }
    }
    counts
}

struct Spread<'m, M: ?Sized> {
    mesh: &'m M,
    counts: &'m [usize],
    threshold: u8,
}

impl<M: MeshTopology + ?Sized> Clone for Spread<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<M: MeshTopology + ?Sized> Copy for Spread<'_, M> {}

impl<M: MeshTopology + ?Sized> PairVisitor for Spread<'_, M> {
    type Output = ();

    fn visit<T: Scalar>(self, src: &AttributeArray<T>, dst: &mut AttributeArray<T>) {
        let n_comp = dst.n_components();
        let mut sums = vec![T::Sum::zero(); dst.values().len()];
        let mut points = Vec::new();
        for cell in 0..self.mesh.n_cells() {
            if !self.mesh.is_cell_visible(cell)
                || self.mesh.cell_type(cell).dimension() < self.threshold
            {
                continue;
            }
            let value = src.tuple(cell);
            self.mesh.cell_points(cell, &mut points);
            for &p in &points {
                let slot = &mut sums[p * n_comp..(p + 1) * n_comp];
                for (acc, &v) in slot.iter_mut().zip(value) {
                    *acc += v.widen();
                }
            }
        }
        for (p, &count) in self.counts.iter().enumerate() {
            let out = dst.tuple_mut(p);
            if count == 0 {
                out.fill(T::zero());
                continue;
            }
            for (o, &sum) in out.iter_mut().zip(&sums[p * n_comp..(p + 1) * n_comp]) {
                *o = T::mean(sum, count);
            }
        }
    }
}

struct Patch<'m, M: ?Sized> {
    mesh: &'m M,
}

impl<M: MeshTopology + ?Sized> Clone for Patch<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<M: MeshTopology + ?Sized> Copy for Patch<'_, M> {}

impl<M: MeshTopology + ?Sized> PairVisitor for Patch<'_, M> {
    type Output = ();

    fn visit<T: Scalar>(self, src: &AttributeArray<T>, dst: &mut AttributeArray<T>) {
        let n_comp = dst.n_components();
        // one running sum per cell dimension
        let mut sums = vec![T::Sum::zero(); CellDimension::COUNT * n_comp];
        let mut cells = Vec::new();
        for p in 0..dst.n_tuples() {
            sums.fill(T::Sum::zero());
            let mut counts = [0usize; CellDimension::COUNT];
            self.mesh.point_cells(p, &mut cells);
            for &cell in &cells {
                if !self.mesh.is_cell_visible(cell) {
                    continue;
                }
                let d = self.mesh.cell_dimension(cell).index();
                counts[d] += 1;
                let slot = &mut sums[d * n_comp..(d + 1) * n_comp];
                for (acc, &v) in slot.iter_mut().zip(src.tuple(cell)) {
                    *acc += v.widen();
                }
            }
            let out = dst.tuple_mut(p);
            match CellDimension::DESCENDING
                .iter()
                .map(|d| d.index())
                .find(|&d| counts[d] > 0)
            {
                Some(d) => {
                    for (o, &s) in out.iter_mut().zip(&sums[d * n_comp..(d + 1) * n_comp]) {
                        *o = T::mean(s, counts[d]);
                    }
                }
                None => out.fill(T::zero()),
            }
        }
    }
}

/// Run `visitor` over every configured array, reporting `(i + 1) / n`
/// before array `i` and stopping if the monitor asks to.
fn for_each_array<V: PairVisitor + Copy>(
    arrays: &mut ArrayList<'_>,
    visitor: V,
    monitor: &dyn Monitor,
) -> Result<Completion, MeshError> {
    let n_arrays = arrays.len();
    for (i, (src, dst)) in arrays.pairs_mut().enumerate() {
        monitor.update_progress((i + 1) as f64 / n_arrays as f64);
        if monitor.check_abort() {
            return Ok(Completion::Aborted);
        }
        TaggedArray::visit_pair(src, dst, visitor)?;
    }
    Ok(Completion::Finished)
}

/// Scatter-average with a dimension threshold: `0` admits every cell,
/// [`highest_cell_dimension`] gives `DataSetMax`.
pub(super) fn average_thresholded<M>(
    mesh: &M,
    threshold: u8,
    arrays: &mut ArrayList<'_>,
    monitor: &dyn Monitor,
) -> Result<Completion, MeshError>
where
    M: MeshTopology + ?Sized,
{
    let counts = count_contributing_cells(mesh, threshold);
    let visitor = Spread {
        mesh,
        counts: &counts,
        threshold,
    };
    for_each_array(arrays, visitor, monitor)
}

/// Per point, average only the incident cells of the highest dimension
/// present at that point.
pub(super) fn average_patches<M>(
    mesh: &M,
    arrays: &mut ArrayList<'_>,
    monitor: &dyn Monitor,
) -> Result<Completion, MeshError>
where
    M: MeshTopology + ?Sized,
{
    for_each_array(arrays, Patch { mesh }, monitor)
}
