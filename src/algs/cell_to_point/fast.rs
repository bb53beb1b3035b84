//! Threaded averaging over prebuilt point→cell links.
//!
//! Each output array is split into disjoint runs of points and every run is
//! handed to one worker. A point's tuple is the mean of its linked cells'
//! tuples, summed in link order, so the result does not depend on the number
//! of workers.

use crate::algs::cell_to_point::Completion;
use crate::algs::monitor::Monitor;
use crate::algs::smp::Executor;
use crate::data::array::AttributeArray;
use crate::data::array_list::{ArrayList, average_tuple};
use crate::data::scalar::Scalar;
use crate::data::tagged::{PairVisitor, TaggedArray};
use crate::mesh_error::MeshError;
use crate::topology::links::CellLinks;

#[derive(Clone, Copy)]
struct LinkAverage<'a> {
    links: &'a CellLinks,
    executor: &'a Executor,
}

impl PairVisitor for LinkAverage<'_> {
    type Output = ();

    fn visit<T: Scalar>(self, src: &AttributeArray<T>, dst: &mut AttributeArray<T>) {
        let n_comp = dst.n_components();
        let grain = self.executor.grain(dst.n_tuples());
        let links = self.links;
        self.executor
            .for_each_chunk_mut(dst.values_mut(), grain * n_comp, |chunk, values| {
                let first = chunk * grain;
                for (offset, out) in values.chunks_mut(n_comp).enumerate() {
                    average_tuple(src, links.cells(first + offset), out);
                }
            });
    }
}

/// Average every configured array over `links`.
///
/// Points without linked cells keep their zeroed tuple. The monitor is
/// consulted between arrays.
pub(super) fn average_over_links(
    links: &CellLinks,
    arrays: &mut ArrayList<'_>,
    executor: &Executor,
    monitor: &dyn Monitor,
) -> Result<Completion, MeshError> {
    let n_arrays = arrays.len();
    let visitor = LinkAverage { links, executor };
    for (i, (src, dst)) in arrays.pairs_mut().enumerate() {
        if monitor.check_abort() {
            return Ok(Completion::Aborted);
        }
        TaggedArray::visit_pair(src, dst, visitor)?;
        monitor.update_progress((i + 1) as f64 / n_arrays as f64);
    }
    Ok(Completion::Finished)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::monitor::NoMonitor;
    use crate::algs::smp::SmpConfig;
    use crate::data::attribute_set::AttributeSet;
    use crate::topology::cell_type::CellType;
    use crate::topology::unstructured::UnstructuredMesh;

    fn strip(n_cells: usize) -> UnstructuredMesh {
        let mut mesh = UnstructuredMesh::unstructured_grid(n_cells + 1);
        for c in 0..n_cells {
            mesh.push_cell(CellType::Segment, &[c, c + 1]).unwrap();
        }
        mesh
    }

    #[test]
    fn serial_and_parallel_agree() {
        let mesh = strip(257);
        let mut cd = AttributeSet::new();
        cd.insert(AttributeArray::scalars(
            "x",
            (0..257).map(|c| (c as f64).sin()).collect(),
        ));
        cd.insert(
            AttributeArray::from_values("v", 2, (0..514).map(|v| v as i64).collect()).unwrap(),
        );

        let run = |executor: &Executor| {
            let mut pd = AttributeSet::new();
            let mut list = ArrayList::new();
            list.configure(258, cd.iter(), &mut pd);
            let status =
                average_over_links(mesh.build_links(), &mut list, executor, &NoMonitor).unwrap();
            assert_eq!(status, Completion::Finished);
            list.into_output(&mut pd);
            pd
        };
        let serial = run(&Executor::serial());
        let parallel = run(&Executor::new(&SmpConfig::new(4)).unwrap());
        assert_eq!(serial, parallel);

        let x = serial.get::<f64>("x").unwrap();
        assert_eq!(x.tuple(0)[0], 0f64.sin());
        assert_eq!(x.tuple(5)[0], (4f64.sin() + 5f64.sin()) / 2.0);
    }
}
