//! Cell data → point data averaging.
//!
//! [`CellToPoint`] turns every selected per-cell array into a per-point array
//! whose tuple at point `p` is the mean of the tuples of the cells incident
//! to `p`. Which cells count is set by [`ContributingCells`]:
//!
//! | dataset            | policy        | path                                   |
//! |--------------------|---------------|----------------------------------------|
//! | unstructured/poly  | `All`         | threaded average over cell links       |
//! | unstructured/poly  | `DataSetMax`  | serial scatter, cells of max dimension |
//! | unstructured/poly  | `Patch`       | per point, highest dimension present   |
//! | grid with blanking | any           | equal weights over visible cells       |
//! | grid               | any           | equal weights over all incident cells  |
//!
//! Hidden cells never contribute on any path. Points without contributing
//! cells end up zero, never NaN.
//!
//! ```
//! use cell2point::prelude::*;
//!
//! let mut mesh = UnstructuredMesh::unstructured_grid(3);
//! mesh.push_cell(CellType::Segment, &[0, 1]).unwrap();
//! mesh.push_cell(CellType::Segment, &[1, 2]).unwrap();
//!
//! let mut cell_data = AttributeSet::new();
//! cell_data.insert(AttributeArray::scalars("t", vec![1.0f64, 3.0]));
//!
//! let out = CellToPoint::new()
//!     .with_executor(std::sync::Arc::new(Executor::serial()))
//!     .execute(&mesh, &AttributeSet::new(), &cell_data)
//!     .unwrap();
//! assert_eq!(out.point_data.get::<f64>("t").unwrap().values(), &[1.0, 2.0, 3.0]);
//! ```

mod fast;
mod masked;
pub mod options;
pub mod spread;

use std::fmt;
use std::sync::Arc;

use crate::algs::monitor::{Monitor, NoMonitor};
use crate::algs::smp::{self, Executor};
use crate::data::array_list::ArrayList;
use crate::data::attribute_set::AttributeSet;
use crate::data::tagged::TaggedArray;
use crate::mesh_error::MeshError;
use crate::topology::links::CellLinks;
use crate::topology::mesh::MeshTopology;

pub use masked::MAX_CELLS_PER_POINT;
pub use options::{CellToPointOptions, ContributingCells};

/// How a run ended.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Completion {
    /// Every selected array was fully computed.
    Finished,
    /// The monitor requested an abort; outputs are valid but partially filled.
    Aborted,
}

/// Kernel that produced the output.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AveragingPath {
    /// Nothing to do: empty mesh or no selected arrays.
    Skipped,
    /// Threaded average over cell links.
    Fast,
    /// Serial scatter with a cell dimension threshold.
    Spread,
    /// Per-point highest-dimension patches.
    Patch,
    /// Visible-cell interpolation on a blanked grid.
    Masked,
    /// All-cell interpolation on a grid.
    Interpolate,
}

impl fmt::Display for AveragingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AveragingPath::Skipped => "skipped",
            AveragingPath::Fast => "fast",
            AveragingPath::Spread => "spread",
            AveragingPath::Patch => "patch",
            AveragingPath::Masked => "masked",
            AveragingPath::Interpolate => "interpolate",
        })
    }
}

/// Result of [`CellToPoint::execute`].
#[derive(Clone, Debug)]
pub struct CellToPointOutput {
    /// Input point data with the averaged arrays merged in.
    pub point_data: AttributeSet,
    /// Input cell data if passed through, otherwise empty.
    pub cell_data: AttributeSet,
    pub status: Completion,
    pub path: AveragingPath,
}

/// Cell-to-point averaging filter.
#[derive(Clone, Debug, Default)]
pub struct CellToPoint {
    options: CellToPointOptions,
    executor: Option<Arc<Executor>>,
}

impl CellToPoint {
    /// Filter with default options: every array, `All` cells, no cell-data pass-through.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CellToPointOptions) -> Self {
        Self {
            options,
            executor: None,
        }
    }

    /// Run the threaded path on `executor` instead of [`smp::global`].
    pub fn with_executor(mut self, executor: Arc<Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn options(&self) -> &CellToPointOptions {
        &self.options
    }

    pub fn contributing_cells(&self) -> ContributingCells {
        self.options.contributing_cells
    }

    pub fn set_contributing_cells(&mut self, policy: ContributingCells) {
        self.options.contributing_cells = policy;
    }

    pub fn pass_cell_data(&self) -> bool {
        self.options.pass_cell_data
    }

    pub fn set_pass_cell_data(&mut self, pass: bool) {
        self.options.pass_cell_data = pass;
    }

    pub fn process_all_arrays(&self) -> bool {
        self.options.process_all_arrays
    }

    /// When off, only arrays added with
    /// [`add_cell_data_array`](Self::add_cell_data_array) are processed.
    pub fn set_process_all_arrays(&mut self, all: bool) {
        self.options.process_all_arrays = all;
    }

    /// Select a cell array by name.
    pub fn add_cell_data_array(&mut self, name: impl Into<String>) {
        self.options.cell_data_arrays.insert(name.into());
    }

    /// Deselect a cell array; returns false if it was not selected.
    pub fn remove_cell_data_array(&mut self, name: &str) -> bool {
        self.options.cell_data_arrays.remove(name)
    }

    pub fn clear_cell_data_arrays(&mut self) {
        self.options.cell_data_arrays.clear();
    }

    pub fn number_of_cell_arrays_to_process(&self) -> usize {
        self.options.cell_data_arrays.len()
    }

    /// Selected array names, sorted.
    pub fn cell_arrays_to_process(&self) -> Vec<&str> {
        self.options
            .cell_data_arrays
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// Average `cell_data` onto the points of `mesh`.
    ///
    /// # Errors
    /// - `ArrayLengthMismatch` if a selected array does not hold one tuple per cell
    /// - `TooManyCellsPerPoint` if a blanked grid reports an impossible incidence
    /// - `InvalidLinks` if the mesh hands out links for a different point count
    pub fn execute<M>(
        &self,
        mesh: &M,
        point_data: &AttributeSet,
        cell_data: &AttributeSet,
    ) -> Result<CellToPointOutput, MeshError>
    where
        M: MeshTopology + ?Sized,
    {
        self.execute_with_monitor(mesh, point_data, cell_data, &NoMonitor)
    }

    /// [`execute`](Self::execute) with progress reporting and cooperative abort.
    pub fn execute_with_monitor<M>(
        &self,
        mesh: &M,
        point_data: &AttributeSet,
        cell_data: &AttributeSet,
        monitor: &dyn Monitor,
    ) -> Result<CellToPointOutput, MeshError>
    where
        M: MeshTopology + ?Sized,
    {
        log::debug!("Mapping cell data to point data");
        let mut out_point_data = point_data.clone();
        let out_cell_data = if self.options.pass_cell_data {
            cell_data.clone()
        } else {
            AttributeSet::new()
        };
        let skipped = |point_data: AttributeSet| CellToPointOutput {
            point_data,
            cell_data: out_cell_data.clone(),
            status: Completion::Finished,
            path: AveragingPath::Skipped,
        };

        let (n_points, n_cells) = (mesh.n_points(), mesh.n_cells());
        if n_points == 0 || n_cells == 0 {
            log::debug!("No input data");
            return Ok(skipped(out_point_data));
        }

        let selected = self.select_arrays(cell_data);
        if let Some(bad) = selected.iter().find(|a| a.n_tuples() != n_cells) {
            return Err(MeshError::ArrayLengthMismatch {
                name: bad.name().to_owned(),
                expected: n_cells,
                found: bad.n_tuples(),
            });
        }
        if selected.is_empty() {
            log::debug!("No cell arrays to process");
            return Ok(skipped(out_point_data));
        }

        let mut arrays = ArrayList::new();
        arrays.configure(n_points, selected, &mut out_point_data);
        let (path, status) = self.dispatch(mesh, &mut arrays, monitor)?;
        arrays.into_output(&mut out_point_data);

        match status {
            Completion::Finished => monitor.update_progress(1.0),
            Completion::Aborted => log::debug!("{path} averaging aborted"),
        }
        Ok(CellToPointOutput {
            point_data: out_point_data,
            cell_data: out_cell_data,
            status,
            path,
        })
    }

    fn select_arrays<'a>(&self, cell_data: &'a AttributeSet) -> Vec<&'a TaggedArray> {
        if self.options.process_all_arrays {
            return cell_data.iter().collect();
        }
        self.options
            .cell_data_arrays
            .iter()
            .filter_map(|name| {
                let found = cell_data.get_tagged(name);
                if found.is_none() {
                    log::warn!("cell data array name not found: {name}");
                }
                found
            })
            .collect()
    }

    fn dispatch<M>(
        &self,
        mesh: &M,
        arrays: &mut ArrayList<'_>,
        monitor: &dyn Monitor,
    ) -> Result<(AveragingPath, Completion), MeshError>
    where
        M: MeshTopology + ?Sized,
    {
        if !mesh.kind().is_unstructured() {
            return if mesh.has_any_blank_cells() {
                log::debug!("interpolating {} arrays over visible cells", arrays.len());
                Ok((
                    AveragingPath::Masked,
                    masked::interpolate_masked(mesh, arrays, monitor)?,
                ))
            } else {
                log::debug!("interpolating {} arrays over incident cells", arrays.len());
                Ok((
                    AveragingPath::Interpolate,
                    masked::interpolate_all(mesh, arrays, monitor)?,
                ))
            };
        }

        match self.options.contributing_cells {
            ContributingCells::All => {
                let executor = self.executor.clone().unwrap_or_else(smp::global);
                let owned;
                let links = match mesh.links() {
                    Some(links) => links,
                    None => {
                        owned = CellLinks::build_visible(mesh);
                        &owned
                    }
                };
                if links.n_points() != mesh.n_points() {
                    return Err(MeshError::InvalidLinks(format!(
                        "links cover {} points, mesh has {}",
                        links.n_points(),
                        mesh.n_points()
                    )));
                }
                log::debug!(
                    "averaging {} arrays over cell links on {} workers",
                    arrays.len(),
                    executor.threads()
                );
                Ok((
                    AveragingPath::Fast,
                    fast::average_over_links(links, arrays, &executor, monitor)?,
                ))
            }
            ContributingCells::Patch => {
                log::debug!("averaging {} arrays over cell patches", arrays.len());
                Ok((
                    AveragingPath::Patch,
                    spread::average_patches(mesh, arrays, monitor)?,
                ))
            }
            ContributingCells::DataSetMax => {
                let threshold = spread::highest_cell_dimension(mesh);
                log::debug!(
                    "averaging {} arrays over cells of dimension >= {threshold}",
                    arrays.len()
                );
                Ok((
                    AveragingPath::Spread,
                    spread::average_thresholded(mesh, threshold, arrays, monitor)?,
                ))
            }
        }
    }
}

impl fmt::Display for CellToPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |b: bool| if b { "On" } else { "Off" };
        writeln!(f, "PassCellData: {}", on_off(self.options.pass_cell_data))?;
        writeln!(f, "ContributingCellOption: {}", self.options.contributing_cells)?;
        writeln!(f, "ProcessAllArrays: {}", on_off(self.options.process_all_arrays))?;
        write!(f, "CellDataArrays: [{}]", self.cell_arrays_to_process().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_a_sorted_set() {
        let mut filter = CellToPoint::new();
        filter.add_cell_data_array("b");
        filter.add_cell_data_array("a");
        filter.add_cell_data_array("b");
        assert_eq!(filter.number_of_cell_arrays_to_process(), 2);
        assert_eq!(filter.cell_arrays_to_process(), vec!["a", "b"]);
        assert!(filter.remove_cell_data_array("a"));
        assert!(!filter.remove_cell_data_array("a"));
        filter.clear_cell_data_arrays();
        assert_eq!(filter.number_of_cell_arrays_to_process(), 0);
    }

    #[test]
    fn display_lists_configuration() {
        let mut filter = CellToPoint::new();
        filter.set_pass_cell_data(true);
        filter.set_contributing_cells(ContributingCells::Patch);
        filter.set_process_all_arrays(false);
        filter.add_cell_data_array("rho");
        let text = filter.to_string();
        assert!(text.contains("PassCellData: On"), "{text}");
        assert!(text.contains("ContributingCellOption: Patch"), "{text}");
        assert!(text.contains("ProcessAllArrays: Off"), "{text}");
        assert!(text.contains("CellDataArrays: [rho]"), "{text}");
    }
}
