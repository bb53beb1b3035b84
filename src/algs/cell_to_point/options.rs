//! User-facing configuration of the cell-to-point filter.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which incident cells contribute to a point's value.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ContributingCells {
    /// Every incident cell.
    #[default]
    All,
    /// Per point, only the incident cells of the highest dimension present.
    Patch,
    /// Only cells of the highest dimension found anywhere in the dataset.
    DataSetMax,
}

impl fmt::Display for ContributingCells {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContributingCells::All => "All",
            ContributingCells::Patch => "Patch",
            ContributingCells::DataSetMax => "DataSetMax",
        })
    }
}

/// Filter options. Missing fields take their defaults when deserialized.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellToPointOptions {
    /// Contributing-cell policy.
    pub contributing_cells: ContributingCells,
    /// Copy the input cell data to the output.
    pub pass_cell_data: bool,
    /// Process every cell array; otherwise only `cell_data_arrays`.
    pub process_all_arrays: bool,
    /// Arrays to process when `process_all_arrays` is off.
    pub cell_data_arrays: BTreeSet<String>,
}

impl Default for CellToPointOptions {
    fn default() -> Self {
        Self {
            contributing_cells: ContributingCells::All,
            pass_cell_data: false,
            process_all_arrays: true,
            cell_data_arrays: BTreeSet::new(),
        }
    }
}
