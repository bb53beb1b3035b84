//! Averaging kernels and the execution support they share.

pub mod cell_to_point;
pub mod monitor;
pub mod smp;

pub use cell_to_point::{
    AveragingPath, CellToPoint, CellToPointOptions, CellToPointOutput, Completion,
    ContributingCells,
};
pub use monitor::{AbortHandle, Monitor, NoMonitor};
pub use smp::{Executor, SmpConfig};
