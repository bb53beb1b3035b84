//! Progress reporting and cooperative cancellation.
//!
//! Long-running kernels call [`Monitor::update_progress`] at coarse intervals
//! and poll [`Monitor::check_abort`] at the same points. An abort is never
//! an error: the kernel stops and returns what it has computed so far.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Observer of a running kernel.
pub trait Monitor: Sync {
    /// Fraction of work done, in `[0, 1]`.
    fn update_progress(&self, _fraction: f64) {}

    /// True if the kernel should stop at the next opportunity.
    fn check_abort(&self) -> bool {
        false
    }
}

/// Monitor that ignores progress and never aborts.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMonitor;

impl Monitor for NoMonitor {}

/// Shareable abort flag that also records the last reported progress.
///
/// Clones share state, so one clone can be handed to a kernel while another
/// requests the abort from a different thread.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>,
    progress: Arc<AtomicU64>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask running kernels to stop.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// Clear the abort request and the recorded progress.
    pub fn reset(&self) {
        self.aborted.store(false, Ordering::Release);
        self.progress.store(0f64.to_bits(), Ordering::Relaxed);
    }

    /// Last reported progress.
    pub fn progress(&self) -> f64 {
        f64::from_bits(self.progress.load(Ordering::Relaxed))
    }
}

impl Monitor for AbortHandle {
    fn update_progress(&self, fraction: f64) {
        self.progress.store(fraction.to_bits(), Ordering::Relaxed);
    }

    fn check_abort(&self) -> bool {
        self.is_aborted()
    }
}

impl<M: Monitor + ?Sized> Monitor for &M {
    fn update_progress(&self, fraction: f64) {
        (**self).update_progress(fraction)
    }

    fn check_abort(&self) -> bool {
        (**self).check_abort()
    }
}
