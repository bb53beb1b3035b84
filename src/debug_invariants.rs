//! Structural self-checks for topology and attribute containers.
//!
//! Containers validate themselves after construction in debug builds, or in
//! release builds with the `check-invariants` feature. `validate_invariants`
//! is always available to callers that prefer the error over a panic.

use crate::mesh_error::MeshError;

/// A container with checkable structural invariants.
pub trait DebugInvariants {
    /// First violated invariant, if any.
    fn validate_invariants(&self) -> Result<(), MeshError>;

    /// Panic on a violated invariant when checks are enabled; no-op otherwise.
    #[inline]
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), core::any::type_name::<Self>());
    }
}

/// Panic with `$what` and the error if `$check` fails, when invariant
/// checking is compiled in.
#[macro_export]
macro_rules! debug_invariants {
    ($check:expr, $what:expr) => {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = $check {
            panic!("[invariants] {}: {}", $what, e);
        }
    };
}
