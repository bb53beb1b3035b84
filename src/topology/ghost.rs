//! Per-cell ghost flags.
//!
//! Ghost flags are a bit set stored as one `u8` per cell. Only
//! [`HIDDEN_CELL`] removes a cell from averaging; the remaining bits are
//! carried for callers that classify ghost layers.

/// Cell is a duplicate owned by another piece.
pub const DUPLICATE_CELL: u8 = 1;
/// Cell has high connectivity to the owned region.
pub const HIGH_CONNECTIVITY_CELL: u8 = 2;
/// Cell has low connectivity to the owned region.
pub const LOW_CONNECTIVITY_CELL: u8 = 4;
/// Cell was refined away.
pub const REFINED_CELL: u8 = 8;
/// Cell lies on the exterior of the domain.
pub const EXTERIOR_CELL: u8 = 16;
/// Cell is blanked and must be treated as absent.
pub const HIDDEN_CELL: u8 = 32;

/// Point is a duplicate owned by another piece.
pub const DUPLICATE_POINT: u8 = 1;
/// Point is blanked and must be treated as absent.
pub const HIDDEN_POINT: u8 = 2;

/// True if `flags` marks the cell hidden.
#[inline]
pub fn is_hidden_cell(flags: u8) -> bool {
    flags & HIDDEN_CELL != 0
}

/// True if `flags` marks the point hidden.
#[inline]
pub fn is_hidden_point(flags: u8) -> bool {
    flags & HIDDEN_POINT != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_bit_is_independent_of_duplicate_bit() {
        assert!(!is_hidden_cell(DUPLICATE_CELL));
        assert!(is_hidden_cell(DUPLICATE_CELL | HIDDEN_CELL));
        assert!(is_hidden_point(HIDDEN_POINT));
        assert!(!is_hidden_point(DUPLICATE_POINT));
    }
}
