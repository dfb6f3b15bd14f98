//! Errors reported by grid mutations.
//!
//! All failures here are local and synchronous: an ineligible merge
//! leaves the grid untouched, a bad index is a caller bug surfaced as a
//! value rather than a panic.

use crate::pos::CellPos;

/// Which axis an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Row or column index outside the grid. Structural inserts clamp to
    /// append instead; removals and lookups report this.
    InvalidIndex { axis: Axis, index: usize, len: usize },
    /// Merge attempted over a selection that does not tile into whole
    /// existing cells.
    MergeNotEligible,
    /// Operation requires an anchor cell but the slot is covered.
    NotAnAnchor(CellPos),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::InvalidIndex { axis, index, len } => {
                write!(f, "{} index {} out of range (len {})", axis, index, len)
            }
            GridError::MergeNotEligible => {
                write!(f, "selection does not tile into whole cells")
            }
            GridError::NotAnAnchor(pos) => {
                write!(f, "slot {} is covered by another cell", pos)
            }
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = GridError::InvalidIndex {
            axis: Axis::Row,
            index: 5,
            len: 3,
        };
        assert_eq!(e.to_string(), "row index 5 out of range (len 3)");

        let e = GridError::NotAnAnchor(CellPos::new(1, 2));
        assert_eq!(e.to_string(), "slot r1c2 is covered by another cell");
    }
}
