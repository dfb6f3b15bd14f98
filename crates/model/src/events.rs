//! Change notifications emitted by grid mutations.
//!
//! The view layer is a one-way projection of the model: it re-renders or
//! incrementally patches from these events and never reads logical state
//! back out of view nodes. Events are buffered on the grid and drained
//! by whoever drives the render pass.

use crate::error::Axis;
use crate::pos::CellPos;
use crate::range::Range;

/// Events emitted by `Grid` mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    RowInserted { index: usize },
    RowRemoved { index: usize },
    ColumnInserted { index: usize },
    ColumnRemoved { index: usize },
    /// A rectangle was merged into the anchor at its top-left.
    CellsMerged { range: Range },
    /// A merged anchor was split back into 1x1 cells.
    CellUnmerged { anchor: CellPos },
    /// Header flag changed for a whole row/column slice.
    HeaderToggled { axis: Axis, index: usize, on: bool },
    /// Content or styling of one anchor changed.
    CellChanged { pos: CellPos },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_equality() {
        let a = GridEvent::RowInserted { index: 2 };
        let b = GridEvent::RowInserted { index: 2 };
        assert_eq!(a, b);
        assert_ne!(a, GridEvent::RowRemoved { index: 2 });
    }
}
