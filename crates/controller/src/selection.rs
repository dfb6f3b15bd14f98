//! Drag-rectangle selection with span snapping.
//!
//! The raw drag is a pair of logical slot coordinates. The effective
//! selection is its span closure: any merged cell the rectangle touches
//! is included whole, repeated to a fixpoint, so a selection can never
//! cut through a span. A drag that is cancelled (pointer leaves the
//! table, Escape) selects nothing.

use tablekit_model::grid::Grid;
use tablekit_model::pos::CellPos;
use tablekit_model::range::Range;

/// Expand `range` until it contains every span rectangle it touches.
///
/// Terminates because the range only grows and the grid is finite.
pub fn span_closure(grid: &Grid, mut range: Range) -> Range {
    loop {
        let mut grown = range;
        for (r, c) in range.cells() {
            if let Some(anchor) = grid.find_anchor(r, c) {
                if let Some(rect) = grid.anchor_rect(anchor) {
                    grown = grown.union(&rect);
                }
            }
        }
        if grown == range {
            return range;
        }
        range = grown;
    }
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    origin: CellPos,
    current: CellPos,
}

/// Pointer-drag state machine. One per table; reused across drags.
#[derive(Debug, Default)]
pub struct SelectionDrag {
    state: Option<DragState>,
}

impl SelectionDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Pointer down on a slot.
    pub fn begin(&mut self, pos: CellPos) {
        self.state = Some(DragState {
            origin: pos,
            current: pos,
        });
    }

    /// Pointer moved while down. Returns the current effective
    /// selection, or `None` when no drag is active.
    pub fn update(&mut self, grid: &Grid, pos: CellPos) -> Option<Range> {
        let state = self.state.as_mut()?;
        state.current = pos;
        Some(span_closure(grid, Range::between(state.origin, state.current)))
    }

    /// Pointer up: the final selection.
    pub fn finish(&mut self, grid: &Grid) -> Option<Range> {
        let state = self.state.take()?;
        Some(span_closure(grid, Range::between(state.origin, state.current)))
    }

    /// Abandon without selecting.
    pub fn cancel(&mut self) {
        self.state = None;
    }
}
