//! Structural consistency checker for a [`Grid`].
//!
//! Mutations are expected to preserve these invariants; the checker
//! exists for debug assertions, property tests, and vetting grids
//! assembled from untrusted serialized input.

use rustc_hash::FxHashMap;

use crate::cell::Slot;
use crate::grid::Grid;
use crate::pos::CellPos;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A row does not have exactly `column_count` slots.
    RaggedRow { row: usize, len: usize, expected: usize },
    /// An anchor's span rectangle reaches outside the grid.
    SpanOutOfBounds { anchor: CellPos },
    /// Two anchors' span rectangles claim the same slot.
    SpanOverlap { pos: CellPos, first: CellPos, second: CellPos },
    /// An anchor slot lies inside another anchor's span rectangle.
    AnchorInsideSpan { pos: CellPos, owner: CellPos },
    /// A covered slot's back-reference does not name the anchor whose
    /// rectangle contains it (or no rectangle contains it at all).
    BadBackRef { pos: CellPos, claims: CellPos },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::RaggedRow { row, len, expected } => {
                write!(f, "row {} has {} slots, expected {}", row, len, expected)
            }
            Violation::SpanOutOfBounds { anchor } => {
                write!(f, "span of anchor {} reaches outside the grid", anchor)
            }
            Violation::SpanOverlap { pos, first, second } => {
                write!(f, "slot {} claimed by both {} and {}", pos, first, second)
            }
            Violation::AnchorInsideSpan { pos, owner } => {
                write!(f, "anchor {} lies inside the span of {}", pos, owner)
            }
            Violation::BadBackRef { pos, claims } => {
                write!(f, "covered slot {} names {} which does not own it", pos, claims)
            }
        }
    }
}

/// Check every structural invariant, returning the first violation found
/// in row-major order.
pub fn check(grid: &Grid) -> Result<(), Violation> {
    let rows = grid.row_count();
    let cols = grid.column_count();

    for r in 0..rows {
        let len = grid.row(r).map_or(0, |row| row.len());
        if len != cols {
            return Err(Violation::RaggedRow {
                row: r,
                len,
                expected: cols,
            });
        }
    }

    // Claim every slot inside each anchor's rectangle exactly once.
    let mut owner: FxHashMap<CellPos, CellPos> = FxHashMap::default();
    for (anchor, cell) in grid.anchors() {
        if anchor.row + cell.row_span > rows || anchor.col + cell.col_span > cols {
            return Err(Violation::SpanOutOfBounds { anchor });
        }
        for r in anchor.row..anchor.row + cell.row_span {
            for c in anchor.col..anchor.col + cell.col_span {
                let pos = CellPos::new(r, c);
                if let Some(first) = owner.insert(pos, anchor) {
                    return Err(Violation::SpanOverlap {
                        pos,
                        first,
                        second: anchor,
                    });
                }
            }
        }
    }

    for r in 0..rows {
        for c in 0..cols {
            let pos = CellPos::new(r, c);
            let slot = match grid.slot(pos) {
                Some(slot) => slot,
                None => continue,
            };
            match (slot, owner.get(&pos).copied()) {
                (Slot::Anchor(_), Some(claimed)) if claimed != pos => {
                    return Err(Violation::AnchorInsideSpan { pos, owner: claimed });
                }
                (Slot::Anchor(_), _) => {}
                (Slot::Covered { anchor }, Some(claimed)) if claimed == *anchor => {}
                (Slot::Covered { anchor }, _) => {
                    return Err(Violation::BadBackRef {
                        pos,
                        claims: *anchor,
                    });
                }
            }
        }
    }

    Ok(())
}
