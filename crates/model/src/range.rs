//! Rectangular ranges, inclusive on both ends.
//!
//! The grid itself never owns a selection; callers (the drag controller,
//! the cell menu) describe the rectangle they act on with a `Range`.

use serde::{Deserialize, Serialize};

use crate::pos::CellPos;

/// A rectangular range of slots, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Range {
    /// Create a new range, automatically normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Create a single-slot range.
    pub fn single(row: usize, col: usize) -> Self {
        Self {
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }
    }

    /// Range between two corner positions (any order).
    pub fn between(a: CellPos, b: CellPos) -> Self {
        Self::new(a.row, a.col, b.row, b.col)
    }

    pub fn top_left(&self) -> CellPos {
        CellPos::new(self.start_row, self.start_col)
    }

    /// Check if this range contains a position.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row &&
        col >= self.start_col && col <= self.end_col
    }

    pub fn contains_pos(&self, pos: CellPos) -> bool {
        self.contains(pos.row, pos.col)
    }

    /// True if `other` lies entirely inside this range.
    pub fn contains_range(&self, other: &Range) -> bool {
        other.start_row >= self.start_row && other.end_row <= self.end_row &&
        other.start_col >= self.start_col && other.end_col <= self.end_col
    }

    pub fn height(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn width(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Number of slots in this range.
    pub fn slot_count(&self) -> usize {
        self.height() * self.width()
    }

    /// Iterate over all positions in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let start_row = self.start_row;
        let end_row = self.end_row;
        let start_col = self.start_col;
        let end_col = self.end_col;

        (start_row..=end_row).flat_map(move |r| {
            (start_col..=end_col).map(move |c| (r, c))
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = usize> {
        self.start_row..=self.end_row
    }

    pub fn cols(&self) -> impl Iterator<Item = usize> {
        self.start_col..=self.end_col
    }

    /// Check if this is a single slot.
    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    /// The smallest range containing both `self` and `other`.
    pub fn union(&self, other: &Range) -> Range {
        Range {
            start_row: self.start_row.min(other.start_row),
            start_col: self.start_col.min(other.start_col),
            end_row: self.end_row.max(other.end_row),
            end_col: self.end_col.max(other.end_col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let r = Range::new(3, 4, 1, 2);
        assert_eq!(r.start_row, 1);
        assert_eq!(r.start_col, 2);
        assert_eq!(r.end_row, 3);
        assert_eq!(r.end_col, 4);
    }

    #[test]
    fn test_contains_and_count() {
        let r = Range::new(1, 1, 2, 3);
        assert!(r.contains(1, 1));
        assert!(r.contains(2, 3));
        assert!(!r.contains(0, 1));
        assert!(!r.contains(2, 4));
        assert_eq!(r.slot_count(), 6);
        assert_eq!(r.cells().count(), 6);
    }

    #[test]
    fn test_union() {
        let a = Range::single(0, 0);
        let b = Range::new(2, 1, 2, 2);
        let u = a.union(&b);
        assert_eq!(u, Range::new(0, 0, 2, 2));
    }

    #[test]
    fn test_contains_range() {
        let outer = Range::new(0, 0, 3, 3);
        assert!(outer.contains_range(&Range::new(1, 1, 2, 2)));
        assert!(outer.contains_range(&outer));
        assert!(!outer.contains_range(&Range::new(1, 1, 4, 2)));
    }
}
