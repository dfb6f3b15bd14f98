//! Cell coordinates.
//!
//! A `CellPos` names one logical grid position. Covered slots store a
//! `CellPos` pointing back at the anchor that owns them, which is what
//! makes anchor lookup O(1).

use serde::{Deserialize, Serialize};

/// A logical grid position (0-based row and column).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    #[inline]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for CellPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}
