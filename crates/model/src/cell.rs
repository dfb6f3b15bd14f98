use serde::{Deserialize, Serialize};

use crate::pos::CellPos;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Opaque cell payload: markup text or a reference to an uploaded image.
///
/// The grid never interprets the text; image uploads arrive here as a
/// plain `src` string after the upload collaborator has done its work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CellContent {
    Text(String),
    Image { src: String },
}

impl Default for CellContent {
    fn default() -> Self {
        CellContent::Text(String::new())
    }
}

impl CellContent {
    pub fn text(s: impl Into<String>) -> Self {
        CellContent::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellContent::Text(s) => s.is_empty(),
            CellContent::Image { src } => src.is_empty(),
        }
    }
}

/// Anchor cell payload. A covered slot carries none of this; whatever
/// content its position held before being absorbed into a span is gone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    /// Rows this cell occupies, >= 1.
    pub row_span: usize,
    /// Columns this cell occupies, >= 1.
    pub col_span: usize,
    pub is_header: bool,
    /// CSS color string; None means unset.
    pub bg_color: Option<String>,
    pub alignment: Alignment,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: CellContent::default(),
            row_span: 1,
            col_span: 1,
            is_header: false,
            bg_color: None,
            alignment: Alignment::Left,
        }
    }
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(s: impl Into<String>) -> Self {
        Self {
            content: CellContent::text(s),
            ..Self::default()
        }
    }

    /// True if this cell spans more than one slot.
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    /// Number of slots the span rectangle occupies.
    pub fn area(&self) -> usize {
        self.row_span * self.col_span
    }
}

/// One logical grid position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Slot {
    /// Top-left cell of a (possibly 1x1) span; owns the content.
    Anchor(Cell),
    /// Position inside another cell's span. The back-reference is
    /// maintained by every structural operation, never searched for.
    Covered { anchor: CellPos },
}

impl Slot {
    pub fn is_anchor(&self) -> bool {
        matches!(self, Slot::Anchor(_))
    }

    pub fn as_anchor(&self) -> Option<&Cell> {
        match self {
            Slot::Anchor(cell) => Some(cell),
            Slot::Covered { .. } => None,
        }
    }

    pub fn as_anchor_mut(&mut self) -> Option<&mut Cell> {
        match self {
            Slot::Anchor(cell) => Some(cell),
            Slot::Covered { .. } => None,
        }
    }

    /// For a covered slot, the position of its owning anchor.
    pub fn covered_by(&self) -> Option<CellPos> {
        match self {
            Slot::Anchor(_) => None,
            Slot::Covered { anchor } => Some(*anchor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_defaults() {
        let cell = Cell::new();
        assert_eq!(cell.row_span, 1);
        assert_eq!(cell.col_span, 1);
        assert!(!cell.is_header);
        assert!(cell.bg_color.is_none());
        assert_eq!(cell.alignment, Alignment::Left);
        assert!(cell.content.is_empty());
        assert!(!cell.is_merged());
        assert_eq!(cell.area(), 1);
    }

    #[test]
    fn test_merged_area() {
        let cell = Cell {
            row_span: 2,
            col_span: 3,
            ..Cell::new()
        };
        assert!(cell.is_merged());
        assert_eq!(cell.area(), 6);
    }

    #[test]
    fn test_slot_accessors() {
        let anchor = Slot::Anchor(Cell::with_text("x"));
        assert!(anchor.is_anchor());
        assert!(anchor.covered_by().is_none());

        let covered = Slot::Covered {
            anchor: CellPos::new(1, 2),
        };
        assert!(!covered.is_anchor());
        assert_eq!(covered.covered_by(), Some(CellPos::new(1, 2)));
        assert!(covered.as_anchor().is_none());
    }
}
