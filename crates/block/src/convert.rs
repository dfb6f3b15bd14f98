//! Conversion between the wire format and the grid model.
//!
//! Writing is mechanical. Reading is a best-effort recovery pass:
//! documents are hand-editable JSON, so ragged rows, spans reaching
//! outside the table, overlapping spans and hidden slots nothing owns
//! all occur in the wild. Loading never fails; every deviation is fixed
//! deterministically (row-major, earlier cell wins) and reported as a
//! [`Repair`].

use tablekit_model::cell::{Cell, CellContent, Slot};
use tablekit_model::grid::Grid;
use tablekit_model::pos::CellPos;

use crate::wire::{ColSpec, Settings, TableBlock, WireCell, WireContent, WireImage};

/// One fix applied while loading a malformed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    /// A row did not have one entry per column and was padded or cut.
    RowResized { row: usize, from: usize, to: usize },
    /// A span reached outside the table and was clamped to fit.
    SpanClamped { pos: CellPos },
    /// A span ran into slots already owned by an earlier cell and was
    /// reset to 1x1, keeping its content.
    OverlappingSpanReset { pos: CellPos },
    /// A visible cell sat inside an earlier cell's span; its payload
    /// was dropped and the slot became covered.
    SlotAbsorbed { pos: CellPos, anchor: CellPos },
    /// A hidden slot no span accounts for came back as an empty cell.
    OrphanRevived { pos: CellPos },
}

impl std::fmt::Display for Repair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Repair::RowResized { row, from, to } => {
                write!(f, "row {} resized from {} to {} slots", row, from, to)
            }
            Repair::SpanClamped { pos } => {
                write!(f, "span at {} clamped to the table bounds", pos)
            }
            Repair::OverlappingSpanReset { pos } => {
                write!(f, "span at {} overlapped an earlier cell, reset to 1x1", pos)
            }
            Repair::SlotAbsorbed { pos, anchor } => {
                write!(f, "visible cell at {} absorbed into the span of {}", pos, anchor)
            }
            Repair::OrphanRevived { pos } => {
                write!(f, "hidden slot at {} had no owning span, revived empty", pos)
            }
        }
    }
}

fn rect(r: usize, c: usize, h: usize, w: usize) -> impl Iterator<Item = (usize, usize)> {
    (r..r + h).flat_map(move |rr| (c..c + w).map(move |cc| (rr, cc)))
}

fn content_of(wire: &WireCell) -> CellContent {
    match &wire.content {
        WireContent::Text(s) => CellContent::Text(s.clone()),
        WireContent::Image(img) => CellContent::Image {
            src: img.src.clone(),
        },
    }
}

/// A colgroup of `n` single-span columns with no explicit widths.
pub fn plain_colgroup(n: usize) -> Vec<ColSpec> {
    (0..n).map(|_| ColSpec::plain()).collect()
}

/// Serialize a grid to its wire shape. Covered slots are written as
/// hidden placeholders so `rows` stays rectangular on the wire.
pub fn to_block(grid: &Grid, colgroup: Vec<ColSpec>, settings: Settings) -> TableBlock {
    let mut rows = Vec::with_capacity(grid.row_count());
    for r in 0..grid.row_count() {
        let mut out = Vec::with_capacity(grid.column_count());
        for c in 0..grid.column_count() {
            let wire = match grid.slot(CellPos::new(r, c)) {
                Some(Slot::Anchor(cell)) => WireCell {
                    content: match &cell.content {
                        CellContent::Text(s) => WireContent::Text(s.clone()),
                        CellContent::Image { src } => WireContent::Image(WireImage::new(src)),
                    },
                    colspan: cell.col_span,
                    rowspan: cell.row_span,
                    display: true,
                    bg_color: cell.bg_color.clone(),
                    is_header: cell.is_header,
                    alignment: cell.alignment,
                },
                _ => WireCell::hidden(),
            };
            out.push(wire);
        }
        rows.push(out);
    }
    TableBlock {
        rows,
        colgroup,
        settings,
    }
}

/// Load a block into a grid, repairing whatever does not add up.
///
/// Column count comes from the colgroup when present, otherwise from
/// the widest row. Repairs are also logged at warn level.
pub fn from_block(block: &TableBlock) -> (Grid, Vec<Repair>) {
    let mut repairs = Vec::new();
    let n_rows = block.rows.len();
    let n_cols = if !block.colgroup.is_empty() {
        block.colgroup.iter().map(|c| c.span.max(1)).sum()
    } else {
        block.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    };
    if n_rows == 0 || n_cols == 0 {
        return (Grid::new(0, 0), repairs);
    }

    // Pass 1: normalize to a rectangle.
    let mut cells: Vec<Vec<WireCell>> = Vec::with_capacity(n_rows);
    for (r, row) in block.rows.iter().enumerate() {
        let mut row = row.clone();
        if row.len() != n_cols {
            repairs.push(Repair::RowResized {
                row: r,
                from: row.len(),
                to: n_cols,
            });
            row.resize_with(n_cols, WireCell::default);
        }
        cells.push(row);
    }

    // Pass 2: row-major stamping. Register each visible cell as an
    // anchor and claim the slots its span covers; earlier cells win
    // every conflict.
    let mut anchors: Vec<Vec<Option<Cell>>> = vec![vec![None; n_cols]; n_rows];
    let mut claimed: Vec<Vec<Option<CellPos>>> = vec![vec![None; n_cols]; n_rows];
    for r in 0..n_rows {
        for c in 0..n_cols {
            let wire = &cells[r][c];
            if !wire.display {
                continue;
            }
            let pos = CellPos::new(r, c);
            if let Some(owner) = claimed[r][c] {
                repairs.push(Repair::SlotAbsorbed { pos, anchor: owner });
                continue;
            }

            let mut row_span = wire.rowspan.max(1);
            let mut col_span = wire.colspan.max(1);
            if r + row_span > n_rows || c + col_span > n_cols {
                row_span = row_span.min(n_rows - r);
                col_span = col_span.min(n_cols - c);
                repairs.push(Repair::SpanClamped { pos });
            }
            let overlap =
                rect(r, c, row_span, col_span).any(|(rr, cc)| claimed[rr][cc].is_some());
            if overlap {
                row_span = 1;
                col_span = 1;
                repairs.push(Repair::OverlappingSpanReset { pos });
            }
            for (rr, cc) in rect(r, c, row_span, col_span) {
                if (rr, cc) != (r, c) {
                    claimed[rr][cc] = Some(pos);
                }
            }
            anchors[r][c] = Some(Cell {
                content: content_of(wire),
                row_span,
                col_span,
                is_header: wire.is_header,
                bg_color: wire.bg_color.clone(),
                alignment: wire.alignment,
            });
        }
    }

    // Pass 3: assemble slots; hidden slots nothing claimed come back
    // as empty cells.
    let mut slots: Vec<Vec<Slot>> = Vec::with_capacity(n_rows);
    for (r, anchor_row) in anchors.into_iter().enumerate() {
        let mut row = Vec::with_capacity(n_cols);
        for (c, anchor) in anchor_row.into_iter().enumerate() {
            if let Some(cell) = anchor {
                row.push(Slot::Anchor(cell));
            } else if let Some(owner) = claimed[r][c] {
                row.push(Slot::Covered { anchor: owner });
            } else {
                repairs.push(Repair::OrphanRevived {
                    pos: CellPos::new(r, c),
                });
                row.push(Slot::Anchor(Cell::new()));
            }
        }
        slots.push(row);
    }

    // Header flags are not stored separately; a slice is a header slice
    // iff every anchor in it carries the flag.
    let row_header_on = slice_is_header(slots[0].iter());
    let col_header_on = slice_is_header(slots.iter().map(|row| &row[0]));

    for repair in &repairs {
        log::warn!("table block repaired: {}", repair);
    }
    (
        Grid::from_parts(slots, row_header_on, col_header_on),
        repairs,
    )
}

fn slice_is_header<'a>(slots: impl Iterator<Item = &'a Slot>) -> bool {
    let mut any = false;
    for slot in slots {
        if let Some(cell) = slot.as_anchor() {
            if !cell.is_header {
                return false;
            }
            any = true;
        }
    }
    any
}
