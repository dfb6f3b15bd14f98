//! The grid model: an ordered sequence of rows of slots, each slot either
//! an anchor cell (owning content and a span) or a covered slot inside
//! another cell's span.
//!
//! The grid is the single authoritative structure; rendering layers
//! project from it and feed user input back as the operations below.
//! After every mutating call the structural invariant holds: every row
//! has exactly `column_count` slots, every covered slot's back-reference
//! names an existing anchor whose span rectangle contains it, and no two
//! span rectangles overlap. `verify::check` asserts this in tests.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cell::{Alignment, Cell, CellContent, Slot};
use crate::error::{Axis, GridError};
use crate::events::GridEvent;
use crate::pos::CellPos;
use crate::range::Range;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Slot>>,
    column_count: usize,
    /// First row is styled as a header row.
    row_header_on: bool,
    /// First column is styled as a header column.
    col_header_on: bool,
    /// Buffered change notifications, drained by the render driver.
    #[serde(skip)]
    events: Vec<GridEvent>,
}

impl Grid {
    /// Create a grid of `rows` x `cols` fresh 1x1 anchors.
    pub fn new(rows: usize, cols: usize) -> Self {
        let grid_rows = (0..rows)
            .map(|_| (0..cols).map(|_| Slot::Anchor(Cell::new())).collect())
            .collect();
        Self {
            rows: grid_rows,
            column_count: cols,
            row_header_on: false,
            col_header_on: false,
            events: Vec::new(),
        }
    }

    /// Assemble a grid from pre-built slots (the deserialization path).
    ///
    /// The caller must supply rectangular rows with consistent
    /// back-references; `verify::check` is debug-asserted here and the
    /// block loader's recovery pass guarantees it for untrusted input.
    pub fn from_parts(rows: Vec<Vec<Slot>>, row_header_on: bool, col_header_on: bool) -> Self {
        let column_count = rows.first().map_or(0, |r| r.len());
        let grid = Self {
            rows,
            column_count,
            row_header_on,
            col_header_on,
            events: Vec::new(),
        };
        debug_assert!(
            crate::verify::check(&grid).is_ok(),
            "from_parts given inconsistent slots"
        );
        grid
    }

    /// Build a grid without consistency checks, so the checker's own
    /// tests can construct deliberately broken grids.
    #[cfg(test)]
    pub(crate) fn from_raw_for_tests(rows: Vec<Vec<Slot>>) -> Self {
        let column_count = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Self {
            rows,
            column_count,
            row_header_on: false,
            col_header_on: false,
            events: Vec::new(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.column_count == 0
    }

    pub fn is_row_header_on(&self) -> bool {
        self.row_header_on
    }

    pub fn is_col_header_on(&self) -> bool {
        self.col_header_on
    }

    pub fn row(&self, index: usize) -> Option<&[Slot]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    pub fn slot(&self, pos: CellPos) -> Option<&Slot> {
        self.rows.get(pos.row)?.get(pos.col)
    }

    /// The anchor cell located exactly at `pos`, if any.
    pub fn cell(&self, pos: CellPos) -> Option<&Cell> {
        self.slot(pos)?.as_anchor()
    }

    fn cell_mut(&mut self, pos: CellPos) -> Option<&mut Cell> {
        self.rows.get_mut(pos.row)?.get_mut(pos.col)?.as_anchor_mut()
    }

    /// The anchor owning `(row, col)` — the slot itself if it is an
    /// anchor, otherwise the covered slot's back-reference. O(1).
    pub fn find_anchor(&self, row: usize, col: usize) -> Option<CellPos> {
        match self.rows.get(row)?.get(col)? {
            Slot::Anchor(_) => Some(CellPos::new(row, col)),
            Slot::Covered { anchor } => Some(*anchor),
        }
    }

    /// The span rectangle of the anchor at `pos`.
    pub fn anchor_rect(&self, pos: CellPos) -> Option<Range> {
        let cell = self.cell(pos)?;
        Some(Range::new(
            pos.row,
            pos.col,
            pos.row + cell.row_span - 1,
            pos.col + cell.col_span - 1,
        ))
    }

    /// Iterate all anchors in row-major order.
    pub fn anchors(&self) -> impl Iterator<Item = (CellPos, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, slot)| {
                slot.as_anchor().map(|cell| (CellPos::new(r, c), cell))
            })
        })
    }

    /// Buffered change events since the last drain.
    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    fn check_pos(&self, pos: CellPos) -> Result<(), GridError> {
        if pos.row >= self.rows.len() {
            return Err(GridError::InvalidIndex {
                axis: Axis::Row,
                index: pos.row,
                len: self.rows.len(),
            });
        }
        if pos.col >= self.column_count {
            return Err(GridError::InvalidIndex {
                axis: Axis::Column,
                index: pos.col,
                len: self.column_count,
            });
        }
        Ok(())
    }

    /// A brand new cell for `(row, col)`, inheriting the grid-level
    /// header flags for its position.
    fn fresh_cell(&self, row: usize, col: usize) -> Cell {
        Cell {
            is_header: (row == 0 && self.row_header_on) || (col == 0 && self.col_header_on),
            ..Cell::new()
        }
    }

    /// A cell released from a span: empty content, background and
    /// alignment carried over from the former anchor.
    fn released_cell(&self, row: usize, col: usize, src: &Cell) -> Cell {
        Cell {
            bg_color: src.bg_color.clone(),
            alignment: src.alignment,
            ..self.fresh_cell(row, col)
        }
    }

    // =========================================================================
    // Row / column insertion
    // =========================================================================

    /// Insert a row of fresh 1x1 anchors at `index` (clamped to append).
    ///
    /// Insertion is expected at a row boundary, where no span is
    /// altered. If the boundary does cut through a vertical span, the
    /// span is extended by one and the new slots inside it become
    /// covered, so the structure stays consistent either way.
    ///
    /// Returns the index the row actually landed at.
    pub fn insert_row(&mut self, index: usize) -> usize {
        let index = index.min(self.rows.len());
        let inside = index > 0 && index < self.rows.len();

        let mut extended: FxHashSet<CellPos> = FxHashSet::default();
        let mut new_row = Vec::with_capacity(self.column_count);
        for c in 0..self.column_count {
            let crossing = if inside {
                self.find_anchor(index - 1, c).filter(|a| {
                    self.cell(*a)
                        .map_or(false, |cell| a.row + cell.row_span > index)
                })
            } else {
                None
            };
            match crossing {
                Some(a) => {
                    extended.insert(a);
                    new_row.push(Slot::Covered { anchor: a });
                }
                None => new_row.push(Slot::Anchor(self.fresh_cell(index, c))),
            }
        }

        // Re-aim back-references at anchors shifting down.
        for row in &mut self.rows {
            for slot in row {
                if let Slot::Covered { anchor } = slot {
                    if anchor.row >= index {
                        anchor.row += 1;
                    }
                }
            }
        }

        self.rows.insert(index, new_row);
        for a in extended {
            if let Some(cell) = self.cell_mut(a) {
                cell.row_span += 1;
            }
        }

        self.events.push(GridEvent::RowInserted { index });
        index
    }

    /// Insert a column of fresh 1x1 anchors at `index` (clamped to
    /// append). Column twin of [`Grid::insert_row`], including the
    /// defensive span extension when the boundary cuts a horizontal
    /// span. Increments `column_count`.
    pub fn insert_column(&mut self, index: usize) -> usize {
        let index = index.min(self.column_count);
        let inside = index > 0 && index < self.column_count;

        let mut extended: FxHashSet<CellPos> = FxHashSet::default();
        let mut new_slots = Vec::with_capacity(self.rows.len());
        for r in 0..self.rows.len() {
            let crossing = if inside {
                self.find_anchor(r, index - 1).filter(|a| {
                    self.cell(*a)
                        .map_or(false, |cell| a.col + cell.col_span > index)
                })
            } else {
                None
            };
            match crossing {
                Some(a) => {
                    extended.insert(a);
                    new_slots.push(Slot::Covered { anchor: a });
                }
                None => new_slots.push(Slot::Anchor(self.fresh_cell(r, index))),
            }
        }

        for row in &mut self.rows {
            for slot in row {
                if let Slot::Covered { anchor } = slot {
                    if anchor.col >= index {
                        anchor.col += 1;
                    }
                }
            }
        }

        for (r, slot) in new_slots.into_iter().enumerate() {
            self.rows[r].insert(index, slot);
        }
        self.column_count += 1;
        for a in extended {
            if let Some(cell) = self.cell_mut(a) {
                cell.col_span += 1;
            }
        }

        self.events.push(GridEvent::ColumnInserted { index });
        index
    }

    /// Insert a row immediately below the span of the cell owning `pos`.
    ///
    /// When a sibling column's vertical span reaches past the insertion
    /// line, that span grows by one; the cell at `pos` itself is never
    /// extended because insertion happens below its bottom edge.
    pub fn insert_row_after(&mut self, pos: CellPos) -> Result<usize, GridError> {
        self.check_pos(pos)?;
        let anchor = match self.find_anchor(pos.row, pos.col) {
            Some(a) => a,
            None => return Err(GridError::NotAnAnchor(pos)),
        };
        let row_span = self.cell(anchor).map_or(1, |c| c.row_span);
        Ok(self.insert_row(anchor.row + row_span))
    }

    /// Insert a column immediately to the right of the span of the cell
    /// owning `pos`. Column twin of [`Grid::insert_row_after`].
    pub fn insert_column_after(&mut self, pos: CellPos) -> Result<usize, GridError> {
        self.check_pos(pos)?;
        let anchor = match self.find_anchor(pos.row, pos.col) {
            Some(a) => a,
            None => return Err(GridError::NotAnAnchor(pos)),
        };
        let col_span = self.cell(anchor).map_or(1, |c| c.col_span);
        Ok(self.insert_column(anchor.col + col_span))
    }

    // =========================================================================
    // Row / column removal
    // =========================================================================

    /// Remove the row at `index`.
    ///
    /// Spans anchored in this row release their surviving covered slots
    /// to fresh 1x1 cells (no silent data loss of positions); spans
    /// crossing this row from above shrink by one. Removing row 0
    /// clears the header-row flag.
    pub fn remove_row(&mut self, index: usize) -> Result<(), GridError> {
        let len = self.rows.len();
        if index >= len {
            return Err(GridError::InvalidIndex {
                axis: Axis::Row,
                index,
                len,
            });
        }

        let mut shrink: FxHashSet<CellPos> = FxHashSet::default();
        for c in 0..self.column_count {
            match self.rows[index][c].clone() {
                Slot::Anchor(cell) => {
                    // The anchor dies with its row; slots below its span
                    // become freestanding cells again.
                    if cell.row_span > 1 {
                        for r in index + 1..(index + cell.row_span).min(len) {
                            for cc in c..(c + cell.col_span).min(self.column_count) {
                                let fresh = self.released_cell(r, cc, &cell);
                                self.rows[r][cc] = Slot::Anchor(fresh);
                            }
                        }
                    }
                }
                Slot::Covered { anchor } => {
                    // Owned by a span from above: that span no longer
                    // includes this row. Once per anchor.
                    if anchor.row < index {
                        shrink.insert(anchor);
                    }
                }
            }
        }
        for a in shrink {
            if let Some(cell) = self.cell_mut(a) {
                cell.row_span -= 1;
            }
        }

        self.rows.remove(index);
        for row in &mut self.rows {
            for slot in row {
                if let Slot::Covered { anchor } = slot {
                    if anchor.row > index {
                        anchor.row -= 1;
                    }
                }
            }
        }

        if index == 0 {
            self.row_header_on = false;
        }
        self.events.push(GridEvent::RowRemoved { index });
        Ok(())
    }

    /// Remove the column at `index`. Column twin of
    /// [`Grid::remove_row`], walking left instead of up.
    pub fn remove_column(&mut self, index: usize) -> Result<(), GridError> {
        if index >= self.column_count {
            return Err(GridError::InvalidIndex {
                axis: Axis::Column,
                index,
                len: self.column_count,
            });
        }

        let mut shrink: FxHashSet<CellPos> = FxHashSet::default();
        for r in 0..self.rows.len() {
            match self.rows[r][index].clone() {
                Slot::Anchor(cell) => {
                    if cell.col_span > 1 {
                        let row_end = (r + cell.row_span).min(self.rows.len());
                        for rr in r..row_end {
                            for cc in index + 1..(index + cell.col_span).min(self.column_count) {
                                let fresh = self.released_cell(rr, cc, &cell);
                                self.rows[rr][cc] = Slot::Anchor(fresh);
                            }
                        }
                    }
                }
                Slot::Covered { anchor } => {
                    if anchor.col < index {
                        shrink.insert(anchor);
                    }
                }
            }
        }
        for a in shrink {
            if let Some(cell) = self.cell_mut(a) {
                cell.col_span -= 1;
            }
        }

        for row in &mut self.rows {
            row.remove(index);
        }
        self.column_count -= 1;
        for row in &mut self.rows {
            for slot in row {
                if let Slot::Covered { anchor } = slot {
                    if anchor.col > index {
                        anchor.col -= 1;
                    }
                }
            }
        }

        if index == 0 {
            self.col_header_on = false;
        }
        self.events.push(GridEvent::ColumnRemoved { index });
        Ok(())
    }

    /// Remove rows consisting entirely of covered slots (possible after
    /// column removal collapses a span's last free column). When exactly
    /// one row remains, all row spans reset to 1. Returns the number of
    /// rows removed.
    pub fn prune_covered_rows(&mut self) -> usize {
        let mut removed = 0;
        loop {
            let hidden = self
                .rows
                .iter()
                .position(|row| !row.is_empty() && row.iter().all(|slot| !slot.is_anchor()));
            match hidden {
                Some(index) => {
                    if self.remove_row(index).is_err() {
                        break;
                    }
                    removed += 1;
                }
                None => break,
            }
        }

        if self.rows.len() == 1 {
            for slot in &mut self.rows[0] {
                if let Slot::Anchor(cell) = slot {
                    cell.row_span = 1;
                }
            }
        }
        removed
    }

    // =========================================================================
    // Merge / unmerge
    // =========================================================================

    /// True iff the rectangle tiles exactly into whole existing cells:
    /// every slot in it resolves to an anchor whose span rectangle lies
    /// entirely inside the rectangle. This is equivalent to the
    /// selected-count == visible-area test, minus its blind spot where
    /// an overhanging span and a foreign covered slot cancel out.
    pub fn is_merge_possible(&self, range: &Range) -> bool {
        if self.rows.is_empty() || self.column_count == 0 {
            return false;
        }
        let bounds = Range::new(0, 0, self.rows.len() - 1, self.column_count - 1);
        if !bounds.contains_range(range) {
            return false;
        }
        for (r, c) in range.cells() {
            let anchor = match self.find_anchor(r, c) {
                Some(a) => a,
                None => return false,
            };
            let rect = match self.anchor_rect(anchor) {
                Some(rect) => rect,
                None => return false,
            };
            if !range.contains_range(&rect) {
                return false;
            }
        }
        true
    }

    /// Merge the rectangle into the anchor at its top-left corner.
    ///
    /// The top-left cell keeps its content; every other slot in the
    /// rectangle becomes covered and its content is discarded. On an
    /// ineligible rectangle the grid is left untouched.
    pub fn merge_range(&mut self, range: Range) -> Result<(), GridError> {
        if !self.is_merge_possible(&range) {
            return Err(GridError::MergeNotEligible);
        }
        let tl = range.top_left();
        for (r, c) in range.cells() {
            if r == tl.row && c == tl.col {
                continue;
            }
            self.rows[r][c] = Slot::Covered { anchor: tl };
        }
        if let Some(cell) = self.cell_mut(tl) {
            cell.row_span = range.height();
            cell.col_span = range.width();
        }
        self.events.push(GridEvent::CellsMerged { range });
        Ok(())
    }

    /// Split the merged anchor at `pos` back into 1x1 cells.
    ///
    /// Released slots come back empty, inheriting the anchor's
    /// background and alignment and the grid-level header flags for
    /// their position. The anchor keeps its content and resets to 1x1.
    /// A 1x1 anchor is a no-op.
    pub fn unmerge(&mut self, pos: CellPos) -> Result<(), GridError> {
        self.check_pos(pos)?;
        let cell = match self.slot(pos) {
            Some(Slot::Anchor(cell)) => cell.clone(),
            _ => return Err(GridError::NotAnAnchor(pos)),
        };
        if !cell.is_merged() {
            return Ok(());
        }

        for r in pos.row..(pos.row + cell.row_span).min(self.rows.len()) {
            for c in pos.col..(pos.col + cell.col_span).min(self.column_count) {
                if r == pos.row && c == pos.col {
                    continue;
                }
                let fresh = self.released_cell(r, c, &cell);
                self.rows[r][c] = Slot::Anchor(fresh);
            }
        }
        if let Some(cell) = self.cell_mut(pos) {
            cell.row_span = 1;
            cell.col_span = 1;
        }
        self.events.push(GridEvent::CellUnmerged { anchor: pos });
        Ok(())
    }

    // =========================================================================
    // Headers, content, styling
    // =========================================================================

    /// Set the header flag on every anchor in row `row`. Idempotent;
    /// spans are never altered. Row 0 also drives the grid-level
    /// header-row flag that fresh cells inherit from.
    pub fn set_row_header(&mut self, row: usize, on: bool) -> Result<(), GridError> {
        if row >= self.rows.len() {
            return Err(GridError::InvalidIndex {
                axis: Axis::Row,
                index: row,
                len: self.rows.len(),
            });
        }
        for slot in &mut self.rows[row] {
            if let Slot::Anchor(cell) = slot {
                cell.is_header = on;
            }
        }
        if row == 0 {
            self.row_header_on = on;
        }
        self.events.push(GridEvent::HeaderToggled {
            axis: Axis::Row,
            index: row,
            on,
        });
        Ok(())
    }

    /// Set the header flag on every anchor in column `col`. Column twin
    /// of [`Grid::set_row_header`].
    pub fn set_column_header(&mut self, col: usize, on: bool) -> Result<(), GridError> {
        if col >= self.column_count {
            return Err(GridError::InvalidIndex {
                axis: Axis::Column,
                index: col,
                len: self.column_count,
            });
        }
        for row in &mut self.rows {
            if let Some(Slot::Anchor(cell)) = row.get_mut(col) {
                cell.is_header = on;
            }
        }
        if col == 0 {
            self.col_header_on = on;
        }
        self.events.push(GridEvent::HeaderToggled {
            axis: Axis::Column,
            index: col,
            on,
        });
        Ok(())
    }

    /// Replace the content of the anchor at `pos`.
    pub fn set_content(&mut self, pos: CellPos, content: CellContent) -> Result<(), GridError> {
        self.check_pos(pos)?;
        match self.cell_mut(pos) {
            Some(cell) => {
                cell.content = content;
                self.events.push(GridEvent::CellChanged { pos });
                Ok(())
            }
            None => Err(GridError::NotAnAnchor(pos)),
        }
    }

    /// Set the background color on every anchor inside `range`
    /// (clamped to the grid). `None` clears.
    pub fn set_background(&mut self, range: Range, color: Option<String>) {
        for (r, c) in range.cells() {
            let pos = CellPos::new(r, c);
            if let Some(cell) = self.cell_mut(pos) {
                cell.bg_color = color.clone();
                self.events.push(GridEvent::CellChanged { pos });
            }
        }
    }

    /// Set the text alignment on every anchor inside `range`.
    pub fn set_alignment(&mut self, range: Range, alignment: Alignment) {
        for (r, c) in range.cells() {
            let pos = CellPos::new(r, c);
            if let Some(cell) = self.cell_mut(pos) {
                cell.alignment = alignment;
                self.events.push(GridEvent::CellChanged { pos });
            }
        }
    }
}
