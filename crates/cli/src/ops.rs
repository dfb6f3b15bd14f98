//! The op language replayed by `tablekit apply`.
//!
//! An ops file is a JSON array; each element is tagged with an `"op"`
//! field in snake_case:
//!
//! ```json
//! [
//!   {"op": "insert_row", "index": 1},
//!   {"op": "merge", "startRow": 0, "startCol": 0, "endRow": 1, "endCol": 1},
//!   {"op": "set_text", "row": 0, "col": 0, "text": "Name"}
//! ]
//! ```
//!
//! Replay is transactional at the command level: the first rejected op
//! aborts the run and nothing is written back.

use serde::{Deserialize, Serialize};

use tablekit_controller::resize::ColumnWidths;
use tablekit_model::cell::{Alignment, CellContent};
use tablekit_model::error::GridError;
use tablekit_model::grid::Grid;
use tablekit_model::pos::CellPos;
use tablekit_model::range::Range;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    #[serde(rename_all = "camelCase")]
    InsertRow { index: usize },
    #[serde(rename_all = "camelCase")]
    InsertColumn { index: usize },
    /// Insert below the span containing (row, col).
    #[serde(rename_all = "camelCase")]
    InsertRowAfter { row: usize, col: usize },
    /// Insert right of the span containing (row, col).
    #[serde(rename_all = "camelCase")]
    InsertColumnAfter { row: usize, col: usize },
    #[serde(rename_all = "camelCase")]
    RemoveRow { index: usize },
    #[serde(rename_all = "camelCase")]
    RemoveColumn { index: usize },
    #[serde(rename_all = "camelCase")]
    Merge {
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    },
    #[serde(rename_all = "camelCase")]
    Unmerge { row: usize, col: usize },
    #[serde(rename_all = "camelCase")]
    SetRowHeader { index: usize, on: bool },
    #[serde(rename_all = "camelCase")]
    SetColumnHeader { index: usize, on: bool },
    #[serde(rename_all = "camelCase")]
    SetText { row: usize, col: usize, text: String },
    #[serde(rename_all = "camelCase")]
    SetImage { row: usize, col: usize, src: String },
    #[serde(rename_all = "camelCase")]
    SetColor {
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
        color: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SetAlignment {
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
        alignment: Alignment,
    },
    /// Drop rows left fully hidden by earlier removals.
    PruneCoveredRows,
}

/// An op the model refused, with its position in the ops array.
#[derive(Debug)]
pub struct OpError {
    pub index: usize,
    pub source: GridError,
}

impl std::fmt::Display for OpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "op #{} rejected: {}", self.index, self.source)
    }
}

impl std::error::Error for OpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Replay `ops` in order. Column inserts and removals keep `widths` in
/// step with the grid; new columns get `default_width`.
pub fn apply_all(
    grid: &mut Grid,
    widths: &mut ColumnWidths,
    default_width: u32,
    ops: &[Op],
) -> Result<(), OpError> {
    for (index, op) in ops.iter().enumerate() {
        log::debug!("applying {:?}", op);
        apply_one(grid, widths, default_width, op).map_err(|source| OpError { index, source })?;
    }
    Ok(())
}

fn apply_one(
    grid: &mut Grid,
    widths: &mut ColumnWidths,
    default_width: u32,
    op: &Op,
) -> Result<(), GridError> {
    match op {
        Op::InsertRow { index } => {
            grid.insert_row(*index);
        }
        Op::InsertColumn { index } => {
            let at = grid.insert_column(*index);
            widths.insert(at, default_width);
        }
        Op::InsertRowAfter { row, col } => {
            grid.insert_row_after(CellPos::new(*row, *col))?;
        }
        Op::InsertColumnAfter { row, col } => {
            let at = grid.insert_column_after(CellPos::new(*row, *col))?;
            widths.insert(at, default_width);
        }
        Op::RemoveRow { index } => {
            grid.remove_row(*index)?;
        }
        Op::RemoveColumn { index } => {
            grid.remove_column(*index)?;
            widths.remove(*index);
        }
        Op::Merge {
            start_row,
            start_col,
            end_row,
            end_col,
        } => {
            grid.merge_range(Range::new(*start_row, *start_col, *end_row, *end_col))?;
        }
        Op::Unmerge { row, col } => {
            grid.unmerge(CellPos::new(*row, *col))?;
        }
        Op::SetRowHeader { index, on } => {
            grid.set_row_header(*index, *on)?;
        }
        Op::SetColumnHeader { index, on } => {
            grid.set_column_header(*index, *on)?;
        }
        Op::SetText { row, col, text } => {
            grid.set_content(CellPos::new(*row, *col), CellContent::text(text.clone()))?;
        }
        Op::SetImage { row, col, src } => {
            grid.set_content(
                CellPos::new(*row, *col),
                CellContent::Image { src: src.clone() },
            )?;
        }
        Op::SetColor {
            start_row,
            start_col,
            end_row,
            end_col,
            color,
        } => {
            grid.set_background(
                Range::new(*start_row, *start_col, *end_row, *end_col),
                color.clone(),
            );
        }
        Op::SetAlignment {
            start_row,
            start_col,
            end_row,
            end_col,
            alignment,
        } => {
            grid.set_alignment(
                Range::new(*start_row, *start_col, *end_row, *end_col),
                *alignment,
            );
        }
        Op::PruneCoveredRows => {
            grid.prune_covered_rows();
        }
    }
    Ok(())
}
