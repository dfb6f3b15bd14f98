//! The cell-menu surface: one enum per menu entry, availability gating,
//! and the mapping from an entry to model calls.
//!
//! Actions operate on the current selection (already span-closed by the
//! selection module). Column actions keep the width metadata in step
//! with the grid so the colgroup never drifts out of sync.

use tablekit_model::cell::{Alignment, CellContent};
use tablekit_model::error::GridError;
use tablekit_model::grid::Grid;
use tablekit_model::pos::CellPos;
use tablekit_model::range::Range;

use crate::config::TableConfig;
use crate::host::{HostApi, ImageUploader, UploadError};
use crate::resize::ColumnWidths;

/// Everything the cell menu can do.
#[derive(Debug, Clone, PartialEq)]
pub enum CellAction {
    MergeCells,
    DivideCell,
    InsertColumnRight,
    InsertRowBelow,
    RemoveColumn,
    RemoveRow,
    ToggleHeaderRow,
    ToggleHeaderColumn,
    /// `None` clears the background (the palette's first swatch).
    SetColor(Option<String>),
    SetAlignment(Alignment),
}

impl CellAction {
    /// The i18n key the host translates for display.
    pub fn label_key(&self) -> &'static str {
        match self {
            CellAction::MergeCells => "Merge Cells",
            CellAction::DivideCell => "Divide Cell",
            CellAction::InsertColumnRight => "Insert Column On Right",
            CellAction::InsertRowBelow => "Insert Row Below",
            CellAction::RemoveColumn => "Remove Column",
            CellAction::RemoveRow => "Remove Row",
            CellAction::ToggleHeaderRow => "Header Row",
            CellAction::ToggleHeaderColumn => "Header Column",
            CellAction::SetColor(_) => "Cell Color",
            CellAction::SetAlignment(Alignment::Left) => "Text Left",
            CellAction::SetAlignment(Alignment::Center) => "Text Center",
            CellAction::SetAlignment(Alignment::Right) => "Text Right",
        }
    }

    pub fn label(&self, host: &dyn HostApi) -> String {
        host.translate(self.label_key())
    }
}

/// Which menu entries the current selection enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub merge: bool,
    pub divide: bool,
    pub header_row: bool,
    pub header_column: bool,
}

/// Menu gating for a selection: merge needs at least two whole cells,
/// divide needs a merged anchor at the top-left, header toggles only
/// appear on the first row/column.
pub fn availability(grid: &Grid, selection: &Range) -> Availability {
    let anchors_touched = selection
        .cells()
        .filter(|(r, c)| grid.cell(CellPos::new(*r, *c)).is_some())
        .count();
    Availability {
        merge: anchors_touched > 1 && grid.is_merge_possible(selection),
        divide: grid
            .cell(selection.top_left())
            .map_or(false, |cell| cell.is_merged()),
        header_row: selection.start_row == 0,
        header_column: selection.start_col == 0,
    }
}

/// Apply one menu action. Width metadata is updated alongside column
/// structure; all other bookkeeping lives in the model.
pub fn apply(
    grid: &mut Grid,
    widths: &mut ColumnWidths,
    config: &TableConfig,
    selection: &Range,
    action: &CellAction,
) -> Result<(), GridError> {
    log::debug!("cell menu: {:?} on {:?}", action, selection);
    match action {
        CellAction::MergeCells => grid.merge_range(*selection),
        CellAction::DivideCell => grid.unmerge(selection.top_left()),
        CellAction::InsertColumnRight => {
            let at = grid.insert_column_after(selection.top_left())?;
            widths.insert(at, config.column_width);
            Ok(())
        }
        CellAction::InsertRowBelow => {
            grid.insert_row_after(selection.top_left())?;
            Ok(())
        }
        CellAction::RemoveColumn => {
            grid.remove_column(selection.start_col)?;
            widths.remove(selection.start_col);
            // Removing a span's last free column can leave rows with no
            // visible cell in them.
            grid.prune_covered_rows();
            Ok(())
        }
        CellAction::RemoveRow => grid.remove_row(selection.start_row),
        CellAction::ToggleHeaderRow => {
            let on = !grid.is_row_header_on();
            grid.set_row_header(0, on)
        }
        CellAction::ToggleHeaderColumn => {
            let on = !grid.is_col_header_on();
            grid.set_column_header(0, on)
        }
        CellAction::SetColor(color) => {
            grid.set_background(*selection, color.clone());
            Ok(())
        }
        CellAction::SetAlignment(alignment) => {
            grid.set_alignment(*selection, *alignment);
            Ok(())
        }
    }
}

/// Removing the last row or column empties the table; the block then
/// removes itself from the document. Returns whether it did.
pub fn delete_block_if_empty(grid: &Grid, host: &mut dyn HostApi) -> bool {
    if grid.is_empty() {
        let index = host.current_block_index();
        log::debug!("table emptied, deleting block {}", index);
        host.delete_block(index);
        true
    } else {
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    Grid(GridError),
    Upload(UploadError),
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::Grid(e) => e.fmt(f),
            ActionError::Upload(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<GridError> for ActionError {
    fn from(e: GridError) -> Self {
        ActionError::Grid(e)
    }
}

impl From<UploadError> for ActionError {
    fn from(e: UploadError) -> Self {
        ActionError::Upload(e)
    }
}

/// Run the upload collaborator and store the resulting `src` in the
/// cell. The grid is untouched when the upload fails.
pub fn upload_image_into(
    grid: &mut Grid,
    pos: CellPos,
    uploader: &mut dyn ImageUploader,
    filename: &str,
    bytes: &[u8],
) -> Result<(), ActionError> {
    let image = uploader.upload(filename, bytes)?;
    grid.set_content(pos, CellContent::Image { src: image.src })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fakes::{FakeHost, FakeUploader};

    fn setup(rows: usize, cols: usize) -> (Grid, ColumnWidths, TableConfig) {
        let config = TableConfig::default();
        let grid = Grid::new(rows, cols);
        let widths = ColumnWidths::new(cols, config.column_width, config.min_column_width);
        (grid, widths, config)
    }

    #[test]
    fn test_merge_then_divide() {
        let (mut grid, mut widths, config) = setup(3, 3);
        let selection = Range::new(0, 0, 1, 1);
        apply(&mut grid, &mut widths, &config, &selection, &CellAction::MergeCells).unwrap();
        assert!(grid.cell(CellPos::new(0, 0)).unwrap().is_merged());

        apply(&mut grid, &mut widths, &config, &selection, &CellAction::DivideCell).unwrap();
        assert_eq!(grid.anchors().count(), 9);
    }

    #[test]
    fn test_merge_on_bad_selection_reports_not_eligible() {
        let (mut grid, mut widths, config) = setup(2, 3);
        grid.merge_range(Range::new(0, 0, 0, 1)).unwrap();
        let half = Range::new(0, 1, 1, 1);
        let err = apply(&mut grid, &mut widths, &config, &half, &CellAction::MergeCells);
        assert_eq!(err, Err(GridError::MergeNotEligible));
    }

    #[test]
    fn test_insert_column_right_keeps_widths_aligned() {
        let (mut grid, mut widths, config) = setup(2, 2);
        grid.merge_range(Range::new(0, 0, 0, 1)).unwrap();

        // Right of the 2-wide span: column 2.
        let selection = Range::single(0, 0);
        apply(&mut grid, &mut widths, &config, &selection, &CellAction::InsertColumnRight)
            .unwrap();
        assert_eq!(grid.column_count(), 3);
        assert_eq!(widths.len(), 3);
        assert_eq!(widths.get(2), Some(config.column_width));
    }

    #[test]
    fn test_insert_row_below() {
        let (mut grid, mut widths, config) = setup(2, 2);
        let selection = Range::single(0, 1);
        apply(&mut grid, &mut widths, &config, &selection, &CellAction::InsertRowBelow).unwrap();
        assert_eq!(grid.row_count(), 3);
    }

    #[test]
    fn test_remove_column_prunes_hidden_rows() {
        let (mut grid, mut widths, config) = setup(2, 2);
        grid.merge_range(Range::new(0, 0, 1, 0)).unwrap();

        // Removing column 1 leaves row 1 fully covered by the span.
        let selection = Range::single(0, 1);
        apply(&mut grid, &mut widths, &config, &selection, &CellAction::RemoveColumn).unwrap();
        assert_eq!(grid.column_count(), 1);
        assert_eq!(widths.len(), 1);
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn test_header_toggles_flip_state() {
        let (mut grid, mut widths, config) = setup(2, 2);
        let selection = Range::single(0, 0);
        apply(&mut grid, &mut widths, &config, &selection, &CellAction::ToggleHeaderRow).unwrap();
        assert!(grid.is_row_header_on());
        apply(&mut grid, &mut widths, &config, &selection, &CellAction::ToggleHeaderRow).unwrap();
        assert!(!grid.is_row_header_on());
    }

    #[test]
    fn test_color_and_alignment_apply_to_selection() {
        let (mut grid, mut widths, config) = setup(2, 2);
        let selection = Range::new(0, 0, 1, 1);
        apply(
            &mut grid,
            &mut widths,
            &config,
            &selection,
            &CellAction::SetColor(Some("#e0ebfd".to_string())),
        )
        .unwrap();
        apply(
            &mut grid,
            &mut widths,
            &config,
            &selection,
            &CellAction::SetAlignment(Alignment::Center),
        )
        .unwrap();

        let cell = grid.cell(CellPos::new(1, 1)).unwrap();
        assert_eq!(cell.bg_color.as_deref(), Some("#e0ebfd"));
        assert_eq!(cell.alignment, Alignment::Center);
    }

    #[test]
    fn test_availability_gating() {
        let mut grid = Grid::new(3, 3);
        grid.merge_range(Range::new(0, 0, 1, 1)).unwrap();

        // Whole span alone: nothing new to merge, divide available.
        let on_span = availability(&grid, &Range::new(0, 0, 1, 1));
        assert!(!on_span.merge);
        assert!(on_span.divide);
        assert!(on_span.header_row);
        assert!(on_span.header_column);

        // Span plus the column to its right: merge becomes available.
        let wider = availability(&grid, &Range::new(0, 0, 1, 2));
        assert!(wider.merge);

        // Plain interior cell: neither, and no header toggles.
        let plain = availability(&grid, &Range::single(2, 2));
        assert!(!plain.merge);
        assert!(!plain.divide);
        assert!(!plain.header_row);
        assert!(!plain.header_column);
    }

    #[test]
    fn test_labels_translate_through_host() {
        let host = FakeHost::default();
        assert_eq!(CellAction::MergeCells.label(&host), "t:Merge Cells");
        assert_eq!(
            CellAction::SetAlignment(Alignment::Right).label(&host),
            "t:Text Right"
        );
        assert_eq!(CellAction::SetColor(None).label_key(), "Cell Color");
    }

    #[test]
    fn test_removing_last_row_deletes_the_block() {
        let (mut grid, mut widths, config) = setup(1, 2);
        let mut host = FakeHost::default();
        let selection = Range::single(0, 0);
        apply(&mut grid, &mut widths, &config, &selection, &CellAction::RemoveRow).unwrap();

        assert!(delete_block_if_empty(&grid, &mut host));
        assert_eq!(host.deleted, vec![7]);
    }

    #[test]
    fn test_upload_image_success_and_failure() {
        let mut grid = Grid::new(1, 1);
        let mut uploader = FakeUploader::default();
        upload_image_into(&mut grid, CellPos::new(0, 0), &mut uploader, "cat.png", b"...")
            .unwrap();
        assert_eq!(
            grid.cell(CellPos::new(0, 0)).unwrap().content,
            CellContent::Image {
                src: "https://cdn.example.com/cat.png".to_string()
            }
        );

        uploader.reject.insert("virus.exe".to_string());
        let err = upload_image_into(&mut grid, CellPos::new(0, 0), &mut uploader, "virus.exe", b"")
            .unwrap_err();
        assert!(matches!(err, ActionError::Upload(UploadError::Rejected(_))));
        // The cell keeps its previous content on failure.
        assert!(matches!(
            grid.cell(CellPos::new(0, 0)).unwrap().content,
            CellContent::Image { .. }
        ));
    }
}
