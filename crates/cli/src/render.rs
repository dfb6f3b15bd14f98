//! Plain-text table rendering for `tablekit show`.
//!
//! Anchors print their first content line (`*` suffix marks a header
//! cell, `[image]` stands in for image content); slots hidden under a
//! span print the anchor they point at, e.g. `<r0c0>`.

use tablekit_model::cell::{CellContent, Slot};
use tablekit_model::grid::Grid;
use tablekit_model::pos::CellPos;

fn slot_label(grid: &Grid, row: usize, col: usize) -> String {
    match grid.slot(CellPos::new(row, col)) {
        Some(Slot::Anchor(cell)) => {
            let mut label = match &cell.content {
                CellContent::Text(s) => s.lines().next().unwrap_or("").to_string(),
                CellContent::Image { .. } => "[image]".to_string(),
            };
            if cell.is_header {
                label.push('*');
            }
            label
        }
        Some(Slot::Covered { anchor }) => format!("<{}>", anchor),
        None => String::new(),
    }
}

/// One-line shape summary printed above the table.
pub fn summary(grid: &Grid) -> String {
    format!(
        "{}x{} | header row: {} | header column: {}",
        grid.row_count(),
        grid.column_count(),
        if grid.is_row_header_on() { "on" } else { "off" },
        if grid.is_col_header_on() { "on" } else { "off" },
    )
}

/// Render the grid as an ASCII table, one slot per cell.
pub fn render(grid: &Grid) -> String {
    let rows = grid.row_count();
    let cols = grid.column_count();
    let mut labels = vec![vec![String::new(); cols]; rows];
    let mut widths = vec![1usize; cols];
    for (r, row) in labels.iter_mut().enumerate() {
        for (c, label) in row.iter_mut().enumerate() {
            *label = slot_label(grid, r, c);
            widths[c] = widths[c].max(label.chars().count());
        }
    }

    let mut rule = String::from("+");
    for w in &widths {
        rule.push_str(&"-".repeat(w + 2));
        rule.push('+');
    }
    rule.push('\n');

    let mut out = rule.clone();
    for row in &labels {
        out.push('|');
        for (c, label) in row.iter().enumerate() {
            let pad = widths[c] - label.chars().count();
            out.push(' ');
            out.push_str(label);
            out.push_str(&" ".repeat(pad + 1));
            out.push('|');
        }
        out.push('\n');
        out.push_str(&rule);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekit_model::cell::CellContent;
    use tablekit_model::range::Range;

    #[test]
    fn test_render_marks_headers_and_covered_slots() {
        let mut grid = Grid::new(2, 2);
        grid.set_row_header(0, true).unwrap();
        grid.merge_range(Range::new(0, 0, 0, 1)).unwrap();
        grid.set_content(CellPos::new(0, 0), CellContent::text("hi"))
            .unwrap();

        let expected = "\
+-----+--------+
| hi* | <r0c0> |
+-----+--------+
|     |        |
+-----+--------+
";
        assert_eq!(render(&grid), expected);
    }

    #[test]
    fn test_summary_reports_shape_and_headers() {
        let mut grid = Grid::new(3, 4);
        grid.set_column_header(0, true).unwrap();
        assert_eq!(summary(&grid), "3x4 | header row: off | header column: on");
    }

    #[test]
    fn test_image_content_renders_as_placeholder() {
        let mut grid = Grid::new(1, 1);
        grid.set_content(
            CellPos::new(0, 0),
            CellContent::Image {
                src: "https://example.com/p.png".to_string(),
            },
        )
        .unwrap();
        assert!(render(&grid).contains("[image]"));
    }
}
