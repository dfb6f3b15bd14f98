//! Column width bookkeeping and the resize drag.
//!
//! Widths are presentational metadata over the colgroup; the grid's
//! logical structure never changes during a resize. A drag moves width
//! between the two columns either side of a boundary, conserving their
//! combined width, and can never push either below the minimum.

use tablekit_block::wire::ColSpec;

fn parse_px(s: &str) -> Option<u32> {
    s.trim().strip_suffix("px")?.trim().parse().ok()
}

/// One pixel width per logical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWidths {
    widths: Vec<u32>,
    min: u32,
}

impl ColumnWidths {
    pub fn new(count: usize, width: u32, min: u32) -> Self {
        Self {
            widths: vec![width.max(min); count],
            min,
        }
    }

    /// Expand a colgroup into per-column widths. Entries without a
    /// parseable `"123px"` width get the default.
    pub fn from_colgroup(colgroup: &[ColSpec], default_width: u32, min: u32) -> Self {
        let mut widths = Vec::new();
        for spec in colgroup {
            let width = spec
                .width
                .as_deref()
                .and_then(parse_px)
                .unwrap_or(default_width)
                .max(min);
            for _ in 0..spec.span.max(1) {
                widths.push(width);
            }
        }
        Self { widths, min }
    }

    /// Single-span colgroup entries, one per column.
    pub fn to_colgroup(&self) -> Vec<ColSpec> {
        self.widths
            .iter()
            .map(|w| ColSpec {
                span: 1,
                width: Some(format!("{}px", w)),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.widths.get(index).copied()
    }

    pub fn total(&self) -> u64 {
        self.widths.iter().map(|w| u64::from(*w)).sum()
    }

    /// Track a column insertion in the grid.
    pub fn insert(&mut self, index: usize, width: u32) {
        let index = index.min(self.widths.len());
        self.widths.insert(index, width.max(self.min));
    }

    /// Track a column removal in the grid.
    pub fn remove(&mut self, index: usize) -> Option<u32> {
        if index < self.widths.len() {
            Some(self.widths.remove(index))
        } else {
            None
        }
    }
}

/// An in-flight drag on the boundary between columns `boundary` and
/// `boundary + 1`. Holds the starting geometry so each move is computed
/// from the drag origin, not accumulated.
#[derive(Debug, Clone, Copy)]
pub struct ResizeDrag {
    boundary: usize,
    start_x: i32,
    left_start: u32,
    right_start: u32,
}

impl ResizeDrag {
    /// Pointer down on a boundary. `None` if there is no column pair
    /// there.
    pub fn begin(widths: &ColumnWidths, boundary: usize, x: i32) -> Option<Self> {
        let left_start = widths.get(boundary)?;
        let right_start = widths.get(boundary + 1)?;
        Some(Self {
            boundary,
            start_x: x,
            left_start,
            right_start,
        })
    }

    /// Pointer moved to `x`: redistribute the pair's width.
    pub fn update(&self, widths: &mut ColumnWidths, x: i32) {
        if self.boundary + 1 >= widths.len() {
            return;
        }
        let pair = i64::from(self.left_start) + i64::from(self.right_start);
        let delta = i64::from(x) - i64::from(self.start_x);
        let left = (i64::from(self.left_start) + delta)
            .clamp(i64::from(widths.min), pair - i64::from(widths.min));
        widths.widths[self.boundary] = left as u32;
        widths.widths[self.boundary + 1] = (pair - left) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_moves_width_between_neighbors() {
        let mut widths = ColumnWidths::new(3, 120, 50);
        let drag = ResizeDrag::begin(&widths, 0, 400).unwrap();
        drag.update(&mut widths, 430);

        assert_eq!(widths.get(0), Some(150));
        assert_eq!(widths.get(1), Some(90));
        assert_eq!(widths.get(2), Some(120));
    }

    #[test]
    fn test_drag_conserves_pair_total_and_respects_minimum() {
        let mut widths = ColumnWidths::new(2, 120, 50);
        let total = widths.total();
        let drag = ResizeDrag::begin(&widths, 0, 0).unwrap();

        for x in [-500, -10, 0, 35, 500] {
            drag.update(&mut widths, x);
            assert_eq!(widths.total(), total, "total changed at x={}", x);
            assert!(widths.get(0).unwrap() >= 50);
            assert!(widths.get(1).unwrap() >= 50);
        }
        // Far right: left takes everything above the neighbor's floor.
        drag.update(&mut widths, 10_000);
        assert_eq!(widths.get(0), Some(190));
        assert_eq!(widths.get(1), Some(50));
    }

    #[test]
    fn test_begin_on_last_column_has_no_pair() {
        let widths = ColumnWidths::new(2, 120, 50);
        assert!(ResizeDrag::begin(&widths, 1, 0).is_none());
        assert!(ResizeDrag::begin(&widths, 5, 0).is_none());
    }

    #[test]
    fn test_colgroup_round_trip() {
        let colgroup = vec![
            ColSpec {
                span: 1,
                width: Some("160px".to_string()),
            },
            ColSpec {
                span: 2,
                width: Some("80px".to_string()),
            },
            ColSpec {
                span: 1,
                width: None,
            },
        ];
        let widths = ColumnWidths::from_colgroup(&colgroup, 120, 50);
        assert_eq!(widths.len(), 4);
        assert_eq!(widths.get(0), Some(160));
        assert_eq!(widths.get(1), Some(80));
        assert_eq!(widths.get(2), Some(80));
        assert_eq!(widths.get(3), Some(120));

        let out = widths.to_colgroup();
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].width.as_deref(), Some("160px"));
        assert_eq!(out[3].width.as_deref(), Some("120px"));
    }

    #[test]
    fn test_widths_below_minimum_are_raised() {
        let colgroup = vec![ColSpec {
            span: 1,
            width: Some("10px".to_string()),
        }];
        let widths = ColumnWidths::from_colgroup(&colgroup, 120, 50);
        assert_eq!(widths.get(0), Some(50));
    }

    #[test]
    fn test_insert_and_remove_track_grid_columns() {
        let mut widths = ColumnWidths::new(2, 120, 50);
        widths.insert(1, 30);
        assert_eq!(widths.len(), 3);
        assert_eq!(widths.get(1), Some(50), "inserted width floors at min");
        assert_eq!(widths.remove(1), Some(50));
        assert_eq!(widths.remove(9), None);
        assert_eq!(widths.len(), 2);
    }
}
