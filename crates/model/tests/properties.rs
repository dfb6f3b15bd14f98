// Property-based tests for grid structural invariants.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashSet;

use proptest::prelude::*;

use tablekit_model::cell::Slot;
use tablekit_model::grid::Grid;
use tablekit_model::pos::CellPos;
use tablekit_model::range::Range;
use tablekit_model::verify;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn config_128() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// One mutation drawn from the full structural vocabulary. Raw indices
/// are reduced modulo the grid's current dimensions at apply time.
#[derive(Debug, Clone)]
enum Op {
    InsertRow(usize),
    InsertColumn(usize),
    InsertRowAfter(usize, usize),
    InsertColumnAfter(usize, usize),
    RemoveRow(usize),
    RemoveColumn(usize),
    Merge(usize, usize, usize, usize),
    Unmerge(usize, usize),
    RowHeader(usize, bool),
    ColumnHeader(usize, bool),
    Prune,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (0usize..16).prop_map(Op::InsertRow),
        2 => (0usize..16).prop_map(Op::InsertColumn),
        1 => (0usize..16, 0usize..16).prop_map(|(r, c)| Op::InsertRowAfter(r, c)),
        1 => (0usize..16, 0usize..16).prop_map(|(r, c)| Op::InsertColumnAfter(r, c)),
        2 => (0usize..16).prop_map(Op::RemoveRow),
        2 => (0usize..16).prop_map(Op::RemoveColumn),
        4 => (0usize..16, 0usize..16, 0usize..4, 0usize..4)
            .prop_map(|(r, c, h, w)| Op::Merge(r, c, h, w)),
        2 => (0usize..16, 0usize..16).prop_map(|(r, c)| Op::Unmerge(r, c)),
        1 => (0usize..16, prop::bool::ANY).prop_map(|(i, on)| Op::RowHeader(i, on)),
        1 => (0usize..16, prop::bool::ANY).prop_map(|(i, on)| Op::ColumnHeader(i, on)),
        1 => Just(Op::Prune),
    ]
}

fn arb_ops(max: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(arb_op(), 1..=max)
}

fn arb_dims() -> impl Strategy<Value = (usize, usize)> {
    (1usize..6, 1usize..6)
}

/// Apply one op, reducing indices into range. Errors from the grid
/// (bad index, ineligible merge, covered slot) are expected outcomes
/// here, not failures.
fn apply(grid: &mut Grid, op: &Op) {
    let rows = grid.row_count();
    let cols = grid.column_count();
    match *op {
        Op::InsertRow(i) => {
            grid.insert_row(i % (rows + 1));
        }
        Op::InsertColumn(i) => {
            grid.insert_column(i % (cols + 1));
        }
        Op::InsertRowAfter(r, c) => {
            if rows > 0 && cols > 0 {
                let _ = grid.insert_row_after(CellPos::new(r % rows, c % cols));
            }
        }
        Op::InsertColumnAfter(r, c) => {
            if rows > 0 && cols > 0 {
                let _ = grid.insert_column_after(CellPos::new(r % rows, c % cols));
            }
        }
        Op::RemoveRow(i) => {
            // Keep at least one row so later ops have something to chew on.
            if rows > 1 {
                let _ = grid.remove_row(i % rows);
            }
        }
        Op::RemoveColumn(i) => {
            if cols > 1 {
                let _ = grid.remove_column(i % cols);
            }
        }
        Op::Merge(r, c, h, w) => {
            if rows > 0 && cols > 0 {
                let r1 = r % rows;
                let c1 = c % cols;
                let r2 = (r1 + h).min(rows - 1);
                let c2 = (c1 + w).min(cols - 1);
                let _ = grid.merge_range(Range::new(r1, c1, r2, c2));
            }
        }
        Op::Unmerge(r, c) => {
            if rows > 0 && cols > 0 {
                let _ = grid.unmerge(CellPos::new(r % rows, c % cols));
            }
        }
        Op::RowHeader(i, on) => {
            if rows > 0 {
                let _ = grid.set_row_header(i % rows, on);
            }
        }
        Op::ColumnHeader(i, on) => {
            if cols > 0 {
                let _ = grid.set_column_header(i % cols, on);
            }
        }
        Op::Prune => {
            grid.prune_covered_rows();
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Textual snapshot of the full grid structure, for before/after
/// comparison without exposing interior mutability.
fn snapshot(grid: &Grid) -> Vec<String> {
    (0..grid.row_count())
        .map(|r| format!("{:?}", grid.row(r)))
        .collect()
}

// ===========================================================================
// Invariant preservation under arbitrary op sequences
// ===========================================================================

proptest! {
    #![proptest_config(config_256())]

    // The structural invariant holds after every single mutation, not
    // just at the end of a sequence.
    #[test]
    fn invariant_preserved_under_random_ops(
        (rows, cols) in arb_dims(),
        ops in arb_ops(40),
    ) {
        let mut grid = Grid::new(rows, cols);
        for (i, op) in ops.iter().enumerate() {
            apply(&mut grid, op);
            if let Err(v) = verify::check(&grid) {
                prop_assert!(false, "after op {} ({:?}): {}", i, op, v);
            }
        }
    }

    // Span rectangles tile the grid exactly: total anchor area equals
    // the slot count.
    #[test]
    fn spans_tile_the_grid(
        (rows, cols) in arb_dims(),
        ops in arb_ops(30),
    ) {
        let mut grid = Grid::new(rows, cols);
        for op in &ops {
            apply(&mut grid, op);
        }
        let total_area: usize = grid.anchors().map(|(_, cell)| cell.area()).sum();
        prop_assert_eq!(total_area, grid.row_count() * grid.column_count());
    }

    // Anchor resolution is total and O(1)-consistent: every in-bounds
    // slot resolves to a real anchor whose rectangle contains it.
    #[test]
    fn find_anchor_total_and_consistent(
        (rows, cols) in arb_dims(),
        ops in arb_ops(30),
    ) {
        let mut grid = Grid::new(rows, cols);
        for op in &ops {
            apply(&mut grid, op);
        }
        for r in 0..grid.row_count() {
            for c in 0..grid.column_count() {
                let anchor = grid.find_anchor(r, c);
                prop_assert!(anchor.is_some(), "no anchor for ({}, {})", r, c);
                let anchor = anchor.unwrap();
                let rect = grid.anchor_rect(anchor);
                prop_assert!(rect.is_some(), "back-reference {} is not an anchor", anchor);
                prop_assert!(
                    rect.unwrap().contains(r, c),
                    "anchor {} does not cover ({}, {})",
                    anchor, r, c
                );
            }
        }
    }
}

// ===========================================================================
// Merge semantics
// ===========================================================================

proptest! {
    #![proptest_config(config_256())]

    // A claimed-possible merge always succeeds, and afterwards the
    // whole rectangle is one anchor.
    #[test]
    fn possible_merge_succeeds(
        (rows, cols) in arb_dims(),
        ops in arb_ops(20),
        r in 0usize..8, c in 0usize..8, h in 0usize..4, w in 0usize..4,
    ) {
        let mut grid = Grid::new(rows, cols);
        for op in &ops {
            apply(&mut grid, op);
        }
        prop_assume!(grid.row_count() > 0 && grid.column_count() > 0);
        let r1 = r % grid.row_count();
        let c1 = c % grid.column_count();
        let range = Range::new(
            r1, c1,
            (r1 + h).min(grid.row_count() - 1),
            (c1 + w).min(grid.column_count() - 1),
        );

        if grid.is_merge_possible(&range) {
            prop_assert!(grid.merge_range(range).is_ok());
            let tl = range.top_left();
            prop_assert_eq!(grid.anchor_rect(tl), Some(range));
            for (rr, cc) in range.cells() {
                prop_assert_eq!(grid.find_anchor(rr, cc), Some(tl));
            }
            prop_assert!(verify::check(&grid).is_ok());
        }
    }

    // An eligible rectangle also satisfies the slot-count accounting:
    // the slots selected are exactly the areas of the anchors touched.
    #[test]
    fn eligibility_matches_area_accounting(
        (rows, cols) in arb_dims(),
        ops in arb_ops(20),
        r in 0usize..8, c in 0usize..8, h in 0usize..4, w in 0usize..4,
    ) {
        let mut grid = Grid::new(rows, cols);
        for op in &ops {
            apply(&mut grid, op);
        }
        prop_assume!(grid.row_count() > 0 && grid.column_count() > 0);
        let r1 = r % grid.row_count();
        let c1 = c % grid.column_count();
        let range = Range::new(
            r1, c1,
            (r1 + h).min(grid.row_count() - 1),
            (c1 + w).min(grid.column_count() - 1),
        );

        if grid.is_merge_possible(&range) {
            let mut anchors: HashSet<CellPos> = HashSet::new();
            for (rr, cc) in range.cells() {
                if let Some(a) = grid.find_anchor(rr, cc) {
                    anchors.insert(a);
                }
            }
            let touched_area: usize = anchors
                .iter()
                .filter_map(|a| grid.cell(*a))
                .map(|cell| cell.area())
                .sum();
            prop_assert_eq!(touched_area, range.slot_count());
        }
    }

    // A rejected merge leaves the grid byte-for-byte unchanged.
    #[test]
    fn rejected_merge_is_a_noop(
        (rows, cols) in arb_dims(),
        ops in arb_ops(20),
        r in 0usize..8, c in 0usize..8, h in 0usize..6, w in 0usize..6,
    ) {
        let mut grid = Grid::new(rows, cols);
        for op in &ops {
            apply(&mut grid, op);
        }
        prop_assume!(grid.row_count() > 0 && grid.column_count() > 0);
        let range = Range::new(r, c, r + h, c + w);

        if !grid.is_merge_possible(&range) {
            let before = snapshot(&grid);
            prop_assert!(grid.merge_range(range).is_err());
            prop_assert_eq!(snapshot(&grid), before);
        }
    }
}

proptest! {
    #![proptest_config(config_128())]

    // Merge then unmerge restores every slot in the rectangle to a 1x1
    // anchor; spans outside the rectangle are untouched.
    #[test]
    fn merge_unmerge_restores_rectangle(
        (rows, cols) in (2usize..6, 2usize..6),
        r in 0usize..6, c in 0usize..6, h in 1usize..4, w in 1usize..4,
    ) {
        let mut grid = Grid::new(rows, cols);
        let r1 = r % rows;
        let c1 = c % cols;
        let range = Range::new(r1, c1, (r1 + h).min(rows - 1), (c1 + w).min(cols - 1));
        prop_assume!(!range.is_single());

        prop_assert!(grid.merge_range(range).is_ok());
        prop_assert!(grid.unmerge(range.top_left()).is_ok());

        for (rr, cc) in range.cells() {
            let slot = grid.slot(CellPos::new(rr, cc));
            match slot {
                Some(Slot::Anchor(cell)) => {
                    prop_assert_eq!(cell.row_span, 1);
                    prop_assert_eq!(cell.col_span, 1);
                }
                other => prop_assert!(false, "({}, {}) is {:?}", rr, cc, other),
            }
        }
        prop_assert_eq!(grid.anchors().count(), rows * cols);
        prop_assert!(verify::check(&grid).is_ok());
    }

    // Structural inserts never change existing span shapes when they
    // land on a true boundary (index 0 or append).
    #[test]
    fn edge_inserts_preserve_spans(
        (rows, cols) in (2usize..6, 2usize..6),
        ops in arb_ops(15),
        at_start in prop::bool::ANY,
        as_row in prop::bool::ANY,
    ) {
        let mut grid = Grid::new(rows, cols);
        for op in &ops {
            apply(&mut grid, op);
        }
        let before: Vec<_> = grid
            .anchors()
            .map(|(pos, cell)| (pos, cell.row_span, cell.col_span))
            .collect();

        if as_row {
            let index = if at_start { 0 } else { grid.row_count() };
            grid.insert_row(index);
            let shift = usize::from(at_start);
            let after: Vec<_> = grid
                .anchors()
                .filter(|(pos, _)| !(at_start && pos.row == 0) && !(!at_start && pos.row == grid.row_count() - 1))
                .map(|(pos, cell)| (CellPos::new(pos.row - shift, pos.col), cell.row_span, cell.col_span))
                .collect();
            prop_assert_eq!(after, before);
        } else {
            let index = if at_start { 0 } else { grid.column_count() };
            grid.insert_column(index);
            let shift = usize::from(at_start);
            let after: Vec<_> = grid
                .anchors()
                .filter(|(pos, _)| !(at_start && pos.col == 0) && !(!at_start && pos.col == grid.column_count() - 1))
                .map(|(pos, cell)| (CellPos::new(pos.row, pos.col - shift), cell.row_span, cell.col_span))
                .collect();
            prop_assert_eq!(after, before);
        }
        prop_assert!(verify::check(&grid).is_ok());
    }

    // After pruning, every remaining row contains at least one anchor.
    #[test]
    fn prune_leaves_no_hidden_rows(
        (rows, cols) in arb_dims(),
        ops in arb_ops(25),
    ) {
        let mut grid = Grid::new(rows, cols);
        for op in &ops {
            apply(&mut grid, op);
        }
        grid.prune_covered_rows();
        for r in 0..grid.row_count() {
            let row = grid.row(r).unwrap();
            prop_assert!(
                row.is_empty() || row.iter().any(|slot| slot.is_anchor()),
                "row {} is fully covered after prune",
                r
            );
        }
        prop_assert!(verify::check(&grid).is_ok());
    }
}
