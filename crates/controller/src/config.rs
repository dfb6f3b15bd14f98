//! Table defaults. Hosts may override any of these; the values here
//! are what a bare table gets.

/// Background palette offered by the cell menu. The first entry is
/// "no color" and maps to clearing the background.
pub const PALETTE: [&str; 21] = [
    "#ffffff", "#e0ebfd", "#eafbfe", "#e8fbf0", "#fefae8", "#fcece7", "#e9e6fd",
    "#f4f5f7", "#b9d4fb", "#c1f3fd", "#bbf3d3", "#fcf0ba", "#f5c0b0", "#beb7ee",
    "#b4bac4", "#5f9af8", "#93dfef", "#7cd5a7", "#f6c544", "#f0957a", "#978ed4",
];

/// Palette entry to a model background value; the first swatch clears.
pub fn palette_color(index: usize) -> Option<String> {
    match PALETTE.get(index) {
        Some(_) if index == 0 => None,
        Some(color) => Some((*color).to_string()),
        None => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Initial grid size when neither saved data nor the host supply one.
    pub rows: usize,
    pub cols: usize,
    pub with_border: bool,
    /// Default column width in pixels.
    pub column_width: u32,
    /// Floor a resize drag can never push a column below.
    pub min_column_width: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 2,
            with_border: true,
            column_width: 120,
            min_column_width: 50,
        }
    }
}
