//! Serde types mirroring the persisted JSON exactly. Field names are
//! camelCase on the wire; defaults make every field optional on input
//! so older or hand-written documents still load.

use serde::{Deserialize, Serialize};

use tablekit_model::cell::Alignment;

fn one() -> usize {
    1
}

fn yes() -> bool {
    true
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_left(a: &Alignment) -> bool {
    *a == Alignment::Left
}

/// A whole persisted table block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableBlock {
    #[serde(default)]
    pub rows: Vec<Vec<WireCell>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colgroup: Vec<ColSpec>,
    #[serde(default)]
    pub settings: Settings,
}

/// One slot on the wire. Hidden slots under a merged cell are written
/// with `display: false` and carry no meaningful payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireCell {
    #[serde(default)]
    pub content: WireContent,
    #[serde(default = "one")]
    pub colspan: usize,
    #[serde(default = "one")]
    pub rowspan: usize,
    #[serde(default = "yes")]
    pub display: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_header: bool,
    #[serde(default, skip_serializing_if = "is_left")]
    pub alignment: Alignment,
}

impl Default for WireCell {
    fn default() -> Self {
        Self {
            content: WireContent::default(),
            colspan: 1,
            rowspan: 1,
            display: true,
            bg_color: None,
            is_header: false,
            alignment: Alignment::Left,
        }
    }
}

impl WireCell {
    /// The placeholder written for a slot hidden under a merged cell.
    pub fn hidden() -> Self {
        Self {
            display: false,
            ..Self::default()
        }
    }
}

/// Cell payload on the wire: a bare markup string, or an image object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Image(WireImage),
}

impl Default for WireContent {
    fn default() -> Self {
        WireContent::Text(String::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireImage {
    #[serde(rename = "type")]
    pub kind: String,
    pub src: String,
}

impl WireImage {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            kind: "image".to_string(),
            src: src.into(),
        }
    }
}

/// One `<col>` entry: how many columns it spans and an optional CSS
/// width ("140px"). Widths are advisory; the grid never depends on them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColSpec {
    #[serde(default = "one")]
    pub span: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

impl ColSpec {
    pub fn plain() -> Self {
        Self {
            span: 1,
            width: None,
        }
    }
}

/// Table-level options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "yes")]
    pub with_border: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { with_border: true }
    }
}
