//! TableKit Block Format — v1 Frozen Wire Format
//!
//! This crate defines the persisted JSON shape of a table block and the
//! conversion to and from the in-memory grid model. The wire format is
//! what editor documents store; it must stay readable forever.
//!
//! # Format
//!
//! A block is `{ rows, colgroup, settings }`. `rows` is an array of
//! arrays of cells in visual order, one entry per slot including the
//! slots hidden under a merged cell (`display: false`). `colgroup`
//! carries column widths, `settings` table-level options.
//!
//! Loading is best-effort: hand-edited or truncated documents are
//! repaired deterministically rather than rejected, and every repair is
//! reported so callers can surface it.
//!
//! # Usage
//!
//! ```ignore
//! use tablekit_block::{convert, wire::TableBlock};
//!
//! let block: TableBlock = serde_json::from_str(&json)?;
//! let (grid, repairs) = convert::from_block(&block);
//! let out = convert::to_block(&grid, block.colgroup.clone(), block.settings.clone());
//! ```

pub mod convert;
pub mod wire;
