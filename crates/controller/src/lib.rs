//! Thin translation layer between user input and the grid model.
//!
//! Nothing in here renders. The controller owns the transient state the
//! model deliberately does not: the drag selection, column widths, and
//! the mapping from menu actions to model calls. Each interaction is a
//! short synchronous sequence of calls ending in model mutations; an
//! abandoned drag leaves every structure untouched.

pub mod actions;
pub mod config;
pub mod host;
pub mod resize;
pub mod selection;
