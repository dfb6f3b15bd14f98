//! Library side of the `tablekit` binary: the op language for `apply`,
//! the ASCII renderer for `show`, and the exit-code registry.

pub mod exit_codes;
pub mod ops;
pub mod render;
