//! CLI Exit Code Registry
//!
//! Single source of truth for `tablekit` exit codes. Exit codes are part
//! of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                              |
//! |---------|-----------|------------------------------------------|
//! | 0       | Universal | Success                                  |
//! | 1       | Universal | General error (unspecified)              |
//! | 2       | Universal | CLI usage error (bad args, missing file) |
//! | 3-9     | check     | Block validation codes                   |
//! | 10-19   | apply     | Op replay codes                          |
//! | 20-29   | io        | File read/write and JSON parse codes     |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Check (3-9)
// =============================================================================

/// `check --strict`: the block loaded, but only after repairs.
pub const EXIT_CHECK_REPAIRED: u8 = 3;

/// The loaded grid failed invariant verification. Indicates a loader
/// bug, not bad input; always a defect.
pub const EXIT_CHECK_INVALID: u8 = 4;

// =============================================================================
// Apply (10-19)
// =============================================================================

/// An op was well-formed but rejected by the model (bad index,
/// ineligible merge). Nothing is written.
pub const EXIT_APPLY_REJECTED: u8 = 10;

/// The ops input was not a JSON array of known ops.
pub const EXIT_APPLY_BAD_OPS: u8 = 11;

// =============================================================================
// IO (20-29)
// =============================================================================

/// A file could not be read or written.
pub const EXIT_IO: u8 = 20;

/// The input file was not valid table block JSON.
pub const EXIT_PARSE: u8 = 21;
