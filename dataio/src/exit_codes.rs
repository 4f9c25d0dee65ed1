//! Stable exit codes for `dataio` CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid input, an unreadable artifact or other errors.
pub const INVALID: i32 = 1;
/// `dataio check` found one or more missing files.
pub const MISSING_FILES: i32 = 2;
