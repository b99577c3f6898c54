//! Stable exit codes for vdm CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// A fetch, metadata write or other per-entry operation failed.
pub const FAILURE: i32 = 1;
/// The spec file is missing, unreadable, unparsable or fails validation.
pub const INVALID_SPEC: i32 = 2;
