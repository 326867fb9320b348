//! Process exit codes.

pub const SUCCESS: i32 = 0;

/// Any failure: bad arguments, validation errors, store errors.
pub const ERROR: i32 = 2;
