//! Exit codes of the `tally` binary.
//! These codes are part of the public contract; CI pipelines branch on them.

pub const SUCCESS: i32 = 0; // Includes skipped updates and (by default) rejections
pub const GATE_FAILED: i32 = 1; // Snapshot not acceptable and the caller asked to fail
pub const CONFIG_ERROR: i32 = 2; // Bad config, missing or malformed snapshot
pub const STATE_ERROR: i32 = 3; // Reading or writing persisted state failed
