//! Stable exit codes for the `smoke` and `launcher` binaries.

/// Every registered component passed (or there was nothing to run).
pub const OK: i32 = 0;
/// At least one component failed.
pub const FAILED: i32 = 1;
/// The run could not start: invalid config, missing component directory or entry-point.
pub const CONFIG: i32 = 2;
