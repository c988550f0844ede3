//! Component smoke-test orchestrator.
//!
//! Runs a fixed, ordered list of independent component tests so that one
//! component's failure never prevents the others from running. Each
//! component's combined output lands in its own log artifact, and stale
//! artifacts are removed before every run.
//!
//! - **[`core`]**: Pure logic (data model, phase transitions, report lines).
//! - **[`io`]**: Side effects (config, registry, artifacts, working
//!   directory, child processes).
//!
//! [`runner`] tests one component; [`orchestrate`] drives the whole run.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod orchestrate;
pub mod runner;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
