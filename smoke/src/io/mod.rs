//! I/O helpers for the orchestrator.

pub mod artifacts;
pub mod config;
pub mod process;
pub mod registry;
pub mod workdir;
