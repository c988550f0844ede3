//! Errors that abort a run before or between components.
//!
//! A component test that exits non-zero, crashes, or cannot be started is a
//! failed verdict, not an error. These variants cover the cases where testing
//! a component would mean testing against state that does not exist.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("component {component}: working directory {} does not exist", .path.display())]
    MissingWorkdir { component: String, path: PathBuf },

    #[error("component {component}: entry-point {} does not exist", .path.display())]
    MissingEntry { component: String, path: PathBuf },

    #[error("component {component}: cannot enter working directory {}", .path.display())]
    EnterWorkdir {
        component: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
