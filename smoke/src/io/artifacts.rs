//! Per-component log artifacts: pre-run cleanup and creation.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::io::registry::Registry;

/// Outcome of removing stale artifacts before a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    /// Stale artifacts that could not be removed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Delete every artifact left over from a previous run.
///
/// Scans the whole component tree for files whose path ends with the
/// registry's `log_file`, plus each registered component's own log path.
/// Cleanup is best effort: a file that cannot be removed is recorded and
/// logged, never returned as an error.
pub fn clean_stale_logs(registry: &Registry) -> CleanupReport {
    let mut candidates = BTreeSet::new();
    for path in find_logs(&registry.tree, &registry.log_file) {
        candidates.insert(path);
    }
    for component in &registry.components {
        let path = component.log_path();
        if path.is_file() {
            candidates.insert(path);
        }
    }

    let mut report = CleanupReport::default();
    for path in candidates {
        match fs::remove_file(&path) {
            Ok(()) => report.removed.push(path),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %path.display(), err = %err, "failed to remove stale log");
                report.failed.push((path, err.to_string()));
            }
        }
    }
    debug!(
        removed = report.removed.len(),
        failed = report.failed.len(),
        "stale log cleanup finished"
    );
    report
}

fn find_logs(tree: &Path, log_file: &Path) -> Vec<PathBuf> {
    if !tree.is_dir() {
        debug!(tree = %tree.display(), "component tree missing, nothing to clean");
        return Vec::new();
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(tree).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(err = %err, "skipping unreadable path during cleanup");
                continue;
            }
        };
        if entry.file_type().is_file() && entry.path().ends_with(log_file) {
            found.push(entry.into_path());
        }
    }
    found
}

/// Create (or truncate) a component's log artifact.
pub fn create_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log dir {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("create log {}", path.display()))
}
