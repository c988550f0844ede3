//! Shared types for a smoke-test run.
//!
//! Components are created once from the registry and never change during a
//! run. Verdicts are created by the test runner and never mutated afterwards.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A registered, independently testable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Identifier derived from the component directory name.
    pub name: String,
    /// Directory the test runs from.
    pub workdir: PathBuf,
    /// Test entry-point, relative to `workdir`.
    pub entry: PathBuf,
    /// Launcher prefix placed before the entry-point (may be empty).
    pub command: Vec<String>,
    /// Artifact path relative to `workdir`.
    pub log_file: PathBuf,
}

impl Component {
    /// Build a component whose name is the last segment of `workdir`.
    ///
    /// The name never depends on the entry-point file name, so report lines
    /// and artifacts stay stable when an entry-point is renamed.
    pub fn new(
        workdir: PathBuf,
        entry: PathBuf,
        command: Vec<String>,
        log_file: PathBuf,
    ) -> Self {
        let name = component_name(&workdir);
        Self {
            name,
            workdir,
            entry,
            command,
            log_file,
        }
    }

    pub fn entry_path(&self) -> PathBuf {
        self.workdir.join(&self.entry)
    }

    pub fn log_path(&self) -> PathBuf {
        self.workdir.join(&self.log_file)
    }
}

/// Derive a component name from its directory.
pub fn component_name(workdir: &Path) -> String {
    workdir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| workdir.display().to_string())
}

/// Pass/fail outcome of testing one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestVerdict {
    pub component: String,
    pub passed: bool,
    pub log_path: PathBuf,
    /// Child exit code; `None` when killed by a signal or never started.
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

/// Ordered verdicts for one orchestrator invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub started_at: String,
    pub verdicts: Vec<TestVerdict>,
}

impl RunSummary {
    pub fn new(started_at: String) -> Self {
        Self {
            started_at,
            verdicts: Vec::new(),
        }
    }

    pub fn push(&mut self, verdict: TestVerdict) {
        self.verdicts.push(verdict);
    }

    pub fn run_count(&self) -> usize {
        self.verdicts.len()
    }

    pub fn failed_count(&self) -> usize {
        self.verdicts.iter().filter(|v| !v.passed).count()
    }

    /// True if any verdict failed.
    pub fn failed(&self) -> bool {
        self.verdicts.iter().any(|v| !v.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(name: &str, passed: bool) -> TestVerdict {
        TestVerdict {
            component: name.to_string(),
            passed,
            log_path: PathBuf::from(format!("{name}/test.log")),
            exit_code: Some(if passed { 0 } else { 1 }),
            duration_ms: 0,
        }
    }

    #[test]
    fn name_comes_from_directory_not_entry() {
        let component = Component::new(
            PathBuf::from("/repo/tools/image_captioner"),
            PathBuf::from("tool.py"),
            Vec::new(),
            PathBuf::from("test.log"),
        );
        assert_eq!(component.name, "image_captioner");
        assert_eq!(
            component.entry_path(),
            PathBuf::from("/repo/tools/image_captioner/tool.py")
        );
        assert_eq!(
            component.log_path(),
            PathBuf::from("/repo/tools/image_captioner/test.log")
        );
    }

    #[test]
    fn summary_counts_failures() {
        let mut summary = RunSummary::new("now".to_string());
        assert!(!summary.failed());

        summary.push(verdict("a", true));
        summary.push(verdict("b", false));
        summary.push(verdict("c", true));

        assert_eq!(summary.run_count(), 3);
        assert_eq!(summary.failed_count(), 1);
        assert!(summary.failed());
    }
}
