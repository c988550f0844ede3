//! Test-only helpers: fixture component trees and a scripted runner.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::types::{Component, TestVerdict};
use crate::error::SetupError;
use crate::io::config::DEFAULT_LOG_FILE;
use crate::runner::TestRunner;

pub const TREE_DIR: &str = "tools";
pub const ENTRY_FILE: &str = "test.sh";

/// A temporary repository with a `tools/` component tree.
///
/// Each component is a directory holding a `test.sh` run through `sh`, so no
/// executable bits are needed.
pub struct FixtureTree {
    temp: TempDir,
}

impl FixtureTree {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        fs::create_dir_all(temp.path().join(TREE_DIR)).context("create tree dir")?;
        Ok(Self { temp })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn tree(&self) -> PathBuf {
        self.root().join(TREE_DIR)
    }

    /// Create `tools/<name>/test.sh` with `body` and return its component.
    pub fn component(&self, name: &str, body: &str) -> Result<Component> {
        let dir = self.tree().join(name);
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let script = dir.join(ENTRY_FILE);
        fs::write(&script, format!("#!/bin/sh\n{body}\n"))
            .with_context(|| format!("write {}", script.display()))?;
        Ok(Component::new(
            dir,
            PathBuf::from(ENTRY_FILE),
            vec!["sh".to_string()],
            PathBuf::from(DEFAULT_LOG_FILE),
        ))
    }

    /// Create every component and write a `smoke.toml` listing them in order.
    pub fn write_config(&self, components: &[(&str, &str)]) -> Result<PathBuf> {
        let mut toml = format!("tree = \"{TREE_DIR}\"\ncommand = [\"sh\"]\n");
        for (name, body) in components {
            self.component(name, body)?;
            toml.push_str(&format!(
                "\n[[components]]\ndir = \"{name}\"\nentry = \"{ENTRY_FILE}\"\n"
            ));
        }
        let path = self.root().join("smoke.toml");
        fs::write(&path, toml).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

/// Runner that returns preset outcomes instead of spawning processes.
///
/// Components without a preset pass. Components listed in `setup_errors`
/// fail with `SetupError::EnterWorkdir`.
#[derive(Default)]
pub struct ScriptedRunner {
    outcomes: BTreeMap<String, bool>,
    setup_errors: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new(outcomes: &[(&str, bool)]) -> Self {
        Self {
            outcomes: outcomes
                .iter()
                .map(|(name, passed)| (name.to_string(), *passed))
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_setup_error(mut self, name: &str) -> Self {
        self.setup_errors.push(name.to_string());
        self
    }

    /// Component names in the order they were run.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl TestRunner for ScriptedRunner {
    fn run(&self, component: &Component) -> Result<TestVerdict, SetupError> {
        self.calls.borrow_mut().push(component.name.clone());
        if self.setup_errors.contains(&component.name) {
            return Err(SetupError::EnterWorkdir {
                component: component.name.clone(),
                path: component.workdir.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted"),
            });
        }
        let passed = self.outcomes.get(&component.name).copied().unwrap_or(true);
        Ok(TestVerdict {
            component: component.name.clone(),
            passed,
            log_path: component.log_path(),
            exit_code: Some(if passed { 0 } else { 1 }),
            duration_ms: 0,
        })
    }
}
