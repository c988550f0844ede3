//! Component registry: the fixed, ordered list of components under test.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::core::types::Component;
use crate::error::SetupError;
use crate::io::config::{SmokeConfig, config_base, load_config};

/// Ordered components plus the tree they live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    /// Root scanned by artifact cleanup.
    pub tree: PathBuf,
    /// Artifact path relative to each component directory.
    pub log_file: PathBuf,
    pub components: Vec<Component>,
}

impl Registry {
    /// Build the registry from a validated config.
    ///
    /// Relative paths resolve against `base` (the config file's directory).
    pub fn from_config(cfg: &SmokeConfig, base: &Path) -> Self {
        let tree = base.join(&cfg.tree);
        let log_file = cfg.normalized_log_file();
        let components = cfg
            .components
            .iter()
            .map(|entry| {
                let command = entry.command.clone().unwrap_or_else(|| cfg.command.clone());
                Component::new(
                    tree.join(&entry.dir),
                    entry.entry.clone(),
                    command,
                    log_file.clone(),
                )
            })
            .collect();
        Self {
            tree,
            log_file,
            components,
        }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Check that every component directory and entry-point exists.
    ///
    /// Runs before any test so that a broken registry aborts with zero
    /// verdicts instead of a partial run.
    pub fn verify(&self) -> Result<(), SetupError> {
        for component in &self.components {
            if !component.workdir.is_dir() {
                return Err(SetupError::MissingWorkdir {
                    component: component.name.clone(),
                    path: component.workdir.clone(),
                });
            }
            let entry = component.entry_path();
            if !entry.is_file() {
                return Err(SetupError::MissingEntry {
                    component: component.name.clone(),
                    path: entry,
                });
            }
        }
        debug!(components = self.components.len(), "registry verified");
        Ok(())
    }
}

/// Load the registry described by the config file at `path`.
pub fn load_registry(path: &Path) -> Result<Registry> {
    let cfg = load_config(path)?;
    let base = config_base(path);
    Ok(Registry::from_config(&cfg, &base))
}
