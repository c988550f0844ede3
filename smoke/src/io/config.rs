//! Registry configuration stored in `smoke.toml`.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component as PathComponent, Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::core::types::component_name;

pub const DEFAULT_CONFIG_FILE: &str = "smoke.toml";
pub const DEFAULT_LOG_FILE: &str = "test.log";

/// Smoke-test configuration (TOML).
///
/// The component list is explicit: adding or removing a tested component is
/// an edit to this file, never a side effect of what exists on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SmokeConfig {
    /// Component tree root, relative to the config file.
    pub tree: PathBuf,

    /// Log artifact path relative to each component directory.
    pub log_file: PathBuf,

    /// Default launcher prefix for entry-points (e.g. `["python3"]`).
    pub command: Vec<String>,

    pub components: Vec<ComponentEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ComponentEntry {
    /// Component directory, relative to `tree`.
    pub dir: PathBuf,
    /// Test entry-point, relative to `dir`.
    pub entry: PathBuf,
    /// Overrides the top-level `command` for this component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            tree: PathBuf::from("."),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            command: Vec::new(),
            components: Vec::new(),
        }
    }
}

impl SmokeConfig {
    pub fn validate(&self) -> Result<()> {
        if !is_plain_relative(&self.log_file) {
            bail!(
                "log_file must be a relative path without `..`: {}",
                self.log_file.display()
            );
        }
        let log_file = self.normalized_log_file();
        if log_file.as_os_str().is_empty() {
            bail!("log_file must name a file");
        }

        let mut dirs = BTreeSet::new();
        let mut names = BTreeSet::new();
        for (idx, component) in self.components.iter().enumerate() {
            if component.dir.as_os_str().is_empty() {
                return Err(anyhow!("components[{idx}].dir must not be empty"));
            }
            if component.entry.as_os_str().is_empty() {
                return Err(anyhow!("components[{idx}].entry must not be empty"));
            }
            // Cleanup deletes every file under the tree ending in `log_file`.
            if strip_cur_dir(&component.dir.join(&component.entry)).ends_with(&log_file) {
                bail!(
                    "components[{idx}].entry {} would be removed as a stale {}",
                    component.entry.display(),
                    log_file.display()
                );
            }
            if !dirs.insert(component.dir.clone()) {
                bail!("duplicate component dir {}", component.dir.display());
            }
            let name = component_name(&component.dir);
            if !names.insert(name.clone()) {
                bail!(
                    "duplicate component name {name} (from {})",
                    component.dir.display()
                );
            }
        }
        Ok(())
    }

    /// `log_file` without `.` segments, as it appears in scanned paths.
    pub fn normalized_log_file(&self) -> PathBuf {
        strip_cur_dir(&self.log_file)
    }
}

fn strip_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|part| !matches!(part, PathComponent::CurDir))
        .collect()
}

/// Relative, and never escaping upward.
fn is_plain_relative(path: &Path) -> bool {
    path.components()
        .all(|part| matches!(part, PathComponent::Normal(_) | PathComponent::CurDir))
}

/// Load config from a TOML file.
///
/// A missing file is an error: running against a guessed registry would
/// report on components nobody asked for.
pub fn load_config(path: &Path) -> Result<SmokeConfig> {
    if !path.is_file() {
        bail!("config file not found: {}", path.display());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SmokeConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Directory that relative paths in the config are resolved against.
pub fn config_base(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_config(&temp.path().join("missing.toml")).expect_err("missing");
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn parses_components_in_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("smoke.toml");
        fs::write(
            &path,
            r#"
tree = "tools"
command = ["python3"]

[[components]]
dir = "text_detector"
entry = "tool.py"

[[components]]
dir = "nature/image_captioner"
entry = "tool.py"
command = ["bash"]
"#,
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.tree, PathBuf::from("tools"));
        assert_eq!(cfg.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(cfg.command, vec!["python3"]);
        assert_eq!(cfg.components.len(), 2);
        assert_eq!(cfg.components[0].dir, PathBuf::from("text_detector"));
        assert_eq!(cfg.components[0].command, None);
        assert_eq!(cfg.components[1].command, Some(vec!["bash".to_string()]));
    }

    #[test]
    fn empty_component_list_is_valid() {
        let cfg: SmokeConfig = toml::from_str("").expect("parse");
        cfg.validate().expect("valid");
        assert!(cfg.components.is_empty());
    }

    #[test]
    fn rejects_log_file_escaping_component_dir() {
        let cfg = SmokeConfig {
            log_file: PathBuf::from("../test.log"),
            ..SmokeConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = SmokeConfig {
            log_file: PathBuf::from("/tmp/test.log"),
            ..SmokeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_log_file_that_matches_an_entry() {
        let cfg = SmokeConfig {
            log_file: PathBuf::from("test.sh"),
            components: vec![ComponentEntry {
                dir: PathBuf::from("ocr"),
                entry: PathBuf::from("test.sh"),
                command: None,
            }],
            ..SmokeConfig::default()
        };
        let err = cfg.validate().expect_err("entry would be cleaned");
        assert!(err.to_string().contains("would be removed"));

        let cfg = SmokeConfig {
            log_file: PathBuf::from("./ocr/bin/run.sh"),
            components: vec![ComponentEntry {
                dir: PathBuf::from("ocr"),
                entry: PathBuf::from("./bin/run.sh"),
                command: None,
            }],
            ..SmokeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn log_file_drops_current_dir_segments() {
        let cfg = SmokeConfig {
            log_file: PathBuf::from("./logs/./test.log"),
            ..SmokeConfig::default()
        };
        cfg.validate().expect("valid");
        assert_eq!(cfg.normalized_log_file(), PathBuf::from("logs/test.log"));

        let cfg = SmokeConfig {
            log_file: PathBuf::from("."),
            ..SmokeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_names() {
        let entry = |dir: &str| ComponentEntry {
            dir: PathBuf::from(dir),
            entry: PathBuf::from("tool.py"),
            command: None,
        };
        let cfg = SmokeConfig {
            components: vec![entry("a/ocr"), entry("b/ocr")],
            ..SmokeConfig::default()
        };
        let err = cfg.validate().expect_err("duplicate");
        assert!(err.to_string().contains("duplicate component name ocr"));
    }

    #[test]
    fn config_base_defaults_to_current_dir() {
        assert_eq!(config_base(Path::new("smoke.toml")), PathBuf::from("."));
        assert_eq!(
            config_base(Path::new("/repo/smoke.toml")),
            PathBuf::from("/repo")
        );
    }
}
