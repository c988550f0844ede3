//! Launch configuration (`launch.toml`) and CLI overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LAUNCH_FILE: &str = "launch.toml";

/// Parameters forwarded to the external solver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchConfig {
    /// Solver command, e.g. `["python3", "solve.py"]`.
    pub program: Vec<String>,
    pub task: String,
    pub data_file: PathBuf,
    /// Single problem index to solve; the whole task when unset.
    pub index: Option<u32>,
    pub llm_engine: String,
    pub enabled_tools: Vec<String>,
    /// Output format selector passed through as-is (e.g. `direct`, `final,direct`).
    pub output_types: String,
    /// Wall-clock budget handed to the solver, in seconds.
    pub max_time: u64,
    pub root_cache_dir: PathBuf,
    pub output_json_dir: PathBuf,
    pub log_dir: PathBuf,
    pub verbose: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            program: vec!["python3".to_string(), "solve.py".to_string()],
            task: String::new(),
            data_file: PathBuf::from("data/data.json"),
            index: None,
            llm_engine: String::new(),
            enabled_tools: vec!["Generalist_Solution_Generator_Tool".to_string()],
            output_types: "direct".to_string(),
            max_time: 300,
            root_cache_dir: PathBuf::from("solver_cache"),
            output_json_dir: PathBuf::from("results"),
            log_dir: PathBuf::from("logs"),
            verbose: false,
        }
    }
}

/// Values given on the command line; each one replaces the file's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOverrides {
    pub task: Option<String>,
    pub data_file: Option<PathBuf>,
    pub index: Option<u32>,
    pub llm_engine: Option<String>,
    pub enabled_tools: Option<Vec<String>>,
    pub output_types: Option<String>,
    pub max_time: Option<u64>,
    pub root_cache_dir: Option<PathBuf>,
    pub output_json_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl LaunchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.program.is_empty() || self.program[0].trim().is_empty() {
            bail!("program must be a non-empty array");
        }
        if self.task.trim().is_empty() {
            bail!("task must not be empty");
        }
        if self.llm_engine.trim().is_empty() {
            bail!("llm_engine must not be empty");
        }
        if self.output_types.trim().is_empty() {
            bail!("output_types must not be empty");
        }
        if self.max_time == 0 {
            bail!("max_time must be > 0");
        }
        if self.enabled_tools.iter().any(|tool| tool.contains(',')) {
            bail!("enabled_tools entries must not contain commas");
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the file values.
    pub fn apply(mut self, overrides: LaunchOverrides) -> Self {
        if let Some(task) = overrides.task {
            self.task = task;
        }
        if let Some(data_file) = overrides.data_file {
            self.data_file = data_file;
        }
        if let Some(index) = overrides.index {
            self.index = Some(index);
        }
        if let Some(llm_engine) = overrides.llm_engine {
            self.llm_engine = llm_engine;
        }
        if let Some(enabled_tools) = overrides.enabled_tools {
            self.enabled_tools = enabled_tools;
        }
        if let Some(output_types) = overrides.output_types {
            self.output_types = output_types;
        }
        if let Some(max_time) = overrides.max_time {
            self.max_time = max_time;
        }
        if let Some(root_cache_dir) = overrides.root_cache_dir {
            self.root_cache_dir = root_cache_dir;
        }
        if let Some(output_json_dir) = overrides.output_json_dir {
            self.output_json_dir = output_json_dir;
        }
        if let Some(log_dir) = overrides.log_dir {
            self.log_dir = log_dir;
        }
        self.verbose |= overrides.verbose;
        self
    }
}

/// Load the launch file, or defaults when it does not exist.
///
/// Validation happens after overrides are applied, since a task or model may
/// come from the command line alone.
pub fn load_launch_config(path: &Path) -> Result<LaunchConfig> {
    if !path.exists() {
        return Ok(LaunchConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}
