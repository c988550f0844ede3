//! Solver invocation: flags, directories, captured output.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use smoke::exit_codes;
use smoke::io::artifacts::create_log;
use smoke::io::process::run_to_log;
use tracing::{info, instrument};

use crate::config::LaunchConfig;

/// Build the solver command line from a validated config.
pub fn build_solver_command(cfg: &LaunchConfig) -> Command {
    let mut cmd = Command::new(&cfg.program[0]);
    cmd.args(&cfg.program[1..])
        .arg("--task")
        .arg(&cfg.task)
        .arg("--data_file")
        .arg(&cfg.data_file)
        .arg("--llm_engine_name")
        .arg(&cfg.llm_engine)
        .arg("--root_cache_dir")
        .arg(&cfg.root_cache_dir)
        .arg("--output_json_dir")
        .arg(&cfg.output_json_dir)
        .arg("--output_types")
        .arg(&cfg.output_types)
        .arg("--enabled_tools")
        .arg(cfg.enabled_tools.join(","))
        .arg("--max_time")
        .arg(cfg.max_time.to_string());
    if let Some(index) = cfg.index {
        cmd.arg("--index").arg(index.to_string());
    }
    if cfg.verbose {
        cmd.arg("--verbose").arg("1");
    }
    cmd
}

/// Where the solver's combined output is captured.
pub fn log_path(cfg: &LaunchConfig) -> PathBuf {
    let stem = match cfg.index {
        Some(index) => index.to_string(),
        None => cfg.task.clone(),
    };
    cfg.log_dir.join(format!("{stem}.log"))
}

/// Run the solver once and return the exit code to propagate.
#[instrument(skip_all, fields(task = %cfg.task, index = ?cfg.index))]
pub fn launch(cfg: &LaunchConfig) -> Result<i32> {
    for dir in [&cfg.root_cache_dir, &cfg.output_json_dir, &cfg.log_dir] {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let log_path = log_path(cfg);
    let log = create_log(&log_path)?;

    info!(log = %log_path.display(), "launching solver");
    let status = run_to_log(build_solver_command(cfg), &log).context("run solver")?;
    info!(exit_code = ?status.code(), "solver finished");

    // Killed by a signal: report as a plain failure.
    Ok(status.code().unwrap_or(exit_codes::FAILED))
}

#[cfg(test)]
mod tests {
    use smoke::io::process::describe;

    use super::*;

    fn config() -> LaunchConfig {
        LaunchConfig {
            task: "hallusion-vd".to_string(),
            llm_engine: "gpt-4o".to_string(),
            enabled_tools: vec![
                "Generalist_Solution_Generator_Tool".to_string(),
                "Image_Captioner_Tool".to_string(),
            ],
            ..LaunchConfig::default()
        }
    }

    #[test]
    fn forwards_every_parameter_as_flags() {
        let line = describe(&build_solver_command(&config()));
        assert_eq!(
            line,
            "python3 solve.py --task hallusion-vd --data_file data/data.json \
             --llm_engine_name gpt-4o --root_cache_dir solver_cache \
             --output_json_dir results --output_types direct \
             --enabled_tools Generalist_Solution_Generator_Tool,Image_Captioner_Tool \
             --max_time 300"
        );
    }

    #[test]
    fn index_and_verbose_are_optional_flags() {
        let cfg = LaunchConfig {
            index: Some(7),
            verbose: true,
            ..config()
        };
        let line = describe(&build_solver_command(&cfg));
        assert!(line.ends_with("--max_time 300 --index 7 --verbose 1"));
        assert_eq!(log_path(&cfg), PathBuf::from("logs/7.log"));
        assert_eq!(log_path(&config()), PathBuf::from("logs/hallusion-vd.log"));
    }

    #[cfg(unix)]
    #[test]
    fn launch_captures_output_and_propagates_exit_code() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = LaunchConfig {
            program: vec![
                "sh".to_string(),
                "-c".to_string(),
                "echo solving \"$@\"; exit 5".to_string(),
                "solver".to_string(),
            ],
            root_cache_dir: temp.path().join("cache"),
            output_json_dir: temp.path().join("out"),
            log_dir: temp.path().join("logs"),
            ..config()
        };

        let code = launch(&cfg).expect("launch");

        assert_eq!(code, 5);
        assert!(cfg.root_cache_dir.is_dir());
        assert!(cfg.output_json_dir.is_dir());
        let log = fs::read_to_string(log_path(&cfg)).expect("log");
        assert!(log.starts_with("solving --task hallusion-vd"));
    }
}
