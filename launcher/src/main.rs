//! Configuration-driven solver launcher.
//!
//! Reads `launch.toml`, applies command-line overrides and runs the external
//! solver once, capturing its output under the log directory.

mod config;
mod solve;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use smoke::exit_codes;
use smoke::io::process::describe;
use smoke::logging;

use crate::config::{DEFAULT_LAUNCH_FILE, LaunchOverrides, load_launch_config};
use crate::solve::{build_solver_command, launch};

#[derive(Parser)]
#[command(name = "launcher", version, about = "Run the external solver with a launch config")]
struct Cli {
    /// Launch config file; defaults are used if it does not exist.
    #[arg(short, long, default_value = DEFAULT_LAUNCH_FILE)]
    config: PathBuf,

    /// Print the solver command instead of running it.
    #[arg(long)]
    dry_run: bool,

    #[arg(long)]
    task: Option<String>,
    #[arg(long)]
    data_file: Option<PathBuf>,
    #[arg(long)]
    index: Option<u32>,
    #[arg(long)]
    llm_engine: Option<String>,
    /// Comma-separated tool names.
    #[arg(long, value_delimiter = ',')]
    enabled_tools: Option<Vec<String>>,
    #[arg(long)]
    output_types: Option<String>,
    /// Solver time budget in seconds.
    #[arg(long)]
    max_time: Option<u64>,
    #[arg(long)]
    root_cache_dir: Option<PathBuf>,
    #[arg(long)]
    output_json_dir: Option<PathBuf>,
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> LaunchOverrides {
        LaunchOverrides {
            task: self.task.clone(),
            data_file: self.data_file.clone(),
            index: self.index,
            llm_engine: self.llm_engine.clone(),
            enabled_tools: self.enabled_tools.clone(),
            output_types: self.output_types.clone(),
            max_time: self.max_time,
            root_cache_dir: self.root_cache_dir.clone(),
            output_json_dir: self.output_json_dir.clone(),
            log_dir: self.log_dir.clone(),
            verbose: self.verbose,
        }
    }
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::CONFIG);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let cfg = load_launch_config(&cli.config)?.apply(cli.overrides());
    cfg.validate()?;

    if cli.dry_run {
        println!("{}", describe(&build_solver_command(&cfg)));
        return Ok(exit_codes::OK);
    }
    launch(&cfg)
}
