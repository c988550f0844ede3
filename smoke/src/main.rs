//! Component smoke-test runner.
//!
//! Reads the registry from `smoke.toml`, removes stale logs, runs every
//! component's test in order and exits `0` only if all of them passed.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use smoke::exit_codes;
use smoke::io::artifacts::clean_stale_logs;
use smoke::io::config::DEFAULT_CONFIG_FILE;
use smoke::io::registry::load_registry;
use smoke::logging;
use smoke::orchestrate::run_all;
use smoke::runner::ProcessTestRunner;

#[derive(Parser)]
#[command(
    name = "smoke",
    version,
    about = "Run every registered component test with failure isolation"
)]
struct Cli {
    /// Registry config file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Defaults to `run` when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run every registered component in order.
    Run {
        /// `text` prints a live line per component; `json` prints the summary at the end.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print registered components without running them.
    List,
    /// Remove stale log artifacts without running anything.
    Clean,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
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
    match cli.command.unwrap_or(Command::Run {
        format: Format::Text,
    }) {
        Command::Run { format } => cmd_run(&cli.config, format),
        Command::List => cmd_list(&cli.config),
        Command::Clean => cmd_clean(&cli.config),
    }
}

fn cmd_run(config: &Path, format: Format) -> Result<i32> {
    let registry = load_registry(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = run_all(&registry, &ProcessTestRunner, &mut out, format == Format::Text)?;
    if format == Format::Json {
        let payload =
            serde_json::to_string_pretty(&outcome.summary).context("serialize summary")?;
        writeln!(out, "{payload}").context("write summary")?;
    }
    Ok(outcome.exit_code())
}

fn cmd_list(config: &Path) -> Result<i32> {
    let registry = load_registry(config)?;
    for component in &registry.components {
        println!(
            "{}\t{}\t{}",
            component.name,
            component.workdir.display(),
            component.entry.display()
        );
    }
    Ok(exit_codes::OK)
}

fn cmd_clean(config: &Path) -> Result<i32> {
    let registry = load_registry(config)?;
    let report = clean_stale_logs(&registry);
    println!(
        "clean: removed={} failed={}",
        report.removed.len(),
        report.failed.len()
    );
    Ok(exit_codes::OK)
}
