//! Test orchestrator: clean, verify, run every component, report.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, instrument};

use crate::core::phase::{Phase, after_init, after_verdict};
use crate::core::report::{summary_line, verdict_line};
use crate::core::types::RunSummary;
use crate::exit_codes;
use crate::io::artifacts::{CleanupReport, clean_stale_logs};
use crate::io::registry::Registry;
use crate::runner::TestRunner;

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub cleanup: CleanupReport,
}

impl RunOutcome {
    /// `FAILED` if any component failed, `OK` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.summary.failed() {
            exit_codes::FAILED
        } else {
            exit_codes::OK
        }
    }
}

/// Run every registered component in order.
///
/// When `live` is set, a pass/fail line is written to `out` as soon as each
/// verdict is known, followed by the summary line. A failed verdict never
/// stops the loop; only a `SetupError` (missing directory or entry-point)
/// aborts the run.
#[instrument(skip_all, fields(components = registry.len()))]
pub fn run_all<R: TestRunner, W: Write>(
    registry: &Registry,
    runner: &R,
    out: &mut W,
    live: bool,
) -> Result<RunOutcome> {
    let mut summary = RunSummary::new(Utc::now().to_rfc3339());
    let mut cleanup = CleanupReport::default();
    let mut phase = Phase::Initializing;

    loop {
        phase = match phase {
            Phase::Initializing => {
                cleanup = clean_stale_logs(registry);
                registry.verify()?;
                info!(
                    removed = cleanup.removed.len(),
                    components = registry.len(),
                    "run started"
                );
                after_init(registry.len())
            }
            Phase::Iterating { next } => {
                let component = registry
                    .components
                    .get(next)
                    .with_context(|| format!("no component at index {next}"))?;
                let verdict = runner.run(component)?;
                if live {
                    writeln!(out, "{}", verdict_line(&verdict)).context("write report")?;
                    out.flush().context("flush report")?;
                }
                let following = after_verdict(next, registry.len(), &verdict);
                summary.push(verdict);
                following
            }
            Phase::Reporting => break,
        };
    }

    if live {
        writeln!(out, "{}", summary_line(&summary)).context("write summary")?;
    }
    info!(
        run = summary.run_count(),
        failed = summary.failed_count(),
        "run finished"
    );
    Ok(RunOutcome { summary, cleanup })
}
