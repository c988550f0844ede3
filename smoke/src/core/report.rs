//! Human-readable report lines.

use crate::core::types::{RunSummary, TestVerdict};

/// Line printed as soon as a component's verdict is known.
pub fn verdict_line(verdict: &TestVerdict) -> String {
    if verdict.passed {
        return format!("PASS {} ({} ms)", verdict.component, verdict.duration_ms);
    }
    let status = match verdict.exit_code {
        Some(code) => format!("exit {code}"),
        None => "no exit code".to_string(),
    };
    format!(
        "FAIL {} ({status}, log: {})",
        verdict.component,
        verdict.log_path.display()
    )
}

/// Final summary line.
///
/// The failure count is only shown when something failed, or when nothing
/// ran at all.
pub fn summary_line(summary: &RunSummary) -> String {
    let run = summary.run_count();
    let failed = summary.failed_count();
    if failed > 0 || run == 0 {
        format!("{run} run, {failed} failed")
    } else {
        format!("{run} run, all passed")
    }
}
