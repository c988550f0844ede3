//! Diagnostics for the runner itself, written to stderr.
//!
//! Three outputs never mix:
//!
//! - stdout carries the report: one `PASS`/`FAIL` line per component and the
//!   `N run, M failed` summary (or the JSON summary with `--format json`).
//! - each component's `test.log` (or the configured `log_file`) holds only
//!   what that component's test printed, plus a spawn error if it never started.
//! - this subscriber carries runner diagnostics. Stale-log removal failures
//!   surface here as `warn` events, which is why the default level is `warn`.
//!
//! Spans: `run_all` (field `components`), `run` (per component, field
//! `component`) and `run_to_log` (field `program`). Working-directory entry and
//! restore, registry verification and child exit codes log at `debug`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `RUST_LOG` selects the filter, `warn` when unset. Compact format on stderr.
///
/// ```bash
/// RUST_LOG=smoke=debug smoke run --config ci/smoke.toml
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
