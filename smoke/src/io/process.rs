//! Helpers for running child processes with their output captured to a file.

use std::fs::File;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, error, instrument};

/// Run `cmd` to completion with stdout and stderr both written to `log`.
///
/// Both streams share one file description, so the log holds their output
/// interleaved in the order the child produced it. Stdin is closed. There is
/// no timeout: a child that never exits blocks the caller.
#[instrument(skip_all, fields(program = %cmd.get_program().to_string_lossy()))]
pub fn run_to_log(mut cmd: Command, log: &File) -> Result<ExitStatus> {
    let stdout = log.try_clone().context("clone log handle for stdout")?;
    let stderr = log.try_clone().context("clone log handle for stderr")?;
    cmd.stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };

    let status = child.wait().context("wait for command")?;
    debug!(exit_code = ?status.code(), "command finished");
    Ok(status)
}

/// Render a command as a single shell-like line for display.
pub fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|arg| {
        let arg = arg.to_string_lossy();
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            format!("{arg:?}")
        } else {
            arg.into_owned()
        }
    }));
    parts.join(" ")
}
