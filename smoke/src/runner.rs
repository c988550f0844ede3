//! Isolated test runner: one component, one child process, one log.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::core::types::{Component, TestVerdict};
use crate::error::SetupError;
use crate::io::artifacts::create_log;
use crate::io::process::{describe, run_to_log};
use crate::io::workdir::WorkdirGuard;

/// Runs a single component's test and reports its verdict.
///
/// Implementations must turn every failure of the test itself into a failed
/// verdict. `Err` is reserved for setup problems that make the component
/// untestable.
pub trait TestRunner {
    fn run(&self, component: &Component) -> Result<TestVerdict, SetupError>;
}

/// Runs each component's entry-point as a child process from inside the
/// component directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessTestRunner;

impl TestRunner for ProcessTestRunner {
    #[instrument(skip_all, fields(component = %component.name))]
    fn run(&self, component: &Component) -> Result<TestVerdict, SetupError> {
        let enter_error = |source| SetupError::EnterWorkdir {
            component: component.name.clone(),
            path: component.workdir.clone(),
            source,
        };
        // Resolve before switching directories; relative paths would move.
        let workdir = std::path::absolute(&component.workdir).map_err(enter_error)?;
        let entry = workdir.join(&component.entry);
        let log_path = workdir.join(&component.log_file);

        let started = Instant::now();
        let (passed, exit_code) = {
            let _guard = WorkdirGuard::enter(&workdir).map_err(enter_error)?;
            match create_log(&log_path) {
                Ok(log) => execute(component, &entry, &log),
                Err(err) => {
                    warn!(err = %format!("{err:#}"), "cannot create log, marking failed");
                    (false, None)
                }
            }
        };
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(passed, exit_code = ?exit_code, duration_ms, "component finished");
        Ok(TestVerdict {
            component: component.name.clone(),
            passed,
            log_path,
            exit_code,
            duration_ms,
        })
    }
}

/// Build the child command: optional launcher prefix, then the entry-point.
pub fn build_command(component: &Component, entry: &Path) -> Command {
    match component.command.split_first() {
        Some((program, args)) => {
            let mut cmd = Command::new(program);
            cmd.args(args).arg(entry);
            cmd
        }
        None => Command::new(entry),
    }
}

fn execute(component: &Component, entry: &Path, log: &File) -> (bool, Option<i32>) {
    let cmd = build_command(component, entry);
    let line = describe(&cmd);
    match run_to_log(cmd, log) {
        Ok(status) => (status.success(), status.code()),
        Err(err) => {
            warn!(command = %line, err = %format!("{err:#}"), "component test did not start");
            let mut writer = log;
            if let Err(write_err) = writeln!(writer, "failed to start `{line}`: {err:#}") {
                warn!(err = %write_err, "failed to record spawn error in log");
            }
            (false, None)
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    use serial_test::serial;

    use super::*;
    use crate::test_support::FixtureTree;

    #[test]
    #[serial]
    fn passing_component_writes_log_and_passes() {
        let tree = FixtureTree::new().expect("tree");
        let component = tree
            .component("alpha", "echo alpha out; echo alpha err >&2")
            .expect("component");

        let verdict = ProcessTestRunner.run(&component).expect("run");

        assert!(verdict.passed);
        assert_eq!(verdict.component, "alpha");
        assert_eq!(verdict.exit_code, Some(0));
        let log = fs::read_to_string(&verdict.log_path).expect("log");
        assert_eq!(log, "alpha out\nalpha err\n");
    }

    #[test]
    #[serial]
    fn non_zero_exit_is_a_failed_verdict() {
        let tree = FixtureTree::new().expect("tree");
        let component = tree
            .component("beta", "echo broken >&2; exit 3")
            .expect("component");

        let verdict = ProcessTestRunner.run(&component).expect("run");

        assert!(!verdict.passed);
        assert_eq!(verdict.exit_code, Some(3));
        assert!(
            fs::read_to_string(&verdict.log_path)
                .expect("log")
                .contains("broken")
        );
    }

    #[test]
    #[serial]
    fn crash_is_a_failed_verdict_without_exit_code() {
        let tree = FixtureTree::new().expect("tree");
        let component = tree.component("gamma", "kill -9 $$").expect("component");

        let verdict = ProcessTestRunner.run(&component).expect("run");

        assert!(!verdict.passed);
        assert_eq!(verdict.exit_code, None);
    }

    #[test]
    #[serial]
    fn runs_inside_component_directory_and_restores_cwd() {
        let tree = FixtureTree::new().expect("tree");
        let component = tree.component("delta", "pwd").expect("component");
        let before = env::current_dir().expect("cwd");

        let verdict = ProcessTestRunner.run(&component).expect("run");

        assert_eq!(env::current_dir().expect("cwd after"), before);
        let logged = fs::read_to_string(&verdict.log_path).expect("log");
        let logged = PathBuf::from(logged.trim());
        assert_eq!(
            logged.canonicalize().expect("canonical logged"),
            component.workdir.canonicalize().expect("canonical workdir")
        );
    }

    #[test]
    #[serial]
    fn missing_program_is_a_failed_verdict_with_log() {
        let tree = FixtureTree::new().expect("tree");
        let mut component = tree.component("epsilon", "exit 0").expect("component");
        component.command = vec!["/nonexistent/interpreter".to_string()];

        let verdict = ProcessTestRunner.run(&component).expect("run");

        assert!(!verdict.passed);
        assert_eq!(verdict.exit_code, None);
        let log = fs::read_to_string(&verdict.log_path).expect("log");
        assert!(log.contains("failed to start"));
    }

    #[test]
    #[serial]
    fn missing_workdir_is_a_setup_error() {
        let tree = FixtureTree::new().expect("tree");
        let component = tree.component("zeta", "exit 0").expect("component");
        fs::remove_dir_all(&component.workdir).expect("remove");

        let err = ProcessTestRunner.run(&component).expect_err("setup error");
        assert!(matches!(err, SetupError::EnterWorkdir { .. }));
    }

    #[test]
    fn command_prefix_precedes_entry() {
        let component = Component::new(
            PathBuf::from("/tools/ocr"),
            PathBuf::from("tool.py"),
            vec!["python3".to_string(), "-u".to_string()],
            PathBuf::from("test.log"),
        );
        let cmd = build_command(&component, &component.entry_path());
        assert_eq!(describe(&cmd), "python3 -u /tools/ocr/tool.py");

        let bare = Component {
            command: Vec::new(),
            ..component
        };
        let cmd = build_command(&bare, &bare.entry_path());
        assert_eq!(describe(&cmd), "/tools/ocr/tool.py");
    }
}
