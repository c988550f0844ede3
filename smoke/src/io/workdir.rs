//! Scoped ownership of the process working directory.
//!
//! The working directory is process-global. `WorkdirGuard` holds it
//! exclusively for its lifetime and restores the previous directory on drop,
//! whichever way the scope is left.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

use tracing::{debug, warn};

fn workdir_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[derive(Debug)]
pub struct WorkdirGuard {
    previous: PathBuf,
    // Dropped after `Drop::drop` restores `previous`.
    _lock: MutexGuard<'static, ()>,
}

impl WorkdirGuard {
    /// Switch the process into `dir`.
    ///
    /// Fails without changing anything if the current directory cannot be
    /// read or `dir` cannot be entered. Not reentrant: entering again while a
    /// guard is alive on the same thread deadlocks.
    pub fn enter(dir: &Path) -> io::Result<Self> {
        let lock = workdir_lock()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = env::current_dir()?;
        env::set_current_dir(dir)?;
        debug!(from = %previous.display(), to = %dir.display(), "entered working directory");
        Ok(Self {
            previous,
            _lock: lock,
        })
    }

    /// Directory restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Err(err) = env::set_current_dir(&self.previous) {
            warn!(
                path = %self.previous.display(),
                err = %err,
                "failed to restore working directory"
            );
        } else {
            debug!(to = %self.previous.display(), "restored working directory");
        }
    }
}
