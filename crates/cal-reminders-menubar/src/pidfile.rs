//! PID file management for the plugin loop.
//!
//! One running loop per user: the loop writes its PID on startup and the
//! `action refresh` / `action quit` commands read it back to signal the
//! process. Stale files left by a crash are detected and replaced.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, info, warn};

use crate::error::{MenubarError, MenubarResult};

/// PID file manager.
///
/// Creates a PID file on creation and removes it on drop.
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Creates a new PID file at the specified path.
    ///
    /// Returns a `Pidfile` error if another instance is already running.
    pub fn create(path: impl Into<PathBuf>) -> MenubarResult<Self> {
        let path = path.into();

        if path.exists() {
            match read_pid(&path) {
                Ok(pid) => {
                    if is_process_running(pid) {
                        return Err(MenubarError::Pidfile(format!(
                            "another instance is already running (pid {} from {})",
                            pid,
                            path.display()
                        )));
                    }
                    warn!(path = %path.display(), pid = pid, "removing stale PID file");
                    fs::remove_file(&path)?;
                }
                Err(_) => {
                    warn!(path = %path.display(), "removing invalid PID file");
                    fs::remove_file(&path)?;
                }
            }
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let pid = process::id();
        let mut file = File::create(&path)?;
        writeln!(file, "{}", pid)?;
        file.sync_all()?;

        info!(path = %path.display(), pid = pid, "created PID file");

        Ok(Self { path })
    }

    /// Returns the path to the PID file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current process ID.
    pub fn pid(&self) -> u32 {
        process::id()
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "failed to remove PID file");
            } else {
                debug!(path = %self.path.display(), "removed PID file");
            }
        }
    }
}

/// Returns the PID of the running instance recorded at `path`, if the file
/// parses and the process is still alive.
pub fn read_running_pid(path: &Path) -> Option<u32> {
    let pid = read_pid(path).ok()?;
    is_process_running(pid).then_some(pid)
}

/// Returns the default PID file path.
///
/// Uses `$XDG_RUNTIME_DIR/cal-reminders.pid` if available, otherwise falls
/// back to `~/.cache/cal-reminders/cal-reminders.pid`.
pub fn default_pid_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir).join("cal-reminders.pid");
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cache")
        .join("cal-reminders")
        .join("cal-reminders.pid")
}

/// Reads the PID from a file.
fn read_pid(path: &Path) -> MenubarResult<u32> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    contents
        .trim()
        .parse::<u32>()
        .map_err(|_| MenubarError::Pidfile(format!("invalid PID in file: {}", contents.trim())))
}

/// Checks if a process with the given PID is running.
#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    // Signal 0 probes for existence without delivering anything.
    unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
}

/// Checks if a process with the given PID is running (non-Unix).
#[cfg(not(unix))]
fn is_process_running(_pid: u32) -> bool {
    // No reliable probe here, so assume it is.
    true
}
