//! Running work in a background process that outlives the terminal

use std::ffi::CString;
use std::fs::OpenOptions;
use std::os::fd::AsRawFd;

use anyhow::{Context, Result};
use nix::sys::prctl;
use nix::sys::stat::{umask, Mode};
use nix::unistd::{chdir, dup2, fork, setsid, ForkResult, Pid};
use tracing::debug;

/// Starts a unit of work somewhere it can run independently of the caller.
pub trait Launcher {
    type Handle;

    /// Returns once the work is running on its own. The work is never run
    /// in the caller's process when the launcher detaches.
    fn spawn<F>(&self, work: F) -> Result<Self::Handle>
    where
        F: FnOnce() -> Result<()>;
}

/// Forks into a new session with a fixed process name. The handle is the
/// child's pid.
#[derive(Debug, Clone)]
pub struct Detacher {
    name: String,
}

impl Detacher {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Launcher for Detacher {
    type Handle = Pid;

    fn spawn<F>(&self, work: F) -> Result<Pid>
    where
        F: FnOnce() -> Result<()>,
    {
        let name = CString::new(self.name.as_str()).context("process name contains a NUL byte")?;
        prctl::set_name(&name).context("failed to set process name")?;

        // SAFETY: no other threads exist at this point; the child only calls
        // async-signal-safe setup before running single-threaded work.
        match unsafe { fork() }.context("failed to fork timer process")? {
            ForkResult::Parent { child } => {
                debug!(pid = child.as_raw(), "timer detached");
                Ok(child)
            }
            ForkResult::Child => {
                let code = match leave_terminal().and_then(|()| work()) {
                    Ok(()) => 0,
                    Err(_) => 1,
                };
                std::process::exit(code);
            }
        }
    }
}

/// New session, neutral cwd, open umask and stdio pointed at /dev/null.
fn leave_terminal() -> Result<()> {
    setsid().context("setsid failed")?;
    chdir("/").context("chdir to / failed")?;
    umask(Mode::empty());

    let null = OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/null")
        .context("failed to open /dev/null")?;
    for fd in 0..=2 {
        dup2(null.as_raw_fd(), fd).context("failed to redirect stdio")?;
    }
    Ok(())
}
