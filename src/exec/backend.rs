// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The node runner talks to a `ProcessBackend` instead of `tokio::process`
//! directly. This keeps the OS boundary (search-path lookup, spawning,
//! signals) in one place and lets tests swap in a scripted fake.
//!
//! - `RealProcessBackend` is the default implementation used by `procmgr`.
//! - Tests can provide their own backend that records launches and decides
//!   when (and how) each fake process exits.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};
use tracing::debug;

use crate::tree::ProcessNode;

/// Boxed future returned by the object-safe process traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// How a managed process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    Success,
    /// Exit code; `-1` when the process was killed by a signal.
    Failed(i32),
}

impl ProcessExit {
    pub fn from_code(code: i32) -> Self {
        if code == 0 {
            ProcessExit::Success
        } else {
            ProcessExit::Failed(code)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessExit::Success)
    }
}

impl From<ExitStatus> for ProcessExit {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            ProcessExit::Success
        } else {
            ProcessExit::Failed(status.code().unwrap_or(-1))
        }
    }
}

/// Handle to one launched OS process, owned by exactly one runner task.
pub trait ManagedProcess: Send {
    /// Wait for the process to exit.
    fn wait(&mut self) -> BoxFuture<'_, io::Result<ProcessExit>>;

    /// Ask the process to exit (interrupt, not a forced kill).
    fn interrupt(&mut self) -> io::Result<()>;

    /// Forcibly kill the process and reap it.
    fn kill(&mut self) -> BoxFuture<'_, io::Result<()>>;
}

/// Trait abstracting how processes are found and launched.
pub trait ProcessBackend: Send + Sync {
    /// Resolve the node's command on the search path. `None` means the
    /// executable does not exist.
    fn resolve(&self, node: &ProcessNode) -> Option<PathBuf>;

    /// Launch `program` with the node's arguments and working directory.
    fn launch(&self, node: &ProcessNode, program: &Path) -> io::Result<Box<dyn ManagedProcess>>;
}

/// Production backend built on `tokio::process`.
///
/// Children inherit the supervisor's environment, stdout and stderr; stdin
/// is closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealProcessBackend;

impl ProcessBackend for RealProcessBackend {
    fn resolve(&self, node: &ProcessNode) -> Option<PathBuf> {
        // Commands with a path separator are looked up relative to the
        // process's working directory, bare names on PATH.
        let path = which::which_in(
            &node.command,
            std::env::var_os("PATH"),
            &node.working_directory,
        )
        .ok()?;

        Some(std::path::absolute(&path).unwrap_or(path))
    }

    fn launch(&self, node: &ProcessNode, program: &Path) -> io::Result<Box<dyn ManagedProcess>> {
        let mut cmd = Command::new(program);
        cmd.args(&node.args)
            .current_dir(&node.working_directory)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let child = cmd.spawn()?;
        debug!(process = %node.name, pid = ?child.id(), "spawned child process");

        Ok(Box::new(RealProcess { child }))
    }
}

struct RealProcess {
    child: Child,
}

impl ManagedProcess for RealProcess {
    fn wait(&mut self) -> BoxFuture<'_, io::Result<ProcessExit>> {
        Box::pin(async move {
            let status = self.child.wait().await?;
            Ok(ProcessExit::from(status))
        })
    }

    #[cfg(unix)]
    fn interrupt(&mut self) -> io::Result<()> {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        // No pid means the child has already been reaped.
        let Some(pid) = self.child.id() else {
            return Ok(());
        };

        match kill(Pid::from_raw(pid as i32), Signal::SIGINT) {
            Ok(()) | Err(nix::errno::Errno::ESRCH) => Ok(()),
            Err(errno) => Err(io::Error::from(errno)),
        }
    }

    #[cfg(not(unix))]
    fn interrupt(&mut self) -> io::Result<()> {
        // No portable interrupt outside unix; fall back to terminating.
        self.child.start_kill()
    }

    fn kill(&mut self) -> BoxFuture<'_, io::Result<()>> {
        Box::pin(self.child.kill())
    }
}
