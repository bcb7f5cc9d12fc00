// src/exec/runner.rs

//! Per-node execution engine.
//!
//! A [`NodeRunner`] drives one process through its lifecycle:
//!
//! ```text
//! Starting -> Running -> Exited  -> (auto_restart) Starting ...
//!                     |          -> Completed -> dependents
//!                     |          -> Failed
//!                     -> Stopping (cancelled) -> stopped, no dependents
//! ```
//!
//! Restarts are a loop inside one task, so a crash-looping process never
//! grows the stack. Dependents are spawned as their own tasks once the node
//! completes cleanly, and the node's result is the first dependent failure.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SupervisorSettings;
use crate::errors::{Result, SupervisorError};
use crate::exec::backend::{ManagedProcess, ProcessBackend, ProcessExit};
use crate::tree::{NodeId, ProcessNode, ProcessTree};

/// How a node's own process run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunEnd {
    /// Exited cleanly on its own; dependents may start.
    Completed,
    /// Stopped because of cancellation (or never started).
    Stopped,
}

/// First event observed while a process is running.
enum RunningEvent {
    Cancelled,
    Exited(std::io::Result<ProcessExit>),
}

/// Everything a node task needs; cheap to clone into each spawned task.
#[derive(Clone)]
pub struct NodeRunner {
    tree: Arc<ProcessTree>,
    backend: Arc<dyn ProcessBackend>,
    settings: SupervisorSettings,
    cancel: CancellationToken,
}

impl NodeRunner {
    pub fn new(
        tree: Arc<ProcessTree>,
        backend: Arc<dyn ProcessBackend>,
        settings: SupervisorSettings,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            tree,
            backend,
            settings,
            cancel,
        }
    }

    /// Run node `id` and, once it completes, its whole dependent subtree.
    ///
    /// Boxed so that dependents can be spawned recursively.
    pub fn run(self, id: NodeId) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        Box::pin(async move {
            match self.supervise(id).await? {
                RunEnd::Stopped => Ok(()),
                RunEnd::Completed => self.start_dependents(id).await,
            }
        })
    }

    /// Starting/Running/Exited loop for a single node.
    async fn supervise(&self, id: NodeId) -> Result<RunEnd> {
        let node = self.tree.node(id);
        let mut attempt: u64 = 0;

        loop {
            if self.cancel.is_cancelled() {
                debug!(process = %node.name, "shutdown already requested; not starting");
                return Ok(RunEnd::Stopped);
            }

            attempt += 1;

            let program =
                self.backend
                    .resolve(node)
                    .ok_or_else(|| SupervisorError::ExecutableNotFound {
                        process: node.name.clone(),
                        command: node.command.clone(),
                    })?;

            info!(
                process = %node.name,
                program = %program.display(),
                args = ?node.args,
                attempt,
                "starting process"
            );

            let mut child =
                self.backend
                    .launch(node, &program)
                    .map_err(|source| SupervisorError::Spawn {
                        process: node.name.clone(),
                        source,
                    })?;

            // A pending shutdown always wins over an exit observed in the
            // same poll.
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => RunningEvent::Cancelled,
                exit = child.wait() => RunningEvent::Exited(exit),
            };

            let exit = match event {
                RunningEvent::Cancelled => {
                    self.stop(node, &mut *child).await?;
                    return Ok(RunEnd::Stopped);
                }
                RunningEvent::Exited(exit) => exit.map_err(|source| SupervisorError::Wait {
                    process: node.name.clone(),
                    source,
                })?,
            };

            // Children often exit from the same Ctrl-C that raised the token;
            // that is a stop, not a failure.
            if self.cancel.is_cancelled() {
                info!(process = %node.name, ?exit, "process exited during shutdown");
                return Ok(RunEnd::Stopped);
            }

            if node.auto_restart {
                warn!(
                    process = %node.name,
                    ?exit,
                    attempt,
                    "process has died an untimely death and will be restarted"
                );
                if !self.pause_before_restart().await {
                    return Ok(RunEnd::Stopped);
                }
                continue;
            }

            return match exit {
                ProcessExit::Success => {
                    info!(process = %node.name, "process has finished");
                    Ok(RunEnd::Completed)
                }
                ProcessExit::Failed(code) => {
                    warn!(process = %node.name, exit_code = code, "process failed");
                    Err(SupervisorError::ProcessExit {
                        process: node.name.clone(),
                        code,
                    })
                }
            };
        }
    }

    /// Interrupt the process, give it the grace period, then kill it.
    async fn stop(&self, node: &ProcessNode, child: &mut dyn ManagedProcess) -> Result<()> {
        info!(process = %node.name, "shutdown requested; interrupting process");

        if let Err(e) = child.interrupt() {
            warn!(
                process = %node.name,
                error = %e,
                "failed to interrupt process; waiting out the grace period"
            );
        }

        let waited = timeout(self.settings.grace_period, child.wait()).await;
        match waited {
            Ok(Ok(exit)) => {
                info!(process = %node.name, ?exit, "process has finished gracefully");
                Ok(())
            }
            Ok(Err(source)) => Err(SupervisorError::Wait {
                process: node.name.clone(),
                source,
            }),
            Err(_elapsed) => {
                warn!(
                    process = %node.name,
                    grace_period = ?self.settings.grace_period,
                    "process is stubborn; killing it"
                );
                child
                    .kill()
                    .await
                    .map_err(|source| SupervisorError::ForcedKill {
                        process: node.name.clone(),
                        source,
                    })?;
                Ok(())
            }
        }
    }

    /// Returns `false` if shutdown was requested during the pause.
    async fn pause_before_restart(&self) -> bool {
        let delay = self.settings.restart_delay;
        if delay.is_zero() {
            // Let other tasks (and the shutdown path) run between relaunches.
            tokio::task::yield_now().await;
            return !self.cancel.is_cancelled();
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = sleep(delay) => true,
        }
    }

    /// Start every dependent of `id` concurrently and wait for all of them.
    async fn start_dependents(&self, id: NodeId) -> Result<()> {
        let node = self.tree.node(id);
        if node.before.is_empty() {
            return Ok(());
        }

        if self.cancel.is_cancelled() {
            info!(
                process = %node.name,
                "shutdown requested; not starting dependent processes"
            );
            return Ok(());
        }

        let names: Vec<&str> = self.tree.dependents(id).map(|n| n.name.as_str()).collect();
        info!(process = %node.name, dependents = ?names, "starting dependent processes");

        let mut set = JoinSet::new();
        for &child in &node.before {
            set.spawn(self.clone().run(child));
        }

        wait_all(set).await
    }
}

/// Wait for every task in `set`; report the first failure to finish.
///
/// Later failures are logged and dropped.
pub(crate) async fn wait_all(mut set: JoinSet<Result<()>>) -> Result<()> {
    let mut first_err: Option<SupervisorError> = None;

    while let Some(joined) = set.join_next().await {
        let outcome = joined.map_err(SupervisorError::from).and_then(|r| r);
        if let Err(err) = outcome {
            if first_err.is_none() {
                first_err = Some(err);
            } else {
                warn!(error = %err, "additional process failure");
            }
        }
    }

    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
