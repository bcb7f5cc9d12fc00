use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use procmgr::exec::backend::BoxFuture;
use procmgr::exec::{ManagedProcess, ProcessBackend, ProcessExit};
use procmgr::tree::ProcessNode;
use tokio::sync::watch;

/// Exit code a fake process reports after a graceful interrupt.
pub const INTERRUPTED_CODE: i32 = 130;
/// Exit code a fake process reports after being killed.
pub const KILLED_CODE: i32 = -9;

/// Scripted behaviour of a fake process, chosen per process name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeBehaviour {
    /// Exit right away with the given code.
    Exit(i32),
    /// Run for a while, then exit with the given code. An interrupt ends it early.
    ExitAfter(Duration, i32),
    /// Run until interrupted.
    UntilInterrupted,
    /// Ignore interrupts; only a kill ends it.
    IgnoreInterrupt,
}

/// Something the supervisor did to a fake process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeEvent {
    Launched(String),
    Interrupted(String),
    Killed(String),
}

/// A fake backend that:
/// - records every launch / interrupt / kill, in order
/// - plays back a scripted [`FakeBehaviour`] per process (default: exit 0)
/// - treats listed commands as missing from the search path
#[derive(Clone, Default)]
pub struct FakeBackend {
    behaviours: Arc<Mutex<HashMap<String, FakeBehaviour>>>,
    missing: Arc<Mutex<HashSet<String>>>,
    events: Arc<Mutex<Vec<FakeEvent>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behaviour(self, process: &str, behaviour: FakeBehaviour) -> Self {
        self.behaviours
            .lock()
            .unwrap()
            .insert(process.to_string(), behaviour);
        self
    }

    pub fn with_missing_command(self, command: &str) -> Self {
        self.missing.lock().unwrap().insert(command.to_string());
        self
    }

    pub fn shared(&self) -> Arc<dyn ProcessBackend> {
        Arc::new(self.clone())
    }

    pub fn events(&self) -> Vec<FakeEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Names in launch order (restarts appear once per launch).
    pub fn launched(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FakeEvent::Launched(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn launch_count(&self, process: &str) -> usize {
        self.launched().iter().filter(|n| *n == process).count()
    }

    pub fn was_launched(&self, process: &str) -> bool {
        self.launch_count(process) > 0
    }

    pub fn interrupt_count(&self, process: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, FakeEvent::Interrupted(n) if n == process))
            .count()
    }

    pub fn kill_count(&self, process: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, FakeEvent::Killed(n) if n == process))
            .count()
    }

    fn record(&self, event: FakeEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProcessBackend for FakeBackend {
    fn resolve(&self, node: &ProcessNode) -> Option<PathBuf> {
        if self.missing.lock().unwrap().contains(&node.command) {
            None
        } else {
            Some(PathBuf::from("/fake/bin").join(&node.command))
        }
    }

    fn launch(&self, node: &ProcessNode, _program: &Path) -> io::Result<Box<dyn ManagedProcess>> {
        let behaviour = self
            .behaviours
            .lock()
            .unwrap()
            .get(&node.name)
            .copied()
            .unwrap_or(FakeBehaviour::Exit(0));

        self.record(FakeEvent::Launched(node.name.clone()));

        let (exit_tx, exit_rx) = watch::channel(None);
        Ok(Box::new(FakeProcess {
            name: node.name.clone(),
            behaviour,
            exit_tx,
            exit_rx,
            backend: self.clone(),
        }))
    }
}

struct FakeProcess {
    name: String,
    behaviour: FakeBehaviour,
    exit_tx: watch::Sender<Option<i32>>,
    exit_rx: watch::Receiver<Option<i32>>,
    backend: FakeBackend,
}

impl FakeProcess {
    /// Wait until an interrupt or kill set an exit code.
    async fn signalled(&mut self) -> io::Result<i32> {
        loop {
            let current = *self.exit_rx.borrow_and_update();
            if let Some(code) = current {
                return Ok(code);
            }
            self.exit_rx
                .changed()
                .await
                .map_err(|e| io::Error::other(e.to_string()))?;
        }
    }

    fn set_exit(&self, code: i32) {
        self.exit_tx.send_if_modified(|v| {
            if v.is_none() {
                *v = Some(code);
                true
            } else {
                false
            }
        });
    }
}

impl ManagedProcess for FakeProcess {
    fn wait(&mut self) -> BoxFuture<'_, io::Result<ProcessExit>> {
        let behaviour = self.behaviour;
        Box::pin(async move {
            let code = match behaviour {
                FakeBehaviour::Exit(code) => {
                    // Real processes never exit within the same poll.
                    tokio::task::yield_now().await;
                    code
                }
                FakeBehaviour::ExitAfter(after, code) => {
                    tokio::select! {
                        _ = tokio::time::sleep(after) => code,
                        signalled = self.signalled() => signalled?,
                    }
                }
                FakeBehaviour::UntilInterrupted | FakeBehaviour::IgnoreInterrupt => {
                    self.signalled().await?
                }
            };
            Ok(ProcessExit::from_code(code))
        })
    }

    fn interrupt(&mut self) -> io::Result<()> {
        self.backend.record(FakeEvent::Interrupted(self.name.clone()));
        if self.behaviour != FakeBehaviour::IgnoreInterrupt {
            self.set_exit(INTERRUPTED_CODE);
        }
        Ok(())
    }

    fn kill(&mut self) -> BoxFuture<'_, io::Result<()>> {
        self.backend.record(FakeEvent::Killed(self.name.clone()));
        self.set_exit(KILLED_CODE);
        Box::pin(async { Ok::<(), io::Error>(()) })
    }
}
