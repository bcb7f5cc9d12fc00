// src/engine/manager.rs

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::SupervisorSettings;
use crate::errors::Result;
use crate::exec::runner::wait_all;
use crate::exec::{NodeRunner, ProcessBackend, RealProcessBackend};
use crate::tree::ProcessTree;

/// Top-level orchestrator.
///
/// Owns the validated tree and the process backend. Each call to
/// [`Supervisor::start_processes`] is one run of the whole forest.
pub struct Supervisor {
    tree: Arc<ProcessTree>,
    backend: Arc<dyn ProcessBackend>,
    settings: SupervisorSettings,
}

impl Supervisor {
    pub fn new(
        tree: ProcessTree,
        backend: Arc<dyn ProcessBackend>,
        settings: SupervisorSettings,
    ) -> Self {
        Self {
            tree: Arc::new(tree),
            backend,
            settings,
        }
    }

    /// Supervisor that launches real OS processes.
    pub fn with_real_backend(tree: ProcessTree, settings: SupervisorSettings) -> Self {
        Self::new(tree, Arc::new(RealProcessBackend), settings)
    }

    pub fn tree(&self) -> &ProcessTree {
        &self.tree
    }

    /// Start every root concurrently and wait until the whole tree is done.
    ///
    /// - Returns the first error from any root subtree, but only after every
    ///   spawned task has reached a terminal state.
    /// - One root failing does not stop the others; only `cancel` does.
    /// - A cancelled run where every process stops cleanly is `Ok(())`.
    pub async fn start_processes(&self, cancel: CancellationToken) -> Result<()> {
        let runner = NodeRunner::new(
            Arc::clone(&self.tree),
            Arc::clone(&self.backend),
            self.settings,
            cancel,
        );

        let roots: Vec<&str> = self
            .tree
            .roots()
            .iter()
            .map(|&id| self.tree.node(id).name.as_str())
            .collect();
        info!(?roots, processes = self.tree.len(), "starting process tree");

        let mut set = JoinSet::new();
        for &root in self.tree.roots() {
            set.spawn(runner.clone().run(root));
        }

        wait_all(set).await
    }
}
