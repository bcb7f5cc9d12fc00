// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod tree;

use std::path::PathBuf;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::Supervisor;
use crate::tree::{NodeId, ProcessTree, build_tree};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - tree building + validation
/// - the supervisor run
/// - Ctrl-C handling (cancels the shared token)
pub async fn run(args: CliArgs) -> Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "procmgr starting");

    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let tree = build_tree(cfg.processes())?;

    if args.dry_run {
        print_dry_run(&cfg, &tree);
        return Ok(());
    }

    let cancel = CancellationToken::new();

    // Ctrl-C → graceful shutdown.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("got interrupt, stopping processes");
            cancel.cancel();
        });
    }

    let supervisor = Supervisor::with_real_backend(tree, cfg.settings());
    let result = supervisor.start_processes(cancel.clone()).await;

    match &result {
        Ok(()) if cancel.is_cancelled() => info!("all processes stopped without issues"),
        Ok(()) => info!("processes finished by themselves"),
        Err(err) if cancel.is_cancelled() => error!(error = %err, "error while stopping processes"),
        Err(err) => error!(error = %err, "error while running processes"),
    }

    Ok(result?)
}

/// Simple dry-run output: print settings and the process tree.
fn print_dry_run(cfg: &ConfigFile, tree: &ProcessTree) {
    let settings = cfg.settings();

    println!("procmgr dry-run");
    println!("  supervisor.grace_period = {:?}", settings.grace_period);
    println!("  supervisor.restart_delay = {:?}", settings.restart_delay);
    println!();

    println!("processes ({}):", tree.len());
    for &root in tree.roots() {
        print_node(tree, root, 1);
    }

    debug!("dry-run complete (no execution)");
}

fn print_node(tree: &ProcessTree, id: NodeId, depth: usize) {
    let node = tree.node(id);
    let indent = "  ".repeat(depth);

    println!("{indent}- {}", node.name);
    println!("{indent}    cmd: {}", node.command);
    if !node.args.is_empty() {
        println!("{indent}    args: {:?}", node.args);
    }
    println!("{indent}    work_dir: {}", node.working_directory.display());
    if node.auto_restart {
        println!("{indent}    auto_restart: true");
    }

    for &child in &node.before {
        print_node(tree, child, depth + 1);
    }
}
