// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `procmgr`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procmgr",
    version,
    about = "Start, order, restart and gracefully stop a tree of processes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML, or JSON when it ends in `.json`).
    ///
    /// Default: `procmgr.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "procmgr.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCMGR_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the process tree, but don't start anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
