// src/logging.rs

//! Supervisor diagnostics on stderr.
//!
//! Supervised children inherit our stdout and stderr, so the supervisor's own
//! lines are kept short: no module target, and the `process` field on every
//! engine event says which child a line is about.
//!
//! Filter resolution:
//! 1. `--log-level` sets one global level.
//! 2. Otherwise `PROCMGR_LOG` is read as `EnvFilter` directives, so
//!    `PROCMGR_LOG=info,procmgr::exec=debug` traces only the runner.
//! 3. Otherwise, or if the variable does not parse, `info`.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

const LOG_ENV: &str = "PROCMGR_LOG";
const DEFAULT_DIRECTIVES: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let directives = filter_directives(cli_level, env_value.as_deref());

    fmt()
        .with_env_filter(EnvFilter::try_new(&directives)?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

/// Pick the filter directives from the CLI flag and the `PROCMGR_LOG` value.
fn filter_directives(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return level_directive(level).to_string();
    }

    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() && EnvFilter::try_new(value).is_ok() => {
            value.to_string()
        }
        _ => DEFAULT_DIRECTIVES.to_string(),
    }
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
