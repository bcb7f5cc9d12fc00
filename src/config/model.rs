// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Grace period between the interrupt and the forced kill when stopping.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(7);

/// Config exactly as read from disk, before any semantic checks.
///
/// TOML form:
///
/// ```toml
/// [supervisor]
/// grace_period = "7s"
/// restart_delay = "250ms"
///
/// [[process]]
/// name = "db"
/// command = "postgres -D ./data"
///
/// [[process]]
/// name = "api"
/// command = "./api --port 8080"
/// after = "db"
/// work_dir = "./api"
/// ```
///
/// Process order matters: it drives root order and error reporting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub supervisor: SupervisorSection,

    #[serde(default)]
    pub process: Vec<ProcessDescriptor>,
}

/// `[supervisor]` section. Durations use `ms`, `s`, `m` or `h` suffixes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupervisorSection {
    /// Defaults to 7s.
    #[serde(default)]
    pub grace_period: Option<String>,

    /// Pause before relaunching an auto-restarting process. Defaults to none.
    #[serde(default)]
    pub restart_delay: Option<String>,
}

/// One `[[process]]` entry.
///
/// Field names accept both the JSON spelling (`autoRestart`, `workDir`) and
/// the snake_case spelling used in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDescriptor {
    pub name: String,

    /// Shell-like command line; see [`crate::tree::tokenize`].
    pub command: String,

    #[serde(default, alias = "auto_restart")]
    pub auto_restart: bool,

    /// Name of the process this one starts after. Empty means none.
    #[serde(default)]
    pub after: Option<String>,

    #[serde(default, alias = "work_dir")]
    pub work_dir: Option<String>,
}

/// Effective supervisor settings after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorSettings {
    pub grace_period: Duration,
    pub restart_delay: Duration,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            restart_delay: Duration::ZERO,
        }
    }
}

/// Validated config; only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    settings: SupervisorSettings,
    processes: Vec<ProcessDescriptor>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        settings: SupervisorSettings,
        processes: Vec<ProcessDescriptor>,
    ) -> Self {
        Self {
            settings,
            processes,
        }
    }

    pub fn settings(&self) -> SupervisorSettings {
        self.settings
    }

    pub fn processes(&self) -> &[ProcessDescriptor] {
        &self.processes
    }
}
