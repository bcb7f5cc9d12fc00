// src/errors.rs

//! Crate-wide error types.
//!
//! [`ConfigError`] covers everything that is detected before a single process
//! is launched (config sanity plus the dependency graph checks). Everything
//! that can go wrong while the tree is running lives in [`SupervisorError`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("duplicate process name '{0}'")]
    DuplicateName(String),

    #[error("process '{0}' is auto-restarting and cannot have processes that start after it")]
    InvalidAutoRestart(String),

    #[error("found circular dependency between processes:\n{0}")]
    CircularDependency(String),

    #[error("process '{process}' starts after unknown process '{after}'")]
    UnresolvedDependency { process: String, after: String },

    #[error("process '{0}' has an empty command")]
    EmptyCommand(String),

    #[error("config must contain at least one process")]
    NoProcesses,

    #[error("invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("process '{process}': executable '{command}' not found in PATH")]
    ExecutableNotFound { process: String, command: String },

    #[error("process '{process}': failed to spawn: {source}")]
    Spawn {
        process: String,
        #[source]
        source: io::Error,
    },

    #[error("process '{process}': failed waiting for exit: {source}")]
    Wait {
        process: String,
        #[source]
        source: io::Error,
    },

    #[error("process '{process}' exited with code {code}")]
    ProcessExit { process: String, code: i32 },

    #[error("process '{process}' could not be killed after the grace period: {source}")]
    ForcedKill {
        process: String,
        #[source]
        source: io::Error,
    },

    #[error("process task panicked or was aborted: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("cannot read config file '{}': {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SupervisorError {
    /// True for errors raised before any process was started.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SupervisorError::Config(_)
                | SupervisorError::ReadConfig { .. }
                | SupervisorError::Toml(_)
                | SupervisorError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
