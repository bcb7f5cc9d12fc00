// src/tree/node.rs

use std::path::PathBuf;

use crate::config::ProcessDescriptor;
use crate::errors::ConfigError;
use crate::tree::tokenize::tokenize;

/// Index of a node inside a [`ProcessTree`](crate::tree::ProcessTree) arena.
///
/// Ids follow the order in which processes were declared in the config.
pub type NodeId = usize;

/// One managed process: what to run, how to restart it, and which processes
/// wait for it.
///
/// A root is simply a node with `after == None`; there is no separate type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessNode {
    pub name: String,
    /// Executable name or path (first token of the configured command).
    pub command: String,
    pub args: Vec<String>,
    pub working_directory: PathBuf,
    pub auto_restart: bool,
    /// Raw name of the process this one starts after.
    pub after: Option<String>,
    /// Dependents, started only once this node completes cleanly.
    pub before: Vec<NodeId>,
}

impl ProcessNode {
    /// Build an unwired node from a config descriptor.
    ///
    /// Fails if the command tokenizes to nothing.
    pub fn from_descriptor(desc: &ProcessDescriptor) -> Result<Self, ConfigError> {
        let mut tokens = tokenize(&desc.command).into_iter();
        let command = tokens
            .next()
            .ok_or_else(|| ConfigError::EmptyCommand(desc.name.clone()))?;

        let working_directory = match desc.work_dir.as_deref() {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            name: desc.name.clone(),
            command,
            args: tokens.collect(),
            working_directory,
            auto_restart: desc.auto_restart,
            after: desc.after.clone().filter(|a| !a.is_empty()),
            before: Vec::new(),
        })
    }

    pub fn is_root(&self) -> bool {
        self.after.is_none()
    }
}
