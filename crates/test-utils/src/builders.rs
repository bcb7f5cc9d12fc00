#![allow(dead_code)]

use std::time::Duration;

use procmgr::config::{ConfigFile, ProcessDescriptor, RawConfigFile, SupervisorSettings};
use procmgr::tree::{build_tree, ProcessTree};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_process(mut self, process: ProcessDescriptor) -> Self {
        self.config.process.push(process);
        self
    }

    pub fn grace_period(mut self, value: &str) -> Self {
        self.config.supervisor.grace_period = Some(value.to_string());
        self
    }

    pub fn restart_delay(mut self, value: &str) -> Self {
        self.config.supervisor.restart_delay = Some(value.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ProcessDescriptor`.
pub struct ProcessBuilder {
    process: ProcessDescriptor,
}

impl ProcessBuilder {
    pub fn new(name: &str, command: &str) -> Self {
        Self {
            process: ProcessDescriptor {
                name: name.to_string(),
                command: command.to_string(),
                auto_restart: false,
                after: None,
                work_dir: None,
            },
        }
    }

    pub fn after(mut self, parent: &str) -> Self {
        self.process.after = Some(parent.to_string());
        self
    }

    pub fn auto_restart(mut self, val: bool) -> Self {
        self.process.auto_restart = val;
        self
    }

    pub fn work_dir(mut self, dir: &str) -> Self {
        self.process.work_dir = Some(dir.to_string());
        self
    }

    pub fn build(self) -> ProcessDescriptor {
        self.process
    }
}

/// Build a tree that is expected to be valid.
pub fn tree_of(processes: Vec<ProcessDescriptor>) -> ProcessTree {
    build_tree(&processes).expect("Failed to build valid process tree")
}

/// Settings with a short grace period so stop paths stay fast in tests.
pub fn fast_settings() -> SupervisorSettings {
    SupervisorSettings {
        grace_period: Duration::from_millis(100),
        restart_delay: Duration::ZERO,
    }
}
