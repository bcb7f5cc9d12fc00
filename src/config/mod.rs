// src/config/mod.rs

//! Configuration loading and validation for procmgr.
//!
//! Responsibilities:
//! - Define the TOML/JSON-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate global settings and turn them into typed values (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    ConfigFile, DEFAULT_GRACE_PERIOD, ProcessDescriptor, RawConfigFile, SupervisorSection,
    SupervisorSettings,
};
pub use validate::parse_duration;
