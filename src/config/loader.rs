// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::model::{ConfigFile, ProcessDescriptor, RawConfigFile};
use crate::errors::{Result, SupervisorError};

/// JSON configs may be the bare list of process objects or the full
/// `{ "supervisor": ..., "process": [...] }` shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonConfig {
    List(Vec<ProcessDescriptor>),
    Full(RawConfigFile),
}

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// Files ending in `.json` are read as JSON, everything else as TOML.
///
/// This only performs deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| SupervisorError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config = if is_json {
        match serde_json::from_str::<JsonConfig>(&contents)? {
            JsonConfig::List(process) => RawConfigFile {
                process,
                ..RawConfigFile::default()
            },
            JsonConfig::Full(raw) => raw,
        }
    } else {
        toml::from_str(&contents)?
    };

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML or JSON.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - at least one process,
///   - well-formed `[supervisor]` durations.
///
/// The dependency graph itself is checked by [`crate::tree::build_tree`].
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Default config location: `procmgr.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("procmgr.toml")
}
