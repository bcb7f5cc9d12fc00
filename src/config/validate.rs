// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile, SupervisorSection, SupervisorSettings};
use crate::errors::ConfigError;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ConfigError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        ensure_has_processes(&raw)?;
        let settings = resolve_settings(&raw.supervisor)?;
        Ok(ConfigFile::new_unchecked(settings, raw.process))
    }
}

fn ensure_has_processes(cfg: &RawConfigFile) -> Result<(), ConfigError> {
    if cfg.process.is_empty() {
        return Err(ConfigError::NoProcesses);
    }
    Ok(())
}

// Dependency graph checks are not done here; they run when the tree is
// built from the descriptors.
fn resolve_settings(section: &SupervisorSection) -> Result<SupervisorSettings, ConfigError> {
    let mut settings = SupervisorSettings::default();

    if let Some(ref s) = section.grace_period {
        settings.grace_period = parse_duration(s)?;
        if settings.grace_period.is_zero() {
            return Err(ConfigError::Invalid(
                "[supervisor].grace_period must be greater than zero".to_string(),
            ));
        }
    }

    if let Some(ref s) = section.restart_delay {
        settings.restart_delay = parse_duration(s)?;
    }

    Ok(settings)
}

/// Parse a simple duration string like `"7s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidDuration {
        value: s.to_string(),
        reason,
    };

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty duration string".to_string()));
    }

    // Find the boundary between digits and suffix.
    let idx = trimmed
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| invalid("duration missing unit suffix".to_string()))?;

    let (num_part, unit_part) = trimmed.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| invalid(format!("invalid duration number '{num_part}': {e}")))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit: u64 = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(invalid(format!(
                "unsupported duration unit '{unit}'; expected ms, s, m, or h"
            )));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| invalid("duration is too large".to_string()))
}
