//! Configuration loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`LoggingConfig::default()`]
//! 2. If the settings file exists, deep-merge its values over the defaults
//! 3. Apply `MAKERLOG_*` environment overrides (highest priority)

use std::path::{Path, PathBuf};

use makerlog_core::{LogCategory, LogLevel};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::LoggingConfig;
use crate::errors::{Result, SettingsError};

/// Env var naming an explicit settings file.
pub const CONFIG_PATH_ENV: &str = "MAKERLOG_CONFIG";

/// Resolve the settings file: `$MAKERLOG_CONFIG`, else `~/.makerlog/logging.json`.
pub fn settings_path() -> PathBuf {
    if let Some(explicit) = read_env_string(CONFIG_PATH_ENV) {
        return PathBuf::from(explicit);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".makerlog").join("logging.json")
}

/// Load from the default path with env var overrides.
pub fn load_config() -> Result<LoggingConfig> {
    load_config_from_path(&settings_path())
}

/// Load from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_config_from_path(path: &Path) -> Result<LoggingConfig> {
    let defaults = serde_json::to_value(LoggingConfig::default()).map_err(SettingsError::Invalid)?;

    let merged = if path.exists() {
        debug!(?path, "loading logging settings from file");
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let user: Value = serde_json::from_str(&content).map_err(|source| SettingsError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;
        if !user.is_object() {
            return Err(SettingsError::not_an_object(&user));
        }
        deep_merge(defaults, user)
    } else {
        debug!(?path, "logging settings file not found, using defaults");
        defaults
    };

    let mut config: LoggingConfig =
        serde_json::from_value(merged).map_err(SettingsError::Invalid)?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `MAKERLOG_*` overrides from the process environment.
pub fn apply_env_overrides(config: &mut LoggingConfig) {
    apply_overrides_from(config, |name| std::env::var(name).ok());
}

/// Apply overrides using an arbitrary variable lookup.
///
/// Invalid values are ignored with a warning and leave the file/default
/// value in place.
pub fn apply_overrides_from(config: &mut LoggingConfig, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(val) = read("MAKERLOG_MIN_LEVEL") {
        match LogLevel::parse(&val) {
            Some(level) => config.filter.min_level = level,
            None => warn!(key = "MAKERLOG_MIN_LEVEL", value = %val, "invalid level env var, ignoring"),
        }
    }
    if let Some(val) = read("MAKERLOG_BUFFER_SIZE") {
        match parse_usize_range(&val, 1, 100_000) {
            Some(n) => config.buffer_size = n,
            None => warn!(key = "MAKERLOG_BUFFER_SIZE", value = %val, "invalid usize env var, ignoring"),
        }
    }
    if let Some(val) = read("MAKERLOG_FLUSH_INTERVAL_MS") {
        match parse_u64_range(&val, 0, 3_600_000) {
            Some(n) => config.flush_interval_ms = n,
            None => warn!(key = "MAKERLOG_FLUSH_INTERVAL_MS", value = %val, "invalid u64 env var, ignoring"),
        }
    }
    for (key, slot) in [
        ("MAKERLOG_INCLUDE_SOURCE", &mut config.include_source),
        ("MAKERLOG_INCLUDE_USER", &mut config.include_user),
        ("MAKERLOG_INCLUDE_SESSION", &mut config.include_session),
    ] {
        if let Some(val) = read(key) {
            match parse_bool(&val) {
                Some(b) => *slot = b,
                None => warn!(key, value = %val, "invalid boolean env var, ignoring"),
            }
        }
    }
    if let Some(val) = read("MAKERLOG_ENABLED_CATEGORIES") {
        config.filter.enabled_categories = parse_categories(&val);
    }
    if let Some(val) = read("MAKERLOG_DISABLED_CATEGORIES") {
        config.filter.disabled_categories = parse_categories(&val);
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a comma-separated category list, skipping blanks.
pub fn parse_categories(val: &str) -> Vec<LogCategory> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(LogCategory::from)
        .collect()
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
