//! # makerlog-settings
//!
//! Configuration for the makerlog logging service.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`LoggingConfig::default()`]
//! 2. **Settings file**: `$MAKERLOG_CONFIG` or `~/.makerlog/logging.json`
//!    (deep-merged over defaults)
//! 3. **Environment variables**: `MAKERLOG_*` overrides (highest priority)
//!
//! At runtime the service applies [`ConfigPatch`] updates on top.

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod loader;

pub use config::{ConfigPatch, DEFAULT_BUFFER_SIZE, DEFAULT_FLUSH_INTERVAL_MS, LoggingConfig};
pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_overrides_from, deep_merge, load_config, load_config_from_path,
    settings_path,
};
