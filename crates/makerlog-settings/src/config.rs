//! Process-wide logging configuration and its partial-update form.

use makerlog_core::{FilterSettings, LogCategory, LogLevel};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, SettingsError};
use crate::loader::deep_merge;

/// Default buffered-record threshold.
pub const DEFAULT_BUFFER_SIZE: usize = 100;
/// Default periodic flush interval.
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1000;

/// Logging configuration.
///
/// Transports are runtime objects and live on the service, not here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// Admission rules (`minLevel`, `enabledCategories`, `disabledCategories`).
    #[serde(flatten)]
    pub filter: FilterSettings,
    /// Buffered records that trigger a flush. Values below 1 behave as 1.
    pub buffer_size: usize,
    /// Periodic flush interval; 0 disables the timer.
    pub flush_interval_ms: u64,
    /// Stamp the caller's source on records.
    pub include_source: bool,
    /// Stamp the current user id on records.
    pub include_user: bool,
    /// Stamp the service session id on records.
    pub include_session: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: FilterSettings::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            include_source: true,
            include_user: true,
            include_session: true,
        }
    }
}

impl LoggingConfig {
    /// Buffer threshold clamped to at least one record.
    #[must_use]
    pub fn effective_buffer_size(&self) -> usize {
        self.buffer_size.max(1)
    }

    /// Whether the periodic flush timer should run.
    #[must_use]
    pub fn timer_enabled(&self) -> bool {
        self.flush_interval_ms > 0
    }

    /// Overlay the fields present in `patch`.
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(v) = patch.min_level {
            self.filter.min_level = v;
        }
        if let Some(v) = patch.enabled_categories {
            self.filter.enabled_categories = v;
        }
        if let Some(v) = patch.disabled_categories {
            self.filter.disabled_categories = v;
        }
        if let Some(v) = patch.buffer_size {
            self.buffer_size = v;
        }
        if let Some(v) = patch.flush_interval_ms {
            self.flush_interval_ms = v;
        }
        if let Some(v) = patch.include_source {
            self.include_source = v;
        }
        if let Some(v) = patch.include_user {
            self.include_user = v;
        }
        if let Some(v) = patch.include_session {
            self.include_session = v;
        }
    }

    /// Deep-merge a JSON object over this configuration.
    pub fn merged_with_json(&self, patch: Value) -> Result<Self> {
        if !patch.is_object() {
            return Err(SettingsError::not_an_object(&patch));
        }
        let current = serde_json::to_value(self).map_err(SettingsError::Invalid)?;
        serde_json::from_value(deep_merge(current, patch)).map_err(SettingsError::Invalid)
    }
}

/// Partial configuration update. Absent fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    /// New minimum level.
    pub min_level: Option<LogLevel>,
    /// New allow-list.
    pub enabled_categories: Option<Vec<LogCategory>>,
    /// New deny-list.
    pub disabled_categories: Option<Vec<LogCategory>>,
    /// New buffer threshold.
    pub buffer_size: Option<usize>,
    /// New flush interval.
    pub flush_interval_ms: Option<u64>,
    /// New source flag.
    pub include_source: Option<bool>,
    /// New user flag.
    pub include_user: Option<bool>,
    /// New session flag.
    pub include_session: Option<bool>,
}

impl ConfigPatch {
    /// Empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum level.
    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Set the allow-list.
    #[must_use]
    pub fn enabled_categories(mut self, categories: Vec<LogCategory>) -> Self {
        self.enabled_categories = Some(categories);
        self
    }

    /// Set the deny-list.
    #[must_use]
    pub fn disabled_categories(mut self, categories: Vec<LogCategory>) -> Self {
        self.disabled_categories = Some(categories);
        self
    }

    /// Set the buffer threshold.
    #[must_use]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = Some(size);
        self
    }

    /// Set the flush interval.
    #[must_use]
    pub fn flush_interval_ms(mut self, ms: u64) -> Self {
        self.flush_interval_ms = Some(ms);
        self
    }

    /// Set the source flag.
    #[must_use]
    pub fn include_source(mut self, on: bool) -> Self {
        self.include_source = Some(on);
        self
    }

    /// Set the user flag.
    #[must_use]
    pub fn include_user(mut self, on: bool) -> Self {
        self.include_user = Some(on);
        self
    }

    /// Set the session flag.
    #[must_use]
    pub fn include_session(mut self, on: bool) -> Self {
        self.include_session = Some(on);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
