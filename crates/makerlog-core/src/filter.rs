//! Admission filter.
//!
//! A record is admitted when its level reaches `min_level`, its category is
//! listed in `enabled_categories` (or that list is empty), and its category
//! is not listed in `disabled_categories`. A category present in both lists
//! is rejected.

use serde::{Deserialize, Serialize};

use crate::types::{LogCategory, LogLevel};

/// Level and category rules applied at admission time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSettings {
    /// Least severe level that is admitted.
    pub min_level: LogLevel,
    /// Allow-list; empty admits every category.
    pub enabled_categories: Vec<LogCategory>,
    /// Deny-list; wins over the allow-list.
    pub disabled_categories: Vec<LogCategory>,
}

/// Decide whether a candidate record is kept.
#[must_use]
pub fn should_admit(level: LogLevel, category: &LogCategory, settings: &FilterSettings) -> bool {
    if !level.is_at_least(settings.min_level) {
        return false;
    }
    if settings.disabled_categories.contains(category) {
        return false;
    }
    settings.enabled_categories.is_empty() || settings.enabled_categories.contains(category)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
