//! The log record and the per-call options that shape it.

use std::error::Error;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::details::Details;
use crate::types::{LogCategory, LogLevel};

/// One admitted log call.
///
/// Built once by the logging service and then only handed out by shared
/// reference (transports, subscribers) or cloned (memory store, streams).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Unique per record (UUID v7).
    pub id: Uuid,
    /// Capture time at construction.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: LogLevel,
    /// Domain tag.
    pub category: LogCategory,
    /// Display text, normalized at construction.
    pub message: String,
    /// Structured payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
    /// Logger-level tags followed by call-level tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Originating component/module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Service session identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Current user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Milliseconds, for performance records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl LogRecord {
    /// New record with a fresh id and no optional fields.
    pub fn new(
        level: LogLevel,
        category: LogCategory,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp,
            level,
            category,
            message: message.into(),
            details: None,
            tags: Vec::new(),
            source: None,
            session_id: None,
            user_id: None,
            duration: None,
        }
    }

    /// Look up a details key.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&serde_json::Value> {
        self.details.as_ref().and_then(|d| d.get(key))
    }
}

/// Options for one log call, or the fixed defaults of a logger.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogOptions {
    /// Category override.
    pub category: Option<LogCategory>,
    /// Structured payload.
    pub details: Option<Details>,
    /// Extra tags, appended after inherited ones.
    pub tags: Vec<String>,
    /// Source override.
    pub source: Option<String>,
}

impl LogOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<LogCategory>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replace the details payload.
    #[must_use]
    pub fn with_details(mut self, details: Details) -> Self {
        self.details = Some(details);
        self
    }

    /// Add one details key.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.details
            .get_or_insert_with(Details::new)
            .insert(key, value);
        self
    }

    /// Merge the normalized form of `err` into the details.
    #[must_use]
    pub fn with_error<E: Error + ?Sized>(mut self, err: &E) -> Self {
        self.details
            .get_or_insert_with(Details::new)
            .extend(Details::from_error(err));
        self
    }

    /// Append one tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Append several tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Layer these (call-level) options over `base` (logger-level).
    ///
    /// Scalars from `self` win, tags are `base` then `self`, and details
    /// keys from `self` override the ones in `base`.
    #[must_use]
    pub fn merged_over(self, base: &LogOptions) -> LogOptions {
        let mut tags = base.tags.clone();
        tags.extend(self.tags);

        let details = match (base.details.clone(), self.details) {
            (Some(mut b), Some(c)) => {
                b.extend(c);
                Some(b)
            }
            (b, c) => c.or(b),
        };

        LogOptions {
            category: self.category.or_else(|| base.category.clone()),
            details,
            tags,
            source: self.source.or_else(|| base.source.clone()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
