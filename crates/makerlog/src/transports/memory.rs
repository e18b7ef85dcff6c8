//! Bounded in-memory store.
//!
//! Both a [`Transport`] and the query source for a live log console:
//! retains the most recent records up to a capacity, evicting the oldest.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use makerlog_core::{LogCategory, LogLevel, LogRecord};
use parking_lot::Mutex;

use crate::errors::Result;
use crate::transport::Transport;

/// Default number of retained records.
pub const DEFAULT_MAX_LOGS: usize = 1000;

/// Criteria for [`MemoryTransport::filtered`]. Unset fields match everything.
#[derive(Clone, Debug, Default)]
pub struct LogQuery {
    /// Minimum severity.
    pub min_level: Option<LogLevel>,
    /// Exact category.
    pub category: Option<LogCategory>,
    /// Substring of the record source.
    pub source: Option<String>,
    /// Case-insensitive substring of message, source or category.
    pub search: Option<String>,
    /// Maximum results. Zero means no limit.
    pub limit: Option<usize>,
}

impl LogQuery {
    fn matches(&self, record: &LogRecord, needle: Option<&str>) -> bool {
        if let Some(min) = self.min_level {
            if !record.level.is_at_least(min) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &record.category != category {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if !record.source.as_deref().is_some_and(|s| s.contains(source.as_str())) {
                return false;
            }
        }
        if let Some(needle) = needle {
            let hit = record.message.to_lowercase().contains(needle)
                || record
                    .source
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(needle))
                || record.category.as_str().to_lowercase().contains(needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Criteria for [`MemoryTransport::delete`]. A record is removed when it
/// matches any set field; with no field set nothing is removed.
#[derive(Clone, Debug, Default)]
pub struct DeleteCriteria {
    /// Remove records strictly older than this instant.
    pub older_than: Option<DateTime<Utc>>,
    /// Remove records of this category.
    pub category: Option<LogCategory>,
    /// Remove records of exactly this level.
    pub level: Option<LogLevel>,
}

impl DeleteCriteria {
    fn is_empty(&self) -> bool {
        self.older_than.is_none() && self.category.is_none() && self.level.is_none()
    }

    fn matches(&self, record: &LogRecord) -> bool {
        self.older_than.is_some_and(|t| record.timestamp < t)
            || self.category.as_ref().is_some_and(|c| &record.category == c)
            || self.level.is_some_and(|l| record.level == l)
    }
}

/// Ring buffer of recent records.
#[derive(Debug)]
pub struct MemoryTransport {
    max_logs: usize,
    logs: Mutex<VecDeque<LogRecord>>,
}

impl MemoryTransport {
    /// Store retaining [`DEFAULT_MAX_LOGS`] records.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_LOGS)
    }

    /// Store retaining at most `max_logs` records (at least one).
    pub fn with_capacity(max_logs: usize) -> Self {
        let max_logs = max_logs.max(1);
        Self {
            max_logs,
            logs: Mutex::new(VecDeque::with_capacity(max_logs.min(DEFAULT_MAX_LOGS))),
        }
    }

    /// Retention limit.
    pub fn capacity(&self) -> usize {
        self.max_logs
    }

    /// Retained record count.
    pub fn len(&self) -> usize {
        self.logs.lock().len()
    }

    /// Whether nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.logs.lock().is_empty()
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.logs.lock().iter().cloned().collect()
    }

    /// The `n` most recent records, newest first.
    pub fn recent(&self, n: usize) -> Vec<LogRecord> {
        self.logs.lock().iter().rev().take(n).cloned().collect()
    }

    /// Records matching `query`, newest first.
    pub fn filtered(&self, query: &LogQuery) -> Vec<LogRecord> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let limit = query.limit.filter(|&n| n > 0).unwrap_or(usize::MAX);
        self.logs
            .lock()
            .iter()
            .rev()
            .filter(|r| query.matches(r, needle.as_deref()))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Remove records matching `criteria`. Returns how many were removed.
    pub fn delete(&self, criteria: &DeleteCriteria) -> usize {
        if criteria.is_empty() {
            return 0;
        }
        let mut logs = self.logs.lock();
        let before = logs.len();
        logs.retain(|r| !criteria.matches(r));
        before - logs.len()
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryTransport {
    fn name(&self) -> &str {
        "memory"
    }

    fn write(&self, record: &LogRecord) -> Result<()> {
        let mut logs = self.logs.lock();
        while logs.len() >= self.max_logs {
            let _ = logs.pop_front();
        }
        logs.push_back(record.clone());
        Ok(())
    }

    fn logs(&self) -> Option<Vec<LogRecord>> {
        Some(self.records())
    }

    fn clear(&self) {
        self.logs.lock().clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
