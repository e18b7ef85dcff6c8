//! Per-source logging handle.
//!
//! A [`Logger`] carries fixed defaults (source, category, tags, details) and
//! layers each call's [`LogOptions`] over them: call-level scalars win, tags
//! are concatenated, details keys from the call override the defaults.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use makerlog_core::{LogCategory, LogLevel, LogOptions};

use crate::service::LoggingService;

/// Durations above this many milliseconds are logged at WARN.
pub const SLOW_THRESHOLD_MS: f64 = 1000.0;

macro_rules! leveled {
    ($(#[$doc:meta])* $name:ident, $name_with:ident, $level:expr) => {
        $(#[$doc])*
        pub fn $name(&self, message: impl fmt::Display) {
            self.log($level, message, LogOptions::new());
        }

        $(#[$doc])*
        ///
        /// `options` are layered over the logger defaults.
        pub fn $name_with(&self, message: impl fmt::Display, options: LogOptions) {
            self.log($level, message, options);
        }
    };
}

/// Cheap, cloneable handle bound to one service.
#[derive(Clone, Debug)]
pub struct Logger {
    service: LoggingService,
    defaults: LogOptions,
}

impl Logger {
    pub(crate) fn new(service: LoggingService, defaults: LogOptions) -> Self {
        Self { service, defaults }
    }

    /// Defaults applied to every call.
    pub fn defaults(&self) -> &LogOptions {
        &self.defaults
    }

    /// The service this logger feeds.
    pub fn service(&self) -> &LoggingService {
        &self.service
    }

    /// Logger with `options` layered over these defaults.
    #[must_use]
    pub fn child(&self, options: LogOptions) -> Self {
        Self::new(self.service.clone(), options.merged_over(&self.defaults))
    }

    /// Log at an arbitrary level.
    pub fn log(&self, level: LogLevel, message: impl fmt::Display, options: LogOptions) {
        let _ = self
            .service
            .log(level, message, options.merged_over(&self.defaults));
    }

    leveled!(
        /// Log at TRACE.
        trace, trace_with, LogLevel::Trace
    );
    leveled!(
        /// Log at DEBUG.
        debug, debug_with, LogLevel::Debug
    );
    leveled!(
        /// Log at INFO.
        info, info_with, LogLevel::Info
    );
    leveled!(
        /// Log at SUCCESS (INFO severity, distinct display).
        success, success_with, LogLevel::Success
    );
    leveled!(
        /// Log at WARN.
        warn, warn_with, LogLevel::Warn
    );
    leveled!(
        /// Log at ERROR. Flushes immediately.
        error, error_with, LogLevel::Error
    );
    leveled!(
        /// Log at CRITICAL. Flushes immediately.
        critical, critical_with, LogLevel::Critical
    );
    leveled!(
        /// Log at FATAL. Flushes immediately.
        fatal, fatal_with, LogLevel::Fatal
    );

    /// Log a timing in milliseconds.
    pub fn performance(&self, message: impl fmt::Display, duration_ms: f64) {
        self.performance_with(message, duration_ms, LogOptions::new());
    }

    /// Log a timing in milliseconds with extra options.
    ///
    /// WARN above [`SLOW_THRESHOLD_MS`], INFO otherwise. The category is
    /// PERFORMANCE unless the call sets one; `details.duration` and the
    /// record's `duration` carry the value.
    pub fn performance_with(&self, message: impl fmt::Display, duration_ms: f64, options: LogOptions) {
        let level = if duration_ms > SLOW_THRESHOLD_MS {
            LogLevel::Warn
        } else {
            LogLevel::Info
        };
        let category = options
            .category
            .clone()
            .unwrap_or(LogCategory::Performance);
        let options = options
            .with_category(category)
            .with_detail("duration", duration_ms);
        let _ = self.service.submit(
            level,
            message,
            options.merged_over(&self.defaults),
            Some(duration_ms),
        );
    }

    /// [`Logger::performance`] for a measured [`Duration`].
    pub fn performance_elapsed(&self, message: impl fmt::Display, elapsed: Duration) {
        self.performance(message, millis(elapsed));
    }

    /// Time `f` and log the result under `name`.
    pub fn measure<T>(&self, name: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        self.performance_elapsed(name, start.elapsed());
        value
    }

    /// Time a future and log the result under `name`.
    pub async fn measure_async<F: Future>(&self, name: &str, fut: F) -> F::Output {
        let start = Instant::now();
        let value = fut.await;
        self.performance_elapsed(name, start.elapsed());
        value
    }
}

pub(crate) fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use makerlog_core::{FilterSettings, LogRecord};
    use makerlog_settings::LoggingConfig;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    fn capture(min_level: LogLevel) -> (LoggingService, Arc<Mutex<Vec<LogRecord>>>) {
        let service = LoggingService::new(LoggingConfig {
            filter: FilterSettings {
                min_level,
                ..Default::default()
            },
            flush_interval_ms: 0,
            ..LoggingConfig::default()
        });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = service.on_log(move |r| sink.lock().push(r.clone()));
        (service, seen)
    }

    #[test]
    fn leveled_methods_set_level() {
        let (service, seen) = capture(LogLevel::Trace);
        let log = service.logger("Test");
        log.trace("t");
        log.debug("d");
        log.info("i");
        log.success("s");
        log.warn("w");
        log.error("e");
        log.critical("c");
        log.fatal("f");
        let levels: Vec<LogLevel> = seen.lock().iter().map(|r| r.level).collect();
        assert_eq!(levels, LogLevel::ALL.to_vec());
    }

    #[test]
    fn defaults_and_call_options_merge() {
        let (service, seen) = capture(LogLevel::Info);
        let log = service.get_logger(
            "ThemeEditor",
            LogOptions::new()
                .with_category(LogCategory::Admin)
                .with_tag("admin"),
        );
        log.info_with(
            "saved",
            LogOptions::new()
                .with_category(LogCategory::Theme)
                .with_tag("save")
                .with_detail("themeId", 7),
        );
        let records = seen.lock();
        let record = &records[0];
        assert_eq!(record.category, LogCategory::Theme);
        assert_eq!(record.source.as_deref(), Some("ThemeEditor"));
        assert_eq!(record.tags, vec!["admin", "save"]);
        assert_eq!(record.detail("themeId"), Some(&json!(7)));
    }

    #[test]
    fn child_extends_defaults() {
        let (service, seen) = capture(LogLevel::Info);
        let child = service
            .logger("Admin")
            .child(LogOptions::new().with_tag("imports").with_category("imports"));
        child.info("started");
        let records = seen.lock();
        assert_eq!(records[0].source.as_deref(), Some("Admin"));
        assert_eq!(records[0].category, LogCategory::Custom("imports".into()));
        assert_eq!(records[0].tags, vec!["imports"]);
    }

    #[test]
    fn performance_picks_level_by_duration() {
        let (service, seen) = capture(LogLevel::Info);
        let log = service.logger("Loader");
        log.performance("load", 1500.0);
        log.performance("load", 200.0);
        log.performance("edge", 1000.0);
        let records = seen.lock();
        assert_eq!(records[0].level, LogLevel::Warn);
        assert_eq!(records[0].category, LogCategory::Performance);
        assert_eq!(records[0].detail("duration"), Some(&json!(1500.0)));
        assert_eq!(records[0].duration, Some(1500.0));
        assert_eq!(records[1].level, LogLevel::Info);
        assert_eq!(records[2].level, LogLevel::Info);
    }

    #[test]
    fn performance_category_can_be_overridden_per_call() {
        let (service, seen) = capture(LogLevel::Info);
        let log = service.get_logger("Net", LogOptions::new().with_category(LogCategory::Ui));
        log.performance("render", 5.0);
        log.performance_with("fetch", 5.0, LogOptions::new().with_category(LogCategory::Network));
        let records = seen.lock();
        assert_eq!(records[0].category, LogCategory::Performance);
        assert_eq!(records[1].category, LogCategory::Network);
    }

    #[test]
    fn measure_returns_value_and_logs() {
        let (service, seen) = capture(LogLevel::Info);
        let log = service.logger("Calc");
        let value = log.measure("sum", || 2 + 2);
        assert_eq!(value, 4);
        let records = seen.lock();
        assert_eq!(records[0].message, "sum");
        assert!(records[0].duration.is_some());
    }

    #[tokio::test]
    async fn measure_async_logs_after_completion() {
        let (service, seen) = capture(LogLevel::Info);
        let log = service.logger("Fetch");
        let value = log.measure_async("profile", async { "done" }).await;
        assert_eq!(value, "done");
        assert_eq!(seen.lock()[0].category, LogCategory::Performance);
    }

    #[test]
    fn millis_conversion() {
        assert!((millis(Duration::from_micros(1500)) - 1.5).abs() < 1e-9);
    }
}
