//! Named stopwatches.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::warn;

use crate::logger::Logger;

/// Named start/end timers, usable from several call sites at once.
#[derive(Debug, Default)]
pub struct Timers {
    started: Mutex<HashMap<String, Instant>>,
}

impl Timers {
    /// No running timers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer `name`.
    pub fn start(&self, name: impl Into<String>) {
        let _ = self.started.lock().insert(name.into(), Instant::now());
    }

    /// Stop the timer `name` and return its elapsed time.
    ///
    /// An unknown name returns [`Duration::ZERO`] and warns.
    pub fn end(&self, name: &str) -> Duration {
        match self.started.lock().remove(name) {
            Some(start) => start.elapsed(),
            None => {
                warn!(timer = name, "timer ended without being started");
                Duration::ZERO
            }
        }
    }

    /// Stop the timer `name` and log the elapsed time through `logger`.
    pub fn end_and_log(&self, name: &str, logger: &Logger) -> Duration {
        let elapsed = self.end(name);
        logger.performance_elapsed(name, elapsed);
        elapsed
    }

    /// Elapsed time of a running timer, without stopping it.
    pub fn elapsed(&self, name: &str) -> Option<Duration> {
        self.started.lock().get(name).map(Instant::elapsed)
    }

    /// Whether `name` is running.
    pub fn is_running(&self, name: &str) -> bool {
        self.started.lock().contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::LoggingService;
    use makerlog_core::{LogCategory, LogLevel};
    use makerlog_settings::LoggingConfig;

    #[test]
    fn start_end_cycle() {
        let timers = Timers::new();
        timers.start("fetch");
        assert!(timers.is_running("fetch"));
        assert!(timers.elapsed("fetch").is_some());
        std::thread::sleep(Duration::from_millis(2));
        assert!(timers.end("fetch") >= Duration::from_millis(2));
        assert!(!timers.is_running("fetch"));
    }

    #[test]
    fn unknown_timer_is_zero() {
        let timers = Timers::new();
        assert_eq!(timers.end("never"), Duration::ZERO);
        assert!(timers.elapsed("never").is_none());
    }

    #[test]
    fn end_and_log_emits_performance_record() {
        let service = LoggingService::new(LoggingConfig {
            flush_interval_ms: 0,
            ..LoggingConfig::default()
        });
        let mut rx = service.stream(4);
        let timers = Timers::new();
        timers.start("render");
        let _ = timers.end_and_log("render", &service.logger("Page"));

        let record = rx.try_recv().unwrap();
        assert_eq!(record.message, "render");
        assert_eq!(record.level, LogLevel::Info);
        assert_eq!(record.category, LogCategory::Performance);
    }
}
