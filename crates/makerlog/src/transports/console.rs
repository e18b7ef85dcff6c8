//! Console transport: re-emits records through `tracing`.

use makerlog_core::{LogLevel, LogRecord};
use tracing::Level;

use crate::errors::Result;
use crate::transport::Transport;

/// Target every console event is emitted under.
pub const CONSOLE_TARGET: &str = "makerlog::console";

/// `tracing` level a record is printed at.
pub fn tracing_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info | LogLevel::Success => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error | LogLevel::Critical | LogLevel::Fatal => Level::ERROR,
    }
}

// `tracing` needs the level as a constant at each call site.
macro_rules! console_event {
    ($lvl:expr, $record:ident, $details:ident) => {
        tracing::event!(
            target: "makerlog::console",
            $lvl,
            log_level = $record.level.as_str(),
            category = %$record.category,
            source = $record.source.as_deref().unwrap_or(""),
            tags = ?$record.tags,
            details = %$details,
            "{}",
            $record.message
        )
    };
}

/// Writes each record to the process `tracing` subscriber.
#[derive(Debug, Default)]
pub struct ConsoleTransport;

impl ConsoleTransport {
    /// New console transport.
    pub fn new() -> Self {
        Self
    }
}

impl Transport for ConsoleTransport {
    fn name(&self) -> &str {
        "console"
    }

    fn write(&self, record: &LogRecord) -> Result<()> {
        let details = record
            .details
            .as_ref()
            .map(|d| serde_json::Value::Object(d.as_map().clone()).to_string())
            .unwrap_or_default();
        match tracing_level(record.level) {
            Level::TRACE => console_event!(Level::TRACE, record, details),
            Level::DEBUG => console_event!(Level::DEBUG, record, details),
            Level::INFO => console_event!(Level::INFO, record, details),
            Level::WARN => console_event!(Level::WARN, record, details),
            _ => console_event!(Level::ERROR, record, details),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use makerlog_core::LogCategory;
    use crate::test_utils::capture_diagnostics;

    #[test]
    fn level_mapping() {
        assert_eq!(tracing_level(LogLevel::Trace), Level::TRACE);
        assert_eq!(tracing_level(LogLevel::Success), Level::INFO);
        assert_eq!(tracing_level(LogLevel::Warn), Level::WARN);
        assert_eq!(tracing_level(LogLevel::Critical), Level::ERROR);
        assert_eq!(tracing_level(LogLevel::Fatal), Level::ERROR);
    }

    #[test]
    fn write_emits_at_mapped_level() {
        let (diagnostics, _guard) = capture_diagnostics();
        let console = ConsoleTransport::new();
        for level in [LogLevel::Success, LogLevel::Critical, LogLevel::Debug] {
            let record = LogRecord::new(level, LogCategory::Theme, "applied", Utc::now());
            console.write(&record).unwrap();
        }
        let events = diagnostics.events_for_target(CONSOLE_TARGET);
        let levels: Vec<Level> = events.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![Level::INFO, Level::ERROR, Level::DEBUG]);
        assert_eq!(events[0].field("log_level"), Some("SUCCESS"));
        assert_eq!(events[1].field("category"), Some("theme"));
    }

    #[test]
    fn write_never_fails() {
        let console = ConsoleTransport::new();
        for level in LogLevel::ALL {
            let record = LogRecord::new(level, LogCategory::Ui, "rendered", Utc::now());
            assert!(console.write(&record).is_ok());
        }
        assert!(!console.has_flush());
        assert!(console.logs().is_none());
        assert_eq!(CONSOLE_TARGET, "makerlog::console");
    }
}
