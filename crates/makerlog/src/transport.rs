//! Pluggable delivery sinks.
//!
//! The service hands every flushed batch to each registered [`Transport`] in
//! registration order: `write` once per record, then `flush` once per batch
//! for transports that report [`Transport::has_flush`]. Both calls are
//! guarded at the delivery site, so an `Err` or a panic from one transport
//! never reaches the others or the log call site.

use async_trait::async_trait;
use makerlog_core::LogRecord;

use crate::errors::Result;

/// A delivery sink for admitted records.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Stable name, used for diagnostics and [`LoggingService::remove_transport`].
    ///
    /// [`LoggingService::remove_transport`]: crate::LoggingService::remove_transport
    fn name(&self) -> &str;

    /// Accept one record. Must not block for long.
    fn write(&self, record: &LogRecord) -> Result<()>;

    /// Whether [`Transport::flush`] does any work. Synchronous sinks keep the
    /// default and are never scheduled for an asynchronous flush.
    fn has_flush(&self) -> bool {
        false
    }

    /// Push out anything the transport holds back. Not awaited by the
    /// service.
    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Retained records, for readable stores.
    fn logs(&self) -> Option<Vec<LogRecord>> {
        None
    }

    /// Drop retained records, for readable stores.
    fn clear(&self) {}
}
