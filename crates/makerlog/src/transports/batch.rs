//! Batched upload transport.
//!
//! Holds severe records until the service flushes, then hands them to an
//! [`Uploader`] in batches. A rejected batch is put back in front of the
//! queue; the queue is capped at twice the batch size so a dead endpoint
//! cannot grow it without bound.

use std::sync::Arc;

use async_trait::async_trait;
use makerlog_core::{LogLevel, LogRecord};
use parking_lot::Mutex;
use tracing::debug;

use crate::errors::{Result, TransportError};
use crate::transport::Transport;

/// Default records per upload.
pub const DEFAULT_MAX_BATCH: usize = 20;

/// Remote sink for record batches.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Deliver one batch. An `Err` requeues the batch.
    async fn upload(&self, batch: &[LogRecord]) -> Result<()>;
}

/// Transport that uploads severe records in batches on flush.
pub struct BatchTransport {
    uploader: Arc<dyn Uploader>,
    min_level: LogLevel,
    max_batch: usize,
    pending: Mutex<Vec<LogRecord>>,
}

impl BatchTransport {
    /// Upload records at ERROR and above, [`DEFAULT_MAX_BATCH`] at a time.
    pub fn new(uploader: Arc<dyn Uploader>) -> Self {
        Self {
            uploader,
            min_level: LogLevel::Error,
            max_batch: DEFAULT_MAX_BATCH,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Change the least severe level that is queued.
    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Change the batch size (at least one).
    #[must_use]
    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch.max(1);
        self
    }

    /// Records waiting for upload.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    fn take_batch(&self) -> Vec<LogRecord> {
        let mut pending = self.pending.lock();
        let n = pending.len().min(self.max_batch);
        pending.drain(..n).collect()
    }

    fn requeue(&self, mut batch: Vec<LogRecord>) {
        let mut pending = self.pending.lock();
        batch.append(&mut pending);
        let cap = self.max_batch * 2;
        if batch.len() > cap {
            let dropped = batch.len() - cap;
            let _ = batch.drain(..dropped);
            debug!(dropped, "upload queue over capacity, dropped oldest records");
        }
        *pending = batch;
    }
}

#[async_trait]
impl Transport for BatchTransport {
    fn name(&self) -> &str {
        "batch"
    }

    fn write(&self, record: &LogRecord) -> Result<()> {
        if record.level.is_at_least(self.min_level) {
            self.pending.lock().push(record.clone());
        }
        Ok(())
    }

    fn has_flush(&self) -> bool {
        true
    }

    async fn flush(&self) -> Result<()> {
        loop {
            let batch = self.take_batch();
            if batch.is_empty() {
                return Ok(());
            }
            if let Err(err) = self.uploader.upload(&batch).await {
                let count = batch.len();
                self.requeue(batch);
                return Err(TransportError::Upload {
                    count,
                    message: err.to_string(),
                });
            }
        }
    }

    fn clear(&self) {
        self.pending.lock().clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
