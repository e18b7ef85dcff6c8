//! Live fan-out of admitted records.
//!
//! Every admitted record is pushed to all subscribers synchronously, in
//! registration order, before and independently of any transport flush.
//! A panicking callback is reported and skipped; it stays registered and
//! never affects the other subscribers or the log call site.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use makerlog_core::LogRecord;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::error;

use crate::errors::panic_message;

type Callback = Arc<dyn Fn(&LogRecord) + Send + Sync>;

#[derive(Clone)]
enum Sink {
    Callback(Callback),
    Channel(broadcast::Sender<Arc<LogRecord>>),
}

struct EmitterInner {
    subscribers: RwLock<Vec<(u64, Sink)>>,
    next_id: AtomicU64,
    emit_count: AtomicU64,
}

impl EmitterInner {
    fn remove(&self, id: u64) {
        self.subscribers.write().retain(|(sid, _)| *sid != id);
    }
}

/// Publish/subscribe list for admitted records.
#[derive(Clone)]
pub struct LogEmitter {
    inner: Arc<EmitterInner>,
}

impl LogEmitter {
    /// Emitter with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EmitterInner {
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
                emit_count: AtomicU64::new(0),
            }),
        }
    }

    fn register(&self, sink: Sink) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.write().push((id, sink));
        Subscription {
            id,
            emitter: Arc::downgrade(&self.inner),
            active: AtomicBool::new(true),
        }
    }

    /// Register a callback. It receives every record emitted after this call.
    ///
    /// Dropping the returned [`Subscription`] does not unsubscribe.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&LogRecord) + Send + Sync + 'static,
    {
        self.register(Sink::Callback(Arc::new(callback)))
    }

    /// Receive records through a bounded broadcast channel.
    ///
    /// Slow receivers lag (and lose records) rather than blocking the
    /// emitter. The channel is dropped from the list once every receiver is
    /// gone.
    pub fn stream(&self, capacity: usize) -> broadcast::Receiver<Arc<LogRecord>> {
        let (tx, rx) = broadcast::channel(capacity.max(1));
        let _ = self.register(Sink::Channel(tx));
        rx
    }

    /// Fan `record` out to every subscriber. Returns how many were reached.
    pub fn emit(&self, record: &Arc<LogRecord>) -> usize {
        let _ = self.inner.emit_count.fetch_add(1, Ordering::Relaxed);
        let sinks: Vec<(u64, Sink)> = self.inner.subscribers.read().clone();

        let mut delivered = 0;
        let mut closed = Vec::new();
        for (id, sink) in sinks {
            match sink {
                Sink::Callback(callback) => {
                    match catch_unwind(AssertUnwindSafe(|| callback(record.as_ref()))) {
                        Ok(()) => delivered += 1,
                        Err(panic) => {
                            error!(
                                subscriber = id,
                                record_id = %record.id,
                                panic = %panic_message(&*panic),
                                "log subscriber panicked"
                            );
                        }
                    }
                }
                Sink::Channel(tx) => {
                    if tx.send(Arc::clone(record)).is_ok() {
                        delivered += 1;
                    } else {
                        closed.push(id);
                    }
                }
            }
        }

        for id in closed {
            self.inner.remove(id);
        }
        delivered
    }

    /// Registered subscribers (callbacks and live channels).
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// Total records emitted.
    pub fn emit_count(&self) -> u64 {
        self.inner.emit_count.load(Ordering::Relaxed)
    }
}

impl Default for LogEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`LogEmitter::subscribe`].
pub struct Subscription {
    id: u64,
    emitter: Weak<EmitterInner>,
    active: AtomicBool,
}

impl Subscription {
    /// Stop delivery to this subscriber. Safe to call more than once.
    pub fn unsubscribe(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            if let Some(inner) = self.emitter.upgrade() {
                inner.remove(self.id);
            }
        }
    }

    /// Whether [`Subscription::unsubscribe`] has not been called yet.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
