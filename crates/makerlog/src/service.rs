//! The logging service: admission, buffering, fan-out and flush scheduling.
//!
//! # Pipeline
//!
//! 1. A candidate is checked against the current filter settings; a rejected
//!    call has no side effects.
//! 2. The admitted record is appended to the buffer (critical section).
//! 3. Subscribers are notified synchronously, outside every service lock.
//! 4. A flush runs when the buffer reaches `bufferSize` or the record is at
//!    ERROR or above. A periodic tokio task flushes every `flushIntervalMs`.
//!
//! # Flush
//!
//! A flush takes the delivery lock, swaps the buffer for an empty one and
//! writes the batch to every transport in registration order. Transports
//! with an asynchronous flush get it spawned on the tokio runtime and not
//! awaited. The delivery lock is re-entrant, so a transport that logs from
//! inside `write` cannot deadlock. A flush re-entered on the delivering
//! thread leaves its records buffered; the outer flush drains them after the
//! current batch has reached every transport, so batches arrive in admission
//! order.
//!
//! # Disposal
//!
//! [`LoggingService::dispose`] is terminal: it cancels the timer and flushes
//! once; later log calls are ignored and the timer never restarts.

use std::cell::Cell;
use std::fmt::{self, Write as _};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::FutureExt;
use makerlog_core::{LogLevel, LogOptions, LogRecord, MonotonicClock, should_admit};
use makerlog_settings::{ConfigPatch, LoggingConfig};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::emitter::{LogEmitter, Subscription};
use crate::errors::{Result, panic_message};
use crate::logger::Logger;
use crate::transport::Transport;
use crate::transports::{ConsoleTransport, MemoryTransport};

struct ServiceInner {
    config: RwLock<LoggingConfig>,
    transports: RwLock<Vec<Arc<dyn Transport>>>,
    buffer: Mutex<Vec<Arc<LogRecord>>>,
    /// Set while the owning thread is delivering.
    delivery: ReentrantMutex<Cell<bool>>,
    emitter: LogEmitter,
    clock: MonotonicClock,
    session_id: String,
    user_id: RwLock<Option<String>>,
    disposed: AtomicBool,
    timer: Mutex<Option<CancellationToken>>,
    runtime: Option<Handle>,
    flush_count: AtomicU64,
}

/// Shared handle to one logging pipeline.
///
/// Cheap to clone; all clones drive the same buffer, transports and
/// subscribers. Dropping the last handle cancels the timer and flushes what
/// is still buffered.
#[derive(Clone)]
pub struct LoggingService {
    inner: Arc<ServiceInner>,
}

impl LoggingService {
    /// Service with no transports.
    ///
    /// Captures the current tokio runtime, if any, for the periodic timer
    /// and for asynchronous transport flushes.
    pub fn new(config: LoggingConfig) -> Self {
        Self::with_transports(config, Vec::new())
    }

    /// Service delivering to `transports`, in order.
    pub fn with_transports(config: LoggingConfig, transports: Vec<Arc<dyn Transport>>) -> Self {
        let inner = Arc::new(ServiceInner {
            config: RwLock::new(config),
            transports: RwLock::new(transports),
            buffer: Mutex::new(Vec::new()),
            delivery: ReentrantMutex::new(Cell::new(false)),
            emitter: LogEmitter::new(),
            clock: MonotonicClock::new(),
            session_id: Uuid::now_v7().to_string(),
            user_id: RwLock::new(None),
            disposed: AtomicBool::new(false),
            timer: Mutex::new(None),
            runtime: Handle::try_current().ok(),
            flush_count: AtomicU64::new(0),
        });
        start_timer(&inner);
        Self { inner }
    }

    /// Service with the console and in-memory transports.
    pub fn standard(config: LoggingConfig) -> Self {
        Self::with_transports(
            config,
            vec![
                Arc::new(ConsoleTransport::new()),
                Arc::new(MemoryTransport::new()),
            ],
        )
    }

    /// [`LoggingService::standard`] with configuration from the settings
    /// file and `MAKERLOG_*` environment.
    pub fn from_settings() -> makerlog_settings::Result<Self> {
        Ok(Self::standard(makerlog_settings::load_config()?))
    }

    // ── transports ──────────────────────────────────────────────────────

    /// Append a transport. It receives every batch flushed from now on.
    pub fn add_transport(&self, transport: Arc<dyn Transport>) {
        self.inner.transports.write().push(transport);
    }

    /// Replace the transport list.
    pub fn set_transports(&self, transports: Vec<Arc<dyn Transport>>) {
        *self.inner.transports.write() = transports;
    }

    /// Remove every transport called `name`. Returns how many were removed.
    pub fn remove_transport(&self, name: &str) -> usize {
        let mut transports = self.inner.transports.write();
        let before = transports.len();
        transports.retain(|t| t.name() != name);
        before - transports.len()
    }

    /// Registered transport count.
    pub fn transport_count(&self) -> usize {
        self.inner.transports.read().len()
    }

    // ── logging ─────────────────────────────────────────────────────────

    /// Logger stamped with `source`.
    pub fn logger(&self, source: impl Into<String>) -> Logger {
        Logger::new(self.clone(), LogOptions::new().with_source(source))
    }

    /// Logger stamped with `source` and the given defaults.
    pub fn get_logger(&self, source: impl Into<String>, defaults: LogOptions) -> Logger {
        Logger::new(self.clone(), defaults.with_source(source))
    }

    /// Submit one log call. Returns whether the record was admitted.
    pub fn log(&self, level: LogLevel, message: impl fmt::Display, options: LogOptions) -> bool {
        self.submit(level, message, options, None)
    }

    pub(crate) fn submit(
        &self,
        level: LogLevel,
        message: impl fmt::Display,
        options: LogOptions,
        duration: Option<f64>,
    ) -> bool {
        let inner = &self.inner;
        if inner.disposed.load(Ordering::Acquire) {
            return false;
        }

        let LogOptions {
            category,
            details,
            tags,
            source,
        } = options;
        let category = category.unwrap_or_default();

        let (threshold, include_source, include_user, include_session) = {
            let config = inner.config.read();
            if !should_admit(level, &category, &config.filter) {
                return false;
            }
            (
                config.effective_buffer_size(),
                config.include_source,
                config.include_user,
                config.include_session,
            )
        };

        let mut record = LogRecord::new(level, category, render(&message), inner.clock.now());
        record.details = details;
        record.tags = tags;
        record.duration = duration;
        if include_source {
            record.source = source;
        }
        if include_session {
            record.session_id = Some(inner.session_id.clone());
        }
        if include_user {
            record.user_id = inner.user_id.read().clone();
        }
        let record = Arc::new(record);

        let flush_now = {
            let mut buffer = inner.buffer.lock();
            if inner.disposed.load(Ordering::Acquire) {
                return false;
            }
            buffer.push(Arc::clone(&record));
            buffer.len() >= threshold || level.is_severe()
        };

        let _ = inner.emitter.emit(&record);

        if flush_now {
            let _ = inner.flush();
        }
        true
    }

    // ── subscriptions ───────────────────────────────────────────────────

    /// Call `callback` synchronously for every admitted record.
    pub fn on_log<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&LogRecord) + Send + Sync + 'static,
    {
        self.inner.emitter.subscribe(callback)
    }

    /// Receive admitted records through a bounded broadcast channel.
    pub fn stream(&self, capacity: usize) -> broadcast::Receiver<Arc<LogRecord>> {
        self.inner.emitter.stream(capacity)
    }

    /// The subscription bus.
    pub fn emitter(&self) -> &LogEmitter {
        &self.inner.emitter
    }

    // ── configuration ───────────────────────────────────────────────────

    /// Overlay `patch` on the configuration. Applies to later admissions
    /// only; a changed flush interval restarts the timer.
    pub fn update_config(&self, patch: ConfigPatch) {
        let interval_changed = {
            let mut config = self.inner.config.write();
            let before = config.flush_interval_ms;
            config.apply(patch);
            config.flush_interval_ms != before
        };
        if interval_changed {
            debug!("flush interval changed, restarting timer");
            start_timer(&self.inner);
        }
    }

    /// Snapshot of the configuration.
    pub fn config(&self) -> LoggingConfig {
        self.inner.config.read().clone()
    }

    /// Set or clear the user stamped on later records.
    pub fn set_user_id(&self, user_id: Option<String>) {
        *self.inner.user_id.write() = user_id;
    }

    /// Current user.
    pub fn user_id(&self) -> Option<String> {
        self.inner.user_id.read().clone()
    }

    /// Identifier generated for this service instance.
    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    // ── lifecycle ───────────────────────────────────────────────────────

    /// Deliver the buffered records now. Returns the batch size; an empty
    /// buffer is a no-op.
    pub fn flush(&self) -> usize {
        self.inner.flush()
    }

    /// Cancel the timer, flush once and stop accepting records.
    /// Later calls do nothing.
    pub fn dispose(&self) {
        {
            let _buffer = self.inner.buffer.lock();
            if self.inner.disposed.swap(true, Ordering::AcqRel) {
                return;
            }
        }
        self.inner.cancel_timer();
        let flushed = self.inner.flush();
        debug!(flushed, "logging service disposed");
    }

    /// Whether [`LoggingService::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// Whether the periodic flush task is running.
    pub fn timer_active(&self) -> bool {
        self.inner.timer.lock().is_some()
    }

    // ── queries ─────────────────────────────────────────────────────────

    /// Records held by the first readable transport, oldest first.
    pub fn logs(&self) -> Vec<LogRecord> {
        let transports = self.inner.transports.read().clone();
        transports
            .iter()
            .find_map(|t| match guarded(|| Ok(t.logs())) {
                Ok(logs) => logs,
                Err(err) => {
                    warn!(transport = t.name(), error = %err, "transport logs() failed");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Clear every transport's retained records.
    pub fn clear_logs(&self) {
        let transports = self.inner.transports.read().clone();
        for transport in &transports {
            let outcome = guarded(|| {
                transport.clear();
                Ok(())
            });
            if let Err(err) = outcome {
                warn!(transport = transport.name(), error = %err, "transport clear() failed");
            }
        }
    }

    /// Records admitted but not yet flushed.
    pub fn buffered_len(&self) -> usize {
        self.inner.buffer.lock().len()
    }

    /// Non-empty flushes performed so far.
    pub fn flush_count(&self) -> u64 {
        self.inner.flush_count.load(Ordering::Relaxed)
    }
}

impl Default for LoggingService {
    fn default() -> Self {
        Self::new(LoggingConfig::default())
    }
}

impl fmt::Debug for LoggingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingService")
            .field("session_id", &self.inner.session_id)
            .field("transports", &self.transport_count())
            .field("buffered", &self.buffered_len())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl ServiceInner {
    fn flush(&self) -> usize {
        let delivering = self.delivery.lock();
        if delivering.replace(true) {
            return 0;
        }

        let mut flushed = 0;
        loop {
            let batch = std::mem::take(&mut *self.buffer.lock());
            if batch.is_empty() {
                break;
            }
            let _ = self.flush_count.fetch_add(1, Ordering::Relaxed);

            let transports = self.transports.read().clone();
            for transport in &transports {
                self.deliver(transport, &batch);
            }
            flushed += batch.len();
        }
        delivering.set(false);
        flushed
    }

    fn deliver(&self, transport: &Arc<dyn Transport>, batch: &[Arc<LogRecord>]) {
        let mut failed = 0_usize;
        let mut first_error = None;
        for record in batch {
            if let Err(err) = guarded(|| transport.write(record)) {
                failed += 1;
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        if let Some(err) = first_error {
            error!(
                transport = transport.name(),
                failed,
                batch = batch.len(),
                error = %err,
                "transport write failed"
            );
        }

        if guarded(|| Ok(transport.has_flush())).unwrap_or(false) {
            self.spawn_flush(Arc::clone(transport));
        }
    }

    fn spawn_flush(&self, transport: Arc<dyn Transport>) {
        let task = async move {
            let outcome = AssertUnwindSafe(transport.flush()).catch_unwind().await;
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    error!(transport = transport.name(), error = %err, "transport flush failed");
                }
                Err(panic) => {
                    error!(
                        transport = transport.name(),
                        panic = %panic_message(&*panic),
                        "transport flush panicked"
                    );
                }
            }
        };
        match self.runtime_handle() {
            Some(handle) => drop(handle.spawn(task)),
            None => futures::executor::block_on(task),
        }
    }

    fn runtime_handle(&self) -> Option<Handle> {
        Handle::try_current().ok().or_else(|| self.runtime.clone())
    }

    fn cancel_timer(&self) {
        if let Some(token) = self.timer.lock().take() {
            token.cancel();
        }
    }
}

impl Drop for ServiceInner {
    fn drop(&mut self) {
        if let Some(token) = self.timer.get_mut().take() {
            token.cancel();
        }
        let _ = self.flush();
    }
}

/// Render a log message. A `Display` impl that reports an error keeps the
/// text written so far, or a placeholder when there is none.
fn render(message: &impl fmt::Display) -> String {
    let mut text = String::new();
    if write!(text, "{message}").is_err() && text.is_empty() {
        text.push_str(UNFORMATTABLE);
    }
    text
}

const UNFORMATTABLE: &str = "<unformattable message>";

/// Run a transport call, turning both `Err` and panics into a message.
fn guarded<T>(f: impl FnOnce() -> Result<T>) -> std::result::Result<T, String> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.to_string()),
        Err(panic) => Err(format!("panicked: {}", panic_message(&*panic))),
    }
}

/// (Re)start the periodic flush task for the current interval.
fn start_timer(inner: &Arc<ServiceInner>) {
    let mut slot = inner.timer.lock();
    if let Some(previous) = slot.take() {
        previous.cancel();
    }
    if inner.disposed.load(Ordering::Acquire) {
        return;
    }
    let interval_ms = {
        let config = inner.config.read();
        if !config.timer_enabled() {
            return;
        }
        config.flush_interval_ms
    };
    let Some(handle) = inner.runtime_handle() else {
        debug!("no tokio runtime, periodic flush disabled");
        return;
    };

    let token = CancellationToken::new();
    let cancelled = token.clone();
    let weak: Weak<ServiceInner> = Arc::downgrade(inner);
    let period = Duration::from_millis(interval_ms);
    drop(handle.spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                () = cancelled.cancelled() => break,
                _ = ticker.tick() => {
                    let Some(inner) = weak.upgrade() else { break };
                    let _ = inner.flush();
                }
            }
        }
    }));
    *slot = Some(token);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TransportError;
    use makerlog_core::LogCategory;

    #[derive(Default)]
    struct Collect {
        seen: Mutex<Vec<String>>,
    }

    impl Transport for Collect {
        fn name(&self) -> &str {
            "collect"
        }

        fn write(&self, record: &LogRecord) -> Result<()> {
            self.seen.lock().push(record.message.clone());
            Ok(())
        }
    }

    impl Collect {
        fn seen(&self) -> Vec<String> {
            self.seen.lock().clone()
        }
    }

    fn quiet_config() -> LoggingConfig {
        LoggingConfig {
            flush_interval_ms: 0,
            ..LoggingConfig::default()
        }
    }

    fn service_with(config: LoggingConfig) -> (LoggingService, Arc<Collect>) {
        let sink = Arc::new(Collect::default());
        let service = LoggingService::with_transports(config, vec![sink.clone()]);
        (service, sink)
    }

    #[test]
    fn rejected_call_has_no_side_effects() {
        let (service, sink) = service_with(LoggingConfig {
            filter: makerlog_core::FilterSettings {
                min_level: LogLevel::Warn,
                ..Default::default()
            },
            ..quiet_config()
        });
        let sub = service.on_log(|_| panic!("must not be called"));
        assert!(!service.log(LogLevel::Info, "dropped", LogOptions::new()));
        assert_eq!(service.buffered_len(), 0);
        assert_eq!(service.emitter().emit_count(), 0);
        assert_eq!(service.flush(), 0);
        assert!(sink.seen().is_empty());
        sub.unsubscribe();
    }

    #[test]
    fn records_are_stamped_per_config() {
        let (service, _) = service_with(quiet_config());
        service.set_user_id(Some("user-42".into()));
        let mut rx = service.stream(8);

        assert!(service.log(
            LogLevel::Info,
            42,
            LogOptions::new().with_source("Header").with_tag("nav")
        ));
        let record = rx.try_recv().unwrap();
        assert_eq!(record.message, "42");
        assert_eq!(record.category, LogCategory::General);
        assert_eq!(record.source.as_deref(), Some("Header"));
        assert_eq!(record.user_id.as_deref(), Some("user-42"));
        assert_eq!(record.session_id.as_deref(), Some(service.session_id()));
        assert_eq!(record.tags, vec!["nav"]);

        service.update_config(
            ConfigPatch::new()
                .include_source(false)
                .include_user(false)
                .include_session(false),
        );
        let _ = service.log(LogLevel::Info, "bare", LogOptions::new().with_source("Header"));
        let record = rx.try_recv().unwrap();
        assert!(record.source.is_none());
        assert!(record.user_id.is_none());
        assert!(record.session_id.is_none());
    }

    #[test]
    fn set_user_id_none_clears() {
        let service = LoggingService::new(quiet_config());
        service.set_user_id(Some("u1".into()));
        service.set_user_id(None);
        assert!(service.user_id().is_none());
    }

    #[test]
    fn buffer_threshold_flushes_in_order() {
        let (service, sink) = service_with(LoggingConfig {
            buffer_size: 3,
            ..quiet_config()
        });
        for m in ["a", "b"] {
            let _ = service.log(LogLevel::Info, m, LogOptions::new());
        }
        assert_eq!(service.buffered_len(), 2);
        assert!(sink.seen().is_empty());

        let _ = service.log(LogLevel::Info, "c", LogOptions::new());
        assert_eq!(service.buffered_len(), 0);
        assert_eq!(service.flush_count(), 1);
        assert_eq!(sink.seen(), vec!["a", "b", "c"]);
    }

    #[test]
    fn zero_buffer_size_flushes_every_record() {
        let (service, sink) = service_with(LoggingConfig {
            buffer_size: 0,
            ..quiet_config()
        });
        for m in ["a", "b"] {
            let _ = service.log(LogLevel::Debug, m, LogOptions::new());
        }
        assert_eq!(service.flush_count(), 0);
        service.update_config(ConfigPatch::new().min_level(LogLevel::Debug));
        for m in ["a", "b"] {
            let _ = service.log(LogLevel::Debug, m, LogOptions::new());
        }
        assert_eq!(service.flush_count(), 2);
        assert_eq!(sink.seen(), vec!["a", "b"]);
    }

    #[test]
    fn severe_record_bypasses_buffer() {
        let (service, sink) = service_with(quiet_config());
        let _ = service.log(LogLevel::Info, "context", LogOptions::new());
        let _ = service.log(LogLevel::Error, "boom", LogOptions::new());
        assert_eq!(service.buffered_len(), 0);
        assert_eq!(sink.seen(), vec!["context", "boom"]);
    }

    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    struct Truncated;

    impl fmt::Display for Truncated {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("partial")?;
            Err(fmt::Error)
        }
    }

    #[test]
    fn failing_display_does_not_panic() {
        let (service, sink) = service_with(LoggingConfig {
            buffer_size: 1,
            ..quiet_config()
        });
        assert!(service.log(LogLevel::Info, Broken, LogOptions::new()));
        service.logger("Widget").warn(Truncated);
        assert_eq!(sink.seen(), vec![UNFORMATTABLE, "partial"]);
    }

    #[test]
    fn nested_flush_is_drained_by_outer_flush() {
        let (service, sink) = service_with(quiet_config());
        let _ = service.log(LogLevel::Info, "outer", LogOptions::new());
        {
            let delivering = service.inner.delivery.lock();
            delivering.set(true);
            let _ = service.log(LogLevel::Info, "inner", LogOptions::new());
            assert_eq!(service.flush(), 0);
            delivering.set(false);
        }
        assert_eq!(service.buffered_len(), 2);
        assert_eq!(service.flush(), 2);
        assert_eq!(sink.seen(), vec!["outer", "inner"]);
    }

    #[test]
    fn flush_on_empty_buffer_is_noop() {
        let (service, _) = service_with(quiet_config());
        assert_eq!(service.flush(), 0);
        assert_eq!(service.flush(), 0);
        assert_eq!(service.flush_count(), 0);
    }

    #[test]
    fn guarded_catches_errors_and_panics() {
        assert_eq!(guarded(|| Ok(1)), Ok(1));
        assert_eq!(
            guarded::<()>(|| Err(TransportError::Write("disk full".into()))),
            Err("write failed: disk full".to_string())
        );
        assert_eq!(
            guarded::<()>(|| panic!("kaboom")),
            Err("panicked: kaboom".to_string())
        );
    }

    #[test]
    fn remove_transport_by_name() {
        let (service, _) = service_with(quiet_config());
        service.add_transport(Arc::new(MemoryTransport::new()));
        assert_eq!(service.transport_count(), 2);
        assert_eq!(service.remove_transport("collect"), 1);
        assert_eq!(service.remove_transport("collect"), 0);
        assert_eq!(service.transport_count(), 1);
    }

    #[test]
    fn logs_come_from_first_readable_transport() {
        let service = LoggingService::standard(LoggingConfig {
            buffer_size: 1,
            ..quiet_config()
        });
        let _ = service.log(LogLevel::Info, "kept", LogOptions::new());
        let logs = service.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "kept");

        service.clear_logs();
        assert!(service.logs().is_empty());
    }

    #[test]
    fn dispose_is_terminal() {
        let (service, sink) = service_with(quiet_config());
        let _ = service.log(LogLevel::Info, "pending", LogOptions::new());
        service.dispose();
        assert!(service.is_disposed());
        assert_eq!(sink.seen(), vec!["pending"]);

        assert!(!service.log(LogLevel::Fatal, "ignored", LogOptions::new()));
        assert_eq!(service.buffered_len(), 0);
        service.dispose();
        assert_eq!(service.flush_count(), 1);
    }

    #[test]
    fn dropping_last_handle_flushes() {
        let (service, sink) = service_with(quiet_config());
        let _ = service.log(LogLevel::Info, "tail", LogOptions::new());
        drop(service);
        assert_eq!(sink.seen(), vec!["tail"]);
    }

    #[test]
    fn no_runtime_means_no_timer() {
        let service = LoggingService::new(LoggingConfig::default());
        assert!(!service.timer_active());
    }

    #[tokio::test]
    async fn timer_starts_and_stops() {
        let service = LoggingService::new(LoggingConfig::default());
        assert!(service.timer_active());
        service.update_config(ConfigPatch::new().flush_interval_ms(0));
        assert!(!service.timer_active());
        service.update_config(ConfigPatch::new().flush_interval_ms(50));
        assert!(service.timer_active());
        service.dispose();
        assert!(!service.timer_active());
        service.update_config(ConfigPatch::new().flush_interval_ms(10));
        assert!(!service.timer_active());
    }
}
