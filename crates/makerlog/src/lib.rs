//! # makerlog
//!
//! Buffered, leveled logging service with pluggable transports and live
//! subscriptions.
//!
//! - **Service**: [`LoggingService`] admits records through the level and
//!   category filter, buffers them and flushes on size, severity or a timer
//! - **Loggers**: [`Logger`] handles with per-source defaults, leveled
//!   methods and performance timing
//! - **Emitter**: [`LogEmitter`] fans admitted records out to callbacks and
//!   broadcast streams before any flush
//! - **Transports**: the [`Transport`] trait plus console, in-memory and
//!   batched-upload implementations
//! - **Bridge**: [`ServiceLayer`] forwards application `tracing` events
//!   into a service
//!
//! Nothing in the pipeline propagates a failure back to the log call site;
//! transport and subscriber faults are reported through `tracing` under the
//! `makerlog` target.

#![deny(unsafe_code)]

pub mod emitter;
pub mod errors;
pub mod layer;
pub mod logger;
pub mod measure;
pub mod service;
pub mod test_utils;
pub mod transport;
pub mod transports;

pub use emitter::{LogEmitter, Subscription};
pub use errors::{Result, TransportError};
pub use layer::{ServiceLayer, init_subscriber};
pub use logger::{Logger, SLOW_THRESHOLD_MS};
pub use measure::Timers;
pub use service::LoggingService;
pub use transport::Transport;
pub use transports::{
    BatchTransport, ConsoleTransport, DeleteCriteria, LogQuery, MemoryTransport, Uploader,
};

pub use makerlog_core::{
    Details, FilterSettings, LogCategory, LogLevel, LogOptions, LogRecord, should_admit,
};
pub use makerlog_settings::{ConfigPatch, LoggingConfig};
