//! # makerlog-core
//!
//! Shared vocabulary for the makerlog pipeline.
//!
//! - **Levels and categories**: [`LogLevel`] with severity ranks, [`LogCategory`]
//!   with an open `Custom` variant
//! - **Records**: the immutable [`LogRecord`] built once per admitted log call
//! - **Details**: [`Details`] normalization of errors, arrays and primitives
//! - **Filtering**: the pure [`should_admit`] decision over a [`FilterSettings`]
//! - **Clock**: [`MonotonicClock`] for non-decreasing record timestamps

#![deny(unsafe_code)]

pub mod clock;
pub mod details;
pub mod filter;
pub mod record;
pub mod types;

pub use clock::MonotonicClock;
pub use details::Details;
pub use filter::{FilterSettings, should_admit};
pub use record::{LogOptions, LogRecord};
pub use types::{LogCategory, LogLevel};
