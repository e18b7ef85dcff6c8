//! Built-in transports.

pub mod batch;
pub mod console;
pub mod memory;

pub use batch::{BatchTransport, DEFAULT_MAX_BATCH, Uploader};
pub use console::{CONSOLE_TARGET, ConsoleTransport};
pub use memory::{DEFAULT_MAX_LOGS, DeleteCriteria, LogQuery, MemoryTransport};
