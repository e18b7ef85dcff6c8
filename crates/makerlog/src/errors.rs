//! Transport error types.

use std::any::Any;

use thiserror::Error;

/// Failure reported by a transport. Always caught at the delivery site.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A record could not be written.
    #[error("write failed: {0}")]
    Write(String),
    /// Pending records could not be flushed.
    #[error("flush failed: {0}")]
    Flush(String),
    /// A batch upload was rejected; the records were requeued.
    #[error("upload of {count} records failed: {message}")]
    Upload {
        /// Records in the failed batch.
        count: usize,
        /// Uploader's explanation.
        message: String,
    },
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_error_display() {
        let err = TransportError::Upload {
            count: 3,
            message: "503 from application_logs".into(),
        };
        assert_eq!(
            err.to_string(),
            "upload of 3 records failed: 503 from application_logs"
        );
    }

    #[test]
    fn panic_message_from_str_and_string() {
        let a: Box<dyn Any + Send> = Box::new("boom");
        let b: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let c: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*a), "boom");
        assert_eq!(panic_message(&*b), "bang");
        assert_eq!(panic_message(&*c), "unknown panic");
    }
}
