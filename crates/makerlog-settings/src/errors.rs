//! Failures while loading or patching the logging configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Why a configuration could not be produced.
///
/// Environment overrides never fail; invalid values there are skipped with a
/// warning.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The settings file is not valid JSON.
    #[error("{} is not valid JSON: {source}", path.display())]
    Syntax {
        /// File that was being parsed.
        path: PathBuf,
        /// Parser failure.
        source: serde_json::Error,
    },
    /// A settings document or patch has a non-object root.
    #[error("logging settings must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was supplied instead.
        found: &'static str,
    },
    /// The merged document does not describe a valid configuration,
    /// e.g. an unknown `minLevel` or a negative `bufferSize`.
    #[error("invalid logging configuration: {0}")]
    Invalid(#[source] serde_json::Error),
}

impl SettingsError {
    pub(crate) fn not_an_object(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        let found = match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        };
        Self::NotAnObject { found }
    }
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
