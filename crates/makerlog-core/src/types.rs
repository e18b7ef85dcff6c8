//! Level and category types shared across the workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Log level with a numeric severity rank.
///
/// `Success` ranks with `Info` and `Fatal` ranks with `Critical`; they keep
/// their own display identity. Ordering comparisons go through [`LogLevel::rank`],
/// which is why the enum does not derive `Ord`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Detailed entry/exit points.
    Trace,
    /// Intermediate values, decisions.
    Debug,
    /// Outcomes, summaries.
    #[default]
    Info,
    /// A completed operation worth highlighting. Ranks as `Info`.
    Success,
    /// Non-fatal issues.
    Warn,
    /// Errors.
    Error,
    /// Errors that need immediate attention.
    Critical,
    /// Unrecoverable errors. Ranks as `Critical`.
    Fatal,
}

impl LogLevel {
    /// All levels, least severe first.
    pub const ALL: [Self; 8] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Success,
        Self::Warn,
        Self::Error,
        Self::Critical,
        Self::Fatal,
    ];

    /// Numeric severity (higher = more severe).
    #[must_use]
    pub const fn rank(self) -> i32 {
        match self {
            Self::Trace => 10,
            Self::Debug => 20,
            Self::Info | Self::Success => 30,
            Self::Warn => 40,
            Self::Error => 50,
            Self::Critical | Self::Fatal => 60,
        }
    }

    /// Whether this level is at least as severe as `min`.
    #[must_use]
    pub const fn is_at_least(self, min: Self) -> bool {
        self.rank() >= min.rank()
    }

    /// Error or above. These records bypass buffering.
    #[must_use]
    pub const fn is_severe(self) -> bool {
        self.is_at_least(Self::Error)
    }

    /// Upper-case display tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::Fatal => "FATAL",
        }
    }

    /// Convert from string (case-insensitive). Unknown names map to `Info`.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Info)
    }

    /// Strict parse (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "success" => Some(Self::Success),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            "critical" => Some(Self::Critical),
            "fatal" => Some(Self::Fatal),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain tag used for grouping and filtering.
///
/// Serialized as its lowercase name; any unknown name round-trips through
/// [`LogCategory::Custom`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogCategory {
    /// Application lifecycle.
    System,
    /// Requests and connectivity.
    Network,
    /// Sign-in, tokens, sessions.
    Auth,
    /// Component rendering and interaction.
    Ui,
    /// Back-office actions.
    Admin,
    /// Data shaping and validation.
    Data,
    /// Timings.
    Performance,
    /// Messaging.
    Chat,
    /// Table access.
    Database,
    /// Content management.
    Content,
    /// Theme tokens and styling.
    Theme,
    /// Fallback when no category is given.
    #[default]
    General,
    /// Caller-defined category.
    Custom(String),
}

impl LogCategory {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::Network => "network",
            Self::Auth => "auth",
            Self::Ui => "ui",
            Self::Admin => "admin",
            Self::Data => "data",
            Self::Performance => "performance",
            Self::Chat => "chat",
            Self::Database => "database",
            Self::Content => "content",
            Self::Theme => "theme",
            Self::General => "general",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for LogCategory {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "system" => Self::System,
            "network" => Self::Network,
            "auth" => Self::Auth,
            "ui" => Self::Ui,
            "admin" => Self::Admin,
            "data" => Self::Data,
            "performance" => Self::Performance,
            "chat" => Self::Chat,
            "database" => Self::Database,
            "content" => Self::Content,
            "theme" => Self::Theme,
            "general" | "" => Self::General,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for LogCategory {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<LogCategory> for String {
    fn from(category: LogCategory) -> Self {
        match category {
            LogCategory::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
