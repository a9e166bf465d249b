//! Record types for the synthetic log stream.
//!
//! A [`LogRecord`] is what the generator produces. A [`LogLine`] is what the
//! sink writes: the record plus a timestamp taken at write time. Both the
//! console and the rotating file receive the exact same rendered line.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp layout used in rendered lines (local time, millisecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Log severity levels emitted by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Get all possible log levels.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
        ]
    }

    /// The token written into the `level` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single synthesized log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Log severity level
    pub level: LogLevel,

    /// Name of the simulated service that "emitted" the record
    pub service: String,

    /// Log message content
    pub message: String,

    /// Client-generated record ID, useful for de-duplication downstream
    pub id: Uuid,
}

impl LogRecord {
    /// Create a new log record with a fresh ID.
    pub fn new(level: LogLevel, service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            service: service.into(),
            message: message.into(),
            id: Uuid::new_v4(),
        }
    }
}

/// A record stamped with its write time, as it appears on the console and on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub timestamp: String,

    #[serde(flatten)]
    pub record: LogRecord,
}

impl LogLine {
    /// Stamp `record` with `now`.
    pub fn new(now: NaiveDateTime, record: LogRecord) -> Self {
        Self {
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
            record,
        }
    }

    /// Render as a single JSON line without the trailing newline.
    pub fn render(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse one rendered line back.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line.trim_end())
    }

    /// The write time as a date-time value.
    pub fn timestamp(&self) -> chrono::ParseResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT)
    }
}
