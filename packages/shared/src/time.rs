//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, Local, TimeZone};

/// Format used for the timestamp embedded in every chat line.
pub const CHAT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get the current local time
    fn now(&self) -> DateTime<Local>;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<Local>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    pub fn new(fixed_time: DateTime<Local>) -> Self {
        Self { fixed_time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.fixed_time
    }
}

/// Format a local time as a chat timestamp (`YYYY-MM-DD HH:MM:SS`)
pub fn format_chat_timestamp(time: &DateTime<Local>) -> String {
    time.format(CHAT_TIMESTAMP_FORMAT).to_string()
}

/// Convert Unix timestamp (milliseconds) to local RFC 3339 format
///
/// Returns `None` when the timestamp is out of the representable range.
pub fn timestamp_to_local_rfc3339(timestamp_millis: i64) -> Option<String> {
    Local
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|dt| dt.to_rfc3339())
}
