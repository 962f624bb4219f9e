//! Per-emit record handed to formatters

use super::log_level::LogLevel;
use super::timestamp::{current_thread_id, Timestamp};

/// Where a record was emitted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub file: &'static str,
    pub function: &'static str,
    pub line: u32,
}

impl SourceLocation {
    pub const fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }
}

/// Capture the current source location (`file!()`, `module_path!()`, `line!()`)
#[macro_export]
macro_rules! location {
    () => {
        $crate::SourceLocation::new(file!(), module_path!(), line!())
    };
}

/// Ephemeral record: built by an engine for one emit call, borrowed by the
/// formatter and dropped once the bytes are produced.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub tag: &'a str,
    pub level: LogLevel,
    pub thread_id: u64,
    pub location: SourceLocation,
    pub timestamp: Timestamp,
    pub message: &'a str,
}

impl<'a> LogRecord<'a> {
    /// Stamp a record with the current time and calling thread
    pub fn new(tag: &'a str, level: LogLevel, location: SourceLocation, message: &'a str) -> Self {
        Self {
            tag,
            level,
            thread_id: current_thread_id(),
            location,
            timestamp: Timestamp::now(),
            message,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_thread_id(mut self, thread_id: u64) -> Self {
        self.thread_id = thread_id;
        self
    }
}
