//! Formatter trait turning records into bytes

use super::log_record::LogRecord;
use std::sync::Arc;

/// Produces the bytes of one log line, without the trailing line ending.
///
/// A formatter instance is shared by every engine configured with its name,
/// so any cached state lives behind interior synchronisation.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord<'_>) -> Vec<u8>;
    fn name(&self) -> &str;
}

pub type FormatterFactory = Arc<dyn Fn() -> Arc<dyn Formatter> + Send + Sync>;

/// Platform line ending appended by engines after formatting
#[cfg(windows)]
pub const LINE_ENDING: &[u8] = b"\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &[u8] = b"\n";
