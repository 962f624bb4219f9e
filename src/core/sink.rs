//! Sink trait for log output destinations

use super::{error::Result, log_level::LogLevel};
use std::sync::Arc;

/// Destination for finished log lines.
///
/// One instance may be shared by several engines, so implementations
/// serialise concurrent `deliver`/`flush` calls themselves and write one
/// record at a time.
pub trait Sink: Send + Sync {
    fn deliver(&self, level: LogLevel, bytes: &[u8]) -> Result<()>;
    fn flush(&self) -> Result<()>;
    /// Type name this sink was built from (`"Stdout"`, `"File"`, ...)
    fn name(&self) -> &str;
}

/// Builds a sink for a tag from the free-form address of its descriptor.
pub type SinkFactory = Arc<dyn Fn(&str, &str) -> Arc<dyn Sink> + Send + Sync>;
