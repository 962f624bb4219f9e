//! Sink implementations

pub mod console;
pub mod file;

pub use console::{ConsoleSink, ConsoleStream, STDERR_SINK_TYPE, STDOUT_SINK_TYPE};
pub use file::{FileSink, FILE_SINK_TYPE};

pub use crate::core::Sink;
