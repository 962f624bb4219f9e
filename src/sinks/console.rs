//! Console sinks (`Stdout`, `Stderr`)

use crate::core::{LogLevel, Result, Sink};
use std::io::Write;

pub const STDOUT_SINK_TYPE: &str = "Stdout";
pub const STDERR_SINK_TYPE: &str = "Stderr";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Writes each record with one locked `write_all` on the process stream.
///
/// The address of the sink descriptor selects options: `color` colours each
/// line by level (feature `console`). Any other address is ignored.
pub struct ConsoleSink {
    stream: ConsoleStream,
    use_colors: bool,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
            use_colors: false,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
            use_colors: false,
        }
    }

    /// Build from a descriptor address
    pub fn from_address(stream: ConsoleStream, address: &str) -> Self {
        let use_colors = matches!(
            address.trim().to_ascii_lowercase().as_str(),
            "color" | "colour" | "colors" | "colours"
        );
        Self { stream, use_colors }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }

    fn write_record(&self, bytes: &[u8]) -> std::io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().lock().write_all(bytes),
            ConsoleStream::Stderr => std::io::stderr().lock().write_all(bytes),
        }
    }

    #[cfg(feature = "console")]
    fn colorize(level: LogLevel, bytes: &[u8]) -> Vec<u8> {
        use colored::Colorize;

        let text = String::from_utf8_lossy(bytes);
        let body = text.trim_end_matches(['\r', '\n']);
        let ending = &text[body.len()..];
        format!("{}{}", body.color(level.color_code()), ending).into_bytes()
    }

    #[cfg(not(feature = "console"))]
    fn colorize(_level: LogLevel, bytes: &[u8]) -> Vec<u8> {
        bytes.to_vec()
    }
}

impl Sink for ConsoleSink {
    fn deliver(&self, level: LogLevel, bytes: &[u8]) -> Result<()> {
        if self.use_colors {
            self.write_record(&Self::colorize(level, bytes))?;
        } else {
            self.write_record(bytes)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().flush()?,
            ConsoleStream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => STDOUT_SINK_TYPE,
            ConsoleStream::Stderr => STDERR_SINK_TYPE,
        }
    }
}
