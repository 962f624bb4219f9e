//! File sink

use crate::core::{LogLevel, LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const FILE_SINK_TYPE: &str = "File";

/// File name used when a `File` descriptor has an empty address
pub const DEFAULT_FILE_NAME: &str = "logs.txt";

/// Writes records to a file truncated at open time.
///
/// A sink whose file could not be opened stays usable: every operation is
/// then a no-op.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileSink {
    /// Open (create or truncate) the file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path,
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    /// Build the sink for a descriptor address, falling back to a disabled
    /// sink when the file cannot be opened
    pub fn from_address(tag: &str, address: &str) -> Self {
        let path = if address.trim().is_empty() {
            Self::default_path()
        } else {
            PathBuf::from(address)
        };

        match Self::open(&path) {
            Ok(sink) => sink,
            Err(e) => {
                eprintln!(
                    "[SIMPLELOG WARNING] File sink for tag '{}' disabled: {}",
                    tag, e
                );
                Self::disabled(path)
            }
        }
    }

    /// A sink that silently discards everything
    pub fn disabled(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(None),
        }
    }

    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join(DEFAULT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.writer.lock().is_some()
    }
}

impl Sink for FileSink {
    fn deliver(&self, _level: LogLevel, bytes: &[u8]) -> Result<()> {
        if let Some(writer) = self.writer.lock().as_mut() {
            writer.write_all(bytes)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        if let Some(writer) = self.writer.lock().as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        FILE_SINK_TYPE
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = Sink::flush(self);
    }
}
