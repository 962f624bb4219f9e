//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a record, most severe first.
///
/// A record passes an engine when its level is numerically lower than or
/// equal to the engine level. `Disabled` sits below `Panic`: an engine at
/// `Disabled` lets nothing through, and a record at `Disabled` is never
/// emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Disabled = 0,
    Panic = 1,
    Error = 2,
    Warning = 3,
    Info = 4,
    Debug = 5,
    #[default]
    Verbose = 6,
}

/// Most verbose level the `slog*!` macros keep, fixed at build time.
///
/// Chosen with the `max_level_*` cargo features; when several are enabled
/// the most restrictive wins. Calls above it compile to nothing and their
/// arguments are never evaluated.
pub const STATIC_MAX_LEVEL: LogLevel = if cfg!(feature = "max_level_off") {
    LogLevel::Disabled
} else if cfg!(feature = "max_level_panic") {
    LogLevel::Panic
} else if cfg!(feature = "max_level_error") {
    LogLevel::Error
} else if cfg!(feature = "max_level_warning") {
    LogLevel::Warning
} else if cfg!(feature = "max_level_info") {
    LogLevel::Info
} else if cfg!(feature = "max_level_debug") {
    LogLevel::Debug
} else {
    LogLevel::Verbose
};

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Panic,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Verbose,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Disabled => "DISABLED",
            LogLevel::Panic => "PANIC",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
        }
    }

    /// Single-character code used in the default line prefix
    pub fn to_char(&self) -> char {
        match self {
            LogLevel::Verbose => 'V',
            LogLevel::Debug => 'D',
            LogLevel::Info => 'I',
            LogLevel::Warning => 'W',
            LogLevel::Error => 'E',
            LogLevel::Panic => 'P',
            LogLevel::Disabled => 'X',
        }
    }

    /// Numeric level, matching the integer levels accepted by `from_u8`
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Out-of-range values clamp to `Verbose`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Disabled,
            1 => LogLevel::Panic,
            2 => LogLevel::Error,
            3 => LogLevel::Warning,
            4 => LogLevel::Info,
            5 => LogLevel::Debug,
            _ => LogLevel::Verbose,
        }
    }

    /// Whether a record at `self` passes a filter set to `threshold`
    #[inline]
    pub fn passes(&self, threshold: LogLevel) -> bool {
        *self != LogLevel::Disabled && *self <= threshold
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Verbose => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warning => Yellow,
            LogLevel::Error => Red,
            LogLevel::Panic | LogLevel::Disabled => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Parses the configuration level table: `0`/`p`/`panic` through
/// `5`/`v`/`verbose`, case-insensitive. `Disabled` has no textual form.
impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "p" | "panic" => Ok(LogLevel::Panic),
            "1" | "e" | "error" => Ok(LogLevel::Error),
            "2" | "w" | "warning" => Ok(LogLevel::Warning),
            "3" | "i" | "info" => Ok(LogLevel::Info),
            "4" | "d" | "debug" => Ok(LogLevel::Debug),
            "5" | "v" | "verbose" => Ok(LogLevel::Verbose),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
