//! # simplelog
//!
//! An embeddable, tag-based logging engine.
//!
//! Every log call names a tag (`"Network"`, `"Storage"`, ...). The first time
//! a tag is used, a [`Registry`] builds an [`Engine`] for it from the routing
//! configuration: which named sinks it writes to, its level threshold, its
//! formatter, and whether delivery happens inline or on a worker thread.
//!
//! ## Features
//!
//! - **Routing by tag**: per-tag level and sink list, with a `*` default rule
//! - **INI configuration**: `[general]`, `[loggers]` and `[levels]` sections,
//!   looked up from a fixed list of locations
//! - **Sync or async delivery**: async engines never block producers; on
//!   overflow records are dropped and reported once
//! - **Pluggable sinks and formatters**: registered by type name
//! - **`log` facade bridge** (feature `log-bridge`)
//! - **Assertions** that log, flush and abort (`slog_assert!`, `slog_check!`,
//!   ...), compiled out without feature `assertions`
//! - **Build-time level cap**: `max_level_*` features remove more verbose
//!   `slog*!` calls entirely
//!
//! ```
//! use simplelog::prelude::*;
//!
//! let registry = Registry::isolated();
//! registry.add_sink("Console", "Stdout", "");
//! registry.set_default_level(LogLevel::Warning);
//!
//! let engine = registry.create_engine("Network", "");
//! engine.error("connection reset");
//! engine.info("not shown");
//! engine.flush();
//! ```

pub mod api;
#[cfg(feature = "log-bridge")]
pub mod bridge;
pub mod config;
pub mod core;
pub mod formatters;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::api::Tag;
    pub use crate::config::{Config, SinkDescriptor, TagRule};
    pub use crate::core::{
        Engine, EngineBuilder, EngineMetrics, Formatter, LogLevel, LogRecord, LoggerError,
        Registry, Result, Sink, SourceLocation,
    };
    pub use crate::formatters::{DefaultFormatter, NullFormatter};
    pub use crate::sinks::{ConsoleSink, FileSink};
}

pub use api::{AssertMode, Tag, ASSERTIONS_ENABLED};
pub use config::{Config, SinkDescriptor, TagRule};
pub use core::{
    Engine, EngineBuilder, EngineMetrics, Formatter, LogLevel, LogRecord, LoggerError, Registry,
    Result, Sink, SourceLocation, STATIC_MAX_LEVEL,
};
pub use formatters::{DefaultFormatter, NullFormatter};
pub use sinks::{ConsoleSink, FileSink};
