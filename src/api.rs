//! Process-wide registry and call-site handles
//!
//! Most programs never build a [`Registry`] themselves: they configure the
//! global one through the free functions here and log through tags
//! declared with [`declare_tag!`](crate::declare_tag).
//!
//! ```no_run
//! use simplelog::{api, declare_tag, slog_info, LogLevel};
//!
//! declare_tag!(NETWORK, "Network");
//!
//! api::add_sink("Console", "Stdout", "color");
//! api::set_default_level(LogLevel::Info);
//!
//! slog_info!(NETWORK, "listening on port {}", 8080);
//! api::flush_all();
//! ```

use crate::core::{Engine, LogLevel, Registry, SourceLocation};
use parking_lot::RwLock;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock, Weak};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry, created with the built-in factories on first use
pub fn global() -> &'static Registry {
    GLOBAL.get_or_init(Registry::with_builtins)
}

/// Read configuration from `path` before any other candidate file
pub fn configure(path: impl Into<PathBuf>) {
    global().set_config_path(path);
}

pub fn add_sink(name: &str, sink_type: &str, address: &str) {
    global().add_sink(name, sink_type, address);
}

pub fn set_default_sinks(names_csv: &str) {
    global().set_default_sinks(names_csv);
}

pub fn set_default_level(level: LogLevel) {
    global().set_default_level(level);
}

pub fn set_async_default(enabled: bool) {
    global().set_async_default(enabled);
}

pub fn set_formatter_name(name: &str) {
    global().set_formatter_name(name);
}

pub fn set_queue_capacity(capacity: usize) {
    global().set_queue_capacity(capacity);
}

pub fn create_engine(tag: &str, sink_names: &str) -> Arc<Engine> {
    global().create_engine(tag, sink_names)
}

pub fn flush_all() {
    global().flush_all();
}

/// Whether `slog_assert!` and friends log and abort on failure (feature
/// `assertions`)
pub const ASSERTIONS_ENABLED: bool = cfg!(feature = "assertions");

/// What a failed assertion does after logging it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertMode {
    /// Flush the target, then abort the process
    Abort,
    /// Only log
    Print,
}

/// Static handle to the engine of one tag in the global registry
///
/// The engine is created on first use, so declaring a tag costs nothing
/// until something is logged through it. The handle only keeps a weak
/// reference: after [`Registry::reset`] the next use resolves a fresh engine
/// against the new configuration.
pub struct Tag {
    name: &'static str,
    sinks: &'static str,
    engine: RwLock<Option<Weak<Engine>>>,
}

impl Tag {
    pub const fn new(name: &'static str, sinks: &'static str) -> Self {
        Self {
            name,
            sinks,
            engine: parking_lot::const_rwlock(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The tag's engine, created (or recreated after a reset) on demand
    pub fn engine(&self) -> Arc<Engine> {
        if let Some(engine) = self.engine.read().as_ref().and_then(Weak::upgrade) {
            return engine;
        }
        let engine = create_engine(self.name, self.sinks);
        *self.engine.write() = Some(Arc::downgrade(&engine));
        engine
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.engine().enabled(level)
    }

    pub fn emit(&self, level: LogLevel, location: SourceLocation, args: fmt::Arguments<'_>) {
        self.engine().emit(level, location, args);
    }

    pub fn flush(&self) {
        self.engine().flush();
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let created = self
            .engine
            .read()
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0);
        f.debug_struct("Tag")
            .field("name", &self.name)
            .field("sinks", &self.sinks)
            .field("created", &created)
            .finish()
    }
}
