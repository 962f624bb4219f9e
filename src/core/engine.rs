//! Per-tag logging engine

use super::{
    async_consumer::AsyncConsumer,
    consumer::{Consumer, SyncConsumer},
    formatter::{Formatter, LINE_ENDING},
    log_level::LogLevel,
    log_record::{LogRecord, SourceLocation},
    metrics::EngineMetrics,
    sink::Sink,
};
use crate::formatters::DefaultFormatter;
use parking_lot::Mutex;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A tag bound to a level, a formatter, its sinks and a consumption strategy.
///
/// Engines are normally obtained from a [`Registry`](super::Registry), which
/// creates one per tag and hands out the same `Arc<Engine>` afterwards.
pub struct Engine {
    tag: String,
    level: LogLevel,
    formatter: Arc<dyn Formatter>,
    sinks: Vec<Arc<dyn Sink>>,
    consumer: Box<dyn Consumer>,
    /// Keeps hand-off order equal to emit order across producers
    consume_lock: Mutex<()>,
}

impl Engine {
    /// Create a builder for Engine
    ///
    /// # Example
    /// ```
    /// use simplelog::prelude::*;
    ///
    /// let engine = Engine::builder("Network")
    ///     .level(LogLevel::Debug)
    ///     .sink(ConsoleSink::stdout())
    ///     .async_mode(1000)
    ///     .build();
    /// engine.info("link up");
    /// engine.flush();
    /// ```
    #[must_use]
    pub fn builder(tag: impl Into<String>) -> EngineBuilder {
        EngineBuilder::new(tag)
    }

    /// Format and hand over one record if `level` passes this engine
    pub fn emit(&self, level: LogLevel, location: SourceLocation, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        let message = match args.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(args.to_string()),
        };
        let record = LogRecord::new(&self.tag, level, location, &message);
        let mut bytes = self.formatter.format(&record);
        bytes.extend_from_slice(LINE_ENDING);

        let _guard = self.consume_lock.lock();
        self.consumer.consume(level, bytes);
    }

    /// Emit a plain message, locating it at the caller
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        if !self.enabled(level) {
            return;
        }
        let caller = std::panic::Location::caller();
        let location = SourceLocation::new(caller.file(), "", caller.line());
        self.emit(level, location, format_args!("{}", message.as_ref()));
    }

    #[inline]
    #[track_caller]
    pub fn panic(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Panic, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn verbose(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Verbose, message);
    }

    /// Block until everything emitted so far reached the sinks and they
    /// have been flushed
    pub fn flush(&self) {
        self.consumer.flush();
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level.passes(self.level)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn formatter_name(&self) -> &str {
        self.formatter.name()
    }

    pub fn is_async(&self) -> bool {
        self.consumer.is_async()
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Whether this engine writes through exactly this sink instance
    pub fn shares_sink(&self, sink: &Arc<dyn Sink>) -> bool {
        self.sinks.iter().any(|s| Arc::ptr_eq(s, sink))
    }

    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.sinks
    }

    /// Get the engine metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use simplelog::Engine;
    ///
    /// let engine = Engine::builder("Metrics").build();
    /// engine.info("counted");
    /// engine.flush();
    /// let metrics = engine.metrics();
    /// assert_eq!(metrics.delivered_count(), 1);
    /// assert_eq!(metrics.dropped_count(), 0);
    /// ```
    pub fn metrics(&self) -> &EngineMetrics {
        self.consumer.metrics()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("tag", &self.tag)
            .field("level", &self.level)
            .field("formatter", &self.formatter.name())
            .field("sinks", &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>())
            .field("async", &self.is_async())
            .finish()
    }
}

/// Builder for constructing an Engine with a fluent API
///
/// Defaults: level `Verbose`, the `Default` formatter, no sinks, synchronous
/// delivery.
pub struct EngineBuilder {
    tag: String,
    level: LogLevel,
    formatter: Option<Arc<dyn Formatter>>,
    sinks: Vec<Arc<dyn Sink>>,
    async_capacity: Option<usize>,
}

impl EngineBuilder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            level: LogLevel::Verbose,
            formatter: None,
            sinks: Vec::new(),
            async_capacity: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Use a shared formatter instance
    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Add already opened, possibly shared, sink instances
    #[must_use = "builder methods return a new value"]
    pub fn sinks(mut self, sinks: impl IntoIterator<Item = Arc<dyn Sink>>) -> Self {
        self.sinks.extend(sinks);
        self
    }

    /// Deliver from a worker thread through a queue of `capacity` records
    ///
    /// If not called, the engine delivers synchronously.
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, capacity: usize) -> Self {
        self.async_capacity = Some(capacity);
        self
    }

    /// Build the Engine
    ///
    /// Falls back to synchronous delivery if the worker thread cannot be
    /// started.
    pub fn build(self) -> Engine {
        let consumer: Box<dyn Consumer> = match self.async_capacity {
            Some(capacity) => match AsyncConsumer::new(self.sinks.clone(), capacity) {
                Ok(consumer) => Box::new(consumer),
                Err(e) => {
                    eprintln!(
                        "[SIMPLELOG WARNING] Tag '{}' falls back to synchronous delivery: {}",
                        self.tag, e
                    );
                    Box::new(SyncConsumer::new(self.sinks.clone()))
                }
            },
            None => Box::new(SyncConsumer::new(self.sinks.clone())),
        };

        Engine {
            tag: self.tag,
            level: self.level,
            formatter: self
                .formatter
                .unwrap_or_else(|| Arc::new(DefaultFormatter::new())),
            sinks: self.sinks,
            consumer,
            consume_lock: Mutex::new(()),
        }
    }
}
