//! Core engine types and traits

pub mod async_consumer;
pub mod consumer;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod log_level;
pub mod log_record;
pub mod metrics;
pub mod registry;
pub mod sink;
pub mod timestamp;

pub use async_consumer::{AsyncConsumer, DEFAULT_QUEUE_CAPACITY, OVERFLOW_MESSAGE};
pub use consumer::{Consumer, SyncConsumer};
pub use engine::{Engine, EngineBuilder};
pub use error::{LoggerError, Result};
pub use formatter::{Formatter, FormatterFactory, LINE_ENDING};
pub use log_level::{LogLevel, STATIC_MAX_LEVEL};
pub use log_record::{LogRecord, SourceLocation};
pub use metrics::EngineMetrics;
pub use registry::{Registry, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
pub use sink::{Sink, SinkFactory};
pub use timestamp::{current_thread_id, Timestamp};
