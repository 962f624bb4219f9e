//! Consumption strategies: how formatted bytes reach the sinks
//!
//! [`SyncConsumer`] delivers in the calling thread. The asynchronous variant
//! lives in [`super::async_consumer`].

use super::{error::LoggerError, log_level::LogLevel, metrics::EngineMetrics, sink::Sink};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub trait Consumer: Send + Sync {
    /// Hand over one formatted record. Never blocks beyond short mutual
    /// exclusion and never fails.
    fn consume(&self, level: LogLevel, bytes: Vec<u8>);

    /// Block until every record consumed so far reached every sink and every
    /// sink has been flushed.
    fn flush(&self);

    fn metrics(&self) -> &EngineMetrics;

    fn is_async(&self) -> bool {
        false
    }
}

/// Deliver one record to every sink in order
///
/// **Per-sink panic isolation**: each sink call is wrapped in `catch_unwind`,
/// so an erroring or panicking sink does not keep the record from the sinks
/// after it. Returns `true` if every sink accepted the record.
pub(crate) fn deliver_to_sinks(
    sinks: &[Arc<dyn Sink>],
    level: LogLevel,
    bytes: &[u8],
    metrics: &EngineMetrics,
) -> bool {
    let mut all_ok = true;

    for (idx, sink) in sinks.iter().enumerate() {
        let result = catch_unwind(AssertUnwindSafe(|| sink.deliver(level, bytes)));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[SIMPLELOG ERROR] Sink #{} ({}) failed: {}", idx, sink.name(), e);
                metrics.record_sink_failure();
                all_ok = false;
            }
            Err(payload) => {
                let e = LoggerError::sink_panicked(idx, payload.as_ref());
                eprintln!(
                    "[SIMPLELOG CRITICAL] {}. Other sinks continue to function.",
                    e
                );
                metrics.record_sink_failure();
                all_ok = false;
            }
        }
    }

    all_ok
}

/// Flush every sink in order, with the same isolation as delivery
pub(crate) fn flush_sinks(sinks: &[Arc<dyn Sink>], metrics: &EngineMetrics) {
    for (idx, sink) in sinks.iter().enumerate() {
        match catch_unwind(AssertUnwindSafe(|| sink.flush())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!(
                    "[SIMPLELOG ERROR] Sink #{} ({}) flush failed: {}",
                    idx,
                    sink.name(),
                    e
                );
                metrics.record_sink_failure();
            }
            Err(payload) => {
                let e = LoggerError::sink_panicked(idx, payload.as_ref());
                eprintln!("[SIMPLELOG CRITICAL] {} during flush.", e);
                metrics.record_sink_failure();
            }
        }
    }
    metrics.record_flush();
}

/// Inline delivery in the producer thread
pub struct SyncConsumer {
    sinks: Vec<Arc<dyn Sink>>,
    metrics: EngineMetrics,
}

impl SyncConsumer {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            sinks,
            metrics: EngineMetrics::new(),
        }
    }
}

impl Consumer for SyncConsumer {
    fn consume(&self, level: LogLevel, bytes: Vec<u8>) {
        deliver_to_sinks(&self.sinks, level, &bytes, &self.metrics);
        self.metrics.record_delivered();
    }

    fn flush(&self) {
        flush_sinks(&self.sinks, &self.metrics);
    }

    fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }
}
