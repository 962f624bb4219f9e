//! Asynchronous consumption on a dedicated worker thread
//!
//! Producers append `(level, bytes)` pairs to a bounded pending buffer under a
//! mutex. The worker swaps that buffer with its own (empty) working buffer,
//! so the producer-side critical section stays O(1), then delivers the batch
//! outside the lock.
//!
//! When the pending buffer is full the record is dropped and a sticky
//! overflow flag is set; the next worker cycle reports it with a single
//! synthetic warning line. Producers never block on a slow sink.

use super::consumer::{deliver_to_sinks, flush_sinks, Consumer};
use super::error::{LoggerError, Result};
use super::formatter::LINE_ENDING;
use super::log_level::LogLevel;
use super::metrics::EngineMetrics;
use super::sink::Sink;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default bound of the pending queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 16384;

/// How long `flush` waits for an acknowledgement before re-signalling
pub const FLUSH_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Pause after a cycle that finished in under this duration
pub const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Line emitted once after records were dropped
pub const OVERFLOW_MESSAGE: &str = "ERROR: Log overflow!";

type QueuedRecord = (LogLevel, Vec<u8>);

struct QueueState {
    pending: Vec<QueuedRecord>,
    overflow: bool,
    running: bool,
    /// Last flush ticket handed out
    flush_requested: u64,
    /// Last flush ticket whose sinks were flushed
    flush_completed: u64,
}

impl QueueState {
    fn has_work(&self) -> bool {
        !self.pending.is_empty() || self.overflow || self.flush_requested > self.flush_completed
    }
}

struct Shared {
    state: Mutex<QueueState>,
    /// Work, flush request, or shutdown
    work: Condvar,
    /// Flush acknowledgement
    ack: Condvar,
    sinks: Vec<Arc<dyn Sink>>,
    capacity: usize,
    metrics: EngineMetrics,
}

pub struct AsyncConsumer {
    shared: Arc<Shared>,
    worker: Option<thread::JoinHandle<()>>,
}

impl AsyncConsumer {
    /// Start the worker thread. A zero capacity is raised to one.
    pub fn new(sinks: Vec<Arc<dyn Sink>>, capacity: usize) -> Result<Self> {
        let capacity = capacity.max(1);
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState {
                pending: Vec::new(),
                overflow: false,
                running: true,
                flush_requested: 0,
                flush_completed: 0,
            }),
            work: Condvar::new(),
            ack: Condvar::new(),
            sinks,
            capacity,
            metrics: EngineMetrics::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("simplelog-async".to_string())
            .spawn(move || Self::run(worker_shared))
            .map_err(|e| {
                LoggerError::io_operation("spawning async worker", "thread creation failed", e)
            })?;

        Ok(Self {
            shared,
            worker: Some(handle),
        })
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Records waiting for the next worker cycle
    pub fn pending(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    fn run(shared: Arc<Shared>) {
        let mut working: Vec<QueuedRecord> = Vec::new();

        loop {
            let (overflow, flush_ticket) = {
                let mut state = shared.state.lock();
                while state.running && !state.has_work() {
                    shared.work.wait(&mut state);
                }
                if !state.running {
                    break;
                }

                std::mem::swap(&mut state.pending, &mut working);
                let overflow = std::mem::take(&mut state.overflow);
                // Captured with the swap: every record consumed before this
                // ticket was issued is in `working` or already delivered.
                let ticket = (state.flush_requested > state.flush_completed)
                    .then_some(state.flush_requested);
                (overflow, ticket)
            };

            let begin = Instant::now();

            for (level, bytes) in working.drain(..) {
                deliver_to_sinks(&shared.sinks, level, &bytes, &shared.metrics);
                shared.metrics.record_delivered();
            }

            if overflow {
                let mut line = Vec::with_capacity(OVERFLOW_MESSAGE.len() + LINE_ENDING.len());
                line.extend_from_slice(OVERFLOW_MESSAGE.as_bytes());
                line.extend_from_slice(LINE_ENDING);
                deliver_to_sinks(&shared.sinks, LogLevel::Warning, &line, &shared.metrics);
                shared.metrics.record_overflow_notice();
            }

            if let Some(ticket) = flush_ticket {
                flush_sinks(&shared.sinks, &shared.metrics);
                let mut state = shared.state.lock();
                state.flush_completed = state.flush_completed.max(ticket);
                shared.ack.notify_all();
            }

            // Let producers fill the queue instead of spinning on tiny batches
            if begin.elapsed() < IDLE_SLEEP {
                thread::sleep(IDLE_SLEEP);
            }
        }
    }
}

impl Consumer for AsyncConsumer {
    fn consume(&self, level: LogLevel, bytes: Vec<u8>) {
        let mut state = self.shared.state.lock();
        if !state.running {
            return;
        }
        if state.pending.len() >= self.shared.capacity {
            state.overflow = true;
            self.shared.metrics.record_dropped();
        } else {
            state.pending.push((level, bytes));
        }
        self.shared.work.notify_one();
    }

    fn flush(&self) {
        let mut state = self.shared.state.lock();
        if !state.running {
            return;
        }
        state.flush_requested += 1;
        let ticket = state.flush_requested;
        self.shared.work.notify_one();

        while state.running && state.flush_completed < ticket {
            let result = self.shared.ack.wait_for(&mut state, FLUSH_RETRY_INTERVAL);
            if result.timed_out() {
                self.shared.work.notify_one();
            }
        }
    }

    fn metrics(&self) -> &EngineMetrics {
        &self.shared.metrics
    }

    fn is_async(&self) -> bool {
        true
    }
}

impl Drop for AsyncConsumer {
    /// Stops the worker; records still queued are discarded.
    fn drop(&mut self) {
        self.shared.state.lock().running = false;
        self.shared.work.notify_all();
        self.shared.ack.notify_all();

        if let Some(handle) = self.worker.take() {
            if let Err(e) = handle.join() {
                eprintln!(
                    "[SIMPLELOG ERROR] Async worker thread panicked during shutdown: {:?}",
                    e
                );
            }
        }
    }
}
