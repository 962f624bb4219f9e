//! Default line formatter
//!
//! Produces `[I][2025-01-08 10:30:45.123][7][Network] message`: level code,
//! local timestamp, thread id, tag, then the message.

use crate::core::{Formatter, LogRecord, Timestamp};
use parking_lot::Mutex;
use std::fmt::Write;

pub const DEFAULT_FORMATTER_NAME: &str = "Default";

/// Timestamp strings rebuilt only when the second or millisecond changes
#[derive(Default)]
struct TimestampCache {
    second_key: Option<(i32, u32, u32, u32, u32, u32)>,
    seconds: String,
    millisecond: Option<u32>,
    milliseconds: String,
}

impl TimestampCache {
    fn update(&mut self, ts: &Timestamp) {
        let key = ts.second_key();
        if self.second_key != Some(key) {
            self.second_key = Some(key);
            self.seconds.clear();
            let _ = write!(
                self.seconds,
                "[{:04}-{:02}-{:02} {:02}:{:02}:{:02}.",
                ts.year, ts.month, ts.day, ts.hour, ts.minute, ts.second
            );
        }
        if self.millisecond != Some(ts.millisecond) {
            self.millisecond = Some(ts.millisecond);
            self.milliseconds.clear();
            let _ = write!(self.milliseconds, "{:03}]", ts.millisecond);
        }
    }
}

#[derive(Default)]
pub struct DefaultFormatter {
    cache: Mutex<TimestampCache>,
}

impl DefaultFormatter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Formatter for DefaultFormatter {
    fn format(&self, record: &LogRecord<'_>) -> Vec<u8> {
        let mut out = String::with_capacity(48 + record.tag.len() + record.message.len());
        out.push('[');
        out.push(record.level.to_char());
        out.push(']');

        {
            let mut cache = self.cache.lock();
            cache.update(&record.timestamp);
            out.push_str(&cache.seconds);
            out.push_str(&cache.milliseconds);
        }

        let _ = write!(out, "[{}][{}] ", record.thread_id, record.tag);
        out.push_str(record.message);
        out.into_bytes()
    }

    fn name(&self) -> &str {
        DEFAULT_FORMATTER_NAME
    }
}
