//! Wall-clock and thread identity source
//!
//! Supplies the broken-down local time stamped on every record and a stable
//! numeric identifier for the calling thread.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

/// Broken-down local time, down to the millisecond
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl Timestamp {
    /// Current local time
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
        // Leap seconds are reported as nanosecond values >= 1e9
        let millisecond = (datetime.nanosecond() / 1_000_000).min(999);
        Self {
            year: datetime.year(),
            month: datetime.month(),
            day: datetime.day(),
            hour: datetime.hour(),
            minute: datetime.minute(),
            second: datetime.second(),
            millisecond,
        }
    }

    /// Everything but the millisecond part, used as a cache key by formatters
    #[inline]
    pub fn second_key(&self) -> (i32, u32, u32, u32, u32, u32) {
        (self.year, self.month, self.day, self.hour, self.minute, self.second)
    }
}

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID_CACHE: Cell<u64> = const { Cell::new(0) };
}

/// Stable identifier of the calling thread
///
/// Assigned on first use, starting at 1, and never reused within the process.
pub fn current_thread_id() -> u64 {
    THREAD_ID_CACHE.with(|cache| {
        let id = cache.get();
        if id != 0 {
            return id;
        }
        let id = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
        cache.set(id);
        id
    })
}
