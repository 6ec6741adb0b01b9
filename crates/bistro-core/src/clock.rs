//! Wall-clock access.
//!
//! The engine only reads time through [`Clock`], so tests can pin the hour and
//! step across midnight.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;

    /// Offset of local time from UTC in minutes.
    fn utc_offset_minutes(&self) -> i32 {
        0
    }

    fn local_millis(&self) -> i64 {
        self.now_millis() + self.utc_offset_minutes() as i64 * MS_PER_MINUTE
    }

    /// Local hour (0-23) and minute.
    fn local_hour_minute(&self) -> (u32, u32) {
        let in_day = self.local_millis().rem_euclid(MS_PER_DAY);
        ((in_day / MS_PER_HOUR) as u32, ((in_day % MS_PER_HOUR) / MS_PER_MINUTE) as u32)
    }
}

/// Local calendar day number of an epoch timestamp.
pub fn calendar_day(epoch_ms: i64, utc_offset_minutes: i32) -> i64 {
    (epoch_ms + utc_offset_minutes as i64 * MS_PER_MINUTE).div_euclid(MS_PER_DAY)
}

/// The real clock.
///
/// The default offset is zero, which puts the day rollover and the day/night
/// palette on UTC. Hosts outside UTC must set `utc_offset_minutes` to the
/// player's local offset, e.g. with [`SystemClock::with_offset`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pub utc_offset_minutes: i32,
}

impl SystemClock {
    pub fn with_offset(minutes: i32) -> Self {
        Self { utc_offset_minutes: minutes }
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }

    fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
    offset_minutes: i32,
}

impl ManualClock {
    pub fn new(epoch_ms: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(epoch_ms)),
            offset_minutes: 0,
        }
    }

    pub fn with_offset(mut self, minutes: i32) -> Self {
        self.offset_minutes = minutes;
        self
    }

    pub fn set(&self, epoch_ms: i64) {
        self.millis.store(epoch_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: i64) {
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }

    fn utc_offset_minutes(&self) -> i32 {
        self.offset_minutes
    }
}
