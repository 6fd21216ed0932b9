//! Time source
//!
//! Every timestamp the parking core records comes from a [`Clock`], so tests
//! can pin entry and exit times instead of sleeping.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Source of the current wall-clock time (UTC)
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current instant as whole seconds since the Unix epoch
    fn now_epoch_seconds(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Clock backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
///
/// Second resolution, matching what tickets store.
#[derive(Debug)]
pub struct ManualClock {
    epoch_seconds: AtomicI64,
}

impl ManualClock {
    pub fn new(epoch_seconds: i64) -> Self {
        Self {
            epoch_seconds: AtomicI64::new(epoch_seconds),
        }
    }

    /// Jump to an absolute instant
    pub fn set(&self, epoch_seconds: i64) {
        self.epoch_seconds.store(epoch_seconds, Ordering::SeqCst);
    }

    /// Move forward by `by` (sub-second part is dropped)
    pub fn advance(&self, by: Duration) {
        self.epoch_seconds
            .fetch_add(by.as_secs() as i64, Ordering::SeqCst);
    }

    /// Move backward by `by`; used to simulate clock skew
    pub fn rewind(&self, by: Duration) {
        self.epoch_seconds
            .fetch_sub(by.as_secs() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.epoch_seconds.load(Ordering::SeqCst);
        DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    fn now_epoch_seconds(&self) -> i64 {
        self.epoch_seconds.load(Ordering::SeqCst)
    }
}

/// Convert stored epoch seconds back to a UTC datetime
///
/// Out-of-range values collapse to the Unix epoch.
pub fn from_epoch_seconds(epoch_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch_seconds, 0).unwrap_or(DateTime::UNIX_EPOCH)
}
