//! Timestamps and the clock abstraction.
//!
//! Timestamps are Unix epoch seconds (UTC). A timestamp of zero is reserved:
//! the pre-verification ledger treats it as "no record", so clocks used in
//! production must never report the epoch itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    ///
    /// A system clock set before the Unix epoch reads as [`Timestamp::EPOCH`].
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn is_epoch(&self) -> bool {
        self.0 == 0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// This timestamp shifted forward, saturating at `u64::MAX`.
    pub fn saturating_add(&self, secs: u64) -> Timestamp {
        Self(self.0.saturating_add(secs))
    }

    /// Whether `now` lies strictly after this timestamp + `duration_secs`.
    ///
    /// The boundary itself does not count: a window of `w` seconds opened at
    /// `t` is only exceeded from `t + w + 1` onwards.
    pub fn strictly_exceeded(&self, duration_secs: u64, now: Timestamp) -> bool {
        now > self.saturating_add(duration_secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of the current time.
///
/// Readings must be monotonically non-decreasing for a given clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_not_exceeded() {
        let t = Timestamp::new(1000);
        assert!(!t.strictly_exceeded(100, Timestamp::new(1099)));
        assert!(!t.strictly_exceeded(100, Timestamp::new(1100)));
        assert!(t.strictly_exceeded(100, Timestamp::new(1101)));
    }

    #[test]
    fn saturating_window_never_elapses() {
        let t = Timestamp::new(10);
        assert!(!t.strictly_exceeded(u64::MAX, Timestamp::new(u64::MAX)));
    }

    #[test]
    fn elapsed_since_saturates() {
        let t = Timestamp::new(50);
        assert_eq!(t.elapsed_since(Timestamp::new(80)), 30);
        assert_eq!(t.elapsed_since(Timestamp::new(10)), 0);
    }

    #[test]
    fn system_clock_is_past_epoch() {
        assert!(!SystemClock.now().is_epoch());
    }
}
