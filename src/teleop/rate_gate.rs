//! # Rate Gate
//!
//! Minimum-interval throttle shared by every axis of one controller. Calls
//! that arrive inside the dead interval are dropped, never queued.

use std::time::{Duration, Instant};

/// Default minimum spacing between accepted updates.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(50);

/// Monotonic millisecond time source.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed epoch. Never decreases.
    fn now_ms(&self) -> u64;
}

/// [`Clock`] backed by [`Instant`], with its epoch at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Accepts at most one update per interval.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use robot_teleop::teleop::RateGate;
///
/// let mut gate = RateGate::new(Duration::from_millis(50));
/// assert!(gate.try_accept(1_000));
/// assert!(!gate.try_accept(1_049));
/// assert!(gate.try_accept(1_050));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateGate {
    interval_ms: u64,
    last_accepted: Option<u64>,
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_INTERVAL)
    }
}

impl RateGate {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            last_accepted: None,
        }
    }

    /// Accepts `now_ms` if at least one interval has passed since the last
    /// accepted time, recording it as the new baseline.
    ///
    /// The first call on a fresh gate is always accepted. A rejected call
    /// leaves the gate untouched.
    pub fn try_accept(&mut self, now_ms: u64) -> bool {
        let ready = match self.last_accepted {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        };
        if ready {
            self.last_accepted = Some(now_ms);
        }
        ready
    }

    /// Timestamp of the last accepted update.
    #[must_use]
    pub fn last_accepted(&self) -> Option<u64> {
        self.last_accepted
    }

    /// The configured interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Hand-advanced clock. Clones share the same time.
    #[derive(Debug, Clone, Default)]
    pub struct ManualClock {
        now: Rc<Cell<u64>>,
    }

    impl ManualClock {
        pub fn new(start_ms: u64) -> Self {
            Self {
                now: Rc::new(Cell::new(start_ms)),
            }
        }

        pub fn advance(&self, ms: u64) {
            self.now.set(self.now.get() + ms);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.now.get()
        }
    }
}
