//! Clock abstraction for determinism.
//!
//! The session countdown reads the time only through a [`Clock`], so a test
//! can freeze or step time instead of sleeping.

use chrono::{DateTime, Utc};

/// Abstraction over system time for deterministic behavior.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Whole seconds left between `now` and `deadline`, never negative.
#[must_use]
pub fn seconds_until(now: DateTime<Utc>, deadline: DateTime<Utc>) -> u64 {
    u64::try_from((deadline - now).num_seconds()).unwrap_or(0)
}
