//! Countdown for time-limit sessions.
//!
//! The countdown is a deadline fixed at session start. Remaining time is
//! always derived from a [`Clock`], never decremented, so a late or missed
//! tick cannot drift it.

use chrono::{DateTime, Duration, Utc};
use multiplicathlon_core::clock::{Clock, seconds_until};

/// A fixed deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    deadline: DateTime<Utc>,
}

impl Countdown {
    /// A countdown ending `seconds` after the clock's current time.
    #[must_use]
    pub fn start(clock: &dyn Clock, seconds: i64) -> Self {
        Self {
            deadline: clock.now() + Duration::seconds(seconds),
        }
    }

    /// A countdown ending at `deadline`.
    #[must_use]
    pub fn until(deadline: DateTime<Utc>) -> Self {
        Self { deadline }
    }

    #[must_use]
    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Whole seconds left, zero once expired.
    #[must_use]
    pub fn remaining_seconds(&self, clock: &dyn Clock) -> u64 {
        seconds_until(clock.now(), self.deadline)
    }

    /// Whether the deadline has been reached.
    #[must_use]
    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        clock.now() >= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use multiplicathlon_test_support::ManualClock;

    use super::*;

    #[test]
    fn test_countdown_counts_down_and_expires() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let countdown = Countdown::start(&clock, 60);
        assert_eq!(countdown.remaining_seconds(&clock), 60);
        assert!(!countdown.is_expired(&clock));

        clock.advance_seconds(59);
        assert_eq!(countdown.remaining_seconds(&clock), 1);
        assert!(!countdown.is_expired(&clock));

        clock.advance_seconds(1);
        assert_eq!(countdown.remaining_seconds(&clock), 0);
        assert!(countdown.is_expired(&clock));

        clock.advance_seconds(30);
        assert_eq!(countdown.remaining_seconds(&clock), 0);
    }
}
