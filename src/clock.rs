//! Wall clock that never runs backwards within a process.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out millisecond-precision UTC timestamps that are non-decreasing
/// across calls, even if the system clock is stepped back.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_millis: AtomicI64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.observe(Utc::now())
    }

    /// Clamp a wall-clock reading to the latest timestamp already issued.
    pub fn observe(&self, wall: DateTime<Utc>) -> DateTime<Utc> {
        let wall_millis = wall.timestamp_millis();
        let previous = self.last_millis.fetch_max(wall_millis, Ordering::AcqRel);
        let millis = previous.max(wall_millis);

        DateTime::from_timestamp_millis(millis).unwrap_or(wall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let later = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 11, 59, 0).unwrap();

        assert_eq!(clock.observe(later), later);
        assert_eq!(clock.observe(earlier), later);
        assert!(clock.observe(later + chrono::Duration::seconds(1)) > later);
    }

    #[test]
    fn test_clock_truncates_to_millis() {
        let clock = MonotonicClock::new();
        let wall = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();

        assert_eq!(clock.observe(wall).timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn test_successive_readings_are_ordered() {
        let clock = MonotonicClock::new();
        let mut last = clock.now();
        for _ in 0..1000 {
            let next = clock.now();
            assert!(next >= last);
            last = next;
        }
    }
}
