//! Time domain: injected clock and zone providers, plus the midnight-UTC
//! date snapping that keeps `next_rep` timezone independent.
//!
//! Since the scheduling granularity is days, all cards due on the same day
//! carry the same `next_rep`: midnight UTC of the due date. Local time and
//! the configured day-start hour only come into play when the queue is
//! built, so a card scheduled in one timezone becomes due at the right
//! local hour after moving to another.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};

/// Source of the current wall-clock time as integer POSIX seconds.
pub trait Clock {
    fn now(&self) -> i64;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock whose readings are controlled by the caller; handles are cheap
/// clones sharing the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Moves the clock to an absolute instant.
    pub fn set(&self, now: i64) {
        self.now.set(now);
    }

    /// Advances the clock by the given number of seconds.
    pub fn advance(&self, seconds: i64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.get()
    }
}

/// Resolves timezone questions for a given instant.
pub trait ZoneProvider {
    /// Offset from UTC in seconds east of Greenwich at the given instant.
    /// Providers resolve daylight saving themselves, so the offset may
    /// differ between two instants in the same zone.
    fn utc_offset(&self, at: i64) -> i64;

    /// Local calendar date of the instant, or `None` when the platform
    /// cannot represent it.
    fn local_date(&self, at: i64) -> Option<NaiveDate>;
}

/// Zone provider backed by the process-local timezone.
#[derive(Debug, Default)]
pub struct LocalZone;

impl ZoneProvider for LocalZone {
    fn utc_offset(&self, at: i64) -> i64 {
        chrono::Local
            .timestamp_opt(at, 0)
            .earliest()
            .map_or(0, |local| i64::from(local.offset().local_minus_utc()))
    }

    fn local_date(&self, at: i64) -> Option<NaiveDate> {
        chrono::Local
            .timestamp_opt(at, 0)
            .earliest()
            .map(|local| local.date_naive())
    }
}

/// Zone provider with a constant UTC offset; used in tests and by hosts
/// that pin their zone explicitly.
#[derive(Debug, Clone, Copy)]
pub struct FixedZone {
    offset_seconds: i32,
}

impl FixedZone {
    /// Offset in seconds east of Greenwich; negative values are west.
    #[must_use]
    pub const fn east(offset_seconds: i32) -> Self {
        Self { offset_seconds }
    }

    /// The UTC zone.
    #[must_use]
    pub const fn utc() -> Self {
        Self::east(0)
    }
}

impl ZoneProvider for FixedZone {
    fn utc_offset(&self, _at: i64) -> i64 {
        i64::from(self.offset_seconds)
    }

    fn local_date(&self, at: i64) -> Option<NaiveDate> {
        DateTime::from_timestamp(at + i64::from(self.offset_seconds), 0)
            .map(|utc| utc.date_naive())
    }
}

/// Date substituted when the platform cannot form a local date; some 32-bit
/// C libraries overflow shortly after 2038.
const DATE_OVERFLOW_FALLBACK: i64 = 2_i64.pow(31) - 2;

/// Rounds a timestamp down to a day-resolution value stored in a timezone
/// independent way: the POSIX timestamp of midnight UTC on the local date
/// of the input.
///
/// E.g. a `next_rep` of 2012-01-01 12:14 local time becomes the timestamp
/// of 2012-01-01 00:00 UTC.
///
/// Important: the input must carry the meaning of local time, not UTC, so
/// applying `midnight_utc` to its own output gives unexpected results.
#[must_use]
pub fn midnight_utc(zone: &dyn ZoneProvider, timestamp: i64) -> i64 {
    let date = zone
        .local_date(timestamp)
        .or_else(|| zone.local_date(DATE_OVERFLOW_FALLBACK))
        .unwrap_or_default();
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Records the instant the current card was dealt; grading reads the
/// recorded start as its reference "now" and derives thinking time from it.
#[derive(Debug, Default)]
pub struct Stopwatch {
    start: Option<i64>,
}

impl Stopwatch {
    /// Arms the stopwatch at the given instant.
    pub fn arm(&mut self, at: i64) {
        self.start = Some(at);
    }

    /// The armed instant, if any.
    #[must_use]
    pub fn start_time(&self) -> Option<i64> {
        self.start
    }

    /// Consumes the armed instant.
    pub(crate) fn take(&mut self) -> Option<i64> {
        self.start.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_domain::{DAY, HOUR};

    // 2023-11-14 22:13:20 UTC.
    const T: i64 = 1_700_000_000;

    #[test]
    fn midnight_utc_snaps_to_the_local_date() {
        let zone = FixedZone::utc();
        let midnight = midnight_utc(&zone, T);
        // 2023-11-14 00:00 UTC.
        assert_eq!(midnight, 1_699_920_000);
        assert_eq!(midnight % DAY, 0);
    }

    #[test]
    fn midnight_utc_is_fixed_within_one_local_date() {
        let zone = FixedZone::utc();
        let start_of_day = 1_699_920_000;
        for t in [start_of_day, start_of_day + HOUR, start_of_day + DAY - 1] {
            assert_eq!(midnight_utc(&zone, t), start_of_day);
        }
    }

    #[test]
    fn midnight_utc_follows_the_zone_offset() {
        // 22:13 UTC is already the next day two hours east of Greenwich.
        let east = FixedZone::east(2 * HOUR as i32);
        assert_eq!(midnight_utc(&east, T), 1_700_006_400); // 2023-11-15
        let west = FixedZone::east(-(5 * HOUR as i32));
        assert_eq!(midnight_utc(&west, T), 1_699_920_000); // still 2023-11-14
    }

    #[test]
    fn midnight_utc_is_not_idempotent_away_from_utc() {
        // The output is a UTC instant; re-interpreting it as local time in a
        // west-of-Greenwich zone lands on the previous date.
        let west = FixedZone::east(-(5 * HOUR as i32));
        let once = midnight_utc(&west, T);
        let twice = midnight_utc(&west, once);
        assert_eq!(twice, once - DAY);
    }

    #[test]
    fn manual_clock_handles_share_state() {
        let clock = ManualClock::new(10);
        let handle = clock.clone();
        handle.advance(5);
        assert_eq!(clock.now(), 15);
        clock.set(100);
        assert_eq!(handle.now(), 100);
    }

    #[test]
    fn stopwatch_take_disarms() {
        let mut watch = Stopwatch::default();
        assert_eq!(watch.start_time(), None);
        watch.arm(42);
        assert_eq!(watch.start_time(), Some(42));
        assert_eq!(watch.take(), Some(42));
        assert_eq!(watch.take(), None);
    }
}
