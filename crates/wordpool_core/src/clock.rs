//! Wall-clock port.
//!
//! Reminder hours are local wall-clock hours, so the clock hands out a
//! timestamp that carries its UTC offset and knows how to place a local
//! wall-clock time in its own time zone.

use chrono::{DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDateTime, TimeZone};

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Current time as Unix epoch milliseconds.
    fn epoch_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// Places a local wall-clock time on the timeline.
    ///
    /// The default resolves in the offset of `now()`, which is only right
    /// for clocks without daylight-saving transitions.
    fn resolve_local(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        resolve_in(self.now().offset(), local)
    }
}

/// Reads the host clock in the host time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        resolve_in(&Local, local)
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Resolves `local` in `zone`.
///
/// Ambiguous times (clocks turned back) take the earlier instant; times
/// skipped by a forward transition move one hour later.
pub fn resolve_in<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => Some(at.fixed_offset()),
        LocalResult::None => zone
            .from_local_datetime(&local.checked_add_signed(Duration::hours(1))?)
            .earliest()
            .map(|at| at.fixed_offset()),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_in, Clock, FixedClock};
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    #[test]
    fn fixed_clock_resolves_in_its_own_offset() {
        let offset = FixedOffset::east_opt(3 * 3600).unwrap();
        let clock = FixedClock(offset.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
        let local = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        let resolved = clock.resolve_local(local).unwrap();
        assert_eq!(resolved, offset.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        assert_eq!(resolve_in(&offset, local), Some(resolved));
    }
}
