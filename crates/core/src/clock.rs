//! Injected time source.
//!
//! Date validation and audit stamps read the clock through this trait so
//! they stay deterministic under test.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current date and time.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar date (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock frozen at noon UTC on `date`.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default();
        Self(noon.and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_today() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_clock_by_reference() {
        fn today_of(clock: impl Clock) -> NaiveDate {
            clock.today()
        }
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(today_of(&clock), date);
    }
}
