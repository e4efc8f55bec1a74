//! Naive (time-zone-less) wall-clock timestamps and Gregorian calendar math.
//!
//! All timeline arithmetic is done in epoch seconds since 1970-01-01T00:00:00,
//! with day/month/year decomposition delegated to the vendored
//! [`date_equations`] crate. Construction validates the calendar date with
//! `icu_calendar`, the same boundary check the teacher applies via
//! `IsoDate::as_icu4x`.

use std::fmt;

use icu_calendar::{Date as IcuDate, Iso};

use crate::error::WorkcalError;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// A naive (zone-less) wall-clock instant, stored as whole seconds elapsed
/// since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    epoch_seconds: i64,
}

impl Timestamp {
    /// Builds a timestamp from a calendar date and time of day, validating
    /// the date against `icu_calendar::Date<Iso>` exactly as the teacher's
    /// `IsoDate::as_icu4x` does.
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, WorkcalError> {
        IcuDate::try_new_iso_date(year, month, day)
            .map_err(|e| WorkcalError::invalid_arguments().with_message(e.to_string()))?;
        if hour > 23 || minute > 59 || second > 59 {
            return Err(WorkcalError::invalid_arguments()
                .with_message(format!("invalid time of day {hour:02}:{minute:02}:{second:02}")));
        }
        let days = date_equations::gregorian::epoch_days_from_gregorian_date(
            year,
            i32::from(month),
            i32::from(day),
        );
        let seconds_of_day =
            i64::from(hour) * SECONDS_PER_HOUR + i64::from(minute) * SECONDS_PER_MINUTE + i64::from(second);
        Ok(Self {
            epoch_seconds: i64::from(days) * SECONDS_PER_DAY + seconds_of_day,
        })
    }

    /// Builds a timestamp directly from the day-granular epoch-day count,
    /// with a zero time of day.
    #[must_use]
    pub fn from_epoch_days(epoch_days: i32) -> Self {
        Self {
            epoch_seconds: i64::from(epoch_days) * SECONDS_PER_DAY,
        }
    }

    /// Builds a timestamp directly from whole seconds elapsed since the
    /// Unix epoch.
    #[must_use]
    pub const fn from_epoch_seconds(epoch_seconds: i64) -> Self {
        Self { epoch_seconds }
    }

    /// Whole seconds elapsed since the Unix epoch.
    #[must_use]
    pub const fn epoch_seconds(self) -> i64 {
        self.epoch_seconds
    }

    /// The epoch-day this timestamp falls on (truncating toward negative
    /// infinity, so a timestamp at any time of day on a date belongs to
    /// that date's epoch day).
    #[must_use]
    pub fn epoch_day(self) -> i32 {
        self.epoch_seconds.div_euclid(SECONDS_PER_DAY) as i32
    }

    /// Seconds elapsed since local midnight.
    #[must_use]
    pub fn seconds_of_day(self) -> i64 {
        self.epoch_seconds.rem_euclid(SECONDS_PER_DAY)
    }

    /// Decomposes into `(year, month, day)`.
    #[must_use]
    pub fn date(self) -> (i32, u8, u8) {
        date_equations::gregorian::ymd_from_epoch_days(self.epoch_day())
    }

    /// Decomposes into `(hour, minute, second)`.
    #[must_use]
    pub fn time_of_day(self) -> (u8, u8, u8) {
        let s = self.seconds_of_day();
        (
            (s / SECONDS_PER_HOUR) as u8,
            (s % SECONDS_PER_HOUR / SECONDS_PER_MINUTE) as u8,
            (s % SECONDS_PER_MINUTE) as u8,
        )
    }

    /// Truncates to local midnight of the same day.
    #[must_use]
    pub fn start_of_day(self) -> Self {
        Self::from_epoch_days(self.epoch_day())
    }

    /// Day-of-week, Monday = 1 .. Sunday = 7 (ISO 8601 numbering), used
    /// throughout `nth_weekday_of_month` anchor resolution.
    #[must_use]
    pub fn iso_weekday(self) -> u8 {
        weekday_mon1_sun7(self.epoch_day())
    }

    /// Adds a duration given in whole seconds.
    #[must_use]
    pub fn add_seconds(self, seconds: i64) -> Self {
        Self {
            epoch_seconds: self.epoch_seconds + seconds,
        }
    }

    /// Adds a duration given in whole days, preserving time of day.
    #[must_use]
    pub fn add_days(self, days: i32) -> Self {
        self.add_seconds(i64::from(days) * SECONDS_PER_DAY)
    }
}

impl fmt::Display for Timestamp {
    /// Renders as `YYYY-MM-DDTHH:MM:SS`, the form every diagnostic message
    /// and `Timeboard::compact_str`-equivalent uses to name a timestamp.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.date();
        let (hour, minute, second) = self.time_of_day();
        write!(f, "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}")
    }
}

/// Day-of-week for an epoch-day count, Monday = 1 .. Sunday = 7.
///
/// 1970-01-01 (epoch day 0) was a Thursday, so `(epoch_days + 3) mod 7`
/// gives a 0-based Monday-start index; `+1` shifts it to the 1..7 range
/// `nth_weekday_of_month` expects.
#[must_use]
pub fn weekday_mon1_sun7(epoch_days: i32) -> u8 {
    (i64::from(epoch_days) + 3).rem_euclid(7) as u8 + 1
}

/// Whether `year` is a Gregorian leap year.
#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `(year, month)`, `month` 1-based.
#[must_use]
pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => unreachable!("month must be 1..=12"),
    }
}
