//! Calendar frequencies: pandas-style period descriptors (`D`, `H`, `3H`,
//! `W-MON`, `A-MAR`, `M`, ...) with period containment, super/sub-period
//! comparison, and period arithmetic.

use std::fmt;
use std::str::FromStr;

use crate::civil::{self, Timestamp};
use crate::error::WorkcalError;

/// The base unit a [`CalendarFreq`] counts in, before applying its
/// multiplier and anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseUnit {
    /// Minute (`T`, `min`).
    Minute,
    /// Hour (`H`).
    Hour,
    /// Calendar day (`D`).
    Day,
    /// Seven-day week, anchored on the weekday the week ends on (`W`).
    Week,
    /// Calendar month (`M`).
    Month,
    /// Calendar quarter, anchored on the month it starts in (`Q`).
    Quarter,
    /// Calendar year, anchored on the month it ends in (`A`, `Y`).
    Year,
}

impl BaseUnit {
    /// Rank in the super/sub-period ordering; a higher rank is never a
    /// sub-period of a lower one unless they share a common calendar
    /// grid, which [`CalendarFreq::is_superperiod_of`] checks precisely.
    fn rank(self) -> u8 {
        match self {
            BaseUnit::Minute => 0,
            BaseUnit::Hour => 1,
            BaseUnit::Day => 2,
            BaseUnit::Week => 3,
            BaseUnit::Month => 4,
            BaseUnit::Quarter => 5,
            BaseUnit::Year => 6,
        }
    }

    /// Fixed duration in seconds, for the bases whose period length never
    /// varies with the calendar (`Minute`, `Hour`, `Day`, `Week`).
    fn fixed_seconds(self) -> Option<i64> {
        match self {
            BaseUnit::Minute => Some(60),
            BaseUnit::Hour => Some(3_600),
            BaseUnit::Day => Some(86_400),
            BaseUnit::Week => Some(604_800),
            BaseUnit::Month | BaseUnit::Quarter | BaseUnit::Year => None,
        }
    }
}

/// A parsed calendar frequency: a multiplier over a [`BaseUnit`], with an
/// optional anchor disambiguating where weekly/quarterly/yearly periods
/// start or end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarFreq {
    base: BaseUnit,
    multiplier: u32,
    /// For `Week`: ISO weekday (1=Mon..7=Sun) the week ends on.
    /// For `Quarter`/`Year`: month (1..12) the first quarter/the year
    /// ends in.
    /// Unused for `Minute`/`Hour`/`Day`/`Month`.
    anchor: u8,
}

/// A half-open `[start, end)` calendar period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Error returned by [`CalendarFreq::parse`] / [`FromStr`].
#[derive(Debug, Clone, Copy)]
pub struct ParseCalendarFreqError;

impl fmt::Display for ParseCalendarFreqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string is not a valid calendar frequency")
    }
}

const WEEKDAY_NAMES: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];
const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

impl CalendarFreq {
    /// Parses `N<base>` or `N<base>-<anchor>`, per `spec.md` §4.1.
    pub fn parse(s: &str) -> Result<Self, WorkcalError> {
        s.parse().map_err(|_: ParseCalendarFreqError| {
            WorkcalError::invalid_frequency().with_message(format!("{s:?} is not a valid frequency"))
        })
    }

    /// Builds a frequency directly, bypassing string parsing.
    pub fn new(base: BaseUnit, multiplier: u32, anchor: u8) -> Result<Self, WorkcalError> {
        if multiplier == 0 {
            return Err(WorkcalError::invalid_frequency().with_message("multiplier must be >= 1"));
        }
        match base {
            BaseUnit::Week if !(1..=7).contains(&anchor) => {
                Err(WorkcalError::invalid_frequency().with_message("week anchor must be 1..=7"))
            }
            BaseUnit::Quarter | BaseUnit::Year if !(1..=12).contains(&anchor) => Err(
                WorkcalError::invalid_frequency().with_message("anchor month must be 1..=12"),
            ),
            _ => Ok(Self {
                base,
                multiplier,
                anchor,
            }),
        }
    }

    #[must_use]
    pub fn base(self) -> BaseUnit {
        self.base
    }

    #[must_use]
    pub fn multiplier(self) -> u32 {
        self.multiplier
    }

    /// The calendar period containing `ts`.
    pub fn period_containing(self, ts: Timestamp) -> Result<Period, WorkcalError> {
        match self.base {
            BaseUnit::Minute | BaseUnit::Hour | BaseUnit::Day | BaseUnit::Week => {
                self.fixed_period_containing(ts)
            }
            BaseUnit::Month => Ok(self.month_period_containing(ts, self.multiplier)),
            BaseUnit::Quarter => Ok(self.quarter_period_containing(ts)),
            BaseUnit::Year => Ok(self.year_period_containing(ts)),
        }
    }

    fn fixed_period_containing(self, ts: Timestamp) -> Result<Period, WorkcalError> {
        let unit_seconds = self
            .base
            .fixed_seconds()
            .expect("fixed_period_containing only called for fixed-length bases");
        if self.base == BaseUnit::Week {
            // Anchor: week ends on `self.anchor`'s weekday at day boundary.
            let day_ts = ts.start_of_day();
            let weekday = day_ts.iso_weekday(); // 1..7
            let days_until_anchor = (i64::from(self.anchor) - i64::from(weekday)).rem_euclid(7);
            let end_day = day_ts.add_days(days_until_anchor as i32 + 1);
            let span_days = self.multiplier as i64 * 7;
            let start = end_day.add_days(-(span_days as i32));
            return Ok(Period {
                start,
                end: end_day,
            });
        }
        let step = unit_seconds * i64::from(self.multiplier);
        let epoch = ts.epoch_seconds();
        let start_epoch = epoch.div_euclid(step) * step;
        Ok(Period {
            start: Timestamp::from_epoch_seconds(start_epoch),
            end: Timestamp::from_epoch_seconds(start_epoch + step),
        })
    }

    fn month_period_containing(self, ts: Timestamp, multiplier: u32) -> Period {
        let (year, month, _) = ts.date();
        let zero_based = i64::from(year) * 12 + i64::from(month) - 1;
        let step = i64::from(multiplier);
        let start_zero_based = zero_based.div_euclid(step) * step;
        let start = month_start(start_zero_based);
        let end = month_start(start_zero_based + step);
        Period { start, end }
    }

    fn quarter_period_containing(self, ts: Timestamp) -> Period {
        // Quarters of 3 months each, with the first quarter starting in
        // `self.anchor`. Find the start month of the quarter containing `ts`.
        let (year, month, _) = ts.date();
        let anchor = i64::from(self.anchor);
        let zero_based_month = i64::from(year) * 12 + i64::from(month) - 1;
        let anchor_zero_based = anchor - 1;
        let offset = (zero_based_month - anchor_zero_based).rem_euclid(3);
        let quarter_start_zero_based = zero_based_month - offset;
        let step = 3 * i64::from(self.multiplier);
        let start = month_start(quarter_start_zero_based);
        let end = month_start(quarter_start_zero_based + step);
        Period { start, end }
    }

    fn year_period_containing(self, ts: Timestamp) -> Period {
        // A year ending in `self.anchor` (month) runs from the first day of
        // the month after `self.anchor` through the last day of `self.anchor`
        // the following year.
        let (year, month, _) = ts.date();
        let anchor = i64::from(self.anchor);
        let end_year = if i64::from(month) <= anchor {
            i64::from(year)
        } else {
            i64::from(year) + 1
        };
        let end_zero_based = end_year * 12 + anchor; // month after anchor, year end_year
        let step = 12 * i64::from(self.multiplier);
        let start = month_start(end_zero_based - step);
        let end = month_start(end_zero_based);
        Period { start, end }
    }

    /// The start of the period immediately following the period containing
    /// `ts`.
    pub fn add(self, ts: Timestamp, n: i64) -> Result<Timestamp, WorkcalError> {
        let period = self.period_containing(ts)?;
        if n == 0 {
            return Ok(period.start);
        }
        match self.base {
            BaseUnit::Minute | BaseUnit::Hour | BaseUnit::Day | BaseUnit::Week => {
                let unit_seconds = self.base.fixed_seconds().expect("fixed base");
                let step = unit_seconds * i64::from(self.multiplier);
                Ok(Timestamp::from_epoch_seconds(
                    period.start.epoch_seconds() + step * n,
                ))
            }
            BaseUnit::Month => {
                let (year, month, _) = period.start.date();
                let zero_based = i64::from(year) * 12 + i64::from(month) - 1;
                let step = i64::from(self.multiplier);
                Ok(month_start(zero_based + step * n))
            }
            BaseUnit::Quarter => {
                let (year, month, _) = period.start.date();
                let zero_based = i64::from(year) * 12 + i64::from(month) - 1;
                let step = 3 * i64::from(self.multiplier);
                Ok(month_start(zero_based + step * n))
            }
            BaseUnit::Year => {
                let (year, month, _) = period.start.date();
                let zero_based = i64::from(year) * 12 + i64::from(month) - 1;
                let step = 12 * i64::from(self.multiplier);
                Ok(month_start(zero_based + step * n))
            }
        }
    }

    /// Whether every period of `self` is a disjoint union of whole periods
    /// of `other`. Multiplied frequencies (`N > 1` on either side) only
    /// relate if equal.
    #[must_use]
    pub fn is_superperiod_of(self, other: CalendarFreq) -> bool {
        if self == other {
            return true;
        }
        if self.multiplier != 1 || other.multiplier != 1 {
            return false;
        }
        match (self.base, other.base) {
            (BaseUnit::Day, BaseUnit::Hour | BaseUnit::Minute) => true,
            (BaseUnit::Hour, BaseUnit::Minute) => true,
            (BaseUnit::Week, BaseUnit::Day | BaseUnit::Hour | BaseUnit::Minute) => true,
            (BaseUnit::Month, BaseUnit::Day | BaseUnit::Hour | BaseUnit::Minute) => true,
            (BaseUnit::Quarter, BaseUnit::Month) => true,
            (BaseUnit::Quarter, BaseUnit::Day | BaseUnit::Hour | BaseUnit::Minute) => true,
            (BaseUnit::Year, BaseUnit::Month | BaseUnit::Quarter) => true,
            (BaseUnit::Year, BaseUnit::Day | BaseUnit::Hour | BaseUnit::Minute) => true,
            _ => false,
        }
    }

    /// Enumerates the sequence of periods of `self` intersecting
    /// `[range_start, range_end]` (both treated as instants, inclusive).
    /// Used by `Marker` partitioning to walk a frame's structural periods.
    pub fn periods_intersecting(
        self,
        range_start: Timestamp,
        range_end: Timestamp,
    ) -> Result<Vec<Period>, WorkcalError> {
        let mut periods = Vec::new();
        let mut current = self.period_containing(range_start)?;
        loop {
            periods.push(current);
            if current.end > range_end {
                break;
            }
            let next_start = current.end;
            current = self.period_containing(next_start)?;
        }
        Ok(periods)
    }
}

/// `zero_based` is months elapsed since year 0 month 1 (`year * 12 + month - 1`).
fn month_start(zero_based: i64) -> Timestamp {
    let year = zero_based.div_euclid(12) as i32;
    let month = (zero_based.rem_euclid(12) + 1) as u8;
    Timestamp::from_epoch_days(date_equations::gregorian::epoch_days_from_gregorian_date(
        year,
        i32::from(month),
        1,
    ))
}

impl FromStr for CalendarFreq {
    type Err = ParseCalendarFreqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num_part, rest) = split_leading_digits(s);
        let multiplier: u32 = if num_part.is_empty() {
            1
        } else {
            num_part.parse().map_err(|_| ParseCalendarFreqError)?
        };

        let (base_part, anchor_part) = match rest.split_once('-') {
            Some((b, a)) => (b, Some(a)),
            None => (rest, None),
        };

        let base = match base_part {
            "T" | "min" => BaseUnit::Minute,
            "H" => BaseUnit::Hour,
            "D" => BaseUnit::Day,
            "W" => BaseUnit::Week,
            "M" => BaseUnit::Month,
            "Q" => BaseUnit::Quarter,
            "A" | "Y" => BaseUnit::Year,
            _ => return Err(ParseCalendarFreqError),
        };

        let anchor = match (base, anchor_part) {
            (BaseUnit::Week, Some(a)) => weekday_index(a).ok_or(ParseCalendarFreqError)?,
            (BaseUnit::Week, None) => 7, // default: week ends Sunday
            (BaseUnit::Quarter | BaseUnit::Year, Some(a)) => {
                month_index(a).ok_or(ParseCalendarFreqError)?
            }
            (BaseUnit::Quarter, None) => 1, // default: quarters start in January
            (BaseUnit::Year, None) => 12,   // default: calendar year ending December
            _ => 0,
        };

        CalendarFreq::new(base, multiplier, anchor).map_err(|_| ParseCalendarFreqError)
    }
}

fn split_leading_digits(s: &str) -> (&str, &str) {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    s.split_at(end)
}

fn weekday_index(name: &str) -> Option<u8> {
    WEEKDAY_NAMES
        .iter()
        .position(|n| *n == name)
        .map(|i| i as u8 + 1)
}

fn month_index(name: &str) -> Option<u8> {
    MONTH_NAMES
        .iter()
        .position(|n| *n == name)
        .map(|i| i as u8 + 1)
}

impl fmt::Display for CalendarFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.multiplier != 1 {
            write!(f, "{}", self.multiplier)?;
        }
        let base = match self.base {
            BaseUnit::Minute => "T",
            BaseUnit::Hour => "H",
            BaseUnit::Day => "D",
            BaseUnit::Week => "W",
            BaseUnit::Month => "M",
            BaseUnit::Quarter => "Q",
            BaseUnit::Year => "A",
        };
        f.write_str(base)?;
        match self.base {
            BaseUnit::Week => write!(f, "-{}", WEEKDAY_NAMES[self.anchor as usize - 1]),
            BaseUnit::Quarter | BaseUnit::Year => {
                write!(f, "-{}", MONTH_NAMES[self.anchor as usize - 1])
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u8, d: u8) -> Timestamp {
        Timestamp::new(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn parses_plain_and_multiplied() {
        let d: CalendarFreq = "D".parse().unwrap();
        assert_eq!(d.base(), BaseUnit::Day);
        assert_eq!(d.multiplier(), 1);

        let three_h: CalendarFreq = "3H".parse().unwrap();
        assert_eq!(three_h.base(), BaseUnit::Hour);
        assert_eq!(three_h.multiplier(), 3);
    }

    #[test]
    fn parses_anchored() {
        let w: CalendarFreq = "W-MON".parse().unwrap();
        assert_eq!(w.base(), BaseUnit::Week);
        assert_eq!(w.to_string(), "W-MON");

        let a: CalendarFreq = "A-MAR".parse().unwrap();
        assert_eq!(a.base(), BaseUnit::Year);
        assert_eq!(a.to_string(), "A-MAR");
    }

    #[test]
    fn rejects_garbage() {
        assert!("Xyz".parse::<CalendarFreq>().is_err());
        assert!(CalendarFreq::parse("0D").is_err());
    }

    #[test]
    fn day_period_containing() {
        let d: CalendarFreq = "D".parse().unwrap();
        let period = d.period_containing(ts(2017, 9, 30)).unwrap();
        assert_eq!(period.start.date(), (2017, 9, 30));
        assert_eq!(period.end.date(), (2017, 10, 1));
    }

    #[test]
    fn month_period_containing() {
        let m: CalendarFreq = "M".parse().unwrap();
        let period = m.period_containing(ts(2017, 9, 30)).unwrap();
        assert_eq!(period.start.date(), (2017, 9, 1));
        assert_eq!(period.end.date(), (2017, 10, 1));
    }

    #[test]
    fn week_period_containing_default_sunday() {
        let w: CalendarFreq = "W".parse().unwrap();
        // 2017-09-30 is a Saturday; week ends next day, Sunday 2017-10-01.
        let period = w.period_containing(ts(2017, 9, 30)).unwrap();
        assert_eq!(period.end.date(), (2017, 10, 2));
        assert_eq!(period.start.date(), (2017, 9, 25));
    }

    #[test]
    fn year_period_containing_calendar_year() {
        let y: CalendarFreq = "A".parse().unwrap();
        let period = y.period_containing(ts(2017, 9, 30)).unwrap();
        assert_eq!(period.start.date(), (2017, 1, 1));
        assert_eq!(period.end.date(), (2018, 1, 1));
    }

    #[test]
    fn year_period_anchored_march() {
        let y: CalendarFreq = "A-MAR".parse().unwrap();
        let period = y.period_containing(ts(2017, 9, 30)).unwrap();
        assert_eq!(period.start.date(), (2017, 4, 1));
        assert_eq!(period.end.date(), (2018, 4, 1));
    }

    #[test]
    fn superperiod_relation() {
        let d: CalendarFreq = "D".parse().unwrap();
        let h: CalendarFreq = "H".parse().unwrap();
        let three_h: CalendarFreq = "3H".parse().unwrap();
        assert!(d.is_superperiod_of(h));
        assert!(!h.is_superperiod_of(d));
        assert!(!d.is_superperiod_of(three_h));
    }

    #[test]
    fn add_steps_months() {
        let m: CalendarFreq = "M".parse().unwrap();
        let next = m.add(ts(2017, 1, 15), 1).unwrap();
        assert_eq!(next.date(), (2017, 2, 1));
        let prev = m.add(ts(2017, 1, 15), -1).unwrap();
        assert_eq!(prev.date(), (2016, 12, 1));
    }
}
