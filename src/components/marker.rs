//! Markers: declarative descriptions of how to cut a [`Frame`] into
//! [`Subframe`]s, either periodically (by calendar frequency, optionally
//! with anchor offsets) or at an explicit list of timestamps.

use crate::civil::{self, Timestamp};
use crate::components::calendar_freq::CalendarFreq;
use crate::components::frame::Frame;
use crate::easter::{easter, EasterTradition};
use crate::error::WorkcalError;

/// `(first_index, last_index, skip_left, skip_right)` within a parent
/// frame. A negative skip (`None`) means alignment is undefined: no
/// structural anchor could be found on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subframe {
    first_index: usize,
    last_index: usize,
    skip_left: Option<usize>,
    skip_right: Option<usize>,
}

impl Subframe {
    #[must_use]
    pub fn new(first_index: usize, last_index: usize, skip_left: usize, skip_right: usize) -> Self {
        Self {
            first_index,
            last_index,
            skip_left: Some(skip_left),
            skip_right: Some(skip_right),
        }
    }

    #[must_use]
    pub fn with_undefined_skips(first_index: usize, last_index: usize) -> Self {
        Self {
            first_index,
            last_index,
            skip_left: None,
            skip_right: None,
        }
    }

    #[must_use]
    pub fn first_index(&self) -> usize {
        self.first_index
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.last_index
    }

    /// `None` means the skip is undefined (dangling); callers implement
    /// this as phase 0.
    #[must_use]
    pub fn skip_left(&self) -> Option<usize> {
        self.skip_left
    }

    #[must_use]
    pub fn skip_right(&self) -> Option<usize> {
        self.skip_right
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.last_index - self.first_index + 1
    }
}

/// The offsets recognized by a periodic marker's anchor policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorPolicy {
    /// `period.start + {weeks, days, hours, minutes, seconds}`, dropped if
    /// the result lands outside the period.
    FromStartOfEach {
        weeks: i64,
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    /// The `week`-th occurrence of `weekday` in the `month`-th month
    /// counting forward from the period's start (1 = the period's own
    /// first month), shifted by `shift` days.
    NthWeekdayOfMonth {
        month: u8,
        week: i32,
        weekday: u8,
        shift: i64,
    },
    /// Easter Sunday of the period's year (Western tradition), plus `days`.
    FromEasterWestern { days: i64 },
    /// Easter Sunday of the period's year (Orthodox tradition), plus `days`.
    FromEasterOrthodox { days: i64 },
}

impl AnchorPolicy {
    fn candidate(&self, period_start: Timestamp, period_end: Timestamp) -> Option<Timestamp> {
        match *self {
            AnchorPolicy::FromStartOfEach {
                weeks,
                days,
                hours,
                minutes,
                seconds,
            } => {
                let total_seconds =
                    (weeks * 7 + days) * 86_400 + hours * 3_600 + minutes * 60 + seconds;
                let candidate = period_start.add_seconds(total_seconds);
                if total_seconds < 0 || candidate >= period_end {
                    None
                } else {
                    Some(candidate)
                }
            }
            AnchorPolicy::NthWeekdayOfMonth {
                month,
                week,
                weekday,
                shift,
            } => {
                let (period_year, period_month, _) = period_start.date();
                let (target_year, target_month) =
                    month_offset(period_year, period_month, i64::from(month) - 1);
                let target = nth_weekday_of_month(target_year, target_month, week, weekday)?;
                let candidate = target.add_days(shift as i32);
                if candidate >= period_start && candidate < period_end {
                    Some(candidate)
                } else {
                    None
                }
            }
            AnchorPolicy::FromEasterWestern { days } => {
                let (year, _, _) = period_start.date();
                let (ey, em, ed) = easter(year, EasterTradition::Western);
                let base = Timestamp::new(ey, em, ed, 0, 0, 0).ok()?;
                let candidate = base.add_days(days as i32);
                if candidate >= period_start && candidate < period_end {
                    Some(candidate)
                } else {
                    None
                }
            }
            AnchorPolicy::FromEasterOrthodox { days } => {
                let (year, _, _) = period_start.date();
                let (ey, em, ed) = easter(year, EasterTradition::Orthodox);
                let base = Timestamp::new(ey, em, ed, 0, 0, 0).ok()?;
                let candidate = base.add_days(days as i32);
                if candidate >= period_start && candidate < period_end {
                    Some(candidate)
                } else {
                    None
                }
            }
        }
    }
}

/// `month`-th month (0-based offset) counting forward from `(year, month)`,
/// so `NthWeekdayOfMonth`'s `month` field names a position inside the
/// period rather than an absolute calendar month.
fn month_offset(year: i32, month: u8, offset: i64) -> (i32, u8) {
    let zero_based = i64::from(year) * 12 + i64::from(month) - 1 + offset;
    let target_year = zero_based.div_euclid(12) as i32;
    let target_month = (zero_based.rem_euclid(12) + 1) as u8;
    (target_year, target_month)
}

/// Counts how many `freq` base units lie in `[from, to)`, stepping forward
/// one base unit at a time. Used when a structural period's boundary falls
/// outside the frame, so `Frame::base_unit_at` cannot locate it directly.
fn count_base_units(freq: CalendarFreq, from: Timestamp, to: Timestamp) -> Result<usize, WorkcalError> {
    let mut cursor = from;
    let mut count = 0usize;
    while cursor < to {
        cursor = freq.add(cursor, 1)?;
        count += 1;
    }
    Ok(count)
}

/// Finds the `week`-th occurrence (negative counts from the end) of
/// `weekday` (1=Mon..7=Sun) in `month` of `year`. Returns `None` if the
/// requested occurrence does not exist.
fn nth_weekday_of_month(year: i32, month: u8, week: i32, weekday: u8) -> Option<Timestamp> {
    if week == 0 {
        return None;
    }
    let days_in_month = civil::days_in_month(year, month);
    let mut matches = Vec::new();
    for day in 1..=days_in_month {
        let ts = Timestamp::new(year, month, day, 0, 0, 0).ok()?;
        if ts.iso_weekday() == weekday {
            matches.push(ts);
        }
    }
    if week > 0 {
        matches.get(week as usize - 1).copied()
    } else {
        let idx = matches.len() as i32 + week;
        if idx < 0 {
            None
        } else {
            matches.get(idx as usize).copied()
        }
    }
}

/// A declarative partitioning rule.
#[derive(Debug, Clone)]
pub enum Marker {
    /// Periodic marker, optionally with anchor offsets inside each period.
    Periodic {
        each: CalendarFreq,
        at: Vec<AnchorPolicy>,
    },
    /// Explicit, sorted, unique list of timestamps.
    Explicit { timestamps: Vec<Timestamp> },
}

impl Marker {
    #[must_use]
    pub fn periodic(each: CalendarFreq) -> Self {
        Marker::Periodic { each, at: Vec::new() }
    }

    #[must_use]
    pub fn periodic_with_anchors(each: CalendarFreq, at: Vec<AnchorPolicy>) -> Self {
        Marker::Periodic { each, at }
    }

    #[must_use]
    pub fn explicit(mut timestamps: Vec<Timestamp>) -> Self {
        timestamps.sort_unstable();
        timestamps.dedup();
        Marker::Explicit { timestamps }
    }

    /// Partitions `frame[first..=last]` per `spec.md` §4.3.
    pub fn partition(
        &self,
        frame: &Frame,
        first: usize,
        last: usize,
    ) -> Result<Vec<Subframe>, WorkcalError> {
        let subs = match self {
            Marker::Periodic { each, at } if at.is_empty() => {
                self.partition_periodic_no_anchor(frame, first, last, *each)
            }
            Marker::Periodic { each, at } => {
                self.partition_periodic_with_anchors(frame, first, last, *each, at)
            }
            Marker::Explicit { timestamps } => frame.split_at_timestamps(first, last, timestamps),
        }?;
        crate::workcal_trace!(
            "marker partitioned base units [{first}, {last}] into {} subframe(s)",
            subs.len()
        );
        Ok(subs)
    }

    fn partition_periodic_no_anchor(
        &self,
        frame: &Frame,
        first: usize,
        last: usize,
        each: CalendarFreq,
    ) -> Result<Vec<Subframe>, WorkcalError> {
        if !each.is_superperiod_of(frame.freq()) {
            return Err(WorkcalError::unsupported_period().with_message(format!(
                "{each} is not a valid superperiod of the frame's {}",
                frame.freq()
            )));
        }

        let first_period = each.period_containing(frame.base_unit_start(first))?;
        let last_period = each.period_containing(frame.base_unit_start(last))?;

        let mut subframes = Vec::new();
        let mut period = first_period;
        let mut start_index = first;
        loop {
            let is_last_period = period.start >= last_period.start;
            let end_index = if is_last_period {
                last
            } else {
                frame.base_unit_at(period.end)? - 1
            };

            let skip_left = if start_index == first {
                match frame.base_unit_at(period.start) {
                    Ok(i) => first - i,
                    // `period.start` precedes the whole frame: count the
                    // period's own base units that dangle off its front.
                    Err(_) => count_base_units(frame.freq(), period.start, frame.base_unit_start(first))?,
                }
            } else {
                0
            };
            let skip_right = if is_last_period {
                if period.end == frame.end_time() {
                    0
                } else {
                    match frame.base_unit_at(period.end) {
                        Ok(i) => (i - 1).saturating_sub(last),
                        // `period.end` runs past the whole frame: count the
                        // period's own base units that dangle off its back.
                        Err(_) => count_base_units(frame.freq(), frame.base_unit_end(last), period.end)?,
                    }
                }
            } else {
                0
            };

            subframes.push(Subframe::new(start_index, end_index, skip_left, skip_right));

            if is_last_period {
                break;
            }
            start_index = end_index + 1;
            period = each.period_containing(period.end)?;
        }
        Ok(subframes)
    }

    fn partition_periodic_with_anchors(
        &self,
        frame: &Frame,
        first: usize,
        last: usize,
        each: CalendarFreq,
        at: &[AnchorPolicy],
    ) -> Result<Vec<Subframe>, WorkcalError> {
        let envelope_start = each.period_containing(frame.base_unit_start(first))?.start;
        let envelope_end = each.period_containing(frame.base_unit_start(last))?.end;

        let mut candidates = Vec::new();
        let periods = each.periods_intersecting(envelope_start, envelope_end.add_seconds(-1))?;
        for period in &periods {
            for policy in at {
                if let Some(candidate) = policy.candidate(period.start, period.end) {
                    candidates.push(candidate);
                }
            }
        }
        candidates.sort_unstable();
        candidates.dedup();

        if candidates.is_empty() {
            return Ok(vec![Subframe::with_undefined_skips(first, last)]);
        }

        let mut subs = frame.split_at_timestamps(first, last, &candidates)?;

        // skip_left: base units of the latest candidate at or before `first`
        // (within the envelope) that fall before `first`.
        let skip_left = candidates
            .iter()
            .rev()
            .find(|&&c| c <= frame.base_unit_start(first))
            .and_then(|&c| frame.base_unit_at(c).ok())
            .map(|i| first - i);

        // skip_right: base units of the earliest candidate after `last`
        // (within the envelope) that fall after `last`.
        let skip_right = candidates
            .iter()
            .find(|&&c| c > frame.base_unit_start(last) && c < envelope_end)
            .and_then(|&c| frame.base_unit_at(c).ok())
            .map(|i| i - 1 - last);

        if let Some(sub) = subs.first_mut() {
            if sub.first_index == first {
                sub.skip_left = skip_left;
            }
        }
        if let Some(sub) = subs.last_mut() {
            if sub.last_index == last {
                sub.skip_right = skip_right;
            }
        }
        Ok(subs)
    }
}
