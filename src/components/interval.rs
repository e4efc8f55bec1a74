//! `Interval`: a duty-aware query handle `(timeline, start_pos, end_pos,
//! schedule)`.

use std::fmt;

use crate::civil::Timestamp;
use crate::components::calendar_freq::CalendarFreq;
use crate::components::schedule::{Duty, Schedule};
use crate::components::timeline::Timeline;
use crate::components::workshift::{Workshift, WorktimeSource};
use crate::error::WorkcalError;

/// Which head/tail workshift to keep: `"11"` keeps both, `"10"` drops the
/// tail, `"01"` drops the head, `"00"` drops both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closed {
    pub head: bool,
    pub tail: bool,
}

impl Closed {
    pub fn parse(s: &str) -> Result<Self, WorkcalError> {
        match s {
            "11" => Ok(Self { head: true, tail: true }),
            "10" => Ok(Self { head: true, tail: false }),
            "01" => Ok(Self { head: false, tail: true }),
            "00" => Ok(Self { head: false, tail: false }),
            _ => Err(WorkcalError::invalid_arguments()
                .with_message(format!("{s:?} is not a valid closed code (11/10/01/00)"))),
        }
    }

    #[must_use]
    pub const fn both() -> Self {
        Self { head: true, tail: true }
    }
}

/// A duty-selected index borrowed from a [`Schedule`], or a marker standing
/// in for the contiguous `0..len` range when every position qualifies.
#[derive(Clone, Copy)]
enum DutyIndex<'a> {
    Sorted(&'a [usize]),
    Contiguous,
}

impl<'a> DutyIndex<'a> {
    fn position_at(&self, offset: usize) -> usize {
        match self {
            DutyIndex::Sorted(idx) => idx[offset],
            DutyIndex::Contiguous => offset,
        }
    }

    fn positions(&self, lo: usize, hi: usize) -> DutyIndexIter<'a> {
        match self {
            DutyIndex::Sorted(idx) => DutyIndexIter::Sorted(idx[lo..hi].iter().copied()),
            DutyIndex::Contiguous => DutyIndexIter::Contiguous(lo..hi),
        }
    }
}

enum DutyIndexIter<'a> {
    Sorted(std::iter::Copied<std::slice::Iter<'a, usize>>),
    Contiguous(std::ops::Range<usize>),
}

impl Iterator for DutyIndexIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            DutyIndexIter::Sorted(it) => it.next(),
            DutyIndexIter::Contiguous(it) => it.next(),
        }
    }
}

/// An inclusive `[first, last]` position range over a [`Timeline`], queried
/// under a [`Schedule`].
#[derive(Clone, Copy)]
pub struct Interval<'a> {
    timeline: &'a Timeline,
    schedule: &'a Schedule,
    first: usize,
    last: usize,
}

impl<'a> Interval<'a> {
    fn raw(timeline: &'a Timeline, schedule: &'a Schedule, first: usize, last: usize) -> Result<Self, WorkcalError> {
        if first > last {
            return Err(WorkcalError::void_interval().with_message("interval bounds are reversed"));
        }
        Ok(Self {
            timeline,
            schedule,
            first,
            last,
        })
    }

    /// From two timestamps: first/last workshift containing each.
    pub fn from_timestamps(
        timeline: &'a Timeline,
        schedule: &'a Schedule,
        ts1: Timestamp,
        ts2: Timestamp,
        closed: Closed,
    ) -> Result<Self, WorkcalError> {
        let first = timeline.workshift_containing(ts1)?;
        let last = timeline.workshift_containing(ts2)?;
        Self::raw(timeline, schedule, first, last).and_then(|iv| iv.apply_closed(closed))
    }

    /// `k` workshifts starting at `ts` (negative `k` extends backward).
    pub fn from_length(
        timeline: &'a Timeline,
        schedule: &'a Schedule,
        ts: Timestamp,
        length: i64,
        closed: Closed,
    ) -> Result<Self, WorkcalError> {
        if length == 0 {
            return Err(WorkcalError::invalid_arguments().with_message("length must not be 0"));
        }
        let anchor = timeline.workshift_containing(ts)?;
        let (first, last) = if length > 0 {
            let last = anchor as i64 + length - 1;
            (anchor as i64, last)
        } else {
            let first = anchor as i64 + length + 1;
            (first, anchor as i64)
        };
        if first < 0 || last as usize >= timeline.len() {
            return Err(WorkcalError::out_of_bounds()
                .with_message("length-based interval extends outside the timeline"));
        }
        Self::raw(timeline, schedule, first as usize, last as usize).and_then(|iv| iv.apply_closed(closed))
    }

    /// The calendar period of `freq` containing `ts`, optionally clipped to
    /// timeline bounds.
    pub fn from_period(
        timeline: &'a Timeline,
        schedule: &'a Schedule,
        ts: Timestamp,
        freq: CalendarFreq,
        clip_period: bool,
        closed: Closed,
    ) -> Result<Self, WorkcalError> {
        let period = freq.period_containing(ts)?;
        Self::from_period_bounds(timeline, schedule, period.start, period.end, clip_period, closed)
    }

    fn from_period_bounds(
        timeline: &'a Timeline,
        schedule: &'a Schedule,
        period_start: Timestamp,
        period_end: Timestamp,
        clip_period: bool,
        mut closed: Closed,
    ) -> Result<Self, WorkcalError> {
        let start_in_bounds = period_start >= timeline.start_time();
        let end_in_bounds = period_end <= timeline.end_time();

        let effective_start = if start_in_bounds {
            period_start
        } else if clip_period {
            closed.head = true;
            timeline.start_time()
        } else {
            return Err(WorkcalError::out_of_bounds()
                .with_message("period start lies outside the timeline"));
        };
        let effective_end = if end_in_bounds {
            period_end
        } else if clip_period {
            closed.tail = true;
            timeline.end_time()
        } else {
            return Err(WorkcalError::out_of_bounds()
                .with_message("period end lies outside the timeline"));
        };

        let first = timeline
            .workshift_with_ref_after(effective_start)
            .ok_or_else(|| WorkcalError::out_of_bounds().with_message("no workshift at or after period start"))?;
        let last_candidate = timeline.workshift_with_ref_before(
            effective_end.add_seconds(-1),
        );
        let last = last_candidate
            .ok_or_else(|| WorkcalError::out_of_bounds().with_message("no workshift at or before period end"))?;

        Self::raw(timeline, schedule, first, last).and_then(|iv| iv.apply_closed(closed))
    }

    /// The entire timeline.
    #[must_use]
    pub fn whole(timeline: &'a Timeline, schedule: &'a Schedule) -> Self {
        Self {
            timeline,
            schedule,
            first: 0,
            last: timeline.len().saturating_sub(1),
        }
    }

    fn apply_closed(self, closed: Closed) -> Result<Self, WorkcalError> {
        let mut first = self.first;
        let mut last = self.last;
        if !closed.head {
            first += 1;
        }
        if !closed.tail {
            if last == 0 {
                return Err(WorkcalError::void_interval()
                    .with_message("closed=*0 stripped the interval down to nothing"));
            }
            last -= 1;
        }
        if first > last {
            return Err(WorkcalError::void_interval()
                .with_message("closed stripped the interval down to nothing"));
        }
        Ok(Self { first, last, ..self })
    }

    #[must_use]
    pub fn first_position(&self) -> usize {
        self.first
    }

    #[must_use]
    pub fn last_position(&self) -> usize {
        self.last
    }

    #[must_use]
    pub fn with_schedule(&self, schedule: &'a Schedule) -> Self {
        Self { schedule, ..*self }
    }

    /// The schedule-owned sorted index for `duty`, or a marker meaning
    /// "every position in `[first, last]` qualifies" (`Any`/`Same`/`Alt`,
    /// which have no fixed meaning without an anchor workshift at the
    /// `Interval` level, per `spec.md` §4.11's duty-agnostic counting
    /// operations) — the timeline itself is already that contiguous range,
    /// so no index needs to be built.
    fn duty_index(&self, duty: Duty) -> DutyIndex<'a> {
        match duty {
            Duty::On => DutyIndex::Sorted(self.schedule.on_duty_index()),
            Duty::Off => DutyIndex::Sorted(self.schedule.off_duty_index()),
            Duty::Any | Duty::Same | Duty::Alt => DutyIndex::Contiguous,
        }
    }

    /// `(lo, hi)` bounds of `duty_index(duty)` restricted to `[self.first,
    /// self.last]`, expressed in that index's own offset space: array
    /// offsets for `Sorted`, positions themselves for `Contiguous`.
    fn bounds_in_index(&self, duty: Duty) -> (DutyIndex<'a>, usize, usize) {
        let index = self.duty_index(duty);
        let (lo, hi) = match index {
            DutyIndex::Sorted(idx) => (
                idx.partition_point(|&p| p < self.first),
                idx.partition_point(|&p| p <= self.last),
            ),
            DutyIndex::Contiguous => (self.first, self.last + 1),
        };
        (index, lo, hi)
    }

    /// Number of workshifts with the chosen duty in `[first, last]`.
    #[must_use]
    pub fn count(&self, duty: Duty) -> usize {
        let (_, lo, hi) = self.bounds_in_index(duty);
        hi - lo
    }

    /// Sum of base-unit counts of qualifying workshifts.
    #[must_use]
    pub fn total_duration(&self, duty: Duty) -> usize {
        let (index, lo, hi) = self.bounds_in_index(duty);
        index.positions(lo, hi).map(|p| self.timeline.duration(p)).sum()
    }

    /// `total_duration` if `source` is `duration`; sum of numeric labels if
    /// `source` is `labels`.
    pub fn worktime(&self, duty: Duty, source: WorktimeSource) -> Result<f64, WorkcalError> {
        match source {
            WorktimeSource::Duration => Ok(self.total_duration(duty) as f64),
            WorktimeSource::Labels => {
                let (index, lo, hi) = self.bounds_in_index(duty);
                index
                    .positions(lo, hi)
                    .map(|p| self.timeline.label(p).to_f64())
                    .sum()
            }
        }
    }

    /// Intersection of position ranges; carries `self`'s schedule unless
    /// `schedule` is given.
    pub fn overlap(&self, other: &Interval<'a>, schedule: Option<&'a Schedule>) -> Result<Self, WorkcalError> {
        let first = self.first.max(other.first);
        let last = self.last.min(other.last);
        Self::raw(self.timeline, schedule.unwrap_or(self.schedule), first, last)
    }

    /// `count(self ∩ other, duty) / count(other, duty)`.
    pub fn what_portion_of(&self, other: &Interval<'a>, duty: Duty) -> f64 {
        let denominator = other.count(duty);
        if denominator == 0 {
            return 0.0;
        }
        match self.overlap(other, None) {
            Ok(intersection) => intersection.count(duty) as f64 / denominator as f64,
            Err(_) => 0.0,
        }
    }

    /// 1-based, negative-from-end position lookup within the duty index.
    fn nth_in_duty(&self, n: i64, duty: Duty) -> Result<usize, WorkcalError> {
        if n == 0 {
            return Err(WorkcalError::invalid_arguments().with_message("n must not be 0"));
        }
        let (index, lo, hi) = self.bounds_in_index(duty);
        let len = hi - lo;
        let offset = if n > 0 {
            n as usize - 1
        } else {
            let from_end = (-n) as usize - 1;
            len.checked_sub(from_end + 1)
                .ok_or_else(|| WorkcalError::out_of_bounds().with_message("nth index out of range"))?
        };
        if offset >= len {
            return Err(WorkcalError::out_of_bounds().with_message("nth index out of range"));
        }
        Ok(index.position_at(lo + offset))
    }

    pub fn first(&self, duty: Duty) -> Result<Workshift<'a>, WorkcalError> {
        self.nth_in_duty(1, duty)
            .map(|p| Workshift::new(self.timeline, self.schedule, p))
    }

    pub fn last(&self, duty: Duty) -> Result<Workshift<'a>, WorkcalError> {
        self.nth_in_duty(-1, duty)
            .map(|p| Workshift::new(self.timeline, self.schedule, p))
    }

    pub fn nth(&self, n: i64, duty: Duty) -> Result<Workshift<'a>, WorkcalError> {
        self.nth_in_duty(n, duty)
            .map(|p| Workshift::new(self.timeline, self.schedule, p))
    }

    /// Fractional calendar-period count under `duty`, per `spec.md` §4.11.
    pub fn count_periods(&self, freq: CalendarFreq, duty: Duty) -> Result<f64, WorkcalError> {
        if freq.multiplier() != 1 {
            return Err(WorkcalError::unsupported_period()
                .with_message("count_periods frequency must not carry a multiplier"));
        }
        if !freq.is_superperiod_of(self.timeline.frame().freq()) {
            return Err(WorkcalError::unsupported_period()
                .with_message("count_periods frequency is not a strict superperiod of the base-unit frequency"));
        }

        let (index, lo, hi) = self.bounds_in_index(duty);
        if lo >= hi {
            return Ok(0.0);
        }
        let first_pos = index.position_at(lo);
        let last_pos = index.position_at(hi - 1);

        let ws_a_ref = self.timeline.entry(first_pos).ref_time;
        let ws_b_ref = self.timeline.entry(last_pos).ref_time;

        let periods = freq.periods_intersecting(ws_a_ref, ws_b_ref)?;
        let mut total = 0.0;
        for (i, period) in periods.iter().enumerate() {
            let is_first = i == 0;
            let is_last = i == periods.len() - 1;

            let clip_start = period.start.max(self.timeline.start_time());
            let clip_end = period.end.min(self.timeline.end_time());
            if is_first && period.start < self.timeline.start_time() {
                return Err(WorkcalError::partial_out_of_bounds()
                    .with_message("count_periods' first period extends before the timeline"));
            }
            if is_last && period.end > self.timeline.end_time() {
                return Err(WorkcalError::partial_out_of_bounds()
                    .with_message("count_periods' last period extends after the timeline"));
            }

            let i_p = self.restrict_to_ref_range(clip_start, clip_end.add_seconds(-1));
            let f_p = Self::whole(self.timeline, self.schedule)
                .restrict_to_ref_range(clip_start, clip_end.add_seconds(-1));

            let denominator = f_p.map_or(0, |iv| iv.count(duty));
            if denominator > 0 {
                let numerator = i_p.map_or(0, |iv| iv.count(duty));
                total += numerator as f64 / denominator as f64;
            }
        }
        Ok(total)
    }

    /// Restricts `self` to workshifts whose `ref_time` falls in
    /// `[start, end]`. `None` if no workshift qualifies.
    fn restrict_to_ref_range(&self, start: Timestamp, end: Timestamp) -> Option<Self> {
        let lo = self.timeline.workshift_with_ref_after(start)?.max(self.first);
        let hi = self.timeline.workshift_with_ref_before(end)?.min(self.last);
        if lo > hi {
            return None;
        }
        Some(Self {
            first: lo,
            last: hi,
            ..*self
        })
    }
}

impl fmt::Display for Interval<'_> {
    /// Diagnostic rendering only, not a DataFrame-style presentation:
    /// `Interval(5, 12) within 2017-01-03T00:00:00 -> 2017-01-11T00:00:00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Interval({}, {}) within {} -> {}",
            self.first,
            self.last,
            self.timeline.workshift_start_time(self.first),
            self.timeline.workshift_end_time(self.last)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::frame::Frame;
    use crate::components::marker::Marker;
    use crate::components::organizer::Organizer;
    use crate::components::pattern::{LabelPattern, StructureElement};
    use crate::components::timeline::WorkshiftRef;
    use crate::primitive::Label;
    use std::rc::Rc;

    fn ts(y: i32, m: u8, d: u8) -> Timestamp {
        Timestamp::new(y, m, d, 0, 0, 0).unwrap()
    }

    fn build() -> (Timeline, Schedule) {
        let day: CalendarFreq = "D".parse().unwrap();
        let frame = Frame::new(day, ts(2017, 1, 1), ts(2017, 1, 31)).unwrap();
        let organizer = Organizer::new(
            Marker::explicit(vec![]),
            vec![
                StructureElement::Labels(LabelPattern::scalar(Label::Bool(true))),
                StructureElement::Labels(LabelPattern::scalar(Label::Bool(false))),
            ],
        )
        .unwrap();
        let timeline = Timeline::build(frame, &organizer, &[], false, WorkshiftRef::Start).unwrap();
        let schedule = Schedule::new("on_duty", Rc::new(|l: Label| l.is_truthy()), &timeline);
        (timeline, schedule)
    }

    #[test]
    fn count_any_equals_span() {
        let (timeline, schedule) = build();
        let iv = Interval::from_timestamps(
            &timeline,
            &schedule,
            ts(2017, 1, 3),
            ts(2017, 1, 8),
            Closed::both(),
        )
        .unwrap();
        assert_eq!(iv.count(Duty::Any), iv.last_position() - iv.first_position() + 1);
    }

    #[test]
    fn closed_strips_ends() {
        let (timeline, schedule) = build();
        let full = Interval::from_timestamps(
            &timeline,
            &schedule,
            ts(2017, 1, 3),
            ts(2017, 1, 8),
            Closed::both(),
        )
        .unwrap();
        let stripped = Interval::from_timestamps(
            &timeline,
            &schedule,
            ts(2017, 1, 3),
            ts(2017, 1, 8),
            Closed { head: false, tail: false },
        )
        .unwrap();
        assert_eq!(stripped.first_position(), full.first_position() + 1);
        assert_eq!(stripped.last_position(), full.last_position() - 1);
    }

    #[test]
    fn void_interval_from_reversed_timestamps() {
        let (timeline, schedule) = build();
        assert!(Interval::from_timestamps(
            &timeline,
            &schedule,
            ts(2017, 1, 8),
            ts(2017, 1, 3),
            Closed::both()
        )
        .is_err());
    }

    #[test]
    fn what_portion_of_is_bounded() {
        let (timeline, schedule) = build();
        let whole = Interval::whole(&timeline, &schedule);
        let half = Interval::from_timestamps(
            &timeline,
            &schedule,
            ts(2017, 1, 1),
            ts(2017, 1, 15),
            Closed::both(),
        )
        .unwrap();
        let ratio = half.what_portion_of(&whole, Duty::Any);
        assert!((0.0..=1.0).contains(&ratio));
    }

    #[test]
    fn length_based_interval_extends_backward() {
        let (timeline, schedule) = build();
        let iv = Interval::from_length(&timeline, &schedule, ts(2017, 1, 10), -3, Closed::both()).unwrap();
        assert_eq!(iv.count(Duty::Any), 3);
    }

    #[test]
    fn count_periods_whole_month_is_one() {
        let (timeline, schedule) = build();
        let whole = Interval::whole(&timeline, &schedule);
        let month: CalendarFreq = "M".parse().unwrap();
        let fraction = whole.count_periods(month, Duty::Any).unwrap();
        assert!((fraction - 1.0).abs() < 1e-9);
    }

    #[test]
    fn display_names_bounds_and_span() {
        let (timeline, schedule) = build();
        let iv = Interval::from_timestamps(
            &timeline,
            &schedule,
            ts(2017, 1, 3),
            ts(2017, 1, 8),
            Closed::both(),
        )
        .unwrap();
        let rendered = iv.to_string();
        assert!(rendered.starts_with(&format!("Interval({}, {})", iv.first_position(), iv.last_position())));
        assert!(rendered.contains("2017-01-03"));
        assert!(rendered.contains("2017-01-08"));
    }

    #[test]
    fn on_duty_counting_matches_schedule_index() {
        let (timeline, schedule) = build();
        let iv = Interval::whole(&timeline, &schedule);
        assert_eq!(iv.count(Duty::On), schedule.on_duty_index().len());
        assert_eq!(iv.count(Duty::Off), schedule.off_duty_index().len());
        assert_eq!(iv.first(Duty::On).unwrap().position(), schedule.on_duty_index()[0]);
    }
}
