//! `Timeboard`: the façade composing `Frame`, `Organizer`, `Timeline`,
//! `Schedule`, `Workshift` and `Interval`.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::civil::Timestamp;
use crate::components::amendments::Amendments;
use crate::components::calendar_freq::CalendarFreq;
use crate::components::frame::Frame;
use crate::components::interval::{Closed, Interval};
use crate::components::organizer::Organizer;
use crate::components::schedule::{Duty, Schedule};
use crate::components::timeline::{Timeline, WorkshiftRef};
use crate::components::workshift::{Workshift, WorktimeSource};
use crate::error::WorkcalError;
use crate::primitive::Label;

/// The shape of the interval an application wants, mirroring the
/// `get_interval` overload table in `spec.md` §4.10.
pub enum IntervalSpec {
    /// First/last workshift containing each timestamp.
    Timestamps(Timestamp, Timestamp),
    /// `k` workshifts starting at `ts` (negative `k` extends backward).
    Length(Timestamp, i64),
    /// The calendar period of `freq` containing `ts`.
    Period {
        ts: Timestamp,
        freq: CalendarFreq,
        clip_period: bool,
    },
    /// The entire timeline.
    Whole,
}

/// Construction parameters, mirroring `Timeboard.new` in `spec.md` §6.
pub struct TimeboardConfig {
    pub base_unit_freq: CalendarFreq,
    pub start: Timestamp,
    pub end: Timestamp,
    pub amendments: Amendments,
    pub strict_amendments: bool,
    pub default_selector: Rc<dyn Fn(Label) -> bool>,
    pub default_schedule_name: String,
    pub workshift_ref: WorkshiftRef,
    pub worktime_source: WorktimeSource,
}

impl TimeboardConfig {
    #[must_use]
    pub fn new(base_unit_freq: CalendarFreq, start: Timestamp, end: Timestamp) -> Self {
        Self {
            base_unit_freq,
            start,
            end,
            amendments: Amendments::new(),
            strict_amendments: false,
            default_selector: Rc::new(Label::is_truthy),
            default_schedule_name: "on_duty".to_owned(),
            workshift_ref: WorkshiftRef::Start,
            worktime_source: WorktimeSource::Duration,
        }
    }
}

/// Owns the `Timeline` and every named `Schedule`.
pub struct Timeboard {
    timeline: Timeline,
    schedules: HashMap<String, Schedule>,
    default_schedule_name: String,
    worktime_source: WorktimeSource,
}

impl Timeboard {
    pub fn new(config: TimeboardConfig, organizer: &Organizer) -> Result<Self, WorkcalError> {
        let frame = Frame::new(config.base_unit_freq, config.start, config.end)?;
        let timeline = Timeline::build(
            frame,
            organizer,
            &config.amendments.pairs(),
            config.strict_amendments,
            config.workshift_ref,
        )?;

        let mut schedules = HashMap::new();
        let default_schedule = Schedule::new(
            config.default_schedule_name.clone(),
            config.default_selector,
            &timeline,
        );
        schedules.insert(config.default_schedule_name.clone(), default_schedule);

        Ok(Self {
            timeline,
            schedules,
            default_schedule_name: config.default_schedule_name,
            worktime_source: config.worktime_source,
        })
    }

    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[must_use]
    pub fn worktime_source(&self) -> WorktimeSource {
        self.worktime_source
    }

    /// Registers a new named schedule. Rejects duplicate names.
    pub fn add_schedule(
        &mut self,
        name: impl Into<String>,
        selector: Rc<dyn Fn(Label) -> bool>,
    ) -> Result<&Schedule, WorkcalError> {
        let name = name.into();
        if self.schedules.contains_key(&name) {
            let err = WorkcalError::invalid_arguments()
                .with_message(format!("a schedule named {name:?} is already registered"));
            return Err(self.describe(err));
        }
        crate::workcal_trace!("registering schedule {name:?}");
        let schedule = Schedule::new(name.clone(), selector, &self.timeline);
        self.schedules.insert(name.clone(), schedule);
        Ok(self.schedules.get(&name).expect("just inserted"))
    }

    /// Drops a named schedule. The default schedule cannot be dropped.
    pub fn drop_schedule(&mut self, name: &str) -> Result<(), WorkcalError> {
        if name == self.default_schedule_name {
            let err = WorkcalError::invalid_arguments()
                .with_message("the default schedule cannot be dropped");
            return Err(self.describe(err));
        }
        if self.schedules.remove(name).is_none() {
            let err =
                WorkcalError::invalid_arguments().with_message(format!("no schedule named {name:?}"));
            return Err(self.describe(err));
        }
        Ok(())
    }

    pub fn schedule(&self, name: &str) -> Result<&Schedule, WorkcalError> {
        self.schedules.get(name).ok_or_else(|| {
            self.describe(
                WorkcalError::invalid_arguments().with_message(format!("no schedule named {name:?}")),
            )
        })
    }

    fn resolve_schedule(&self, name: Option<&str>) -> Result<&Schedule, WorkcalError> {
        self.schedule(name.unwrap_or(&self.default_schedule_name))
    }

    pub fn get_workshift(&self, ts: Timestamp, schedule_name: Option<&str>) -> Result<Workshift<'_>, WorkcalError> {
        let schedule = self.resolve_schedule(schedule_name)?;
        let position = self
            .timeline
            .workshift_containing(ts)
            .map_err(|e| self.describe(e.with_message(format!("timestamp {ts} is outside the timeline"))))?;
        Ok(Workshift::new(&self.timeline, schedule, position))
    }

    pub fn get_interval(
        &self,
        spec: IntervalSpec,
        closed: Closed,
        schedule_name: Option<&str>,
    ) -> Result<Interval<'_>, WorkcalError> {
        let schedule = self.resolve_schedule(schedule_name)?;
        let result = match spec {
            IntervalSpec::Timestamps(ts1, ts2) => {
                Interval::from_timestamps(&self.timeline, schedule, ts1, ts2, closed)
            }
            IntervalSpec::Length(ts, length) => {
                Interval::from_length(&self.timeline, schedule, ts, length, closed)
            }
            IntervalSpec::Period { ts, freq, clip_period } => {
                Interval::from_period(&self.timeline, schedule, ts, freq, clip_period, closed)
            }
            IntervalSpec::Whole => Ok(Interval::whole(&self.timeline, schedule)),
        };
        result.map_err(|e| self.describe(e))
    }

    pub fn duty(&self, duty: &str) -> Result<Duty, WorkcalError> {
        Duty::parse(duty)
    }

    /// A short descriptor identifying this timeboard in diagnostics:
    /// `Timeboard of 'D': 2017-01-01T00:00:00 -> 2017-02-01T00:00:00`.
    #[must_use]
    pub fn compact_str(&self) -> String {
        format!(
            "Timeboard of '{}': {} -> {}",
            self.timeline.frame().freq(),
            self.timeline.start_time(),
            self.timeline.end_time()
        )
    }

    /// Appends this timeboard's compact descriptor to `err`'s message, per
    /// `spec.md` §7: "All error values carry a human-readable message
    /// identifying the offending inputs and the timeboard's compact
    /// descriptor."
    fn describe(&self, err: WorkcalError) -> WorkcalError {
        let message = err.message().to_owned();
        let described = if message.is_empty() {
            self.compact_str()
        } else {
            format!("{message} (within {})", self.compact_str())
        };
        err.with_message(described)
    }
}

impl fmt::Display for Timeboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compact_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::marker::Marker;
    use crate::components::pattern::{LabelPattern, StructureElement};

    fn ts(y: i32, m: u8, d: u8) -> Timestamp {
        Timestamp::new(y, m, d, 0, 0, 0).unwrap()
    }

    fn build_board() -> Timeboard {
        let freq: CalendarFreq = "D".parse().unwrap();
        let organizer = Organizer::new(
            Marker::explicit(vec![]),
            vec![
                StructureElement::Labels(LabelPattern::scalar(Label::Bool(true))),
                StructureElement::Labels(LabelPattern::scalar(Label::Bool(false))),
            ],
        )
        .unwrap();
        let config = TimeboardConfig::new(freq, ts(2017, 1, 1), ts(2017, 1, 31));
        Timeboard::new(config, &organizer).unwrap()
    }

    #[test]
    fn get_workshift_resolves_default_schedule() {
        let board = build_board();
        let ws = board.get_workshift(ts(2017, 1, 5), None).unwrap();
        assert!(ws.start_time() <= ts(2017, 1, 5));
    }

    #[test]
    fn add_and_drop_schedule() {
        let mut board = build_board();
        board.add_schedule("always_on", Rc::new(|_: Label| true)).unwrap();
        assert!(board.schedule("always_on").is_ok());
        board.drop_schedule("always_on").unwrap();
        assert!(board.schedule("always_on").is_err());
    }

    #[test]
    fn cannot_drop_default_schedule() {
        let mut board = build_board();
        assert!(board.drop_schedule("on_duty").is_err());
    }

    #[test]
    fn duplicate_schedule_name_rejected() {
        let mut board = build_board();
        assert!(board.add_schedule("on_duty", Rc::new(|_: Label| true)).is_err());
    }

    #[test]
    fn get_interval_whole_spans_entire_timeline() {
        let board = build_board();
        let iv = board.get_interval(IntervalSpec::Whole, Closed::both(), None).unwrap();
        assert_eq!(iv.first_position(), 0);
        assert_eq!(iv.last_position(), board.timeline().len() - 1);
    }

    #[test]
    fn compact_str_names_freq_and_bounds() {
        let board = build_board();
        let rendered = board.compact_str();
        assert!(rendered.starts_with("Timeboard of 'D':"));
        assert!(rendered.contains("2017-01-01"));
        assert_eq!(board.to_string(), rendered);
    }

    #[test]
    fn errors_are_described_with_compact_str() {
        let mut board = build_board();
        let err = board.drop_schedule("on_duty").unwrap_err();
        assert!(err.message().contains(&board.compact_str()));
    }
}
