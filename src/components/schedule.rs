//! Named duty views over a [`Timeline`].

use std::rc::Rc;

use crate::components::timeline::Timeline;
use crate::error::WorkcalError;
use crate::primitive::Label;

/// `{name, selector, on_duty_index, off_duty_index}`. The two indexes
/// always partition `[0, len(timeline))`.
pub struct Schedule {
    name: String,
    selector: Rc<dyn Fn(Label) -> bool>,
    on_duty_index: Vec<usize>,
    off_duty_index: Vec<usize>,
}

impl Schedule {
    /// Scans `timeline` once to build the sorted on/off-duty index arrays.
    pub fn new(
        name: impl Into<String>,
        selector: Rc<dyn Fn(Label) -> bool>,
        timeline: &Timeline,
    ) -> Self {
        let mut on_duty_index = Vec::new();
        let mut off_duty_index = Vec::new();
        for pos in 0..timeline.len() {
            if selector(timeline.label(pos)) {
                on_duty_index.push(pos);
            } else {
                off_duty_index.push(pos);
            }
        }
        let name = name.into();
        crate::workcal_trace!(
            "schedule {name:?}: {} on-duty, {} off-duty workshift(s)",
            on_duty_index.len(),
            off_duty_index.len()
        );
        Self {
            name,
            selector,
            on_duty_index,
            off_duty_index,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn on_duty_index(&self) -> &[usize] {
        &self.on_duty_index
    }

    #[must_use]
    pub fn off_duty_index(&self) -> &[usize] {
        &self.off_duty_index
    }

    #[must_use]
    pub fn is_on_duty(&self, position: usize) -> bool {
        self.on_duty_index.binary_search(&position).is_ok()
    }

    #[must_use]
    pub fn is_off_duty(&self, position: usize) -> bool {
        !self.is_on_duty(position)
    }

    pub fn selector(&self, label: Label) -> bool {
        (self.selector)(label)
    }

    /// The index array for a `duty` selector (`on`/`off`), or `None` for
    /// `any`/`same`/`alt`, which are resolved relative to a workshift's
    /// current duty by the caller.
    #[must_use]
    pub fn index_for_duty(&self, duty: Duty) -> Option<&[usize]> {
        match duty {
            Duty::On => Some(&self.on_duty_index),
            Duty::Off => Some(&self.off_duty_index),
            Duty::Any | Duty::Same | Duty::Alt => None,
        }
    }
}

/// A duty selector as used by `Workshift::rollforward`/`rollback` and
/// `Interval` counting operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duty {
    On,
    Off,
    /// Resolved to the workshift's own current duty.
    Same,
    /// Resolved to the opposite of the workshift's own current duty.
    Alt,
    /// Every workshift, regardless of duty.
    Any,
}

impl Duty {
    pub fn parse(s: &str) -> Result<Self, WorkcalError> {
        match s {
            "on" => Ok(Duty::On),
            "off" => Ok(Duty::Off),
            "same" => Ok(Duty::Same),
            "alt" => Ok(Duty::Alt),
            "any" => Ok(Duty::Any),
            _ => Err(WorkcalError::invalid_arguments()
                .with_message(format!("{s:?} is not a valid duty (on/off/same/alt/any)"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civil::Timestamp;
    use crate::components::calendar_freq::CalendarFreq;
    use crate::components::frame::Frame;
    use crate::components::marker::Marker;
    use crate::components::organizer::Organizer;
    use crate::components::pattern::{LabelPattern, StructureElement};
    use crate::components::timeline::WorkshiftRef;

    fn ts(y: i32, m: u8, d: u8) -> Timestamp {
        Timestamp::new(y, m, d, 0, 0, 0).unwrap()
    }

    fn build_timeline() -> Timeline {
        let day: CalendarFreq = "D".parse().unwrap();
        let frame = Frame::new(day, ts(2017, 1, 1), ts(2017, 1, 10)).unwrap();
        let organizer = Organizer::new(
            Marker::explicit(vec![]),
            vec![
                StructureElement::Labels(LabelPattern::scalar(Label::Bool(true))),
                StructureElement::Labels(LabelPattern::scalar(Label::Bool(false))),
            ],
        )
        .unwrap();
        Timeline::build(frame, &organizer, &[], false, WorkshiftRef::Start).unwrap()
    }

    #[test]
    fn indexes_partition_timeline() {
        let timeline = build_timeline();
        let schedule = Schedule::new(
            "on_duty",
            Rc::new(|l: Label| l.is_truthy()),
            &timeline,
        );
        let mut all: Vec<usize> = schedule
            .on_duty_index()
            .iter()
            .chain(schedule.off_duty_index())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..timeline.len()).collect::<Vec<_>>());
        for &p in schedule.on_duty_index() {
            assert!(schedule.is_on_duty(p));
        }
        for &p in schedule.off_duty_index() {
            assert!(schedule.is_off_duty(p));
        }
    }
}
