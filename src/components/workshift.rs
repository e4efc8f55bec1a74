//! `Workshift`: an immutable handle `(timeline, position, schedule)`.

use std::fmt;

use crate::civil::Timestamp;
use crate::components::schedule::{Duty, Schedule};
use crate::components::timeline::Timeline;
use crate::error::WorkcalError;
use crate::primitive::Label;

/// A lightweight value handle referencing a position in a [`Timeline`]
/// under a given [`Schedule`].
#[derive(Clone, Copy)]
pub struct Workshift<'a> {
    timeline: &'a Timeline,
    schedule: &'a Schedule,
    position: usize,
}

impl<'a> Workshift<'a> {
    #[must_use]
    pub fn new(timeline: &'a Timeline, schedule: &'a Schedule, position: usize) -> Self {
        Self {
            timeline,
            schedule,
            position,
        }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn timeline(&self) -> &'a Timeline {
        self.timeline
    }

    #[must_use]
    pub fn schedule(&self) -> &'a Schedule {
        self.schedule
    }

    #[must_use]
    pub fn with_schedule(&self, schedule: &'a Schedule) -> Self {
        Self {
            schedule,
            ..*self
        }
    }

    #[must_use]
    pub fn duration(&self) -> usize {
        self.timeline.duration(self.position)
    }

    #[must_use]
    pub fn label(&self) -> Label {
        self.timeline.label(self.position)
    }

    #[must_use]
    pub fn start_time(&self) -> Timestamp {
        self.timeline.workshift_start_time(self.position)
    }

    /// The last instant of the workshift, i.e. the final second of its
    /// last base unit.
    #[must_use]
    pub fn end_time(&self) -> Timestamp {
        self.timeline.workshift_end_time(self.position)
    }

    #[must_use]
    pub fn to_timestamp(&self) -> Timestamp {
        self.timeline.entry(self.position).ref_time
    }

    #[must_use]
    pub fn is_on_duty(&self) -> bool {
        self.schedule.is_on_duty(self.position)
    }

    #[must_use]
    pub fn is_off_duty(&self) -> bool {
        self.schedule.is_off_duty(self.position)
    }

    /// Borrows the sorted, schedule-owned index to binary-search for
    /// `duty`; `None` means every position qualifies (`Duty::Any`), which
    /// needs no index since the timeline itself is already the contiguous
    /// `0..len` range.
    fn duty_slice(&self, duty: Duty) -> Option<&'a [usize]> {
        match duty {
            Duty::On => Some(self.schedule.on_duty_index()),
            Duty::Off => Some(self.schedule.off_duty_index()),
            Duty::Same => Some(if self.is_on_duty() {
                self.schedule.on_duty_index()
            } else {
                self.schedule.off_duty_index()
            }),
            Duty::Alt => Some(if self.is_on_duty() {
                self.schedule.off_duty_index()
            } else {
                self.schedule.on_duty_index()
            }),
            Duty::Any => None,
        }
    }

    /// Moves `steps` positions within the `duty`-selected index, starting
    /// from the smallest index `>= self.position` in that index.
    pub fn rollforward(&self, steps: i64, duty: Duty) -> Result<Self, WorkcalError> {
        let Some(index) = self.duty_slice(duty) else {
            let target = self.position as i64 + steps;
            if target < 0 || target as usize >= self.timeline.len() {
                return Err(WorkcalError::out_of_bounds()
                    .with_message("rollforward exceeded the timeline's ends"));
            }
            return Ok(Self { position: target as usize, ..*self });
        };
        let anchor = index.partition_point(|&p| p < self.position);
        if anchor >= index.len() {
            return Err(WorkcalError::out_of_bounds()
                .with_message("no qualifying workshift at or after this position"));
        }
        let target = anchor as i64 + steps;
        if target < 0 || target as usize >= index.len() {
            return Err(WorkcalError::out_of_bounds()
                .with_message("rollforward exceeded the timeline's ends"));
        }
        Ok(Self {
            position: index[target as usize],
            ..*self
        })
    }

    /// Moves `steps` positions within the `duty`-selected index, starting
    /// from the largest index `<= self.position` in that index.
    pub fn rollback(&self, steps: i64, duty: Duty) -> Result<Self, WorkcalError> {
        let Some(index) = self.duty_slice(duty) else {
            let target = self.position as i64 - steps;
            if target < 0 || target as usize >= self.timeline.len() {
                return Err(WorkcalError::out_of_bounds()
                    .with_message("rollback exceeded the timeline's ends"));
            }
            return Ok(Self { position: target as usize, ..*self });
        };
        let count_le = index.partition_point(|&p| p <= self.position);
        let anchor = count_le.checked_sub(1).ok_or_else(|| {
            WorkcalError::out_of_bounds()
                .with_message("no qualifying workshift at or before this position")
        })?;
        let target = anchor as i64 - steps;
        if target < 0 || target as usize >= index.len() {
            return Err(WorkcalError::out_of_bounds()
                .with_message("rollback exceeded the timeline's ends"));
        }
        Ok(Self {
            position: index[target as usize],
            ..*self
        })
    }

    /// `ws + n` ≡ `ws.rollforward(n, Duty::On)`.
    pub fn add(&self, n: i64) -> Result<Self, WorkcalError> {
        self.rollforward(n, Duty::On)
    }

    /// `ws - n` ≡ `ws.rollback(n, Duty::On)`.
    pub fn sub(&self, n: i64) -> Result<Self, WorkcalError> {
        self.rollback(n, Duty::On)
    }

    /// `duration` if `source` is `duration`; the label coerced to `f64` if
    /// `source` is `labels`.
    pub fn worktime(&self, source: WorktimeSource) -> Result<f64, WorkcalError> {
        match source {
            WorktimeSource::Duration => Ok(self.duration() as f64),
            WorktimeSource::Labels => self.label().to_f64(),
        }
    }
}

impl fmt::Display for Workshift<'_> {
    /// Diagnostic rendering only, not a DataFrame-style presentation:
    /// `Workshift(5) of 'night' at 2017-01-03T00:00:00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Workshift({}) of '{}' at {}",
            self.position,
            self.label(),
            self.start_time()
        )
    }
}

/// Whether `worktime` reads base-unit counts or numeric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorktimeSource {
    Duration,
    Labels,
}

impl WorktimeSource {
    pub fn parse(s: &str) -> Result<Self, WorkcalError> {
        match s {
            "duration" => Ok(WorktimeSource::Duration),
            "labels" => Ok(WorktimeSource::Labels),
            _ => Err(WorkcalError::invalid_arguments()
                .with_message(format!("{s:?} is not a valid worktime source"))),
        }
    }
}
