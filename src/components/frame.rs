//! Base-unit frames: a contiguous run of fixed-`CalendarFreq` ticks
//! spanning `[start, end]`.

use crate::civil::Timestamp;
use crate::components::calendar_freq::CalendarFreq;
use crate::components::marker::{Marker, Subframe};
use crate::error::WorkcalError;

/// An ordered, contiguous sequence of base units of a single [`CalendarFreq`].
///
/// Construction rounds `start` down to the containing period and `end` up
/// to the containing period's end, so the frame always holds whole base
/// units.
#[derive(Debug, Clone)]
pub struct Frame {
    freq: CalendarFreq,
    /// `starts[i]` is base unit `i`'s start time; `starts[i+1]` (or the
    /// frame's end, for the last unit) is its end time.
    starts: Vec<Timestamp>,
    end: Timestamp,
}

impl Frame {
    /// Builds a frame spanning at least `[start, end]`, snapped outward to
    /// whole periods of `freq`.
    pub fn new(freq: CalendarFreq, start: Timestamp, end: Timestamp) -> Result<Self, WorkcalError> {
        if start > end {
            return Err(WorkcalError::void_interval()
                .with_message("frame start must not be after frame end"));
        }
        let first_period = freq.period_containing(start)?;
        let last_period = freq.period_containing(end)?;

        let mut starts = Vec::new();
        let mut cursor = first_period.start;
        loop {
            starts.push(cursor);
            if cursor >= last_period.start {
                break;
            }
            cursor = freq.add(cursor, 1)?;
        }

        let frame_end = freq.add(last_period.start, 1)?;
        Ok(Self {
            freq,
            starts,
            end: frame_end,
        })
    }

    #[must_use]
    pub fn freq(&self) -> CalendarFreq {
        self.freq
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    #[must_use]
    pub fn start_time(&self) -> Timestamp {
        self.starts[0]
    }

    #[must_use]
    pub fn end_time(&self) -> Timestamp {
        self.end
    }

    /// Start time of base unit `index`.
    #[must_use]
    pub fn base_unit_start(&self, index: usize) -> Timestamp {
        self.starts[index]
    }

    /// End time of base unit `index` (exclusive, equal to the next base
    /// unit's start or the frame's end for the last unit).
    #[must_use]
    pub fn base_unit_end(&self, index: usize) -> Timestamp {
        self.starts.get(index + 1).copied().unwrap_or(self.end)
    }

    /// Locates the base unit containing `ts`.
    pub fn base_unit_at(&self, ts: Timestamp) -> Result<usize, WorkcalError> {
        if ts < self.start_time() || ts >= self.end {
            return Err(WorkcalError::out_of_bounds()
                .with_message(format!("timestamp is outside the frame [{:?}, {:?})", self.start_time(), self.end)));
        }
        match self.starts.binary_search(&ts) {
            Ok(idx) => Ok(idx),
            Err(insertion) => Ok(insertion - 1),
        }
    }

    /// Partitions `self[first..=last]` according to `marker`. See
    /// `Marker::partition` for the algorithm.
    pub fn partition_with_marker(
        &self,
        first: usize,
        last: usize,
        marker: &Marker,
    ) -> Result<Vec<Subframe>, WorkcalError> {
        marker.partition(self, first, last)
    }

    /// Splits `self[first..=last]` at the given timestamps, ignoring points
    /// outside the range, points landing in the first base unit, and
    /// duplicates.
    pub fn split_at_timestamps(
        &self,
        first: usize,
        last: usize,
        timestamps: &[Timestamp],
    ) -> Result<Vec<Subframe>, WorkcalError> {
        let mut cut_points: Vec<usize> = Vec::new();
        for &ts in timestamps {
            if ts < self.base_unit_start(first) || ts >= self.base_unit_end(last) {
                continue;
            }
            let idx = self.base_unit_at(ts)?;
            if idx <= first {
                continue;
            }
            if !cut_points.contains(&idx) {
                cut_points.push(idx);
            }
        }
        cut_points.sort_unstable();

        let mut subframes = Vec::with_capacity(cut_points.len() + 1);
        let mut start = first;
        for &cut in &cut_points {
            subframes.push(Subframe::new(start, cut - 1, 0, 0));
            start = cut;
        }
        subframes.push(Subframe::new(start, last, 0, 0));
        Ok(subframes)
    }
}
