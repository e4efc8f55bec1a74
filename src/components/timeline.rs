//! The finalized base-unit ↔ workshift mapping.

use crate::civil::Timestamp;
use crate::components::frame::Frame;
use crate::components::organizer::{LabelBuffer, Organizer};
use crate::error::WorkcalError;
use crate::primitive::Label;
use std::collections::HashMap;

/// Which end of a workshift's base-unit span its reference time is drawn
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkshiftRef {
    Start,
    End,
}

/// One entry of `ws_band`: `(first_base_unit_index, label, ref_time)`.
#[derive(Debug, Clone, Copy)]
pub struct WorkshiftEntry {
    pub first_base_unit: usize,
    pub last_base_unit: usize,
    pub label: Label,
    pub ref_time: Timestamp,
}

/// Owns the base-unit `Frame`, the `frame_band` mapping, and the
/// finalized `ws_band` of workshifts.
pub struct Timeline {
    frame: Frame,
    frame_band: Vec<usize>,
    ws_band: Vec<WorkshiftEntry>,
    ref_times: Vec<Timestamp>,
    workshift_ref: WorkshiftRef,
}

impl Timeline {
    /// Builds the timeline: organizes `frame` with `organizer`, overlays
    /// `amendments`, then collapses compoundable runs into workshifts.
    pub fn build(
        frame: Frame,
        organizer: &Organizer,
        amendments: &[(Timestamp, Label)],
        strict_amendments: bool,
        workshift_ref: WorkshiftRef,
    ) -> Result<Self, WorkcalError> {
        crate::workcal_trace!(
            "building timeline: {} base units of {} from {} to {}",
            frame.len(),
            frame.freq(),
            frame.start_time(),
            frame.end_time()
        );
        let mut buffer = LabelBuffer::new(frame.len());
        if frame.len() > 0 {
            organizer.apply(&frame, 0, frame.len() - 1, &mut buffer)?;
        }

        crate::workcal_trace!("applying {} amendment(s)", amendments.len());
        apply_amendments(&frame, &mut buffer, amendments, strict_amendments)?;

        for (idx, label) in buffer.labels.iter().enumerate() {
            crate::workcal_assert!(label.is_some(), "base unit {idx} was never assigned a label");
        }

        let (frame_band, ws_band) = collapse(&frame, &buffer, workshift_ref);
        crate::workcal_trace!(
            "collapsed {} base units into {} workshift(s)",
            frame.len(),
            ws_band.len()
        );
        let ref_times = ws_band.iter().map(|w| w.ref_time).collect();

        Ok(Self {
            frame,
            frame_band,
            ws_band,
            ref_times,
            workshift_ref,
        })
    }

    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ws_band.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ws_band.is_empty()
    }

    #[must_use]
    pub fn workshift_ref(&self) -> WorkshiftRef {
        self.workshift_ref
    }

    #[must_use]
    pub fn entry(&self, position: usize) -> &WorkshiftEntry {
        &self.ws_band[position]
    }

    #[must_use]
    pub fn start_time(&self) -> Timestamp {
        self.frame.start_time()
    }

    #[must_use]
    pub fn end_time(&self) -> Timestamp {
        self.frame.end_time()
    }

    #[must_use]
    pub fn label(&self, position: usize) -> Label {
        self.ws_band[position].label
    }

    #[must_use]
    pub fn workshift_start_time(&self, position: usize) -> Timestamp {
        self.frame.base_unit_start(self.ws_band[position].first_base_unit)
    }

    /// The last instant (inclusive) of the workshift's last base unit, not
    /// the half-open boundary with the next base unit.
    #[must_use]
    pub fn workshift_end_time(&self, position: usize) -> Timestamp {
        self.frame
            .base_unit_end(self.ws_band[position].last_base_unit)
            .add_seconds(-1)
    }

    #[must_use]
    pub fn duration(&self, position: usize) -> usize {
        let e = &self.ws_band[position];
        e.last_base_unit - e.first_base_unit + 1
    }

    /// Binary-searches base units then maps via `frame_band`.
    pub fn workshift_containing(&self, ts: Timestamp) -> Result<usize, WorkcalError> {
        let base_idx = self.frame.base_unit_at(ts)?;
        Ok(self.frame_band[base_idx])
    }

    /// Smallest position whose `ref_time` is `>= ts`.
    #[must_use]
    pub fn workshift_with_ref_after(&self, ts: Timestamp) -> Option<usize> {
        match self.ref_times.binary_search(&ts) {
            Ok(idx) => Some(idx),
            Err(idx) if idx < self.ref_times.len() => Some(idx),
            Err(_) => None,
        }
    }

    /// Largest position whose `ref_time` is `<= ts`.
    #[must_use]
    pub fn workshift_with_ref_before(&self, ts: Timestamp) -> Option<usize> {
        match self.ref_times.binary_search(&ts) {
            Ok(idx) => Some(idx),
            Err(0) => None,
            Err(idx) => Some(idx - 1),
        }
    }
}

fn apply_amendments(
    frame: &Frame,
    buffer: &mut LabelBuffer,
    amendments: &[(Timestamp, Label)],
    strict: bool,
) -> Result<(), WorkcalError> {
    let mut snapped: HashMap<usize, Label> = HashMap::new();
    for &(ts, label) in amendments {
        let idx = match frame.base_unit_at(ts) {
            Ok(idx) => idx,
            Err(_) if !strict => continue,
            Err(e) => return Err(e),
        };
        if snapped.insert(idx, label).is_some() {
            return Err(WorkcalError::amendment_collision()
                .with_message(format!("two amendment keys resolve to base unit {idx}")));
        }
    }
    for (idx, label) in snapped {
        buffer.labels[idx] = Some(label);
        buffer.compoundable[idx] = false;
    }
    Ok(())
}

fn collapse(
    frame: &Frame,
    buffer: &LabelBuffer,
    workshift_ref: WorkshiftRef,
) -> (Vec<usize>, Vec<WorkshiftEntry>) {
    let len = buffer.labels.len();
    let mut frame_band = vec![0usize; len];
    let mut ws_band = Vec::new();

    let mut i = 0;
    while i < len {
        let label = buffer.labels[i].expect("validated non-None above");
        let mut j = i;
        while j + 1 < len
            && buffer.compoundable[j + 1]
            && buffer.compoundable[i]
            && labels_equal(buffer.labels[j + 1].expect("validated non-None above"), label)
        {
            j += 1;
        }

        // `End` mirrors `workshift_end_time`'s inclusive-last-instant
        // convention, so `start_time <= ref_time <= end_time` always holds.
        let ref_time = match workshift_ref {
            WorkshiftRef::Start => frame.base_unit_start(i),
            WorkshiftRef::End => frame.base_unit_end(j).add_seconds(-1),
        };
        let position = ws_band.len();
        ws_band.push(WorkshiftEntry {
            first_base_unit: i,
            last_base_unit: j,
            label,
            ref_time,
        });
        for k in i..=j {
            frame_band[k] = position;
        }
        i = j + 1;
    }

    (frame_band, ws_band)
}

fn labels_equal(a: Label, b: Label) -> bool {
    match (a, b) {
        (Label::Bool(x), Label::Bool(y)) => x == y,
        (Label::Int(x), Label::Int(y)) => x == y,
        (Label::Float(x), Label::Float(y)) => x == y,
        (Label::Text(x), Label::Text(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::calendar_freq::CalendarFreq;
    use crate::components::marker::Marker;
    use crate::components::organizer::Organizer;
    use crate::components::pattern::{LabelPattern, StructureElement};

    fn ts(y: i32, m: u8, d: u8) -> Timestamp {
        Timestamp::new(y, m, d, 0, 0, 0).unwrap()
    }

    fn build_odd_even_timeline(start: Timestamp, end: Timestamp) -> Timeline {
        let day: CalendarFreq = "D".parse().unwrap();
        let frame = Frame::new(day, start, end).unwrap();
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
    fn duration_sums_to_frame_len() {
        let timeline = build_odd_even_timeline(ts(2017, 1, 1), ts(2017, 1, 10));
        let total: usize = (0..timeline.len()).map(|p| timeline.duration(p)).sum();
        assert_eq!(total, timeline.frame().len());
    }

    #[test]
    fn workshift_containing_round_trips() {
        let timeline = build_odd_even_timeline(ts(2017, 1, 1), ts(2017, 1, 10));
        for pos in 0..timeline.len() {
            let ref_time = timeline.entry(pos).ref_time;
            assert_eq!(timeline.workshift_containing(ref_time).unwrap(), pos);
        }
    }

    #[test]
    fn amendment_overrides_label() {
        let day: CalendarFreq = "D".parse().unwrap();
        let frame = Frame::new(day, ts(2017, 1, 1), ts(2017, 1, 3)).unwrap();
        let organizer = Organizer::new(
            Marker::explicit(vec![]),
            vec![StructureElement::Labels(LabelPattern::scalar(Label::Bool(true)))],
        )
        .unwrap();
        let amendments = vec![(ts(2017, 1, 2), Label::Bool(false))];
        let timeline =
            Timeline::build(frame, &organizer, &amendments, false, WorkshiftRef::Start).unwrap();
        // Amendment breaks the compound run in two.
        assert_eq!(timeline.len(), 3);
        assert!(matches!(timeline.label(1), Label::Bool(false)));
    }

    #[test]
    fn colliding_amendments_are_fatal() {
        let day: CalendarFreq = "D".parse().unwrap();
        let frame = Frame::new(day, ts(2017, 1, 1), ts(2017, 1, 3)).unwrap();
        let organizer = Organizer::new(
            Marker::explicit(vec![]),
            vec![StructureElement::Labels(LabelPattern::scalar(Label::Bool(true)))],
        )
        .unwrap();
        let amendments = vec![
            (ts(2017, 1, 2, ), Label::Bool(false)),
            (Timestamp::new(2017, 1, 2, 12, 0, 0).unwrap(), Label::Bool(true)),
        ];
        let err = Timeline::build(frame, &organizer, &amendments, false, WorkshiftRef::Start)
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::AmendmentCollision);
    }
}
