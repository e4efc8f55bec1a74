//! The recursive partition-and-label engine: pairs a [`Marker`] with a
//! cyclic `structure` of label sources or nested organizers.

use crate::components::frame::Frame;
use crate::components::marker::Marker;
use crate::components::pattern::StructureElement;
use crate::error::WorkcalError;
use crate::primitive::Label;

/// `{rule: Marker, structure: [Element]}`, `spec.md` §3/§4.4.
#[derive(Debug, Clone)]
pub struct Organizer {
    rule: Marker,
    structure: Vec<StructureElement>,
}

/// Accumulates the label and compoundable-flag arrays an organize pass
/// writes into, one entry per base unit of the owning frame.
pub struct LabelBuffer {
    pub labels: Vec<Option<Label>>,
    pub compoundable: Vec<bool>,
}

impl LabelBuffer {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            labels: vec![None; len],
            compoundable: vec![false; len],
        }
    }
}

impl Organizer {
    pub fn new(rule: Marker, structure: Vec<StructureElement>) -> Result<Self, WorkcalError> {
        if structure.is_empty() {
            return Err(WorkcalError::invalid_arguments()
                .with_message("organizer structure must not be empty"));
        }
        Ok(Self { rule, structure })
    }

    /// Partitions `frame[first..=last]` with `self.rule` and writes labels
    /// into `buffer` per `spec.md` §4.4.
    pub fn apply(
        &self,
        frame: &Frame,
        first: usize,
        last: usize,
        buffer: &mut LabelBuffer,
    ) -> Result<(), WorkcalError> {
        let subs = self.rule.partition(frame, first, last)?;
        for (i, sub) in subs.iter().enumerate() {
            let element = &self.structure[i % self.structure.len()];
            let phase = sub.skip_left().unwrap_or(0);
            let count = sub.len();

            match element {
                StructureElement::Nested(nested) => {
                    nested.apply(frame, sub.first_index(), sub.last_index(), buffer)?;
                }
                StructureElement::Labels(pattern) => {
                    let labels = pattern.materialize(phase, count);
                    for (offset, label) in labels.into_iter().enumerate() {
                        let idx = sub.first_index() + offset;
                        buffer.labels[idx] = Some(label);
                        buffer.compoundable[idx] = pattern.is_scalar();
                    }
                }
                StructureElement::Remembering(remembering) => {
                    let labels = remembering.draw(phase, count);
                    for (offset, label) in labels.into_iter().enumerate() {
                        let idx = sub.first_index() + offset;
                        buffer.labels[idx] = Some(label);
                        buffer.compoundable[idx] = false;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civil::Timestamp;
    use crate::components::calendar_freq::CalendarFreq;
    use crate::components::pattern::LabelPattern;

    fn ts(y: i32, m: u8, d: u8) -> Timestamp {
        Timestamp::new(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn flat_organizer_cycles_structure_across_days() {
        let day: CalendarFreq = "D".parse().unwrap();
        let frame = Frame::new(day, ts(2017, 1, 1), ts(2017, 1, 10)).unwrap();
        let marker = Marker::explicit((1..10).map(|d| ts(2017, 1, d + 1)).collect());
        let organizer = Organizer::new(
            marker,
            vec![
                StructureElement::Labels(LabelPattern::scalar(Label::Bool(true))),
                StructureElement::Labels(LabelPattern::scalar(Label::Bool(false))),
            ],
        )
        .unwrap();

        let mut buffer = LabelBuffer::new(frame.len());
        organizer.apply(&frame, 0, frame.len() - 1, &mut buffer).unwrap();
        let flags: Vec<bool> = buffer
            .labels
            .iter()
            .map(|l| matches!(l, Some(Label::Bool(true))))
            .collect();
        assert_eq!(flags, vec![true, false, true, false, true, false, true, false, true, false]);
        assert!(buffer.compoundable.iter().all(|&c| c));
    }

    #[test]
    fn nested_organizer_recurses() {
        let day: CalendarFreq = "D".parse().unwrap();
        let month: CalendarFreq = "M".parse().unwrap();
        let frame = Frame::new(day, ts(2017, 1, 1), ts(2017, 2, 28)).unwrap();

        let inner = Organizer::new(
            Marker::explicit(vec![]),
            vec![StructureElement::Labels(LabelPattern::scalar(Label::Int(9)))],
        )
        .unwrap();
        let outer = Organizer::new(
            Marker::periodic(month),
            vec![StructureElement::Nested(Box::new(inner))],
        )
        .unwrap();

        let mut buffer = LabelBuffer::new(frame.len());
        outer.apply(&frame, 0, frame.len() - 1, &mut buffer).unwrap();
        assert!(buffer.labels.iter().all(|l| matches!(l, Some(Label::Int(9)))));
    }
}
