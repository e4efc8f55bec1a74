//! Cyclic label sources: the leaves of an [`Organizer`](super::organizer::Organizer)'s
//! structure.

use std::cell::Cell;
use std::rc::Rc;

use crate::primitive::Label;

/// A cyclic sequence of labels, or a single scalar value broadcast across
/// every base unit it's asked to fill.
///
/// A scalar pattern both broadcasts as a single-element cycle *and*
/// qualifies its base units for compounding (`spec.md` §4.6): this is
/// tracked by [`LabelPattern::is_scalar`].
#[derive(Debug, Clone)]
pub struct LabelPattern {
    labels: Vec<Label>,
    scalar: bool,
}

impl LabelPattern {
    /// A cyclic list pattern. Base units it fills are never compoundable,
    /// even when consecutive labels are equal.
    #[must_use]
    pub fn list(labels: Vec<Label>) -> Self {
        Self {
            labels,
            scalar: false,
        }
    }

    /// A single scalar label, broadcast to however many base units it is
    /// asked to fill. Base units it fills are compoundable.
    #[must_use]
    pub fn scalar(label: Label) -> Self {
        Self {
            labels: vec![label],
            scalar: true,
        }
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.scalar
    }

    /// Materializes `count` labels starting at cycle phase `phase`.
    #[must_use]
    pub fn materialize(&self, phase: usize, count: usize) -> Vec<Label> {
        let len = self.labels.len().max(1);
        (0..count)
            .map(|i| self.labels[(phase + i) % len])
            .collect()
    }
}

/// A stateful cyclic label source whose cursor persists across repeated
/// applications within a single organize pass.
///
/// Shared by reference (`Rc`) among every place in an `Organizer` tree that
/// references the same pattern, matching `spec.md` §3's "shared by
/// reference" rule.
#[derive(Debug, Clone)]
pub struct RememberingPattern {
    labels: Rc<Vec<Label>>,
    cursor: Rc<Cell<usize>>,
}

impl RememberingPattern {
    #[must_use]
    pub fn new(labels: Vec<Label>) -> Self {
        Self {
            labels: Rc::new(labels),
            cursor: Rc::new(Cell::new(0)),
        }
    }

    /// Draws `count` labels from the shared cursor position, advancing it.
    /// `phase` elements are drawn and discarded first, to advance the
    /// cursor to the correct position without emitting them (used when a
    /// subframe's `skip_left` places this pattern mid-cycle).
    pub fn draw(&self, phase: usize, count: usize) -> Vec<Label> {
        let len = self.labels.len().max(1);
        let mut pos = self.cursor.get();
        pos = (pos + phase) % len;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.labels[pos]);
            pos = (pos + 1) % len;
        }
        self.cursor.set(pos);
        out
    }

    /// Resets the cursor to phase 0. Used at the start of a fresh organize
    /// pass.
    pub fn reset(&self) {
        self.cursor.set(0);
    }
}

/// An element of an [`Organizer`](super::organizer::Organizer)'s structure:
/// either a label source or a nested organizer.
#[derive(Debug, Clone)]
pub enum StructureElement {
    /// A non-stateful cyclic or scalar label pattern.
    Labels(LabelPattern),
    /// A stateful, shared-cursor label pattern.
    Remembering(RememberingPattern),
    /// A nested organizer, recursed into for this subframe.
    Nested(Box<super::organizer::Organizer>),
}
