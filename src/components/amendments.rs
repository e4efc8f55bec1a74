//! `Amendments`: a timestamp → label overlay applied after the organize
//! pass.

use std::collections::BTreeMap;

use crate::civil::Timestamp;
use crate::primitive::Label;

/// A mapping from timestamp to label, snapped to base-unit starts and
/// collision-checked by [`Timeline::build`](crate::components::timeline::Timeline::build).
///
/// Insertion order is not significant: entries are sorted by timestamp so
/// that snapping and collision detection are deterministic regardless of
/// how the caller built the map (`spec.md` §9: "always snap keys first,
/// then detect collisions; do not rely on input ordering").
#[derive(Debug, Clone, Default)]
pub struct Amendments {
    entries: BTreeMap<Timestamp, Label>,
}

impl Amendments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ts: Timestamp, label: Label) {
        self.entries.insert(ts, label);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The `(timestamp, label)` pairs, sorted by timestamp.
    #[must_use]
    pub fn pairs(&self) -> Vec<(Timestamp, Label)> {
        self.entries.iter().map(|(&ts, &label)| (ts, label)).collect()
    }
}

impl FromIterator<(Timestamp, Label)> for Amendments {
    fn from_iter<I: IntoIterator<Item = (Timestamp, Label)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
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
    fn later_insert_wins_for_same_key() {
        let mut amendments = Amendments::new();
        amendments.insert(ts(2017, 1, 1), Label::Bool(true));
        amendments.insert(ts(2017, 1, 1), Label::Bool(false));
        let pairs = amendments.pairs();
        assert_eq!(pairs.len(), 1);
        assert!(matches!(pairs[0].1, Label::Bool(false)));
    }

    #[test]
    fn pairs_are_sorted_regardless_of_insertion_order() {
        let mut amendments = Amendments::new();
        amendments.insert(ts(2017, 1, 3), Label::Int(3));
        amendments.insert(ts(2017, 1, 1), Label::Int(1));
        amendments.insert(ts(2017, 1, 2), Label::Int(2));
        let timestamps: Vec<_> = amendments.pairs().into_iter().map(|(ts, _)| ts).collect();
        assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
    }
}
