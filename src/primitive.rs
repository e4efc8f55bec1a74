//! Workshift labels.
//!
//! A [`Label`] is whatever an [`Organizer`](crate::components::organizer::Organizer)
//! assigns to a base unit: a duty marker, a shift name, an arbitrary integer
//! or float payload. Schedules read labels through a `duty` selector;
//! `worktime` reads them as numbers when `source = Labels` is requested.

use std::fmt;

use num_traits::ToPrimitive;
use tinystr::TinyAsciiStr;

use crate::error::WorkcalError;

/// The maximum length of a [`Label::Text`] payload, inline-stored with no
/// heap allocation.
pub const LABEL_TEXT_CAPACITY: usize = 16;

/// A value attached to a base unit by an [`Organizer`](crate::components::organizer::Organizer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Label {
    /// A boolean duty flag, the common case for `on_duty`/`off_duty`
    /// patterns.
    Bool(bool),
    /// A signed integer label, e.g. a shift index.
    Int(i64),
    /// A floating point label, e.g. a worktime weight.
    Float(f64),
    /// A short inline string label, e.g. a shift name like `"night"`.
    Text(TinyAsciiStr<LABEL_TEXT_CAPACITY>),
}

impl Label {
    /// Builds a text label, truncating silently is never done: an
    /// over-length string is rejected with [`WorkcalError::invalid_arguments`].
    pub fn text(s: &str) -> Result<Self, WorkcalError> {
        TinyAsciiStr::from_str(s)
            .map(Label::Text)
            .map_err(|_| WorkcalError::invalid_arguments().with_message(format!(
                "label text {s:?} exceeds {LABEL_TEXT_CAPACITY} bytes or contains non-ASCII"
            )))
    }

    /// Coerces this label to `f64` for numeric worktime/count_periods math.
    ///
    /// `Bool` coerces to `1.0`/`0.0`; `Text` has no numeric coercion and
    /// returns [`WorkcalError::type_mismatch`].
    pub fn to_f64(self) -> Result<f64, WorkcalError> {
        match self {
            Label::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
            Label::Int(i) => i
                .to_f64()
                .ok_or_else(|| WorkcalError::type_mismatch().with_message("integer label overflowed f64")),
            Label::Float(f) => Ok(f),
            Label::Text(t) => Err(WorkcalError::type_mismatch()
                .with_message(format!("label {t:?} is text, not numeric"))),
        }
    }

    /// Whether this label is considered "truthy" by duty selectors that
    /// treat a label as an on/off switch (used when a [`Label::Int`] or
    /// [`Label::Float`] is supplied as a selector where a bool is expected:
    /// zero is off-duty, anything else on-duty, matching the original's
    /// permissive Python truthiness).
    pub fn is_truthy(self) -> bool {
        match self {
            Label::Bool(b) => b,
            Label::Int(i) => i != 0,
            Label::Float(f) => f != 0.0,
            Label::Text(t) => !t.is_empty(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Bool(b) => write!(f, "{b}"),
            Label::Int(i) => write!(f, "{i}"),
            Label::Float(x) => write!(f, "{x}"),
            Label::Text(t) => write!(f, "{t}"),
        }
    }
}

impl From<bool> for Label {
    fn from(b: bool) -> Self {
        Label::Bool(b)
    }
}

impl From<i64> for Label {
    fn from(i: i64) -> Self {
        Label::Int(i)
    }
}

impl From<f64> for Label {
    fn from(f: f64) -> Self {
        Label::Float(f)
    }
}
