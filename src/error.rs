//! The error type returned by fallible `workcal` operations.
//!
//! Every operation either returns a value or a [`WorkcalError`] carrying one
//! of the typed [`ErrorKind`] variants. Nothing is retried internally and
//! nothing is recovered silently; callers see the same error the core
//! detected.

use std::fmt;

/// The kind of failure that occurred.
///
/// Each variant corresponds to one row of the error table in the engine's
/// specification; the kind is matched on by callers, the message is for
/// humans only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A position or timestamp falls outside the timeline, a roll
    /// exceeded the timeline's ends, or a period endpoint is outside the
    /// timeline and clipping was not requested.
    OutOfBounds,
    /// `count_periods` touched a period that is not fully covered by the
    /// timeline.
    PartialOutOfBounds,
    /// An interval would be empty, or reversed, or `closed` stripped it
    /// down to nothing.
    VoidInterval,
    /// A frequency pair has no super/sub-period relation, or a
    /// multiplier/non-native frequency was used where a native one is
    /// required.
    UnsupportedPeriod,
    /// Two amendment keys resolved to the same base unit.
    AmendmentCollision,
    /// Mutually exclusive construction parameters were combined, or a
    /// `duty`/`closed`/`n` argument was invalid.
    InvalidArguments,
    /// A calendar frequency string could not be parsed.
    InvalidFrequency,
    /// Numeric worktime was requested over a non-numeric label.
    TypeMismatch,
    /// An internal invariant was violated; this indicates a bug in the
    /// engine itself rather than a caller error.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OutOfBounds => "out of bounds",
            Self::PartialOutOfBounds => "partially out of bounds",
            Self::VoidInterval => "void interval",
            Self::UnsupportedPeriod => "unsupported period",
            Self::AmendmentCollision => "amendment collision",
            Self::InvalidArguments => "invalid arguments",
            Self::InvalidFrequency => "invalid frequency",
            Self::TypeMismatch => "type mismatch",
            Self::Assert => "internal assertion failed",
        };
        f.write_str(s)
    }
}

/// An error raised by a `workcal` operation.
///
/// Construct with the `ErrorKind`-named constructors (e.g.
/// [`WorkcalError::out_of_bounds`]) and attach context with
/// [`WorkcalError::with_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkcalError {
    kind: ErrorKind,
    message: String,
}

impl WorkcalError {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: String::new(),
        }
    }

    /// The kind of error that occurred.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message attached to this error, if any.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attaches a human-readable message identifying the offending inputs.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// A position or timestamp falls outside the timeline.
    #[must_use]
    pub fn out_of_bounds() -> Self {
        Self::new(ErrorKind::OutOfBounds)
    }

    /// A `count_periods` period is not fully covered by the timeline.
    #[must_use]
    pub fn partial_out_of_bounds() -> Self {
        Self::new(ErrorKind::PartialOutOfBounds)
    }

    /// An interval would be empty or reversed.
    #[must_use]
    pub fn void_interval() -> Self {
        Self::new(ErrorKind::VoidInterval)
    }

    /// A frequency has no super/sub-period relation with another.
    #[must_use]
    pub fn unsupported_period() -> Self {
        Self::new(ErrorKind::UnsupportedPeriod)
    }

    /// Two amendment keys resolved to the same base unit.
    #[must_use]
    pub fn amendment_collision() -> Self {
        Self::new(ErrorKind::AmendmentCollision)
    }

    /// An argument combination or value is invalid.
    #[must_use]
    pub fn invalid_arguments() -> Self {
        Self::new(ErrorKind::InvalidArguments)
    }

    /// A calendar frequency string failed to parse.
    #[must_use]
    pub fn invalid_frequency() -> Self {
        Self::new(ErrorKind::InvalidFrequency)
    }

    /// Numeric worktime was requested over a non-numeric label.
    #[must_use]
    pub fn type_mismatch() -> Self {
        Self::new(ErrorKind::TypeMismatch)
    }

    /// An internal invariant was violated.
    #[must_use]
    pub fn assert() -> Self {
        Self::new(ErrorKind::Assert)
    }
}

impl fmt::Display for WorkcalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for WorkcalError {}

#[doc(hidden)]
#[macro_export]
macro_rules! workcal_assert {
    ($condition:expr) => {
        if !$condition {
            return Err($crate::WorkcalError::assert().with_message(concat!(
                "assertion failed: ",
                stringify!($condition)
            )));
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            return Err($crate::WorkcalError::assert().with_message(format!($($args)+)));
        }
    };
}
