//! `workcal` is a business-calendar engine: it models time as a discrete
//! sequence of *workshifts* (shifts, business days, business hours) and
//! supports arithmetic and counting operations over arbitrary intervals
//! of that sequence, with pluggable *schedules* that determine whether
//! each workshift is on-duty or off-duty.
//!
//! The crate builds a [`Timeboard`] from a base-unit frequency, a time
//! span, and a recursive [`Organizer`] describing how to cut that span
//! into labeled workshifts. Queries then go through [`Workshift`] and
//! [`Interval`] handles, both bound to the timeboard that produced them.
//!
//! All timestamps are naive wall-clock: the crate does not model time
//! zones.

#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]

pub mod civil;
pub mod easter;
pub mod error;
pub mod parsers;
pub mod primitive;

pub(crate) mod components;

#[doc(inline)]
pub use error::{ErrorKind, WorkcalError};

/// The `workcal` result type.
pub type WorkcalResult<T> = Result<T, WorkcalError>;

pub use crate::components::{
    Amendments, AnchorPolicy, Closed, Duty, Frame, Interval, IntervalSpec, LabelPattern, Marker,
    Organizer, RememberingPattern, Schedule, StructureElement, Timeboard, TimeboardConfig,
    Timeline, WorkshiftRef, WorktimeSource,
};
pub use crate::components::{BaseUnit, CalendarFreq};
pub use crate::components::Workshift;
pub use crate::primitive::Label;

/// Emits a construction-time trace message through the optional `log`
/// dependency (frame sizing, marker partitioning, amendment application,
/// schedule computation); a no-op when the `log` feature is disabled.
#[doc(hidden)]
#[macro_export]
macro_rules! workcal_trace {
    ($($arg:tt)+) => {
        #[cfg(feature = "log")]
        {
            log::debug!($($arg)+);
        }
    };
}
