//! The building blocks of a business calendar: a `Frame` of base units is
//! cut into `Subframe`s by a `Marker`, labeled by an `Organizer`, overlaid
//! with `Amendments`, and finalized into a `Timeline` that `Schedule`,
//! `Workshift` and `Interval` query.

mod amendments;
mod calendar_freq;
mod frame;
mod interval;
mod marker;
mod organizer;
mod pattern;
mod schedule;
mod timeboard;
mod timeline;
mod workshift;

#[doc(inline)]
pub use amendments::Amendments;
#[doc(inline)]
pub use calendar_freq::{BaseUnit, CalendarFreq, ParseCalendarFreqError, Period};
#[doc(inline)]
pub use frame::Frame;
#[doc(inline)]
pub use interval::{Closed, Interval};
#[doc(inline)]
pub use marker::{AnchorPolicy, Marker, Subframe};
#[doc(inline)]
pub use organizer::{LabelBuffer, Organizer};
#[doc(inline)]
pub use pattern::{LabelPattern, RememberingPattern, StructureElement};
#[doc(inline)]
pub use schedule::{Duty, Schedule};
#[doc(inline)]
pub use timeboard::{IntervalSpec, Timeboard, TimeboardConfig};
#[doc(inline)]
pub use timeline::{Timeline, WorkshiftEntry, WorkshiftRef};
#[doc(inline)]
pub use workshift::{Workshift, WorktimeSource};
