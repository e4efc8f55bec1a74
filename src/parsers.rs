//! Timestamp-like string parsing.
//!
//! Positions, amendment keys, explicit marker timestamps and interval
//! bounds all accept an ISO-8601-ish string. Parsing is delegated to
//! `ixdtf`, the same crate the teacher uses for every date/time string in
//! its public surface.

use ixdtf::parsers::IxdtfParser;

use crate::civil::Timestamp;
use crate::error::WorkcalError;

/// Parses a timestamp-like string into a [`Timestamp`].
///
/// A bare space between the date and time portions (`"2017-09-30
/// 11:00:00"`, the form used throughout calendar test fixtures) is
/// normalized to `T` before parsing, since `ixdtf` only accepts the strict
/// ISO separator.
pub fn parse_timestamp(source: &str) -> Result<Timestamp, WorkcalError> {
    let normalized = normalize_separator(source);
    let record = IxdtfParser::from_str(&normalized)
        .parse()
        .map_err(|e| WorkcalError::invalid_arguments().with_message(format!("{source:?}: {e}")))?;

    let date = record.date.ok_or_else(|| {
        WorkcalError::invalid_arguments().with_message(format!("{source:?}: missing date"))
    })?;

    let (hour, minute, second) = record
        .time
        .map(|t| (t.hour, t.minute, t.second))
        .unwrap_or((0, 0, 0));

    Timestamp::new(date.year, date.month, date.day, hour, minute, second)
}

fn normalize_separator(source: &str) -> String {
    match source.find(' ') {
        Some(idx) if !source[..idx].contains('T') => {
            let mut normalized = String::with_capacity(source.len());
            normalized.push_str(&source[..idx]);
            normalized.push('T');
            normalized.push_str(&source[idx + 1..]);
            normalized
        }
        _ => source.to_owned(),
    }
}
