//! Easter Sunday computation.
//!
//! Treated by the business-calendar engine as an opaque external pure
//! function `easter(year, tradition) -> date`; the implementation here is
//! the well-known Gregorian (Anonymous/Meeus) algorithm for the Western
//! tradition and the Meeus Julian algorithm, converted to the Gregorian
//! calendar, for the Orthodox tradition.

use crate::civil;

/// Which Easter computation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EasterTradition {
    /// Easter Sunday per the Gregorian calendar (Western churches).
    Western,
    /// Easter Sunday per the Julian calendar, expressed as a Gregorian
    /// calendar date (Eastern Orthodox churches).
    Orthodox,
}

/// Returns the `(year, month, day)` of Easter Sunday for `year`, expressed
/// as a Gregorian calendar date regardless of tradition.
#[must_use]
pub fn easter(year: i32, tradition: EasterTradition) -> (i32, u8, u8) {
    match tradition {
        EasterTradition::Western => western(year),
        EasterTradition::Orthodox => orthodox(year),
    }
}

/// Anonymous Gregorian algorithm (Meeus, *Astronomical Algorithms*, ch. 8).
fn western(year: i32) -> (i32, u8, u8) {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    (year, month as u8, day as u8)
}

/// Julian-calendar Easter (Meeus, ch. 8), then shifted to its Gregorian
/// calendar date via epoch-day conversion.
fn orthodox(year: i32) -> (i32, u8, u8) {
    let a = year % 4;
    let b = year % 7;
    let c = year % 19;
    let d = (19 * c + 15) % 30;
    let e = (2 * a + 4 * b - d + 34) % 7;
    let month = (d + e + 114) / 31;
    let day = (d + e + 114) % 31 + 1;

    // `month`/`day` above are a Julian calendar date. Convert to the
    // Gregorian calendar by computing the Julian date's epoch day with the
    // proleptic-Julian leap rule (every 4th year, no century exception)
    // and reusing the Gregorian epoch-day decoder, which is valid for any
    // epoch day regardless of which calendar produced it.
    let julian_epoch_days = julian_epoch_days_from_date(year, month as u8, day as u8);
    civil::Timestamp::from_epoch_days(julian_epoch_days).date()
}

/// Epoch-day count for a proleptic Julian calendar date.
fn julian_epoch_days_from_date(year: i32, month: u8, day: u8) -> i32 {
    let a = (14 - i32::from(month)) / 12;
    let y = year + 4800 - a;
    let m = i32::from(month) + 12 * a - 3;
    let julian_day_number =
        i32::from(day) + (153 * m + 2) / 5 + 365 * y + y / 4 - 32_083;
    // Julian day number 2_440_588 is 1970-01-01.
    julian_day_number - 2_440_588
}
