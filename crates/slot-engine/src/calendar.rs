//! Calendar arithmetic in a single implicit local zone.
//!
//! Days are `NaiveDate` values and instants are `NaiveDateTime` values. A day's
//! identity is its calendar date, never an instant, so a date key cannot slip
//! to the neighbouring day the way a UTC-derived key would.
//!
//! Weekdays are numbered 0=Sunday..6=Saturday throughout the crate.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{Result, SlotError};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Short weekday labels indexed by [`weekday_index`].
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Weekday of `date`, 0=Sunday..6=Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// The Monday of the week containing `date`.
///
/// Weeks run Monday..Sunday, so a Sunday maps back six days.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    let offset = (i64::from(weekday_index(date)) + 6) % 7;
    add_days(date, -offset)
}

pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    date + Duration::days(n)
}

/// Stable `YYYY-MM-DD` identity for a calendar date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` date key.
///
/// # Errors
/// Returns `SlotError::Format` if the string is not a valid calendar date.
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d")
        .map_err(|_| SlotError::Format(format!("'{}' is not a YYYY-MM-DD date", key)))
}

/// Parse an `HH:MM` clock time into minutes since midnight.
///
/// The hour may be one or two digits; the minute must be exactly two. Values
/// outside `00:00..=23:59` are rejected rather than clamped.
///
/// # Errors
/// Returns `SlotError::Format` for any other shape or an out-of-range field.
pub fn clock_to_minutes(clock: &str) -> Result<u32> {
    let malformed = || SlotError::Format(format!("'{}' is not an HH:MM clock time", clock));

    let (hours, minutes) = clock.split_once(':').ok_or_else(malformed)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
        return Err(malformed());
    }

    let h: u32 = hours.parse().map_err(|_| malformed())?;
    let m: u32 = minutes.parse().map_err(|_| malformed())?;
    if h > 23 || m > 59 {
        return Err(SlotError::Format(format!(
            "'{}' is out of range (00:00..23:59)",
            clock
        )));
    }
    Ok(h * 60 + m)
}

/// Format minutes since midnight as zero-padded `HH:MM`.
///
/// Inverse of [`clock_to_minutes`] for every value in `0..MINUTES_PER_DAY`.
pub fn minutes_to_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// The local instant `minutes` after midnight on `date`.
pub fn at_minutes(date: NaiveDate, minutes: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minutes))
}

/// Minutes since midnight of an instant's wall-clock time.
pub fn minute_of_day(instant: NaiveDateTime) -> u32 {
    instant.hour() * 60 + instant.minute()
}

/// Whole minutes from `from` to `to`, rounded toward negative infinity.
///
/// A slot thirty seconds in the past is `-1` minutes away, not `0`, so a zero
/// lead time still rejects it.
pub fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_seconds().div_euclid(60)
}

/// Serde adapter storing minutes-since-midnight fields as `"HH:MM"` strings.
pub mod clock_serde {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(minutes: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::minutes_to_clock(*minutes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::clock_to_minutes(&raw).map_err(de::Error::custom)
    }
}
