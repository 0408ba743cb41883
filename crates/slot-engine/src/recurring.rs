//! Project a chosen slot onto the same weekday of following weeks.
//!
//! Availability is not assumed to repeat week to week: each later week is
//! regenerated through the caller-supplied function, and a week is kept only
//! when a slot with the exact same clock start is still offered that day.
//! Weeks that do not match are skipped without error.

use chrono::NaiveDate;
use tracing::debug;

use crate::booking::Slot;
use crate::calendar::{add_days, date_key};

/// Expand `chosen` over `weeks` consecutive weeks, the chosen week included.
///
/// `regenerate` returns the available slots for a given date. The chosen slot
/// is always the first element and is not re-checked. A `weeks` value of 0 is
/// treated as 1.
pub fn expand_recurring<F>(chosen: &Slot, weeks: u32, mut regenerate: F) -> Vec<Slot>
where
    F: FnMut(NaiveDate) -> Vec<Slot>,
{
    let mut result = vec![*chosen];
    let start_minute = chosen.start_minute();

    for week in 1..weeks {
        let day = add_days(chosen.date(), 7 * i64::from(week));
        let offered = regenerate(day);
        match offered.into_iter().find(|s| s.start_minute() == start_minute) {
            Some(slot) => result.push(slot),
            None => debug!(day = %date_key(day), week, "recurring slot unavailable, skipping week"),
        }
    }

    result
}
