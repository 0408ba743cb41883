//! Walk a day's effective windows on the service's time grid.
//!
//! Each window yields candidates `[cursor, cursor + duration)` where the first
//! cursor is the smallest multiple of the grid at or after the window start, and
//! the last one still ends by the window end. A candidate is dropped if it
//! starts within the lead time of `now` (or in the past) or overlaps a booking
//! for the same service.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::booking::{Booking, Slot};
use crate::calendar::{date_key, minutes_between};
use crate::service::{Service, Window};

/// Generate the bookable slots of `service` on `day`.
///
/// `windows` are the day's effective windows (see
/// [`effective_windows`](crate::availability::effective_windows)). `bookings`
/// are that day's bookings; entries for other services are ignored.
///
/// The result is sorted by start time and holds at most one slot per start, so
/// overlapping windows cannot produce duplicates. No windows, or windows too
/// short for one appointment, yield an empty list.
pub fn generate_slots(
    day: NaiveDate,
    service: &Service,
    windows: &[Window],
    bookings: &[Booking],
    now: NaiveDateTime,
) -> Vec<Slot> {
    let booked: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.service_id == service.id)
        .collect();

    let grid = service.slot_grid_min;
    let duration = service.duration_min;
    let lead = i64::from(service.lead_time_min);

    let mut accepted: BTreeMap<u32, Slot> = BTreeMap::new();
    let mut too_soon = 0usize;
    let mut clashing = 0usize;

    for window in windows {
        let mut cursor = window.start().div_ceil(grid) * grid;
        while cursor + duration <= window.end() {
            let candidate = Slot::on_day(day, cursor, duration);
            cursor += grid;

            if minutes_between(now, candidate.start) < lead {
                too_soon += 1;
                continue;
            }
            if booked.iter().any(|b| candidate.overlaps(b)) {
                clashing += 1;
                continue;
            }
            accepted.entry(candidate.start_minute()).or_insert(candidate);
        }
    }

    debug!(
        service = %service.id,
        day = %date_key(day),
        accepted = accepted.len(),
        too_soon,
        clashing,
        "generated slots"
    );

    accepted.into_values().collect()
}
