//! Read-path queries over one snapshot of overrides, blackouts and bookings.
//!
//! [`AvailabilitySnapshot`] borrows the current state and chains the resolver,
//! the slot generator and the ranker the way a booking page needs them. It
//! holds no state of its own; build a new one whenever the inputs change.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::availability::{effective_windows, BlackoutSet, OverrideSet};
use crate::booking::{Booking, Slot};
use crate::calendar::{add_days, monday_of_week, weekday_index, WEEKDAY_LABELS};
use crate::recommend::{recommend, remaining_slots};
use crate::recurring;
use crate::service::Service;
use crate::slots::generate_slots;

/// Days shown per week in the booking grid: Monday through Saturday.
pub const GRID_DAYS_PER_WEEK: i64 = 6;

/// Weeks shown in the booking grid and offered for weekly repetition.
pub const DEFAULT_WEEKS: u32 = 4;

#[derive(Debug, Clone, Copy)]
pub struct AvailabilitySnapshot<'a> {
    pub overrides: &'a OverrideSet,
    pub blackouts: &'a BlackoutSet,
    pub bookings: &'a [Booking],
}

/// A day's slots split for display: recommendations first, then the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub recommended: Vec<Slot>,
    pub other: Vec<Slot>,
}

impl DaySlots {
    pub fn total(&self) -> usize {
        self.recommended.len() + self.other.len()
    }
}

/// One cell of the booking grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub available: usize,
    /// Earlier than today but inside the current week.
    pub past: bool,
}

impl<'a> AvailabilitySnapshot<'a> {
    pub fn new(
        overrides: &'a OverrideSet,
        blackouts: &'a BlackoutSet,
        bookings: &'a [Booking],
    ) -> Self {
        Self {
            overrides,
            blackouts,
            bookings,
        }
    }

    /// Bookings of `service` on `day`.
    pub fn day_bookings(&self, service: &Service, day: NaiveDate) -> Vec<Booking> {
        self.bookings
            .iter()
            .filter(|b| b.service_id == service.id && b.date == day)
            .cloned()
            .collect()
    }

    pub fn slots_for_day(&self, service: &Service, day: NaiveDate, now: NaiveDateTime) -> Vec<Slot> {
        let windows = effective_windows(day, service, self.overrides, self.blackouts);
        generate_slots(day, service, &windows, &self.day_bookings(service, day), now)
    }

    pub fn recommended_for_day(
        &self,
        service: &Service,
        day: NaiveDate,
        now: NaiveDateTime,
    ) -> DaySlots {
        let all = self.slots_for_day(service, day, now);
        let recommended = recommend(&all, &self.day_bookings(service, day));
        let other = remaining_slots(&all, &recommended);
        DaySlots {
            date: day,
            recommended,
            other,
        }
    }

    /// Repeat `slot` weekly for `weeks` weeks, re-checking each later week
    /// against this snapshot.
    pub fn expand_recurring(
        &self,
        service: &Service,
        slot: &Slot,
        weeks: u32,
        now: NaiveDateTime,
    ) -> Vec<Slot> {
        recurring::expand_recurring(slot, weeks, |day| self.slots_for_day(service, day, now))
    }

    /// Monday..Saturday of `weeks` weeks starting with the week of `today`.
    pub fn booking_grid(
        &self,
        service: &Service,
        today: NaiveDate,
        weeks: u32,
        now: NaiveDateTime,
    ) -> Vec<DayAvailability> {
        let monday = monday_of_week(today);
        (0..i64::from(weeks))
            .flat_map(|week| (0..GRID_DAYS_PER_WEEK).map(move |d| add_days(monday, week * 7 + d)))
            .map(|date| DayAvailability {
                date,
                weekday: WEEKDAY_LABELS[weekday_index(date) as usize],
                available: self.slots_for_day(service, date, now).len(),
                past: date < today,
            })
            .collect()
    }
}
