//! Slots offered to a client and the bookings they turn into.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::{self, at_minutes, date_key, minute_of_day, minutes_to_clock};
use crate::error::SlotError;

/// A candidate bookable interval. Computed fresh per query, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Slot {
    /// The slot `[start_min, start_min + duration_min)` on `day`.
    pub fn on_day(day: NaiveDate, start_min: u32, duration_min: u32) -> Self {
        Self {
            start: at_minutes(day, start_min),
            end: at_minutes(day, start_min + duration_min),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn start_minute(&self) -> u32 {
        minute_of_day(self.start)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Half-open overlap: touching endpoints do not overlap.
    pub fn overlaps(&self, booking: &Booking) -> bool {
        self.start < booking.end_at() && booking.start_at() < self.end
    }
}

/// A confirmed commitment for one service.
///
/// Stored as `{serviceId, date: "YYYY-MM-DD", start: "HH:MM", end: "HH:MM"}`,
/// which keeps the calendar date independent of any time zone. A record whose
/// start is not before its end fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BookingRecord", into = "BookingRecord")]
pub struct Booking {
    pub service_id: String,
    pub date: NaiveDate,
    pub start: u32,
    pub end: u32,
}

/// Wire shape of a [`Booking`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub service_id: String,
    pub date: NaiveDate,
    #[serde(with = "calendar::clock_serde")]
    pub start: u32,
    #[serde(with = "calendar::clock_serde")]
    pub end: u32,
}

impl TryFrom<BookingRecord> for Booking {
    type Error = SlotError;

    fn try_from(raw: BookingRecord) -> Result<Self, SlotError> {
        if raw.start >= raw.end {
            return Err(SlotError::Format(format!(
                "booking for '{}' on {} runs from {} to {}; start must be before end",
                raw.service_id,
                date_key(raw.date),
                minutes_to_clock(raw.start),
                minutes_to_clock(raw.end)
            )));
        }
        Ok(Booking::new(raw.service_id, raw.date, raw.start, raw.end))
    }
}

impl From<Booking> for BookingRecord {
    fn from(b: Booking) -> Self {
        Self {
            service_id: b.service_id,
            date: b.date,
            start: b.start,
            end: b.end,
        }
    }
}

impl Booking {
    pub fn new(service_id: impl Into<String>, date: NaiveDate, start: u32, end: u32) -> Self {
        Self {
            service_id: service_id.into(),
            date,
            start,
            end,
        }
    }

    /// Record an offered slot as a booking for `service_id`.
    pub fn from_slot(service_id: impl Into<String>, slot: &Slot) -> Self {
        Self {
            service_id: service_id.into(),
            date: slot.date(),
            start: slot.start_minute(),
            end: minute_of_day(slot.end),
        }
    }

    pub fn start_at(&self) -> NaiveDateTime {
        at_minutes(self.date, self.start)
    }

    pub fn end_at(&self) -> NaiveDateTime {
        at_minutes(self.date, self.end)
    }

    /// Whether two bookings for the same service and date share any minute.
    pub fn overlaps(&self, other: &Booking) -> bool {
        self.service_id == other.service_id
            && self.date == other.date
            && self.start < other.end
            && other.start < self.end
    }
}
