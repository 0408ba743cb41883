//! WASM bindings for slot-engine.
//!
//! Exposes the booking page's read path (effective windows, slot generation,
//! recommendations, weekly repetition, the 4-week grid) and the commit-time
//! conflict check to JavaScript via `wasm-bindgen`. All complex types are passed
//! as JSON strings in the same shapes the engine persists:
//!
//! - service: `{id, name, durationMin, slotGridMin, leadTimeMin, windows}`
//! - overrides: `{serviceId: {weekday: {start, end} | null}}`
//! - blackouts: `["YYYY-MM-DD", ...]`
//! - bookings: `[{serviceId, date, start: "HH:MM", end: "HH:MM"}, ...]`
//! - slots: `[{start: "YYYY-MM-DDTHH:MM:SS", end: ...}, ...]`
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Serialize;
use slot_engine::calendar::parse_date_key;
use slot_engine::service::ServiceConfig;
use slot_engine::{AvailabilitySnapshot, BlackoutSet, Booking, OverrideSet, Service, Slot, Window};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: JSON in, JSON out
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_json<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_service(json: &str) -> Result<Service, JsValue> {
    let raw: ServiceConfig = parse_json("service", json)?;
    Service::try_from(raw).map_err(js_err)
}

fn parse_day(s: &str) -> Result<NaiveDate, JsValue> {
    parse_date_key(s).map_err(js_err)
}

/// Parse a local datetime, with or without seconds (e.g., "2026-03-16T06:30").
fn parse_now(s: &str) -> Result<NaiveDateTime, JsValue> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

struct State {
    overrides: OverrideSet,
    blackouts: BlackoutSet,
    bookings: Vec<Booking>,
}

impl State {
    fn parse(overrides_json: &str, blackouts_json: &str, bookings_json: &str) -> Result<Self, JsValue> {
        Ok(Self {
            overrides: parse_json("overrides", overrides_json)?,
            blackouts: parse_json("blackouts", blackouts_json)?,
            bookings: parse_json("bookings", bookings_json)?,
        })
    }

    fn snapshot(&self) -> AvailabilitySnapshot<'_> {
        AvailabilitySnapshot::new(&self.overrides, &self.blackouts, &self.bookings)
    }
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Resolve a service's open windows on `day` (`YYYY-MM-DD`).
///
/// Returns a JSON array of `{start, end}` clock-time windows; empty when the day
/// is closed.
#[wasm_bindgen(js_name = "effectiveWindows")]
pub fn effective_windows(
    day: &str,
    service_json: &str,
    overrides_json: &str,
    blackouts_json: &str,
) -> Result<String, JsValue> {
    let service = parse_service(service_json)?;
    let overrides: OverrideSet = parse_json("overrides", overrides_json)?;
    let blackouts: BlackoutSet = parse_json("blackouts", blackouts_json)?;

    let windows = slot_engine::effective_windows(parse_day(day)?, &service, &overrides, &blackouts);
    to_json(&windows)
}

/// Generate bookable slots on `day` from explicit windows and bookings.
///
/// `now` is a local datetime string used for the lead-time check.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(
    day: &str,
    service_json: &str,
    windows_json: &str,
    bookings_json: &str,
    now: &str,
) -> Result<String, JsValue> {
    let service = parse_service(service_json)?;
    let windows: Vec<Window> = parse_json("windows", windows_json)?;
    let bookings: Vec<Booking> = parse_json("bookings", bookings_json)?;

    let slots = slot_engine::generate_slots(parse_day(day)?, &service, &windows, &bookings, parse_now(now)?);
    to_json(&slots)
}

/// Pick up to four slots packed tightest against the day's bookings.
#[wasm_bindgen(js_name = "recommend")]
pub fn recommend(slots_json: &str, bookings_json: &str) -> Result<String, JsValue> {
    let slots: Vec<Slot> = parse_json("slots", slots_json)?;
    let bookings: Vec<Booking> = parse_json("bookings", bookings_json)?;
    to_json(&slot_engine::recommend(&slots, &bookings))
}

/// Repeat a chosen slot on the same weekday for `weeks` weeks, keeping only the
/// weeks where that exact time is still free.
#[wasm_bindgen(js_name = "expandRecurring")]
pub fn expand_recurring(
    slot_json: &str,
    weeks: u32,
    service_json: &str,
    overrides_json: &str,
    blackouts_json: &str,
    bookings_json: &str,
    now: &str,
) -> Result<String, JsValue> {
    let slot: Slot = parse_json("slot", slot_json)?;
    let service = parse_service(service_json)?;
    let state = State::parse(overrides_json, blackouts_json, bookings_json)?;

    let slots = state.snapshot().expand_recurring(&service, &slot, weeks, parse_now(now)?);
    to_json(&slots)
}

/// Available-slot counts for Monday..Saturday of `weeks` weeks from `today`.
#[wasm_bindgen(js_name = "bookingGrid")]
pub fn booking_grid(
    service_json: &str,
    today: &str,
    weeks: u32,
    overrides_json: &str,
    blackouts_json: &str,
    bookings_json: &str,
    now: &str,
) -> Result<String, JsValue> {
    let service = parse_service(service_json)?;
    let state = State::parse(overrides_json, blackouts_json, bookings_json)?;

    let grid = state
        .snapshot()
        .booking_grid(&service, parse_day(today)?, weeks, parse_now(now)?);
    to_json(&grid)
}

/// Check a proposed booking against the latest bookings before committing.
///
/// Returns a JSON array of `{existing, overlapMinutes}`; empty means the
/// booking is safe to write.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(booking_json: &str, bookings_json: &str) -> Result<String, JsValue> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ConflictDto<'a> {
        existing: &'a Booking,
        overlap_minutes: i64,
    }

    let proposed: Booking = parse_json("booking", booking_json)?;
    let bookings: Vec<Booking> = parse_json("bookings", bookings_json)?;

    let conflicts = slot_engine::find_conflicts(&proposed, &bookings);
    let dtos: Vec<ConflictDto<'_>> = conflicts
        .iter()
        .map(|c| ConflictDto {
            existing: &c.existing,
            overlap_minutes: c.overlap_minutes,
        })
        .collect();
    to_json(&dtos)
}
