//! Tests for nearest-boundary recommendation ranking.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use slot_engine::calendar::{at_minutes, clock_to_minutes, minutes_to_clock};
use slot_engine::recommend::{recommend_up_to, remaining_slots, RECOMMENDATION_LIMIT};
use slot_engine::{generate_slots, recommend, Booking, Service, Slot, Window};

/// 2026-03-16 is a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn long_ago() -> NaiveDateTime {
    at_minutes(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), 0)
}

fn morning_service() -> Service {
    let mut windows = BTreeMap::new();
    windows.insert(1, vec![Window::parse("07:00", "13:00").unwrap()]);
    Service::new("pt_private", "PT @ Private Gym", 45, 15, 60, windows).unwrap()
}

fn booking(start: &str, end: &str) -> Booking {
    Booking::new(
        "pt_private",
        monday(),
        clock_to_minutes(start).unwrap(),
        clock_to_minutes(end).unwrap(),
    )
}

fn slot(start: &str) -> Slot {
    Slot::on_day(monday(), clock_to_minutes(start).unwrap(), 45)
}

fn starts(slots: &[Slot]) -> Vec<String> {
    slots.iter().map(|s| minutes_to_clock(s.start_minute())).collect()
}

fn day_slots(bookings: &[Booking]) -> Vec<Slot> {
    let svc = morning_service();
    let windows = svc.windows_for(1).to_vec();
    generate_slots(monday(), &svc, &windows, bookings, long_ago())
}

#[test]
fn no_bookings_means_no_recommendations() {
    let slots = day_slots(&[]);
    assert!(!slots.is_empty());
    assert!(recommend(&slots, &[]).is_empty());
}

#[test]
fn no_slots_means_no_recommendations() {
    assert!(recommend(&[], &[booking("10:00", "10:45")]).is_empty());
}

#[test]
fn ranks_by_distance_to_nearest_boundary_then_earliest_start() {
    let bookings = vec![booking("10:00", "10:45")];
    let picked = recommend(&day_slots(&bookings), &bookings);

    // 10:45 (0), 11:00 (15), 11:15 (30), then 09:15 and 11:30 tie at 45:
    // the earlier start wins.
    assert_eq!(starts(&picked), vec!["10:45", "11:00", "11:15", "09:15"]);
}

#[test]
fn never_returns_more_than_the_limit() {
    let bookings = vec![booking("08:00", "08:45"), booking("11:00", "11:45")];
    let picked = recommend(&day_slots(&bookings), &bookings);
    assert_eq!(picked.len(), RECOMMENDATION_LIMIT);
}

#[test]
fn boundaries_from_every_booking_count() {
    let bookings = vec![booking("08:00", "08:45"), booking("11:00", "11:45")];
    let picked = recommend(&day_slots(&bookings), &bookings);

    // Slots starting right at either booking's end are at distance 0, the
    // next grid step after each is at 15.
    assert_eq!(starts(&picked), vec!["08:45", "11:45", "09:00", "12:00"]);
}

#[test]
fn recommendations_are_a_subset_of_the_input() {
    let bookings = vec![booking("09:30", "10:15")];
    let slots = day_slots(&bookings);
    for s in recommend(&slots, &bookings) {
        assert!(slots.contains(&s));
    }
}

#[test]
fn duplicate_starts_are_recommended_once() {
    let slots = vec![slot("10:45"), slot("10:45"), slot("11:00")];
    let picked = recommend(&slots, &[booking("10:00", "10:45")]);
    assert_eq!(starts(&picked), vec!["10:45", "11:00"]);
}

#[test]
fn explicit_limit_is_respected() {
    let bookings = vec![booking("10:00", "10:45")];
    let slots = day_slots(&bookings);
    assert_eq!(starts(&recommend_up_to(&slots, &bookings, 2)), vec!["10:45", "11:00"]);
    assert!(recommend_up_to(&slots, &bookings, 0).is_empty());
}

#[test]
fn remaining_slots_excludes_recommendations_and_keeps_order() {
    let bookings = vec![booking("10:00", "10:45")];
    let slots = day_slots(&bookings);
    let picked = recommend(&slots, &bookings);
    let rest = remaining_slots(&slots, &picked);

    assert_eq!(rest.len() + picked.len(), slots.len());
    assert!(rest.windows(2).all(|w| w[0].start < w[1].start));
    assert!(rest.iter().all(|s| !picked.contains(s)));
}
