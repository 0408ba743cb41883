//! Tests for calendar arithmetic and clock-time conversion.

use chrono::{Duration, NaiveDate};
use slot_engine::calendar::{
    add_days, at_minutes, clock_to_minutes, date_key, minute_of_day, minutes_between,
    minutes_to_clock, monday_of_week, parse_date_key, weekday_index, WEEKDAY_LABELS,
};
use slot_engine::SlotError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn monday_of_week_for_every_day_of_the_week() {
    // 2026-03-16 is a Monday.
    let monday = date(2026, 3, 16);
    for offset in 0..7 {
        assert_eq!(monday_of_week(add_days(monday, offset)), monday);
    }
}

#[test]
fn sunday_belongs_to_the_week_that_started_six_days_earlier() {
    assert_eq!(monday_of_week(date(2026, 3, 15)), date(2026, 3, 9));
}

#[test]
fn monday_of_week_across_a_year_boundary() {
    // 2027-01-01 is a Friday.
    assert_eq!(monday_of_week(date(2027, 1, 1)), date(2026, 12, 28));
}

#[test]
fn weekday_numbering_starts_at_sunday() {
    assert_eq!(weekday_index(date(2026, 3, 15)), 0);
    assert_eq!(weekday_index(date(2026, 3, 16)), 1);
    assert_eq!(weekday_index(date(2026, 3, 21)), 6);
    assert_eq!(WEEKDAY_LABELS[weekday_index(date(2026, 3, 18)) as usize], "Wed");
}

#[test]
fn add_days_handles_negative_offsets_and_month_ends() {
    assert_eq!(add_days(date(2026, 3, 1), -1), date(2026, 2, 28));
    assert_eq!(add_days(date(2026, 3, 16), 21), date(2026, 4, 6));
}

#[test]
fn date_key_is_zero_padded_and_parses_back() {
    let d = date(2026, 1, 5);
    assert_eq!(date_key(d), "2026-01-05");
    assert_eq!(parse_date_key("2026-01-05").unwrap(), d);
}

#[test]
fn invalid_date_keys_are_format_errors() {
    for bad in ["2026-02-30", "05/01/2026", "", "2026-1"] {
        assert!(
            matches!(parse_date_key(bad), Err(SlotError::Format(_))),
            "'{}' should be rejected",
            bad
        );
    }
}

#[test]
fn clock_to_minutes_parses_valid_times() {
    assert_eq!(clock_to_minutes("00:00").unwrap(), 0);
    assert_eq!(clock_to_minutes("07:00").unwrap(), 420);
    assert_eq!(clock_to_minutes("7:05").unwrap(), 425);
    assert_eq!(clock_to_minutes("23:59").unwrap(), 1439);
}

#[test]
fn clock_to_minutes_rejects_malformed_or_out_of_range_input() {
    for bad in [
        "", "07", "07:0", "24:00", "12:60", "ab:cd", "07:00:00", "-1:30", " 7:00", "123:00",
    ] {
        assert!(
            matches!(clock_to_minutes(bad), Err(SlotError::Format(_))),
            "'{}' should be rejected",
            bad
        );
    }
}

#[test]
fn minutes_to_clock_pads_both_fields() {
    assert_eq!(minutes_to_clock(0), "00:00");
    assert_eq!(minutes_to_clock(425), "07:05");
    assert_eq!(minutes_to_clock(1439), "23:59");
}

#[test]
fn clock_roundtrip_for_every_minute_of_the_day() {
    for m in 0..1440 {
        assert_eq!(clock_to_minutes(&minutes_to_clock(m)).unwrap(), m);
    }
}

#[test]
fn at_minutes_and_minute_of_day_agree() {
    let instant = at_minutes(date(2026, 3, 16), 13 * 60 + 30);
    assert_eq!(instant.to_string(), "2026-03-16 13:30:00");
    assert_eq!(minute_of_day(instant), 810);
}

#[test]
fn minutes_between_floors_partial_minutes() {
    let base = at_minutes(date(2026, 3, 16), 600);
    let later = base + Duration::seconds(30);
    assert_eq!(minutes_between(base, later), 0);
    assert_eq!(minutes_between(later, base), -1);
    assert_eq!(minutes_between(base, base + Duration::minutes(90)), 90);
}
