use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;

use super::*;

#[test]
fn test_format_time_pads_single_digit_hour() {
    assert_eq!(format_time(Some("8:00")), "08:00");
    assert_eq!(format_time(Some("9:50")), "09:50");
}

#[test]
fn test_format_time_keeps_two_digit_hour() {
    assert_eq!(format_time(Some("13:40")), "13:40");
}

#[test]
fn test_format_time_truncates_seconds_and_fraction() {
    assert_eq!(format_time(Some("07:00:00")), "07:00");
    assert_eq!(format_time(Some("7:05:30.250")), "07:05");
}

#[test]
fn test_format_time_missing_values() {
    assert_eq!(format_time(None), NOT_AVAILABLE);
    assert_eq!(format_time(Some("")), NOT_AVAILABLE);
    assert_eq!(format_time(Some("N/A")), NOT_AVAILABLE);
    assert_eq!(format_time(None), format_time(Some("N/A")));
}

#[test]
fn test_format_time_passthrough() {
    assert_eq!(format_time(Some("mañana")), "mañana");
    assert_eq!(format_time(Some("123:45")), "123:45");
    assert_eq!(format_time(Some(" 8:00")), " 8:00");
}

#[test]
fn test_parse_clock() {
    assert_eq!(parse_clock("8:15"), NaiveTime::from_hms_opt(8, 15, 0));
    assert_eq!(parse_clock("23:59:59"), NaiveTime::from_hms_opt(23, 59, 0));
    assert_eq!(parse_clock("25:00"), None);
    assert_eq!(parse_clock("N/A"), None);
}

#[test]
fn test_add_minutes() {
    assert_eq!(add_minutes("15:00", 40).as_deref(), Some("15:40"));
    assert_eq!(add_minutes("9:30", 40).as_deref(), Some("10:10"));
    assert_eq!(add_minutes("23:50", 40).as_deref(), Some("00:30"));
    assert_eq!(add_minutes("later", 40), None);
}

#[test]
fn test_timestamp_of() {
    let date = NaiveDate::from_ymd_opt(2025, 10, 12).unwrap();
    let ts = timestamp_of(date, Some("15:00"));
    assert_eq!(ts, date.and_hms_opt(15, 0, 0).unwrap());

    let midnight = timestamp_of(date, Some("soon"));
    assert_eq!(midnight, date.and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(timestamp_of(date, None), midnight);
}

proptest! {
    #[test]
    fn prop_format_time_two_digit_hour(
        hour in 0u32..24,
        minute in 0u32..60,
        padded in any::<bool>(),
    ) {
        let raw = if padded {
            format!("{:02}:{:02}", hour, minute)
        } else {
            format!("{}:{:02}", hour, minute)
        };
        let formatted = format_time(Some(&raw));
        prop_assert_eq!(formatted.len(), 5);
        prop_assert_eq!(&formatted[2..3], ":");
        prop_assert_eq!(formatted.clone(), format!("{:02}:{:02}", hour, minute));
    }

    #[test]
    fn prop_format_time_idempotent(raw in "\\PC{0,12}") {
        let once = format_time(Some(&raw));
        let twice = format_time(Some(&once));
        prop_assert_eq!(once, twice);
    }
}
