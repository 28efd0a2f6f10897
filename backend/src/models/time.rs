use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentinel rendered wherever a time of day is unknown.
pub const NOT_AVAILABLE: &str = "N/A";

/// Leading `H:MM` or `HH:MM`; anything after the minutes (seconds, fractions) is ignored.
static CLOCK_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-9]{2})").expect("clock prefix pattern is valid")
});

/// Normalize a raw time string to `HH:MM`.
///
/// - `None`, `""` and `"N/A"` become `"N/A"`.
/// - `"8:00"`, `"08:00:00"`, `"8:05:30.123"` become `"08:00"`, `"08:00"`, `"08:05"`.
/// - Anything else is returned unchanged.
pub fn format_time(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(value) if !value.is_empty() && value != NOT_AVAILABLE => value,
        _ => return NOT_AVAILABLE.to_string(),
    };

    match CLOCK_PREFIX.captures(raw) {
        Some(caps) => format!("{:0>2}:{}", &caps[1], &caps[2]),
        None => raw.to_string(),
    }
}

/// True when a formatted value holds an actual time rather than the sentinel.
pub fn is_available(formatted: &str) -> bool {
    formatted != NOT_AVAILABLE
}

/// Parse the leading `H:MM` of a string into a time of day.
///
/// Out-of-range values such as `"25:00"` yield `None`.
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let caps = CLOCK_PREFIX.captures(raw.trim())?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Format a time of day as `HH:MM`.
pub fn clock_label(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Add minutes to an `H:MM` time, wrapping past midnight.
pub fn add_minutes(raw: &str, minutes: i64) -> Option<String> {
    let start = parse_clock(raw)?;
    let (end, _) = start.overflowing_add_signed(Duration::minutes(minutes));
    Some(clock_label(end))
}

/// Combine a date with an optional `H:MM` start time.
///
/// An unparsable time leaves the timestamp at midnight.
pub fn timestamp_of(date: NaiveDate, start: Option<&str>) -> NaiveDateTime {
    let time = start.and_then(parse_clock).unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
