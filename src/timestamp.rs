//! Normalizes the assorted timestamp shapes found in comment dumps into the
//! `dd-mm-YYYY HH:MM` form used by the export document.
//!
//! Anything that cannot be read as a date silently becomes "now". Callers
//! cannot tell a real timestamp from the fallback.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::Value;

pub const DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Clock layouts accepted after the date; hour-only is handled separately
/// because chrono needs a minute to build a time.
const CLOCK_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%H%M%S%.f", "%H%M"];

/// Current local time in [`DATE_FORMAT`].
pub fn now_formatted() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// Formats `value` in the local timezone, falling back to the current time.
pub fn format_timestamp(value: Option<&Value>) -> String {
    format_timestamp_in(value, &Local, &Local::now())
}

/// Same as [`format_timestamp`] with the timezone and fallback instant
/// supplied by the caller.
pub fn format_timestamp_in<Tz: TimeZone>(
    value: Option<&Value>,
    tz: &Tz,
    now: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match value.and_then(|value| parse_value(value, tz)) {
        Some(formatted) => formatted,
        None => now.format(DATE_FORMAT).to_string(),
    }
}

fn parse_value<Tz: TimeZone>(value: &Value, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    match value {
        Value::Number(number) => number.as_i64().and_then(|secs| format_epoch(secs, tz)),
        Value::String(text) if is_all_digits(text) => {
            text.parse::<i64>().ok().and_then(|secs| format_epoch(secs, tz))
        }
        Value::String(text) => parse_iso(text),
        _ => None,
    }
}

fn is_all_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn format_epoch<Tz: TimeZone>(secs: i64, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::<Utc>::from_timestamp(secs, 0)?;
    Some(utc.with_timezone(tz).format(DATE_FORMAT).to_string())
}

/// ISO dates keep their own wall-clock time; an explicit offset is
/// validated but not converted to the local zone.
fn parse_iso(text: &str) -> Option<String> {
    parse_iso_naive(text.trim()).map(|dt| dt.format(DATE_FORMAT).to_string())
}

/// `YYYY-MM-DD`, optionally followed by `T` or a space and a clock of
/// `HH`, `HH:MM`, `HH:MM:SS[.fff]` (or their compact forms) with an optional
/// `Z` / `±HH[:MM]` offset.
fn parse_iso_naive(text: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(text.get(..10)?, "%Y-%m-%d").ok()?;
    let rest = &text[10..];
    if rest.is_empty() {
        return date.and_hms_opt(0, 0, 0);
    }

    let time_part = rest
        .strip_prefix(['T', 't', ' '])
        .filter(|part| !part.is_empty())?;
    let (clock, offset) = match time_part.find(['+', '-', 'Z', 'z']) {
        Some(index) => time_part.split_at(index),
        None => (time_part, ""),
    };
    if !is_valid_offset(offset) {
        return None;
    }
    parse_clock(clock).map(|time| date.and_time(time))
}

fn parse_clock(clock: &str) -> Option<NaiveTime> {
    if clock.len() == 2 && is_all_digits(clock) {
        return NaiveTime::from_hms_opt(clock.parse().ok()?, 0, 0);
    }
    CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(clock, format).ok())
}

fn is_valid_offset(offset: &str) -> bool {
    match offset {
        "" | "Z" | "z" => true,
        _ => DateTime::parse_from_str(&format!("2000-01-01T00:00{offset}"), "%Y-%m-%dT%H:%M%#z")
            .is_ok(),
    }
}
