//! Date/time decoding for calendar feeds.
//!
//! ICS feeds carry timestamps as compact tokens:
//! - `20250205` (date only, midnight)
//! - `20250205T100000` (local wall-clock time)
//! - `20250205T100000Z` (trailing UTC marker)
//!
//! Every value is interpreted as local wall-clock time. The trailing `Z` is
//! stripped but never converted, and `TZID` parameters are ignored by the
//! callers that hand tokens to this module.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Format of the `date` field on persisted events.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of the `startTime`/`endTime` fields on persisted events.
pub const CLOCK_FORMAT: &str = "%H:%M";

/// Length of the `YYYYMMDD` prefix every token starts with.
const DATE_TOKEN_LEN: usize = 8;

/// Returns the current local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parses an ICS date-time token.
///
/// Returns `None` when the token does not have one of the accepted shapes or
/// names an impossible calendar date. Time-of-day components missing from a
/// timed token (`20250205T10`) default to zero.
pub fn parse_ics_datetime(token: &str) -> Option<NaiveDateTime> {
    let token = token.trim();
    let token = token.strip_suffix('Z').unwrap_or(token);

    let date_part = token.get(..DATE_TOKEN_LEN)?;
    if !date_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let rest = &token[DATE_TOKEN_LEN..];
    if rest.is_empty() {
        return Some(date.and_time(NaiveTime::MIN));
    }

    let clock = rest.strip_prefix('T')?;
    if !clock.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour = clock_component(clock, 0)?;
    let minute = clock_component(clock, 2)?;
    let second = clock_component(clock, 4)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;

    Some(date.and_time(time))
}

/// Reads the two-digit component at `offset`, or zero when it is absent.
fn clock_component(clock: &str, offset: usize) -> Option<u32> {
    match clock.get(offset..(offset + 2).min(clock.len())) {
        None | Some("") => Some(0),
        Some(digits) => digits.parse().ok(),
    }
}

/// Decodes an ICS date-time token, falling back to `now` when it is malformed.
///
/// Callers relying on the decoded value must tolerate this fallback: a token
/// that cannot be decoded silently becomes the current moment.
pub fn decode_ics_datetime_at(token: &str, now: NaiveDateTime) -> NaiveDateTime {
    parse_ics_datetime(token).unwrap_or(now)
}

/// Decodes an ICS date-time token against the local clock.
pub fn decode_ics_datetime(token: &str) -> NaiveDateTime {
    decode_ics_datetime_at(token, local_now())
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a time of day as zero-padded `HH:MM`.
pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Parses an `HH:MM` time of day.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT).ok()
}

/// Returns the weekday index of a date, 0 = Sunday through 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}
