//! RFC 3339 date/time parsing and formatting.
//!
//! Publication timestamps and `date`/`dateTime`/`time` property values arrive
//! as RFC 3339 strings. They are kept as:
//! - [`Timestamp`]: microseconds since Unix epoch + offset in minutes
//! - dates: days since Unix epoch + offset in minutes
//! - times: microseconds since midnight + offset in minutes

use std::fmt;

use serde::{Serialize, Serializer};

const MICROSECONDS_PER_SECOND: i64 = 1_000_000;
const MICROSECONDS_PER_MINUTE: i64 = 60 * MICROSECONDS_PER_SECOND;
const MICROSECONDS_PER_HOUR: i64 = 60 * MICROSECONDS_PER_MINUTE;
const MICROSECONDS_PER_DAY: i64 = 24 * MICROSECONDS_PER_HOUR;

/// Error type for RFC 3339 parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError {
    pub message: String,
}

impl DateTimeParseError {
    fn new(what: &str, input: &str) -> Self {
        Self {
            message: format!("Invalid {}: {}", what, input),
        }
    }
}

impl fmt::Display for DateTimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DateTimeParseError {}

/// A point in time with the UTC offset it was published with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    /// Microseconds since 1970-01-01T00:00:00Z.
    pub epoch_us: i64,
    /// Signed UTC offset in minutes (e.g., +330 for +05:30).
    pub offset_min: i16,
}

impl Timestamp {
    /// Parses an RFC 3339 datetime (`YYYY-MM-DDTHH:MM:SS[.ffffff][Z|±HH:MM]`).
    ///
    /// A missing offset is read as UTC.
    pub fn parse(s: &str) -> Result<Self, DateTimeParseError> {
        let (epoch_us, offset_min) = parse_datetime_rfc3339(s)?;
        Ok(Self {
            epoch_us,
            offset_min,
        })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_datetime_rfc3339(self.epoch_us, self.offset_min))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses a timezone offset string (Z, +HH:MM, -HH:MM) and returns offset in minutes.
fn parse_timezone_offset(offset: &str) -> Result<i16, DateTimeParseError> {
    if offset == "Z" || offset == "z" {
        return Ok(0);
    }

    let invalid = || DateTimeParseError::new("timezone offset", offset);
    if offset.len() != 6 || !offset.is_ascii() || offset.as_bytes()[3] != b':' {
        return Err(invalid());
    }

    let sign = match offset.as_bytes()[0] {
        b'+' => 1i16,
        b'-' => -1i16,
        _ => return Err(invalid()),
    };
    let hours: i16 = offset[1..3].parse().map_err(|_| invalid())?;
    let minutes: i16 = offset[4..6].parse().map_err(|_| invalid())?;

    // ±24:00 is the widest offset accepted
    if hours > 24 || (hours == 24 && minutes != 0) || minutes > 59 {
        return Err(invalid());
    }

    Ok(sign * (hours * 60 + minutes))
}

/// Formats an offset in minutes as a timezone string (Z, +HH:MM, -HH:MM).
fn format_timezone_offset(offset_min: i16) -> String {
    if offset_min == 0 {
        return "Z".to_string();
    }

    let sign = if offset_min >= 0 { '+' } else { '-' };
    let abs_offset = offset_min.abs();
    format!("{}{:02}:{:02}", sign, abs_offset / 60, abs_offset % 60)
}

/// Parses fractional seconds and returns microseconds (truncated to 6 digits).
fn parse_fractional_seconds(frac: &str) -> i64 {
    let digits: String = frac.chars().chain(std::iter::repeat('0')).take(6).collect();
    digits.parse().unwrap_or(0)
}

/// Formats microseconds as fractional seconds string, omitting if zero.
fn format_fractional_seconds(us: i64) -> String {
    if us == 0 {
        return String::new();
    }
    let digits = format!("{:06}", us);
    format!(".{}", digits.trim_end_matches('0'))
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Calculates days since Unix epoch for a civil date (Howard Hinnant's algorithm).
fn date_to_days(year: i32, month: u32, day: u32) -> i32 {
    let y = if month <= 2 { year - 1 } else { year } as i64;
    let m = if month <= 2 { month as i64 + 9 } else { month as i64 - 3 };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32;
    let doy = (153 * m as u32 + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;

    (era * 146097 + doe as i64 - 719468) as i32
}

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: i32) -> (i32, u32, u32) {
    let z = days as i64 + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };

    let year = if m <= 2 { y + 1 } else { y } as i32;
    (year, m, d)
}

/// Parses `YYYY-MM-DD` into days since Unix epoch.
fn parse_civil_date(date_part: &str, input: &str) -> Result<i32, DateTimeParseError> {
    let invalid = || DateTimeParseError::new("date", input);
    if date_part.len() != 10
        || !date_part.is_ascii()
        || date_part.as_bytes()[4] != b'-'
        || date_part.as_bytes()[7] != b'-'
    {
        return Err(invalid());
    }

    let year: i32 = date_part[..4].parse().map_err(|_| invalid())?;
    let month: u32 = date_part[5..7].parse().map_err(|_| invalid())?;
    let day: u32 = date_part[8..10].parse().map_err(|_| invalid())?;

    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
        return Err(invalid());
    }

    Ok(date_to_days(year, month, day))
}

/// Parses `HH:MM:SS[.ffffff][offset]` into microseconds since midnight and offset.
fn parse_clock(time_part: &str, input: &str) -> Result<(i64, i16), DateTimeParseError> {
    let invalid = || DateTimeParseError::new("time", input);
    // Byte offsets below assume one byte per character.
    if time_part.len() < 8
        || !time_part.is_ascii()
        || time_part.as_bytes()[2] != b':'
        || time_part.as_bytes()[5] != b':'
    {
        return Err(invalid());
    }

    let hours: i64 = time_part[..2].parse().map_err(|_| invalid())?;
    let minutes: i64 = time_part[3..5].parse().map_err(|_| invalid())?;
    let seconds: i64 = time_part[6..8].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(invalid());
    }

    let rest = &time_part[8..];
    let (fraction, offset) = match rest.strip_prefix('.') {
        Some(frac) => {
            let end = frac.find(|c: char| !c.is_ascii_digit()).unwrap_or(frac.len());
            (parse_fractional_seconds(&frac[..end]), &frac[end..])
        }
        None => (0, rest),
    };

    let offset_min = if offset.is_empty() {
        0
    } else {
        parse_timezone_offset(offset)?
    };

    let micros = hours * MICROSECONDS_PER_HOUR
        + minutes * MICROSECONDS_PER_MINUTE
        + seconds * MICROSECONDS_PER_SECOND
        + fraction;
    Ok((micros, offset_min))
}

// =====================
// DATE functions
// =====================

/// Parses an RFC 3339 date string (YYYY-MM-DD with optional timezone) and returns
/// days since Unix epoch and offset in minutes.
pub fn parse_date_rfc3339(date_str: &str) -> Result<(i32, i16), DateTimeParseError> {
    if date_str.len() < 10 || !date_str.is_char_boundary(10) {
        return Err(DateTimeParseError::new("date", date_str));
    }
    let days = parse_civil_date(&date_str[..10], date_str)?;
    let offset_min = match &date_str[10..] {
        "" => 0,
        offset => parse_timezone_offset(offset)?,
    };
    Ok((days, offset_min))
}

/// Formats days since Unix epoch as RFC 3339 date string.
pub fn format_date_rfc3339(days: i32, offset_min: i16) -> String {
    let (year, month, day) = days_to_date(days);
    format!(
        "{:04}-{:02}-{:02}{}",
        year,
        month,
        day,
        format_timezone_offset(offset_min)
    )
}

// =====================
// TIME functions
// =====================

/// Parses an RFC 3339 time string (HH:MM:SS[.ssssss][Z|+HH:MM]) and returns
/// microseconds since midnight and offset in minutes.
pub fn parse_time_rfc3339(time_str: &str) -> Result<(i64, i16), DateTimeParseError> {
    parse_clock(time_str, time_str)
}

/// Formats microseconds since midnight as RFC 3339 time string.
pub fn format_time_rfc3339(time_micros: i64, offset_min: i16) -> String {
    let hours = time_micros / MICROSECONDS_PER_HOUR;
    let minutes = (time_micros % MICROSECONDS_PER_HOUR) / MICROSECONDS_PER_MINUTE;
    let seconds = (time_micros % MICROSECONDS_PER_MINUTE) / MICROSECONDS_PER_SECOND;
    let micros = time_micros % MICROSECONDS_PER_SECOND;

    format!(
        "{:02}:{:02}:{:02}{}{}",
        hours,
        minutes,
        seconds,
        format_fractional_seconds(micros),
        format_timezone_offset(offset_min)
    )
}

// =====================
// DATETIME functions
// =====================

/// Parses an RFC 3339 datetime string and returns microseconds since Unix epoch
/// and offset in minutes.
pub fn parse_datetime_rfc3339(datetime_str: &str) -> Result<(i64, i16), DateTimeParseError> {
    if datetime_str.len() < 19 || !datetime_str.is_char_boundary(10) {
        return Err(DateTimeParseError::new("datetime", datetime_str));
    }
    if !matches!(datetime_str.as_bytes()[10], b'T' | b't' | b' ') {
        return Err(DateTimeParseError::new("datetime", datetime_str));
    }

    let days = parse_civil_date(&datetime_str[..10], datetime_str)? as i64;
    let (time_micros, offset_min) = parse_clock(&datetime_str[11..], datetime_str)?;

    // local = UTC + offset, so UTC = local - offset
    let local_us = days * MICROSECONDS_PER_DAY + time_micros;
    let epoch_us = local_us - offset_min as i64 * MICROSECONDS_PER_MINUTE;

    Ok((epoch_us, offset_min))
}

/// Formats microseconds since Unix epoch as RFC 3339 datetime string.
pub fn format_datetime_rfc3339(epoch_micros: i64, offset_min: i16) -> String {
    let local_us = epoch_micros + offset_min as i64 * MICROSECONDS_PER_MINUTE;
    let days = local_us.div_euclid(MICROSECONDS_PER_DAY) as i32;
    let time_micros = local_us.rem_euclid(MICROSECONDS_PER_DAY);

    let (year, month, day) = days_to_date(days);
    let clock = format_time_rfc3339(time_micros, offset_min);

    format!("{:04}-{:02}-{:02}T{}", year, month, day, clock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_publication_timestamp() {
        let ts = Timestamp::parse("2024-03-15T14:30:00Z").unwrap();
        assert_eq!(ts.epoch_us, 1_710_513_000_000_000);
        assert_eq!(ts.offset_min, 0);
        assert_eq!(ts.to_string(), "2024-03-15T14:30:00Z");
    }

    #[test]
    fn test_timestamp_without_offset_is_utc() {
        let ts = Timestamp::parse("1970-01-01T00:00:01").unwrap();
        assert_eq!(ts.epoch_us, 1_000_000);
        assert_eq!(ts.to_string(), "1970-01-01T00:00:01Z");
    }

    #[test]
    fn test_timestamp_with_offset() {
        let local = Timestamp::parse("2024-03-15T14:30:00+05:30").unwrap();
        let utc = Timestamp::parse("2024-03-15T09:00:00Z").unwrap();
        assert_eq!(local.epoch_us, utc.epoch_us);
        assert_eq!(local.to_string(), "2024-03-15T14:30:00+05:30");
    }

    #[test]
    fn test_timestamp_serializes_as_string() {
        let ts = Timestamp::parse("2023-05-10T14:33:05.25Z").unwrap();
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            "\"2023-05-10T14:33:05.25Z\""
        );
    }

    #[test]
    fn test_negative_epoch() {
        let (epoch_micros, offset) = parse_datetime_rfc3339("1969-12-31T23:59:59Z").unwrap();
        assert_eq!(epoch_micros, -1_000_000);
        assert_eq!(format_datetime_rfc3339(epoch_micros, offset), "1969-12-31T23:59:59Z");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date_rfc3339("1970-01-01").unwrap(), (0, 0));
        assert_eq!(parse_date_rfc3339("2024-03-15+05:30").unwrap(), (19797, 330));
        assert_eq!(format_date_rfc3339(19797, -300), "2024-03-15-05:00");
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time_rfc3339("14:30:00.5Z").unwrap(), (52_200_500_000, 0));
        assert_eq!(format_time_rfc3339(52_200_123_456, 330), "14:30:00.123456+05:30");
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(parse_date_rfc3339("2023-02-29").is_err());
        assert!(parse_date_rfc3339("not-a-date").is_err());
        assert!(parse_time_rfc3339("24:00:00").is_err());
        assert!(Timestamp::parse("2024-03-15").is_err());
        assert!(Timestamp::parse("2024-03-15T14:30:00+24:01").is_err());
    }

    #[test]
    fn test_non_ascii_inputs_are_rejected() {
        assert!(Timestamp::parse("2024-01-01T00:00:0é").is_err());
        assert!(Timestamp::parse("2024-01-01T00:00:00+0é:00").is_err());
        assert!(parse_time_rfc3339("12:3é:00").is_err());
        assert!(parse_date_rfc3339("2024-0é-1").is_err());
    }
}
