//! ISO-8601 (and RFC 1123) text printing and parsing.
//!
//! Each canonical form has a printer/parser pair; the `Display` and
//! `FromStr` implementations on the value types delegate to the
//! canonical form for their type. Parsing is strict: shapes must
//! match exactly, numbers must be in range, and trailing input is an
//! error. Month and weekday names are matched case-insensitively.

use core::fmt::{self, Write};

use crate::components::date::LocalDate;
use crate::components::datetime::LocalDateTime;
use crate::components::offset::ZoneOffset;
use crate::components::offset_datetime::OffsetDateTime;
use crate::components::time::LocalTime;
use crate::components::weekday::Weekday;
use crate::components::zoneddatetime::ZonedDateTime;
use crate::error::CivilError;
use crate::fields::TemporalField;
use crate::zone::ZoneId;
use crate::CivilResult;

pub(crate) mod scan;

use scan::Scanner;

const MONTH_SHORT_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const WEEKDAY_SHORT_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

// ==== Printers ====

/// Writes a proleptic year: zero-padded to four digits, `-` prefixed
/// when negative, `+` prefixed (with up to ten digits) above 9999.
fn write_year<W: Write>(out: &mut W, year: i32) -> fmt::Result {
    if year < 0 {
        write!(out, "-{:04}", i64::from(year).unsigned_abs())
    } else if year > 9999 {
        write!(out, "+{year}")
    } else {
        write!(out, "{year:04}")
    }
}

pub(crate) fn write_iso_local_date<W: Write>(out: &mut W, date: &LocalDate) -> fmt::Result {
    write_year(out, date.year())?;
    write!(out, "-{:02}-{:02}", date.month(), date.day())
}

/// Writes `HH:MM:SS` with the fraction in 3, 6, or 9 digit groups,
/// elided entirely when zero.
pub(crate) fn write_iso_local_time<W: Write>(out: &mut W, time: &LocalTime) -> fmt::Result {
    write!(
        out,
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )?;
    let nano = time.nano();
    if nano == 0 {
        return Ok(());
    }
    if nano % 1_000_000 == 0 {
        write!(out, ".{:03}", nano / 1_000_000)
    } else if nano % 1_000 == 0 {
        write!(out, ".{:06}", nano / 1_000)
    } else {
        write!(out, ".{nano:09}")
    }
}

/// `YYYY-MM-DD`.
#[must_use]
pub fn format_iso_local_date(date: &LocalDate) -> String {
    date.to_string()
}

/// `YYYY-MM-DD±HH:MM`.
#[must_use]
pub fn format_iso_offset_date(date: &LocalDate, offset: ZoneOffset) -> String {
    format!("{date}{offset}")
}

/// `HH:MM:SS[.fff]`.
#[must_use]
pub fn format_iso_local_time(time: &LocalTime) -> String {
    time.to_string()
}

/// `HH:MM:SS[.fff]±HH:MM`.
#[must_use]
pub fn format_iso_offset_time(time: &LocalTime, offset: ZoneOffset) -> String {
    format!("{time}{offset}")
}

/// `YYYY-MM-DDTHH:MM:SS[.fff]`.
#[must_use]
pub fn format_iso_local_date_time(datetime: &LocalDateTime) -> String {
    datetime.to_string()
}

/// `YYYY-MM-DDTHH:MM:SS[.fff]±HH:MM`.
#[must_use]
pub fn format_iso_offset_date_time(datetime: &OffsetDateTime) -> String {
    datetime.to_string()
}

/// The offset form plus a `[region]` suffix for region zones.
#[must_use]
pub fn format_iso_zoned_date_time(datetime: &ZonedDateTime) -> String {
    datetime.to_string()
}

/// `YYYY-DDD`.
#[must_use]
pub fn format_iso_ordinal_date(date: &LocalDate) -> String {
    let mut out = String::new();
    let _ = write_year(&mut out, date.year());
    let _ = write!(out, "-{:03}", date.day_of_year());
    out
}

/// `YYYY-Www-D`, the ISO week date.
#[must_use]
pub fn format_iso_week_date(date: &LocalDate) -> String {
    let (week_year, week) = date.iso_week();
    let mut out = String::new();
    let _ = write_year(&mut out, week_year);
    let _ = write!(out, "-W{:02}-{}", week, date.day_of_week().iso_number());
    out
}

/// `YYYYMMDD`; limited to years 0..=9999.
pub fn format_basic_iso_date(date: &LocalDate) -> CivilResult<String> {
    if !(0..=9999).contains(&date.year()) {
        return Err(CivilError::ValueOutOfRange {
            field: TemporalField::Year,
            value: i64::from(date.year()),
            min: 0,
            max: 9999,
        });
    }
    Ok(format!(
        "{:04}{:02}{:02}",
        date.year(),
        date.month(),
        date.day()
    ))
}

/// `EEE, dd MMM yyyy HH:mm:ss X` with English names; the offset
/// prints as `Z` for UTC, else `±HHMM`.
pub fn format_rfc1123(datetime: &OffsetDateTime) -> CivilResult<String> {
    let date = datetime.date();
    let time = datetime.time();
    if !(0..=9999).contains(&date.year()) {
        return Err(CivilError::ValueOutOfRange {
            field: TemporalField::Year,
            value: i64::from(date.year()),
            min: 0,
            max: 9999,
        });
    }
    let offset_seconds = datetime.offset().total_seconds();
    if offset_seconds % 60 != 0 {
        return Err(CivilError::ParseError {
            input: datetime.offset().id(),
            error_index: 0,
            message: "offset must be whole minutes for RFC 1123",
        });
    }
    let mut out = String::new();
    let _ = write!(
        out,
        "{}, {:02} {} {:04} {:02}:{:02}:{:02} ",
        date.day_of_week().short_name(),
        date.day(),
        MONTH_SHORT_NAMES[usize::from(date.month()) - 1],
        date.year(),
        time.hour(),
        time.minute(),
        time.second()
    );
    if offset_seconds == 0 {
        out.push('Z');
    } else {
        let magnitude = i64::from(offset_seconds).unsigned_abs();
        let _ = write!(
            out,
            "{}{:02}{:02}",
            if offset_seconds < 0 { '-' } else { '+' },
            magnitude / 3_600,
            (magnitude / 60) % 60
        );
    }
    Ok(out)
}

// ==== Parsers ====

fn scan_year(scanner: &mut Scanner<'_>) -> CivilResult<i32> {
    let (value, negative) = match scanner.peek() {
        Some(b'+') => {
            scanner.bump();
            (scanner.digits_up_to(4, 10, "expected year digits")?.0, false)
        }
        Some(b'-') => {
            scanner.bump();
            (scanner.digits_up_to(4, 10, "expected year digits")?.0, true)
        }
        _ => (scanner.digits(4, "expected a 4-digit year")?, false),
    };
    let year = if negative { -value } else { value };
    TemporalField::Year
        .base_range()
        .check(year, TemporalField::Year)?;
    Ok(year as i32)
}

fn scan_date(scanner: &mut Scanner<'_>) -> CivilResult<LocalDate> {
    let year = scan_year(scanner)?;
    scanner.expect(b'-', "expected '-' after the year")?;
    let month = scanner.digits(2, "expected a 2-digit month")?;
    scanner.expect(b'-', "expected '-' after the month")?;
    let day = scanner.digits(2, "expected a 2-digit day")?;
    LocalDate::of(year, month as u8, day as u8)
}

fn scan_time(scanner: &mut Scanner<'_>) -> CivilResult<LocalTime> {
    let hour = scanner.digits(2, "expected a 2-digit hour")?;
    scanner.expect(b':', "expected ':' after the hour")?;
    let minute = scanner.digits(2, "expected a 2-digit minute")?;
    let mut second = 0i64;
    let mut nano = 0i64;
    if scanner.eat(b':') {
        second = scanner.digits(2, "expected a 2-digit second")?;
        if scanner.eat(b'.') {
            let (fraction, length) = scanner.digits_up_to(1, 9, "expected fraction digits")?;
            nano = fraction * 10i64.pow(9 - length as u32);
        }
    }
    LocalTime::of_hms_nano(hour as u8, minute as u8, second as u8, nano as u32)
}

/// Scans an offset identifier: `Z` or `±HH[[:]MM[[:]SS]]`.
pub(crate) fn scan_offset(scanner: &mut Scanner<'_>) -> CivilResult<ZoneOffset> {
    let sign = match scanner.peek() {
        Some(b'Z' | b'z') => {
            scanner.bump();
            return Ok(ZoneOffset::UTC);
        }
        Some(b'+') => 1,
        Some(b'-') => -1,
        _ => return Err(scanner.error("expected an offset")),
    };
    scanner.bump();
    let hours = scanner.digits(2, "expected 2-digit offset hours")?;
    let mut minutes = 0i64;
    let mut seconds = 0i64;
    if scanner.eat(b':') {
        minutes = scanner.digits(2, "expected 2-digit offset minutes")?;
        if scanner.eat(b':') {
            seconds = scanner.digits(2, "expected 2-digit offset seconds")?;
        }
    } else if matches!(scanner.peek(), Some(b'0'..=b'9')) {
        minutes = scanner.digits(2, "expected 2-digit offset minutes")?;
        if matches!(scanner.peek(), Some(b'0'..=b'9')) {
            seconds = scanner.digits(2, "expected 2-digit offset seconds")?;
        }
    }
    if minutes > 59 {
        return Err(scanner.error("offset minutes must be 0..=59"));
    }
    if seconds > 59 {
        return Err(scanner.error("offset seconds must be 0..=59"));
    }
    let total = sign * (hours * 3_600 + minutes * 60 + seconds);
    ZoneOffset::of_total_seconds(total as i32)
}

/// Parses `YYYY-MM-DD`.
pub fn parse_iso_local_date(input: &str) -> CivilResult<LocalDate> {
    let mut scanner = Scanner::new(input);
    let date = scan_date(&mut scanner)?;
    scanner.expect_end()?;
    Ok(date)
}

/// Parses `YYYY-MM-DD±HH:MM`.
pub fn parse_iso_offset_date(input: &str) -> CivilResult<(LocalDate, ZoneOffset)> {
    let mut scanner = Scanner::new(input);
    let date = scan_date(&mut scanner)?;
    let offset = scan_offset(&mut scanner)?;
    scanner.expect_end()?;
    Ok((date, offset))
}

/// Parses `HH:MM[:SS[.fff]]`.
pub fn parse_iso_local_time(input: &str) -> CivilResult<LocalTime> {
    let mut scanner = Scanner::new(input);
    let time = scan_time(&mut scanner)?;
    scanner.expect_end()?;
    Ok(time)
}

/// Parses `HH:MM[:SS[.fff]]±HH:MM`.
pub fn parse_iso_offset_time(input: &str) -> CivilResult<(LocalTime, ZoneOffset)> {
    let mut scanner = Scanner::new(input);
    let time = scan_time(&mut scanner)?;
    let offset = scan_offset(&mut scanner)?;
    scanner.expect_end()?;
    Ok((time, offset))
}

/// Parses `YYYY-MM-DDTHH:MM[:SS[.fff]]`.
pub fn parse_iso_local_date_time(input: &str) -> CivilResult<LocalDateTime> {
    let mut scanner = Scanner::new(input);
    let datetime = scan_date_time(&mut scanner)?;
    scanner.expect_end()?;
    Ok(datetime)
}

fn scan_date_time(scanner: &mut Scanner<'_>) -> CivilResult<LocalDateTime> {
    let date = scan_date(scanner)?;
    scanner.expect(b'T', "expected 'T' between date and time")?;
    let time = scan_time(scanner)?;
    Ok(LocalDateTime::new(date, time))
}

/// Parses `YYYY-MM-DDTHH:MM[:SS[.fff]]±HH:MM`.
pub fn parse_iso_offset_date_time(input: &str) -> CivilResult<OffsetDateTime> {
    let mut scanner = Scanner::new(input);
    let datetime = scan_date_time(&mut scanner)?;
    let offset = scan_offset(&mut scanner)?;
    scanner.expect_end()?;
    Ok(OffsetDateTime::new(datetime, offset))
}

/// Parses the offset form with an optional `[region]` suffix.
///
/// When the region resolves in the installed registry, the parsed
/// offset is validated against its rules; an unregistered region is
/// accepted as-is so text can round-trip without a populated
/// registry.
pub fn parse_iso_zoned_date_time(input: &str) -> CivilResult<ZonedDateTime> {
    let mut scanner = Scanner::new(input);
    let datetime = scan_date_time(&mut scanner)?;
    let offset = scan_offset(&mut scanner)?;
    let zone = if scanner.eat(b'[') {
        let region = scanner.until(b']');
        if region.is_empty() {
            return Err(scanner.error("empty zone identifier"));
        }
        scanner.expect(b']', "expected ']' after the zone identifier")?;
        ZoneId::unchecked(region)
    } else {
        ZoneId::Fixed(offset)
    };
    scanner.expect_end()?;

    let offset_datetime = OffsetDateTime::new(datetime, offset);
    match ZonedDateTime::of_offset(offset_datetime, zone.clone()) {
        Ok(zoned) => Ok(zoned),
        // Trust the text when the zone is not in the registry.
        Err(CivilError::UnknownZone { .. }) => Ok(ZonedDateTime::from_parts_unchecked(
            datetime, offset, zone,
        )),
        Err(err) => Err(err),
    }
}

/// Parses `YYYY-DDD`.
pub fn parse_iso_ordinal_date(input: &str) -> CivilResult<LocalDate> {
    let mut scanner = Scanner::new(input);
    let year = scan_year(&mut scanner)?;
    scanner.expect(b'-', "expected '-' after the year")?;
    let day_of_year = scanner.digits(3, "expected a 3-digit day-of-year")?;
    scanner.expect_end()?;
    LocalDate::of_year_day(year, day_of_year as u16)
}

/// Parses `YYYY-Www-D`.
pub fn parse_iso_week_date(input: &str) -> CivilResult<LocalDate> {
    let mut scanner = Scanner::new(input);
    let week_year = scan_year(&mut scanner)?;
    scanner.expect(b'-', "expected '-' after the week-based year")?;
    if !scanner.eat(b'W') && !scanner.eat(b'w') {
        return Err(scanner.error("expected 'W' before the week number"));
    }
    let week = scanner.digits(2, "expected a 2-digit week")?;
    scanner.expect(b'-', "expected '-' after the week")?;
    let day = scanner.digits(1, "expected a 1-digit day-of-week")?;
    scanner.expect_end()?;

    if week == 0 || week > i64::from(crate::components::date::iso_weeks_in_year(week_year)) {
        return Err(scanner.error("week number out of range for the year"));
    }
    let weekday = Weekday::from_iso_number(day)?;

    let january_4th = LocalDate::of(week_year, 1, 4)?;
    let first_monday =
        january_4th.minus_days(i64::from(january_4th.day_of_week().iso_number()) - 1)?;
    first_monday.plus_days((week - 1) * 7 + i64::from(weekday.iso_number()) - 1)
}

/// Parses `YYYYMMDD`.
pub fn parse_basic_iso_date(input: &str) -> CivilResult<LocalDate> {
    let mut scanner = Scanner::new(input);
    let year = scanner.digits(4, "expected a 4-digit year")?;
    let month = scanner.digits(2, "expected a 2-digit month")?;
    let day = scanner.digits(2, "expected a 2-digit day")?;
    scanner.expect_end()?;
    LocalDate::of(year as i32, month as u8, day as u8)
}

/// Parses the RFC 1123 form, validating the named day-of-week against
/// the date.
pub fn parse_rfc1123(input: &str) -> CivilResult<OffsetDateTime> {
    let mut scanner = Scanner::new(input);
    let weekday_index = scanner
        .match_name_ci(&WEEKDAY_SHORT_NAMES)
        .ok_or_else(|| scanner.error("expected a day-of-week name"))?;
    scanner.expect(b',', "expected ',' after the day-of-week")?;
    scanner.expect(b' ', "expected ' ' after the comma")?;
    let day = scanner.digits(2, "expected a 2-digit day")?;
    scanner.expect(b' ', "expected ' ' after the day")?;
    let month_index = scanner
        .match_name_ci(&MONTH_SHORT_NAMES)
        .ok_or_else(|| scanner.error("expected a month name"))?;
    scanner.expect(b' ', "expected ' ' after the month")?;
    let year = scanner.digits(4, "expected a 4-digit year")?;
    scanner.expect(b' ', "expected ' ' after the year")?;
    let hour = scanner.digits(2, "expected a 2-digit hour")?;
    scanner.expect(b':', "expected ':' after the hour")?;
    let minute = scanner.digits(2, "expected a 2-digit minute")?;
    scanner.expect(b':', "expected ':' after the minute")?;
    let second = scanner.digits(2, "expected a 2-digit second")?;
    scanner.expect(b' ', "expected ' ' before the offset")?;
    let offset = match scanner.peek() {
        Some(b'Z' | b'z') => {
            scanner.bump();
            ZoneOffset::UTC
        }
        Some(b'+' | b'-') => {
            let sign = if scanner.bump() == Some(b'-') { -1 } else { 1 };
            let hours = scanner.digits(2, "expected 2-digit offset hours")?;
            let minutes = scanner.digits(2, "expected 2-digit offset minutes")?;
            if minutes > 59 {
                return Err(scanner.error("offset minutes must be 0..=59"));
            }
            ZoneOffset::of_total_seconds((sign * (hours * 3_600 + minutes * 60)) as i32)?
        }
        _ => return Err(scanner.error("expected an offset")),
    };
    scanner.expect_end()?;

    let date = LocalDate::of(year as i32, month_index as u8 + 1, day as u8)?;
    if usize::from(date.day_of_week().iso_number()) != weekday_index + 1 {
        return Err(CivilError::ParseError {
            input: String::from(input),
            error_index: 0,
            message: "day-of-week name does not match the date",
        });
    }
    let time = LocalTime::of(hour as u8, minute as u8, second as u8)?;
    Ok(OffsetDateTime::new(LocalDateTime::new(date, time), offset))
}
