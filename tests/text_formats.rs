//! End-to-end checks of the ISO and RFC 1123 text surface.

mod common;

use common::zone;

use civil_rs::text::{
    format_basic_iso_date, format_iso_local_date, format_iso_ordinal_date, format_iso_week_date,
    format_iso_zoned_date_time, format_rfc1123, parse_basic_iso_date, parse_iso_local_date,
    parse_iso_offset_date_time, parse_iso_ordinal_date, parse_iso_week_date,
    parse_iso_zoned_date_time,
};
use civil_rs::{
    LocalDate, LocalDateTime, LocalResolver, LocalTime, OffsetDateTime, ZoneOffset, ZonedDateTime,
};

#[test]
fn iso_date_forms() {
    let date = LocalDate::of(2008, 6, 30).unwrap();
    assert_eq!(format_iso_local_date(&date), "2008-06-30");
    assert_eq!(format_basic_iso_date(&date).unwrap(), "20080630");
    assert_eq!(
        format_iso_local_date(&LocalDate::of(999_999_999, 8, 6).unwrap()),
        "+999999999-08-06"
    );
    assert_eq!(parse_basic_iso_date("20080630").unwrap(), date);
}

#[test]
fn ordinal_dates() {
    let date = LocalDate::of(2008, 6, 3).unwrap();
    assert_eq!(date.day_of_year(), 155);
    assert_eq!(format_iso_ordinal_date(&date), "2008-155");
    assert_eq!(parse_iso_ordinal_date("2008-155").unwrap(), date);
}

#[test]
fn week_dates() {
    let date = LocalDate::of(2004, 1, 27).unwrap();
    assert_eq!(format_iso_week_date(&date), "2004-W05-2");
    assert_eq!(parse_iso_week_date("2004-W05-2").unwrap(), date);
}

#[test]
fn rfc1123_scenario() {
    let zoned = ZonedDateTime::of(
        LocalDateTime::of(2008, 6, 3, 11, 5, 30).unwrap(),
        civil_rs::ZoneId::Fixed(ZoneOffset::UTC),
        &LocalResolver::Strict,
    )
    .unwrap();
    let text = format_rfc1123(&zoned.to_offset_date_time()).unwrap();
    assert_eq!(text, "Tue, 03 Jun 2008 11:05:30 Z");
    assert_eq!(
        parse_rfc1123_round_trip(&text),
        zoned.to_offset_date_time()
    );
}

fn parse_rfc1123_round_trip(text: &str) -> OffsetDateTime {
    civil_rs::text::parse_rfc1123(text).unwrap()
}

#[test]
fn zoned_text_round_trips_with_registry() {
    let london = zone("Europe/London");
    for (year, month, day, hour, minute) in [
        (2008, 6, 30, 11, 30),
        (2008, 10, 26, 1, 30),
        (2008, 12, 24, 23, 59),
    ] {
        let local = LocalDateTime::of(year, month, day, hour, minute, 0).unwrap();
        let zoned = ZonedDateTime::of(
            local,
            london.clone(),
            &LocalResolver::PostGapPreOverlap,
        )
        .unwrap();
        let text = format_iso_zoned_date_time(&zoned);
        assert_eq!(parse_iso_zoned_date_time(&text).unwrap(), zoned, "{text}");
    }
}

#[test]
fn offset_date_time_round_trips() {
    for (text, epoch_check) in [
        ("2008-06-30T11:30:20+01:00", true),
        ("1969-12-31T23:59:59Z", true),
        ("2008-06-30T11:30:20.123456789-05:30", false),
    ] {
        let parsed = parse_iso_offset_date_time(text).unwrap();
        assert_eq!(parsed.to_string(), text);
        if epoch_check {
            let back = OffsetDateTime::of_instant(parsed.to_instant(), parsed.offset()).unwrap();
            assert_eq!(back, parsed);
        }
    }
}

#[test]
fn parse_is_strict() {
    assert!(parse_iso_local_date("2008/06/30").is_err());
    assert!(parse_iso_local_date("20080630").is_err());
    assert!(parse_iso_offset_date_time("2008-06-30T25:00:00Z").is_err());
    assert!(parse_iso_zoned_date_time("2008-06-30T11:30:20+01:00[]").is_err());
    assert!(parse_iso_week_date("2004-X05-2").is_err());

    // Times must round-trip the exact text, including fractions.
    let time = LocalTime::of_hms_nano(23, 59, 59, 999_999_999).unwrap();
    let text = time.to_string();
    assert_eq!(text, "23:59:59.999999999");
    assert_eq!(text.parse::<LocalTime>().unwrap(), time);
}
