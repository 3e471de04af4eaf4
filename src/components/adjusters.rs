//! Named date adjustment policies.
//!
//! Each adjuster takes a [`LocalDate`] and produces the adjusted date.
//! Adjusters that can never leave the supported range return the date
//! directly; the ones that can roll past the maximum year are
//! fallible.

use crate::components::date::LocalDate;
use crate::components::weekday::Weekday;
use crate::error::CivilError;
use crate::CivilResult;

/// The first day of the date's month.
#[must_use]
pub fn first_day_of_month(date: LocalDate) -> LocalDate {
    // Day 1 exists in every month.
    date.with_day_of_month(1).unwrap_or(date)
}

/// The last day of the date's month.
#[must_use]
pub fn last_day_of_month(date: LocalDate) -> LocalDate {
    date.with_day_of_month(date.length_of_month()).unwrap_or(date)
}

/// The first day of the month after the date's month.
pub fn first_day_of_next_month(date: LocalDate) -> CivilResult<LocalDate> {
    first_day_of_month(date).plus_months(1)
}

/// January 1 of the date's year.
#[must_use]
pub fn first_day_of_year(date: LocalDate) -> LocalDate {
    date.with_day_of_year(1).unwrap_or(date)
}

/// December 31 of the date's year.
#[must_use]
pub fn last_day_of_year(date: LocalDate) -> LocalDate {
    date.with_day_of_year(date.length_of_year()).unwrap_or(date)
}

/// January 1 of the year after the date's year.
pub fn first_day_of_next_year(date: LocalDate) -> CivilResult<LocalDate> {
    first_day_of_year(date).plus_years(1)
}

/// The first occurrence of `weekday` in the date's month.
#[must_use]
pub fn first_in_month(date: LocalDate, weekday: Weekday) -> LocalDate {
    let first = first_day_of_month(date);
    let gap = i64::from(weekday.iso_number()) - i64::from(first.day_of_week().iso_number());
    first.plus_days(gap.rem_euclid(7)).unwrap_or(first)
}

/// The last occurrence of `weekday` in the date's month.
#[must_use]
pub fn last_in_month(date: LocalDate, weekday: Weekday) -> LocalDate {
    let last = last_day_of_month(date);
    let gap = i64::from(last.day_of_week().iso_number()) - i64::from(weekday.iso_number());
    last.plus_days(-gap.rem_euclid(7)).unwrap_or(last)
}

/// The `ordinal`-th occurrence of `weekday` in the date's month, with
/// `ordinal` in 1..=5. Ordinal 5 addresses the fifth occurrence, which
/// may fall in the following month.
pub fn day_of_week_in_month(
    date: LocalDate,
    ordinal: u8,
    weekday: Weekday,
) -> CivilResult<LocalDate> {
    if !(1..=5).contains(&ordinal) {
        return Err(CivilError::ValueOutOfRange {
            field: crate::fields::TemporalField::DayOfWeek,
            value: i64::from(ordinal),
            min: 1,
            max: 5,
        });
    }
    first_in_month(date, weekday).plus_days(i64::from(ordinal - 1) * 7)
}

/// The next occurrence of `weekday`, always after the date.
pub fn next(date: LocalDate, weekday: Weekday) -> CivilResult<LocalDate> {
    let gap = i64::from(weekday.iso_number()) - i64::from(date.day_of_week().iso_number());
    date.plus_days((gap - 1).rem_euclid(7) + 1)
}

/// The next occurrence of `weekday`, or the date itself when it
/// already falls on it.
pub fn next_or_same(date: LocalDate, weekday: Weekday) -> CivilResult<LocalDate> {
    let gap = i64::from(weekday.iso_number()) - i64::from(date.day_of_week().iso_number());
    date.plus_days(gap.rem_euclid(7))
}

/// The previous occurrence of `weekday`, always before the date.
pub fn previous(date: LocalDate, weekday: Weekday) -> CivilResult<LocalDate> {
    let gap = i64::from(date.day_of_week().iso_number()) - i64::from(weekday.iso_number());
    date.plus_days(-((gap - 1).rem_euclid(7) + 1))
}

/// The previous occurrence of `weekday`, or the date itself when it
/// already falls on it.
pub fn previous_or_same(date: LocalDate, weekday: Weekday) -> CivilResult<LocalDate> {
    let gap = i64::from(date.day_of_week().iso_number()) - i64::from(weekday.iso_number());
    date.plus_days(-gap.rem_euclid(7))
}

/// The next day that is not a Saturday or Sunday.
pub fn next_non_weekend_day(date: LocalDate) -> CivilResult<LocalDate> {
    match date.day_of_week() {
        Weekday::Friday => date.plus_days(3),
        Weekday::Saturday => date.plus_days(2),
        _ => date.plus_days(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u8, day: u8) -> LocalDate {
        LocalDate::of(year, month, day).unwrap()
    }

    #[test]
    fn month_and_year_boundaries() {
        let mid_feb = date(2008, 2, 15);
        assert_eq!(first_day_of_month(mid_feb), date(2008, 2, 1));
        assert_eq!(last_day_of_month(mid_feb), date(2008, 2, 29));
        assert_eq!(last_day_of_month(date(2009, 2, 15)), date(2009, 2, 28));
        assert_eq!(first_day_of_next_month(mid_feb).unwrap(), date(2008, 3, 1));
        assert_eq!(
            first_day_of_next_month(date(2008, 12, 3)).unwrap(),
            date(2009, 1, 1)
        );
        assert_eq!(first_day_of_year(mid_feb), date(2008, 1, 1));
        assert_eq!(last_day_of_year(mid_feb), date(2008, 12, 31));
        assert_eq!(first_day_of_next_year(mid_feb).unwrap(), date(2009, 1, 1));
    }

    #[test]
    fn adjusters_are_idempotent() {
        let base = date(2008, 6, 17);
        let last = last_day_of_month(base);
        assert_eq!(last_day_of_month(last), last);
        let first = first_day_of_month(base);
        assert_eq!(first_day_of_month(first), first);
    }

    #[test]
    fn weekday_occurrences_in_month() {
        // June 2008: Sundays fell on 1, 8, 15, 22, 29.
        let base = date(2008, 6, 17);
        assert_eq!(first_in_month(base, Weekday::Sunday), date(2008, 6, 1));
        assert_eq!(last_in_month(base, Weekday::Sunday), date(2008, 6, 29));
        assert_eq!(
            day_of_week_in_month(base, 3, Weekday::Sunday).unwrap(),
            date(2008, 6, 15)
        );
        // The fifth Monday of June 2008 rolls into July.
        assert_eq!(
            day_of_week_in_month(base, 5, Weekday::Monday).unwrap(),
            date(2008, 6, 30)
        );
        assert_eq!(
            day_of_week_in_month(base, 5, Weekday::Sunday).unwrap(),
            date(2008, 7, 6)
        );
        assert!(day_of_week_in_month(base, 0, Weekday::Sunday).is_err());
        assert!(day_of_week_in_month(base, 6, Weekday::Sunday).is_err());
    }

    #[test]
    fn directional_weekday_adjusters() {
        // 2008-06-17 was a Tuesday.
        let tuesday = date(2008, 6, 17);
        assert_eq!(next(tuesday, Weekday::Wednesday).unwrap(), date(2008, 6, 18));
        assert_eq!(next(tuesday, Weekday::Tuesday).unwrap(), date(2008, 6, 24));
        assert_eq!(next_or_same(tuesday, Weekday::Tuesday).unwrap(), tuesday);
        assert_eq!(
            previous(tuesday, Weekday::Tuesday).unwrap(),
            date(2008, 6, 10)
        );
        assert_eq!(
            previous(tuesday, Weekday::Monday).unwrap(),
            date(2008, 6, 16)
        );
        assert_eq!(previous_or_same(tuesday, Weekday::Tuesday).unwrap(), tuesday);
        assert_eq!(
            previous_or_same(tuesday, Weekday::Sunday).unwrap(),
            date(2008, 6, 15)
        );
    }

    #[test]
    fn weekend_skipping() {
        // 2008-06-20 was a Friday.
        assert_eq!(
            next_non_weekend_day(date(2008, 6, 20)).unwrap(),
            date(2008, 6, 23)
        );
        assert_eq!(
            next_non_weekend_day(date(2008, 6, 21)).unwrap(),
            date(2008, 6, 23)
        );
        assert_eq!(
            next_non_weekend_day(date(2008, 6, 22)).unwrap(),
            date(2008, 6, 23)
        );
        assert_eq!(
            next_non_weekend_day(date(2008, 6, 23)).unwrap(),
            date(2008, 6, 24)
        );
    }
}
