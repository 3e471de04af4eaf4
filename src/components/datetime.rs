//! A calendar date paired with a wall-clock time.

use core::fmt;
use core::str::FromStr;

use crate::components::date::{LocalDate, MAX_EPOCH_DAY, MIN_EPOCH_DAY};
use crate::components::offset::ZoneOffset;
use crate::components::time::LocalTime;
use crate::components::weekday::Weekday;
use crate::error::CivilError;
use crate::fields::{Temporal, TemporalField, TemporalUnit, ValueRange};
use crate::utils;
use crate::CivilResult;

/// A date-time without an offset or zone, such as 2008-06-30T11:30.
///
/// This is the wall-clock value the zone rules engine resolves: by
/// itself it does not identify an instant, and around a daylight
/// saving cutover the same `LocalDateTime` may map to zero, one, or
/// two instants in a given zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDateTime {
    date: LocalDate,
    time: LocalTime,
}

// ==== Public API ====

impl LocalDateTime {
    /// The smallest supported date-time.
    pub const MIN: Self = Self {
        date: LocalDate::MIN,
        time: LocalTime::MIN,
    };

    /// The largest supported date-time.
    pub const MAX: Self = Self {
        date: LocalDate::MAX,
        time: LocalTime::MAX,
    };

    /// Pairs a date and a time.
    #[must_use]
    pub const fn new(date: LocalDate, time: LocalTime) -> Self {
        Self { date, time }
    }

    /// A date-time from the six principal fields.
    pub fn of(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> CivilResult<Self> {
        Ok(Self {
            date: LocalDate::of(year, month, day)?,
            time: LocalTime::of(hour, minute, second)?,
        })
    }

    #[must_use]
    pub const fn date(&self) -> LocalDate {
        self.date
    }

    #[must_use]
    pub const fn time(&self) -> LocalTime {
        self.time
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.date.year()
    }

    #[must_use]
    pub const fn month(&self) -> u8 {
        self.date.month()
    }

    #[must_use]
    pub const fn day(&self) -> u8 {
        self.date.day()
    }

    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.time.hour()
    }

    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.time.minute()
    }

    #[must_use]
    pub const fn second(&self) -> u8 {
        self.time.second()
    }

    #[must_use]
    pub const fn nano(&self) -> u32 {
        self.time.nano()
    }

    #[must_use]
    pub fn day_of_week(&self) -> Weekday {
        self.date.day_of_week()
    }

    #[must_use]
    pub const fn with_date(&self, date: LocalDate) -> Self {
        Self {
            date,
            time: self.time,
        }
    }

    #[must_use]
    pub const fn with_time(&self, time: LocalTime) -> Self {
        Self {
            date: self.date,
            time,
        }
    }

    pub fn plus_days(&self, days: i64) -> CivilResult<Self> {
        Ok(Self {
            date: self.date.plus_days(days)?,
            time: self.time,
        })
    }

    pub fn plus_weeks(&self, weeks: i64) -> CivilResult<Self> {
        Ok(Self {
            date: self.date.plus_weeks(weeks)?,
            time: self.time,
        })
    }

    pub fn plus_months(&self, months: i64) -> CivilResult<Self> {
        Ok(Self {
            date: self.date.plus_months(months)?,
            time: self.time,
        })
    }

    pub fn plus_years(&self, years: i64) -> CivilResult<Self> {
        Ok(Self {
            date: self.date.plus_years(years)?,
            time: self.time,
        })
    }

    pub fn plus_hours(&self, hours: i64) -> CivilResult<Self> {
        self.plus_time_amount(hours, utils::NANOS_PER_HOUR)
    }

    pub fn plus_minutes(&self, minutes: i64) -> CivilResult<Self> {
        self.plus_time_amount(minutes, utils::NANOS_PER_MINUTE)
    }

    pub fn plus_seconds(&self, seconds: i64) -> CivilResult<Self> {
        self.plus_time_amount(seconds, utils::NANOS_PER_SECOND)
    }

    pub fn plus_nanos(&self, nanos: i64) -> CivilResult<Self> {
        self.plus_time_amount(nanos, 1)
    }

    pub fn minus_days(&self, days: i64) -> CivilResult<Self> {
        Ok(Self {
            date: self.date.minus_days(days)?,
            time: self.time,
        })
    }

    pub fn minus_months(&self, months: i64) -> CivilResult<Self> {
        Ok(Self {
            date: self.date.minus_months(months)?,
            time: self.time,
        })
    }

    pub fn minus_years(&self, years: i64) -> CivilResult<Self> {
        Ok(Self {
            date: self.date.minus_years(years)?,
            time: self.time,
        })
    }

    pub fn minus_hours(&self, hours: i64) -> CivilResult<Self> {
        self.plus_time_amount(utils::checked_sub(0, hours)?, utils::NANOS_PER_HOUR)
    }

    pub fn minus_minutes(&self, minutes: i64) -> CivilResult<Self> {
        self.plus_time_amount(utils::checked_sub(0, minutes)?, utils::NANOS_PER_MINUTE)
    }

    pub fn minus_seconds(&self, seconds: i64) -> CivilResult<Self> {
        self.plus_time_amount(utils::checked_sub(0, seconds)?, utils::NANOS_PER_SECOND)
    }

    pub fn minus_nanos(&self, nanos: i64) -> CivilResult<Self> {
        self.plus_time_amount(utils::checked_sub(0, nanos)?, 1)
    }

    /// Time-of-day arithmetic; whole-day overflow carries into the
    /// date.
    fn plus_time_amount(&self, amount: i64, nanos_per_unit: i64) -> CivilResult<Self> {
        if amount == 0 {
            return Ok(*self);
        }
        let total = i128::from(self.time.nano_of_day())
            + i128::from(amount) * i128::from(nanos_per_unit);
        let day_carry = total.div_euclid(i128::from(utils::NANOS_PER_DAY));
        let nano_of_day = total.rem_euclid(i128::from(utils::NANOS_PER_DAY)) as i64;
        let day_carry = i64::try_from(day_carry).map_err(|_| CivilError::ArithmeticOverflow)?;
        Ok(Self {
            date: self.date.plus_days(day_carry)?,
            time: LocalTime::of_nano_of_day(nano_of_day)?,
        })
    }

    /// The epoch second of this date-time at a fixed offset.
    #[must_use]
    pub fn to_epoch_second(&self, offset: ZoneOffset) -> i64 {
        self.date.to_epoch_day() * utils::SECONDS_PER_DAY + self.time.second_of_day()
            - offset.seconds_i64()
    }

    /// The local view of an epoch second at a fixed offset.
    ///
    /// Fails with [`CivilError::ArithmeticOverflow`] when the result
    /// would leave the supported year range.
    pub fn from_epoch_second(
        epoch_second: i64,
        nano: u32,
        offset: ZoneOffset,
    ) -> CivilResult<Self> {
        let local_second = utils::checked_add(epoch_second, offset.seconds_i64())?;
        let epoch_day = utils::floor_div(local_second, utils::SECONDS_PER_DAY);
        if !(MIN_EPOCH_DAY..=MAX_EPOCH_DAY).contains(&epoch_day) {
            return Err(CivilError::ArithmeticOverflow);
        }
        let second_of_day = utils::floor_mod(local_second, utils::SECONDS_PER_DAY);
        let time = LocalTime::of_nano_of_day(
            second_of_day * utils::NANOS_PER_SECOND + i64::from(nano),
        )?;
        Ok(Self {
            date: LocalDate::from_epoch_day(epoch_day)?,
            time,
        })
    }
}

// ==== Field protocol ====

impl Temporal for LocalDateTime {
    fn is_supported(&self, field: TemporalField) -> bool {
        field.is_date_based() || field.is_time_based()
    }

    fn range(&self, field: TemporalField) -> CivilResult<ValueRange> {
        if field.is_time_based() {
            self.time.range(field)
        } else {
            self.date.range(field)
        }
    }

    fn get(&self, field: TemporalField) -> CivilResult<i64> {
        if field.is_time_based() {
            self.time.get(field)
        } else {
            self.date.get(field)
        }
    }

    fn with(&self, field: TemporalField, value: i64) -> CivilResult<Self> {
        if field.is_time_based() {
            Ok(Self {
                date: self.date,
                time: self.time.with(field, value)?,
            })
        } else {
            Ok(Self {
                date: self.date.with(field, value)?,
                time: self.time,
            })
        }
    }

    fn plus(&self, amount: i64, unit: TemporalUnit) -> CivilResult<Self> {
        if let Some(nanos_per_unit) = unit.exact_nanos() {
            if unit == TemporalUnit::Days {
                return self.plus_days(amount);
            }
            return self.plus_time_amount(amount, nanos_per_unit);
        }
        Ok(Self {
            date: self.date.plus(amount, unit)?,
            time: self.time,
        })
    }

    fn until(&self, end: &Self, unit: TemporalUnit) -> CivilResult<i64> {
        if unit.is_time_based() {
            let day_span = i128::from(end.date.to_epoch_day() - self.date.to_epoch_day());
            let total = day_span * i128::from(utils::NANOS_PER_DAY)
                + i128::from(end.time.nano_of_day() - self.time.nano_of_day());
            let Some(unit_nanos) = unit.exact_nanos() else {
                return Err(CivilError::UnsupportedUnit { unit });
            };
            return i64::try_from(total / i128::from(unit_nanos))
                .map_err(|_| CivilError::ArithmeticOverflow);
        }
        // Date-based: exclude the final partial day.
        let mut end_date = end.date;
        if end_date > self.date && end.time < self.time {
            end_date = end_date.plus_days(-1)?;
        } else if end_date < self.date && end.time > self.time {
            end_date = end_date.plus_days(1)?;
        }
        self.date.until(&end_date, unit)
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::text::write_iso_local_date(f, &self.date)?;
        f.write_str("T")?;
        crate::text::write_iso_local_time(f, &self.time)
    }
}

impl FromStr for LocalDateTime {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::text::parse_iso_local_date_time(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> LocalDateTime {
        LocalDateTime::of(year, month, day, hour, minute, second).unwrap()
    }

    #[test]
    fn time_overflow_carries_into_the_date() {
        let base = dt(2008, 12, 31, 23, 30, 0);
        assert_eq!(base.plus_hours(1).unwrap(), dt(2009, 1, 1, 0, 30, 0));
        assert_eq!(base.plus_minutes(30).unwrap(), dt(2009, 1, 1, 0, 0, 0));
        assert_eq!(
            dt(2008, 1, 1, 0, 0, 0).minus_nanos(1).unwrap(),
            LocalDateTime::new(
                LocalDate::of(2007, 12, 31).unwrap(),
                LocalTime::MAX
            )
        );
        assert_eq!(base.plus_hours(49).unwrap(), dt(2009, 1, 3, 0, 30, 0));
    }

    #[test]
    fn epoch_second_round_trip() {
        let offset = ZoneOffset::of_hours(2).unwrap();
        let base = dt(2008, 6, 30, 11, 30, 20);
        let epoch_second = base.to_epoch_second(offset);
        assert_eq!(
            LocalDateTime::from_epoch_second(epoch_second, 0, offset).unwrap(),
            base
        );
        // 1970-01-01T00:00:00 UTC is epoch second zero.
        assert_eq!(
            dt(1970, 1, 1, 0, 0, 0).to_epoch_second(ZoneOffset::UTC),
            0
        );
        // An hour east of Greenwich reaches midnight an hour earlier.
        assert_eq!(
            dt(1970, 1, 1, 0, 0, 0).to_epoch_second(ZoneOffset::of_hours(1).unwrap()),
            -3_600
        );
    }

    #[test]
    fn field_dispatch_splits_on_the_field_class() {
        let base = dt(2008, 6, 3, 11, 5, 30);
        assert_eq!(base.get(TemporalField::Year).unwrap(), 2008);
        assert_eq!(base.get(TemporalField::HourOfDay).unwrap(), 11);
        assert_eq!(
            base.with(TemporalField::HourOfDay, 23).unwrap(),
            dt(2008, 6, 3, 23, 5, 30)
        );
        assert_eq!(
            base.with(TemporalField::DayOfMonth, 30).unwrap(),
            dt(2008, 6, 30, 11, 5, 30)
        );
        assert!(base.get(TemporalField::OffsetSeconds).is_err());
    }

    #[test]
    fn unit_plus_dispatch() {
        let base = dt(2008, 6, 30, 23, 30, 0);
        assert_eq!(
            base.plus(1, TemporalUnit::Hours).unwrap(),
            dt(2008, 7, 1, 0, 30, 0)
        );
        assert_eq!(
            base.plus(1, TemporalUnit::HalfDays).unwrap(),
            dt(2008, 7, 1, 11, 30, 0)
        );
        assert_eq!(
            base.plus(1, TemporalUnit::Months).unwrap(),
            dt(2008, 7, 30, 23, 30, 0)
        );
        assert_eq!(
            base.plus(2, TemporalUnit::Days).unwrap(),
            dt(2008, 7, 2, 23, 30, 0)
        );
    }

    #[test]
    fn until_drops_partial_days() {
        let start = dt(2008, 6, 30, 12, 0, 0);
        let later_same_clock = dt(2008, 7, 2, 12, 0, 0);
        let later_earlier_clock = dt(2008, 7, 2, 11, 59, 59);
        assert_eq!(
            start.until(&later_same_clock, TemporalUnit::Days).unwrap(),
            2
        );
        assert_eq!(
            start
                .until(&later_earlier_clock, TemporalUnit::Days)
                .unwrap(),
            1
        );
        assert_eq!(
            start.until(&later_same_clock, TemporalUnit::Hours).unwrap(),
            48
        );
        assert_eq!(
            later_same_clock.until(&start, TemporalUnit::Days).unwrap(),
            -2
        );
    }
}
