//! A wall-clock time of day.

use core::fmt;
use core::str::FromStr;

use crate::error::CivilError;
use crate::fields::{Temporal, TemporalField, TemporalUnit, ValueRange};
use crate::utils;
use crate::CivilResult;

/// A time of day without a date, offset, or zone, to nanosecond
/// precision.
///
/// The four-field form is stored directly; [`LocalTime::nano_of_day`]
/// and [`LocalTime::of_nano_of_day`] expose the equivalent
/// single-scalar representation used by the fast arithmetic paths.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalTime {
    hour: u8,
    minute: u8,
    second: u8,
    nano: u32,
}

// ==== Public API ====

impl LocalTime {
    /// 00:00, the start of the day.
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
        nano: 0,
    };

    /// The smallest supported time, equal to [`Self::MIDNIGHT`].
    pub const MIN: Self = Self::MIDNIGHT;

    /// 23:59:59.999999999, the end of the day.
    pub const MAX: Self = Self {
        hour: 23,
        minute: 59,
        second: 59,
        nano: 999_999_999,
    };

    /// 12:00.
    pub const NOON: Self = Self {
        hour: 12,
        minute: 0,
        second: 0,
        nano: 0,
    };

    /// A time from hour, minute, and second.
    pub fn of(hour: u8, minute: u8, second: u8) -> CivilResult<Self> {
        Self::of_hms_nano(hour, minute, second, 0)
    }

    /// A time from all four fields.
    pub fn of_hms_nano(hour: u8, minute: u8, second: u8, nano: u32) -> CivilResult<Self> {
        TemporalField::HourOfDay
            .base_range()
            .check(i64::from(hour), TemporalField::HourOfDay)?;
        TemporalField::MinuteOfHour
            .base_range()
            .check(i64::from(minute), TemporalField::MinuteOfHour)?;
        TemporalField::SecondOfMinute
            .base_range()
            .check(i64::from(second), TemporalField::SecondOfMinute)?;
        TemporalField::NanoOfSecond
            .base_range()
            .check(i64::from(nano), TemporalField::NanoOfSecond)?;
        Ok(Self {
            hour,
            minute,
            second,
            nano,
        })
    }

    /// A time from a second-of-day scalar.
    pub fn of_second_of_day(second_of_day: i64) -> CivilResult<Self> {
        TemporalField::SecondOfDay
            .base_range()
            .check(second_of_day, TemporalField::SecondOfDay)?;
        Ok(Self {
            hour: (second_of_day / utils::SECONDS_PER_HOUR) as u8,
            minute: ((second_of_day / utils::SECONDS_PER_MINUTE) % 60) as u8,
            second: (second_of_day % 60) as u8,
            nano: 0,
        })
    }

    /// A time from a nano-of-day scalar.
    pub fn of_nano_of_day(nano_of_day: i64) -> CivilResult<Self> {
        TemporalField::NanoOfDay
            .base_range()
            .check(nano_of_day, TemporalField::NanoOfDay)?;
        let second_of_day = nano_of_day / utils::NANOS_PER_SECOND;
        Ok(Self {
            hour: (second_of_day / utils::SECONDS_PER_HOUR) as u8,
            minute: ((second_of_day / utils::SECONDS_PER_MINUTE) % 60) as u8,
            second: (second_of_day % 60) as u8,
            nano: (nano_of_day % utils::NANOS_PER_SECOND) as u32,
        })
    }

    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    #[must_use]
    pub const fn second(&self) -> u8 {
        self.second
    }

    #[must_use]
    pub const fn nano(&self) -> u32 {
        self.nano
    }

    /// Seconds elapsed since midnight, ignoring the nanosecond part.
    #[must_use]
    pub const fn second_of_day(&self) -> i64 {
        self.hour as i64 * utils::SECONDS_PER_HOUR
            + self.minute as i64 * utils::SECONDS_PER_MINUTE
            + self.second as i64
    }

    /// Nanoseconds elapsed since midnight.
    #[must_use]
    pub const fn nano_of_day(&self) -> i64 {
        self.second_of_day() * utils::NANOS_PER_SECOND + self.nano as i64
    }

    pub fn with_hour(&self, hour: u8) -> CivilResult<Self> {
        Self::of_hms_nano(hour, self.minute, self.second, self.nano)
    }

    pub fn with_minute(&self, minute: u8) -> CivilResult<Self> {
        Self::of_hms_nano(self.hour, minute, self.second, self.nano)
    }

    pub fn with_second(&self, second: u8) -> CivilResult<Self> {
        Self::of_hms_nano(self.hour, self.minute, second, self.nano)
    }

    pub fn with_nano(&self, nano: u32) -> CivilResult<Self> {
        Self::of_hms_nano(self.hour, self.minute, self.second, nano)
    }

    /// Adds hours, wrapping around midnight; the day overflow is
    /// discarded at this level.
    #[must_use]
    pub fn plus_hours(&self, hours: i64) -> Self {
        self.plus_nanos_wrapping(utils::floor_mod(hours, 24) * utils::NANOS_PER_HOUR)
    }

    #[must_use]
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        self.plus_nanos_wrapping(utils::floor_mod(minutes, 1_440) * utils::NANOS_PER_MINUTE)
    }

    #[must_use]
    pub fn plus_seconds(&self, seconds: i64) -> Self {
        self.plus_nanos_wrapping(
            utils::floor_mod(seconds, utils::SECONDS_PER_DAY) * utils::NANOS_PER_SECOND,
        )
    }

    #[must_use]
    pub fn plus_nanos(&self, nanos: i64) -> Self {
        self.plus_nanos_wrapping(utils::floor_mod(nanos, utils::NANOS_PER_DAY))
    }

    #[must_use]
    pub fn minus_hours(&self, hours: i64) -> Self {
        self.plus_hours(-utils::floor_mod(hours, 24))
    }

    #[must_use]
    pub fn minus_minutes(&self, minutes: i64) -> Self {
        self.plus_minutes(-utils::floor_mod(minutes, 1_440))
    }

    #[must_use]
    pub fn minus_seconds(&self, seconds: i64) -> Self {
        self.plus_seconds(-utils::floor_mod(seconds, utils::SECONDS_PER_DAY))
    }

    #[must_use]
    pub fn minus_nanos(&self, nanos: i64) -> Self {
        self.plus_nanos(-utils::floor_mod(nanos, utils::NANOS_PER_DAY))
    }

    fn plus_nanos_wrapping(&self, nanos: i64) -> Self {
        let nano_of_day = utils::floor_mod(self.nano_of_day() + nanos, utils::NANOS_PER_DAY);
        // nano_of_day is reduced into range, so the constructor holds.
        Self::of_nano_of_day(nano_of_day).unwrap_or(*self)
    }
}

// ==== Field protocol ====

impl Temporal for LocalTime {
    fn is_supported(&self, field: TemporalField) -> bool {
        field.is_time_based()
    }

    fn range(&self, field: TemporalField) -> CivilResult<ValueRange> {
        if self.is_supported(field) {
            Ok(field.base_range())
        } else {
            Err(CivilError::UnsupportedField { field })
        }
    }

    fn get(&self, field: TemporalField) -> CivilResult<i64> {
        match field {
            TemporalField::NanoOfSecond => Ok(i64::from(self.nano)),
            TemporalField::NanoOfDay => Ok(self.nano_of_day()),
            TemporalField::MicroOfSecond => Ok(i64::from(self.nano / 1_000)),
            TemporalField::MicroOfDay => Ok(self.nano_of_day() / 1_000),
            TemporalField::MilliOfSecond => Ok(i64::from(self.nano / 1_000_000)),
            TemporalField::MilliOfDay => Ok(self.nano_of_day() / 1_000_000),
            TemporalField::SecondOfMinute => Ok(i64::from(self.second)),
            TemporalField::SecondOfDay => Ok(self.second_of_day()),
            TemporalField::MinuteOfHour => Ok(i64::from(self.minute)),
            TemporalField::MinuteOfDay => {
                Ok(i64::from(self.hour) * 60 + i64::from(self.minute))
            }
            TemporalField::HourOfAmpm => Ok(i64::from(self.hour % 12)),
            TemporalField::ClockHourOfAmpm => {
                let hour = i64::from(self.hour % 12);
                Ok(if hour == 0 { 12 } else { hour })
            }
            TemporalField::HourOfDay => Ok(i64::from(self.hour)),
            TemporalField::ClockHourOfDay => {
                Ok(if self.hour == 0 { 24 } else { i64::from(self.hour) })
            }
            TemporalField::AmpmOfDay => Ok(i64::from(self.hour / 12)),
            _ => Err(CivilError::UnsupportedField { field }),
        }
    }

    fn with(&self, field: TemporalField, value: i64) -> CivilResult<Self> {
        field.base_range().check(value, field)?;
        match field {
            TemporalField::NanoOfSecond => self.with_nano(value as u32),
            TemporalField::NanoOfDay => Self::of_nano_of_day(value),
            TemporalField::MicroOfSecond => self.with_nano((value * 1_000) as u32),
            TemporalField::MicroOfDay => Self::of_nano_of_day(value * 1_000),
            TemporalField::MilliOfSecond => self.with_nano((value * 1_000_000) as u32),
            TemporalField::MilliOfDay => Self::of_nano_of_day(value * 1_000_000),
            TemporalField::SecondOfMinute => self.with_second(value as u8),
            TemporalField::SecondOfDay => {
                Self::of_second_of_day(value).map(|time| Self { nano: self.nano, ..time })
            }
            TemporalField::MinuteOfHour => self.with_minute(value as u8),
            TemporalField::MinuteOfDay => Self::of_hms_nano(
                (value / 60) as u8,
                (value % 60) as u8,
                self.second,
                self.nano,
            ),
            TemporalField::HourOfAmpm => {
                self.with_hour((self.hour / 12) * 12 + value as u8)
            }
            TemporalField::ClockHourOfAmpm => {
                let hour = if value == 12 { 0 } else { value as u8 };
                self.with_hour((self.hour / 12) * 12 + hour)
            }
            TemporalField::HourOfDay => self.with_hour(value as u8),
            TemporalField::ClockHourOfDay => {
                self.with_hour(if value == 24 { 0 } else { value as u8 })
            }
            TemporalField::AmpmOfDay => {
                self.with_hour(value as u8 * 12 + self.hour % 12)
            }
            _ => Err(CivilError::UnsupportedField { field }),
        }
    }

    fn plus(&self, amount: i64, unit: TemporalUnit) -> CivilResult<Self> {
        match unit {
            TemporalUnit::Nanos => Ok(self.plus_nanos(amount)),
            TemporalUnit::Micros => {
                Ok(self.plus_nanos(utils::floor_mod(amount, utils::NANOS_PER_DAY / 1_000) * 1_000))
            }
            TemporalUnit::Millis => Ok(self.plus_nanos(
                utils::floor_mod(amount, utils::NANOS_PER_DAY / 1_000_000) * 1_000_000,
            )),
            TemporalUnit::Seconds => Ok(self.plus_seconds(amount)),
            TemporalUnit::Minutes => Ok(self.plus_minutes(amount)),
            TemporalUnit::Hours => Ok(self.plus_hours(amount)),
            TemporalUnit::HalfDays => Ok(self.plus_hours(utils::floor_mod(amount, 2) * 12)),
            _ => Err(CivilError::UnsupportedUnit { unit }),
        }
    }

    fn until(&self, end: &Self, unit: TemporalUnit) -> CivilResult<i64> {
        let Some(unit_nanos) = unit.exact_nanos() else {
            return Err(CivilError::UnsupportedUnit { unit });
        };
        if unit == TemporalUnit::Days {
            return Err(CivilError::UnsupportedUnit { unit });
        }
        Ok((end.nano_of_day() - self.nano_of_day()) / unit_nanos)
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::text::write_iso_local_time(f, self)
    }
}

impl FromStr for LocalTime {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::text::parse_iso_local_time(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nano_of_day_round_trip() {
        let time = LocalTime::of_hms_nano(13, 45, 56, 123_456_789).unwrap();
        assert_eq!(LocalTime::of_nano_of_day(time.nano_of_day()).unwrap(), time);
        assert_eq!(LocalTime::MIDNIGHT.nano_of_day(), 0);
        assert_eq!(LocalTime::MAX.nano_of_day(), utils::NANOS_PER_DAY - 1);
    }

    #[test]
    fn constructors_validate() {
        assert!(LocalTime::of(24, 0, 0).is_err());
        assert!(LocalTime::of(0, 60, 0).is_err());
        assert!(LocalTime::of_hms_nano(0, 0, 0, 1_000_000_000).is_err());
        assert!(LocalTime::of_nano_of_day(utils::NANOS_PER_DAY).is_err());
        assert!(LocalTime::of_nano_of_day(-1).is_err());
    }

    #[test]
    fn arithmetic_wraps_around_midnight() {
        let late = LocalTime::of(23, 30, 0).unwrap();
        assert_eq!(late.plus_hours(2), LocalTime::of(1, 30, 0).unwrap());
        assert_eq!(late.plus_hours(-24), late);
        assert_eq!(late.plus_minutes(45), LocalTime::of(0, 15, 0).unwrap());
        assert_eq!(
            LocalTime::MIDNIGHT.minus_nanos(1),
            LocalTime::MAX
        );
        assert_eq!(LocalTime::MIDNIGHT.minus_hours(25), LocalTime::of(23, 0, 0).unwrap());
    }

    #[test]
    fn clock_hour_fields() {
        let midnight = LocalTime::MIDNIGHT;
        assert_eq!(midnight.get(TemporalField::ClockHourOfDay).unwrap(), 24);
        assert_eq!(midnight.get(TemporalField::ClockHourOfAmpm).unwrap(), 12);
        assert_eq!(midnight.get(TemporalField::AmpmOfDay).unwrap(), 0);

        let afternoon = LocalTime::of(15, 0, 0).unwrap();
        assert_eq!(afternoon.get(TemporalField::HourOfAmpm).unwrap(), 3);
        assert_eq!(afternoon.get(TemporalField::AmpmOfDay).unwrap(), 1);

        let set = afternoon.with(TemporalField::AmpmOfDay, 0).unwrap();
        assert_eq!(set, LocalTime::of(3, 0, 0).unwrap());
    }

    #[test]
    fn with_preserves_other_fields() {
        let time = LocalTime::of_hms_nano(10, 20, 30, 40).unwrap();
        let changed = time.with(TemporalField::MinuteOfDay, 90).unwrap();
        assert_eq!(changed, LocalTime::of_hms_nano(1, 30, 30, 40).unwrap());
        let with_second_of_day = time.with(TemporalField::SecondOfDay, 59).unwrap();
        assert_eq!(with_second_of_day, LocalTime::of_hms_nano(0, 0, 59, 40).unwrap());
        assert!(time.with(TemporalField::HourOfDay, 24).is_err());
    }

    #[test]
    fn until_in_time_units() {
        let early = LocalTime::of(1, 0, 0).unwrap();
        let late = LocalTime::of(23, 30, 0).unwrap();
        assert_eq!(early.until(&late, TemporalUnit::Hours).unwrap(), 22);
        assert_eq!(late.until(&early, TemporalUnit::Hours).unwrap(), -22);
        assert!(early.until(&late, TemporalUnit::Days).is_err());
    }
}
