//! The field and unit access protocol.
//!
//! Every value type in the crate answers a closed taxonomy of
//! [`TemporalField`]s and applies arithmetic over a closed taxonomy of
//! [`TemporalUnit`]s through the [`Temporal`] trait. The authoritative
//! `match` over the enums lives in each value type; the enums
//! themselves only carry classification and the context-free value
//! ranges.

use core::fmt;
use core::str::FromStr;

use crate::components::duration::Duration;
use crate::components::date::{MAX_EPOCH_DAY, MIN_EPOCH_DAY};
use crate::error::CivilError;
use crate::utils;
use crate::CivilResult;

/// The smallest epoch month (January of year −999,999,999).
const MIN_EPOCH_MONTH: i64 = -12_000_023_628;
/// The largest epoch month (December of year 999,999,999).
const MAX_EPOCH_MONTH: i64 = 11_999_976_359;

/// The complete enumeration of date-time fields.
///
/// Fields are queried with [`Temporal::get`] and set with
/// [`Temporal::with`]; a value type that does not understand a field
/// reports [`CivilError::UnsupportedField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalField {
    NanoOfSecond,
    NanoOfDay,
    MicroOfSecond,
    MicroOfDay,
    MilliOfSecond,
    MilliOfDay,
    SecondOfMinute,
    SecondOfDay,
    MinuteOfHour,
    MinuteOfDay,
    HourOfAmpm,
    ClockHourOfAmpm,
    HourOfDay,
    ClockHourOfDay,
    AmpmOfDay,
    DayOfWeek,
    DayOfMonth,
    DayOfYear,
    EpochDay,
    MonthOfYear,
    EpochMonth,
    YearOfEra,
    Year,
    Era,
    InstantSeconds,
    OffsetSeconds,
}

impl TemporalField {
    /// The context-free range of the field.
    ///
    /// Fields whose bounds depend on the value they are read from
    /// (day-of-month, day-of-year, year-of-era) report their outer
    /// envelope here; [`Temporal::range`] refines them.
    #[must_use]
    pub const fn base_range(self) -> ValueRange {
        match self {
            Self::NanoOfSecond => ValueRange::of(0, 999_999_999),
            Self::NanoOfDay => ValueRange::of(0, utils::NANOS_PER_DAY - 1),
            Self::MicroOfSecond => ValueRange::of(0, 999_999),
            Self::MicroOfDay => ValueRange::of(0, 86_399_999_999),
            Self::MilliOfSecond => ValueRange::of(0, 999),
            Self::MilliOfDay => ValueRange::of(0, 86_399_999),
            Self::SecondOfMinute => ValueRange::of(0, 59),
            Self::SecondOfDay => ValueRange::of(0, 86_399),
            Self::MinuteOfHour => ValueRange::of(0, 59),
            Self::MinuteOfDay => ValueRange::of(0, 1_439),
            Self::HourOfAmpm => ValueRange::of(0, 11),
            Self::ClockHourOfAmpm => ValueRange::of(1, 12),
            Self::HourOfDay => ValueRange::of(0, 23),
            Self::ClockHourOfDay => ValueRange::of(1, 24),
            Self::AmpmOfDay => ValueRange::of(0, 1),
            Self::DayOfWeek => ValueRange::of(1, 7),
            Self::DayOfMonth => ValueRange::of_variable_max(1, 28, 31),
            Self::DayOfYear => ValueRange::of_variable_max(1, 365, 366),
            Self::EpochDay => ValueRange::of(MIN_EPOCH_DAY, MAX_EPOCH_DAY),
            Self::MonthOfYear => ValueRange::of(1, 12),
            Self::EpochMonth => ValueRange::of(MIN_EPOCH_MONTH, MAX_EPOCH_MONTH),
            Self::YearOfEra => ValueRange::of_variable_max(1, 999_999_999, 1_000_000_000),
            Self::Year => ValueRange::of(-999_999_999, 999_999_999),
            Self::Era => ValueRange::of(0, 1),
            Self::InstantSeconds => ValueRange::of(i64::MIN, i64::MAX),
            Self::OffsetSeconds => ValueRange::of(-64_800, 64_800),
        }
    }

    /// Whether the field derives from the calendar date.
    #[must_use]
    pub const fn is_date_based(self) -> bool {
        matches!(
            self,
            Self::DayOfWeek
                | Self::DayOfMonth
                | Self::DayOfYear
                | Self::EpochDay
                | Self::MonthOfYear
                | Self::EpochMonth
                | Self::YearOfEra
                | Self::Year
                | Self::Era
        )
    }

    /// Whether the field derives from the time of day.
    #[must_use]
    pub const fn is_time_based(self) -> bool {
        matches!(
            self,
            Self::NanoOfSecond
                | Self::NanoOfDay
                | Self::MicroOfSecond
                | Self::MicroOfDay
                | Self::MilliOfSecond
                | Self::MilliOfDay
                | Self::SecondOfMinute
                | Self::SecondOfDay
                | Self::MinuteOfHour
                | Self::MinuteOfDay
                | Self::HourOfAmpm
                | Self::ClockHourOfAmpm
                | Self::HourOfDay
                | Self::ClockHourOfDay
                | Self::AmpmOfDay
        )
    }

    const fn name(self) -> &'static str {
        match self {
            Self::NanoOfSecond => "nano_of_second",
            Self::NanoOfDay => "nano_of_day",
            Self::MicroOfSecond => "micro_of_second",
            Self::MicroOfDay => "micro_of_day",
            Self::MilliOfSecond => "milli_of_second",
            Self::MilliOfDay => "milli_of_day",
            Self::SecondOfMinute => "second_of_minute",
            Self::SecondOfDay => "second_of_day",
            Self::MinuteOfHour => "minute_of_hour",
            Self::MinuteOfDay => "minute_of_day",
            Self::HourOfAmpm => "hour_of_ampm",
            Self::ClockHourOfAmpm => "clock_hour_of_ampm",
            Self::HourOfDay => "hour_of_day",
            Self::ClockHourOfDay => "clock_hour_of_day",
            Self::AmpmOfDay => "ampm_of_day",
            Self::DayOfWeek => "day_of_week",
            Self::DayOfMonth => "day_of_month",
            Self::DayOfYear => "day_of_year",
            Self::EpochDay => "epoch_day",
            Self::MonthOfYear => "month_of_year",
            Self::EpochMonth => "epoch_month",
            Self::YearOfEra => "year_of_era",
            Self::Year => "year",
            Self::Era => "era",
            Self::InstantSeconds => "instant_seconds",
            Self::OffsetSeconds => "offset_seconds",
        }
    }
}

/// A parsing error for `TemporalField`.
#[derive(Debug, Clone, Copy)]
pub struct ParseTemporalFieldError;

impl fmt::Display for ParseTemporalFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid field name")
    }
}

impl FromStr for TemporalField {
    type Err = ParseTemporalFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [TemporalField; 26] = [
            TemporalField::NanoOfSecond,
            TemporalField::NanoOfDay,
            TemporalField::MicroOfSecond,
            TemporalField::MicroOfDay,
            TemporalField::MilliOfSecond,
            TemporalField::MilliOfDay,
            TemporalField::SecondOfMinute,
            TemporalField::SecondOfDay,
            TemporalField::MinuteOfHour,
            TemporalField::MinuteOfDay,
            TemporalField::HourOfAmpm,
            TemporalField::ClockHourOfAmpm,
            TemporalField::HourOfDay,
            TemporalField::ClockHourOfDay,
            TemporalField::AmpmOfDay,
            TemporalField::DayOfWeek,
            TemporalField::DayOfMonth,
            TemporalField::DayOfYear,
            TemporalField::EpochDay,
            TemporalField::MonthOfYear,
            TemporalField::EpochMonth,
            TemporalField::YearOfEra,
            TemporalField::Year,
            TemporalField::Era,
            TemporalField::InstantSeconds,
            TemporalField::OffsetSeconds,
        ];
        ALL.into_iter()
            .find(|field| field.name() == s)
            .ok_or(ParseTemporalFieldError)
    }
}

impl fmt::Display for TemporalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The complete enumeration of date-time units.
///
/// Time-based units have exact durations; date-based units carry an
/// estimated duration for comparison but apply calendar arithmetic
/// when used with [`Temporal::plus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemporalUnit {
    Nanos,
    Micros,
    Millis,
    Seconds,
    Minutes,
    Hours,
    HalfDays,
    Days,
    Weeks,
    Months,
    Years,
    Decades,
    Centuries,
    Millennia,
    Eras,
    Forever,
}

impl TemporalUnit {
    /// The exact or estimated duration of one unit.
    ///
    /// Years are estimated at 365.2425 days, the mean Gregorian year.
    #[must_use]
    pub fn estimated_duration(self) -> Duration {
        match self {
            Self::Nanos => Duration::of_nanos(1),
            Self::Micros => Duration::of_nanos(1_000),
            Self::Millis => Duration::of_nanos(1_000_000),
            Self::Seconds => Duration::of_seconds(1),
            Self::Minutes => Duration::of_seconds(utils::SECONDS_PER_MINUTE),
            Self::Hours => Duration::of_seconds(utils::SECONDS_PER_HOUR),
            Self::HalfDays => Duration::of_seconds(utils::SECONDS_PER_DAY / 2),
            Self::Days => Duration::of_seconds(utils::SECONDS_PER_DAY),
            Self::Weeks => Duration::of_seconds(7 * utils::SECONDS_PER_DAY),
            Self::Months => Duration::of_seconds(31_556_952 / 12),
            Self::Years => Duration::of_seconds(31_556_952),
            Self::Decades => Duration::of_seconds(31_556_952 * 10),
            Self::Centuries => Duration::of_seconds(31_556_952 * 100),
            Self::Millennia => Duration::of_seconds(31_556_952 * 1_000),
            Self::Eras => Duration::of_seconds(31_556_952 * 1_000_000_000),
            Self::Forever => Duration::of_seconds(i64::MAX),
        }
    }

    /// The exact length of the unit in nanoseconds, for time-based
    /// units and days.
    #[must_use]
    pub(crate) const fn exact_nanos(self) -> Option<i64> {
        match self {
            Self::Nanos => Some(1),
            Self::Micros => Some(1_000),
            Self::Millis => Some(1_000_000),
            Self::Seconds => Some(utils::NANOS_PER_SECOND),
            Self::Minutes => Some(utils::NANOS_PER_MINUTE),
            Self::Hours => Some(utils::NANOS_PER_HOUR),
            Self::HalfDays => Some(utils::NANOS_PER_DAY / 2),
            Self::Days => Some(utils::NANOS_PER_DAY),
            _ => None,
        }
    }

    /// Whether the unit applies calendar arithmetic.
    #[must_use]
    pub const fn is_date_based(self) -> bool {
        matches!(
            self,
            Self::Days
                | Self::Weeks
                | Self::Months
                | Self::Years
                | Self::Decades
                | Self::Centuries
                | Self::Millennia
                | Self::Eras
        )
    }

    /// Whether the unit has an exact sub-day duration.
    #[must_use]
    pub const fn is_time_based(self) -> bool {
        matches!(
            self,
            Self::Nanos
                | Self::Micros
                | Self::Millis
                | Self::Seconds
                | Self::Minutes
                | Self::Hours
                | Self::HalfDays
        )
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Nanos => "nanos",
            Self::Micros => "micros",
            Self::Millis => "millis",
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::HalfDays => "half_days",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
            Self::Decades => "decades",
            Self::Centuries => "centuries",
            Self::Millennia => "millennia",
            Self::Eras => "eras",
            Self::Forever => "forever",
        }
    }
}

/// A parsing error for `TemporalUnit`.
#[derive(Debug, Clone, Copy)]
pub struct ParseTemporalUnitError;

impl fmt::Display for ParseTemporalUnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid unit name")
    }
}

impl FromStr for TemporalUnit {
    type Err = ParseTemporalUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nanos" => Ok(Self::Nanos),
            "micros" => Ok(Self::Micros),
            "millis" => Ok(Self::Millis),
            "seconds" => Ok(Self::Seconds),
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "half_days" => Ok(Self::HalfDays),
            "days" => Ok(Self::Days),
            "weeks" => Ok(Self::Weeks),
            "months" => Ok(Self::Months),
            "years" => Ok(Self::Years),
            "decades" => Ok(Self::Decades),
            "centuries" => Ok(Self::Centuries),
            "millennia" => Ok(Self::Millennia),
            "eras" => Ok(Self::Eras),
            "forever" => Ok(Self::Forever),
            _ => Err(ParseTemporalUnitError),
        }
    }
}

impl fmt::Display for TemporalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The range of valid values for a field.
///
/// Two of the four bounds only differ for fields whose extent depends
/// on context: day-of-month always starts at 1 but ends between 28 and
/// 31 depending on the month it is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRange {
    smallest_min: i64,
    largest_min: i64,
    smallest_max: i64,
    largest_max: i64,
}

impl ValueRange {
    /// A fixed range.
    #[must_use]
    pub const fn of(min: i64, max: i64) -> Self {
        Self {
            smallest_min: min,
            largest_min: min,
            smallest_max: max,
            largest_max: max,
        }
    }

    /// A range with a fixed minimum and a variable maximum.
    #[must_use]
    pub const fn of_variable_max(min: i64, smallest_max: i64, largest_max: i64) -> Self {
        Self {
            smallest_min: min,
            largest_min: min,
            smallest_max,
            largest_max,
        }
    }

    /// A fully variable range.
    #[must_use]
    pub const fn of_variable(
        smallest_min: i64,
        largest_min: i64,
        smallest_max: i64,
        largest_max: i64,
    ) -> Self {
        Self {
            smallest_min,
            largest_min,
            smallest_max,
            largest_max,
        }
    }

    #[must_use]
    pub const fn min(&self) -> i64 {
        self.smallest_min
    }

    #[must_use]
    pub const fn largest_min(&self) -> i64 {
        self.largest_min
    }

    #[must_use]
    pub const fn smallest_max(&self) -> i64 {
        self.smallest_max
    }

    #[must_use]
    pub const fn max(&self) -> i64 {
        self.largest_max
    }

    /// Whether `value` lies inside the outer envelope of the range.
    #[must_use]
    pub const fn is_valid(&self, value: i64) -> bool {
        self.smallest_min <= value && value <= self.largest_max
    }

    /// Validates `value` against the range, reporting `field` in the
    /// error on failure.
    pub fn check(&self, value: i64, field: TemporalField) -> CivilResult<i64> {
        if self.is_valid(value) {
            Ok(value)
        } else {
            Err(CivilError::ValueOutOfRange {
                field,
                value,
                min: self.smallest_min,
                max: self.largest_max,
            })
        }
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.smallest_min != self.largest_min {
            write!(f, "{}/{}", self.smallest_min, self.largest_min)?;
        } else {
            write!(f, "{}", self.smallest_min)?;
        }
        f.write_str(" - ")?;
        if self.smallest_max != self.largest_max {
            write!(f, "{}/{}", self.smallest_max, self.largest_max)
        } else {
            write!(f, "{}", self.largest_max)
        }
    }
}

/// The polymorphic field-access and arithmetic contract implemented by
/// every date-time value type.
///
/// Implementations are total over their supported sets: a supported
/// field never panics and an unsupported one always reports
/// [`CivilError::UnsupportedField`] / [`CivilError::UnsupportedUnit`].
pub trait Temporal: Sized {
    /// Whether this value can answer queries for `field`.
    fn is_supported(&self, field: TemporalField) -> bool;

    /// The valid range of `field` in the context of this value.
    fn range(&self, field: TemporalField) -> CivilResult<ValueRange>;

    /// Reads the value of `field`.
    fn get(&self, field: TemporalField) -> CivilResult<i64>;

    /// Returns a copy of this value with `field` set to `value`.
    fn with(&self, field: TemporalField, value: i64) -> CivilResult<Self>;

    /// Returns a copy of this value with `amount` of `unit` added.
    fn plus(&self, amount: i64, unit: TemporalUnit) -> CivilResult<Self>;

    /// Returns a copy of this value with `amount` of `unit`
    /// subtracted.
    fn minus(&self, amount: i64, unit: TemporalUnit) -> CivilResult<Self> {
        let negated = amount.checked_neg().ok_or(CivilError::ArithmeticOverflow)?;
        self.plus(negated, unit)
    }

    /// The number of complete `unit`s between this value and `end`.
    fn until(&self, end: &Self, unit: TemporalUnit) -> CivilResult<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for name in ["nano_of_day", "day_of_month", "year", "offset_seconds"] {
            let field: TemporalField = name.parse().unwrap();
            assert_eq!(field.to_string(), name);
        }
        assert!("day_of_fortnight".parse::<TemporalField>().is_err());
    }

    #[test]
    fn unit_classification() {
        assert!(TemporalUnit::Hours.is_time_based());
        assert!(!TemporalUnit::Hours.is_date_based());
        assert!(TemporalUnit::Months.is_date_based());
        assert!(!TemporalUnit::Forever.is_date_based());
        assert!(!TemporalUnit::Forever.is_time_based());
        assert!(TemporalUnit::Hours < TemporalUnit::Days);
    }

    #[test]
    fn range_check_reports_field() {
        let range = TemporalField::HourOfDay.base_range();
        assert_eq!(range.check(23, TemporalField::HourOfDay).unwrap(), 23);
        let err = range.check(24, TemporalField::HourOfDay).unwrap_err();
        assert_eq!(
            err,
            CivilError::ValueOutOfRange {
                field: TemporalField::HourOfDay,
                value: 24,
                min: 0,
                max: 23,
            }
        );
    }

    #[test]
    fn day_of_month_envelope() {
        let range = TemporalField::DayOfMonth.base_range();
        assert_eq!(range.min(), 1);
        assert_eq!(range.smallest_max(), 28);
        assert_eq!(range.max(), 31);
        assert!(range.is_valid(31));
        assert!(!range.is_valid(0));
    }
}
