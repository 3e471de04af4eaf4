//! A calendar date in the proleptic Gregorian (ISO-8601) calendar.

use core::fmt;
use core::str::FromStr;

use num_traits::Euclid;

use crate::components::weekday::Weekday;
use crate::error::CivilError;
use crate::fields::{Temporal, TemporalField, TemporalUnit, ValueRange};
use crate::utils;
use crate::CivilResult;

/// The supported year range, ±999,999,999.
pub const MIN_YEAR: i32 = -999_999_999;
/// The supported year range, ±999,999,999.
pub const MAX_YEAR: i32 = 999_999_999;

/// The epoch day of `-999999999-01-01`.
pub(crate) const MIN_EPOCH_DAY: i64 = -365_243_219_162;
/// The epoch day of `+999999999-12-31`.
pub(crate) const MAX_EPOCH_DAY: i64 = 365_241_780_471;

/// A date without a time, offset, or zone, such as 2008-06-30.
///
/// Dates follow the proleptic Gregorian calendar over the year range
/// ±999,999,999; the leap-year rule applies uniformly to all years,
/// including those before the calendar's historical adoption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDate {
    year: i32,
    month: u8,
    day: u8,
}

// ==== Public API ====

impl LocalDate {
    /// The smallest supported date, `-999999999-01-01`.
    pub const MIN: Self = Self {
        year: MIN_YEAR,
        month: 1,
        day: 1,
    };

    /// The largest supported date, `+999999999-12-31`.
    pub const MAX: Self = Self {
        year: MAX_YEAR,
        month: 12,
        day: 31,
    };

    /// A date from year, month (1..=12), and day-of-month.
    pub fn of(year: i32, month: u8, day: u8) -> CivilResult<Self> {
        check_year(i64::from(year))?;
        TemporalField::MonthOfYear
            .base_range()
            .check(i64::from(month), TemporalField::MonthOfYear)?;
        if day == 0 || day > 31 {
            return Err(CivilError::ValueOutOfRange {
                field: TemporalField::DayOfMonth,
                value: i64::from(day),
                min: 1,
                max: 31,
            });
        }
        if day > utils::days_in_month(year, month) {
            return Err(CivilError::DateNotValid { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// A date from year and day-of-year (1..=365/366).
    pub fn of_year_day(year: i32, day_of_year: u16) -> CivilResult<Self> {
        check_year(i64::from(year))?;
        let length = utils::days_in_year(year);
        if day_of_year == 0 || day_of_year > length {
            return Err(CivilError::ValueOutOfRange {
                field: TemporalField::DayOfYear,
                value: i64::from(day_of_year),
                min: 1,
                max: i64::from(length),
            });
        }
        let mut month = 1u8;
        let mut remaining = day_of_year;
        loop {
            let in_month = u16::from(utils::days_in_month(year, month));
            if remaining <= in_month {
                return Ok(Self {
                    year,
                    month,
                    day: remaining as u8,
                });
            }
            remaining -= in_month;
            month += 1;
        }
    }

    /// A date from a count of days since 1970-01-01.
    ///
    /// The conversion decomposes the day count over the 146,097-day
    /// 400-year Gregorian cycle, using a March-based year so the leap
    /// day falls at the end of the cycle year.
    pub fn from_epoch_day(epoch_day: i64) -> CivilResult<Self> {
        TemporalField::EpochDay
            .base_range()
            .check(epoch_day, TemporalField::EpochDay)?;
        let mut zero_day = epoch_day + utils::DAYS_0000_TO_1970;
        // Shift to March-based years so the leap day is the last day
        // of the cycle year.
        zero_day -= 60;
        let mut adjust = 0i64;
        if zero_day < 0 {
            let adjust_cycles = (zero_day + 1) / utils::DAYS_PER_CYCLE - 1;
            adjust = adjust_cycles * 400;
            zero_day += -adjust_cycles * utils::DAYS_PER_CYCLE;
        }
        let mut year_est = (400 * zero_day + 591) / utils::DAYS_PER_CYCLE;
        let mut day_est = zero_day - (365 * year_est + year_est / 4 - year_est / 100 + year_est / 400);
        if day_est < 0 {
            year_est -= 1;
            day_est = zero_day - (365 * year_est + year_est / 4 - year_est / 100 + year_est / 400);
        }
        year_est += adjust;
        let march_day_of_year = day_est;
        let march_month = (march_day_of_year * 5 + 2) / 153;
        let month = ((march_month + 2) % 12) + 1;
        let day = march_day_of_year - (march_month * 306 + 5) / 10 + 1;
        year_est += march_month / 10;
        Ok(Self {
            year: year_est as i32,
            month: month as u8,
            day: day as u8,
        })
    }

    /// The count of days since 1970-01-01.
    #[must_use]
    pub fn to_epoch_day(&self) -> i64 {
        let y = i64::from(self.year);
        let m = i64::from(self.month);
        let mut total = 365 * y;
        if y >= 0 {
            total += (y + 3) / 4 - (y + 99) / 100 + (y + 399) / 400;
        } else {
            total -= y / -4 - y / -100 + y / -400;
        }
        total += (367 * m - 362) / 12;
        total += i64::from(self.day) - 1;
        if m > 2 {
            total -= 1;
            if !utils::is_leap_year(self.year) {
                total -= 1;
            }
        }
        total - utils::DAYS_0000_TO_1970
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// The month-of-year, 1 (January) through 12 (December).
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// The ISO day-of-week. 1970-01-01 was a Thursday.
    #[must_use]
    pub fn day_of_week(&self) -> Weekday {
        let dow0 = utils::floor_mod(self.to_epoch_day() + 3, 7);
        // dow0 is 0..=6, so the lookup cannot fail.
        Weekday::from_iso_number(dow0 + 1).unwrap_or(Weekday::Monday)
    }

    /// The day-of-year, 1..=365 (366 in leap years).
    #[must_use]
    pub fn day_of_year(&self) -> u16 {
        let mut total = u16::from(self.day);
        for month in 1..self.month {
            total += u16::from(utils::days_in_month(self.year, month));
        }
        total
    }

    #[must_use]
    pub const fn is_leap_year(&self) -> bool {
        utils::is_leap_year(self.year)
    }

    #[must_use]
    pub const fn length_of_month(&self) -> u8 {
        utils::days_in_month(self.year, self.month)
    }

    #[must_use]
    pub const fn length_of_year(&self) -> u16 {
        utils::days_in_year(self.year)
    }

    /// Adds a number of days, going through the epoch-day form.
    pub fn plus_days(&self, days: i64) -> CivilResult<Self> {
        if days == 0 {
            return Ok(*self);
        }
        let epoch_day = utils::checked_add(self.to_epoch_day(), days)?;
        if !(MIN_EPOCH_DAY..=MAX_EPOCH_DAY).contains(&epoch_day) {
            return Err(CivilError::ArithmeticOverflow);
        }
        Self::from_epoch_day(epoch_day)
    }

    pub fn plus_weeks(&self, weeks: i64) -> CivilResult<Self> {
        self.plus_days(utils::checked_mul(weeks, 7)?)
    }

    /// Adds a number of months, clamping the day-of-month to the last
    /// valid day of the target month.
    pub fn plus_months(&self, months: i64) -> CivilResult<Self> {
        if months == 0 {
            return Ok(*self);
        }
        let month_count = i64::from(self.year) * 12 + i64::from(self.month) - 1;
        let calc = utils::checked_add(month_count, months)?;
        let (year, month0) = Euclid::div_rem_euclid(&calc, &12);
        let year = check_year_arithmetic(year)?;
        Ok(Self::resolve_previous_valid(
            year,
            (month0 + 1) as u8,
            self.day,
        ))
    }

    /// Adds a number of years, clamping February 29 to February 28 in
    /// non-leap target years.
    pub fn plus_years(&self, years: i64) -> CivilResult<Self> {
        if years == 0 {
            return Ok(*self);
        }
        let year = check_year_arithmetic(utils::checked_add(i64::from(self.year), years)?)?;
        Ok(Self::resolve_previous_valid(year, self.month, self.day))
    }

    pub fn minus_days(&self, days: i64) -> CivilResult<Self> {
        self.plus_days(utils::checked_sub(0, days)?)
    }

    pub fn minus_weeks(&self, weeks: i64) -> CivilResult<Self> {
        self.plus_weeks(utils::checked_sub(0, weeks)?)
    }

    pub fn minus_months(&self, months: i64) -> CivilResult<Self> {
        self.plus_months(utils::checked_sub(0, months)?)
    }

    pub fn minus_years(&self, years: i64) -> CivilResult<Self> {
        self.plus_years(utils::checked_sub(0, years)?)
    }

    /// Replaces the year, clamping the day for February 29.
    pub fn with_year(&self, year: i32) -> CivilResult<Self> {
        check_year(i64::from(year))?;
        Ok(Self::resolve_previous_valid(year, self.month, self.day))
    }

    /// Replaces the month, clamping the day to the month length.
    pub fn with_month(&self, month: u8) -> CivilResult<Self> {
        TemporalField::MonthOfYear
            .base_range()
            .check(i64::from(month), TemporalField::MonthOfYear)?;
        Ok(Self::resolve_previous_valid(self.year, month, self.day))
    }

    /// Replaces the day-of-month; the day must exist in the month.
    pub fn with_day_of_month(&self, day: u8) -> CivilResult<Self> {
        Self::of(self.year, self.month, day)
    }

    pub fn with_day_of_year(&self, day_of_year: u16) -> CivilResult<Self> {
        Self::of_year_day(self.year, day_of_year)
    }

    /// Days from this date until `end`; negative when `end` is
    /// earlier.
    #[must_use]
    pub fn days_until(&self, end: &Self) -> i64 {
        end.to_epoch_day() - self.to_epoch_day()
    }

    pub(crate) fn proleptic_month(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Complete months from this date until `end`, dropping the
    /// partial month symmetrically in both directions.
    pub(crate) fn months_until(&self, end: &Self) -> i64 {
        let packed_start = self.proleptic_month() * 32 + i64::from(self.day);
        let packed_end = end.proleptic_month() * 32 + i64::from(end.day);
        (packed_end - packed_start) / 32
    }

    fn resolve_previous_valid(year: i32, month: u8, day: u8) -> Self {
        Self {
            year,
            month,
            day: day.min(utils::days_in_month(year, month)),
        }
    }

    // ==== ISO week-date fields ====

    /// The (week-based-year, week-of-year) pair of the ISO week date.
    pub(crate) fn iso_week(&self) -> (i32, u32) {
        let day_of_year = i64::from(self.day_of_year());
        let day_of_week = i64::from(self.day_of_week().iso_number());
        let week = (day_of_year - day_of_week + 10) / 7;
        if week == 0 {
            let prior_year = self.year - 1;
            return (prior_year, iso_weeks_in_year(prior_year));
        }
        if week == 53 && iso_weeks_in_year(self.year) == 52 {
            return (self.year + 1, 1);
        }
        (self.year, week as u32)
    }
}

/// The number of ISO weeks in a week-based year: 52, or 53 when the
/// year starts on a Thursday or is a leap year starting on a
/// Wednesday.
pub(crate) fn iso_weeks_in_year(year: i32) -> u32 {
    let jan_1_dow = utils::floor_mod(first_day_epoch(year) + 3, 7) + 1;
    if jan_1_dow == 4 || (jan_1_dow == 3 && utils::is_leap_year(year)) {
        53
    } else {
        52
    }
}

fn first_day_epoch(year: i32) -> i64 {
    LocalDate {
        year,
        month: 1,
        day: 1,
    }
    .to_epoch_day()
}

fn check_year(year: i64) -> CivilResult<i32> {
    TemporalField::Year
        .base_range()
        .check(year, TemporalField::Year)?;
    Ok(year as i32)
}

fn check_year_arithmetic(year: i64) -> CivilResult<i32> {
    if !(i64::from(MIN_YEAR)..=i64::from(MAX_YEAR)).contains(&year) {
        return Err(CivilError::ArithmeticOverflow);
    }
    Ok(year as i32)
}

// ==== Field protocol ====

impl Temporal for LocalDate {
    fn is_supported(&self, field: TemporalField) -> bool {
        field.is_date_based()
    }

    fn range(&self, field: TemporalField) -> CivilResult<ValueRange> {
        match field {
            TemporalField::DayOfMonth => {
                Ok(ValueRange::of(1, i64::from(self.length_of_month())))
            }
            TemporalField::DayOfYear => Ok(ValueRange::of(1, i64::from(self.length_of_year()))),
            TemporalField::YearOfEra => Ok(if self.year <= 0 {
                ValueRange::of(1, i64::from(MAX_YEAR) + 1)
            } else {
                ValueRange::of(1, i64::from(MAX_YEAR))
            }),
            _ if self.is_supported(field) => Ok(field.base_range()),
            _ => Err(CivilError::UnsupportedField { field }),
        }
    }

    fn get(&self, field: TemporalField) -> CivilResult<i64> {
        match field {
            TemporalField::DayOfWeek => Ok(i64::from(self.day_of_week().iso_number())),
            TemporalField::DayOfMonth => Ok(i64::from(self.day)),
            TemporalField::DayOfYear => Ok(i64::from(self.day_of_year())),
            TemporalField::EpochDay => Ok(self.to_epoch_day()),
            TemporalField::MonthOfYear => Ok(i64::from(self.month)),
            TemporalField::EpochMonth => Ok(self.proleptic_month() - 1970 * 12),
            TemporalField::YearOfEra => Ok(i64::from(if self.year >= 1 {
                self.year
            } else {
                1 - self.year
            })),
            TemporalField::Year => Ok(i64::from(self.year)),
            TemporalField::Era => Ok(i64::from(self.year >= 1)),
            _ => Err(CivilError::UnsupportedField { field }),
        }
    }

    fn with(&self, field: TemporalField, value: i64) -> CivilResult<Self> {
        self.range(field)?.check(value, field)?;
        match field {
            TemporalField::DayOfWeek => {
                self.plus_days(value - i64::from(self.day_of_week().iso_number()))
            }
            TemporalField::DayOfMonth => self.with_day_of_month(value as u8),
            TemporalField::DayOfYear => self.with_day_of_year(value as u16),
            TemporalField::EpochDay => Self::from_epoch_day(value),
            TemporalField::MonthOfYear => self.with_month(value as u8),
            TemporalField::EpochMonth => {
                self.plus_months(value - (self.proleptic_month() - 1970 * 12))
            }
            TemporalField::YearOfEra => self.with_year(if self.year >= 1 {
                value as i32
            } else {
                1 - value as i32
            }),
            TemporalField::Year => self.with_year(value as i32),
            TemporalField::Era => {
                if value == self.get(TemporalField::Era)? {
                    Ok(*self)
                } else {
                    self.with_year(1 - self.year)
                }
            }
            _ => Err(CivilError::UnsupportedField { field }),
        }
    }

    fn plus(&self, amount: i64, unit: TemporalUnit) -> CivilResult<Self> {
        match unit {
            TemporalUnit::Days => self.plus_days(amount),
            TemporalUnit::Weeks => self.plus_weeks(amount),
            TemporalUnit::Months => self.plus_months(amount),
            TemporalUnit::Years => self.plus_years(amount),
            TemporalUnit::Decades => self.plus_years(utils::checked_mul(amount, 10)?),
            TemporalUnit::Centuries => self.plus_years(utils::checked_mul(amount, 100)?),
            TemporalUnit::Millennia => self.plus_years(utils::checked_mul(amount, 1_000)?),
            TemporalUnit::Eras => {
                let era = self.get(TemporalField::Era)?;
                self.with(TemporalField::Era, utils::checked_add(era, amount)?)
            }
            _ => Err(CivilError::UnsupportedUnit { unit }),
        }
    }

    fn until(&self, end: &Self, unit: TemporalUnit) -> CivilResult<i64> {
        match unit {
            TemporalUnit::Days => Ok(self.days_until(end)),
            TemporalUnit::Weeks => Ok(self.days_until(end) / 7),
            TemporalUnit::Months => Ok(self.months_until(end)),
            TemporalUnit::Years => Ok(self.months_until(end) / 12),
            TemporalUnit::Decades => Ok(self.months_until(end) / 120),
            TemporalUnit::Centuries => Ok(self.months_until(end) / 1_200),
            TemporalUnit::Millennia => Ok(self.months_until(end) / 12_000),
            TemporalUnit::Eras => {
                Ok(end.get(TemporalField::Era)? - self.get(TemporalField::Era)?)
            }
            _ => Err(CivilError::UnsupportedUnit { unit }),
        }
    }
}

impl fmt::Display for LocalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::text::write_iso_local_date(f, self)
    }
}

impl FromStr for LocalDate {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::text::parse_iso_local_date(s)
    }
}
