//! The day-of-week type.

use core::fmt;
use core::str::FromStr;

use crate::error::CivilError;
use crate::fields::TemporalField;
use crate::utils;
use crate::CivilResult;

/// A day of the week, numbered 1 (Monday) through 7 (Sunday) per
/// ISO-8601.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Weekday {
    Monday = 1,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// The ISO-8601 number of the day, Monday = 1 through Sunday = 7.
    #[must_use]
    pub const fn iso_number(self) -> u8 {
        self as u8
    }

    /// Looks a weekday up from its ISO-8601 number.
    pub fn from_iso_number(number: i64) -> CivilResult<Self> {
        match number {
            1 => Ok(Self::Monday),
            2 => Ok(Self::Tuesday),
            3 => Ok(Self::Wednesday),
            4 => Ok(Self::Thursday),
            5 => Ok(Self::Friday),
            6 => Ok(Self::Saturday),
            7 => Ok(Self::Sunday),
            _ => Err(CivilError::ValueOutOfRange {
                field: TemporalField::DayOfWeek,
                value: number,
                min: 1,
                max: 7,
            }),
        }
    }

    /// The weekday `days` later, wrapping around the week.
    #[must_use]
    pub fn plus(self, days: i64) -> Self {
        let base = i64::from(self.iso_number()) - 1;
        let shifted = utils::floor_mod(base + utils::floor_mod(days, 7), 7);
        // shifted is 0..=6, so the lookup cannot fail.
        match shifted {
            0 => Self::Monday,
            1 => Self::Tuesday,
            2 => Self::Wednesday,
            3 => Self::Thursday,
            4 => Self::Friday,
            5 => Self::Saturday,
            _ => Self::Sunday,
        }
    }

    /// The weekday `days` earlier, wrapping around the week.
    #[must_use]
    pub fn minus(self, days: i64) -> Self {
        self.plus(-utils::floor_mod(days, 7))
    }

    pub(crate) const fn short_name(self) -> &'static str {
        match self {
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
            Self::Sunday => "Sun",
        }
    }

    const fn full_name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A parsing error for `Weekday`.
#[derive(Debug, Clone, Copy)]
pub struct ParseWeekdayError;

impl fmt::Display for ParseWeekdayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid day of the week")
    }
}

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    /// Accepts short ("Mon") and full ("Monday") English names,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [Weekday; 7] = [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ];
        ALL.into_iter()
            .find(|day| {
                s.eq_ignore_ascii_case(day.short_name()) || s.eq_ignore_ascii_case(day.full_name())
            })
            .ok_or(ParseWeekdayError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_around_arithmetic() {
        assert_eq!(Weekday::Monday.plus(1), Weekday::Tuesday);
        assert_eq!(Weekday::Sunday.plus(1), Weekday::Monday);
        assert_eq!(Weekday::Monday.plus(7), Weekday::Monday);
        assert_eq!(Weekday::Monday.plus(-1), Weekday::Sunday);
        assert_eq!(Weekday::Wednesday.plus(700), Weekday::Wednesday);
        assert_eq!(Weekday::Monday.minus(2), Weekday::Saturday);
        assert_eq!(Weekday::Friday.minus(i64::MAX), Weekday::Friday.plus(-(i64::MAX % 7)));
    }

    #[test]
    fn iso_numbers() {
        assert_eq!(Weekday::Monday.iso_number(), 1);
        assert_eq!(Weekday::Sunday.iso_number(), 7);
        assert_eq!(Weekday::from_iso_number(3).unwrap(), Weekday::Wednesday);
        assert!(Weekday::from_iso_number(0).is_err());
        assert!(Weekday::from_iso_number(8).is_err());
    }

    #[test]
    fn parses_names() {
        assert_eq!("tue".parse::<Weekday>().unwrap(), Weekday::Tuesday);
        assert_eq!("SUNDAY".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!("Noday".parse::<Weekday>().is_err());
    }
}
