//! Recurring yearly transition rules: the open-ended tail of a zone's
//! history.

use core::fmt;
use core::str::FromStr;

use crate::components::date::LocalDate;
use crate::components::datetime::LocalDateTime;
use crate::components::time::LocalTime;
use crate::components::weekday::Weekday;
use crate::components::offset::ZoneOffset;
use crate::error::CivilError;
use crate::fields::TemporalField;
use crate::utils;
use crate::zone::transition::ZoneOffsetTransition;
use crate::CivilResult;

/// Declares how a rule's local time is interpreted when converting it
/// to a UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeDefinition {
    /// The rule time is already UTC.
    Utc,
    /// The rule time is the wall time in force just before the
    /// transition.
    Wall,
    /// The rule time is in the zone's standard offset.
    Standard,
}

/// A parsing error for `TimeDefinition`.
#[derive(Debug, Clone, Copy)]
pub struct ParseTimeDefinitionError;

impl fmt::Display for ParseTimeDefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid time definition")
    }
}

impl FromStr for TimeDefinition {
    type Err = ParseTimeDefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "utc" => Ok(Self::Utc),
            "wall" => Ok(Self::Wall),
            "standard" => Ok(Self::Standard),
            _ => Err(ParseTimeDefinitionError),
        }
    }
}

impl fmt::Display for TimeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => "utc",
            Self::Wall => "wall",
            Self::Standard => "standard",
        }
        .fmt(f)
    }
}

/// A template that produces one [`ZoneOffsetTransition`] per year.
///
/// A rule names a month, a signed day-of-month indicator, an optional
/// day-of-week adjustment, and a local time qualified by a
/// [`TimeDefinition`]. A positive indicator means that exact day
/// (adjusted forward to the named weekday); a negative indicator
/// counts back from the end of the month (adjusted backward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneOffsetTransitionRule {
    month: u8,
    day_of_month_indicator: i8,
    day_of_week: Option<Weekday>,
    local_time: LocalTime,
    time_definition: TimeDefinition,
    standard_offset: ZoneOffset,
    offset_before: ZoneOffset,
    offset_after: ZoneOffset,
}

impl ZoneOffsetTransitionRule {
    /// A validated rule.
    #[allow(clippy::too_many_arguments)]
    pub fn of(
        month: u8,
        day_of_month_indicator: i8,
        day_of_week: Option<Weekday>,
        local_time: LocalTime,
        time_definition: TimeDefinition,
        standard_offset: ZoneOffset,
        offset_before: ZoneOffset,
        offset_after: ZoneOffset,
    ) -> CivilResult<Self> {
        TemporalField::MonthOfYear
            .base_range()
            .check(i64::from(month), TemporalField::MonthOfYear)?;
        if day_of_month_indicator == 0 || !(-28..=31).contains(&day_of_month_indicator) {
            return Err(CivilError::ZoneRulesInvalid {
                message: "day-of-month indicator must be in -28..=31 and nonzero",
            });
        }
        if local_time.nano() != 0 {
            return Err(CivilError::ZoneRulesInvalid {
                message: "rule local time must not have sub-second components",
            });
        }
        if offset_before == offset_after {
            return Err(CivilError::ZoneRulesInvalid {
                message: "rule offsets must differ",
            });
        }
        Ok(Self {
            month,
            day_of_month_indicator,
            day_of_week,
            local_time,
            time_definition,
            standard_offset,
            offset_before,
            offset_after,
        })
    }

    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[must_use]
    pub const fn day_of_month_indicator(&self) -> i8 {
        self.day_of_month_indicator
    }

    #[must_use]
    pub const fn day_of_week(&self) -> Option<Weekday> {
        self.day_of_week
    }

    #[must_use]
    pub const fn local_time(&self) -> LocalTime {
        self.local_time
    }

    #[must_use]
    pub const fn time_definition(&self) -> TimeDefinition {
        self.time_definition
    }

    #[must_use]
    pub const fn standard_offset(&self) -> ZoneOffset {
        self.standard_offset
    }

    #[must_use]
    pub const fn offset_before(&self) -> ZoneOffset {
        self.offset_before
    }

    #[must_use]
    pub const fn offset_after(&self) -> ZoneOffset {
        self.offset_after
    }

    /// Materializes the transition this rule produces in `year`.
    #[must_use]
    pub fn create_transition(&self, year: i32) -> ZoneOffsetTransition {
        let date = self.transition_date(year);
        let local = LocalDateTime::new(date, self.local_time);
        // Re-express the rule time as the wall time at offset_before.
        let shift_seconds = match self.time_definition {
            TimeDefinition::Wall => 0,
            TimeDefinition::Utc => self.offset_before.seconds_i64(),
            TimeDefinition::Standard => {
                self.offset_before.seconds_i64() - self.standard_offset.seconds_i64()
            }
        };
        let wall_before = local.plus_seconds(shift_seconds).unwrap_or(local);
        ZoneOffsetTransition::new_unchecked(wall_before, self.offset_before, self.offset_after)
    }

    fn transition_date(&self, year: i32) -> LocalDate {
        let indicator = i64::from(self.day_of_month_indicator);
        let length = i64::from(utils::days_in_month(year, self.month));
        let day = if indicator < 0 {
            (length + 1 + indicator).max(1) as u8
        } else {
            indicator.min(length) as u8
        };
        let date = LocalDate::of(year, self.month, day)
            // day is clamped into the month above.
            .unwrap_or(LocalDate::MIN);
        let Some(weekday) = self.day_of_week else {
            return date;
        };
        let adjusted = if self.day_of_month_indicator < 0 {
            crate::components::adjusters::previous_or_same(date, weekday)
        } else {
            crate::components::adjusters::next_or_same(date, weekday)
        };
        adjusted.unwrap_or(date)
    }
}

impl fmt::Display for ZoneOffsetTransitionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TransitionRule[month {} day {}",
            self.month, self.day_of_month_indicator
        )?;
        if let Some(weekday) = self.day_of_week {
            write!(f, " ({weekday})")?;
        }
        write!(
            f,
            " at {} {}, {} to {}]",
            self.local_time, self.time_definition, self.offset_before, self.offset_after
        )
    }
}
