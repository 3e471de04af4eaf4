//! A point on the UTC time-line.

use num_traits::Euclid;

use crate::components::duration::Duration;
use crate::components::offset::ZoneOffset;
use crate::components::offset_datetime::OffsetDateTime;
use crate::error::CivilError;
use crate::fields::{Temporal, TemporalField, TemporalUnit, ValueRange};
use crate::sys::Clock;
use crate::utils;
use crate::CivilResult;

/// An instantaneous point on the UTC time-line.
///
/// Instants count SI seconds from 1970-01-01T00:00:00Z with a fixed
/// 86,400-second day; leap seconds are not modeled. The nanosecond
/// part is always normalized into `0..1_000_000_000`, so the ordering
/// derived from the two fields is the time-line ordering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    epoch_second: i64,
    nano: u32,
}

// ==== Public API ====

impl Instant {
    /// 1970-01-01T00:00:00Z.
    pub const EPOCH: Self = Self {
        epoch_second: 0,
        nano: 0,
    };

    /// An instant at a whole epoch second.
    #[must_use]
    pub const fn of_epoch_second(epoch_second: i64) -> Self {
        Self {
            epoch_second,
            nano: 0,
        }
    }

    /// An instant at an epoch second plus a nanosecond adjustment of
    /// either sign.
    pub fn of_epoch_second_adjusted(
        epoch_second: i64,
        nano_adjustment: i64,
    ) -> CivilResult<Self> {
        let (carry_seconds, nano) =
            Euclid::div_rem_euclid(&nano_adjustment, &utils::NANOS_PER_SECOND);
        Ok(Self {
            epoch_second: utils::checked_add(epoch_second, carry_seconds)?,
            nano: nano as u32,
        })
    }

    /// An instant from milliseconds since the epoch.
    #[must_use]
    pub fn of_epoch_milli(epoch_milli: i64) -> Self {
        let (epoch_second, milli_of_second) = Euclid::div_rem_euclid(&epoch_milli, &1_000);
        Self {
            epoch_second,
            nano: (milli_of_second * 1_000_000) as u32,
        }
    }

    /// Reads the current instant from the provided clock.
    #[must_use]
    pub fn now(clock: &impl Clock) -> Self {
        clock.instant()
    }

    /// Seconds since the epoch; the sign of the instant.
    #[must_use]
    pub const fn epoch_second(&self) -> i64 {
        self.epoch_second
    }

    /// Nanosecond-of-second, in `0..1_000_000_000`.
    #[must_use]
    pub const fn nano(&self) -> u32 {
        self.nano
    }

    /// Milliseconds since the epoch, widened so it cannot overflow.
    #[must_use]
    pub fn to_epoch_milli(&self) -> i128 {
        i128::from(self.epoch_second) * 1_000 + i128::from(self.nano / 1_000_000)
    }

    pub fn plus_seconds(&self, seconds: i64) -> CivilResult<Self> {
        Ok(Self {
            epoch_second: utils::checked_add(self.epoch_second, seconds)?,
            nano: self.nano,
        })
    }

    pub fn minus_seconds(&self, seconds: i64) -> CivilResult<Self> {
        Ok(Self {
            epoch_second: utils::checked_sub(self.epoch_second, seconds)?,
            nano: self.nano,
        })
    }

    pub fn plus_millis(&self, millis: i64) -> CivilResult<Self> {
        let (carry_seconds, milli_of_second) = Euclid::div_rem_euclid(&millis, &1_000);
        let epoch_second = utils::checked_add(self.epoch_second, carry_seconds)?;
        Self::of_epoch_second_adjusted(
            epoch_second,
            i64::from(self.nano) + milli_of_second * 1_000_000,
        )
    }

    pub fn plus_nanos(&self, nanos: i64) -> CivilResult<Self> {
        let (carry_seconds, nano_of_second) =
            Euclid::div_rem_euclid(&nanos, &utils::NANOS_PER_SECOND);
        let epoch_second = utils::checked_add(self.epoch_second, carry_seconds)?;
        Self::of_epoch_second_adjusted(epoch_second, i64::from(self.nano) + nano_of_second)
    }

    pub fn plus_duration(&self, duration: Duration) -> CivilResult<Self> {
        let epoch_second = utils::checked_add(self.epoch_second, duration.seconds())?;
        Self::of_epoch_second_adjusted(
            epoch_second,
            i64::from(self.nano) + i64::from(duration.subsec_nanos()),
        )
    }

    pub fn minus_duration(&self, duration: Duration) -> CivilResult<Self> {
        let epoch_second = utils::checked_sub(self.epoch_second, duration.seconds())?;
        Self::of_epoch_second_adjusted(
            epoch_second,
            i64::from(self.nano) - i64::from(duration.subsec_nanos()),
        )
    }

    /// The local view of this instant at a fixed offset.
    ///
    /// Fails with [`CivilError::ArithmeticOverflow`] when the result
    /// lies outside the materializable year range.
    pub fn at_offset(&self, offset: ZoneOffset) -> CivilResult<OffsetDateTime> {
        OffsetDateTime::of_instant(*self, offset)
    }
}

// ==== Field protocol ====

impl Temporal for Instant {
    fn is_supported(&self, field: TemporalField) -> bool {
        matches!(
            field,
            TemporalField::InstantSeconds
                | TemporalField::NanoOfSecond
                | TemporalField::MicroOfSecond
                | TemporalField::MilliOfSecond
        )
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
            TemporalField::InstantSeconds => Ok(self.epoch_second),
            TemporalField::NanoOfSecond => Ok(i64::from(self.nano)),
            TemporalField::MicroOfSecond => Ok(i64::from(self.nano / 1_000)),
            TemporalField::MilliOfSecond => Ok(i64::from(self.nano / 1_000_000)),
            _ => Err(CivilError::UnsupportedField { field }),
        }
    }

    fn with(&self, field: TemporalField, value: i64) -> CivilResult<Self> {
        field.base_range().check(value, field)?;
        match field {
            TemporalField::InstantSeconds => Ok(Self {
                epoch_second: value,
                nano: self.nano,
            }),
            TemporalField::NanoOfSecond => Ok(Self {
                epoch_second: self.epoch_second,
                nano: value as u32,
            }),
            TemporalField::MicroOfSecond => Ok(Self {
                epoch_second: self.epoch_second,
                nano: (value * 1_000) as u32,
            }),
            TemporalField::MilliOfSecond => Ok(Self {
                epoch_second: self.epoch_second,
                nano: (value * 1_000_000) as u32,
            }),
            _ => Err(CivilError::UnsupportedField { field }),
        }
    }

    fn plus(&self, amount: i64, unit: TemporalUnit) -> CivilResult<Self> {
        match unit {
            TemporalUnit::Nanos => self.plus_nanos(amount),
            TemporalUnit::Micros => self.plus_nanos(utils::checked_mul(amount, 1_000)?),
            TemporalUnit::Millis => self.plus_millis(amount),
            TemporalUnit::Seconds => self.plus_seconds(amount),
            TemporalUnit::Minutes => {
                self.plus_seconds(utils::checked_mul(amount, utils::SECONDS_PER_MINUTE)?)
            }
            TemporalUnit::Hours => {
                self.plus_seconds(utils::checked_mul(amount, utils::SECONDS_PER_HOUR)?)
            }
            TemporalUnit::HalfDays => {
                self.plus_seconds(utils::checked_mul(amount, utils::SECONDS_PER_DAY / 2)?)
            }
            TemporalUnit::Days => {
                self.plus_seconds(utils::checked_mul(amount, utils::SECONDS_PER_DAY)?)
            }
            _ => Err(CivilError::UnsupportedUnit { unit }),
        }
    }

    fn until(&self, end: &Self, unit: TemporalUnit) -> CivilResult<i64> {
        let Some(unit_nanos) = unit.exact_nanos() else {
            return Err(CivilError::UnsupportedUnit { unit });
        };
        let diff = i128::from(end.epoch_second) * i128::from(utils::NANOS_PER_SECOND)
            + i128::from(end.nano)
            - i128::from(self.epoch_second) * i128::from(utils::NANOS_PER_SECOND)
            - i128::from(self.nano);
        i64::try_from(diff / i128::from(unit_nanos)).map_err(|_| CivilError::ArithmeticOverflow)
    }
}
