//! A signed elapsed amount of time in seconds and nanoseconds.

use num_traits::Euclid;

use crate::components::instant::Instant;
use crate::error::CivilError;
use crate::utils;
use crate::CivilResult;

const NANOS_PER_SECOND: i64 = utils::NANOS_PER_SECOND;

/// A signed duration on the machine time-line, measured in seconds and
/// nanoseconds.
///
/// The representation is always normalized: `nanos` lies in
/// `0..1_000_000_000` and the sign is carried by `seconds` alone, so
/// `-0.5` seconds is stored as `seconds = -1, nanos = 500_000_000`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    seconds: i64,
    nanos: u32,
}

// ==== Public API ====

impl Duration {
    /// The zero-length duration.
    pub const ZERO: Self = Self {
        seconds: 0,
        nanos: 0,
    };

    /// A duration of whole seconds.
    #[must_use]
    pub const fn of_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// A duration of seconds plus a nanosecond adjustment of either
    /// sign. Fails if the total leaves the representable range.
    pub fn of_seconds_adjusted(seconds: i64, nano_adjustment: i64) -> CivilResult<Self> {
        let (carry_seconds, nanos) = Euclid::div_rem_euclid(&nano_adjustment, &NANOS_PER_SECOND);
        Ok(Self {
            seconds: utils::checked_add(seconds, carry_seconds)?,
            nanos: nanos as u32,
        })
    }

    /// A duration of whole milliseconds.
    #[must_use]
    pub fn of_millis(millis: i64) -> Self {
        let (seconds, millis_of_second) = Euclid::div_rem_euclid(&millis, &1_000);
        Self {
            seconds,
            nanos: (millis_of_second * 1_000_000) as u32,
        }
    }

    /// A duration of whole nanoseconds.
    #[must_use]
    pub fn of_nanos(nanos: i64) -> Self {
        let (seconds, nano_of_second) = Euclid::div_rem_euclid(&nanos, &NANOS_PER_SECOND);
        Self {
            seconds,
            nanos: nano_of_second as u32,
        }
    }

    /// A duration of whole minutes.
    pub fn of_minutes(minutes: i64) -> CivilResult<Self> {
        Ok(Self::of_seconds(utils::checked_mul(
            minutes,
            utils::SECONDS_PER_MINUTE,
        )?))
    }

    /// A duration of whole hours.
    pub fn of_hours(hours: i64) -> CivilResult<Self> {
        Ok(Self::of_seconds(utils::checked_mul(
            hours,
            utils::SECONDS_PER_HOUR,
        )?))
    }

    /// A duration of whole standard 86,400-second days.
    pub fn of_days(days: i64) -> CivilResult<Self> {
        Ok(Self::of_seconds(utils::checked_mul(
            days,
            utils::SECONDS_PER_DAY,
        )?))
    }

    /// The elapsed time between two instants, `end - start`.
    pub fn between(start: &Instant, end: &Instant) -> CivilResult<Self> {
        let seconds = utils::checked_sub(end.epoch_second(), start.epoch_second())?;
        let nano_adjustment = i64::from(end.nano()) - i64::from(start.nano());
        Self::of_seconds_adjusted(seconds, nano_adjustment)
    }

    /// The whole-seconds part; carries the sign of the duration.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// The nanosecond adjustment, always in `0..1_000_000_000`.
    #[must_use]
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.seconds == 0 && self.nanos == 0
    }

    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.seconds < 0
    }

    /// The total length in nanoseconds.
    #[must_use]
    pub fn total_nanos(&self) -> i128 {
        i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos)
    }

    /// Rebuilds a duration from a total nanosecond count. Fails when
    /// the seconds part does not fit in 64 bits.
    pub fn of_total_nanos(total: i128) -> CivilResult<Self> {
        let seconds = total.div_euclid(i128::from(NANOS_PER_SECOND));
        let nanos = total.rem_euclid(i128::from(NANOS_PER_SECOND)) as u32;
        let seconds = i64::try_from(seconds).map_err(|_| CivilError::ArithmeticOverflow)?;
        Ok(Self { seconds, nanos })
    }

    pub fn plus(&self, other: &Self) -> CivilResult<Self> {
        let seconds = utils::checked_add(self.seconds, other.seconds)?;
        Self::of_seconds_adjusted(seconds, i64::from(self.nanos) + i64::from(other.nanos))
    }

    pub fn minus(&self, other: &Self) -> CivilResult<Self> {
        let seconds = utils::checked_sub(self.seconds, other.seconds)?;
        Self::of_seconds_adjusted(seconds, i64::from(self.nanos) - i64::from(other.nanos))
    }

    pub fn plus_seconds(&self, seconds: i64) -> CivilResult<Self> {
        Ok(Self {
            seconds: utils::checked_add(self.seconds, seconds)?,
            nanos: self.nanos,
        })
    }

    pub fn plus_nanos(&self, nanos: i64) -> CivilResult<Self> {
        Self::of_total_nanos(self.total_nanos() + i128::from(nanos))
    }

    pub fn minus_seconds(&self, seconds: i64) -> CivilResult<Self> {
        Ok(Self {
            seconds: utils::checked_sub(self.seconds, seconds)?,
            nanos: self.nanos,
        })
    }

    pub fn multiplied_by(&self, scalar: i64) -> CivilResult<Self> {
        let total = self.total_nanos() * i128::from(scalar);
        Self::of_total_nanos(total)
    }

    /// The negated duration. Fails only for the most negative value.
    pub fn negated(&self) -> CivilResult<Self> {
        Self::of_total_nanos(-self.total_nanos())
    }

    /// The absolute magnitude of the duration.
    pub fn abs(&self) -> CivilResult<Self> {
        if self.is_negative() {
            self.negated()
        } else {
            Ok(*self)
        }
    }
}
