//! A single offset transition: the boundary between two offset
//! regimes.

use core::cmp::Ordering;
use core::fmt;

use crate::components::datetime::LocalDateTime;
use crate::components::duration::Duration;
use crate::components::instant::Instant;
use crate::components::offset::ZoneOffset;
use crate::error::CivilError;
use crate::CivilResult;

/// A transition between two offsets, caused by a daylight-saving
/// cutover or a change to a region's standard offset.
///
/// The stored local date-time is the first wall-clock moment of the
/// discontinuity expressed at the offset in force before it. A
/// positive offset change is a gap (clocks jump forward, some locals
/// never exist); a negative change is an overlap (clocks fall back,
/// some locals exist twice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneOffsetTransition {
    local: LocalDateTime,
    offset_before: ZoneOffset,
    offset_after: ZoneOffset,
}

impl ZoneOffsetTransition {
    /// A transition at `local` (expressed at `offset_before`) from
    /// `offset_before` to `offset_after`.
    ///
    /// The offsets must differ and the local date-time must have no
    /// sub-second component.
    pub fn new(
        local: LocalDateTime,
        offset_before: ZoneOffset,
        offset_after: ZoneOffset,
    ) -> CivilResult<Self> {
        if offset_before == offset_after {
            return Err(CivilError::ZoneRulesInvalid {
                message: "transition offsets must differ",
            });
        }
        if local.nano() != 0 {
            return Err(CivilError::ZoneRulesInvalid {
                message: "transition local date-time must not have sub-second components",
            });
        }
        Ok(Self {
            local,
            offset_before,
            offset_after,
        })
    }

    pub(crate) const fn new_unchecked(
        local: LocalDateTime,
        offset_before: ZoneOffset,
        offset_after: ZoneOffset,
    ) -> Self {
        Self {
            local,
            offset_before,
            offset_after,
        }
    }

    /// The local date-time at the old offset; for a gap this is the
    /// first nonexistent wall-clock moment, for an overlap the last
    /// moment of the ambiguous interval.
    #[must_use]
    pub const fn date_time_before(&self) -> LocalDateTime {
        self.local
    }

    /// The local date-time at the new offset: `date_time_before`
    /// shifted by the transition duration.
    #[must_use]
    pub fn date_time_after(&self) -> LocalDateTime {
        self.local
            .plus_seconds(self.duration_seconds())
            .unwrap_or(self.local)
    }

    #[must_use]
    pub const fn offset_before(&self) -> ZoneOffset {
        self.offset_before
    }

    #[must_use]
    pub const fn offset_after(&self) -> ZoneOffset {
        self.offset_after
    }

    /// The size of the discontinuity: positive for gaps, negative for
    /// overlaps.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::of_seconds(self.duration_seconds())
    }

    pub(crate) fn duration_seconds(&self) -> i64 {
        self.offset_after.seconds_i64() - self.offset_before.seconds_i64()
    }

    /// Whether the transition skips local time.
    #[must_use]
    pub fn is_gap(&self) -> bool {
        self.offset_after > self.offset_before
    }

    /// Whether the transition repeats local time.
    #[must_use]
    pub fn is_overlap(&self) -> bool {
        self.offset_after < self.offset_before
    }

    /// The UTC instant of the transition.
    #[must_use]
    pub fn instant(&self) -> Instant {
        Instant::of_epoch_second(self.epoch_second())
    }

    /// The epoch second of the transition.
    #[must_use]
    pub fn epoch_second(&self) -> i64 {
        self.local.to_epoch_second(self.offset_before)
    }

    /// Whether `offset` is a valid wall offset during this
    /// discontinuity: never for a gap, either side for an overlap.
    #[must_use]
    pub fn is_valid_offset(&self, offset: ZoneOffset) -> bool {
        if self.is_gap() {
            return false;
        }
        self.offset_before == offset || self.offset_after == offset
    }
}

impl PartialOrd for ZoneOffsetTransition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ZoneOffsetTransition {
    /// The canonical ordering: by transition instant alone.
    ///
    /// Transitions sharing an instant compare equal here even when
    /// their offsets differ, so this ordering does not agree with
    /// `Eq`.
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch_second().cmp(&other.epoch_second())
    }
}

impl fmt::Display for ZoneOffsetTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transition[{} at {} {} to {}]",
            if self.is_gap() { "gap" } else { "overlap" },
            self.local,
            self.offset_before,
            self.offset_after,
        )
    }
}
