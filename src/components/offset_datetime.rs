//! A date-time paired with a fixed offset from UTC.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use crate::components::datetime::LocalDateTime;
use crate::components::instant::Instant;
use crate::components::offset::ZoneOffset;
use crate::error::CivilError;
use crate::fields::{Temporal, TemporalField, TemporalUnit, ValueRange};
use crate::CivilResult;

/// A date-time with a fixed UTC offset, such as
/// 2008-06-30T11:30+01:00.
///
/// The (local, offset) pair is authoritative: constructing a value
/// never normalizes the local date-time, and the instant is derived
/// from the pair on demand. Ordering and the derived instant agree;
/// two values at the same instant order by their local date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetDateTime {
    datetime: LocalDateTime,
    offset: ZoneOffset,
}

// ==== Public API ====

impl OffsetDateTime {
    /// Pairs a local date-time with an offset.
    #[must_use]
    pub const fn new(datetime: LocalDateTime, offset: ZoneOffset) -> Self {
        Self { datetime, offset }
    }

    /// The local view of an instant at a fixed offset.
    ///
    /// Fails with [`CivilError::ArithmeticOverflow`] when the instant
    /// lies outside the materializable year range.
    pub fn of_instant(instant: Instant, offset: ZoneOffset) -> CivilResult<Self> {
        let datetime =
            LocalDateTime::from_epoch_second(instant.epoch_second(), instant.nano(), offset)?;
        Ok(Self { datetime, offset })
    }

    #[must_use]
    pub const fn datetime(&self) -> LocalDateTime {
        self.datetime
    }

    #[must_use]
    pub const fn date(&self) -> crate::components::date::LocalDate {
        self.datetime.date()
    }

    #[must_use]
    pub const fn time(&self) -> crate::components::time::LocalTime {
        self.datetime.time()
    }

    #[must_use]
    pub const fn offset(&self) -> ZoneOffset {
        self.offset
    }

    /// The epoch second of this value.
    #[must_use]
    pub fn epoch_second(&self) -> i64 {
        self.datetime.to_epoch_second(self.offset)
    }

    /// The instant this value maps to.
    #[must_use]
    pub fn to_instant(&self) -> Instant {
        Instant::of_epoch_second_adjusted(self.epoch_second(), i64::from(self.datetime.nano()))
            // The nano part is already normalized, so no carry occurs.
            .unwrap_or_else(|_| Instant::of_epoch_second(self.epoch_second()))
    }

    /// Changes the offset, keeping the local date-time; the instant
    /// moves.
    #[must_use]
    pub const fn with_offset_same_local(&self, offset: ZoneOffset) -> Self {
        Self {
            datetime: self.datetime,
            offset,
        }
    }

    /// Changes the offset, keeping the instant; the local date-time
    /// moves.
    pub fn with_offset_same_instant(&self, offset: ZoneOffset) -> CivilResult<Self> {
        if offset == self.offset {
            return Ok(*self);
        }
        let adjusted = self.datetime.plus_seconds(
            offset.seconds_i64() - self.offset.seconds_i64(),
        )?;
        Ok(Self {
            datetime: adjusted,
            offset,
        })
    }

    pub fn plus_days(&self, days: i64) -> CivilResult<Self> {
        Ok(Self::new(self.datetime.plus_days(days)?, self.offset))
    }

    pub fn plus_months(&self, months: i64) -> CivilResult<Self> {
        Ok(Self::new(self.datetime.plus_months(months)?, self.offset))
    }

    pub fn plus_years(&self, years: i64) -> CivilResult<Self> {
        Ok(Self::new(self.datetime.plus_years(years)?, self.offset))
    }

    pub fn plus_hours(&self, hours: i64) -> CivilResult<Self> {
        Ok(Self::new(self.datetime.plus_hours(hours)?, self.offset))
    }

    pub fn plus_minutes(&self, minutes: i64) -> CivilResult<Self> {
        Ok(Self::new(self.datetime.plus_minutes(minutes)?, self.offset))
    }

    pub fn plus_seconds(&self, seconds: i64) -> CivilResult<Self> {
        Ok(Self::new(self.datetime.plus_seconds(seconds)?, self.offset))
    }

    pub fn plus_nanos(&self, nanos: i64) -> CivilResult<Self> {
        Ok(Self::new(self.datetime.plus_nanos(nanos)?, self.offset))
    }
}

impl PartialOrd for OffsetDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OffsetDateTime {
    /// Orders by instant first; equal instants order by local
    /// date-time, so the ordering is consistent with equality.
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch_second()
            .cmp(&other.epoch_second())
            .then_with(|| self.datetime.nano().cmp(&other.datetime.nano()))
            .then_with(|| self.datetime.cmp(&other.datetime))
    }
}

// ==== Field protocol ====

impl Temporal for OffsetDateTime {
    fn is_supported(&self, field: TemporalField) -> bool {
        self.datetime.is_supported(field)
            || matches!(
                field,
                TemporalField::OffsetSeconds | TemporalField::InstantSeconds
            )
    }

    fn range(&self, field: TemporalField) -> CivilResult<ValueRange> {
        match field {
            TemporalField::OffsetSeconds | TemporalField::InstantSeconds => Ok(field.base_range()),
            _ => self.datetime.range(field),
        }
    }

    fn get(&self, field: TemporalField) -> CivilResult<i64> {
        match field {
            TemporalField::OffsetSeconds => Ok(self.offset.seconds_i64()),
            TemporalField::InstantSeconds => Ok(self.epoch_second()),
            _ => self.datetime.get(field),
        }
    }

    fn with(&self, field: TemporalField, value: i64) -> CivilResult<Self> {
        match field {
            TemporalField::OffsetSeconds => {
                field.base_range().check(value, field)?;
                Ok(self.with_offset_same_local(ZoneOffset::of_total_seconds(value as i32)?))
            }
            TemporalField::InstantSeconds => Self::of_instant(
                Instant::of_epoch_second_adjusted(value, i64::from(self.datetime.nano()))?,
                self.offset,
            ),
            _ => Ok(Self::new(self.datetime.with(field, value)?, self.offset)),
        }
    }

    fn plus(&self, amount: i64, unit: TemporalUnit) -> CivilResult<Self> {
        Ok(Self::new(self.datetime.plus(amount, unit)?, self.offset))
    }

    fn until(&self, end: &Self, unit: TemporalUnit) -> CivilResult<i64> {
        let aligned = end.with_offset_same_instant(self.offset)?;
        self.datetime.until(&aligned.datetime, unit)
    }
}

impl fmt::Display for OffsetDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.datetime, self.offset)
    }
}

impl FromStr for OffsetDateTime {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::text::parse_iso_offset_date_time(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::date::LocalDate;
    use crate::components::time::LocalTime;

    fn odt(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        offset_hours: i32,
    ) -> OffsetDateTime {
        OffsetDateTime::new(
            LocalDateTime::new(
                LocalDate::of(year, month, day).unwrap(),
                LocalTime::of(hour, minute, 0).unwrap(),
            ),
            ZoneOffset::of_hours(offset_hours).unwrap(),
        )
    }

    #[test]
    fn instant_round_trip() {
        let base = odt(2008, 6, 30, 11, 30, 1);
        let instant = base.to_instant();
        assert_eq!(
            OffsetDateTime::of_instant(instant, base.offset()).unwrap(),
            base
        );
        // The same local at UTC is one hour later on the time-line.
        let utc = odt(2008, 6, 30, 11, 30, 0);
        assert_eq!(utc.epoch_second() - base.epoch_second(), 3_600);
    }

    #[test]
    fn offset_changes() {
        let base = odt(2008, 6, 30, 11, 30, 1);
        let same_local = base.with_offset_same_local(ZoneOffset::of_hours(3).unwrap());
        assert_eq!(same_local.datetime(), base.datetime());
        assert_ne!(same_local.epoch_second(), base.epoch_second());

        let same_instant = base
            .with_offset_same_instant(ZoneOffset::of_hours(3).unwrap())
            .unwrap();
        assert_eq!(same_instant.epoch_second(), base.epoch_second());
        assert_eq!(same_instant.datetime(), base.datetime().plus_hours(2).unwrap());
    }

    #[test]
    fn ordering_is_by_instant() {
        // 10:00+01:00 is the same instant as 09:00Z; 11:00Z is later.
        let earlier = odt(2008, 6, 30, 10, 0, 1);
        let same_instant = odt(2008, 6, 30, 9, 0, 0);
        let later = odt(2008, 6, 30, 11, 0, 0);
        assert_eq!(earlier.epoch_second(), same_instant.epoch_second());
        assert!(earlier < later);
        assert!(same_instant < later);
        // Equal instants fall back to local-time order.
        assert!(same_instant < earlier);
    }

    #[test]
    fn field_protocol_covers_offset_and_instant() {
        let base = odt(2008, 6, 30, 11, 30, 1);
        assert_eq!(base.get(TemporalField::OffsetSeconds).unwrap(), 3_600);
        assert_eq!(
            base.get(TemporalField::InstantSeconds).unwrap(),
            base.epoch_second()
        );
        assert_eq!(base.get(TemporalField::HourOfDay).unwrap(), 11);

        let shifted = base.with(TemporalField::OffsetSeconds, 7_200).unwrap();
        assert_eq!(shifted.datetime(), base.datetime());
        assert_eq!(shifted.offset(), ZoneOffset::of_hours(2).unwrap());

        let repinned = base
            .with(TemporalField::InstantSeconds, base.epoch_second() + 60)
            .unwrap();
        assert_eq!(repinned.datetime(), base.datetime().plus_minutes(1).unwrap());
    }

    #[test]
    fn until_aligns_offsets_first() {
        let start = odt(2008, 6, 30, 11, 0, 0);
        let end = odt(2008, 6, 30, 14, 0, 2);
        // 14:00+02:00 is 12:00Z, one hour after 11:00Z.
        assert_eq!(start.until(&end, TemporalUnit::Hours).unwrap(), 1);
        assert_eq!(end.until(&start, TemporalUnit::Hours).unwrap(), -1);
    }
}
