//! A date-time in a time zone.

use core::fmt;
use core::str::FromStr;

use crate::components::datetime::LocalDateTime;
use crate::components::duration::Duration;
use crate::components::instant::Instant;
use crate::components::offset::ZoneOffset;
use crate::components::offset_datetime::OffsetDateTime;
use crate::error::CivilError;
use crate::fields::{Temporal, TemporalField, TemporalUnit, ValueRange};
use crate::zone::resolver::{LocalResolver, Resolver};
use crate::zone::rules::LocalOffsetInfo;
use crate::zone::ZoneId;
use crate::CivilResult;

/// A date-time with a time zone, such as
/// 2008-06-30T11:30+01:00[Europe/Paris].
///
/// The value is the triple (local date-time, offset, zone) with the
/// invariant that the offset is one of the zone's valid offsets for
/// the local date-time. Construction from a bare local date-time goes
/// through a [`Resolver`], which decides what to do when the local
/// falls into a gap or an overlap.
///
/// Arithmetic follows two distinct policies: field and unit based
/// operations are wall-clock (applied to the local date-time, then
/// re-resolved retaining the current offset where possible), while
/// [`ZonedDateTime::plus_duration`] is absolute (applied to the
/// instant). Across a daylight-saving cutover the two give different
/// answers, intentionally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    datetime: LocalDateTime,
    offset: ZoneOffset,
    zone: ZoneId,
}

// ==== Construction ====

impl ZonedDateTime {
    /// Resolves a wall-clock date-time in a zone.
    ///
    /// An unambiguous local maps directly; a gap or overlap is
    /// delegated to `resolver`. A resolver that returns an offset the
    /// rules reject surfaces [`CivilError::ResolverBroken`].
    pub fn of(
        datetime: LocalDateTime,
        zone: ZoneId,
        resolver: &impl Resolver,
    ) -> CivilResult<Self> {
        let rules = zone.rules()?;
        match rules.offset_info(&datetime) {
            LocalOffsetInfo::Single(offset) => Ok(Self {
                datetime,
                offset,
                zone,
            }),
            LocalOffsetInfo::Gap(transition) | LocalOffsetInfo::Overlap(transition) => {
                let resolved = resolver.resolve(datetime, &transition, &rules, &zone)?;
                if !rules.is_valid_offset(&resolved.datetime(), resolved.offset()) {
                    return Err(CivilError::ResolverBroken);
                }
                Ok(Self {
                    datetime: resolved.datetime(),
                    offset: resolved.offset(),
                    zone,
                })
            }
        }
    }

    /// The local view of an instant in a zone; never ambiguous.
    pub fn of_instant(instant: Instant, zone: ZoneId) -> CivilResult<Self> {
        let rules = zone.rules()?;
        let offset = rules.offset_at(instant);
        let datetime =
            LocalDateTime::from_epoch_second(instant.epoch_second(), instant.nano(), offset)?;
        Ok(Self {
            datetime,
            offset,
            zone,
        })
    }

    /// Adopts an offset date-time into a zone, validating the offset.
    ///
    /// A local inside a gap fails with
    /// [`CivilError::DateTimeNonexistent`]; an offset the rules reject
    /// fails with [`CivilError::OffsetInvalidForZone`].
    pub fn of_offset(datetime: OffsetDateTime, zone: ZoneId) -> CivilResult<Self> {
        let rules = zone.rules()?;
        let local = datetime.datetime();
        match rules.offset_info(&local) {
            LocalOffsetInfo::Gap(_) => Err(CivilError::DateTimeNonexistent {
                local,
                zone,
            }),
            info => {
                let valid = match info {
                    LocalOffsetInfo::Single(offset) => offset == datetime.offset(),
                    LocalOffsetInfo::Overlap(transition) => {
                        transition.is_valid_offset(datetime.offset())
                    }
                    LocalOffsetInfo::Gap(_) => false,
                };
                if valid {
                    Ok(Self {
                        datetime: local,
                        offset: datetime.offset(),
                        zone,
                    })
                } else {
                    Err(CivilError::OffsetInvalidForZone {
                        offset: datetime.offset(),
                        local,
                        zone,
                    })
                }
            }
        }
    }

    pub(crate) fn from_parts_unchecked(
        datetime: LocalDateTime,
        offset: ZoneOffset,
        zone: ZoneId,
    ) -> Self {
        Self {
            datetime,
            offset,
            zone,
        }
    }
}

// ==== Accessors and conversions ====

impl ZonedDateTime {
    #[must_use]
    pub const fn datetime(&self) -> LocalDateTime {
        self.datetime
    }

    #[must_use]
    pub const fn offset(&self) -> ZoneOffset {
        self.offset
    }

    #[must_use]
    pub const fn zone(&self) -> &ZoneId {
        &self.zone
    }

    #[must_use]
    pub const fn to_offset_date_time(&self) -> OffsetDateTime {
        OffsetDateTime::new(self.datetime, self.offset)
    }

    #[must_use]
    pub fn to_instant(&self) -> Instant {
        self.to_offset_date_time().to_instant()
    }

    #[must_use]
    pub fn epoch_second(&self) -> i64 {
        self.datetime.to_epoch_second(self.offset)
    }

    /// Moves to another zone keeping the wall clock, resolving with
    /// the retain-offset policy.
    pub fn with_zone_same_local(&self, zone: ZoneId) -> CivilResult<Self> {
        Self::of(self.datetime, zone, &LocalResolver::RetainOffset(self.offset))
    }

    /// Moves to another zone keeping the instant.
    pub fn with_zone_same_instant(&self, zone: ZoneId) -> CivilResult<Self> {
        Self::of_instant(self.to_instant(), zone)
    }

    /// Replaces the local date-time, resolving with the retain-offset
    /// policy.
    pub fn with_datetime(&self, datetime: LocalDateTime) -> CivilResult<Self> {
        if datetime == self.datetime {
            return Ok(self.clone());
        }
        self.resolve_retaining(datetime)
    }

    /// Selects the earlier offset when the current local date-time is
    /// inside an overlap; otherwise returns the value unchanged.
    pub fn with_earlier_offset_at_overlap(&self) -> CivilResult<Self> {
        let rules = self.zone.rules()?;
        if let Some(transition) = rules.transition(&self.datetime) {
            if transition.is_overlap() && transition.offset_before() != self.offset {
                return Ok(Self {
                    datetime: self.datetime,
                    offset: transition.offset_before(),
                    zone: self.zone.clone(),
                });
            }
        }
        Ok(self.clone())
    }

    /// Selects the later offset when the current local date-time is
    /// inside an overlap; otherwise returns the value unchanged.
    pub fn with_later_offset_at_overlap(&self) -> CivilResult<Self> {
        let rules = self.zone.rules()?;
        if let Some(transition) = rules.transition(&self.datetime) {
            if transition.is_overlap() && transition.offset_after() != self.offset {
                return Ok(Self {
                    datetime: self.datetime,
                    offset: transition.offset_after(),
                    zone: self.zone.clone(),
                });
            }
        }
        Ok(self.clone())
    }

    fn resolve_retaining(&self, datetime: LocalDateTime) -> CivilResult<Self> {
        Self::of(
            datetime,
            self.zone.clone(),
            &LocalResolver::RetainOffset(self.offset),
        )
    }
}

// ==== Arithmetic ====

impl ZonedDateTime {
    pub fn plus_years(&self, years: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.plus_years(years)?)
    }

    pub fn plus_months(&self, months: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.plus_months(months)?)
    }

    pub fn plus_weeks(&self, weeks: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.plus_weeks(weeks)?)
    }

    pub fn plus_days(&self, days: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.plus_days(days)?)
    }

    /// Wall-clock hour arithmetic: the elapsed time differs from the
    /// nominal amount across a cutover.
    pub fn plus_hours(&self, hours: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.plus_hours(hours)?)
    }

    pub fn plus_minutes(&self, minutes: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.plus_minutes(minutes)?)
    }

    pub fn plus_seconds(&self, seconds: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.plus_seconds(seconds)?)
    }

    pub fn plus_nanos(&self, nanos: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.plus_nanos(nanos)?)
    }

    pub fn minus_years(&self, years: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.minus_years(years)?)
    }

    pub fn minus_months(&self, months: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.minus_months(months)?)
    }

    pub fn minus_days(&self, days: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.minus_days(days)?)
    }

    pub fn minus_hours(&self, hours: i64) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.minus_hours(hours)?)
    }

    /// Absolute arithmetic on the instant time-line; never consults a
    /// resolver.
    pub fn plus_duration(&self, duration: Duration) -> CivilResult<Self> {
        Self::of_instant(self.to_instant().plus_duration(duration)?, self.zone.clone())
    }

    /// Absolute arithmetic on the instant time-line.
    pub fn minus_duration(&self, duration: Duration) -> CivilResult<Self> {
        Self::of_instant(
            self.to_instant().minus_duration(duration)?,
            self.zone.clone(),
        )
    }
}

// ==== Field protocol ====

impl Temporal for ZonedDateTime {
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
                let requested = ZoneOffset::of_total_seconds(value as i32)?;
                Self::of(
                    self.datetime,
                    self.zone.clone(),
                    &LocalResolver::RetainOffset(requested),
                )
            }
            TemporalField::InstantSeconds => Self::of_instant(
                Instant::of_epoch_second_adjusted(value, i64::from(self.datetime.nano()))?,
                self.zone.clone(),
            ),
            _ => self.resolve_retaining(self.datetime.with(field, value)?),
        }
    }

    fn plus(&self, amount: i64, unit: TemporalUnit) -> CivilResult<Self> {
        self.resolve_retaining(self.datetime.plus(amount, unit)?)
    }

    fn until(&self, end: &Self, unit: TemporalUnit) -> CivilResult<i64> {
        if unit.is_time_based() {
            return self.to_instant().until(&end.to_instant(), unit);
        }
        let aligned = end.with_zone_same_instant(self.zone.clone())?;
        self.datetime.until(&aligned.datetime, unit)
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.datetime, self.offset)?;
        if let ZoneId::Region(region) = &self.zone {
            write!(f, "[{region}]")?;
        }
        Ok(())
    }
}

impl FromStr for ZonedDateTime {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::text::parse_iso_zoned_date_time(s)
    }
}
