//! A fixed offset from UTC.

use core::fmt;
use core::str::FromStr;

use crate::error::CivilError;
use crate::fields::TemporalField;
use crate::CivilResult;

const MAX_OFFSET_SECONDS: i32 = 18 * 3_600;

/// A time-zone offset from UTC, in whole seconds, in the range ±18:00.
///
/// Offsets compare and hash by their total seconds alone, so `+01:00`
/// constructed from hours equals `+01:00` constructed from 3,600
/// seconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneOffset {
    total_seconds: i32,
}

impl ZoneOffset {
    /// The UTC offset, `Z`.
    pub const UTC: Self = Self { total_seconds: 0 };

    /// The minimum supported offset, `-18:00`.
    pub const MIN: Self = Self {
        total_seconds: -MAX_OFFSET_SECONDS,
    };

    /// The maximum supported offset, `+18:00`.
    pub const MAX: Self = Self {
        total_seconds: MAX_OFFSET_SECONDS,
    };

    /// An offset from a total number of seconds, validated to ±18:00.
    pub fn of_total_seconds(total_seconds: i32) -> CivilResult<Self> {
        if !(-MAX_OFFSET_SECONDS..=MAX_OFFSET_SECONDS).contains(&total_seconds) {
            return Err(CivilError::ValueOutOfRange {
                field: TemporalField::OffsetSeconds,
                value: i64::from(total_seconds),
                min: i64::from(-MAX_OFFSET_SECONDS),
                max: i64::from(MAX_OFFSET_SECONDS),
            });
        }
        Ok(Self { total_seconds })
    }

    /// An offset of whole hours.
    pub fn of_hours(hours: i32) -> CivilResult<Self> {
        Self::of_total_seconds(hours.saturating_mul(3_600))
    }

    /// An offset of hours and minutes; the components are summed, so
    /// they should share a sign.
    pub fn of_hours_minutes(hours: i32, minutes: i32) -> CivilResult<Self> {
        Self::of_total_seconds(hours.saturating_mul(3_600) + minutes.saturating_mul(60))
    }

    /// An offset of hours, minutes, and seconds.
    pub fn of_hours_minutes_seconds(hours: i32, minutes: i32, seconds: i32) -> CivilResult<Self> {
        Self::of_total_seconds(
            hours.saturating_mul(3_600) + minutes.saturating_mul(60) + seconds,
        )
    }

    /// The total offset in seconds; the canonical comparison key.
    #[must_use]
    pub const fn total_seconds(&self) -> i32 {
        self.total_seconds
    }

    /// The canonical identifier: `Z` for zero, else `±HH:MM` with a
    /// `:SS` part only when the offset has seconds precision.
    #[must_use]
    pub fn id(&self) -> String {
        self.to_string()
    }

    pub(crate) fn seconds_i64(&self) -> i64 {
        i64::from(self.total_seconds)
    }
}

impl fmt::Display for ZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total_seconds == 0 {
            return f.write_str("Z");
        }
        let sign = if self.total_seconds < 0 { '-' } else { '+' };
        let magnitude = i64::from(self.total_seconds).unsigned_abs();
        let hours = magnitude / 3_600;
        let minutes = (magnitude / 60) % 60;
        let seconds = magnitude % 60;
        write!(f, "{sign}{hours:02}:{minutes:02}")?;
        if seconds != 0 {
            write!(f, ":{seconds:02}")?;
        }
        Ok(())
    }
}

impl FromStr for ZoneOffset {
    type Err = CivilError;

    /// Parses `Z` and the `±HH`, `±HH:MM`, `±HHMM`, `±HH:MM:SS`, and
    /// `±HHMMSS` identifier forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scanner = crate::text::scan::Scanner::new(s);
        let offset = crate::text::scan_offset(&mut scanner)?;
        scanner.expect_end()?;
        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_range() {
        assert_eq!(ZoneOffset::of_hours(18).unwrap(), ZoneOffset::MAX);
        assert_eq!(ZoneOffset::of_hours(-18).unwrap(), ZoneOffset::MIN);
        assert!(ZoneOffset::of_total_seconds(64_801).is_err());
        assert!(ZoneOffset::of_hours(19).is_err());
        assert_eq!(
            ZoneOffset::of_hours_minutes(5, 30).unwrap().total_seconds(),
            19_800
        );
        assert_eq!(
            ZoneOffset::of_hours_minutes(-5, -30)
                .unwrap()
                .total_seconds(),
            -19_800
        );
    }

    #[test]
    fn canonical_ids() {
        assert_eq!(ZoneOffset::UTC.to_string(), "Z");
        assert_eq!(ZoneOffset::of_hours(1).unwrap().to_string(), "+01:00");
        assert_eq!(ZoneOffset::of_hours(-5).unwrap().to_string(), "-05:00");
        assert_eq!(
            ZoneOffset::of_hours_minutes_seconds(1, 2, 3)
                .unwrap()
                .to_string(),
            "+01:02:03"
        );
        assert_eq!(
            ZoneOffset::of_hours_minutes_seconds(-1, -2, -3)
                .unwrap()
                .to_string(),
            "-01:02:03"
        );
    }

    #[test]
    fn parse_accepts_all_id_forms() {
        for (text, total) in [
            ("Z", 0),
            ("z", 0),
            ("+01:00", 3_600),
            ("+0100", 3_600),
            ("+01", 3_600),
            ("-05:30", -19_800),
            ("-0530", -19_800),
            ("+01:02:03", 3_723),
            ("+010203", 3_723),
        ] {
            let parsed: ZoneOffset = text.parse().unwrap();
            assert_eq!(parsed.total_seconds(), total, "parsing {text}");
        }
        assert!("".parse::<ZoneOffset>().is_err());
        assert!("+1".parse::<ZoneOffset>().is_err());
        assert!("+19:00".parse::<ZoneOffset>().is_err());
        assert!("+01:60".parse::<ZoneOffset>().is_err());
        assert!("+01:00junk".parse::<ZoneOffset>().is_err());
    }

    #[test]
    fn equality_is_by_total_seconds() {
        assert_eq!(
            ZoneOffset::of_hours(2).unwrap(),
            ZoneOffset::of_total_seconds(7_200).unwrap()
        );
        assert!(ZoneOffset::of_hours(-1).unwrap() < ZoneOffset::UTC);
    }

    #[test]
    fn seconds_helper_matches() {
        let offset = ZoneOffset::of_hours(-5).unwrap();
        assert_eq!(offset.seconds_i64(), -18_000);
    }
}
