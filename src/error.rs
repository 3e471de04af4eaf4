//! The error type for every fallible operation in the crate.

use core::fmt;

use crate::components::{LocalDateTime, ZoneOffset};
use crate::fields::{TemporalField, TemporalUnit};
use crate::zone::ZoneId;

/// The single error type surfaced by `civil_rs`.
///
/// Every operation that can fail returns a [`Result`] carrying this
/// error; there are no fallback values and nothing panics on bad
/// input. The variants are structured so callers can react to the
/// exact failure (for example, retry an ambiguous local date-time with
/// a different resolver policy).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CivilError {
    /// A scalar handed to a constructor or `with` lies outside the
    /// valid range of its field.
    ValueOutOfRange {
        field: TemporalField,
        value: i64,
        min: i64,
        max: i64,
    },
    /// The day does not exist in the given month and year.
    DateNotValid { year: i32, month: u8, day: u8 },
    /// The value cannot answer a query for this field.
    UnsupportedField { field: TemporalField },
    /// The value cannot apply arithmetic in this unit.
    UnsupportedUnit { unit: TemporalUnit },
    /// A strict resolver met a wall-clock time inside a gap; the local
    /// date-time never existed in the zone.
    DateTimeNonexistent { local: LocalDateTime, zone: ZoneId },
    /// A strict resolver met a wall-clock time inside an overlap; the
    /// local date-time occurred twice in the zone.
    DateTimeAmbiguous { local: LocalDateTime, zone: ZoneId },
    /// The offset is not one of the valid offsets for the local
    /// date-time under the zone's rules.
    OffsetInvalidForZone {
        offset: ZoneOffset,
        local: LocalDateTime,
        zone: ZoneId,
    },
    /// Checked 64-bit arithmetic overflowed, or a result left the
    /// materializable year range.
    ArithmeticOverflow,
    /// Text could not be parsed; `error_index` is the byte position of
    /// the failure in `input`.
    ParseError {
        input: String,
        error_index: usize,
        message: &'static str,
    },
    /// No rules are registered for the zone identifier.
    UnknownZone { id: String },
    /// A resolver returned a (local, offset) pair that the zone rules
    /// reject. This is a bug in the resolver implementation.
    ResolverBroken,
    /// Zone rules data (a transition, a recurring rule, or a binary
    /// record) violates a structural invariant.
    ZoneRulesInvalid { message: &'static str },
}

impl fmt::Display for CivilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueOutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "value {value} for {field} is outside the valid range {min}..={max}"
                )
            }
            Self::DateNotValid { year, month, day } => {
                write!(f, "day {day} does not exist in {year:04}-{month:02}")
            }
            Self::UnsupportedField { field } => write!(f, "unsupported field {field}"),
            Self::UnsupportedUnit { unit } => write!(f, "unsupported unit {unit}"),
            Self::DateTimeNonexistent { local, zone } => {
                write!(f, "local date-time {local} does not exist in zone {zone}")
            }
            Self::DateTimeAmbiguous { local, zone } => {
                write!(f, "local date-time {local} is ambiguous in zone {zone}")
            }
            Self::OffsetInvalidForZone {
                offset,
                local,
                zone,
            } => {
                write!(
                    f,
                    "offset {offset} is not valid for {local} in zone {zone}"
                )
            }
            Self::ArithmeticOverflow => f.write_str("checked date-time arithmetic overflowed"),
            Self::ParseError {
                input,
                error_index,
                message,
            } => {
                write!(f, "could not parse {input:?} at index {error_index}: {message}")
            }
            Self::UnknownZone { id } => write!(f, "unknown time zone identifier {id:?}"),
            Self::ResolverBroken => {
                f.write_str("resolver returned an offset rejected by the zone rules")
            }
            Self::ZoneRulesInvalid { message } => {
                write!(f, "invalid zone rules data: {message}")
            }
        }
    }
}

impl std::error::Error for CivilError {}
