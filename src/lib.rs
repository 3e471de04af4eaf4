//! `civil_rs` is an implementation of immutable civil date and time
//! value types for the proleptic Gregorian (ISO-8601) calendar,
//! together with a time-zone rules engine.
//!
//! The library is built around three layers:
//!
//! - Value types: [`LocalDate`], [`LocalTime`], [`LocalDateTime`],
//!   [`OffsetDateTime`], [`ZonedDateTime`], [`Instant`], [`Duration`],
//!   and [`ZoneOffset`]. All of them are immutable; every operation
//!   returns a new value.
//! - A field and unit access protocol ([`TemporalField`],
//!   [`TemporalUnit`], and the [`Temporal`] trait) implemented by each
//!   value type over a closed taxonomy of fields and units.
//! - The zone rules engine ([`ZoneRules`], [`ZoneOffsetTransition`],
//!   [`ZoneOffsetTransitionRule`], and the [`Resolver`] protocol),
//!   which maps wall-clock date-times onto the instant time-line
//!   against a historical database of offset transitions, including
//!   the gaps and overlaps created by daylight-saving cutovers.
//!
//! Time zone data is loaded once into a process-wide registry from a
//! compact binary file emitted by an offline compiler; see the
//! [`tzdb`] module.
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,

    // Narrowing casts below are bounds-checked at the value-type
    // constructors; revisit if the field protocol ever widens.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
)]

pub mod error;
pub mod fields;
pub mod sys;
pub mod text;
pub mod tzdb;
pub mod zone;

pub(crate) mod components;
pub(crate) mod utils;

#[cfg(feature = "serde")]
mod serde;

#[doc(inline)]
pub use error::CivilError;

/// The `civil_rs` result type.
pub type CivilResult<T> = Result<T, CivilError>;

pub use crate::components::{
    adjusters, Duration, Instant, LocalDate, LocalDateTime, LocalTime, OffsetDateTime, Weekday,
    ZoneOffset, ZonedDateTime,
};
pub use crate::fields::{Temporal, TemporalField, TemporalUnit, ValueRange};
pub use crate::sys::{Clock, FixedClock, SystemClock};
pub use crate::zone::{
    LocalOffsetInfo, LocalResolver, Resolver, TimeDefinition, ZoneId, ZoneOffsetTransition,
    ZoneOffsetTransitionRule, ZoneRules,
};
