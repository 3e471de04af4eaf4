//! Time-zone identifiers and the rules engine.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use crate::components::offset::ZoneOffset;
use crate::error::CivilError;
use crate::tzdb;
use crate::CivilResult;

pub(crate) mod resolver;
pub(crate) mod rule;
pub(crate) mod rules;
pub(crate) mod transition;

#[doc(inline)]
pub use resolver::{LocalResolver, Resolver};
#[doc(inline)]
pub use rule::{TimeDefinition, ZoneOffsetTransitionRule};
#[doc(inline)]
pub use rules::{LocalOffsetInfo, ZoneRules};
#[doc(inline)]
pub use transition::ZoneOffsetTransition;

/// A time-zone identifier: either a fixed offset or a region name
/// resolved through the rules registry.
///
/// Two region identifiers with different names compare unequal even
/// when aliasing maps them to the same underlying rules; the identity
/// of a `ZoneId` is its identifier, not its rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZoneId {
    /// A fixed offset; lookups bypass the rules engine entirely.
    Fixed(ZoneOffset),
    /// A region identifier such as `Europe/Paris`, backed by the
    /// registry.
    Region(String),
}

impl ZoneId {
    /// Parses and validates an identifier.
    ///
    /// `Z`, `UTC`, `GMT`, `UT`, and signed offset forms produce fixed
    /// zones (with an optional `UTC+HH:MM`-style prefix); any other
    /// identifier is a region and is validated eagerly against the
    /// installed registry, surfacing [`CivilError::UnknownZone`] when
    /// no rules are registered for it.
    pub fn of(id: &str) -> CivilResult<Self> {
        let zone = Self::unchecked(id);
        if let Self::Region(region) = &zone {
            tzdb::get_rules(region)?;
        }
        Ok(zone)
    }

    /// Parses an identifier without probing the registry.
    ///
    /// This is the round-trip path used by text parsing, where the
    /// registry may not contain the zone that produced the text.
    #[must_use]
    pub fn unchecked(id: &str) -> Self {
        if let Some(offset) = parse_fixed_id(id) {
            return Self::Fixed(offset);
        }
        Self::Region(String::from(id))
    }

    /// A fixed-offset zone.
    #[must_use]
    pub const fn of_offset(offset: ZoneOffset) -> Self {
        Self::Fixed(offset)
    }

    /// The identifier string.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Fixed(offset) => offset.id(),
            Self::Region(region) => region.clone(),
        }
    }

    /// Whether this zone is a fixed offset.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    /// The rules for this zone.
    ///
    /// Fixed zones build their rules directly; regions resolve
    /// through the process registry (including its alias table).
    pub fn rules(&self) -> CivilResult<Arc<rules::ZoneRules>> {
        match self {
            Self::Fixed(offset) => Ok(Arc::new(rules::ZoneRules::fixed(*offset))),
            Self::Region(region) => tzdb::get_rules(region),
        }
    }
}

/// Recognizes the fixed-offset identifier forms.
fn parse_fixed_id(id: &str) -> Option<ZoneOffset> {
    match id {
        "Z" | "z" | "UTC" | "GMT" | "UT" => return Some(ZoneOffset::UTC),
        _ => {}
    }
    let remainder = id
        .strip_prefix("UTC")
        .or_else(|| id.strip_prefix("GMT"))
        .or_else(|| id.strip_prefix("UT"))
        .unwrap_or(id);
    if remainder.starts_with('+') || remainder.starts_with('-') {
        return ZoneOffset::from_str(remainder).ok();
    }
    None
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(offset) => offset.fmt(f),
            Self::Region(region) => f.write_str(region),
        }
    }
}

impl FromStr for ZoneId {
    type Err = CivilError;

    /// Parses with eager validation, like [`ZoneId::of`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::of(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_forms_bypass_the_registry() {
        assert_eq!(ZoneId::of("Z").unwrap(), ZoneId::Fixed(ZoneOffset::UTC));
        assert_eq!(ZoneId::of("UTC").unwrap(), ZoneId::Fixed(ZoneOffset::UTC));
        assert_eq!(
            ZoneId::of("+05:30").unwrap(),
            ZoneId::Fixed(ZoneOffset::of_hours_minutes(5, 30).unwrap())
        );
        assert_eq!(
            ZoneId::of("UTC-05:00").unwrap(),
            ZoneId::Fixed(ZoneOffset::of_hours(-5).unwrap())
        );
        assert_eq!(
            ZoneId::of("GMT+01:00").unwrap(),
            ZoneId::Fixed(ZoneOffset::of_hours(1).unwrap())
        );
        let rules = ZoneId::of("+02:00").unwrap().rules().unwrap();
        assert!(rules.is_fixed_offset());
    }

    #[test]
    fn unknown_regions_are_rejected_eagerly() {
        assert!(matches!(
            ZoneId::of("Nowhere/Atlantis"),
            Err(CivilError::UnknownZone { .. })
        ));
        // The unchecked path defers validation.
        let deferred = ZoneId::unchecked("Nowhere/Atlantis");
        assert_eq!(deferred.id(), "Nowhere/Atlantis");
        assert!(deferred.rules().is_err());
    }

    #[test]
    fn identity_is_the_identifier() {
        let by_name = ZoneId::unchecked("Europe/London");
        let by_other_name = ZoneId::unchecked("Europe/Jersey");
        assert_ne!(by_name, by_other_name);
        assert_eq!(by_name.to_string(), "Europe/London");
        assert!(!by_name.is_fixed());
    }
}
