//! The resolver protocol: policies for wall-clock moments that do not
//! map to exactly one instant.

use crate::components::datetime::LocalDateTime;
use crate::components::offset::ZoneOffset;
use crate::components::offset_datetime::OffsetDateTime;
use crate::error::CivilError;
use crate::zone::transition::ZoneOffsetTransition;
use crate::zone::rules::ZoneRules;
use crate::zone::ZoneId;
use crate::CivilResult;

/// A policy that selects or synthesises an offset when a local
/// date-time falls into a gap or an overlap.
///
/// Resolvers are chosen per operation, never stored in a value. The
/// returned pair must satisfy
/// `rules.valid_offsets(result.datetime()).contains(result.offset())`;
/// callers verify this and surface [`CivilError::ResolverBroken`] on
/// violation.
pub trait Resolver {
    /// Resolves `local`, which lies inside `transition`'s gap or
    /// overlap under `rules` for `zone`.
    fn resolve(
        &self,
        local: LocalDateTime,
        transition: &ZoneOffsetTransition,
        rules: &ZoneRules,
        zone: &ZoneId,
    ) -> CivilResult<OffsetDateTime>;
}

/// The five named resolver policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalResolver {
    /// Fail: a gap reports [`CivilError::DateTimeNonexistent`], an
    /// overlap [`CivilError::DateTimeAmbiguous`].
    Strict,
    /// A gap resolves to the last instant before it at the old
    /// offset; an overlap takes the later (post-transition) offset.
    PreGapPostOverlap,
    /// A gap shifts the local forward by the gap duration onto the
    /// new offset; an overlap takes the earlier (pre-transition)
    /// offset.
    PostGapPreOverlap,
    /// Keeps the supplied prior offset when it is still valid, else
    /// behaves as [`LocalResolver::PostGapPreOverlap`]. Used when
    /// adjusting an existing zoned value.
    RetainOffset(ZoneOffset),
    /// Pushes gaps forward like [`LocalResolver::PostGapPreOverlap`];
    /// overlaps take the earlier offset.
    PushForward,
}

impl Resolver for LocalResolver {
    fn resolve(
        &self,
        local: LocalDateTime,
        transition: &ZoneOffsetTransition,
        rules: &ZoneRules,
        zone: &ZoneId,
    ) -> CivilResult<OffsetDateTime> {
        match self {
            Self::Strict => Err(if transition.is_gap() {
                CivilError::DateTimeNonexistent {
                    local,
                    zone: zone.clone(),
                }
            } else {
                CivilError::DateTimeAmbiguous {
                    local,
                    zone: zone.clone(),
                }
            }),
            Self::PreGapPostOverlap => {
                if transition.is_gap() {
                    let before_gap = transition.date_time_before().minus_nanos(1)?;
                    Ok(OffsetDateTime::new(before_gap, transition.offset_before()))
                } else {
                    Ok(OffsetDateTime::new(local, transition.offset_after()))
                }
            }
            Self::PostGapPreOverlap | Self::PushForward => {
                post_gap_pre_overlap(local, transition)
            }
            Self::RetainOffset(prior) => {
                if transition.is_overlap() && transition.is_valid_offset(*prior) {
                    return Ok(OffsetDateTime::new(local, *prior));
                }
                post_gap_pre_overlap(local, transition).map(|resolved| {
                    // The retained offset was not valid; double-check
                    // against the rules before handing it back.
                    debug_assert!(rules
                        .is_valid_offset(&resolved.datetime(), resolved.offset()));
                    resolved
                })
            }
        }
    }
}

fn post_gap_pre_overlap(
    local: LocalDateTime,
    transition: &ZoneOffsetTransition,
) -> CivilResult<OffsetDateTime> {
    if transition.is_gap() {
        let shifted = local.plus_seconds(transition.duration_seconds())?;
        Ok(OffsetDateTime::new(shifted, transition.offset_after()))
    } else {
        Ok(OffsetDateTime::new(local, transition.offset_before()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::rules::fixtures::london as london_rules;

    fn offset(hours: i32) -> ZoneOffset {
        ZoneOffset::of_hours(hours).unwrap()
    }

    fn zone() -> ZoneId {
        ZoneId::unchecked("Europe/London")
    }

    fn gap_case() -> (LocalDateTime, ZoneOffsetTransition, ZoneRules) {
        let rules = london_rules();
        let local = LocalDateTime::of(2008, 3, 30, 1, 30, 0).unwrap();
        let transition = rules.transition(&local).expect("gap transition");
        (local, transition, rules)
    }

    fn overlap_case() -> (LocalDateTime, ZoneOffsetTransition, ZoneRules) {
        let rules = london_rules();
        let local = LocalDateTime::of(2008, 10, 26, 1, 30, 0).unwrap();
        let transition = rules.transition(&local).expect("overlap transition");
        (local, transition, rules)
    }

    #[test]
    fn strict_rejects_both_cases() {
        let (local, transition, rules) = gap_case();
        assert!(matches!(
            LocalResolver::Strict.resolve(local, &transition, &rules, &zone()),
            Err(CivilError::DateTimeNonexistent { .. })
        ));
        let (local, transition, rules) = overlap_case();
        assert!(matches!(
            LocalResolver::Strict.resolve(local, &transition, &rules, &zone()),
            Err(CivilError::DateTimeAmbiguous { .. })
        ));
    }

    #[test]
    fn pre_gap_post_overlap() {
        let (local, transition, rules) = gap_case();
        let resolved = LocalResolver::PreGapPostOverlap
            .resolve(local, &transition, &rules, &zone())
            .unwrap();
        // The last representable instant before the gap.
        assert_eq!(
            resolved.datetime(),
            LocalDateTime::of(2008, 3, 30, 1, 0, 0)
                .unwrap()
                .minus_nanos(1)
                .unwrap()
        );
        assert_eq!(resolved.offset(), offset(0));
        assert!(rules.is_valid_offset(&resolved.datetime(), resolved.offset()));

        let (local, transition, rules) = overlap_case();
        let resolved = LocalResolver::PreGapPostOverlap
            .resolve(local, &transition, &rules, &zone())
            .unwrap();
        assert_eq!(resolved.datetime(), local);
        assert_eq!(resolved.offset(), offset(0));
        assert!(rules.is_valid_offset(&resolved.datetime(), resolved.offset()));
    }

    #[test]
    fn post_gap_pre_overlap_policy() {
        let (local, transition, rules) = gap_case();
        let resolved = LocalResolver::PostGapPreOverlap
            .resolve(local, &transition, &rules, &zone())
            .unwrap();
        assert_eq!(
            resolved.datetime(),
            LocalDateTime::of(2008, 3, 30, 2, 30, 0).unwrap()
        );
        assert_eq!(resolved.offset(), offset(1));
        assert!(rules.is_valid_offset(&resolved.datetime(), resolved.offset()));

        let (local, transition, rules) = overlap_case();
        let resolved = LocalResolver::PostGapPreOverlap
            .resolve(local, &transition, &rules, &zone())
            .unwrap();
        assert_eq!(resolved.datetime(), local);
        assert_eq!(resolved.offset(), offset(1));
    }

    #[test]
    fn retain_offset_keeps_valid_prior() {
        let (local, transition, rules) = overlap_case();
        let retained = LocalResolver::RetainOffset(offset(0))
            .resolve(local, &transition, &rules, &zone())
            .unwrap();
        assert_eq!(retained.offset(), offset(0));

        // An invalid prior falls back to the earlier offset.
        let fallback = LocalResolver::RetainOffset(offset(5))
            .resolve(local, &transition, &rules, &zone())
            .unwrap();
        assert_eq!(fallback.offset(), offset(1));

        // In a gap no prior offset is valid.
        let (local, transition, rules) = gap_case();
        let pushed = LocalResolver::RetainOffset(offset(0))
            .resolve(local, &transition, &rules, &zone())
            .unwrap();
        assert_eq!(
            pushed.datetime(),
            LocalDateTime::of(2008, 3, 30, 2, 30, 0).unwrap()
        );
        assert_eq!(pushed.offset(), offset(1));
    }

    #[test]
    fn push_forward_matches_post_gap() {
        let (local, transition, rules) = gap_case();
        assert_eq!(
            LocalResolver::PushForward
                .resolve(local, &transition, &rules, &zone())
                .unwrap(),
            LocalResolver::PostGapPreOverlap
                .resolve(local, &transition, &rules, &zone())
                .unwrap()
        );
    }
}
