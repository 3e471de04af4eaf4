//! The zone rules engine: offset lookups against a zone's transition
//! history and recurring tail rules.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use crate::components::date::{LocalDate, MAX_EPOCH_DAY, MAX_YEAR, MIN_EPOCH_DAY, MIN_YEAR};
use crate::components::datetime::LocalDateTime;
use crate::components::duration::Duration;
use crate::components::instant::Instant;
use crate::components::offset::ZoneOffset;
use crate::error::CivilError;
use crate::utils;
use crate::zone::rule::ZoneOffsetTransitionRule;
use crate::zone::transition::ZoneOffsetTransition;
use crate::CivilResult;

/// Materialised rule years kept per zone; cleared wholesale when full,
/// since recomputation is deterministic and cheap.
const YEAR_CACHE_CAP: usize = 128;

/// The result of resolving a local date-time against a zone's rules.
///
/// Most wall-clock moments map to exactly one offset; around a
/// daylight-saving cutover they map to none (gap) or two (overlap),
/// and the containing transition is returned instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalOffsetInfo {
    /// The local date-time is unambiguous.
    Single(ZoneOffset),
    /// The local date-time never existed; the transition skipped it.
    Gap(ZoneOffsetTransition),
    /// The local date-time existed twice; either side of the
    /// transition is valid.
    Overlap(ZoneOffsetTransition),
}

/// The complete offset history of a time zone.
///
/// Rules are either a single fixed offset or a historical data set:
/// sorted standard-offset and wall-offset transition vectors, a
/// pre-computed local-time view of each wall transition, and the
/// recurring rules that extrapolate the tail beyond the last explicit
/// transition. Instances are immutable and shared behind [`Arc`] by
/// the registry; the only interior state is the memoised per-year
/// materialisation of the tail rules.
#[derive(Debug)]
pub struct ZoneRules {
    kind: RulesKind,
}

#[derive(Debug)]
enum RulesKind {
    Fixed(ZoneOffset),
    Historical(HistoricalRules),
}

#[derive(Debug)]
struct HistoricalRules {
    standard_transitions: Vec<i64>,
    standard_offsets: Vec<ZoneOffset>,
    savings_transitions: Vec<i64>,
    wall_offsets: Vec<ZoneOffset>,
    /// One entry per wall transition: the first nonexistent local for
    /// a gap, the first ambiguous local for an overlap. Both are the
    /// lower bound of the discontinuity window.
    savings_local_transitions: Vec<LocalDateTime>,
    last_rules: Vec<ZoneOffsetTransitionRule>,
    year_cache: Mutex<FxHashMap<i32, Arc<[ZoneOffsetTransition]>>>,
}

// ==== Construction ====

impl ZoneRules {
    /// Rules for a fixed-offset zone; every lookup returns `offset`.
    #[must_use]
    pub const fn fixed(offset: ZoneOffset) -> Self {
        Self {
            kind: RulesKind::Fixed(offset),
        }
    }

    /// Rules from an explicit transition history plus recurring tail
    /// rules.
    ///
    /// `standard_offset_transitions` carry changes to the standard
    /// offset; `transitions` carry every wall-offset change. Both must
    /// be sorted with strictly increasing instants, and each
    /// transition's offset-before must chain from the previous
    /// offset-after.
    pub fn of(
        base_standard_offset: ZoneOffset,
        base_wall_offset: ZoneOffset,
        standard_offset_transitions: &[ZoneOffsetTransition],
        transitions: &[ZoneOffsetTransition],
        last_rules: &[ZoneOffsetTransitionRule],
    ) -> CivilResult<Self> {
        let mut standard_transitions = Vec::with_capacity(standard_offset_transitions.len());
        let mut standard_offsets = Vec::with_capacity(standard_offset_transitions.len() + 1);
        standard_offsets.push(base_standard_offset);
        for transition in standard_offset_transitions {
            if transition.offset_before() != standard_offsets[standard_offsets.len() - 1] {
                return Err(CivilError::ZoneRulesInvalid {
                    message: "standard transitions must chain offsets",
                });
            }
            standard_transitions.push(transition.epoch_second());
            standard_offsets.push(transition.offset_after());
        }

        let mut savings_transitions = Vec::with_capacity(transitions.len());
        let mut wall_offsets = Vec::with_capacity(transitions.len() + 1);
        wall_offsets.push(base_wall_offset);
        for transition in transitions {
            if transition.offset_before() != wall_offsets[wall_offsets.len() - 1] {
                return Err(CivilError::ZoneRulesInvalid {
                    message: "wall transitions must chain offsets",
                });
            }
            savings_transitions.push(transition.epoch_second());
            wall_offsets.push(transition.offset_after());
        }

        Self::from_raw(
            standard_transitions,
            standard_offsets,
            savings_transitions,
            wall_offsets,
            last_rules.to_vec(),
        )
    }

    /// Rules from the raw parallel vectors, as decoded from the binary
    /// zone-rules format.
    pub(crate) fn from_raw(
        standard_transitions: Vec<i64>,
        standard_offsets: Vec<ZoneOffset>,
        savings_transitions: Vec<i64>,
        wall_offsets: Vec<ZoneOffset>,
        last_rules: Vec<ZoneOffsetTransitionRule>,
    ) -> CivilResult<Self> {
        if standard_offsets.len() != standard_transitions.len() + 1 {
            return Err(CivilError::ZoneRulesInvalid {
                message: "standard offsets must be one longer than standard transitions",
            });
        }
        if wall_offsets.len() != savings_transitions.len() + 1 {
            return Err(CivilError::ZoneRulesInvalid {
                message: "wall offsets must be one longer than savings transitions",
            });
        }
        if !strictly_increasing(&standard_transitions) || !strictly_increasing(&savings_transitions)
        {
            return Err(CivilError::ZoneRulesInvalid {
                message: "transition instants must be strictly increasing",
            });
        }

        let mut savings_local_transitions = Vec::with_capacity(savings_transitions.len());
        for (index, &epoch_second) in savings_transitions.iter().enumerate() {
            let before = wall_offsets[index];
            let after = wall_offsets[index + 1];
            if before == after {
                return Err(CivilError::ZoneRulesInvalid {
                    message: "wall transition offsets must differ",
                });
            }
            let before_local = LocalDateTime::from_epoch_second(epoch_second, 0, before)?;
            let after_local = LocalDateTime::from_epoch_second(epoch_second, 0, after)?;
            // Store the lower bound of the discontinuity window.
            savings_local_transitions.push(if after > before {
                before_local
            } else {
                after_local
            });
        }

        Ok(Self {
            kind: RulesKind::Historical(HistoricalRules {
                standard_transitions,
                standard_offsets,
                savings_transitions,
                wall_offsets,
                savings_local_transitions,
                last_rules,
                year_cache: Mutex::new(FxHashMap::default()),
            }),
        })
    }

    /// Whether these rules are a single fixed offset.
    #[must_use]
    pub const fn is_fixed_offset(&self) -> bool {
        matches!(self.kind, RulesKind::Fixed(_))
    }
}

// ==== Instant queries ====

impl ZoneRules {
    /// The wall offset in force at `instant`.
    #[must_use]
    pub fn offset_at(&self, instant: Instant) -> ZoneOffset {
        match &self.kind {
            RulesKind::Fixed(offset) => *offset,
            RulesKind::Historical(rules) => rules.offset_at_epoch_second(instant.epoch_second()),
        }
    }

    /// The standard offset in force at `instant`, ignoring daylight
    /// savings.
    #[must_use]
    pub fn standard_offset(&self, instant: Instant) -> ZoneOffset {
        match &self.kind {
            RulesKind::Fixed(offset) => *offset,
            RulesKind::Historical(rules) => {
                let index = rules
                    .standard_transitions
                    .partition_point(|&t| t <= instant.epoch_second());
                rules.standard_offsets[index]
            }
        }
    }

    /// The daylight-saving component of the wall offset at `instant`.
    #[must_use]
    pub fn daylight_savings(&self, instant: Instant) -> Duration {
        let wall = self.offset_at(instant);
        let standard = self.standard_offset(instant);
        Duration::of_seconds(wall.seconds_i64() - standard.seconds_i64())
    }

    /// Whether daylight savings is in effect at `instant`.
    #[must_use]
    pub fn is_daylight_savings(&self, instant: Instant) -> bool {
        !self.daylight_savings(instant).is_zero()
    }

    /// The first transition strictly after `instant`, if any.
    #[must_use]
    pub fn next_transition(&self, instant: Instant) -> Option<ZoneOffsetTransition> {
        let RulesKind::Historical(rules) = &self.kind else {
            return None;
        };
        let epoch_second = instant.epoch_second();
        match rules.savings_transitions.last() {
            Some(&last) if epoch_second < last => {
                let index = rules
                    .savings_transitions
                    .partition_point(|&t| t <= epoch_second);
                Some(rules.transition_at(index))
            }
            _ => {
                if rules.last_rules.is_empty() {
                    return None;
                }
                let wall = rules.wall_offsets[rules.wall_offsets.len() - 1];
                let year = find_year(epoch_second, wall);
                for transition in rules.rules_for_year(year).iter() {
                    if epoch_second < transition.epoch_second() {
                        return Some(*transition);
                    }
                }
                if year < MAX_YEAR {
                    return rules.rules_for_year(year + 1).first().copied();
                }
                None
            }
        }
    }

    /// The last transition strictly before `instant`, if any.
    #[must_use]
    pub fn previous_transition(&self, instant: Instant) -> Option<ZoneOffsetTransition> {
        let RulesKind::Historical(rules) = &self.kind else {
            return None;
        };
        let mut epoch_second = instant.epoch_second();
        if instant.nano() > 0 && epoch_second < i64::MAX {
            // Partial seconds sit after the whole-second transition.
            epoch_second += 1;
        }
        let beyond = rules
            .savings_transitions
            .last()
            .map_or(true, |&last| epoch_second > last);
        if !beyond {
            let index = rules
                .savings_transitions
                .partition_point(|&t| t < epoch_second);
            return index.checked_sub(1).map(|i| rules.transition_at(i));
        }
        if rules.last_rules.is_empty() {
            return rules
                .savings_transitions
                .len()
                .checked_sub(1)
                .map(|i| rules.transition_at(i));
        }

        let wall = rules.wall_offsets[rules.wall_offsets.len() - 1];
        let year = find_year(epoch_second, wall);
        for transition in rules.rules_for_year(year).iter().rev() {
            if epoch_second > transition.epoch_second() {
                return Some(*transition);
            }
        }
        let last_historic_year = rules
            .savings_transitions
            .last()
            .map(|&last| find_year(last, wall));
        if year > MIN_YEAR && last_historic_year.map_or(true, |historic| year - 1 > historic) {
            return rules.rules_for_year(year - 1).last().copied();
        }
        rules
            .savings_transitions
            .len()
            .checked_sub(1)
            .map(|i| rules.transition_at(i))
    }
}

// ==== Local date-time queries ====

impl ZoneRules {
    /// Resolves a local date-time to its offset, gap, or overlap.
    #[must_use]
    pub fn offset_info(&self, local: &LocalDateTime) -> LocalOffsetInfo {
        match &self.kind {
            RulesKind::Fixed(offset) => LocalOffsetInfo::Single(*offset),
            RulesKind::Historical(rules) => rules.offset_info(local),
        }
    }

    /// The valid offsets for a local date-time: one normally, none in
    /// a gap, two (earlier first) in an overlap.
    #[must_use]
    pub fn valid_offsets(&self, local: &LocalDateTime) -> Vec<ZoneOffset> {
        match self.offset_info(local) {
            LocalOffsetInfo::Single(offset) => vec![offset],
            LocalOffsetInfo::Gap(_) => Vec::new(),
            LocalOffsetInfo::Overlap(transition) => {
                vec![transition.offset_before(), transition.offset_after()]
            }
        }
    }

    /// The transition whose discontinuity window contains `local`,
    /// else `None` when the local date-time is unambiguous.
    #[must_use]
    pub fn transition(&self, local: &LocalDateTime) -> Option<ZoneOffsetTransition> {
        match self.offset_info(local) {
            LocalOffsetInfo::Single(_) => None,
            LocalOffsetInfo::Gap(transition) | LocalOffsetInfo::Overlap(transition) => {
                Some(transition)
            }
        }
    }

    /// Whether `offset` is valid for `local` under these rules.
    #[must_use]
    pub fn is_valid_offset(&self, local: &LocalDateTime, offset: ZoneOffset) -> bool {
        match self.offset_info(local) {
            LocalOffsetInfo::Single(valid) => valid == offset,
            LocalOffsetInfo::Gap(_) => false,
            LocalOffsetInfo::Overlap(transition) => transition.is_valid_offset(offset),
        }
    }

    /// The complete explicit wall-transition history.
    #[must_use]
    pub fn transitions(&self) -> Vec<ZoneOffsetTransition> {
        match &self.kind {
            RulesKind::Fixed(_) => Vec::new(),
            RulesKind::Historical(rules) => (0..rules.savings_transitions.len())
                .map(|index| rules.transition_at(index))
                .collect(),
        }
    }

    /// The recurring tail rules.
    #[must_use]
    pub fn transition_rules(&self) -> &[ZoneOffsetTransitionRule] {
        match &self.kind {
            RulesKind::Fixed(_) => &[],
            RulesKind::Historical(rules) => &rules.last_rules,
        }
    }

    pub(crate) fn as_fixed(&self) -> Option<ZoneOffset> {
        match &self.kind {
            RulesKind::Fixed(offset) => Some(*offset),
            RulesKind::Historical(_) => None,
        }
    }

    #[allow(clippy::type_complexity)]
    pub(crate) fn raw_parts(
        &self,
    ) -> Option<(
        &[i64],
        &[ZoneOffset],
        &[i64],
        &[ZoneOffset],
        &[ZoneOffsetTransitionRule],
    )> {
        match &self.kind {
            RulesKind::Fixed(_) => None,
            RulesKind::Historical(rules) => Some((
                &rules.standard_transitions,
                &rules.standard_offsets,
                &rules.savings_transitions,
                &rules.wall_offsets,
                &rules.last_rules,
            )),
        }
    }
}

impl PartialEq for ZoneRules {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (RulesKind::Fixed(left), RulesKind::Fixed(right)) => left == right,
            (RulesKind::Historical(left), RulesKind::Historical(right)) => {
                left.standard_transitions == right.standard_transitions
                    && left.standard_offsets == right.standard_offsets
                    && left.savings_transitions == right.savings_transitions
                    && left.wall_offsets == right.wall_offsets
                    && left.last_rules == right.last_rules
            }
            _ => false,
        }
    }
}

impl Eq for ZoneRules {}

// ==== Internal lookups ====

impl HistoricalRules {
    fn offset_at_epoch_second(&self, epoch_second: i64) -> ZoneOffset {
        if !self.last_rules.is_empty()
            && self
                .savings_transitions
                .last()
                .map_or(true, |&last| epoch_second > last)
        {
            let wall = self.wall_offsets[self.wall_offsets.len() - 1];
            let year = find_year(epoch_second, wall);
            let transitions = self.rules_for_year(year);
            for transition in transitions.iter() {
                if epoch_second < transition.epoch_second() {
                    return transition.offset_before();
                }
            }
            return match transitions.last() {
                Some(transition) => transition.offset_after(),
                None => wall,
            };
        }
        let index = self
            .savings_transitions
            .partition_point(|&t| t <= epoch_second);
        self.wall_offsets[index]
    }

    fn offset_info(&self, local: &LocalDateTime) -> LocalOffsetInfo {
        if !self.last_rules.is_empty() && self.beyond_last_local(local) {
            let transitions = self.rules_for_year(local.date().year());
            let mut info = LocalOffsetInfo::Single(self.wall_offsets[self.wall_offsets.len() - 1]);
            for transition in transitions.iter() {
                info = find_offset_info(local, *transition);
                match info {
                    LocalOffsetInfo::Gap(_) | LocalOffsetInfo::Overlap(_) => return info,
                    LocalOffsetInfo::Single(offset) if offset == transition.offset_before() => {
                        return info;
                    }
                    LocalOffsetInfo::Single(_) => {}
                }
            }
            return info;
        }

        let index = self
            .savings_local_transitions
            .partition_point(|start| start <= local);
        if index == 0 {
            return LocalOffsetInfo::Single(self.wall_offsets[0]);
        }
        let transition = self.transition_at(index - 1);
        let window_end = transition
            .date_time_before()
            .max(transition.date_time_after());
        if *local < window_end {
            if transition.is_gap() {
                LocalOffsetInfo::Gap(transition)
            } else {
                LocalOffsetInfo::Overlap(transition)
            }
        } else {
            LocalOffsetInfo::Single(self.wall_offsets[index])
        }
    }

    /// Whether `local` lies beyond the discontinuity window of the
    /// last explicit transition, i.e. in recurring-rule territory.
    fn beyond_last_local(&self, local: &LocalDateTime) -> bool {
        let Some(last_index) = self.savings_transitions.len().checked_sub(1) else {
            return true;
        };
        let last = self.transition_at(last_index);
        let window_end = last.date_time_before().max(last.date_time_after());
        *local > window_end
    }

    /// Rebuilds the transition at `index` from the parallel vectors.
    fn transition_at(&self, index: usize) -> ZoneOffsetTransition {
        let before = self.wall_offsets[index];
        let after = self.wall_offsets[index + 1];
        let start = self.savings_local_transitions[index];
        let duration = after.seconds_i64() - before.seconds_i64();
        // The stored local is the window's lower bound: the before
        // view for gaps and the after view for overlaps.
        let local_before = if duration >= 0 {
            start
        } else {
            start.plus_seconds(-duration).unwrap_or(start)
        };
        ZoneOffsetTransition::new_unchecked(local_before, before, after)
    }

    fn rules_for_year(&self, year: i32) -> Arc<[ZoneOffsetTransition]> {
        let materialize = || -> Arc<[ZoneOffsetTransition]> {
            self.last_rules
                .iter()
                .map(|rule| rule.create_transition(year))
                .collect::<Vec<_>>()
                .into()
        };
        match self.year_cache.lock() {
            Ok(mut cache) => {
                if let Some(cached) = cache.get(&year) {
                    return Arc::clone(cached);
                }
                let transitions = materialize();
                if cache.len() >= YEAR_CACHE_CAP {
                    cache.clear();
                }
                cache.insert(year, Arc::clone(&transitions));
                transitions
            }
            // A poisoned cache only costs recomputation.
            Err(_) => materialize(),
        }
    }
}

fn find_offset_info(local: &LocalDateTime, transition: ZoneOffsetTransition) -> LocalOffsetInfo {
    if transition.is_gap() {
        if *local < transition.date_time_before() {
            LocalOffsetInfo::Single(transition.offset_before())
        } else if *local < transition.date_time_after() {
            LocalOffsetInfo::Gap(transition)
        } else {
            LocalOffsetInfo::Single(transition.offset_after())
        }
    } else if *local >= transition.date_time_before() {
        LocalOffsetInfo::Single(transition.offset_after())
    } else if *local < transition.date_time_after() {
        LocalOffsetInfo::Single(transition.offset_before())
    } else {
        LocalOffsetInfo::Overlap(transition)
    }
}

/// The calendar year containing `epoch_second` when viewed at
/// `offset`.
fn find_year(epoch_second: i64, offset: ZoneOffset) -> i32 {
    let local_second = epoch_second.saturating_add(offset.seconds_i64());
    let epoch_day = utils::floor_div(local_second, utils::SECONDS_PER_DAY)
        .clamp(MIN_EPOCH_DAY, MAX_EPOCH_DAY);
    LocalDate::from_epoch_day(epoch_day).map_or(
        if epoch_second < 0 { MIN_YEAR } else { MAX_YEAR },
        |date| date.year(),
    )
}

fn strictly_increasing(values: &[i64]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

/// Shared zone fixtures for the crate's test suites: a handful of
/// well-known zones built from explicit transitions and recurring
/// rules.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::ZoneRules;
    use crate::components::datetime::LocalDateTime;
    use crate::components::offset::ZoneOffset;
    use crate::components::time::LocalTime;
    use crate::components::weekday::Weekday;
    use crate::zone::rule::{TimeDefinition, ZoneOffsetTransitionRule};
    use crate::zone::transition::ZoneOffsetTransition;

    fn offset(hours: i32) -> ZoneOffset {
        ZoneOffset::of_hours(hours).unwrap()
    }

    fn rule(
        month: u8,
        dom: i8,
        hour: u8,
        definition: TimeDefinition,
        standard: ZoneOffset,
        before: ZoneOffset,
        after: ZoneOffset,
    ) -> ZoneOffsetTransitionRule {
        ZoneOffsetTransitionRule::of(
            month,
            dom,
            Some(Weekday::Sunday),
            LocalTime::of(hour, 0, 0).unwrap(),
            definition,
            standard,
            before,
            after,
        )
        .unwrap()
    }

    /// Europe/London: GMT standard, BST between the last Sundays of
    /// March and October at 01:00 UTC. Explicit transitions for 1996
    /// and 1997, recurring rules beyond.
    pub(crate) fn london() -> ZoneRules {
        let gmt = offset(0);
        let bst = offset(1);
        let local = |year, month, day, hour| {
            LocalDateTime::of(year, month, day, hour, 0, 0).unwrap()
        };
        let transitions = [
            ZoneOffsetTransition::new(local(1996, 3, 31, 1), gmt, bst).unwrap(),
            ZoneOffsetTransition::new(local(1996, 10, 27, 2), bst, gmt).unwrap(),
            ZoneOffsetTransition::new(local(1997, 3, 30, 1), gmt, bst).unwrap(),
            ZoneOffsetTransition::new(local(1997, 10, 26, 2), bst, gmt).unwrap(),
        ];
        let rules = [
            rule(3, -1, 1, TimeDefinition::Utc, gmt, gmt, bst),
            rule(10, -1, 1, TimeDefinition::Utc, gmt, bst, gmt),
        ];
        ZoneRules::of(gmt, gmt, &[], &transitions, &rules).unwrap()
    }

    /// Europe/Paris: CET standard, CEST between the last Sundays of
    /// March and October at 01:00 UTC.
    pub(crate) fn paris() -> ZoneRules {
        let cet = offset(1);
        let cest = offset(2);
        let rules = [
            rule(3, -1, 1, TimeDefinition::Utc, cet, cet, cest),
            rule(10, -1, 1, TimeDefinition::Utc, cet, cest, cet),
        ];
        ZoneRules::of(cet, cet, &[], &[], &rules).unwrap()
    }

    /// America/New_York: EST standard, EDT from the second Sunday of
    /// March to the first Sunday of November at 02:00 wall time.
    pub(crate) fn new_york() -> ZoneRules {
        let est = offset(-5);
        let edt = offset(-4);
        let rules = [
            rule(3, 8, 2, TimeDefinition::Wall, est, est, edt),
            rule(11, 1, 2, TimeDefinition::Wall, est, edt, est),
        ];
        ZoneRules::of(est, est, &[], &[], &rules).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::london;
    use super::*;
    use crate::components::time::LocalTime;
    use crate::components::weekday::Weekday;
    use crate::zone::rule::TimeDefinition;

    fn offset(hours: i32) -> ZoneOffset {
        ZoneOffset::of_hours(hours).unwrap()
    }

    fn local(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> LocalDateTime {
        LocalDateTime::of(year, month, day, hour, minute, 0).unwrap()
    }

    fn instant_of(local: LocalDateTime, offset: ZoneOffset) -> Instant {
        Instant::of_epoch_second(local.to_epoch_second(offset))
    }

    #[test]
    fn fixed_rules_short_circuit() {
        let rules = ZoneRules::fixed(offset(-5));
        assert!(rules.is_fixed_offset());
        assert_eq!(rules.offset_at(Instant::EPOCH), offset(-5));
        assert_eq!(
            rules.offset_info(&local(2008, 6, 1, 12, 0)),
            LocalOffsetInfo::Single(offset(-5))
        );
        assert_eq!(rules.valid_offsets(&local(2008, 6, 1, 12, 0)), vec![offset(-5)]);
        assert!(rules.next_transition(Instant::EPOCH).is_none());
        assert!(rules.previous_transition(Instant::EPOCH).is_none());
        assert!(rules.transitions().is_empty());
    }

    #[test]
    fn historical_gap_is_resolved() {
        let rules = london();
        // Inside the 1997 spring gap.
        let info = rules.offset_info(&local(1997, 3, 30, 1, 30));
        let LocalOffsetInfo::Gap(transition) = info else {
            panic!("expected gap, got {info:?}");
        };
        assert_eq!(transition.offset_before(), offset(0));
        assert_eq!(transition.offset_after(), offset(1));
        assert!(rules.valid_offsets(&local(1997, 3, 30, 1, 30)).is_empty());
        // Just outside the gap on both sides.
        assert_eq!(
            rules.offset_info(&local(1997, 3, 30, 0, 59)),
            LocalOffsetInfo::Single(offset(0))
        );
        assert_eq!(
            rules.offset_info(&local(1997, 3, 30, 2, 0)),
            LocalOffsetInfo::Single(offset(1))
        );
    }

    #[test]
    fn historical_overlap_is_resolved() {
        let rules = london();
        let info = rules.offset_info(&local(1996, 10, 27, 1, 30));
        let LocalOffsetInfo::Overlap(transition) = info else {
            panic!("expected overlap, got {info:?}");
        };
        assert_eq!(
            rules.valid_offsets(&local(1996, 10, 27, 1, 30)),
            vec![offset(1), offset(0)]
        );
        assert_eq!(transition.date_time_after(), local(1996, 10, 27, 1, 0));
        assert!(rules.is_valid_offset(&local(1996, 10, 27, 1, 30), offset(1)));
        assert!(rules.is_valid_offset(&local(1996, 10, 27, 1, 30), offset(0)));
        assert!(!rules.is_valid_offset(&local(1996, 10, 27, 1, 30), offset(2)));
    }

    #[test]
    fn rule_tail_gap_and_overlap() {
        let rules = london();
        // 2008: last Sundays are March 30 and October 26.
        assert!(rules.valid_offsets(&local(2008, 3, 30, 1, 30)).is_empty());
        assert_eq!(
            rules.valid_offsets(&local(2008, 10, 26, 1, 30)),
            vec![offset(1), offset(0)]
        );
        assert_eq!(
            rules.offset_info(&local(2008, 7, 1, 12, 0)),
            LocalOffsetInfo::Single(offset(1))
        );
        assert_eq!(
            rules.offset_info(&local(2008, 12, 1, 12, 0)),
            LocalOffsetInfo::Single(offset(0))
        );
        // January, before the year's first rule transition.
        assert_eq!(
            rules.offset_info(&local(2030, 1, 15, 12, 0)),
            LocalOffsetInfo::Single(offset(0))
        );
    }

    #[test]
    fn offset_at_instant_across_boundaries() {
        let rules = london();
        // Historical region.
        let spring_1996 = instant_of(local(1996, 3, 31, 1, 0), offset(0));
        assert_eq!(
            rules.offset_at(spring_1996.minus_seconds(1).unwrap()),
            offset(0)
        );
        assert_eq!(rules.offset_at(spring_1996), offset(1));
        // Rule region.
        let spring_2008 = instant_of(local(2008, 3, 30, 1, 0), offset(0));
        assert_eq!(
            rules.offset_at(spring_2008.minus_seconds(1).unwrap()),
            offset(0)
        );
        assert_eq!(rules.offset_at(spring_2008), offset(1));
        let autumn_2008 = instant_of(local(2008, 10, 26, 1, 0), offset(0));
        assert_eq!(
            rules.offset_at(autumn_2008.minus_seconds(1).unwrap()),
            offset(1)
        );
        assert_eq!(rules.offset_at(autumn_2008), offset(0));
    }

    #[test]
    fn next_and_previous_transitions() {
        let rules = london();
        // Property: the next transition after an instant brackets the
        // offsets on each side.
        let probe = instant_of(local(2008, 1, 1, 0, 0), offset(0));
        let next = rules.next_transition(probe).unwrap();
        assert_eq!(
            next.date_time_before(),
            local(2008, 3, 30, 1, 0)
        );
        assert_eq!(
            rules.offset_at(next.instant().minus_duration(Duration::of_nanos(1)).unwrap()),
            next.offset_before()
        );
        assert_eq!(rules.offset_at(next.instant()), next.offset_after());

        // Exactly at a transition: strictly-after semantics.
        let at_spring = next.instant();
        let following = rules.next_transition(at_spring).unwrap();
        assert_eq!(following.date_time_before(), local(2008, 10, 26, 2, 0));

        // Previous from mid-year lands on the spring transition.
        let previous = rules.previous_transition(probe).unwrap();
        assert_eq!(previous.date_time_before(), local(2007, 10, 28, 2, 0));

        // Historical previous.
        let probe_1997 = instant_of(local(1997, 1, 1, 0, 0), offset(0));
        let previous_1997 = rules.previous_transition(probe_1997).unwrap();
        assert_eq!(previous_1997.date_time_before(), local(1996, 10, 27, 2, 0));

        // Crossing from the rule region back into history.
        let probe_1998 = instant_of(local(1998, 1, 1, 0, 0), offset(0));
        let previous_1998 = rules.previous_transition(probe_1998).unwrap();
        assert_eq!(previous_1998.date_time_before(), local(1997, 10, 26, 2, 0));
    }

    #[test]
    fn standard_offset_and_daylight_savings() {
        let rules = london();
        let summer = instant_of(local(2008, 7, 1, 12, 0), offset(1));
        let winter = instant_of(local(2008, 1, 1, 12, 0), offset(0));
        assert_eq!(rules.standard_offset(summer), offset(0));
        assert_eq!(rules.offset_at(summer), offset(1));
        assert_eq!(
            rules.daylight_savings(summer),
            Duration::of_hours(1).unwrap()
        );
        assert!(rules.is_daylight_savings(summer));
        assert!(!rules.is_daylight_savings(winter));
    }

    #[test]
    fn transitions_are_reconstructed() {
        let rules = london();
        let transitions = rules.transitions();
        assert_eq!(transitions.len(), 4);
        assert_eq!(transitions[0].date_time_before(), local(1996, 3, 31, 1, 0));
        assert_eq!(transitions[1].date_time_before(), local(1996, 10, 27, 2, 0));
        assert!(transitions[1].is_overlap());
        assert_eq!(rules.transition_rules().len(), 2);
    }

    #[test]
    fn year_cache_returns_identical_data() {
        let rules = london();
        // Two lookups in the same year hit the memoised array.
        let first = rules.valid_offsets(&local(2040, 7, 1, 12, 0));
        let second = rules.valid_offsets(&local(2040, 7, 1, 12, 0));
        assert_eq!(first, second);
        assert_eq!(first, vec![offset(1)]);
    }

    #[test]
    fn rules_only_zone_resolves_everywhere() {
        // A zone with no explicit history, only recurring rules.
        let gmt = offset(0);
        let bst = offset(1);
        let time = LocalTime::of(1, 0, 0).unwrap();
        let rules = ZoneRules::of(
            gmt,
            gmt,
            &[],
            &[],
            &[
                ZoneOffsetTransitionRule::of(
                    3,
                    -1,
                    Some(Weekday::Sunday),
                    time,
                    TimeDefinition::Utc,
                    gmt,
                    gmt,
                    bst,
                )
                .unwrap(),
                ZoneOffsetTransitionRule::of(
                    10,
                    -1,
                    Some(Weekday::Sunday),
                    time,
                    TimeDefinition::Utc,
                    gmt,
                    bst,
                    gmt,
                )
                .unwrap(),
            ],
        )
        .unwrap();
        assert!(rules.valid_offsets(&local(2008, 3, 30, 1, 30)).is_empty());
        assert_eq!(
            rules.offset_at(instant_of(local(2008, 7, 1, 0, 0), bst)),
            bst
        );
        assert!(rules.next_transition(Instant::EPOCH).is_some());
    }

    #[test]
    fn invalid_construction_is_rejected() {
        let gmt = offset(0);
        let bst = offset(1);
        // Offsets that do not chain.
        let bad = [
            ZoneOffsetTransition::new(local(1996, 3, 31, 1, 0), bst, gmt).unwrap(),
        ];
        assert!(matches!(
            ZoneRules::of(gmt, gmt, &[], &bad, &[]),
            Err(CivilError::ZoneRulesInvalid { .. })
        ));
        // Out-of-order instants.
        let unordered = [
            ZoneOffsetTransition::new(local(1997, 3, 30, 1, 0), gmt, bst).unwrap(),
            ZoneOffsetTransition::new(local(1996, 10, 27, 2, 0), bst, gmt).unwrap(),
        ];
        assert!(ZoneRules::of(gmt, gmt, &[], &unordered, &[]).is_err());
    }
}
