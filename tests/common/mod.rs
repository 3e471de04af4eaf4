//! Shared zone fixtures for the integration suites.
//!
//! The scenario zones are built programmatically from explicit
//! transitions plus recurring rules, so the suites run without any
//! zone data on disk.
#![allow(dead_code)]

use std::sync::Once;

use civil_rs::tzdb::{self, ZoneRegistry};
use civil_rs::{
    LocalDateTime, LocalTime, TimeDefinition, Weekday, ZoneId, ZoneOffset, ZoneOffsetTransition,
    ZoneOffsetTransitionRule, ZoneRules,
};

pub fn offset(hours: i32) -> ZoneOffset {
    ZoneOffset::of_hours(hours).unwrap()
}

fn sunday_rule(
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

/// Europe/London: GMT standard; BST between the last Sundays of March
/// and October, switching at 01:00 UTC. Two years of explicit history
/// ahead of the recurring rules.
pub fn london_rules() -> ZoneRules {
    let gmt = offset(0);
    let bst = offset(1);
    let local = |year, month, day, hour| LocalDateTime::of(year, month, day, hour, 0, 0).unwrap();
    let transitions = [
        ZoneOffsetTransition::new(local(1996, 3, 31, 1), gmt, bst).unwrap(),
        ZoneOffsetTransition::new(local(1996, 10, 27, 2), bst, gmt).unwrap(),
        ZoneOffsetTransition::new(local(1997, 3, 30, 1), gmt, bst).unwrap(),
        ZoneOffsetTransition::new(local(1997, 10, 26, 2), bst, gmt).unwrap(),
    ];
    let rules = [
        sunday_rule(3, -1, 1, TimeDefinition::Utc, gmt, gmt, bst),
        sunday_rule(10, -1, 1, TimeDefinition::Utc, gmt, bst, gmt),
    ];
    ZoneRules::of(gmt, gmt, &[], &transitions, &rules).unwrap()
}

/// Europe/Paris: CET standard; CEST between the last Sundays of March
/// and October, switching at 01:00 UTC.
pub fn paris_rules() -> ZoneRules {
    let cet = offset(1);
    let cest = offset(2);
    let rules = [
        sunday_rule(3, -1, 1, TimeDefinition::Utc, cet, cet, cest),
        sunday_rule(10, -1, 1, TimeDefinition::Utc, cet, cest, cet),
    ];
    ZoneRules::of(cet, cet, &[], &[], &rules).unwrap()
}

/// America/New_York: EST standard; EDT from the second Sunday of
/// March to the first Sunday of November, switching at 02:00 wall
/// time.
pub fn new_york_rules() -> ZoneRules {
    let est = offset(-5);
    let edt = offset(-4);
    let rules = [
        sunday_rule(3, 8, 2, TimeDefinition::Wall, est, est, edt),
        sunday_rule(11, 1, 2, TimeDefinition::Wall, est, edt, est),
    ];
    ZoneRules::of(est, est, &[], &[], &rules).unwrap()
}

/// Installs the fixture registry once per test process.
pub fn install_registry() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let mut registry = ZoneRegistry::new();
        registry.insert("Europe/London", london_rules());
        registry.insert("Europe/Paris", paris_rules());
        registry.insert("America/New_York", new_york_rules());
        tzdb::install(registry);
    });
}

pub fn zone(id: &str) -> ZoneId {
    install_registry();
    ZoneId::of(id).unwrap()
}
