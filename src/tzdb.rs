//! The process-wide zone registry and the binary zone-rules format.
//!
//! The registry maps region identifiers to shared [`ZoneRules`]. It is
//! populated once (usually from a binary zone-rules file emitted by
//! the offline tz compiler) and is read-only afterwards; reloading is
//! a whole-registry swap, so rules already referenced by live values
//! stay valid. An override path ([`install`]) permits injecting a
//! purpose-built registry in tests.

use std::str::FromStr;
use std::sync::{Arc, LazyLock, RwLock};

use rustc_hash::FxHashMap;

use crate::components::offset::ZoneOffset;
use crate::components::time::LocalTime;
use crate::components::weekday::Weekday;
use crate::error::CivilError;
use crate::zone::rule::{TimeDefinition, ZoneOffsetTransitionRule};
use crate::zone::rules::ZoneRules;
use crate::CivilResult;

/// Legacy three-letter identifier tables.
///
/// The two tables differ only in whether `EST`, `MST`, and `HST` map
/// to a region or to a fixed offset; which one a registry uses is
/// chosen at construction.
pub mod aliases {
    /// Every legacy ID maps to a region.
    pub const REGION_ONLY: &[(&str, &str)] = &[
        ("ACT", "Australia/Darwin"),
        ("AET", "Australia/Sydney"),
        ("AGT", "America/Argentina/Buenos_Aires"),
        ("ART", "Africa/Cairo"),
        ("AST", "America/Anchorage"),
        ("BET", "America/Sao_Paulo"),
        ("BST", "Asia/Dhaka"),
        ("CAT", "Africa/Harare"),
        ("CNT", "America/St_Johns"),
        ("CST", "America/Chicago"),
        ("CTT", "Asia/Shanghai"),
        ("EAT", "Africa/Addis_Ababa"),
        ("ECT", "Europe/Paris"),
        ("EST", "America/Indianapolis"),
        ("HST", "Pacific/Honolulu"),
        ("IET", "America/Indiana/Indianapolis"),
        ("IST", "Asia/Kolkata"),
        ("JST", "Asia/Tokyo"),
        ("MIT", "Pacific/Apia"),
        ("MST", "America/Phoenix"),
        ("NET", "Asia/Yerevan"),
        ("NST", "Pacific/Auckland"),
        ("PLT", "Asia/Karachi"),
        ("PNT", "America/Phoenix"),
        ("PRT", "America/Puerto_Rico"),
        ("PST", "America/Los_Angeles"),
        ("SST", "Pacific/Guadalcanal"),
        ("VST", "Asia/Ho_Chi_Minh"),
    ];

    /// `EST`, `MST`, and `HST` map to fixed offsets; the rest match
    /// [`REGION_ONLY`].
    pub const FIXED_OFFSETS: &[(&str, &str)] = &[
        ("ACT", "Australia/Darwin"),
        ("AET", "Australia/Sydney"),
        ("AGT", "America/Argentina/Buenos_Aires"),
        ("ART", "Africa/Cairo"),
        ("AST", "America/Anchorage"),
        ("BET", "America/Sao_Paulo"),
        ("BST", "Asia/Dhaka"),
        ("CAT", "Africa/Harare"),
        ("CNT", "America/St_Johns"),
        ("CST", "America/Chicago"),
        ("CTT", "Asia/Shanghai"),
        ("EAT", "Africa/Addis_Ababa"),
        ("ECT", "Europe/Paris"),
        ("EST", "UTC-05:00"),
        ("HST", "UTC-10:00"),
        ("IET", "America/Indiana/Indianapolis"),
        ("IST", "Asia/Kolkata"),
        ("JST", "Asia/Tokyo"),
        ("MIT", "Pacific/Apia"),
        ("MST", "UTC-07:00"),
        ("NET", "Asia/Yerevan"),
        ("NST", "Pacific/Auckland"),
        ("PLT", "Asia/Karachi"),
        ("PNT", "America/Phoenix"),
        ("PRT", "America/Puerto_Rico"),
        ("PST", "America/Los_Angeles"),
        ("SST", "Pacific/Guadalcanal"),
        ("VST", "Asia/Ho_Chi_Minh"),
    ];
}

/// An immutable snapshot of zone identifier to rules mappings.
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    zones: FxHashMap<String, Arc<ZoneRules>>,
    aliases: FxHashMap<&'static str, &'static str>,
}

impl ZoneRegistry {
    /// An empty registry with the default (fixed-offset) alias table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_aliases(aliases::FIXED_OFFSETS)
    }

    /// An empty registry with an explicit alias table.
    #[must_use]
    pub fn with_aliases(table: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            zones: FxHashMap::default(),
            aliases: table.iter().copied().collect(),
        }
    }

    /// Registers rules for an identifier, replacing any previous
    /// entry.
    pub fn insert(&mut self, id: impl Into<String>, rules: ZoneRules) {
        self.zones.insert(id.into(), Arc::new(rules));
    }

    /// Resolves an identifier: a direct hit first, then one level of
    /// aliasing. Alias targets may themselves be fixed-offset
    /// identifier forms.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<ZoneRules>> {
        if let Some(rules) = self.zones.get(id) {
            return Some(Arc::clone(rules));
        }
        let target = self.aliases.get(id)?;
        if let Some(rules) = self.zones.get(*target) {
            return Some(Arc::clone(rules));
        }
        let offset = parse_offset_target(target)?;
        Some(Arc::new(ZoneRules::fixed(offset)))
    }

    /// The registered identifiers, sorted.
    #[must_use]
    pub fn zone_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.zones.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

fn parse_offset_target(target: &str) -> Option<ZoneOffset> {
    let remainder = target
        .strip_prefix("UTC")
        .or_else(|| target.strip_prefix("GMT"))
        .unwrap_or(target);
    ZoneOffset::from_str(remainder).ok()
}

static REGISTRY: LazyLock<RwLock<Arc<ZoneRegistry>>> =
    LazyLock::new(|| RwLock::new(Arc::new(ZoneRegistry::new())));

/// Swaps the process registry for a new snapshot.
///
/// Rules already handed out stay valid; only subsequent lookups see
/// the new data.
pub fn install(registry: ZoneRegistry) {
    let mut guard = match REGISTRY.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *guard = Arc::new(registry);
}

/// The current registry snapshot.
#[must_use]
pub fn current() -> Arc<ZoneRegistry> {
    let guard = match REGISTRY.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    Arc::clone(&guard)
}

/// Resolves a region identifier to its rules.
pub fn get_rules(id: &str) -> CivilResult<Arc<ZoneRules>> {
    current().get(id).ok_or_else(|| CivilError::UnknownZone {
        id: String::from(id),
    })
}

/// The identifiers available in the current registry.
#[must_use]
pub fn available_zone_ids() -> Vec<String> {
    current().zone_ids().iter().map(|&id| id.into()).collect()
}

// ==== Binary zone-rules format ====
//
// Layout (all integers little-endian):
//   magic  b"CZRF", u8 major, u8 minor, u32 zone count
// then per zone:
//   u16 identifier length + UTF-8 bytes
//   u8 offset count, i32 total-seconds each
//   u8 initial standard-offset index, u8 initial wall-offset index
//   u16 standard transition count: i64 epoch second, u8 before, u8 after
//   u16 savings transition count:  i64 epoch second, u8 before, u8 after
//   u8 rule count: u8 month, i8 dom indicator, u8 day-of-week (0 =
//      unset), u32 seconds-of-day, u8 time definition, u8 standard
//      index, u8 before index, u8 after index
//
// A record with one offset and no transitions or rules denotes a
// fixed zone. Readers reject unknown major versions; minor versions
// only append fields.

const MAGIC: &[u8; 4] = b"CZRF";
const FORMAT_MAJOR: u8 = 1;
const FORMAT_MINOR: u8 = 0;

/// Serializes a registry's zones into the binary format.
#[must_use]
pub fn write(registry: &ZoneRegistry) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    out.push(FORMAT_MAJOR);
    out.push(FORMAT_MINOR);
    let ids = registry.zone_ids();
    out.extend_from_slice(&(ids.len() as u32).to_le_bytes());
    for id in ids {
        if let Some(rules) = registry.get(id) {
            write_zone(&mut out, id, &rules);
        }
    }
    out
}

fn write_zone(out: &mut Vec<u8>, id: &str, rules: &ZoneRules) {
    out.extend_from_slice(&(id.len() as u16).to_le_bytes());
    out.extend_from_slice(id.as_bytes());

    if let Some(offset) = rules.as_fixed() {
        out.push(1);
        out.extend_from_slice(&offset.total_seconds().to_le_bytes());
        out.push(0);
        out.push(0);
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.push(0);
        return;
    }

    let Some((standard_transitions, standard_offsets, savings_transitions, wall_offsets, rules_tail)) =
        rules.raw_parts()
    else {
        return;
    };

    // Distinct offsets, sorted for a deterministic table.
    let mut table: Vec<i32> = Vec::new();
    let add = |offset: &ZoneOffset, table: &mut Vec<i32>| {
        if !table.contains(&offset.total_seconds()) {
            table.push(offset.total_seconds());
        }
    };
    for offset in standard_offsets.iter().chain(wall_offsets.iter()) {
        add(offset, &mut table);
    }
    for rule in rules_tail {
        add(&rule.standard_offset(), &mut table);
        add(&rule.offset_before(), &mut table);
        add(&rule.offset_after(), &mut table);
    }
    table.sort_unstable();
    let index_of = |offset: &ZoneOffset| -> u8 {
        table
            .iter()
            .position(|&seconds| seconds == offset.total_seconds())
            .unwrap_or(0) as u8
    };

    out.push(table.len() as u8);
    for seconds in &table {
        out.extend_from_slice(&seconds.to_le_bytes());
    }
    out.push(index_of(&standard_offsets[0]));
    out.push(index_of(&wall_offsets[0]));

    out.extend_from_slice(&(standard_transitions.len() as u16).to_le_bytes());
    for (index, epoch_second) in standard_transitions.iter().enumerate() {
        out.extend_from_slice(&epoch_second.to_le_bytes());
        out.push(index_of(&standard_offsets[index]));
        out.push(index_of(&standard_offsets[index + 1]));
    }

    out.extend_from_slice(&(savings_transitions.len() as u16).to_le_bytes());
    for (index, epoch_second) in savings_transitions.iter().enumerate() {
        out.extend_from_slice(&epoch_second.to_le_bytes());
        out.push(index_of(&wall_offsets[index]));
        out.push(index_of(&wall_offsets[index + 1]));
    }

    out.push(rules_tail.len() as u8);
    for rule in rules_tail {
        out.push(rule.month());
        out.push(rule.day_of_month_indicator() as u8);
        out.push(rule.day_of_week().map_or(0, |day| day.iso_number()));
        out.extend_from_slice(&(rule.local_time().second_of_day() as u32).to_le_bytes());
        out.push(match rule.time_definition() {
            TimeDefinition::Utc => 0,
            TimeDefinition::Wall => 1,
            TimeDefinition::Standard => 2,
        });
        out.push(index_of(&rule.standard_offset()));
        out.push(index_of(&rule.offset_before()));
        out.push(index_of(&rule.offset_after()));
    }
}

/// Deserializes a registry from the binary format, using the default
/// alias table.
pub fn read(bytes: &[u8]) -> CivilResult<ZoneRegistry> {
    read_with_aliases(bytes, aliases::FIXED_OFFSETS)
}

/// Deserializes a registry with an explicit alias table.
pub fn read_with_aliases(
    bytes: &[u8],
    table: &'static [(&'static str, &'static str)],
) -> CivilResult<ZoneRegistry> {
    let mut cursor = Cursor::new(bytes);
    let magic = cursor.take(4)?;
    if magic != MAGIC {
        return Err(cursor.error("bad zone-rules magic"));
    }
    let major = cursor.u8()?;
    // Minor versions only append data; reject on major changes.
    let _minor = cursor.u8()?;
    if major != FORMAT_MAJOR {
        return Err(cursor.error("unsupported zone-rules major version"));
    }
    let zone_count = cursor.u32()?;

    let mut registry = ZoneRegistry::with_aliases(table);
    for _ in 0..zone_count {
        let (id, rules) = read_zone(&mut cursor)?;
        registry.insert(id, rules);
    }
    if !cursor.is_done() {
        return Err(cursor.error("trailing bytes after the last zone record"));
    }
    Ok(registry)
}

fn read_zone(cursor: &mut Cursor<'_>) -> CivilResult<(String, ZoneRules)> {
    let id_length = cursor.u16()? as usize;
    let id_bytes = cursor.take(id_length)?;
    let id = core::str::from_utf8(id_bytes)
        .map_err(|_| cursor.error("zone identifier is not UTF-8"))?
        .to_owned();

    let offset_count = cursor.u8()? as usize;
    if offset_count == 0 {
        return Err(cursor.error("zone record has no offsets"));
    }
    let mut offsets = Vec::with_capacity(offset_count);
    for _ in 0..offset_count {
        offsets.push(
            ZoneOffset::of_total_seconds(cursor.i32()?)
                .map_err(|_| cursor.error("offset outside the valid range"))?,
        );
    }
    let offset_at = |index: u8, cursor: &Cursor<'_>| -> CivilResult<ZoneOffset> {
        offsets
            .get(index as usize)
            .copied()
            .ok_or_else(|| cursor.error("offset index out of bounds"))
    };

    let initial_standard = cursor.u8()?;
    let initial_wall = cursor.u8()?;

    let standard_count = cursor.u16()? as usize;
    let mut standard_transitions = Vec::with_capacity(standard_count);
    let mut standard_offsets = vec![offset_at(initial_standard, cursor)?];
    for _ in 0..standard_count {
        standard_transitions.push(cursor.i64()?);
        let before = offset_at(cursor.u8()?, cursor)?;
        if before != standard_offsets[standard_offsets.len() - 1] {
            return Err(cursor.error("standard transition offsets do not chain"));
        }
        standard_offsets.push(offset_at(cursor.u8()?, cursor)?);
    }

    let savings_count = cursor.u16()? as usize;
    let mut savings_transitions = Vec::with_capacity(savings_count);
    let mut wall_offsets = vec![offset_at(initial_wall, cursor)?];
    for _ in 0..savings_count {
        savings_transitions.push(cursor.i64()?);
        let before = offset_at(cursor.u8()?, cursor)?;
        if before != wall_offsets[wall_offsets.len() - 1] {
            return Err(cursor.error("savings transition offsets do not chain"));
        }
        wall_offsets.push(offset_at(cursor.u8()?, cursor)?);
    }

    let rule_count = cursor.u8()? as usize;
    let mut last_rules = Vec::with_capacity(rule_count);
    for _ in 0..rule_count {
        let month = cursor.u8()?;
        let indicator = cursor.u8()? as i8;
        let day_of_week = match cursor.u8()? {
            0 => None,
            number => Some(
                Weekday::from_iso_number(i64::from(number))
                    .map_err(|_| cursor.error("rule day-of-week out of range"))?,
            ),
        };
        let seconds_of_day = cursor.u32()?;
        let local_time = LocalTime::of_second_of_day(i64::from(seconds_of_day))
            .map_err(|_| cursor.error("rule time-of-day out of range"))?;
        let time_definition = match cursor.u8()? {
            0 => TimeDefinition::Utc,
            1 => TimeDefinition::Wall,
            2 => TimeDefinition::Standard,
            _ => return Err(cursor.error("unknown rule time definition")),
        };
        let standard_offset = offset_at(cursor.u8()?, cursor)?;
        let offset_before = offset_at(cursor.u8()?, cursor)?;
        let offset_after = offset_at(cursor.u8()?, cursor)?;
        last_rules.push(
            ZoneOffsetTransitionRule::of(
                month,
                indicator,
                day_of_week,
                local_time,
                time_definition,
                standard_offset,
                offset_before,
                offset_after,
            )
            .map_err(|_| cursor.error("malformed recurring rule"))?,
        );
    }

    let rules = if standard_transitions.is_empty()
        && savings_transitions.is_empty()
        && last_rules.is_empty()
    {
        ZoneRules::fixed(wall_offsets[0])
    } else {
        ZoneRules::from_raw(
            standard_transitions,
            standard_offsets,
            savings_transitions,
            wall_offsets,
            last_rules,
        )
        .map_err(|_| cursor.error("inconsistent zone transition data"))?
    };
    Ok((id, rules))
}

/// Installs the shared fixture registry exactly once per test
/// process. Every test that touches the process registry goes through
/// this, so concurrently running tests always observe the same
/// snapshot.
#[cfg(test)]
pub(crate) fn install_test_registry() {
    use std::sync::Once;

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        use crate::zone::rules::fixtures;

        let mut registry = ZoneRegistry::new();
        registry.insert("Europe/London", fixtures::london());
        registry.insert("Europe/Paris", fixtures::paris());
        registry.insert("America/New_York", fixtures::new_york());
        install(registry);
    });
}

/// A bounds-checked byte reader over the binary format.
struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn error(&self, message: &'static str) -> CivilError {
        CivilError::ParseError {
            input: String::from("zone-rules data"),
            error_index: self.position,
            message,
        }
    }

    fn is_done(&self) -> bool {
        self.position == self.bytes.len()
    }

    fn take(&mut self, length: usize) -> CivilResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(length)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| self.error("unexpected end of zone-rules data"))?;
        let slice = &self.bytes[self.position..end];
        self.position = end;
        Ok(slice)
    }

    fn u8(&mut self) -> CivilResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> CivilResult<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self) -> CivilResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn i32(&mut self) -> CivilResult<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn i64(&mut self) -> CivilResult<i64> {
        let bytes = self.take(8)?;
        Ok(i64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }
}
