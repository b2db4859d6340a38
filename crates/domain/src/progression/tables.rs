//! Spell slot progression per spellcasting class.
//!
//! Tables are indexed `[level - 1][rank]`. Rank 0 is kept for shape but
//! always zero: cantrips are not slot-limited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Rank to slot count. Ranks with no slots are absent.
pub type SlotMap = BTreeMap<u8, u8>;

type SlotTable = [[u8; 11]; 20];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningRule {
    /// Adds spells to a spellbook or familiar, two per level.
    Prepared,
    /// Learns one spell per newly gained slot.
    Spontaneous,
    /// Knows the whole tradition list automatically.
    Auto,
}

#[derive(Debug)]
pub struct SpellcastingProfile {
    pub slug: &'static str,
    pub learning_rule: LearningRule,
    pub wave_caster: bool,
    table: &'static SlotTable,
    secondary: Option<&'static SlotTable>,
}

static PROFILES: [SpellcastingProfile; 12] = [
    SpellcastingProfile::new("wizard", LearningRule::Prepared, &FULL_CASTER),
    SpellcastingProfile::new("witch", LearningRule::Prepared, &FULL_CASTER),
    SpellcastingProfile::new("cleric", LearningRule::Auto, &FULL_CASTER),
    SpellcastingProfile::new("druid", LearningRule::Auto, &FULL_CASTER),
    SpellcastingProfile::new("bard", LearningRule::Spontaneous, &FULL_CASTER),
    SpellcastingProfile::new("sorcerer", LearningRule::Spontaneous, &SPONTANEOUS_CASTER),
    SpellcastingProfile::new("oracle", LearningRule::Spontaneous, &SPONTANEOUS_CASTER),
    SpellcastingProfile::new("psychic", LearningRule::Spontaneous, &PSYCHIC_CASTER),
    SpellcastingProfile::new("magus", LearningRule::Prepared, &WAVE_CASTER).wave(),
    SpellcastingProfile::new("summoner", LearningRule::Spontaneous, &WAVE_CASTER).wave(),
    SpellcastingProfile::new("animist", LearningRule::Auto, &FULL_CASTER)
        .with_secondary(&APPARITION),
    SpellcastingProfile::new("kineticist", LearningRule::Auto, &NO_SLOTS),
];

impl SpellcastingProfile {
    const fn new(
        slug: &'static str,
        learning_rule: LearningRule,
        table: &'static SlotTable,
    ) -> Self {
        Self {
            slug,
            learning_rule,
            wave_caster: false,
            table,
            secondary: None,
        }
    }

    const fn wave(self) -> Self {
        Self {
            wave_caster: true,
            ..self
        }
    }

    const fn with_secondary(self, table: &'static SlotTable) -> Self {
        Self {
            secondary: Some(table),
            ..self
        }
    }

    /// Registered profile for a class slug.
    pub fn lookup(slug: &str) -> Option<&'static SpellcastingProfile> {
        PROFILES.iter().find(|p| p.slug == slug)
    }

    pub fn all() -> &'static [SpellcastingProfile] {
        &PROFILES
    }

    pub fn slots(&self, level: u8) -> SlotMap {
        table_row(self.table, level)
    }

    pub fn secondary_slots(&self, level: u8) -> SlotMap {
        self.secondary
            .map(|table| table_row(table, level))
            .unwrap_or_default()
    }

    pub fn has_dual_spell_lists(&self) -> bool {
        self.secondary.is_some()
    }

    pub fn highest_rank(&self, level: u8) -> Option<u8> {
        self.slots(level).keys().next_back().copied()
    }

    /// Largest slot count this class ever has at `rank`.
    pub fn max_slots_for_rank(&self, rank: u8) -> u8 {
        self.table
            .iter()
            .map(|row| row.get(usize::from(rank)).copied().unwrap_or(0))
            .max()
            .unwrap_or(0)
    }
}

fn table_row(table: &SlotTable, level: u8) -> SlotMap {
    if !(1..=20).contains(&level) {
        return SlotMap::new();
    }
    table[usize::from(level - 1)]
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .filter_map(|(rank, count)| u8::try_from(rank).ok().map(|r| (r, *count)))
        .collect()
}

/// Slots a class has at `level`; empty for unknown slugs.
pub fn slots_at_level(slug: &str, level: u8) -> SlotMap {
    SpellcastingProfile::lookup(slug)
        .map(|p| p.slots(level))
        .unwrap_or_default()
}

pub fn secondary_slots_at_level(slug: &str, level: u8) -> SlotMap {
    SpellcastingProfile::lookup(slug)
        .map(|p| p.secondary_slots(level))
        .unwrap_or_default()
}

/// Slots gained on reaching `level`. Level 1 gains its whole row.
pub fn new_slots_at_level(slug: &str, level: u8) -> SlotMap {
    let current = slots_at_level(slug, level);
    if level <= 1 {
        return current;
    }
    let previous = slots_at_level(slug, level - 1);
    current
        .into_iter()
        .filter_map(|(rank, count)| {
            let before = previous.get(&rank).copied().unwrap_or(0);
            (count > before).then(|| (rank, count - before))
        })
        .collect()
}

/// Slots a wave caster gives up on reaching `level`. Always empty for
/// other classes.
pub fn lost_slots_at_level(slug: &str, level: u8) -> SlotMap {
    let Some(profile) = SpellcastingProfile::lookup(slug) else {
        return SlotMap::new();
    };
    if !profile.wave_caster || level <= 1 {
        return SlotMap::new();
    }
    let current = profile.slots(level);
    profile
        .slots(level - 1)
        .into_iter()
        .filter_map(|(rank, before)| {
            let now = current.get(&rank).copied().unwrap_or(0);
            (now < before).then(|| (rank, before - now))
        })
        .collect()
}

/// Wizard, witch, cleric, druid, bard and animist.
const FULL_CASTER: SlotTable = [
    [0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 1
    [0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 2
    [0, 3, 2, 0, 0, 0, 0, 0, 0, 0, 0], // 3
    [0, 3, 3, 0, 0, 0, 0, 0, 0, 0, 0], // 4
    [0, 3, 3, 2, 0, 0, 0, 0, 0, 0, 0], // 5
    [0, 3, 3, 3, 0, 0, 0, 0, 0, 0, 0], // 6
    [0, 3, 3, 3, 2, 0, 0, 0, 0, 0, 0], // 7
    [0, 3, 3, 3, 3, 0, 0, 0, 0, 0, 0], // 8
    [0, 3, 3, 3, 3, 2, 0, 0, 0, 0, 0], // 9
    [0, 3, 3, 3, 3, 3, 0, 0, 0, 0, 0], // 10
    [0, 3, 3, 3, 3, 3, 2, 0, 0, 0, 0], // 11
    [0, 3, 3, 3, 3, 3, 3, 0, 0, 0, 0], // 12
    [0, 3, 3, 3, 3, 3, 3, 2, 0, 0, 0], // 13
    [0, 3, 3, 3, 3, 3, 3, 3, 0, 0, 0], // 14
    [0, 3, 3, 3, 3, 3, 3, 3, 2, 0, 0], // 15
    [0, 3, 3, 3, 3, 3, 3, 3, 3, 0, 0], // 16
    [0, 3, 3, 3, 3, 3, 3, 3, 3, 2, 0], // 17
    [0, 3, 3, 3, 3, 3, 3, 3, 3, 3, 0], // 18
    [0, 3, 3, 3, 3, 3, 3, 3, 3, 3, 1], // 19
    [0, 3, 3, 3, 3, 3, 3, 3, 3, 3, 1], // 20
];

/// Sorcerer and oracle.
const SPONTANEOUS_CASTER: SlotTable = [
    [0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 1
    [0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 2
    [0, 4, 3, 0, 0, 0, 0, 0, 0, 0, 0], // 3
    [0, 4, 4, 0, 0, 0, 0, 0, 0, 0, 0], // 4
    [0, 4, 4, 3, 0, 0, 0, 0, 0, 0, 0], // 5
    [0, 4, 4, 4, 0, 0, 0, 0, 0, 0, 0], // 6
    [0, 4, 4, 4, 3, 0, 0, 0, 0, 0, 0], // 7
    [0, 4, 4, 4, 4, 0, 0, 0, 0, 0, 0], // 8
    [0, 4, 4, 4, 4, 3, 0, 0, 0, 0, 0], // 9
    [0, 4, 4, 4, 4, 4, 0, 0, 0, 0, 0], // 10
    [0, 4, 4, 4, 4, 4, 3, 0, 0, 0, 0], // 11
    [0, 4, 4, 4, 4, 4, 4, 0, 0, 0, 0], // 12
    [0, 4, 4, 4, 4, 4, 4, 3, 0, 0, 0], // 13
    [0, 4, 4, 4, 4, 4, 4, 4, 0, 0, 0], // 14
    [0, 4, 4, 4, 4, 4, 4, 4, 3, 0, 0], // 15
    [0, 4, 4, 4, 4, 4, 4, 4, 4, 0, 0], // 16
    [0, 4, 4, 4, 4, 4, 4, 4, 4, 3, 0], // 17
    [0, 4, 4, 4, 4, 4, 4, 4, 4, 4, 0], // 18
    [0, 4, 4, 4, 4, 4, 4, 4, 4, 4, 1], // 19
    [0, 4, 4, 4, 4, 4, 4, 4, 4, 4, 1], // 20
];

/// Psychic.
const PSYCHIC_CASTER: SlotTable = [
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 1
    [0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 2
    [0, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0], // 3
    [0, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0], // 4
    [0, 2, 2, 1, 0, 0, 0, 0, 0, 0, 0], // 5
    [0, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0], // 6
    [0, 2, 2, 2, 1, 0, 0, 0, 0, 0, 0], // 7
    [0, 2, 2, 2, 2, 0, 0, 0, 0, 0, 0], // 8
    [0, 2, 2, 2, 2, 1, 0, 0, 0, 0, 0], // 9
    [0, 2, 2, 2, 2, 2, 0, 0, 0, 0, 0], // 10
    [0, 2, 2, 2, 2, 2, 1, 0, 0, 0, 0], // 11
    [0, 2, 2, 2, 2, 2, 2, 0, 0, 0, 0], // 12
    [0, 2, 2, 2, 2, 2, 2, 1, 0, 0, 0], // 13
    [0, 2, 2, 2, 2, 2, 2, 2, 0, 0, 0], // 14
    [0, 2, 2, 2, 2, 2, 2, 2, 1, 0, 0], // 15
    [0, 2, 2, 2, 2, 2, 2, 2, 2, 0, 0], // 16
    [0, 2, 2, 2, 2, 2, 2, 2, 2, 1, 0], // 17
    [0, 2, 2, 2, 2, 2, 2, 2, 2, 2, 0], // 18
    [0, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1], // 19
    [0, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1], // 20
];

/// Magus and summoner: two ranks active at a time, lower ranks retire.
const WAVE_CASTER: SlotTable = [
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 1
    [0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 2
    [0, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0], // 3
    [0, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0], // 4
    [0, 0, 2, 1, 0, 0, 0, 0, 0, 0, 0], // 5
    [0, 0, 2, 2, 0, 0, 0, 0, 0, 0, 0], // 6
    [0, 0, 0, 2, 1, 0, 0, 0, 0, 0, 0], // 7
    [0, 0, 0, 2, 2, 0, 0, 0, 0, 0, 0], // 8
    [0, 0, 0, 0, 2, 1, 0, 0, 0, 0, 0], // 9
    [0, 0, 0, 0, 2, 2, 0, 0, 0, 0, 0], // 10
    [0, 0, 0, 0, 0, 2, 1, 0, 0, 0, 0], // 11
    [0, 0, 0, 0, 0, 2, 2, 0, 0, 0, 0], // 12
    [0, 0, 0, 0, 0, 0, 2, 1, 0, 0, 0], // 13
    [0, 0, 0, 0, 0, 0, 2, 2, 0, 0, 0], // 14
    [0, 0, 0, 0, 0, 0, 0, 2, 1, 0, 0], // 15
    [0, 0, 0, 0, 0, 0, 0, 2, 2, 0, 0], // 16
    [0, 0, 0, 0, 0, 0, 0, 0, 2, 1, 0], // 17
    [0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 0], // 18
    [0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 0], // 19
    [0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 0], // 20
];

/// Animist apparition spells, one slot per reachable rank.
const APPARITION: SlotTable = [
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 1
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 2
    [0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0], // 3
    [0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0], // 4
    [0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0], // 5
    [0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0], // 6
    [0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0], // 7
    [0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0], // 8
    [0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0], // 9
    [0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0], // 10
    [0, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0], // 11
    [0, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0], // 12
    [0, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0], // 13
    [0, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0], // 14
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0], // 15
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0], // 16
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0], // 17
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0], // 18
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0], // 19
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0], // 20
];

/// Kineticists cast no slotted spells.
const NO_SLOTS: SlotTable = [[0; 11]; 20];
