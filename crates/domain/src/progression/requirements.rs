//! Choices a level demands: feat slots, boosts, skill increases, spells.
//!
//! A snapshot without a class item resolves to zero everywhere; missing
//! data is never an error here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::ActorSnapshot;
use crate::progression::spells::{spells_to_learn_at_level, SpellObligation};
use crate::value_objects::{Ability, FeatCategory, PlannerConfig, VariantRules};

/// Levels granting four boosts under the standard rules.
pub const BOOST_MILESTONES: [u8; 4] = [5, 10, 15, 20];

/// Gradual boosts: each even level opens a set of four, closed at the
/// next level listed here. Sets opened after 17 close at 20, which also
/// opens and closes its own set.
pub const GRADUAL_COMPLETION_LEVELS: [u8; 4] = [3, 7, 13, 17];

pub const BOOSTS_PER_SET: u8 = 4;

const FREE_ARCHETYPE_LEVELS: [u8; 10] = [2, 4, 6, 8, 10, 12, 14, 16, 18, 20];
const MYTHIC_FEAT_LEVELS: [u8; 10] = [2, 4, 6, 8, 10, 12, 14, 16, 18, 20];
const ANCESTRY_PARAGON_LEVELS: [u8; 6] = [1, 3, 7, 11, 15, 19];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatSlots(BTreeMap<FeatCategory, u8>);

impl FeatSlots {
    pub fn get(&self, category: FeatCategory) -> u8 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn has(&self, category: FeatCategory) -> bool {
        self.get(category) > 0
    }

    pub fn total(&self) -> u32 {
        self.0.values().map(|n| u32::from(*n)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Categories with at least one slot, in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = FeatCategory> + '_ {
        self.0
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(category, _)| *category)
    }

    fn add(&mut self, category: FeatCategory, count: u8) {
        if count > 0 {
            *self.0.entry(category).or_insert(0) += count;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityBoostRequirement {
    pub count: u8,
    /// Boosts here are part of a set finished at a later level.
    pub partial: bool,
    /// This level closes a gradual set opened earlier.
    pub completing: bool,
}

fn occurs(levels: &[u8], level: u8) -> u8 {
    let n = levels.iter().filter(|l| **l == level).count();
    u8::try_from(n).unwrap_or(u8::MAX)
}

pub fn feat_slots_for_level(actor: &ActorSnapshot, level: u8, config: &PlannerConfig) -> FeatSlots {
    let mut slots = FeatSlots::default();
    let Some(class) = actor.class.as_ref() else {
        return slots;
    };
    let rules = &config.variant_rules;

    for category in [
        FeatCategory::Class,
        FeatCategory::Ancestry,
        FeatCategory::Skill,
        FeatCategory::General,
    ] {
        slots.add(category, occurs(class.feat_levels(category), level));
    }
    if rules.free_archetype {
        slots.add(FeatCategory::Archetype, occurs(&FREE_ARCHETYPE_LEVELS, level));
    }
    if rules.mythic.is_enabled() {
        slots.add(FeatCategory::Mythic, occurs(&MYTHIC_FEAT_LEVELS, level));
    }
    if config.ancestry_paragon_active() {
        slots.add(
            FeatCategory::AncestryParagon,
            occurs(&ANCESTRY_PARAGON_LEVELS, level),
        );
    }
    if rules.dual_class {
        if let Some(dual) = actor.dual_class.as_ref() {
            slots.add(FeatCategory::DualClass, occurs(&dual.class_feat_levels, level));
        }
    }
    slots
}

pub fn detect_ability_boosts(
    actor: &ActorSnapshot,
    level: u8,
    rules: &VariantRules,
) -> AbilityBoostRequirement {
    if actor.class.is_none() || !(1..=20).contains(&level) {
        return AbilityBoostRequirement::default();
    }
    if !rules.gradual_boosts {
        let count = if BOOST_MILESTONES.contains(&level) {
            BOOSTS_PER_SET
        } else {
            0
        };
        return AbilityBoostRequirement {
            count,
            ..AbilityBoostRequirement::default()
        };
    }

    if level == 20 {
        AbilityBoostRequirement {
            count: BOOSTS_PER_SET,
            partial: true,
            completing: true,
        }
    } else if level % 2 == 0 {
        AbilityBoostRequirement {
            count: BOOSTS_PER_SET,
            partial: true,
            completing: false,
        }
    } else if GRADUAL_COMPLETION_LEVELS.contains(&level) {
        AbilityBoostRequirement {
            count: 0,
            partial: false,
            completing: true,
        }
    } else {
        AbilityBoostRequirement::default()
    }
}

/// Completing level for a gradual set opened at `open_level`.
pub fn gradual_completion_for(open_level: u8) -> Option<u8> {
    if open_level == 20 {
        return Some(20);
    }
    if open_level % 2 != 0 || !(2..20).contains(&open_level) {
        return None;
    }
    GRADUAL_COMPLETION_LEVELS
        .iter()
        .copied()
        .find(|l| *l > open_level)
        .or(Some(20))
}

/// Opening level of the gradual set that boosts chosen at `level` belong to.
/// A completing level joins the latest set it closes.
pub fn gradual_set_for(level: u8) -> Option<u8> {
    if level % 2 == 0 {
        return (2..=20).contains(&level).then_some(level);
    }
    (2..level)
        .rev()
        .filter(|open| open % 2 == 0)
        .find(|open| gradual_completion_for(*open) == Some(level))
}

/// Bucket the host files a level's boosts under: the next milestone at or
/// above it.
pub fn boost_bucket_for_level(level: u8) -> u8 {
    BOOST_MILESTONES
        .iter()
        .copied()
        .find(|m| *m >= level)
        .unwrap_or(20)
}

pub fn skill_increases_for_level(actor: &ActorSnapshot, level: u8) -> u32 {
    let Some(class) = actor.class.as_ref() else {
        return 0;
    };
    let base = class
        .skill_increase_levels
        .iter()
        .filter(|l| **l == level)
        .count();
    let base = u32::try_from(base).unwrap_or(0);

    let int_mod = actor.ability_modifier(Ability::Int);
    let bonus = if level > 1 && level % 2 == 1 && int_mod > 0 {
        u32::try_from(int_mod).unwrap_or(0)
    } else {
        0
    };
    base + bonus
}

/// Everything one level asks for, computed in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRequirements {
    pub level: u8,
    pub feat_slots: FeatSlots,
    pub ability_boosts: AbilityBoostRequirement,
    pub skill_increases: u32,
    pub spells: SpellObligation,
}

impl LevelRequirements {
    pub fn is_empty(&self) -> bool {
        self.feat_slots.is_empty()
            && self.ability_boosts.count == 0
            && self.skill_increases == 0
            && self.spells.is_empty()
    }
}

pub fn requirements_for_level(
    actor: &ActorSnapshot,
    level: u8,
    config: &PlannerConfig,
) -> LevelRequirements {
    LevelRequirements {
        level,
        feat_slots: feat_slots_for_level(actor, level, config),
        ability_boosts: detect_ability_boosts(actor, level, &config.variant_rules),
        skill_increases: skill_increases_for_level(actor, level),
        spells: spells_to_learn_at_level(actor, level),
    }
}
