//! The persisted build plan: planned choices for every level 1-20.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::ActorSnapshot;
use crate::error::DomainError;
use crate::ids::DocumentRef;
use crate::progression::{requirements_for_level, secondary_slots_at_level, LevelRequirements};
use crate::value_objects::{Ability, FeatCategory, PlannerConfig, Skill, SpellList, VariantRules};

pub const PLAN_FORMAT_VERSION: u32 = 1;
pub const MAX_LEVEL: u8 = 20;

/// Mythic tier reached at each milestone level.
pub const MYTHIC_TIER_MILESTONES: [(u8, u8); 4] = [(1, 1), (6, 2), (12, 3), (18, 4)];
const DESTINY_TIER: u8 = 3;

/// Spell picks per rank.
pub type RankedSpells = BTreeMap<u8, Vec<DocumentRef>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelChoices {
    /// Planned feat per slot category; `None` while unpicked.
    pub feats: BTreeMap<FeatCategory, Option<DocumentRef>>,
    pub skill_increases: BTreeSet<Skill>,
    pub ability_boosts: BTreeSet<Ability>,
    pub spells: BTreeMap<SpellList, RankedSpells>,
}

impl LevelChoices {
    /// Empty slots matching what `requirements` asks for.
    pub fn sized_for(requirements: &LevelRequirements, secondary_ranks: &[u8]) -> Self {
        let feats = requirements
            .feat_slots
            .categories()
            .map(|category| (category, None))
            .collect();

        let mut spells = BTreeMap::new();
        if !requirements.spells.by_rank.is_empty() {
            let ranks: RankedSpells = requirements
                .spells
                .by_rank
                .keys()
                .map(|rank| (*rank, Vec::new()))
                .collect();
            spells.insert(SpellList::Primary, ranks);
        }
        if !secondary_ranks.is_empty() {
            let ranks: RankedSpells = secondary_ranks.iter().map(|r| (*r, Vec::new())).collect();
            spells.insert(SpellList::Secondary, ranks);
        }

        Self {
            feats,
            skill_increases: BTreeSet::new(),
            ability_boosts: BTreeSet::new(),
            spells,
        }
    }

    /// Planned feats that have actually been picked.
    pub fn planned_feats(&self) -> impl Iterator<Item = (FeatCategory, &DocumentRef)> + '_ {
        self.feats
            .iter()
            .filter_map(|(category, pick)| pick.as_ref().map(|uuid| (*category, uuid)))
    }

    pub fn planned_spells(&self) -> impl Iterator<Item = (SpellList, u8, &DocumentRef)> + '_ {
        self.spells.iter().flat_map(|(list, ranks)| {
            ranks
                .iter()
                .flat_map(move |(rank, uuids)| uuids.iter().map(move |uuid| (*list, *rank, uuid)))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.planned_feats().next().is_none()
            && self.skill_increases.is_empty()
            && self.ability_boosts.is_empty()
            && self.planned_spells().next().is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelPlan {
    #[serde(default)]
    pub choices: LevelChoices,
    #[serde(default)]
    pub applied: bool,
    /// Skill increases already written to the actor while the level is
    /// still being applied.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub applied_skill_increases: BTreeSet<Skill>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
    pub version: u32,
    pub last_modified: DateTime<Utc>,
    pub levels: BTreeMap<u8, LevelPlan>,
    #[serde(default)]
    pub variant_rules: VariantRules,
    #[serde(default)]
    pub mythic_tiers: BTreeMap<u8, u8>,
}

fn check_level(level: u8) -> Result<(), DomainError> {
    if (1..=MAX_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(DomainError::InvalidLevel(level))
    }
}

impl BuildPlan {
    /// Fresh plan for `actor`, sized to the variant rules in `config`.
    /// Levels at or below the actor's current level start out applied.
    pub fn create(actor: &ActorSnapshot, config: &PlannerConfig, now: DateTime<Utc>) -> Self {
        let class_slug = actor.class_slug();
        let levels = (1..=MAX_LEVEL)
            .map(|level| {
                let requirements = requirements_for_level(actor, level, config);
                let secondary = class_slug
                    .as_deref()
                    .map(|slug| secondary_slots_at_level(slug, level))
                    .unwrap_or_default();
                let previous = class_slug
                    .as_deref()
                    .filter(|_| level > 1)
                    .map(|slug| secondary_slots_at_level(slug, level - 1))
                    .unwrap_or_default();
                let new_secondary: Vec<u8> = secondary
                    .keys()
                    .filter(|rank| !previous.contains_key(rank))
                    .copied()
                    .collect();
                let plan = LevelPlan {
                    choices: LevelChoices::sized_for(&requirements, &new_secondary),
                    applied: level <= actor.level,
                    ..LevelPlan::default()
                };
                (level, plan)
            })
            .collect();

        let mythic_tiers = if config.variant_rules.mythic.is_enabled() {
            MYTHIC_TIER_MILESTONES.into_iter().collect()
        } else {
            BTreeMap::new()
        };

        Self {
            version: PLAN_FORMAT_VERSION,
            last_modified: now,
            levels,
            variant_rules: config.variant_rules,
            mythic_tiers,
        }
    }

    pub fn level(&self, level: u8) -> Option<&LevelPlan> {
        self.levels.get(&level)
    }

    fn writable_level(&mut self, level: u8) -> Result<&mut LevelPlan, DomainError> {
        check_level(level)?;
        let plan = self.levels.entry(level).or_default();
        if plan.applied {
            return Err(DomainError::LevelApplied(level));
        }
        Ok(plan)
    }

    pub fn set_feat_choice(
        &mut self,
        level: u8,
        category: FeatCategory,
        feat: Option<DocumentRef>,
    ) -> Result<(), DomainError> {
        self.writable_level(level)?
            .choices
            .feats
            .insert(category, feat);
        Ok(())
    }

    pub fn set_skill_increases(
        &mut self,
        level: u8,
        skills: impl IntoIterator<Item = Skill>,
    ) -> Result<(), DomainError> {
        self.writable_level(level)?.choices.skill_increases = skills.into_iter().collect();
        Ok(())
    }

    /// Replace a level's boosts. The same ability twice is rejected.
    pub fn set_ability_boosts(&mut self, level: u8, boosts: &[Ability]) -> Result<(), DomainError> {
        let unique: BTreeSet<Ability> = boosts.iter().copied().collect();
        if unique.len() != boosts.len() {
            return Err(DomainError::validation(format!(
                "duplicate ability boost at level {level}"
            )));
        }
        self.writable_level(level)?.choices.ability_boosts = unique;
        Ok(())
    }

    pub fn set_spell_choices(
        &mut self,
        level: u8,
        list: SpellList,
        rank: u8,
        spells: Vec<DocumentRef>,
    ) -> Result<(), DomainError> {
        let unique: BTreeSet<&DocumentRef> = spells.iter().collect();
        if unique.len() != spells.len() {
            return Err(DomainError::validation(format!(
                "duplicate spell choice at level {level} rank {rank}"
            )));
        }
        self.writable_level(level)?
            .choices
            .spells
            .entry(list)
            .or_default()
            .insert(rank, spells);
        Ok(())
    }

    pub fn set_notes(&mut self, level: u8, notes: impl Into<String>) -> Result<(), DomainError> {
        self.writable_level(level)?.notes = notes.into();
        Ok(())
    }

    /// Applied is one-way; marking an applied level again is a no-op.
    pub fn mark_applied(&mut self, level: u8) -> Result<(), DomainError> {
        check_level(level)?;
        self.levels.entry(level).or_default().applied = true;
        Ok(())
    }

    /// Record skill increases that reached the actor before the whole level
    /// finished applying.
    pub fn record_skill_increases(
        &mut self,
        level: u8,
        skills: impl IntoIterator<Item = Skill>,
    ) -> Result<(), DomainError> {
        check_level(level)?;
        self.levels
            .entry(level)
            .or_default()
            .applied_skill_increases
            .extend(skills);
        Ok(())
    }

    /// Planned skill increases not yet written to the actor.
    pub fn pending_skill_increases(&self, level: u8) -> Vec<Skill> {
        match self.level(level) {
            Some(l) if !l.applied => l
                .choices
                .skill_increases
                .difference(&l.applied_skill_increases)
                .copied()
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_applied(&self, level: u8) -> bool {
        self.level(level).is_some_and(|l| l.applied)
    }

    /// Whether anything has been picked for `level`, applied or not.
    pub fn has_choices_for_level(&self, level: u8) -> bool {
        self.level(level).is_some_and(|l| !l.choices.is_empty())
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }

    pub fn mythic_tier_at(&self, level: u8) -> Option<u8> {
        self.mythic_tiers
            .range(..=level)
            .next_back()
            .map(|(_, tier)| *tier)
    }

    /// Level where destiny feats open up, when mythic tiers are tracked.
    pub fn destiny_level(&self) -> Option<u8> {
        self.mythic_tiers
            .iter()
            .find(|(_, tier)| **tier == DESTINY_TIER)
            .map(|(level, _)| *level)
    }
}

pub fn export_plan(plan: &BuildPlan) -> Result<String, DomainError> {
    serde_json::to_string_pretty(plan).map_err(|e| DomainError::parse(e.to_string()))
}

/// Parse exported plan JSON. Nothing is returned unless the whole document
/// is valid, so a failed import never replaces an existing plan.
pub fn import_plan(json: &str) -> Result<BuildPlan, DomainError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| DomainError::invalid_import(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| DomainError::invalid_import("plan must be a JSON object"))?;

    let version = object
        .get("version")
        .ok_or_else(|| DomainError::invalid_import("missing version"))?
        .as_u64()
        .ok_or_else(|| DomainError::invalid_import("version must be a positive integer"))?;
    if version == 0 || version > u64::from(PLAN_FORMAT_VERSION) {
        return Err(DomainError::invalid_import(format!(
            "unsupported plan version {version}"
        )));
    }
    if !object.get("levels").is_some_and(|l| l.is_object()) {
        return Err(DomainError::invalid_import("missing levels"));
    }

    let plan: BuildPlan =
        serde_json::from_value(value).map_err(|e| DomainError::invalid_import(e.to_string()))?;
    if let Some(bad) = plan.levels.keys().find(|l| check_level(**l).is_err()) {
        return Err(DomainError::invalid_import(format!(
            "level {bad} out of range"
        )));
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ClassDocument;
    use crate::value_objects::MythicSetting;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).single().expect("with ymd and hms should succeed")
    }

    fn wizard(level: u8) -> ActorSnapshot {
        ActorSnapshot::new("a1", "Ezren", level)
            .with_class(ClassDocument::new("Wizard").with_standard_progression())
    }

    #[test]
    fn test_create_pre_applies_current_levels() {
        let plan = BuildPlan::create(&wizard(3), &PlannerConfig::default(), now());
        assert_eq!(plan.levels.len(), 20);
        assert!(plan.is_applied(3));
        assert!(!plan.is_applied(4));
        assert_eq!(plan.version, PLAN_FORMAT_VERSION);
    }

    #[test]
    fn test_create_sizes_choices_to_variant_rules() {
        let standard = BuildPlan::create(&wizard(1), &PlannerConfig::default(), now());
        let level_two = &standard.levels[&2].choices;
        assert!(level_two.feats.contains_key(&FeatCategory::Class));
        assert!(!level_two.feats.contains_key(&FeatCategory::Archetype));

        let rules = VariantRules {
            free_archetype: true,
            mythic: MythicSetting::Enabled,
            ..Default::default()
        };
        let variant = BuildPlan::create(&wizard(1), &PlannerConfig::new(rules), now());
        assert!(variant.levels[&2].choices.feats.contains_key(&FeatCategory::Archetype));
        assert_eq!(variant.levels[&3].choices.spells[&SpellList::Primary].len(), 1);
        assert_eq!(variant.mythic_tier_at(13), Some(3));
        assert_eq!(variant.destiny_level(), Some(12));
    }

    #[test]
    fn test_applied_levels_reject_writes() {
        let mut plan = BuildPlan::create(&wizard(3), &PlannerConfig::default(), now());
        let err = plan
            .set_feat_choice(2, FeatCategory::Class, Some("f".into()))
            .expect_err("set feat choice should fail");
        assert_eq!(err, DomainError::LevelApplied(2));
        assert!(plan.set_feat_choice(4, FeatCategory::Class, Some("f".into())).is_ok());
        assert_eq!(
            plan.set_notes(21, "x").expect_err("set notes should fail"),
            DomainError::InvalidLevel(21)
        );
    }

    #[test]
    fn test_recorded_skill_increases_are_not_pending() {
        let mut plan = BuildPlan::create(&wizard(3), &PlannerConfig::default(), now());
        plan.set_skill_increases(5, [Skill::Arcana, Skill::Society])
            .expect("set skill increases should succeed");
        assert_eq!(plan.pending_skill_increases(5), vec![Skill::Arcana, Skill::Society]);

        plan.record_skill_increases(5, [Skill::Arcana])
            .expect("record skill increases should succeed");
        assert_eq!(plan.pending_skill_increases(5), vec![Skill::Society]);

        plan.mark_applied(5).expect("mark applied should succeed");
        assert!(plan.pending_skill_increases(5).is_empty());
        assert!(plan.pending_skill_increases(2).is_empty());
    }

    #[test]
    fn test_boosts_are_a_set() {
        let mut plan = BuildPlan::create(&wizard(1), &PlannerConfig::default(), now());
        assert!(plan
            .set_ability_boosts(5, &[Ability::Int, Ability::Int])
            .is_err());
        plan.set_ability_boosts(5, &[Ability::Int, Ability::Dex]).expect("set ability boosts should succeed");
        assert_eq!(plan.levels[&5].choices.ability_boosts.len(), 2);
    }

    #[test]
    fn test_has_choices_is_independent_of_applied() {
        let mut plan = BuildPlan::create(&wizard(1), &PlannerConfig::default(), now());
        assert!(!plan.has_choices_for_level(4));
        plan.set_skill_increases(4, [Skill::Arcana]).expect("set skill increases should succeed");
        assert!(plan.has_choices_for_level(4));
        assert!(!plan.is_applied(4));

        plan.mark_applied(4).expect("mark applied should succeed");
        plan.mark_applied(4).expect("mark applied should succeed");
        assert!(plan.is_applied(4));
        assert!(plan.has_choices_for_level(4));
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut plan = BuildPlan::create(&wizard(2), &PlannerConfig::default(), now());
        plan.set_feat_choice(4, FeatCategory::Class, Some("Compendium.pf2e.feats-srd.Item.x".into()))
            .expect("set feat choice should succeed");
        plan.set_spell_choices(5, SpellList::Primary, 3, vec!["s1".into(), "s2".into()])
            .expect("set spell choices should succeed");
        plan.set_notes(6, "take Counterspell").expect("set notes should succeed");

        let json = export_plan(&plan).expect("export plan should succeed");
        assert_eq!(import_plan(&json).expect("import plan should succeed"), plan);
    }

    #[test]
    fn test_import_rejects_malformed_input() {
        assert!(matches!(
            import_plan(r#"{"levels": {}}"#),
            Err(DomainError::InvalidImport(_))
        ));
        assert!(matches!(
            import_plan(r#"{"version": 1}"#),
            Err(DomainError::InvalidImport(_))
        ));
        assert!(matches!(
            import_plan(r#"{"version": 99, "levels": {}, "lastModified": "2026-01-01T00:00:00Z"}"#),
            Err(DomainError::InvalidImport(_))
        ));
        assert!(matches!(
            import_plan(r#"{"version": 1, "levels": {"25": {}}, "lastModified": "2026-01-01T00:00:00Z"}"#),
            Err(DomainError::InvalidImport(_))
        ));
        assert!(import_plan("not json").is_err());
    }
}
