//! Checks a plan's choices against what each level actually grants.
//!
//! Problems are collected, not raised: every level is checked and every
//! issue reported.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::ActorSnapshot;
use crate::plan::build_plan::{BuildPlan, LevelPlan};
use crate::progression::{
    gradual_set_for, requirements_for_level, secondary_slots_at_level, slots_at_level,
    BOOSTS_PER_SET,
};
use crate::value_objects::{Ability, FeatCategory, PlannerConfig, SpellList};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlanIssue {
    #[error("level {level}: no {category} feat slot")]
    NoFeatSlot { level: u8, category: FeatCategory },

    #[error("level {level}: {chosen} skill increases chosen, {allowed} allowed")]
    TooManySkillIncreases { level: u8, chosen: usize, allowed: u32 },

    #[error("level {level}: {chosen} ability boosts chosen, {allowed} allowed")]
    TooManyAbilityBoosts { level: u8, chosen: usize, allowed: u8 },

    #[error("boost set opened at level {set}: {ability} boosted more than once")]
    DuplicateBoostInSet { set: u8, ability: Ability },

    #[error("boost set opened at level {set}: {chosen} boosts chosen, {allowed} allowed")]
    TooManyBoostsInSet { set: u8, chosen: usize, allowed: u8 },

    #[error("level {level}: rank {rank} spells chosen but no rank {rank} slots are reachable")]
    SpellRankUnreachable { level: u8, rank: u8 },
}

impl PlanIssue {
    pub fn level(&self) -> u8 {
        match self {
            PlanIssue::NoFeatSlot { level, .. }
            | PlanIssue::TooManySkillIncreases { level, .. }
            | PlanIssue::TooManyAbilityBoosts { level, .. }
            | PlanIssue::SpellRankUnreachable { level, .. } => *level,
            PlanIssue::DuplicateBoostInSet { set, .. }
            | PlanIssue::TooManyBoostsInSet { set, .. } => *set,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<PlanIssue>,
}

impl ValidationReport {
    fn from_issues(errors: Vec<PlanIssue>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanValidation {
    pub valid: bool,
    /// Only levels with at least one issue appear here.
    pub levels: BTreeMap<u8, ValidationReport>,
}

fn level_issues(
    actor: &ActorSnapshot,
    level: u8,
    plan: &LevelPlan,
    config: &PlannerConfig,
) -> Vec<PlanIssue> {
    let requirements = requirements_for_level(actor, level, config);
    let choices = &plan.choices;
    let mut issues = Vec::new();

    for (category, _) in choices.planned_feats() {
        if !requirements.feat_slots.has(category) {
            issues.push(PlanIssue::NoFeatSlot { level, category });
        }
    }

    let chosen = choices.skill_increases.len();
    if chosen > usize::try_from(requirements.skill_increases).unwrap_or(usize::MAX) {
        issues.push(PlanIssue::TooManySkillIncreases {
            level,
            chosen,
            allowed: requirements.skill_increases,
        });
    }

    let chosen = choices.ability_boosts.len();
    let allowed = requirements.ability_boosts.count;
    if chosen > usize::from(allowed) {
        issues.push(PlanIssue::TooManyAbilityBoosts {
            level,
            chosen,
            allowed,
        });
    }

    let slug = actor.class_slug().unwrap_or_default();
    for (list, ranks) in &choices.spells {
        let reachable = match list {
            SpellList::Primary => slots_at_level(&slug, level),
            SpellList::Secondary => secondary_slots_at_level(&slug, level),
        };
        for (rank, picks) in ranks {
            if !picks.is_empty() && !reachable.contains_key(rank) {
                issues.push(PlanIssue::SpellRankUnreachable { level, rank: *rank });
            }
        }
    }
    issues
}

/// Check a single level's choices.
pub fn validate_level_choices(
    actor: &ActorSnapshot,
    plan: &BuildPlan,
    level: u8,
    config: &PlannerConfig,
) -> ValidationReport {
    let issues = plan
        .level(level)
        .map(|l| level_issues(actor, level, l, config))
        .unwrap_or_default();
    ValidationReport::from_issues(issues)
}

/// Check every unapplied level, plus gradual boost sets that span an
/// opening and a completing level.
pub fn validate_build_plan(
    actor: &ActorSnapshot,
    plan: &BuildPlan,
    config: &PlannerConfig,
) -> PlanValidation {
    let mut by_level: BTreeMap<u8, Vec<PlanIssue>> = BTreeMap::new();
    let mut sets: BTreeMap<u8, Vec<Ability>> = BTreeMap::new();

    for (level, level_plan) in &plan.levels {
        if !level_plan.applied {
            let issues = level_issues(actor, *level, level_plan, config);
            if !issues.is_empty() {
                by_level.entry(*level).or_default().extend(issues);
            }
        }
        if let Some(set) = gradual_set_for(*level) {
            sets.entry(set)
                .or_default()
                .extend(level_plan.choices.ability_boosts.iter().copied());
        }
    }

    if config.variant_rules.gradual_boosts {
        for (set, boosts) in &sets {
            let mut seen = Vec::new();
            for ability in boosts {
                if seen.contains(ability) {
                    by_level
                        .entry(*set)
                        .or_default()
                        .push(PlanIssue::DuplicateBoostInSet {
                            set: *set,
                            ability: *ability,
                        });
                } else {
                    seen.push(*ability);
                }
            }
            if boosts.len() > usize::from(BOOSTS_PER_SET) {
                by_level
                    .entry(*set)
                    .or_default()
                    .push(PlanIssue::TooManyBoostsInSet {
                        set: *set,
                        chosen: boosts.len(),
                        allowed: BOOSTS_PER_SET,
                    });
            }
        }
    }

    let levels: BTreeMap<u8, ValidationReport> = by_level
        .into_iter()
        .map(|(level, issues)| (level, ValidationReport::from_issues(issues)))
        .collect();
    PlanValidation {
        valid: levels.is_empty(),
        levels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ClassDocument;
    use crate::value_objects::{Skill, VariantRules};
    use chrono::Utc;

    fn wizard(level: u8) -> ActorSnapshot {
        ActorSnapshot::new("a1", "Ezren", level)
            .with_class(ClassDocument::new("Wizard").with_standard_progression())
    }

    #[test]
    fn test_clean_plan_is_valid() {
        let config = PlannerConfig::default();
        let plan = BuildPlan::create(&wizard(1), &config, Utc::now());
        assert!(validate_build_plan(&wizard(1), &plan, &config).valid);
    }

    #[test]
    fn test_reports_every_problem() {
        let config = PlannerConfig::default();
        let actor = wizard(1);
        let mut plan = BuildPlan::create(&actor, &config, Utc::now());
        plan.set_feat_choice(3, FeatCategory::Archetype, Some("f".into()))
            .expect("set feat choice should succeed");
        plan.set_skill_increases(4, [Skill::Arcana]).expect("set skill increases should succeed");
        plan.set_ability_boosts(6, &[Ability::Int]).expect("set ability boosts should succeed");
        plan.set_spell_choices(3, SpellList::Primary, 5, vec!["s".into()])
            .expect("set spell choices should succeed");

        let result = validate_build_plan(&actor, &plan, &config);
        assert!(!result.valid);
        assert_eq!(result.levels.len(), 3);
        let level_three = &result.levels[&3].errors;
        assert!(level_three.contains(&PlanIssue::NoFeatSlot {
            level: 3,
            category: FeatCategory::Archetype
        }));
        assert!(level_three.contains(&PlanIssue::SpellRankUnreachable { level: 3, rank: 5 }));
        assert!(matches!(
            result.levels[&4].errors[0],
            PlanIssue::TooManySkillIncreases { chosen: 1, allowed: 0, .. }
        ));
        assert!(matches!(
            result.levels[&6].errors[0],
            PlanIssue::TooManyAbilityBoosts { .. }
        ));
    }

    fn gradual() -> PlannerConfig {
        PlannerConfig::new(VariantRules {
            gradual_boosts: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_gradual_plan_filled_to_requirement_is_valid() {
        let config = gradual();
        let actor = wizard(1);
        let mut plan = BuildPlan::create(&actor, &config, Utc::now());
        let sets = [
            [Ability::Str, Ability::Dex, Ability::Con, Ability::Int],
            [Ability::Wis, Ability::Cha, Ability::Str, Ability::Dex],
        ];
        for level in 2..=20u8 {
            let required = requirements_for_level(&actor, level, &config).ability_boosts;
            let picks = &sets[usize::from(level / 2) % 2][..usize::from(required.count)];
            plan.set_ability_boosts(level, picks).expect("writable level");
        }

        let result = validate_build_plan(&actor, &plan, &config);
        assert!(result.valid, "{:?}", result.levels);
    }

    #[test]
    fn test_gradual_duplicate_in_one_set() {
        let config = gradual();
        let actor = wizard(1);
        let mut plan = BuildPlan::create(&actor, &config, Utc::now());
        plan.set_ability_boosts(2, &[Ability::Int, Ability::Dex])
            .expect("writable level");
        plan.set_ability_boosts(3, &[Ability::Int]).expect("writable level");
        plan.set_ability_boosts(4, &[Ability::Int]).expect("writable level");

        let result = validate_build_plan(&actor, &plan, &config);
        assert!(result.levels[&2].errors.contains(&PlanIssue::DuplicateBoostInSet {
            set: 2,
            ability: Ability::Int
        }));
        assert!(!result.levels.contains_key(&4));

        let report = validate_level_choices(&actor, &plan, 2, &config);
        assert!(report.valid);
    }

    #[test]
    fn test_issue_messages() {
        let issue = PlanIssue::NoFeatSlot {
            level: 3,
            category: FeatCategory::Archetype,
        };
        assert_eq!(issue.to_string(), "level 3: no archetype feat slot");
        assert_eq!(issue.level(), 3);
    }
}
