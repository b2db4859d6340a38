//! Levelwright domain: the PF2e progression rules core.
//!
//! Everything in this crate is synchronous and side-effect free. Actor state
//! arrives as an [`ActorSnapshot`], rule switches arrive as a
//! [`PlannerConfig`], and every function derives its answer from those two
//! values plus the static progression tables.

extern crate self as levelwright_domain;

pub mod common;
pub mod eligibility;
pub mod entities;
pub mod error;
pub mod ids;
pub mod plan;
pub mod progression;
pub mod value_objects;

pub use entities::{
    ActorSnapshot, AncestryDocument, ClassDocument, FeatDocument, HeritageDocument, OwnedFeat,
    OwnedSpell, SlotState, SpellDocument, SpellcastingEntry,
};

pub use error::DomainError;

pub use ids::{ActorId, DocumentRef, ItemId};

pub use value_objects::{
    Ability, AbilityScore, AbilityScores, AbpSetting, FeatCategory, FeatSortMethod,
    MythicSetting, PlannerConfig, ProficiencyRank, Rarity, Skill, SpellList, Tradition,
    VariantRuleField, VariantRules,
};

pub use progression::{
    detect_ability_boosts, feat_slots_for_level, kineticist_gates, lost_slots_at_level,
    new_slots_at_level, requirements_for_level, secondary_slots_at_level,
    skill_increases_for_level, slots_at_level, spell_tradition, spells_to_learn_at_level,
    AbilityBoostRequirement, FeatSlots, KineticGate, LearningRule, LevelRequirements,
    SlotMap, SpellObligation, SpellcastingProfile,
};

pub use eligibility::{
    check_prerequisites, feats_for_level, filter_feats, sort_candidates, spells_for_rank,
    FeatCandidate, OwnedFeatIndex, PrerequisiteCheck, SpellFilterOptions,
};

pub use plan::{
    compare_variant_rules, export_plan, import_plan, validate_build_plan,
    validate_variant_rules_compatibility, BuildPlan, CompatibilityReport, LevelChoices,
    LevelPlan, PlanIssue, PlanValidation, ValidationReport, VariantRuleComparison,
    VariantRuleDifference, PLAN_FORMAT_VERSION,
};
