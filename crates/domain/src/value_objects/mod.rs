//! Value objects for the progression rules.

pub mod ability;
pub mod config;
pub mod feat_category;
pub mod proficiency;
pub mod tradition;
pub mod variant_rules;

pub use ability::{Ability, AbilityScore, AbilityScores};
pub use config::{FeatSortMethod, PlannerConfig, DEFAULT_DESTINY_LEVEL};
pub use feat_category::{FeatCategory, SpellList};
pub use proficiency::{ProficiencyRank, Skill, SkillRanks};
pub use tradition::{Rarity, Tradition};
pub use variant_rules::{AbpSetting, DriftSeverity, MythicSetting, VariantRuleField, VariantRules};
