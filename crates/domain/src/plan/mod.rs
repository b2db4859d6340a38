//! Build plans: creation, choice edits, import/export, validation and
//! variant-rule drift.

pub mod build_plan;
pub mod reconcile;
pub mod validation;

pub use build_plan::{
    export_plan, import_plan, BuildPlan, LevelChoices, LevelPlan, RankedSpells, MAX_LEVEL,
    MYTHIC_TIER_MILESTONES, PLAN_FORMAT_VERSION,
};
pub use reconcile::{
    compare_variant_rules, validate_variant_rules_compatibility, CompatibilityReport,
    VariantRuleComparison, VariantRuleDifference,
};
pub use validation::{
    validate_build_plan, validate_level_choices, PlanIssue, PlanValidation, ValidationReport,
};
