//! Variant-rule drift between a plan's snapshot and the live settings.

use serde::{Deserialize, Serialize};

use crate::plan::build_plan::BuildPlan;
use crate::value_objects::{DriftSeverity, VariantRuleField, VariantRules};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRuleDifference {
    pub field: VariantRuleField,
    pub planned: String,
    pub current: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRuleComparison {
    pub matches: bool,
    pub differences: Vec<VariantRuleDifference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    /// False when any hard difference exists.
    pub compatible: bool,
    pub hard_warnings: Vec<VariantRuleDifference>,
    pub soft_warnings: Vec<VariantRuleDifference>,
}

pub fn compare_variant_rules(planned: &VariantRules, current: &VariantRules) -> VariantRuleComparison {
    let differences: Vec<VariantRuleDifference> = VariantRuleField::ALL
        .into_iter()
        .filter_map(|field| {
            let planned = planned.field_value(field);
            let current = current.field_value(field);
            (planned != current).then(|| VariantRuleDifference {
                field,
                planned,
                current,
            })
        })
        .collect();
    VariantRuleComparison {
        matches: differences.is_empty(),
        differences,
    }
}

/// Split drift into hard differences (slots may have appeared or vanished)
/// and soft ones (counts or bonuses shift). Nothing is resolved here.
pub fn validate_variant_rules_compatibility(
    planned: &VariantRules,
    current: &VariantRules,
) -> CompatibilityReport {
    let (hard_warnings, soft_warnings): (Vec<_>, Vec<_>) = compare_variant_rules(planned, current)
        .differences
        .into_iter()
        .partition(|d| d.field.severity() == DriftSeverity::Hard);
    CompatibilityReport {
        compatible: hard_warnings.is_empty(),
        hard_warnings,
        soft_warnings,
    }
}

impl BuildPlan {
    pub fn drift_from(&self, current: &VariantRules) -> CompatibilityReport {
        validate_variant_rules_compatibility(&self.variant_rules, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{AbpSetting, MythicSetting};

    #[test]
    fn test_identical_rules_match() {
        let rules = VariantRules::default();
        let comparison = compare_variant_rules(&rules, &rules);
        assert!(comparison.matches);
        assert!(comparison.differences.is_empty());
    }

    #[test]
    fn test_differences_are_listed() {
        let planned = VariantRules {
            free_archetype: true,
            ..Default::default()
        };
        let current = VariantRules {
            abp: AbpSetting::RulesAsWritten,
            ..Default::default()
        };
        let comparison = compare_variant_rules(&planned, &current);
        assert!(!comparison.matches);
        assert_eq!(
            comparison.differences[0],
            VariantRuleDifference {
                field: VariantRuleField::FreeArchetype,
                planned: "true".into(),
                current: "false".into(),
            }
        );
        assert_eq!(comparison.differences[1].current, "ABPRulesAsWritten");
    }

    #[test]
    fn test_hard_and_soft_classification() {
        let planned = VariantRules::default();
        let current = VariantRules {
            mythic: MythicSetting::Enabled,
            gradual_boosts: true,
            ancestry_paragon: true,
            ..Default::default()
        };
        let report = validate_variant_rules_compatibility(&planned, &current);
        assert!(!report.compatible);
        assert_eq!(report.hard_warnings.len(), 1);
        assert_eq!(report.hard_warnings[0].field, VariantRuleField::Mythic);
        assert_eq!(report.soft_warnings.len(), 2);

        let soft_only = VariantRules {
            gradual_boosts: true,
            ..Default::default()
        };
        assert!(validate_variant_rules_compatibility(&planned, &soft_only).compatible);
    }
}
