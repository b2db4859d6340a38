//! Optional rule switches that change how many choices a level grants.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MythicSetting {
    #[default]
    Disabled,
    Enabled,
}

impl MythicSetting {
    pub fn is_enabled(self) -> bool {
        matches!(self, MythicSetting::Enabled)
    }

    pub fn key(self) -> &'static str {
        match self {
            MythicSetting::Disabled => "disabled",
            MythicSetting::Enabled => "enabled",
        }
    }
}

/// Automatic Bonus Progression variant, keyed the way the host stores it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AbpSetting {
    #[default]
    #[serde(rename = "noABP")]
    NoAbp,
    #[serde(rename = "ABPFundamentalPotency")]
    FundamentalPotency,
    #[serde(rename = "ABPRulesAsWritten")]
    RulesAsWritten,
}

impl AbpSetting {
    pub fn key(self) -> &'static str {
        match self {
            AbpSetting::NoAbp => "noABP",
            AbpSetting::FundamentalPotency => "ABPFundamentalPotency",
            AbpSetting::RulesAsWritten => "ABPRulesAsWritten",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "noABP" => Some(AbpSetting::NoAbp),
            "ABPFundamentalPotency" => Some(AbpSetting::FundamentalPotency),
            "ABPRulesAsWritten" => Some(AbpSetting::RulesAsWritten),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantRules {
    pub free_archetype: bool,
    pub gradual_boosts: bool,
    pub ancestry_paragon: bool,
    pub dual_class: bool,
    pub mythic: MythicSetting,
    pub abp: AbpSetting,
}

/// How much a difference in one rule matters to an existing plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftSeverity {
    /// Planned choices may reference slots that no longer exist.
    Hard,
    /// Plan stays usable; counts or bonuses shift.
    Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantRuleField {
    FreeArchetype,
    GradualBoosts,
    AncestryParagon,
    DualClass,
    Mythic,
    Abp,
}

impl VariantRuleField {
    pub const ALL: [VariantRuleField; 6] = [
        VariantRuleField::FreeArchetype,
        VariantRuleField::GradualBoosts,
        VariantRuleField::AncestryParagon,
        VariantRuleField::DualClass,
        VariantRuleField::Mythic,
        VariantRuleField::Abp,
    ];

    pub fn severity(self) -> DriftSeverity {
        match self {
            VariantRuleField::FreeArchetype
            | VariantRuleField::Mythic
            | VariantRuleField::DualClass => DriftSeverity::Hard,
            VariantRuleField::GradualBoosts
            | VariantRuleField::AncestryParagon
            | VariantRuleField::Abp => DriftSeverity::Soft,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            VariantRuleField::FreeArchetype => "freeArchetype",
            VariantRuleField::GradualBoosts => "gradualBoosts",
            VariantRuleField::AncestryParagon => "ancestryParagon",
            VariantRuleField::DualClass => "dualClass",
            VariantRuleField::Mythic => "mythic",
            VariantRuleField::Abp => "abp",
        }
    }
}

impl fmt::Display for VariantRuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl VariantRules {
    /// Display value of one field, used in drift reports.
    pub fn field_value(&self, field: VariantRuleField) -> String {
        match field {
            VariantRuleField::FreeArchetype => self.free_archetype.to_string(),
            VariantRuleField::GradualBoosts => self.gradual_boosts.to_string(),
            VariantRuleField::AncestryParagon => self.ancestry_paragon.to_string(),
            VariantRuleField::DualClass => self.dual_class.to_string(),
            VariantRuleField::Mythic => self.mythic.key().to_string(),
            VariantRuleField::Abp => self.abp.key().to_string(),
        }
    }
}
