//! Closed sets of plan keys: feat slot categories and spell lists.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Feat slot category. Serialized keys match the host's feat location
/// prefixes (`"class-4"`, `"ancestryParagon-3"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatCategory {
    Class,
    Ancestry,
    Skill,
    General,
    Archetype,
    Mythic,
    AncestryParagon,
    DualClass,
}

impl FeatCategory {
    pub const ALL: [FeatCategory; 8] = [
        FeatCategory::Class,
        FeatCategory::Ancestry,
        FeatCategory::Skill,
        FeatCategory::General,
        FeatCategory::Archetype,
        FeatCategory::Mythic,
        FeatCategory::AncestryParagon,
        FeatCategory::DualClass,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FeatCategory::Class => "class",
            FeatCategory::Ancestry => "ancestry",
            FeatCategory::Skill => "skill",
            FeatCategory::General => "general",
            FeatCategory::Archetype => "archetype",
            FeatCategory::Mythic => "mythic",
            FeatCategory::AncestryParagon => "ancestryParagon",
            FeatCategory::DualClass => "dualClass",
        }
    }

    /// Location tag written onto created feat items.
    pub fn location(&self, level: u8) -> String {
        format!("{}-{}", self.key(), level)
    }
}

impl fmt::Display for FeatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which slot table a planned spell draws from. Only dual-list casters use
/// `Secondary`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SpellList {
    #[default]
    Primary,
    Secondary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_tags() {
        assert_eq!(FeatCategory::Class.location(4), "class-4");
        assert_eq!(
            FeatCategory::AncestryParagon.location(3),
            "ancestryParagon-3"
        );
    }

    #[test]
    fn test_serde_keys_match_location_prefix() {
        for category in FeatCategory::ALL {
            let json = serde_json::to_string(&category).expect("to string should succeed");
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
    }
}
