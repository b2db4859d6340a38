//! Planner configuration passed explicitly into the resolver and filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::VariantRules;

/// Level at which destiny feats become available when mythic is enabled.
pub const DEFAULT_DESTINY_LEVEL: u8 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatSortMethod {
    /// Highest level first, alphabetical among equals
    #[default]
    LevelDesc,
    LevelAsc,
    Alphabetical,
}

impl FeatSortMethod {
    pub fn key(self) -> &'static str {
        match self {
            FeatSortMethod::LevelDesc => "level_desc",
            FeatSortMethod::LevelAsc => "level_asc",
            FeatSortMethod::Alphabetical => "alphabetical",
        }
    }
}

impl fmt::Display for FeatSortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FeatSortMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "level_desc" => Ok(FeatSortMethod::LevelDesc),
            "level_asc" => Ok(FeatSortMethod::LevelAsc),
            "alphabetical" | "alpha" => Ok(FeatSortMethod::Alphabetical),
            _ => Err(DomainError::parse(format!("Unknown feat sort method: {s}"))),
        }
    }
}

/// Snapshot of every setting the rules core reads.
///
/// Built once by the host settings adapter; nothing in the domain reads
/// global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerConfig {
    pub variant_rules: VariantRules,
    pub feat_sort: FeatSortMethod,
    /// Ancestry paragon slots also need the companion module enabled.
    pub ancestry_paragon_module_active: bool,
    pub destiny_level: u8,
    /// Feat slugs offered in archetype slots even without the archetype trait.
    pub archetype_exceptions: Vec<String>,
    pub include_uncommon_spells: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            variant_rules: VariantRules::default(),
            feat_sort: FeatSortMethod::default(),
            ancestry_paragon_module_active: false,
            destiny_level: DEFAULT_DESTINY_LEVEL,
            archetype_exceptions: Vec::new(),
            include_uncommon_spells: false,
        }
    }
}

impl PlannerConfig {
    pub fn new(variant_rules: VariantRules) -> Self {
        Self {
            variant_rules,
            ..Self::default()
        }
    }

    pub fn with_feat_sort(mut self, method: FeatSortMethod) -> Self {
        self.feat_sort = method;
        self
    }

    pub fn with_ancestry_paragon_module(mut self, active: bool) -> Self {
        self.ancestry_paragon_module_active = active;
        self
    }

    pub fn with_archetype_exceptions(mut self, slugs: Vec<String>) -> Self {
        self.archetype_exceptions = slugs;
        self
    }

    pub fn with_uncommon_spells(mut self, include: bool) -> Self {
        self.include_uncommon_spells = include;
        self
    }

    /// Paragon slots exist only when both the variant and its module are on.
    pub fn ancestry_paragon_active(&self) -> bool {
        self.variant_rules.ancestry_paragon && self.ancestry_paragon_module_active
    }
}
