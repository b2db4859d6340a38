//! Proficiency ranks and the fixed PF2e skill list.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Pathfinder 2e proficiency ranks, stored by the host as 0-4.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProficiencyRank {
    /// Not trained in the skill
    #[default]
    Untrained,
    /// Basic training (+2 + level)
    Trained,
    /// Advanced training (+4 + level)
    Expert,
    /// Mastery (+6 + level)
    Master,
    /// Ultimate mastery (+8 + level)
    Legendary,
}

impl ProficiencyRank {
    pub fn as_u8(self) -> u8 {
        match self {
            ProficiencyRank::Untrained => 0,
            ProficiencyRank::Trained => 1,
            ProficiencyRank::Expert => 2,
            ProficiencyRank::Master => 3,
            ProficiencyRank::Legendary => 4,
        }
    }

    /// One rank higher, saturating at legendary.
    pub fn increased(self) -> Self {
        match self {
            ProficiencyRank::Untrained => ProficiencyRank::Trained,
            ProficiencyRank::Trained => ProficiencyRank::Expert,
            ProficiencyRank::Expert => ProficiencyRank::Master,
            ProficiencyRank::Master | ProficiencyRank::Legendary => ProficiencyRank::Legendary,
        }
    }

    /// Get the rank bonus (before adding level).
    pub fn rank_bonus(self) -> i32 {
        match self {
            ProficiencyRank::Untrained => 0,
            ProficiencyRank::Trained => 2,
            ProficiencyRank::Expert => 4,
            ProficiencyRank::Master => 6,
            ProficiencyRank::Legendary => 8,
        }
    }

    /// Calculate full proficiency bonus including level.
    pub fn proficiency_bonus(self, level: u8) -> i32 {
        match self {
            ProficiencyRank::Untrained => 0,
            _ => self.rank_bonus() + i32::from(level),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ProficiencyRank::Untrained => "untrained",
            ProficiencyRank::Trained => "trained",
            ProficiencyRank::Expert => "expert",
            ProficiencyRank::Master => "master",
            ProficiencyRank::Legendary => "legendary",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "untrained" => Some(ProficiencyRank::Untrained),
            "trained" => Some(ProficiencyRank::Trained),
            "expert" => Some(ProficiencyRank::Expert),
            "master" => Some(ProficiencyRank::Master),
            "legendary" => Some(ProficiencyRank::Legendary),
            _ => None,
        }
    }
}

impl TryFrom<u8> for ProficiencyRank {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ProficiencyRank::Untrained),
            1 => Ok(ProficiencyRank::Trained),
            2 => Ok(ProficiencyRank::Expert),
            3 => Ok(ProficiencyRank::Master),
            4 => Ok(ProficiencyRank::Legendary),
            other => Err(DomainError::parse(format!(
                "Proficiency rank out of range: {other}"
            ))),
        }
    }
}

impl From<ProficiencyRank> for u8 {
    fn from(rank: ProficiencyRank) -> Self {
        rank.as_u8()
    }
}

impl fmt::Display for ProficiencyRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Acrobatics,
    Arcana,
    Athletics,
    Crafting,
    Deception,
    Diplomacy,
    Intimidation,
    Medicine,
    Nature,
    Occultism,
    Performance,
    Religion,
    Society,
    Stealth,
    Survival,
    Thievery,
}

impl Skill {
    pub const ALL: [Skill; 16] = [
        Skill::Acrobatics,
        Skill::Arcana,
        Skill::Athletics,
        Skill::Crafting,
        Skill::Deception,
        Skill::Diplomacy,
        Skill::Intimidation,
        Skill::Medicine,
        Skill::Nature,
        Skill::Occultism,
        Skill::Performance,
        Skill::Religion,
        Skill::Society,
        Skill::Stealth,
        Skill::Survival,
        Skill::Thievery,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Skill::Acrobatics => "acrobatics",
            Skill::Arcana => "arcana",
            Skill::Athletics => "athletics",
            Skill::Crafting => "crafting",
            Skill::Deception => "deception",
            Skill::Diplomacy => "diplomacy",
            Skill::Intimidation => "intimidation",
            Skill::Medicine => "medicine",
            Skill::Nature => "nature",
            Skill::Occultism => "occultism",
            Skill::Performance => "performance",
            Skill::Religion => "religion",
            Skill::Society => "society",
            Skill::Stealth => "stealth",
            Skill::Survival => "survival",
            Skill::Thievery => "thievery",
        }
    }

    /// Short codes the host uses for skill attributes (`system.skills.acr`).
    pub fn host_code(&self) -> &'static str {
        match self {
            Skill::Acrobatics => "acr",
            Skill::Arcana => "arc",
            Skill::Athletics => "ath",
            Skill::Crafting => "cra",
            Skill::Deception => "dec",
            Skill::Diplomacy => "dip",
            Skill::Intimidation => "itm",
            Skill::Medicine => "med",
            Skill::Nature => "nat",
            Skill::Occultism => "occ",
            Skill::Performance => "prf",
            Skill::Religion => "rel",
            Skill::Society => "soc",
            Skill::Stealth => "ste",
            Skill::Survival => "sur",
            Skill::Thievery => "thi",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.key() == lower || s.host_code() == lower)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Skill {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| DomainError::parse(format!("Unknown skill: {s}")))
    }
}

/// Rank per skill; skills absent from the map are untrained.
pub type SkillRanks = BTreeMap<Skill, ProficiencyRank>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_bonus() {
        assert_eq!(ProficiencyRank::Untrained.proficiency_bonus(5), 0);
        assert_eq!(ProficiencyRank::Trained.proficiency_bonus(5), 7);
        assert_eq!(ProficiencyRank::Legendary.proficiency_bonus(20), 28);
    }

    #[test]
    fn test_increase_saturates() {
        assert_eq!(
            ProficiencyRank::Untrained.increased(),
            ProficiencyRank::Trained
        );
        assert_eq!(
            ProficiencyRank::Legendary.increased(),
            ProficiencyRank::Legendary
        );
    }

    #[test]
    fn test_rank_serializes_as_number() {
        let json = serde_json::to_string(&ProficiencyRank::Expert).expect("to string should succeed");
        assert_eq!(json, "2");
        let back: ProficiencyRank = serde_json::from_str("3").expect("from str should succeed");
        assert_eq!(back, ProficiencyRank::Master);
        assert!(serde_json::from_str::<ProficiencyRank>("7").is_err());
    }

    #[test]
    fn test_skill_lookup_accepts_host_codes() {
        assert_eq!(Skill::from_name("ath"), Some(Skill::Athletics));
        assert_eq!(Skill::from_name("Occultism"), Some(Skill::Occultism));
        assert_eq!(Skill::from_name("lore"), None);
    }
}
