//! The six PF2e ability scores.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];

    /// Three-letter key used by the host data model.
    pub fn key(&self) -> &'static str {
        match self {
            Ability::Str => "str",
            Ability::Dex => "dex",
            Ability::Con => "con",
            Ability::Int => "int",
            Ability::Wis => "wis",
            Ability::Cha => "cha",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Ability::Str => "Strength",
            Ability::Dex => "Dexterity",
            Ability::Con => "Constitution",
            Ability::Int => "Intelligence",
            Ability::Wis => "Wisdom",
            Ability::Cha => "Charisma",
        }
    }

    /// Accepts the short key or the full name, any case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.key() == lower || a.full_name().to_lowercase() == lower)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| DomainError::parse(format!("Unknown ability: {s}")))
    }
}

/// Score value plus its modifier.
///
/// Hosts on the remastered rules track only modifiers, so both are carried
/// as delivered rather than always deriving one from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub value: i32,
    #[serde(rename = "mod")]
    pub modifier: i32,
}

impl AbilityScore {
    pub fn new(value: i32, modifier: i32) -> Self {
        Self { value, modifier }
    }

    /// Derive the modifier with floor division: `(value - 10) / 2`.
    pub fn from_value(value: i32) -> Self {
        Self {
            value,
            modifier: (value - 10).div_euclid(2),
        }
    }
}

impl Default for AbilityScore {
    fn default() -> Self {
        Self::from_value(10)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityScores(BTreeMap<Ability, AbilityScore>);

impl AbilityScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw score values, deriving each modifier.
    pub fn from_values(values: impl IntoIterator<Item = (Ability, i32)>) -> Self {
        Self(
            values
                .into_iter()
                .map(|(ability, value)| (ability, AbilityScore::from_value(value)))
                .collect(),
        )
    }

    /// Missing abilities read as a flat 10.
    pub fn get(&self, ability: Ability) -> AbilityScore {
        self.0.get(&ability).copied().unwrap_or_default()
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.get(ability).modifier
    }

    pub fn set(&mut self, ability: Ability, score: AbilityScore) {
        self.0.insert(ability, score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_floors_negative_values() {
        assert_eq!(AbilityScore::from_value(10).modifier, 0);
        assert_eq!(AbilityScore::from_value(18).modifier, 4);
        assert_eq!(AbilityScore::from_value(9).modifier, -1);
        assert_eq!(AbilityScore::from_value(8).modifier, -1);
        assert_eq!(AbilityScore::from_value(7).modifier, -2);
    }

    #[test]
    fn test_parse_ability_names() {
        assert_eq!("int".parse::<Ability>().expect("parse should succeed"), Ability::Int);
        assert_eq!("Charisma".parse::<Ability>().expect("parse should succeed"), Ability::Cha);
        assert!("luck".parse::<Ability>().is_err());
    }

    #[test]
    fn test_scores_default_to_ten() {
        let scores = AbilityScores::from_values([(Ability::Int, 16)]);
        assert_eq!(scores.modifier(Ability::Int), 3);
        assert_eq!(scores.get(Ability::Str), AbilityScore::new(10, 0));
    }

    #[test]
    fn test_scores_serialize_by_key() {
        let scores = AbilityScores::from_values([(Ability::Dex, 14)]);
        let json = serde_json::to_value(&scores).expect("to value should succeed");
        assert_eq!(json, serde_json::json!({"dex": {"value": 14, "mod": 2}}));
    }
}
