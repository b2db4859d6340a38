//! Magical traditions and content rarity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tradition {
    Arcane,
    Divine,
    Occult,
    Primal,
}

impl Tradition {
    pub const ALL: [Tradition; 4] = [
        Tradition::Arcane,
        Tradition::Divine,
        Tradition::Occult,
        Tradition::Primal,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Tradition::Arcane => "arcane",
            Tradition::Divine => "divine",
            Tradition::Occult => "occult",
            Tradition::Primal => "primal",
        }
    }
}

impl fmt::Display for Tradition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Tradition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.key() == lower)
            .ok_or_else(|| DomainError::parse(format!("Unknown tradition: {s}")))
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Unique,
}

impl Rarity {
    /// Whether a pool built with `include_uncommon` may offer this rarity.
    pub fn is_offered(self, include_uncommon: bool) -> bool {
        match self {
            Rarity::Common => true,
            Rarity::Uncommon => include_uncommon,
            Rarity::Rare | Rarity::Unique => false,
        }
    }
}
