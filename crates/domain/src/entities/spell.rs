//! Spell documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::DocumentRef;
use crate::value_objects::{Rarity, Tradition};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpellDocument {
    pub uuid: DocumentRef,
    pub name: String,
    /// Spell rank; 0 for cantrips.
    pub rank: u8,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub traditions: Vec<Tradition>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl SpellDocument {
    pub fn new(uuid: impl Into<DocumentRef>, name: impl Into<String>, rank: u8) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            rank,
            traits: Vec::new(),
            traditions: Vec::new(),
            rarity: Rarity::Common,
            raw: Value::Null,
        }
    }

    pub fn with_traditions(mut self, traditions: impl IntoIterator<Item = Tradition>) -> Self {
        self.traditions = traditions.into_iter().collect();
        self
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = traits.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn is_cantrip(&self) -> bool {
        self.rank == 0 || self.traits.iter().any(|t| t.eq_ignore_ascii_case("cantrip"))
    }

    /// Focus spells never come from the learnable pool.
    pub fn is_focus(&self) -> bool {
        self.traits.iter().any(|t| t.eq_ignore_ascii_case("focus"))
    }

    pub fn in_tradition(&self, tradition: Tradition) -> bool {
        self.traditions.contains(&tradition)
    }
}
