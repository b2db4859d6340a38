//! Feat documents as served by the content source.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{contains_word, slugify};
use crate::ids::DocumentRef;
use crate::value_objects::{Rarity, Tradition};

/// A compendium feat.
///
/// Public fields: this is a plain data record with no invariants; the
/// `raw` payload is what gets cloned onto the actor when the feat is
/// applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatDocument {
    pub uuid: DocumentRef,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub level: u8,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub rarity: Rarity,
    /// Free-text prerequisite lines, one requirement per entry.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// How many copies one character may own; `None` means one.
    #[serde(default)]
    pub max_takable: Option<u32>,
    /// Tradition granted by this feat (witch patrons).
    #[serde(default)]
    pub tradition: Option<Tradition>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl FeatDocument {
    pub fn new(uuid: impl Into<DocumentRef>, name: impl Into<String>, level: u8) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            slug: None,
            level,
            traits: Vec::new(),
            rarity: Rarity::Common,
            prerequisites: Vec::new(),
            max_takable: None,
            tradition: None,
            raw: Value::Null,
        }
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = traits.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prerequisites<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_takable(mut self, max: u32) -> Self {
        self.max_takable = Some(max);
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_tradition(mut self, tradition: Tradition) -> Self {
        self.tradition = Some(tradition);
        self
    }

    /// Canonical slug, derived from the name when the document has none.
    pub fn slug(&self) -> String {
        match self.slug.as_deref() {
            Some(slug) if !slug.trim().is_empty() => slug.trim().to_lowercase(),
            _ => slugify(&self.name),
        }
    }

    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t.eq_ignore_ascii_case(name))
    }

    pub fn effective_max_takable(&self) -> u32 {
        self.max_takable.unwrap_or(1)
    }

    pub fn is_dedication(&self) -> bool {
        self.has_trait("dedication") || contains_word(&self.name, "dedication")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_fallback() {
        let feat = FeatDocument::new("f1", "Reach Spell", 1);
        assert_eq!(feat.slug(), "reach-spell");

        let mut slugged = feat.clone();
        slugged.slug = Some("Reach-Spell".into());
        assert_eq!(slugged.slug(), "reach-spell");
    }

    #[test]
    fn test_trait_lookup_is_case_insensitive() {
        let feat = FeatDocument::new("f1", "Wizard Dedication", 2).with_traits(["Archetype", "Dedication"]);
        assert!(feat.has_trait("archetype"));
        assert!(feat.is_dedication());
        assert!(!feat.has_trait("class"));
    }

    #[test]
    fn test_deserialize_minimal() {
        let feat: FeatDocument =
            serde_json::from_str(r#"{"uuid":"u","name":"Toughness","level":1}"#).expect("from str should succeed");
        assert_eq!(feat.effective_max_takable(), 1);
        assert_eq!(feat.rarity, Rarity::Common);
        assert!(feat.raw.is_null());
    }
}
