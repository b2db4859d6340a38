//! Value-typed snapshot of an actor, taken from the host store.
//!
//! The rules core never mutates host state; it reads a snapshot and the
//! applicator writes changes back through the host port. Snapshots are
//! cloned before any in-memory modification.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::common::eq_ignore_case;
use crate::entities::{AncestryDocument, ClassDocument, HeritageDocument};
use crate::ids::{ActorId, DocumentRef, ItemId};
use crate::value_objects::{Ability, AbilityScores, ProficiencyRank, Skill, SkillRanks, Tradition};

/// A feat item owned by the actor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OwnedFeat {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// Compendium document this item was created from.
    #[serde(default)]
    pub source_id: Option<DocumentRef>,
    #[serde(default)]
    pub level: u8,
    /// Slot tag such as `"class-4"`.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub tradition: Option<Tradition>,
}

impl OwnedFeat {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            source_id: None,
            level: 1,
            location: None,
            traits: Vec::new(),
            tradition: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<DocumentRef>) -> Self {
        self.source_id = Some(source.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_tradition(mut self, tradition: Tradition) -> Self {
        self.tradition = Some(tradition);
        self
    }

    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OwnedSpell {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub source_id: Option<DocumentRef>,
    #[serde(default)]
    pub rank: u8,
    /// Spellcasting entry the spell is filed under.
    #[serde(default)]
    pub location: Option<ItemId>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotState {
    pub max: u8,
    pub value: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpellcastingEntry {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub tradition: Option<Tradition>,
    /// Casting type: `prepared`, `spontaneous`, `innate` or `focus`.
    #[serde(default)]
    pub prepared: Option<String>,
    /// Entry category; class-granted entries use `"class"`.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub slots: BTreeMap<u8, SlotState>,
}

impl SpellcastingEntry {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tradition: None,
            prepared: None,
            category: None,
            slots: BTreeMap::new(),
        }
    }

    pub fn is_focus(&self) -> bool {
        self.prepared
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case("focus"))
            || self.name.to_lowercase().contains("focus")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActorSnapshot {
    pub id: ActorId,
    pub name: String,
    pub level: u8,
    #[serde(default)]
    pub abilities: AbilityScores,
    #[serde(default)]
    pub skills: SkillRanks,
    #[serde(default)]
    pub class: Option<ClassDocument>,
    #[serde(default)]
    pub dual_class: Option<ClassDocument>,
    #[serde(default)]
    pub ancestry: Option<AncestryDocument>,
    #[serde(default)]
    pub heritage: Option<HeritageDocument>,
    #[serde(default)]
    pub feats: Vec<OwnedFeat>,
    #[serde(default)]
    pub spells: Vec<OwnedSpell>,
    #[serde(default)]
    pub spellcasting_entries: Vec<SpellcastingEntry>,
    /// Ability boosts already recorded, keyed by boost bucket level.
    #[serde(default)]
    pub ability_boosts: BTreeMap<u8, Vec<Ability>>,
}

impl ActorSnapshot {
    pub fn new(id: impl Into<ActorId>, name: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            abilities: AbilityScores::default(),
            skills: SkillRanks::new(),
            class: None,
            dual_class: None,
            ancestry: None,
            heritage: None,
            feats: Vec::new(),
            spells: Vec::new(),
            spellcasting_entries: Vec::new(),
            ability_boosts: BTreeMap::new(),
        }
    }

    pub fn with_class(mut self, class: ClassDocument) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_abilities(mut self, abilities: AbilityScores) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_feat(mut self, feat: OwnedFeat) -> Self {
        self.feats.push(feat);
        self
    }

    pub fn with_entry(mut self, entry: SpellcastingEntry) -> Self {
        self.spellcasting_entries.push(entry);
        self
    }

    pub fn class_slug(&self) -> Option<String> {
        self.class.as_ref().map(ClassDocument::class_slug)
    }

    pub fn skill_rank(&self, skill: Skill) -> ProficiencyRank {
        self.skills.get(&skill).copied().unwrap_or_default()
    }

    pub fn ability_modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    pub fn owns_feat_named(&self, name: &str) -> bool {
        self.feats.iter().any(|f| eq_ignore_case(&f.name, name))
    }

    /// Owned copies per lowercased feat name.
    pub fn feat_counts(&self) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for feat in &self.feats {
            *counts.entry(feat.name.trim().to_lowercase()).or_insert(0) += 1;
        }
        counts
    }

    pub fn knows_spell_named(&self, name: &str) -> bool {
        self.spells.iter().any(|s| eq_ignore_case(&s.name, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feat_counts_are_case_insensitive() {
        let actor = ActorSnapshot::new("a1", "Ezren", 3)
            .with_feat(OwnedFeat::new("i1", "Toughness"))
            .with_feat(OwnedFeat::new("i2", "toughness"))
            .with_feat(OwnedFeat::new("i3", "Reach Spell"));

        let counts = actor.feat_counts();
        assert_eq!(counts.get("toughness"), Some(&2));
        assert_eq!(counts.get("reach spell"), Some(&1));
        assert!(actor.owns_feat_named("REACH SPELL"));
    }

    #[test]
    fn test_missing_skill_is_untrained() {
        let actor = ActorSnapshot::new("a1", "Ezren", 1);
        assert_eq!(actor.skill_rank(Skill::Arcana), ProficiencyRank::Untrained);
        assert_eq!(actor.class_slug(), None);
    }

    #[test]
    fn test_focus_entry_detection() {
        let mut entry = SpellcastingEntry::new("e1", "Domain Spells");
        entry.prepared = Some("focus".into());
        assert!(entry.is_focus());
        assert!(SpellcastingEntry::new("e2", "Focus Spells").is_focus());
        assert!(!SpellcastingEntry::new("e3", "Arcane Prepared Spells").is_focus());
    }

    #[test]
    fn test_snapshot_deserializes_from_host_json() {
        let json = serde_json::json!({
            "id": "Actor.x",
            "name": "Seoni",
            "level": 2,
            "abilities": {"cha": {"value": 18, "mod": 4}},
            "skills": {"arcana": 1},
            "class": {"name": "Sorcerer", "classFeatLevels": [1, 2]},
            "feats": [{"id": "f1", "name": "Draconic Bloodline"}]
        });
        let actor: ActorSnapshot = serde_json::from_value(json).expect("from value should succeed");
        assert_eq!(actor.class_slug().as_deref(), Some("sorcerer"));
        assert_eq!(actor.skill_rank(Skill::Arcana), ProficiencyRank::Trained);
        assert_eq!(actor.ability_modifier(Ability::Cha), 4);
    }
}
