//! Filters applied to the cached content superset.

use std::collections::BTreeSet;

use levelwright_domain::{FeatDocument, Rarity, SpellDocument, Tradition};

/// Filter criteria for feat queries. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct FeatFilter {
    pub level_min: Option<u8>,
    pub level_max: Option<u8>,
    /// Keep feats carrying at least one of these traits (case-insensitive).
    pub traits: Vec<String>,
    /// Keep only these rarities.
    pub rarities: Option<BTreeSet<Rarity>>,
    /// Drop feats whose name matches one of these (case-insensitive).
    pub exclude_names: Vec<String>,
    pub limit: Option<usize>,
}

impl FeatFilter {
    pub fn matches(&self, feat: &FeatDocument) -> bool {
        if self.level_min.is_some_and(|min| feat.level < min) {
            return false;
        }
        if self.level_max.is_some_and(|max| feat.level > max) {
            return false;
        }
        if !self.traits.is_empty() && !self.traits.iter().any(|t| feat.has_trait(t)) {
            return false;
        }
        if let Some(ref rarities) = self.rarities {
            if !rarities.contains(&feat.rarity) {
                return false;
            }
        }
        !self
            .exclude_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&feat.name))
    }
}

/// Filter criteria for spell queries.
#[derive(Debug, Clone, Default)]
pub struct SpellFilter {
    pub rank_min: Option<u8>,
    pub rank_max: Option<u8>,
    /// Keep spells on any of these lists.
    pub traditions: Vec<Tradition>,
    pub rarities: Option<BTreeSet<Rarity>>,
    pub exclude_names: Vec<String>,
    pub limit: Option<usize>,
}

impl SpellFilter {
    pub fn matches(&self, spell: &SpellDocument) -> bool {
        if self.rank_min.is_some_and(|min| spell.rank < min) {
            return false;
        }
        if self.rank_max.is_some_and(|max| spell.rank > max) {
            return false;
        }
        if !self.traditions.is_empty() && !self.traditions.iter().any(|t| spell.in_tradition(*t)) {
            return false;
        }
        if let Some(ref rarities) = self.rarities {
            if !rarities.contains(&spell.rarity) {
                return false;
            }
        }
        !self
            .exclude_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&spell.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_feats_by_level() {
        let filter = FeatFilter {
            level_min: Some(2),
            level_max: Some(4),
            ..Default::default()
        };

        assert!(!filter.matches(&FeatDocument::new("f1", "Reach Spell", 1)));
        assert!(filter.matches(&FeatDocument::new("f2", "Cantrip Expansion", 2)));
        assert!(!filter.matches(&FeatDocument::new("f3", "Bespell Strikes", 6)));
    }

    #[test]
    fn filter_feats_by_trait_and_rarity() {
        let filter = FeatFilter {
            traits: vec!["Wizard".into()],
            rarities: Some(BTreeSet::from([Rarity::Common])),
            ..Default::default()
        };

        let common = FeatDocument::new("f1", "Reach Spell", 1).with_traits(["wizard"]);
        let rare = FeatDocument::new("f2", "Spell Secret", 4)
            .with_traits(["wizard"])
            .with_rarity(Rarity::Rare);
        let fighter = FeatDocument::new("f3", "Power Attack", 1).with_traits(["fighter"]);

        assert!(filter.matches(&common));
        assert!(!filter.matches(&rare));
        assert!(!filter.matches(&fighter));
    }

    #[test]
    fn excluded_names_ignore_case() {
        let filter = FeatFilter {
            exclude_names: vec!["toughness".into()],
            ..Default::default()
        };
        assert!(!filter.matches(&FeatDocument::new("f1", "Toughness", 1)));
    }

    #[test]
    fn filter_spells_by_rank_and_tradition() {
        let filter = SpellFilter {
            rank_max: Some(2),
            traditions: vec![Tradition::Divine],
            ..Default::default()
        };

        let heal = SpellDocument::new("s1", "Heal", 1).with_traditions([Tradition::Divine]);
        let barrage = SpellDocument::new("s2", "Force Barrage", 1).with_traditions([Tradition::Arcane]);
        let blessing = SpellDocument::new("s3", "Divine Wrath", 4).with_traditions([Tradition::Divine]);

        assert!(filter.matches(&heal));
        assert!(!filter.matches(&barrage));
        assert!(!filter.matches(&blessing));
    }
}
