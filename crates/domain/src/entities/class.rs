//! Class and dual-class documents.

use serde::{Deserialize, Serialize};

use crate::common::slugify;
use crate::ids::DocumentRef;
use crate::value_objects::{Ability, FeatCategory};

/// A class item with its level-indexed progression arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassDocument {
    pub uuid: Option<DocumentRef>,
    pub name: String,
    pub slug: Option<String>,
    pub key_ability: Vec<Ability>,
    pub class_feat_levels: Vec<u8>,
    pub ancestry_feat_levels: Vec<u8>,
    pub skill_feat_levels: Vec<u8>,
    pub general_feat_levels: Vec<u8>,
    pub skill_increase_levels: Vec<u8>,
}

impl ClassDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Standard PF2e feat and increase cadence shared by most classes.
    pub fn with_standard_progression(mut self) -> Self {
        self.class_feat_levels = (1..=20).filter(|l| *l == 1 || l % 2 == 0).collect();
        self.ancestry_feat_levels = vec![1, 5, 9, 13, 17];
        self.skill_feat_levels = (2..=20).step_by(2).collect();
        self.general_feat_levels = vec![3, 7, 11, 15, 19];
        self.skill_increase_levels = (3..=19).step_by(2).collect();
        self
    }

    /// Lowercase-hyphenated slug from the canonical slug, else the name.
    pub fn class_slug(&self) -> String {
        match self.slug.as_deref() {
            Some(slug) if !slug.trim().is_empty() => slugify(slug),
            _ => slugify(&self.name),
        }
    }

    /// Levels at which this class grants a feat of `category`, if the class
    /// item tracks that category at all.
    pub fn feat_levels(&self, category: FeatCategory) -> &[u8] {
        match category {
            FeatCategory::Class => &self.class_feat_levels,
            FeatCategory::Ancestry => &self.ancestry_feat_levels,
            FeatCategory::Skill => &self.skill_feat_levels,
            FeatCategory::General => &self.general_feat_levels,
            FeatCategory::Archetype
            | FeatCategory::Mythic
            | FeatCategory::AncestryParagon
            | FeatCategory::DualClass => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_slug_prefers_slug() {
        let mut class = ClassDocument::new("Wizard");
        assert_eq!(class.class_slug(), "wizard");
        class.slug = Some("Thaumaturge".into());
        assert_eq!(class.class_slug(), "thaumaturge");
    }

    #[test]
    fn test_standard_progression() {
        let class = ClassDocument::new("Fighter").with_standard_progression();
        assert_eq!(&class.class_feat_levels[..3], &[1, 2, 4]);
        assert_eq!(class.skill_increase_levels.first(), Some(&3));
        assert_eq!(class.skill_increase_levels.last(), Some(&19));
        assert!(class.feat_levels(FeatCategory::Archetype).is_empty());
    }
}
