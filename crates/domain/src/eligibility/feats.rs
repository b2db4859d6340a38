//! Feat candidate pools for one slot.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::common::slugify;
use crate::entities::{ActorSnapshot, FeatDocument};
use crate::value_objects::{FeatCategory, FeatSortMethod, PlannerConfig};

/// Heritages that also open another ancestry's feat list.
const HERITAGE_ALIASES: [(&str, &str); 4] = [
    ("half-elf", "elf"),
    ("aiuvarin", "elf"),
    ("half-orc", "orc"),
    ("dromaar", "orc"),
];

/// Owned copies per feat, keyed by lowercased name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedFeatIndex(HashMap<String, u32>);

impl OwnedFeatIndex {
    pub fn from_actor(actor: &ActorSnapshot) -> Self {
        Self(actor.feat_counts())
    }

    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts = HashMap::new();
        for name in names {
            *counts.entry(name.trim().to_lowercase()).or_insert(0) += 1;
        }
        Self(counts)
    }

    pub fn count(&self, name: &str) -> u32 {
        self.0
            .get(&name.trim().to_lowercase())
            .copied()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatCandidate {
    pub feat: FeatDocument,
    /// Archetype feat offered in a class slot.
    pub archetype_alternative: bool,
}

/// Trait keys a feat must carry to fill a `category` slot at `level`.
pub fn search_keys(
    actor: &ActorSnapshot,
    category: FeatCategory,
    level: u8,
    config: &PlannerConfig,
) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    match category {
        FeatCategory::Class => keys.extend(actor.class_slug()),
        FeatCategory::DualClass => {
            keys.extend(actor.dual_class.as_ref().map(|c| c.class_slug()));
        }
        FeatCategory::Ancestry | FeatCategory::AncestryParagon => {
            keys.extend(actor.ancestry.as_ref().map(|a| a.ancestry_slug()));
            if let Some(heritage) = actor.heritage.as_ref() {
                let slug = heritage.heritage_slug();
                keys.extend(
                    HERITAGE_ALIASES
                        .iter()
                        .filter(|(from, _)| *from == slug)
                        .map(|(_, to)| to.to_string()),
                );
                keys.extend(heritage.ancestry_slug.as_deref().map(slugify));
                keys.insert(slug);
            }
        }
        FeatCategory::Skill => {
            keys.insert("skill".to_string());
        }
        FeatCategory::General => {
            keys.insert("general".to_string());
        }
        FeatCategory::Archetype => {
            keys.insert("archetype".to_string());
        }
        FeatCategory::Mythic => {
            keys.insert("mythic".to_string());
            if level == config.destiny_level {
                keys.insert("destiny".to_string());
            }
        }
    }
    keys.retain(|k| !k.is_empty());
    keys
}

/// Shared feat filter.
///
/// A feat survives when it matches a query trait (or, for archetype
/// queries, the configured exception list), fits under `max_level`, is
/// not already owned `max_takable` times, and is not a destiny feat away
/// from the destiny level.
pub fn filter_feats<'a>(
    pool: &'a [FeatDocument],
    queries: &BTreeSet<String>,
    max_level: u8,
    existing: &OwnedFeatIndex,
    config: &PlannerConfig,
) -> Vec<&'a FeatDocument> {
    let archetype_query = queries.contains("archetype");
    pool.iter()
        .filter(|feat| {
            let trait_match = feat
                .traits
                .iter()
                .any(|t| queries.contains(&t.trim().to_lowercase()));
            let exception = archetype_query
                && config
                    .archetype_exceptions
                    .iter()
                    .any(|slug| slug.eq_ignore_ascii_case(&feat.slug()));
            trait_match || exception
        })
        .filter(|feat| feat.level <= max_level)
        .filter(|feat| existing.count(&feat.name) < feat.effective_max_takable())
        .filter(|feat| !feat.has_trait("destiny") || max_level == config.destiny_level)
        .collect()
}

fn by_name(a: &FeatDocument, b: &FeatDocument) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

pub fn sort_candidates(candidates: &mut [FeatCandidate], method: FeatSortMethod) {
    candidates.sort_by(|a, b| match method {
        FeatSortMethod::LevelDesc => b
            .feat
            .level
            .cmp(&a.feat.level)
            .then_with(|| by_name(&a.feat, &b.feat)),
        FeatSortMethod::LevelAsc => a
            .feat
            .level
            .cmp(&b.feat.level)
            .then_with(|| by_name(&a.feat, &b.feat)),
        FeatSortMethod::Alphabetical => by_name(&a.feat, &b.feat),
    });
}

/// Candidates for one `category` slot at `level`, sorted per config.
///
/// Class slots also list archetype feats after the class feats, flagged
/// as alternatives and never duplicating a class-feat entry.
pub fn feats_for_level(
    pool: &[FeatDocument],
    actor: &ActorSnapshot,
    category: FeatCategory,
    level: u8,
    config: &PlannerConfig,
) -> Vec<FeatCandidate> {
    let queries = search_keys(actor, category, level, config);
    if queries.is_empty() {
        return Vec::new();
    }
    let existing = OwnedFeatIndex::from_actor(actor);

    let mut primary: Vec<FeatCandidate> = filter_feats(pool, &queries, level, &existing, config)
        .into_iter()
        .map(|feat| FeatCandidate {
            feat: feat.clone(),
            archetype_alternative: false,
        })
        .collect();
    sort_candidates(&mut primary, config.feat_sort);

    if category == FeatCategory::Class {
        let seen: HashSet<String> = primary
            .iter()
            .map(|c| c.feat.uuid.as_str().to_string())
            .collect();
        let archetype = BTreeSet::from(["archetype".to_string()]);
        let mut alternatives: Vec<FeatCandidate> =
            filter_feats(pool, &archetype, level, &existing, config)
                .into_iter()
                .filter(|feat| !seen.contains(feat.uuid.as_str()))
                .map(|feat| FeatCandidate {
                    feat: feat.clone(),
                    archetype_alternative: true,
                })
                .collect();
        sort_candidates(&mut alternatives, config.feat_sort);
        primary.extend(alternatives);
    }
    primary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AncestryDocument, ClassDocument, HeritageDocument, OwnedFeat};
    use crate::value_objects::MythicSetting;

    fn wizard(level: u8) -> ActorSnapshot {
        ActorSnapshot::new("a1", "Ezren", level).with_class(ClassDocument::new("Wizard"))
    }

    fn names(candidates: &[FeatCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.feat.name.as_str()).collect()
    }

    #[test]
    fn test_owned_feat_excluded_at_default_max_takable() {
        let pool = vec![
            FeatDocument::new("f1", "Toughness", 1).with_traits(["general"]),
            FeatDocument::new("f2", "Additional Lore", 1)
                .with_traits(["general", "skill"])
                .with_max_takable(3),
        ];
        let actor = wizard(3)
            .with_feat(OwnedFeat::new("i1", "Toughness"))
            .with_feat(OwnedFeat::new("i2", "Additional Lore"));
        let candidates =
            feats_for_level(&pool, &actor, FeatCategory::General, 3, &PlannerConfig::default());
        assert_eq!(names(&candidates), vec!["Additional Lore"]);
    }

    #[test]
    fn test_level_cap_and_trait_match() {
        let pool = vec![
            FeatDocument::new("f1", "Reach Spell", 1).with_traits(["wizard", "metamagic"]),
            FeatDocument::new("f2", "Spell Penetration", 6).with_traits(["wizard"]),
            FeatDocument::new("f3", "Power Attack", 1).with_traits(["fighter"]),
        ];
        let candidates =
            feats_for_level(&pool, &wizard(4), FeatCategory::Class, 4, &PlannerConfig::default());
        assert_eq!(names(&candidates), vec!["Reach Spell"]);
    }

    #[test]
    fn test_class_slot_appends_archetype_alternatives() {
        let pool = vec![
            FeatDocument::new("f1", "Reach Spell", 1).with_traits(["wizard"]),
            FeatDocument::new("f2", "Fighter Dedication", 2).with_traits(["archetype", "dedication"]),
            FeatDocument::new("f3", "Wizard Dedication", 2).with_traits(["archetype", "wizard"]),
        ];
        let candidates =
            feats_for_level(&pool, &wizard(2), FeatCategory::Class, 2, &PlannerConfig::default());
        assert_eq!(
            names(&candidates),
            vec!["Wizard Dedication", "Reach Spell", "Fighter Dedication"]
        );
        assert!(!candidates[0].archetype_alternative);
        assert!(candidates[2].archetype_alternative);
    }

    #[test]
    fn test_archetype_exception_list() {
        let pool = vec![FeatDocument::new("f1", "Basic Lesson", 2).with_traits(["witch"])];
        let config = PlannerConfig::default().with_archetype_exceptions(vec!["basic-lesson".into()]);
        let candidates = feats_for_level(&pool, &wizard(2), FeatCategory::Archetype, 2, &config);
        assert_eq!(names(&candidates), vec!["Basic Lesson"]);

        let without = feats_for_level(&pool, &wizard(2), FeatCategory::Archetype, 2, &PlannerConfig::default());
        assert!(without.is_empty());
    }

    #[test]
    fn test_destiny_feats_only_at_destiny_level() {
        let pool = vec![
            FeatDocument::new("f1", "Mythic Resilience", 2).with_traits(["mythic"]),
            FeatDocument::new("f2", "Destined Victory", 12).with_traits(["mythic", "destiny"]),
        ];
        let config = PlannerConfig::new(crate::value_objects::VariantRules {
            mythic: MythicSetting::Enabled,
            ..Default::default()
        });
        let at_destiny = feats_for_level(&pool, &wizard(12), FeatCategory::Mythic, 12, &config);
        assert_eq!(names(&at_destiny), vec!["Destined Victory", "Mythic Resilience"]);

        let later = feats_for_level(&pool, &wizard(14), FeatCategory::Mythic, 14, &config);
        assert_eq!(names(&later), vec!["Mythic Resilience"]);
    }

    #[test]
    fn test_heritage_aliases() {
        let mut actor = wizard(1);
        actor.ancestry = Some(AncestryDocument::new("Human"));
        actor.heritage = Some(HeritageDocument::new("Half-Elf"));
        let keys = search_keys(&actor, FeatCategory::Ancestry, 1, &PlannerConfig::default());
        assert!(keys.contains("human"));
        assert!(keys.contains("half-elf"));
        assert!(keys.contains("elf"));
    }

    #[test]
    fn test_sort_methods() {
        let mut candidates: Vec<FeatCandidate> = [("b", 1), ("a", 1), ("c", 4)]
            .into_iter()
            .map(|(name, level)| FeatCandidate {
                feat: FeatDocument::new(name, name, level),
                archetype_alternative: false,
            })
            .collect();

        sort_candidates(&mut candidates, FeatSortMethod::LevelDesc);
        assert_eq!(names(&candidates), vec!["c", "a", "b"]);
        sort_candidates(&mut candidates, FeatSortMethod::LevelAsc);
        assert_eq!(names(&candidates), vec!["a", "b", "c"]);
        sort_candidates(&mut candidates, FeatSortMethod::Alphabetical);
        assert_eq!(names(&candidates), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_classless_actor_gets_nothing_for_class_slots() {
        let pool = vec![FeatDocument::new("f1", "Reach Spell", 1).with_traits(["wizard"])];
        let actor = ActorSnapshot::new("a1", "Nobody", 1);
        assert!(feats_for_level(&pool, &actor, FeatCategory::Class, 1, &PlannerConfig::default()).is_empty());
    }
}
