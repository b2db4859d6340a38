//! Candidate pools for one level, fed from the content cache.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use levelwright_domain::{
    check_prerequisites, feats_for_level, requirements_for_level, spells_for_rank, ActorSnapshot,
    FeatCandidate, FeatCategory, LevelRequirements, PlannerConfig, PrerequisiteCheck,
    SpellDocument, SpellFilterOptions,
};

use crate::use_cases::content::ContentCache;

/// A feat candidate together with how the actor fares on its
/// prerequisites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedCandidate {
    #[serde(flatten)]
    pub candidate: FeatCandidate,
    pub prerequisites: PrerequisiteCheck,
}

/// Requirements and candidate pools for one level, in one bundle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelOptions {
    pub requirements: LevelRequirements,
    pub feats: BTreeMap<FeatCategory, Vec<CheckedCandidate>>,
    /// Learnable spells for each rank the level asks a choice for.
    pub spells: BTreeMap<u8, Vec<SpellDocument>>,
}

pub struct Eligibility {
    content: Arc<ContentCache>,
}

impl Eligibility {
    pub fn new(content: Arc<ContentCache>) -> Self {
        Self { content }
    }

    pub async fn feats_for_level(
        &self,
        actor: &ActorSnapshot,
        category: FeatCategory,
        level: u8,
        config: &PlannerConfig,
    ) -> Vec<FeatCandidate> {
        let pool = self.content.all_feats().await;
        feats_for_level(&pool, actor, category, level, config)
    }

    pub async fn checked_feats_for_level(
        &self,
        actor: &ActorSnapshot,
        category: FeatCategory,
        level: u8,
        config: &PlannerConfig,
    ) -> Vec<CheckedCandidate> {
        self.feats_for_level(actor, category, level, config)
            .await
            .into_iter()
            .map(|candidate| CheckedCandidate {
                prerequisites: check_prerequisites(actor, &candidate.feat),
                candidate,
            })
            .collect()
    }

    pub async fn spells_for_rank(
        &self,
        actor: &ActorSnapshot,
        rank: u8,
        options: &SpellFilterOptions,
    ) -> Vec<SpellDocument> {
        let pool = self.content.all_spells().await;
        spells_for_rank(&pool, actor, rank, options)
    }

    pub async fn level_options(
        &self,
        actor: &ActorSnapshot,
        level: u8,
        config: &PlannerConfig,
    ) -> LevelOptions {
        let requirements = requirements_for_level(actor, level, config);

        let mut feats = BTreeMap::new();
        for category in requirements.feat_slots.categories() {
            let candidates = self
                .checked_feats_for_level(actor, category, level, config)
                .await;
            feats.insert(category, candidates);
        }

        let options = SpellFilterOptions::from_config(config);
        let mut spells = BTreeMap::new();
        for rank in requirements.spells.by_rank.keys() {
            spells.insert(*rank, self.spells_for_rank(actor, *rank, &options).await);
        }

        tracing::debug!(
            actor = %actor.id,
            level,
            categories = feats.len(),
            spell_ranks = spells.len(),
            "Computed level options"
        );
        LevelOptions {
            requirements,
            feats,
            spells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryHost;
    use crate::use_cases::content::ContentPacks;
    use levelwright_domain::{ClassDocument, OwnedFeat, SpellcastingEntry};
    use serde_json::json;

    fn cache() -> Arc<ContentCache> {
        let host = Arc::new(InMemoryHost::new());
        host.insert_pack(
            "pf2e.feats-srd",
            vec![
                json!({"uuid": "f1", "name": "Reach Spell", "level": 1, "traits": ["wizard"]}),
                json!({"uuid": "f2", "name": "Widen Spell", "level": 1, "traits": ["wizard"]}),
                json!({"uuid": "f3", "name": "Split Slot", "level": 8, "traits": ["wizard"],
                       "prerequisites": ["trained in Arcana"]}),
                json!({"uuid": "f4", "name": "Assurance", "level": 1, "traits": ["general", "skill"],
                       "maxTakable": 99}),
            ],
        );
        host.insert_pack(
            "pf2e.spells-srd",
            vec![
                json!({"uuid": "s1", "name": "Force Barrage", "rank": 1, "traditions": ["arcane"]}),
                json!({"uuid": "s2", "name": "Mirror Image", "rank": 2, "traditions": ["arcane"]}),
                json!({"uuid": "s3", "name": "Heal", "rank": 1, "traditions": ["divine"]}),
            ],
        );
        Arc::new(ContentCache::new(host.clone(), host, ContentPacks::default()))
    }

    fn wizard(level: u8) -> ActorSnapshot {
        ActorSnapshot::new("a1", "Ezren", level)
            .with_class(ClassDocument::new("Wizard").with_standard_progression())
            .with_entry(SpellcastingEntry::new("e1", "Wizard Spellcasting"))
            .with_feat(OwnedFeat::new("i1", "Reach Spell").with_location("class-1"))
    }

    #[tokio::test]
    async fn class_pool_excludes_owned_and_high_level_feats() {
        let eligibility = Eligibility::new(cache());
        let feats = eligibility
            .feats_for_level(&wizard(2), FeatCategory::Class, 2, &PlannerConfig::default())
            .await;

        let names: Vec<_> = feats.iter().map(|c| c.feat.name.as_str()).collect();
        assert_eq!(names, vec!["Widen Spell"]);
    }

    #[tokio::test]
    async fn level_options_bundle_requirements_and_pools() {
        let eligibility = Eligibility::new(cache());
        let options = eligibility
            .level_options(&wizard(3), 3, &PlannerConfig::default())
            .await;

        assert_eq!(options.requirements.level, 3);
        assert!(options.feats.contains_key(&FeatCategory::General));
        let general = &options.feats[&FeatCategory::General];
        assert_eq!(general[0].candidate.feat.name, "Assurance");
        assert_eq!(general[0].prerequisites.meets, Some(true));

        let rank_two: Vec<_> = options.spells[&2].iter().map(|s| s.name.as_str()).collect();
        assert_eq!(rank_two, vec!["Mirror Image"]);
    }

    #[tokio::test]
    async fn spells_follow_actor_tradition() {
        let eligibility = Eligibility::new(cache());
        let spells = eligibility
            .spells_for_rank(&wizard(1), 1, &SpellFilterOptions::default())
            .await;

        assert_eq!(spells.len(), 1);
        assert_eq!(spells[0].name, "Force Barrage");
    }
}
