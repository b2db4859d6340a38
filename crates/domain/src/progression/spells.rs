//! Spells a character must learn when reaching a level.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::ActorSnapshot;
use crate::progression::tables::{new_slots_at_level, LearningRule, SpellcastingProfile};

/// Spells a prepared caster adds to their book each level.
pub const PREPARED_SPELLS_PER_LEVEL: u32 = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellObligation {
    pub total_spells: u32,
    pub by_rank: BTreeMap<u8, u32>,
    pub highest_rank: Option<u8>,
    pub learning_rule: Option<LearningRule>,
}

impl SpellObligation {
    pub fn is_empty(&self) -> bool {
        self.total_spells == 0
    }
}

/// How many spells of which rank the actor learns at `level`.
///
/// Auto learners owe nothing; they receive their tradition's list when the
/// level is applied. A class with no registered progression owes nothing
/// either.
pub fn spells_to_learn_at_level(actor: &ActorSnapshot, level: u8) -> SpellObligation {
    let Some(slug) = actor.class_slug() else {
        return SpellObligation::default();
    };
    let Some(profile) = SpellcastingProfile::lookup(&slug) else {
        if actor.spellcasting_entries.iter().any(|e| !e.is_focus()) {
            tracing::warn!(
                class = %slug,
                level,
                "No spell progression registered for class; spell choices skipped"
            );
        } else {
            tracing::debug!(class = %slug, "Class has no spell progression");
        }
        return SpellObligation::default();
    };

    match profile.learning_rule {
        LearningRule::Auto => SpellObligation {
            learning_rule: Some(LearningRule::Auto),
            ..SpellObligation::default()
        },
        LearningRule::Prepared => match profile.highest_rank(level) {
            Some(rank) => SpellObligation {
                total_spells: PREPARED_SPELLS_PER_LEVEL,
                by_rank: BTreeMap::from([(rank, PREPARED_SPELLS_PER_LEVEL)]),
                highest_rank: Some(rank),
                learning_rule: Some(LearningRule::Prepared),
            },
            None => SpellObligation {
                learning_rule: Some(LearningRule::Prepared),
                ..SpellObligation::default()
            },
        },
        LearningRule::Spontaneous => {
            let by_rank: BTreeMap<u8, u32> = new_slots_at_level(&slug, level)
                .into_iter()
                .map(|(rank, count)| (rank, u32::from(count)))
                .collect();
            SpellObligation {
                total_spells: by_rank.values().sum(),
                by_rank,
                highest_rank: profile.highest_rank(level),
                learning_rule: Some(LearningRule::Spontaneous),
            }
        }
    }
}
