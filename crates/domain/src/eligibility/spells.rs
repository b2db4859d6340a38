//! Learnable spell pools.

use crate::entities::{ActorSnapshot, SpellDocument};
use crate::progression::spell_tradition;
use crate::value_objects::{PlannerConfig, Tradition};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpellFilterOptions {
    pub include_uncommon: bool,
    /// Overrides the tradition resolved from the actor.
    pub tradition: Option<Tradition>,
}

impl SpellFilterOptions {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            include_uncommon: config.include_uncommon_spells,
            tradition: None,
        }
    }
}

/// Spells of exactly `rank` (0 for cantrips) in the actor's tradition that
/// the actor does not already know, sorted by name.
pub fn spells_for_rank(
    pool: &[SpellDocument],
    actor: &ActorSnapshot,
    rank: u8,
    options: &SpellFilterOptions,
) -> Vec<SpellDocument> {
    let tradition = options.tradition.unwrap_or_else(|| spell_tradition(actor));
    let mut spells: Vec<SpellDocument> = pool
        .iter()
        .filter(|spell| {
            if rank == 0 {
                spell.is_cantrip()
            } else {
                !spell.is_cantrip() && spell.rank == rank
            }
        })
        .filter(|spell| !spell.is_focus())
        .filter(|spell| spell.in_tradition(tradition))
        .filter(|spell| spell.rarity.is_offered(options.include_uncommon))
        .filter(|spell| !actor.knows_spell_named(&spell.name))
        .cloned()
        .collect();
    spells.sort_by_key(|s| s.name.to_lowercase());
    spells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ClassDocument, OwnedSpell};
    use crate::ids::ItemId;
    use crate::value_objects::Rarity;

    fn pool() -> Vec<SpellDocument> {
        vec![
            SpellDocument::new("s1", "Force Barrage", 1).with_traditions([Tradition::Arcane, Tradition::Occult]),
            SpellDocument::new("s2", "Heal", 1).with_traditions([Tradition::Divine, Tradition::Primal]),
            SpellDocument::new("s3", "Fireball", 3).with_traditions([Tradition::Arcane, Tradition::Primal]),
            SpellDocument::new("s4", "Detect Magic", 1)
                .with_traits(["cantrip"])
                .with_traditions(Tradition::ALL),
            SpellDocument::new("s5", "Animate Dead", 1)
                .with_traditions([Tradition::Arcane])
                .with_rarity(Rarity::Uncommon),
            SpellDocument::new("s6", "Breathe Fire", 1).with_traditions([Tradition::Arcane]),
        ]
    }

    fn wizard() -> ActorSnapshot {
        ActorSnapshot::new("a1", "Ezren", 3).with_class(ClassDocument::new("Wizard"))
    }

    #[test]
    fn test_filters_rank_tradition_and_rarity() {
        let spells = spells_for_rank(&pool(), &wizard(), 1, &SpellFilterOptions::default());
        let names: Vec<_> = spells.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Breathe Fire", "Force Barrage"]);

        let options = SpellFilterOptions {
            include_uncommon: true,
            tradition: None,
        };
        assert_eq!(spells_for_rank(&pool(), &wizard(), 1, &options).len(), 3);
    }

    #[test]
    fn test_known_spells_are_excluded() {
        let mut actor = wizard();
        actor.spells.push(OwnedSpell {
            id: ItemId::new("i1"),
            name: "force barrage".into(),
            source_id: None,
            rank: 1,
            location: None,
        });
        let spells = spells_for_rank(&pool(), &actor, 1, &SpellFilterOptions::default());
        assert_eq!(spells.len(), 1);
        assert_eq!(spells[0].name, "Breathe Fire");
    }

    #[test]
    fn test_cantrips_and_override() {
        let cantrips = spells_for_rank(&pool(), &wizard(), 0, &SpellFilterOptions::default());
        assert_eq!(cantrips.len(), 1);

        let divine = SpellFilterOptions {
            include_uncommon: false,
            tradition: Some(Tradition::Divine),
        };
        let spells = spells_for_rank(&pool(), &wizard(), 1, &divine);
        assert_eq!(spells.len(), 1);
        assert_eq!(spells[0].name, "Heal");
    }
}
