//! Which spell list an actor draws from.

use crate::common::{contains_word, eq_ignore_case};
use crate::entities::{ActorSnapshot, SpellcastingEntry};
use crate::value_objects::Tradition;

/// Used when nothing on the actor names a tradition.
pub const DEFAULT_TRADITION: Tradition = Tradition::Arcane;

const CLASS_TRADITIONS: [(&str, Tradition); 11] = [
    ("wizard", Tradition::Arcane),
    ("magus", Tradition::Arcane),
    ("summoner", Tradition::Arcane),
    ("sorcerer", Tradition::Arcane),
    ("cleric", Tradition::Divine),
    ("oracle", Tradition::Divine),
    ("animist", Tradition::Divine),
    ("champion", Tradition::Divine),
    ("druid", Tradition::Primal),
    ("bard", Tradition::Occult),
    ("psychic", Tradition::Occult),
];

/// Witches without a recorded patron tradition fall back to this.
const WITCH_DEFAULT: Tradition = Tradition::Occult;

const BLOODLINE_KEYWORDS: [(&str, Tradition); 16] = [
    ("draconic", Tradition::Arcane),
    ("imperial", Tradition::Arcane),
    ("genie", Tradition::Arcane),
    ("angelic", Tradition::Divine),
    ("demonic", Tradition::Divine),
    ("diabolic", Tradition::Divine),
    ("undead", Tradition::Divine),
    ("psychopomp", Tradition::Divine),
    ("wyrmblessed", Tradition::Divine),
    ("elemental", Tradition::Primal),
    ("fey", Tradition::Primal),
    ("nymph", Tradition::Primal),
    ("phoenix", Tradition::Primal),
    ("aberrant", Tradition::Occult),
    ("hag", Tradition::Occult),
    ("shadow", Tradition::Occult),
];

pub fn static_class_tradition(slug: &str) -> Option<Tradition> {
    CLASS_TRADITIONS
        .iter()
        .find(|(class, _)| *class == slug)
        .map(|(_, tradition)| *tradition)
}

/// The class's spellcasting entry, searched from most to least specific.
pub fn find_class_entry(actor: &ActorSnapshot) -> Option<&SpellcastingEntry> {
    let entries = &actor.spellcasting_entries;
    let class_name = actor
        .class
        .as_ref()
        .map(|c| c.name.trim().to_lowercase())
        .filter(|n| !n.is_empty());

    if let Some(class_name) = class_name.as_deref() {
        let exact = [
            format!("{class_name} spellcasting"),
            format!("{class_name} spells"),
        ];
        for wanted in &exact {
            if let Some(entry) = entries.iter().find(|e| eq_ignore_case(&e.name, wanted)) {
                return Some(entry);
            }
        }
        if let Some(entry) = entries
            .iter()
            .find(|e| !e.is_focus() && e.name.trim().to_lowercase().starts_with(class_name))
        {
            return Some(entry);
        }
    }

    entries
        .iter()
        .find(|e| e.category.as_deref().is_some_and(|c| c.eq_ignore_ascii_case("class")))
        .or_else(|| {
            entries.iter().find(|e| {
                !e.is_focus()
                    && (contains_word(&e.name, "spells") || contains_word(&e.name, "spellcasting"))
            })
        })
        .or_else(|| entries.first())
}

/// Sorcerer bloodline tradition, from the bloodline feat.
pub fn bloodline_tradition(actor: &ActorSnapshot) -> Option<Tradition> {
    actor
        .feats
        .iter()
        .filter(|f| contains_word(&f.name, "bloodline"))
        .find_map(|f| {
            f.tradition.or_else(|| {
                BLOODLINE_KEYWORDS
                    .iter()
                    .find(|(keyword, _)| contains_word(&f.name, keyword))
                    .map(|(_, tradition)| *tradition)
            })
        })
}

/// Witch patron tradition, as recorded on the patron feat.
pub fn patron_tradition(actor: &ActorSnapshot) -> Option<Tradition> {
    actor
        .feats
        .iter()
        .filter(|f| f.has_trait("patron") || contains_word(&f.name, "patron"))
        .find_map(|f| f.tradition)
}

pub fn spell_tradition(actor: &ActorSnapshot) -> Tradition {
    if let Some(tradition) = find_class_entry(actor).and_then(|e| e.tradition) {
        return tradition;
    }

    let slug = actor.class_slug().unwrap_or_default();
    let from_class = match slug.as_str() {
        "sorcerer" => bloodline_tradition(actor).or_else(|| static_class_tradition(&slug)),
        "witch" => Some(patron_tradition(actor).unwrap_or(WITCH_DEFAULT)),
        other => static_class_tradition(other),
    };
    from_class.unwrap_or(DEFAULT_TRADITION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ClassDocument, OwnedFeat};

    fn actor(class: &str) -> ActorSnapshot {
        ActorSnapshot::new("a1", "Test", 5).with_class(ClassDocument::new(class))
    }

    fn entry(id: &str, name: &str, tradition: Option<Tradition>) -> SpellcastingEntry {
        let mut e = SpellcastingEntry::new(id, name);
        e.tradition = tradition;
        e
    }

    #[test]
    fn test_sorcerer_bloodline_keyword() {
        let draconic = actor("Sorcerer").with_feat(OwnedFeat::new("f1", "Draconic Bloodline"));
        assert_eq!(spell_tradition(&draconic), Tradition::Arcane);

        let angelic = actor("Sorcerer").with_feat(OwnedFeat::new("f1", "Bloodline: Angelic"));
        assert_eq!(spell_tradition(&angelic), Tradition::Divine);

        let shadow = actor("Sorcerer").with_feat(OwnedFeat::new("f1", "Shadow Bloodline"));
        assert_eq!(spell_tradition(&shadow), Tradition::Occult);
    }

    #[test]
    fn test_witch_patron_tradition() {
        let patron = OwnedFeat::new("f1", "Patron of Wild").with_tradition(Tradition::Primal);
        assert_eq!(spell_tradition(&actor("Witch").with_feat(patron)), Tradition::Primal);
        assert_eq!(spell_tradition(&actor("Witch")), Tradition::Occult);
    }

    #[test]
    fn test_entry_tradition_wins() {
        let cleric = actor("Cleric").with_entry(entry("e1", "Cleric Spellcasting", Some(Tradition::Primal)));
        assert_eq!(spell_tradition(&cleric), Tradition::Primal);
    }

    #[test]
    fn test_entry_cascade_order() {
        let wizard = actor("Wizard")
            .with_entry(entry("focus", "Wizard Focus Spells", None))
            .with_entry(entry("innate", "Innate Spells", None))
            .with_entry(entry("main", "Wizard Spells", None));
        assert_eq!(find_class_entry(&wizard).map(|e| e.id.as_str()), Some("main"));

        let prefixed = actor("Wizard")
            .with_entry(entry("focus", "Wizard Focus Spells", None))
            .with_entry(entry("main", "Wizard Arcane Prepared", None));
        assert_eq!(find_class_entry(&prefixed).map(|e| e.id.as_str()), Some("main"));

        let generic = actor("Fighter")
            .with_entry(entry("focus", "Focus Spells", None))
            .with_entry(entry("arch", "Arcane Spellcasting", None));
        assert_eq!(find_class_entry(&generic).map(|e| e.id.as_str()), Some("arch"));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(spell_tradition(&actor("Druid")), Tradition::Primal);
        assert_eq!(spell_tradition(&actor("Fighter")), DEFAULT_TRADITION);
        assert_eq!(spell_tradition(&ActorSnapshot::new("a", "b", 1)), DEFAULT_TRADITION);
    }
}
