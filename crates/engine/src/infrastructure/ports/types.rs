//! Helper types for port operations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use levelwright_domain::{Ability, DocumentRef, Skill};

/// Dotted-path changes for a host document, e.g.
/// `{"system.details.level.value": 5}`.
pub type UpdateMap = BTreeMap<String, Value>;

// =============================================================================
// Host Document Paths
// =============================================================================

/// Dotted paths the engine writes on actors and their embedded items.
pub mod paths {
    use super::*;

    pub const LEVEL: &str = "system.details.level.value";
    /// Slot tag on feat items.
    pub const LOCATION: &str = "system.location";
    /// Owning spellcasting entry on spell items.
    pub const SPELL_LOCATION: &str = "system.location.value";

    const SKILL_PREFIX: &str = "system.skills.";
    const BOOST_PREFIX: &str = "system.build.attributes.boosts.";
    const SLOT_PREFIX: &str = "system.slots.slot";

    pub fn skill_rank(skill: Skill) -> String {
        format!("{SKILL_PREFIX}{}.rank", skill.host_code())
    }

    pub fn boosts(bucket: u8) -> String {
        format!("{BOOST_PREFIX}{bucket}")
    }

    pub fn slot_max(rank: u8) -> String {
        format!("{SLOT_PREFIX}{rank}.max")
    }

    pub fn slot_value(rank: u8) -> String {
        format!("{SLOT_PREFIX}{rank}.value")
    }

    /// Parsed form of a path the engine knows how to write.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum KnownPath {
        Level,
        SkillRank(Skill),
        Boosts(u8),
        SlotMax(u8),
        SlotValue(u8),
    }

    pub fn parse(path: &str) -> Option<KnownPath> {
        if path == LEVEL {
            return Some(KnownPath::Level);
        }
        if let Some(rest) = path.strip_prefix(SKILL_PREFIX) {
            let code = rest.strip_suffix(".rank")?;
            return Skill::from_name(code).map(KnownPath::SkillRank);
        }
        if let Some(bucket) = path.strip_prefix(BOOST_PREFIX) {
            return bucket.parse().ok().map(KnownPath::Boosts);
        }
        if let Some(rest) = path.strip_prefix(SLOT_PREFIX) {
            if let Some(rank) = rest.strip_suffix(".max") {
                return rank.parse().ok().map(KnownPath::SlotMax);
            }
            if let Some(rank) = rest.strip_suffix(".value") {
                return rank.parse().ok().map(KnownPath::SlotValue);
            }
        }
        None
    }

    /// Write `leaf` at a dotted path inside a document, creating
    /// intermediate objects and replacing non-object values on the way.
    pub fn set(document: &mut Value, path: &str, leaf: Value) {
        let parts: Vec<&str> = path.split('.').collect();
        set_parts(document, &parts, leaf);
    }

    fn set_parts(value: &mut Value, parts: &[&str], leaf: Value) {
        if !value.is_object() {
            *value = Value::Object(serde_json::Map::new());
        }
        let Value::Object(map) = value else {
            return;
        };
        match parts {
            [] => {}
            [last] => {
                map.insert((*last).to_string(), leaf);
            }
            [head, rest @ ..] => {
                let child = map.entry((*head).to_string()).or_insert(Value::Null);
                set_parts(child, rest, leaf);
            }
        }
    }

    /// Ability keys as the host stores them inside a boost bucket.
    pub fn boost_keys(boosts: &[Ability]) -> Value {
        Value::Array(
            boosts
                .iter()
                .map(|a| Value::String(a.key().to_string()))
                .collect(),
        )
    }
}

// =============================================================================
// Embedded Item Creation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Feat,
    Spell,
}

/// An embedded item cloned from a compendium document, ready to create on
/// an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub kind: ItemKind,
    pub name: String,
    pub source_id: DocumentRef,
    /// Feat level or spell rank.
    pub level: u8,
    /// Feat slot tag (`class-4`) or spellcasting entry id.
    pub location: String,
    pub traits: Vec<String>,
    /// Cloned document payload with the location written in.
    pub data: Value,
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// One user-facing message emitted while applying a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::paths::*;
    use super::*;

    #[test]
    fn written_paths_parse_back() {
        assert_eq!(parse(LEVEL), Some(KnownPath::Level));
        assert_eq!(
            parse(&skill_rank(Skill::Arcana)),
            Some(KnownPath::SkillRank(Skill::Arcana))
        );
        assert_eq!(parse(&boosts(10)), Some(KnownPath::Boosts(10)));
        assert_eq!(parse(&slot_max(3)), Some(KnownPath::SlotMax(3)));
        assert_eq!(parse(&slot_value(9)), Some(KnownPath::SlotValue(9)));
        assert_eq!(parse("system.details.biography"), None);
    }

    #[test]
    fn set_creates_nested_objects() {
        let mut doc = serde_json::json!({"name": "Heal", "system": {"location": "stale"}});
        set(&mut doc, SPELL_LOCATION, Value::String("entry-1".into()));
        assert_eq!(doc["system"]["location"]["value"], "entry-1");
        assert_eq!(doc["name"], "Heal");

        let mut empty = Value::Null;
        set(&mut empty, LOCATION, Value::String("class-2".into()));
        assert_eq!(empty, serde_json::json!({"system": {"location": "class-2"}}));
    }

    #[test]
    fn boost_keys_use_short_ability_names() {
        assert_eq!(
            boost_keys(&[Ability::Str, Ability::Int]),
            serde_json::json!(["str", "int"])
        );
    }
}
