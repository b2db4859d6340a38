//! In-memory host store.
//!
//! Backs every host port with process-local maps. Used by the CLI when
//! working from JSON files and by tests that need a host which actually
//! reflects the writes the engine makes.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use levelwright_domain::{
    Ability, ActorId, ActorSnapshot, DocumentRef, ItemId, OwnedFeat, OwnedSpell, ProficiencyRank,
};

use crate::infrastructure::ports::paths::{self, KnownPath};
use crate::infrastructure::ports::{
    ActorRepo, ContentResolver, ContentSource, FlagRepo, ItemKind, NewItem, RepoError,
    SettingsRepo, UpdateMap,
};

type FlagKey = (ActorId, String, String);

#[derive(Default)]
pub struct InMemoryHost {
    actors: RwLock<HashMap<ActorId, ActorSnapshot>>,
    flags: DashMap<FlagKey, Value>,
    settings: DashMap<(String, String), Value>,
    packs: DashMap<String, Vec<Value>>,
    documents: DashMap<DocumentRef, Value>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_actor(&self, actor: ActorSnapshot) {
        self.actors.write().await.insert(actor.id.clone(), actor);
    }

    pub fn set_setting(&self, namespace: &str, key: &str, value: Value) {
        self.settings
            .insert((namespace.to_string(), key.to_string()), value);
    }

    /// Register a compendium pack. Documents carrying a `uuid` also become
    /// resolvable by reference.
    pub fn insert_pack(&self, pack: &str, documents: Vec<Value>) {
        for doc in &documents {
            if let Some(uuid) = doc.get("uuid").and_then(Value::as_str) {
                self.documents.insert(DocumentRef::new(uuid), doc.clone());
            }
        }
        self.packs.insert(pack.to_string(), documents);
    }

    fn apply_actor_change(actor: &mut ActorSnapshot, path: &str, value: &Value) {
        match paths::parse(path) {
            Some(KnownPath::Level) => match value.as_u64().and_then(|v| u8::try_from(v).ok()) {
                Some(level) => actor.level = level,
                None => tracing::warn!(%value, "Ignoring non-numeric level update"),
            },
            Some(KnownPath::SkillRank(skill)) => {
                match value
                    .as_u64()
                    .and_then(|v| u8::try_from(v).ok())
                    .and_then(|v| ProficiencyRank::try_from(v).ok())
                {
                    Some(rank) => {
                        actor.skills.insert(skill, rank);
                    }
                    None => tracing::warn!(%skill, %value, "Ignoring invalid skill rank"),
                }
            }
            Some(KnownPath::Boosts(bucket)) => {
                let boosts: Vec<Ability> = value
                    .as_array()
                    .map(|keys| {
                        keys.iter()
                            .filter_map(Value::as_str)
                            .filter_map(Ability::from_name)
                            .collect()
                    })
                    .unwrap_or_default();
                actor.ability_boosts.insert(bucket, boosts);
            }
            Some(KnownPath::SlotMax(_)) | Some(KnownPath::SlotValue(_)) | None => {
                tracing::debug!(path, "Actor update path not tracked in memory");
            }
        }
    }

    fn apply_item_change(
        actor: &mut ActorSnapshot,
        item: &ItemId,
        path: &str,
        value: &Value,
    ) -> Result<(), RepoError> {
        let entry = actor
            .spellcasting_entries
            .iter_mut()
            .find(|e| &e.id == item)
            .ok_or_else(|| RepoError::not_found("SpellcastingEntry", item))?;
        let count = value
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .unwrap_or(0);
        match paths::parse(path) {
            Some(KnownPath::SlotMax(rank)) => entry.slots.entry(rank).or_default().max = count,
            Some(KnownPath::SlotValue(rank)) => entry.slots.entry(rank).or_default().value = count,
            _ => tracing::debug!(path, "Item update path not tracked in memory"),
        }
        Ok(())
    }
}

#[async_trait]
impl ActorRepo for InMemoryHost {
    async fn get(&self, id: &ActorId) -> Result<Option<ActorSnapshot>, RepoError> {
        Ok(self.actors.read().await.get(id).cloned())
    }

    async fn update(&self, id: &ActorId, changes: UpdateMap) -> Result<(), RepoError> {
        let mut actors = self.actors.write().await;
        let actor = actors
            .get_mut(id)
            .ok_or_else(|| RepoError::not_found("Actor", id))?;
        for (path, value) in &changes {
            Self::apply_actor_change(actor, path, value);
        }
        Ok(())
    }

    async fn update_item(
        &self,
        actor: &ActorId,
        item: &ItemId,
        changes: UpdateMap,
    ) -> Result<(), RepoError> {
        let mut actors = self.actors.write().await;
        let snapshot = actors
            .get_mut(actor)
            .ok_or_else(|| RepoError::not_found("Actor", actor))?;
        for (path, value) in &changes {
            Self::apply_item_change(snapshot, item, path, value)?;
        }
        Ok(())
    }

    async fn create_embedded(
        &self,
        actor: &ActorId,
        items: Vec<NewItem>,
    ) -> Result<Vec<ItemId>, RepoError> {
        let mut actors = self.actors.write().await;
        let snapshot = actors
            .get_mut(actor)
            .ok_or_else(|| RepoError::not_found("Actor", actor))?;

        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let id = ItemId::new(Uuid::new_v4().to_string());
            match item.kind {
                ItemKind::Feat => {
                    let mut feat = OwnedFeat::new(id.clone(), item.name)
                        .with_source(item.source_id)
                        .with_location(item.location);
                    feat.level = item.level;
                    feat.traits = item.traits;
                    snapshot.feats.push(feat);
                }
                ItemKind::Spell => snapshot.spells.push(OwnedSpell {
                    id: id.clone(),
                    name: item.name,
                    source_id: Some(item.source_id),
                    rank: item.level,
                    location: Some(ItemId::new(item.location)),
                }),
            }
            ids.push(id);
        }
        Ok(ids)
    }
}

#[async_trait]
impl FlagRepo for InMemoryHost {
    async fn get_flag(
        &self,
        actor: &ActorId,
        namespace: &str,
        key: &str,
    ) -> Result<Option<Value>, RepoError> {
        let flag_key = (actor.clone(), namespace.to_string(), key.to_string());
        Ok(self.flags.get(&flag_key).map(|v| v.value().clone()))
    }

    async fn set_flag(
        &self,
        actor: &ActorId,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> Result<(), RepoError> {
        self.flags
            .insert((actor.clone(), namespace.to_string(), key.to_string()), value);
        Ok(())
    }

    async fn unset_flag(
        &self,
        actor: &ActorId,
        namespace: &str,
        key: &str,
    ) -> Result<(), RepoError> {
        self.flags
            .remove(&(actor.clone(), namespace.to_string(), key.to_string()));
        Ok(())
    }
}

#[async_trait]
impl SettingsRepo for InMemoryHost {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, RepoError> {
        Ok(self
            .settings
            .get(&(namespace.to_string(), key.to_string()))
            .map(|v| v.value().clone()))
    }
}

#[async_trait]
impl ContentSource for InMemoryHost {
    async fn get_documents(&self, pack: &str) -> Result<Vec<Value>, RepoError> {
        self.packs
            .get(pack)
            .map(|docs| docs.value().clone())
            .ok_or_else(|| RepoError::not_found("ContentPack", pack))
    }
}

#[async_trait]
impl ContentResolver for InMemoryHost {
    async fn resolve(&self, reference: &DocumentRef) -> Result<Option<Value>, RepoError> {
        Ok(self.documents.get(reference).map(|v| v.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelwright_domain::{Skill, SpellcastingEntry};
    use serde_json::json;

    fn actor() -> ActorSnapshot {
        ActorSnapshot::new("a1", "Ezren", 2).with_entry(SpellcastingEntry::new("e1", "Arcane Prepared"))
    }

    #[tokio::test]
    async fn updates_known_actor_paths() {
        let host = InMemoryHost::new();
        host.insert_actor(actor()).await;
        let id = ActorId::new("a1");

        let mut changes = UpdateMap::new();
        changes.insert(paths::LEVEL.to_string(), json!(3));
        changes.insert(paths::skill_rank(Skill::Arcana), json!(2));
        changes.insert(paths::boosts(5), json!(["int", "dex"]));
        ActorRepo::update(&host, &id, changes).await.expect("update should succeed");

        let updated = ActorRepo::get(&host, &id).await.expect("get should succeed").expect("value should be present");
        assert_eq!(updated.level, 3);
        assert_eq!(updated.skill_rank(Skill::Arcana), ProficiencyRank::Expert);
        assert_eq!(updated.ability_boosts[&5], vec![Ability::Int, Ability::Dex]);
    }

    #[tokio::test]
    async fn item_updates_write_entry_slots() {
        let host = InMemoryHost::new();
        host.insert_actor(actor()).await;
        let id = ActorId::new("a1");

        let mut changes = UpdateMap::new();
        changes.insert(paths::slot_max(1), json!(3));
        changes.insert(paths::slot_value(1), json!(3));
        host.update_item(&id, &ItemId::new("e1"), changes).await.expect("update item should succeed");

        let updated = ActorRepo::get(&host, &id).await.expect("get should succeed").expect("value should be present");
        let slot = updated.spellcasting_entries[0].slots[&1];
        assert_eq!((slot.max, slot.value), (3, 3));

        let mut stray = UpdateMap::new();
        stray.insert(paths::slot_max(1), json!(1));
        let missing = host.update_item(&id, &ItemId::new("nope"), stray).await;
        assert!(missing.expect_err("missing should fail").is_not_found());
    }

    #[tokio::test]
    async fn created_items_show_up_in_the_snapshot() {
        let host = InMemoryHost::new();
        host.insert_actor(actor()).await;
        let id = ActorId::new("a1");

        let ids = host
            .create_embedded(
                &id,
                vec![NewItem {
                    kind: ItemKind::Feat,
                    name: "Reach Spell".into(),
                    source_id: DocumentRef::new("feat-reach"),
                    level: 1,
                    location: "class-2".into(),
                    traits: vec!["wizard".into()],
                    data: json!({}),
                }],
            )
            .await
            .expect("create embedded should succeed");

        let updated = ActorRepo::get(&host, &id).await.expect("get should succeed").expect("value should be present");
        assert_eq!(ids.len(), 1);
        assert_eq!(updated.feats[0].id, ids[0]);
        assert_eq!(updated.feats[0].location.as_deref(), Some("class-2"));
    }

    #[tokio::test]
    async fn flags_round_trip_and_unset() {
        let host = InMemoryHost::new();
        let id = ActorId::new("a1");

        host.set_flag(&id, "levelwright", "buildPlan", json!({"version": 1}))
            .await
            .expect("set flag should succeed");
        assert!(host.get_flag(&id, "levelwright", "buildPlan").await.expect("get flag should succeed").is_some());

        host.unset_flag(&id, "levelwright", "buildPlan").await.expect("unset flag should succeed");
        assert!(host.get_flag(&id, "levelwright", "buildPlan").await.expect("get flag should succeed").is_none());
    }

    #[tokio::test]
    async fn packs_are_resolvable_by_uuid() {
        let host = InMemoryHost::new();
        host.insert_pack("pf2e.feats-srd", vec![json!({"uuid": "f1", "name": "Toughness"})]);

        assert_eq!(host.get_documents("pf2e.feats-srd").await.expect("get documents should succeed").len(), 1);
        assert!(host.get_documents("missing").await.expect_err("get documents should fail").is_not_found());
        let doc = host.resolve(&DocumentRef::new("f1")).await.expect("resolve should succeed").expect("value should be present");
        assert_eq!(doc["name"], "Toughness");
    }
}
