//! Writes one planned level onto the actor.
//!
//! Steps run in order and each reports its own progress. The first failing
//! step stops the run; earlier writes stay in place. Re-applying a level
//! creates nothing new: feats and spells are matched against what the actor
//! already owns, boosts merge as a set, and slots are recomputed. Skill
//! increases are recorded on the plan and saved as soon as they reach the
//! actor, so a retry after a later failure does not raise them twice.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use levelwright_domain::common::eq_ignore_case;
use levelwright_domain::progression::{boost_bucket_for_level, find_class_entry};
use levelwright_domain::{
    lost_slots_at_level, secondary_slots_at_level, slots_at_level, spells_for_rank, Ability,
    ActorId, ActorSnapshot, BuildPlan, DocumentRef, DomainError, FeatCategory, FeatDocument,
    ItemId, LearningRule, LevelChoices, Skill, SlotMap, SpellDocument, SpellFilterOptions,
    SpellList, SpellcastingEntry, SpellcastingProfile,
};

use super::error::{ApplyError, ApplyStep};
use crate::entities::PlanStore;
use crate::infrastructure::ports::{
    paths, ActorRepo, ItemKind, NewItem, Notice, NotifierPort, UpdateMap,
};
use crate::use_cases::content::ContentCache;

const MAX_SPELL_RANK: u8 = 10;

/// What one apply run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub level: u8,
    pub level_raised: bool,
    pub feats_created: Vec<String>,
    /// Planned feats the actor already had.
    pub feats_skipped: Vec<String>,
    pub skills_increased: Vec<Skill>,
    pub boosts_recorded: Vec<Ability>,
    pub spells_created: Vec<String>,
    pub spells_skipped: Vec<String>,
    pub slots_updated: bool,
    pub auto_spells_created: usize,
    /// Planned references the content resolver could not produce.
    pub unresolved: Vec<DocumentRef>,
}

impl ApplyReport {
    pub fn items_created(&self) -> usize {
        self.feats_created.len() + self.spells_created.len() + self.auto_spells_created
    }
}

pub struct ApplyLevel {
    actors: Arc<dyn ActorRepo>,
    content: Arc<ContentCache>,
    store: Arc<PlanStore>,
    notifier: Arc<dyn NotifierPort>,
}

impl ApplyLevel {
    pub fn new(
        actors: Arc<dyn ActorRepo>,
        content: Arc<ContentCache>,
        store: Arc<PlanStore>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        Self {
            actors,
            content,
            store,
            notifier,
        }
    }

    /// Apply `level` of `plan` to the actor, then mark it applied and save
    /// the plan. Any failure is reported once through the notifier and
    /// returned; nothing already written is rolled back.
    pub async fn execute(
        &self,
        actor_id: &ActorId,
        plan: &mut BuildPlan,
        level: u8,
    ) -> Result<ApplyReport, ApplyError> {
        match self.run(actor_id, plan, level).await {
            Ok(report) => {
                self.notifier
                    .notify(Notice::info(format!("Level {level} applied")));
                tracing::info!(
                    actor = %actor_id,
                    level,
                    created = report.items_created(),
                    "Applied planned level"
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!(actor = %actor_id, level, error = %e, "Failed to apply level");
                self.notifier.notify(Notice::error(format!(
                    "Applying level {level} failed: {e}"
                )));
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        actor_id: &ActorId,
        plan: &mut BuildPlan,
        level: u8,
    ) -> Result<ApplyReport, ApplyError> {
        if !(1..=20).contains(&level) {
            return Err(DomainError::InvalidLevel(level).into());
        }
        let actor = self.load_actor(actor_id, ApplyStep::Level).await?;
        let pending_skills = plan.pending_skill_increases(level);
        let choices = plan
            .level(level)
            .map(|l| l.choices.clone())
            .unwrap_or_default();

        let mut report = ApplyReport {
            level,
            ..ApplyReport::default()
        };

        self.raise_level(&actor, level, &mut report).await?;
        self.create_feats(&actor, &choices, level, &mut report).await?;
        if !pending_skills.is_empty() {
            self.increase_skills(&actor, &pending_skills, &mut report).await?;
            plan.record_skill_increases(level, pending_skills)?;
            self.store.save(actor_id, plan).await?;
        } else if !choices.skill_increases.is_empty() {
            tracing::debug!(actor = %actor_id, level, "Skill increases already applied; skipped");
        }
        self.record_boosts(&actor, &choices, level, &mut report).await?;
        self.create_spells(&actor, &choices, &mut report).await?;
        self.update_slots(&actor, level, &mut report).await?;
        self.grant_auto_spells(actor_id, level, &mut report).await?;

        plan.mark_applied(level)?;
        self.store.save(actor_id, plan).await?;
        Ok(report)
    }

    async fn load_actor(
        &self,
        actor_id: &ActorId,
        step: ApplyStep,
    ) -> Result<ActorSnapshot, ApplyError> {
        self.actors
            .get(actor_id)
            .await
            .map_err(ApplyError::step(step))?
            .ok_or_else(|| ApplyError::ActorNotFound(actor_id.clone()))
    }

    // === Step 1: level ===

    async fn raise_level(
        &self,
        actor: &ActorSnapshot,
        level: u8,
        report: &mut ApplyReport,
    ) -> Result<(), ApplyError> {
        if actor.level >= level {
            return Ok(());
        }
        let mut changes = UpdateMap::new();
        changes.insert(paths::LEVEL.to_string(), Value::from(level));
        self.actors
            .update(&actor.id, changes)
            .await
            .map_err(ApplyError::step(ApplyStep::Level))?;

        report.level_raised = true;
        self.notifier
            .notify(Notice::info(format!("{} is now level {level}", actor.name)));
        Ok(())
    }

    // === Steps 2-3: feats ===

    async fn create_feats(
        &self,
        actor: &ActorSnapshot,
        choices: &LevelChoices,
        level: u8,
        report: &mut ApplyReport,
    ) -> Result<(), ApplyError> {
        let mut items = Vec::new();
        for (category, reference) in choices.planned_feats() {
            let location = category.location(level);
            let Some(feat) = self.resolve_feat(reference, report).await else {
                continue;
            };
            if owns_feat(actor, reference, &feat, &location) {
                report.feats_skipped.push(feat.name);
                continue;
            }
            items.push(feat_item(category, &location, feat));
        }

        if items.is_empty() {
            return Ok(());
        }
        let names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
        self.actors
            .create_embedded(&actor.id, items)
            .await
            .map_err(ApplyError::step(ApplyStep::Feats))?;

        self.notifier
            .notify(Notice::info(format!("Added feats: {}", names.join(", "))));
        report.feats_created = names;
        Ok(())
    }

    async fn resolve_feat(
        &self,
        reference: &DocumentRef,
        report: &mut ApplyReport,
    ) -> Option<FeatDocument> {
        match self.content.resolve_feat(reference).await {
            Ok(Some(feat)) => Some(feat),
            Ok(None) => {
                self.skip_unresolved(reference, "feat", None, report);
                None
            }
            Err(e) => {
                self.skip_unresolved(reference, "feat", Some(e.to_string()), report);
                None
            }
        }
    }

    fn skip_unresolved(
        &self,
        reference: &DocumentRef,
        kind: &str,
        error: Option<String>,
        report: &mut ApplyReport,
    ) {
        tracing::warn!(reference = %reference, kind, error = ?error, "Planned document not found; skipped");
        self.notifier.notify(Notice::warn(format!(
            "Could not find planned {kind} {reference}; skipped"
        )));
        report.unresolved.push(reference.clone());
    }

    // === Step 4: skill increases ===

    async fn increase_skills(
        &self,
        actor: &ActorSnapshot,
        skills: &[Skill],
        report: &mut ApplyReport,
    ) -> Result<(), ApplyError> {
        let mut changes = UpdateMap::new();
        for skill in skills {
            let rank = actor.skill_rank(*skill).increased();
            changes.insert(paths::skill_rank(*skill), Value::from(rank.as_u8()));
        }
        self.actors
            .update(&actor.id, changes)
            .await
            .map_err(ApplyError::step(ApplyStep::Skills))?;

        report.skills_increased = skills.to_vec();
        let names: Vec<&str> = report.skills_increased.iter().map(|s| s.key()).collect();
        self.notifier
            .notify(Notice::info(format!("Increased skills: {}", names.join(", "))));
        Ok(())
    }

    // === Step 5: ability boosts ===

    async fn record_boosts(
        &self,
        actor: &ActorSnapshot,
        choices: &LevelChoices,
        level: u8,
        report: &mut ApplyReport,
    ) -> Result<(), ApplyError> {
        if choices.ability_boosts.is_empty() {
            return Ok(());
        }
        let bucket = boost_bucket_for_level(level);
        let existing = actor
            .ability_boosts
            .get(&bucket)
            .cloned()
            .unwrap_or_default();
        let mut merged = existing.clone();
        for ability in &choices.ability_boosts {
            if !merged.contains(ability) {
                merged.push(*ability);
            }
        }
        if merged == existing {
            return Ok(());
        }

        let mut changes = UpdateMap::new();
        changes.insert(paths::boosts(bucket), paths::boost_keys(&merged));
        self.actors
            .update(&actor.id, changes)
            .await
            .map_err(ApplyError::step(ApplyStep::Boosts))?;

        report.boosts_recorded = merged
            .into_iter()
            .filter(|a| !existing.contains(a))
            .collect();
        self.notifier.notify(Notice::info(format!(
            "Recorded ability boosts for level {bucket}"
        )));
        Ok(())
    }

    // === Step 6: planned spells ===

    async fn create_spells(
        &self,
        actor: &ActorSnapshot,
        choices: &LevelChoices,
        report: &mut ApplyReport,
    ) -> Result<(), ApplyError> {
        let planned: Vec<(SpellList, u8, &DocumentRef)> = choices.planned_spells().collect();
        if planned.is_empty() {
            return Ok(());
        }
        let Some(primary) = find_class_entry(actor) else {
            tracing::warn!(actor = %actor.id, "No spellcasting entry; planned spells skipped");
            self.notifier.notify(Notice::warn(
                "No spellcasting entry found; planned spells were not added",
            ));
            return Ok(());
        };

        let mut items = Vec::new();
        for (list, rank, reference) in planned {
            let entry = match list {
                SpellList::Primary => primary,
                SpellList::Secondary => secondary_entry(actor, primary),
            };
            if knows_spell_reference(actor, reference) {
                report.spells_skipped.push(reference.to_string());
                continue;
            }
            let spell = match self.content.resolve_spell(reference).await {
                Ok(Some(spell)) => spell,
                Ok(None) => {
                    self.skip_unresolved(reference, "spell", None, report);
                    continue;
                }
                Err(e) => {
                    self.skip_unresolved(reference, "spell", Some(e.to_string()), report);
                    continue;
                }
            };
            if knows_spell_in(actor, &spell.name, &entry.id) {
                report.spells_skipped.push(spell.name);
                continue;
            }
            items.push(spell_item(&entry.id, rank, spell));
        }

        if items.is_empty() {
            return Ok(());
        }
        let names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
        self.actors
            .create_embedded(&actor.id, items)
            .await
            .map_err(ApplyError::step(ApplyStep::Spells))?;

        self.notifier
            .notify(Notice::info(format!("Added spells: {}", names.join(", "))));
        report.spells_created = names;
        Ok(())
    }

    // === Step 7: slots ===

    async fn update_slots(
        &self,
        actor: &ActorSnapshot,
        level: u8,
        report: &mut ApplyReport,
    ) -> Result<(), ApplyError> {
        let Some(slug) = actor.class_slug() else {
            return Ok(());
        };
        let Some(profile) = SpellcastingProfile::lookup(&slug) else {
            return Ok(());
        };
        let Some(primary) = find_class_entry(actor) else {
            return Ok(());
        };

        let mut targets = vec![(primary, slots_at_level(&slug, level))];
        if profile.has_dual_spell_lists() {
            let secondary = secondary_entry(actor, primary);
            if secondary.id != primary.id {
                targets.push((secondary, secondary_slots_at_level(&slug, level)));
            }
        }

        for (entry, table) in targets {
            let changes = slot_changes(entry, &table);
            if changes.is_empty() {
                continue;
            }
            self.actors
                .update_item(&actor.id, &entry.id, changes)
                .await
                .map_err(ApplyError::step(ApplyStep::Slots))?;
            report.slots_updated = true;
        }

        let lost = lost_slots_at_level(&slug, level);
        if !lost.is_empty() {
            let ranks: Vec<String> = lost.keys().map(u8::to_string).collect();
            self.notifier.notify(Notice::info(format!(
                "Spell slots retired at rank {}",
                ranks.join(", ")
            )));
        }
        if report.slots_updated {
            self.notifier
                .notify(Notice::info(format!("Updated spell slots for level {level}")));
        }
        Ok(())
    }

    // === Step 8: automatic spell lists ===

    async fn grant_auto_spells(
        &self,
        actor_id: &ActorId,
        level: u8,
        report: &mut ApplyReport,
    ) -> Result<(), ApplyError> {
        // Re-read so spells created above count as known.
        let actor = self.load_actor(actor_id, ApplyStep::AutoSpells).await?;
        let Some(slug) = actor.class_slug() else {
            return Ok(());
        };
        let Some(profile) = SpellcastingProfile::lookup(&slug) else {
            return Ok(());
        };
        if profile.learning_rule != LearningRule::Auto {
            return Ok(());
        }
        let (Some(highest), Some(entry)) = (profile.highest_rank(level), find_class_entry(&actor))
        else {
            return Ok(());
        };

        let pool = self.content.all_spells().await;
        let options = SpellFilterOptions::default();
        let mut items = Vec::new();
        for rank in 1..=highest {
            for spell in spells_for_rank(&pool, &actor, rank, &options) {
                if knows_spell_reference(&actor, &spell.uuid) {
                    continue;
                }
                items.push(spell_item(&entry.id, rank, spell));
            }
        }

        if items.is_empty() {
            return Ok(());
        }
        let count = items.len();
        self.actors
            .create_embedded(&actor.id, items)
            .await
            .map_err(ApplyError::step(ApplyStep::AutoSpells))?;

        report.auto_spells_created = count;
        self.notifier.notify(Notice::info(format!(
            "Added {count} spells from the {slug} list"
        )));
        Ok(())
    }
}

/// A feat taken once counts as owned wherever it sits. A repeatable feat
/// only counts at the slot being filled.
fn owns_feat(
    actor: &ActorSnapshot,
    reference: &DocumentRef,
    feat: &FeatDocument,
    location: &str,
) -> bool {
    let repeatable = feat.effective_max_takable() > 1;
    actor.feats.iter().any(|owned| {
        let by_reference = owned.source_id.as_ref() == Some(reference)
            || owned.id.as_str() == reference.as_str();
        let at_location = owned.location.as_deref() == Some(location);
        let by_name = eq_ignore_case(&owned.name, &feat.name);
        if repeatable {
            at_location && (by_reference || by_name)
        } else {
            by_reference || (by_name && at_location)
        }
    })
}

fn knows_spell_reference(actor: &ActorSnapshot, reference: &DocumentRef) -> bool {
    actor
        .spells
        .iter()
        .any(|s| s.source_id.as_ref() == Some(reference) || s.id.as_str() == reference.as_str())
}

fn knows_spell_in(actor: &ActorSnapshot, name: &str, entry: &ItemId) -> bool {
    actor
        .spells
        .iter()
        .any(|s| eq_ignore_case(&s.name, name) && s.location.as_ref() == Some(entry))
}

/// The non-focus entry other than the class entry, for dual-list casters.
fn secondary_entry<'a>(
    actor: &'a ActorSnapshot,
    primary: &'a SpellcastingEntry,
) -> &'a SpellcastingEntry {
    actor
        .spellcasting_entries
        .iter()
        .find(|e| e.id != primary.id && !e.is_focus())
        .unwrap_or(primary)
}

/// Slot writes for one entry. Ranks the table no longer grants drop to zero.
fn slot_changes(entry: &SpellcastingEntry, table: &SlotMap) -> UpdateMap {
    let mut changes = UpdateMap::new();
    let ranks: BTreeSet<u8> = table
        .keys()
        .chain(entry.slots.keys())
        .copied()
        .filter(|rank| (1..=MAX_SPELL_RANK).contains(rank))
        .collect();
    for rank in ranks {
        let max = table.get(&rank).copied().unwrap_or(0);
        let current = entry.slots.get(&rank).copied().unwrap_or_default();
        if current.max == max && current.value == max {
            continue;
        }
        changes.insert(paths::slot_max(rank), Value::from(max));
        changes.insert(paths::slot_value(rank), Value::from(max));
    }
    changes
}

fn feat_item(
    category: FeatCategory,
    location: &str,
    feat: FeatDocument,
) -> NewItem {
    let mut data = feat.raw;
    paths::set(&mut data, paths::LOCATION, Value::String(location.to_string()));
    tracing::debug!(feat = %feat.name, %category, location, "Cloning planned feat");
    NewItem {
        kind: ItemKind::Feat,
        name: feat.name,
        source_id: feat.uuid,
        level: feat.level,
        location: location.to_string(),
        traits: feat.traits,
        data,
    }
}

fn spell_item(entry: &ItemId, rank: u8, spell: SpellDocument) -> NewItem {
    let mut data = spell.raw;
    paths::set(
        &mut data,
        paths::SPELL_LOCATION,
        Value::String(entry.to_string()),
    );
    NewItem {
        kind: ItemKind::Spell,
        name: spell.name,
        source_id: spell.uuid,
        level: rank,
        location: entry.to_string(),
        traits: spell.traits,
        data,
    }
}
