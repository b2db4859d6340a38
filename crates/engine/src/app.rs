//! Application state and composition.

use std::sync::Arc;
use std::time::Duration;

use levelwright_domain::{
    validate_build_plan, ActorId, ActorSnapshot, BuildPlan, CompatibilityReport, PlanValidation,
};

use crate::entities::{PlanError, PlanStore};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::memory::InMemoryHost;
use crate::infrastructure::ports::{
    ActorRepo, ClockPort, ContentResolver, ContentSource, FlagRepo, NotifierPort, RepoError,
    SettingsRepo,
};
use crate::infrastructure::settings::{HostSettings, SettingsSnapshot};
use crate::use_cases::content::{ContentCache, ContentPacks};
use crate::use_cases::level_up::{ApplyError, ApplyLevel, ApplyReport};
use crate::use_cases::planning::{Eligibility, LevelOptions, PlanSession};

/// Host-side ports the engine talks through.
#[derive(Clone)]
pub struct HostPorts {
    pub actors: Arc<dyn ActorRepo>,
    pub flags: Arc<dyn FlagRepo>,
    pub settings: Arc<dyn SettingsRepo>,
    pub content: Arc<dyn ContentSource>,
    pub resolver: Arc<dyn ContentResolver>,
    pub notifier: Arc<dyn NotifierPort>,
}

impl HostPorts {
    /// Every port backed by one in-memory host.
    pub fn in_memory(host: Arc<InMemoryHost>, notifier: Arc<dyn NotifierPort>) -> Self {
        Self {
            actors: host.clone(),
            flags: host.clone(),
            settings: host.clone(),
            content: host.clone(),
            resolver: host,
            notifier,
        }
    }

    pub fn with_content(
        mut self,
        content: Arc<dyn ContentSource>,
        resolver: Arc<dyn ContentResolver>,
    ) -> Self {
        self.content = content;
        self.resolver = resolver;
        self
    }
}

/// Main application state.
///
/// Settings are read once at construction; call [`App::reload_settings`]
/// after the host changes them.
pub struct App {
    pub ports: HostPorts,
    pub settings: SettingsSnapshot,
    pub content: Arc<ContentCache>,
    pub plans: Arc<PlanStore>,
    pub eligibility: Eligibility,
    pub apply_level: ApplyLevel,
}

impl App {
    pub async fn new(ports: HostPorts) -> Result<Self, RepoError> {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        Self::with_clock(ports, clock).await
    }

    /// Create a new App with all dependencies wired up.
    pub async fn with_clock(ports: HostPorts, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let settings = HostSettings::new(ports.settings.clone()).load().await?;

        let content = Arc::new(ContentCache::new(
            ports.content.clone(),
            ports.resolver.clone(),
            ContentPacks::from_settings(&settings.module),
        ));
        let plans = Arc::new(PlanStore::new(ports.flags.clone(), clock));
        let eligibility = Eligibility::new(content.clone());
        let apply_level = ApplyLevel::new(
            ports.actors.clone(),
            content.clone(),
            plans.clone(),
            ports.notifier.clone(),
        );

        tracing::info!(
            feat_packs = content.packs().feats.len(),
            spell_packs = content.packs().spells.len(),
            "Engine composed"
        );
        Ok(Self {
            ports,
            settings,
            content,
            plans,
            eligibility,
            apply_level,
        })
    }

    /// Re-read host settings. Pack changes drop the content cache.
    pub async fn reload_settings(&mut self) -> Result<(), RepoError> {
        let settings = HostSettings::new(self.ports.settings.clone()).load().await?;
        let packs = ContentPacks::from_settings(&settings.module);
        if &packs != self.content.packs() {
            self.content = Arc::new(ContentCache::new(
                self.ports.content.clone(),
                self.ports.resolver.clone(),
                packs,
            ));
            self.eligibility = Eligibility::new(self.content.clone());
            self.apply_level = ApplyLevel::new(
                self.ports.actors.clone(),
                self.content.clone(),
                self.plans.clone(),
                self.ports.notifier.clone(),
            );
        }
        self.settings = settings;
        Ok(())
    }

    pub async fn actor(&self, id: &ActorId) -> Result<Option<ActorSnapshot>, RepoError> {
        self.ports.actors.get(id).await
    }

    pub async fn plan_for(&self, actor: &ActorSnapshot) -> Result<BuildPlan, PlanError> {
        self.plans
            .load_or_create(actor, &self.settings.planner)
            .await
    }

    /// Editing session with the configured autosave delay.
    pub fn open_session(&self, actor: ActorId, plan: BuildPlan) -> PlanSession {
        let delay = Duration::from_millis(self.settings.module.autosave_delay_ms());
        PlanSession::new(actor, plan, self.plans.clone(), delay)
    }

    pub async fn level_options(&self, actor: &ActorSnapshot, level: u8) -> LevelOptions {
        self.eligibility
            .level_options(actor, level, &self.settings.planner)
            .await
    }

    pub fn validate(&self, actor: &ActorSnapshot, plan: &BuildPlan) -> PlanValidation {
        validate_build_plan(actor, plan, &self.settings.planner)
    }

    /// How far the plan's variant-rule snapshot has drifted from the live
    /// settings.
    pub fn compatibility(&self, plan: &BuildPlan) -> CompatibilityReport {
        plan.drift_from(&self.settings.planner.variant_rules)
    }

    pub async fn apply(
        &self,
        actor: &ActorId,
        plan: &mut BuildPlan,
        level: u8,
    ) -> Result<ApplyReport, ApplyError> {
        self.apply_level.execute(actor, plan, level).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::app_settings::MODULE_NAMESPACE;
    use crate::infrastructure::notifier::LogNotifier;
    use crate::infrastructure::settings::SYSTEM_NAMESPACE;
    use levelwright_domain::{ClassDocument, VariantRuleField};
    use serde_json::json;

    async fn app(host: Arc<InMemoryHost>) -> App {
        let ports = HostPorts::in_memory(host, Arc::new(LogNotifier::new()));
        App::new(ports).await.expect("new should succeed")
    }

    #[tokio::test]
    async fn reads_settings_at_construction() {
        let host = Arc::new(InMemoryHost::new());
        host.set_setting(SYSTEM_NAMESPACE, "freeArchetypeVariant", json!(true));
        host.set_setting(MODULE_NAMESPACE, "autosaveDelayMs", json!(250));
        host.set_setting(MODULE_NAMESPACE, "additionalFeatPacks", json!(["homebrew.feats"]));

        let app = app(host).await;

        assert!(app.settings.planner.variant_rules.free_archetype);
        assert_eq!(app.settings.module.autosave_delay_ms(), 250);
        assert!(app
            .content
            .packs()
            .feats
            .contains(&"homebrew.feats".to_string()));
    }

    #[tokio::test]
    async fn plan_drift_follows_reloaded_settings() {
        let host = Arc::new(InMemoryHost::new());
        let actor = ActorSnapshot::new("a1", "Amiri", 1)
            .with_class(ClassDocument::new("Barbarian").with_standard_progression());
        host.insert_actor(actor.clone()).await;

        let mut app = app(host.clone()).await;
        let plan = app.plan_for(&actor).await.expect("plan for should succeed");
        assert!(app.compatibility(&plan).compatible);

        host.set_setting(SYSTEM_NAMESPACE, "freeArchetypeVariant", json!(true));
        app.reload_settings().await.expect("reload settings should succeed");

        let report = app.compatibility(&plan);
        assert!(!report.compatible);
        assert_eq!(report.hard_warnings[0].field, VariantRuleField::FreeArchetype);
    }

    #[tokio::test]
    async fn plan_for_reuses_stored_plan() {
        let host = Arc::new(InMemoryHost::new());
        let actor = ActorSnapshot::new("a1", "Amiri", 1);
        let app = app(host).await;

        let mut first = app.plan_for(&actor).await.expect("plan for should succeed");
        first.set_notes(2, "rage").expect("set notes should succeed");
        app.plans.save(&actor.id, &mut first).await.expect("save should succeed");

        let second = app.plan_for(&actor).await.expect("plan for should succeed");
        assert_eq!(second.level(2).map(|l| l.notes.as_str()), Some("rage"));
    }
}
