//! Build plan persistence.
//!
//! A plan is stored as a JSON flag on its actor. The store owns the
//! (de)serialization and timestamps every write with the injected clock.

use std::sync::Arc;

use levelwright_domain::{
    export_plan, import_plan, ActorId, ActorSnapshot, BuildPlan, DomainError, PlannerConfig,
};

use crate::infrastructure::app_settings::MODULE_NAMESPACE;
use crate::infrastructure::ports::{ClockPort, FlagRepo, RepoError};

/// Flag key the plan is stored under, inside [`MODULE_NAMESPACE`].
pub const PLAN_FLAG_KEY: &str = "buildPlan";

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Stored plan for {actor} is unreadable: {message}")]
    Serialization { actor: ActorId, message: String },
}

/// Plan entity - load/save/delete/create over the actor flag store.
pub struct PlanStore {
    flags: Arc<dyn FlagRepo>,
    clock: Arc<dyn ClockPort>,
}

impl PlanStore {
    pub fn new(flags: Arc<dyn FlagRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { flags, clock }
    }

    pub async fn load(&self, actor: &ActorId) -> Result<Option<BuildPlan>, PlanError> {
        let Some(value) = self
            .flags
            .get_flag(actor, MODULE_NAMESPACE, PLAN_FLAG_KEY)
            .await?
        else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| PlanError::Serialization {
                actor: actor.clone(),
                message: e.to_string(),
            })
    }

    /// Stamp `last_modified` and write the plan.
    pub async fn save(&self, actor: &ActorId, plan: &mut BuildPlan) -> Result<(), PlanError> {
        plan.touch(self.clock.now());
        let value = serde_json::to_value(&*plan).map_err(|e| PlanError::Serialization {
            actor: actor.clone(),
            message: e.to_string(),
        })?;
        self.flags
            .set_flag(actor, MODULE_NAMESPACE, PLAN_FLAG_KEY, value)
            .await?;
        tracing::debug!(actor = %actor, "Saved build plan");
        Ok(())
    }

    pub async fn delete(&self, actor: &ActorId) -> Result<(), PlanError> {
        self.flags
            .unset_flag(actor, MODULE_NAMESPACE, PLAN_FLAG_KEY)
            .await?;
        tracing::info!(actor = %actor, "Deleted build plan");
        Ok(())
    }

    /// Create, persist and return a fresh plan sized to the active rules.
    pub async fn create(
        &self,
        actor: &ActorSnapshot,
        config: &PlannerConfig,
    ) -> Result<BuildPlan, PlanError> {
        let mut plan = BuildPlan::create(actor, config, self.clock.now());
        self.save(&actor.id, &mut plan).await?;
        tracing::info!(actor = %actor.id, level = actor.level, "Created build plan");
        Ok(plan)
    }

    pub async fn load_or_create(
        &self,
        actor: &ActorSnapshot,
        config: &PlannerConfig,
    ) -> Result<BuildPlan, PlanError> {
        match self.load(&actor.id).await? {
            Some(plan) => Ok(plan),
            None => self.create(actor, config).await,
        }
    }

    pub async fn export(&self, actor: &ActorId) -> Result<Option<String>, PlanError> {
        match self.load(actor).await? {
            Some(plan) => Ok(Some(export_plan(&plan)?)),
            None => Ok(None),
        }
    }

    /// Replace the stored plan with imported JSON. Malformed input is
    /// rejected before anything is written.
    pub async fn import(&self, actor: &ActorId, json: &str) -> Result<BuildPlan, PlanError> {
        let mut plan = import_plan(json)?;
        self.save(actor, &mut plan).await?;
        tracing::info!(actor = %actor, "Imported build plan");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::memory::InMemoryHost;
    use crate::infrastructure::ports::MockFlagRepo;
    use chrono::{TimeZone, Utc};
    use levelwright_domain::{ClassDocument, FeatCategory};

    fn clock() -> Arc<dyn ClockPort> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("with ymd and hms should succeed")))
    }

    fn wizard() -> ActorSnapshot {
        ActorSnapshot::new("a1", "Ezren", 3)
            .with_class(ClassDocument::new("Wizard").with_standard_progression())
    }

    #[tokio::test]
    async fn load_without_flag_is_none() {
        let mut flags = MockFlagRepo::new();
        flags
            .expect_get_flag()
            .withf(|_, ns, key| ns == MODULE_NAMESPACE && key == PLAN_FLAG_KEY)
            .times(1)
            .returning(|_, _, _| Ok(None));
        let store = PlanStore::new(Arc::new(flags), clock());

        assert!(store.load(&ActorId::new("a1")).await.expect("load should succeed").is_none());
    }

    #[tokio::test]
    async fn create_persists_and_reloads() {
        let host = Arc::new(InMemoryHost::new());
        let store = PlanStore::new(host.clone(), clock());
        let actor = wizard();

        let created = store.create(&actor, &PlannerConfig::default()).await.expect("create should succeed");
        let loaded = store.load(&actor.id).await.expect("load should succeed").expect("value should be present");

        assert_eq!(created, loaded);
        assert!(loaded.is_applied(3));
        assert!(!loaded.is_applied(4));
        assert_eq!(loaded.last_modified, clock().now());
    }

    #[tokio::test]
    async fn save_stamps_last_modified() {
        let host = Arc::new(InMemoryHost::new());
        let store = PlanStore::new(host, clock());
        let actor = wizard();
        let mut plan = BuildPlan::create(&actor, &PlannerConfig::default(), Utc::now());

        plan.set_feat_choice(4, FeatCategory::Class, None).expect("set feat choice should succeed");
        store.save(&actor.id, &mut plan).await.expect("save should succeed");

        assert_eq!(plan.last_modified, clock().now());
    }

    #[tokio::test]
    async fn corrupt_flag_is_a_serialization_error() {
        let mut flags = MockFlagRepo::new();
        flags
            .expect_get_flag()
            .returning(|_, _, _| Ok(Some(serde_json::json!({"levels": "nope"}))));
        let store = PlanStore::new(Arc::new(flags), clock());

        let err = store.load(&ActorId::new("a1")).await.expect_err("load should fail");
        assert!(matches!(err, PlanError::Serialization { .. }));
    }

    #[tokio::test]
    async fn malformed_import_keeps_existing_plan() {
        let host = Arc::new(InMemoryHost::new());
        let store = PlanStore::new(host, clock());
        let actor = wizard();
        let original = store.create(&actor, &PlannerConfig::default()).await.expect("create should succeed");

        let err = store.import(&actor.id, r#"{"levels": {}}"#).await.expect_err("import should fail");
        assert!(matches!(err, PlanError::Domain(DomainError::InvalidImport(_))));

        let still = store.load(&actor.id).await.expect("load should succeed").expect("value should be present");
        assert_eq!(still, original);
    }

    #[tokio::test]
    async fn export_then_import_round_trips() {
        let host = Arc::new(InMemoryHost::new());
        let store = PlanStore::new(host, clock());
        let actor = wizard();
        store.create(&actor, &PlannerConfig::default()).await.expect("create should succeed");

        let json = store.export(&actor.id).await.expect("export should succeed").expect("value should be present");
        store.delete(&actor.id).await.expect("delete should succeed");
        assert!(store.load(&actor.id).await.expect("load should succeed").is_none());

        let imported = store.import(&actor.id, &json).await.expect("import should succeed");
        assert_eq!(store.load(&actor.id).await.expect("load should succeed"), Some(imported));
    }
}
