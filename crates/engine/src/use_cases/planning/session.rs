//! Editing session over one actor's plan with debounced autosave.
//!
//! Edits mark the session dirty and schedule a write after the configured
//! delay; a newer edit supersedes any write still waiting. Callers that
//! need the plan on disk now call [`PlanSession::flush`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Mutex;

use levelwright_domain::{ActorId, BuildPlan, DomainError};

use crate::entities::{PlanError, PlanStore};

struct SessionState {
    plan: Mutex<BuildPlan>,
    /// Bumped on every edit; a scheduled write only runs if it still holds
    /// the generation it was scheduled for.
    generation: AtomicU64,
    saved_generation: AtomicU64,
}

pub struct PlanSession {
    actor: ActorId,
    store: Arc<PlanStore>,
    state: Arc<SessionState>,
    delay: Duration,
}

impl PlanSession {
    pub fn new(actor: ActorId, plan: BuildPlan, store: Arc<PlanStore>, delay: Duration) -> Self {
        Self {
            actor,
            store,
            state: Arc::new(SessionState {
                plan: Mutex::new(plan),
                generation: AtomicU64::new(0),
                saved_generation: AtomicU64::new(0),
            }),
            delay,
        }
    }

    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    pub async fn snapshot(&self) -> BuildPlan {
        self.state.plan.lock().await.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.generation.load(Ordering::SeqCst)
            != self.state.saved_generation.load(Ordering::SeqCst)
    }

    /// Run one edit against the plan. A rejected edit leaves the plan
    /// untouched and schedules nothing.
    pub async fn edit<R>(
        &self,
        f: impl FnOnce(&mut BuildPlan) -> Result<R, DomainError>,
    ) -> Result<R, DomainError> {
        let result = {
            let mut plan = self.state.plan.lock().await;
            let mut draft = plan.clone();
            let result = f(&mut draft)?;
            *plan = draft;
            result
        };
        self.mark_dirty();
        Ok(result)
    }

    /// Schedule a write after the debounce delay.
    pub fn mark_dirty(&self) {
        let generation = self.state.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let state = Arc::downgrade(&self.state);
        let store = Arc::clone(&self.store);
        let actor = self.actor.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            autosave(state, store, actor, generation).await;
        });
    }

    /// Write the current plan now, superseding any scheduled write.
    pub async fn flush(&self) -> Result<(), PlanError> {
        let generation = self.state.generation.load(Ordering::SeqCst);
        write_plan(&self.state, &self.store, &self.actor, generation).await
    }
}

async fn autosave(
    state: Weak<SessionState>,
    store: Arc<PlanStore>,
    actor: ActorId,
    generation: u64,
) {
    let Some(state) = state.upgrade() else {
        tracing::warn!(actor = %actor, "Autosave fired after its session closed; skipped");
        return;
    };
    if state.generation.load(Ordering::SeqCst) != generation {
        return;
    }
    if let Err(e) = write_plan(&state, &store, &actor, generation).await {
        tracing::warn!(actor = %actor, error = %e, "Autosave failed");
    }
}

async fn write_plan(
    state: &SessionState,
    store: &PlanStore,
    actor: &ActorId,
    generation: u64,
) -> Result<(), PlanError> {
    if state.saved_generation.load(Ordering::SeqCst) >= generation {
        return Ok(());
    }
    let mut plan = state.plan.lock().await;
    store.save(actor, &mut plan).await?;
    state.saved_generation.fetch_max(generation, Ordering::SeqCst);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{ClockPort, FlagRepo, MockFlagRepo, RepoError};
    use chrono::Utc;
    use levelwright_domain::{ActorSnapshot, FeatCategory, PlannerConfig};

    fn session_with(flags: MockFlagRepo, delay_ms: u64) -> PlanSession {
        let clock: Arc<dyn ClockPort> = Arc::new(FixedClock(Utc::now()));
        let flags: Arc<dyn FlagRepo> = Arc::new(flags);
        let store = Arc::new(PlanStore::new(flags, clock.clone()));
        let actor = ActorSnapshot::new("a1", "Kyra", 1);
        let plan = BuildPlan::create(&actor, &PlannerConfig::default(), clock.now());
        PlanSession::new(actor.id, plan, store, Duration::from_millis(delay_ms))
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_coalesce_into_one_write() {
        let mut flags = MockFlagRepo::new();
        flags.expect_set_flag().times(1).returning(|_, _, _, _| Ok(()));
        let session = session_with(flags, 1500);

        for level in 2..=5 {
            session
                .edit(|plan| plan.set_notes(level, "draft"))
                .await
                .expect("edit should succeed");
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert!(session.is_dirty());

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(!session.is_dirty());
    }

    #[tokio::test(start_paused = true)]
    async fn flush_writes_immediately_and_cancels_pending() {
        let mut flags = MockFlagRepo::new();
        flags.expect_set_flag().times(1).returning(|_, _, _, _| Ok(()));
        let session = session_with(flags, 1500);

        session
            .edit(|plan| plan.set_feat_choice(2, FeatCategory::Class, None))
            .await
            .expect("edit should succeed");
        session.flush().await.expect("flush should succeed");
        assert!(!session.is_dirty());

        tokio::time::sleep(Duration::from_millis(2000)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_edit_schedules_nothing() {
        let mut flags = MockFlagRepo::new();
        flags.expect_set_flag().never();
        let session = session_with(flags, 10);

        let err = session.edit(|plan| plan.set_notes(1, "too late")).await;
        assert_eq!(err, Err(DomainError::LevelApplied(1)));
        assert!(!session.is_dirty());

        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_after_drop_is_tolerated() {
        let mut flags = MockFlagRepo::new();
        flags.expect_set_flag().never();
        let session = session_with(flags, 100);

        session
            .edit(|plan| plan.set_notes(3, "draft"))
            .await
            .expect("edit should succeed");
        drop(session);

        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_autosave_leaves_session_dirty() {
        let mut flags = MockFlagRepo::new();
        flags
            .expect_set_flag()
            .times(1)
            .returning(|_, _, _, _| Err(RepoError::database("set_flag", "offline")));
        let session = session_with(flags, 100);

        session
            .edit(|plan| plan.set_notes(3, "draft"))
            .await
            .expect("edit should succeed");
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(session.is_dirty());
    }
}
