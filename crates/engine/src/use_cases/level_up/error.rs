//! Level application errors.

use std::fmt;

use levelwright_domain::{ActorId, DomainError};

use crate::entities::PlanError;
use crate::infrastructure::ports::RepoError;

/// The write phases of applying a level, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStep {
    Level,
    Feats,
    Skills,
    Boosts,
    Spells,
    Slots,
    AutoSpells,
}

impl fmt::Display for ApplyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ApplyStep::Level => "level",
            ApplyStep::Feats => "feats",
            ApplyStep::Skills => "skill increases",
            ApplyStep::Boosts => "ability boosts",
            ApplyStep::Spells => "spells",
            ApplyStep::Slots => "spell slots",
            ApplyStep::AutoSpells => "automatic spells",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Applying {step} failed: {source}")]
    Step {
        step: ApplyStep,
        #[source]
        source: RepoError,
    },

    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),
}

impl ApplyError {
    pub(crate) fn step(step: ApplyStep) -> impl FnOnce(RepoError) -> Self {
        move |source| Self::Step { step, source }
    }
}
