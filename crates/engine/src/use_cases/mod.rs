//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area of the planner.
//! Use cases orchestrate across entity modules and ports.

pub mod content;
pub mod level_up;
pub mod planning;

pub use content::{ContentCache, ContentError, ContentKind, ContentPacks, FeatFilter, SpellFilter};
pub use level_up::{ApplyError, ApplyLevel, ApplyReport, ApplyStep};
pub use planning::{CheckedCandidate, Eligibility, LevelOptions, PlanSession};
