//! Planning use cases: candidate pools and plan editing sessions.

mod eligibility;
mod session;

pub use eligibility::{CheckedCandidate, Eligibility, LevelOptions};
pub use session::PlanSession;
