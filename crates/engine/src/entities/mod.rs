//! Entity modules - Domain capability encapsulation.
//!
//! Each module wraps persistence for a domain type behind the repository
//! ports and provides the building blocks for use cases.

pub mod plan_store;

pub use plan_store::{PlanError, PlanStore, PLAN_FLAG_KEY};
