//! Levelwright engine library.
//!
//! Async orchestration around the rules in `levelwright-domain`.
//!
//! ## Structure
//!
//! - `entities/` - Persistence wrappers over the host ports
//! - `use_cases/` - Content loading, planning and level application
//! - `infrastructure/` - Port traits and their adapters
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

pub use app::{App, HostPorts};
