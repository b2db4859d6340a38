//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Host storage (actors, embedded items, flags, settings)
//! - Compendium content (bulk packs and single-document lookups)
//! - User notifications
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Host Storage Ports
// =============================================================================
pub use repos::{ActorRepo, FlagRepo, SettingsRepo};

// =============================================================================
// Content and Notification Ports
// =============================================================================
pub use external::{ContentResolver, ContentSource, NotifierPort};

pub use types::{paths, ItemKind, NewItem, Notice, NoticeLevel, UpdateMap};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockActorRepo, MockFlagRepo, MockSettingsRepo};

#[cfg(test)]
pub use external::{MockContentResolver, MockContentSource, MockNotifierPort};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
