//! Content and notification port traits.

use async_trait::async_trait;
use serde_json::Value;

use levelwright_domain::DocumentRef;

use super::error::RepoError;
use super::types::Notice;

// =============================================================================
// Compendium Content
// =============================================================================

/// Bulk access to compendium packs (the host's document collections).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Every document in `pack`. A pack that does not exist is
    /// `RepoError::NotFound`.
    async fn get_documents(&self, pack: &str) -> Result<Vec<Value>, RepoError>;
}

/// Point lookups of a single document by its compendium reference.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentResolver: Send + Sync {
    async fn resolve(&self, reference: &DocumentRef) -> Result<Option<Value>, RepoError>;
}

// =============================================================================
// User Notifications
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait NotifierPort: Send + Sync {
    fn notify(&self, notice: Notice);
}
