//! Host store port traits.
//!
//! The host owns actors, their embedded items, per-actor flags and world
//! settings. The engine reads snapshots and writes dotted-path updates.

use async_trait::async_trait;
use serde_json::Value;

use levelwright_domain::{ActorId, ActorSnapshot, ItemId};

use super::error::RepoError;
use super::types::{NewItem, UpdateMap};

// =============================================================================
// Actors
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorRepo: Send + Sync {
    async fn get(&self, id: &ActorId) -> Result<Option<ActorSnapshot>, RepoError>;

    /// Apply dotted-path changes to the actor document.
    async fn update(&self, id: &ActorId, changes: UpdateMap) -> Result<(), RepoError>;

    /// Apply dotted-path changes to one embedded item.
    async fn update_item(
        &self,
        actor: &ActorId,
        item: &ItemId,
        changes: UpdateMap,
    ) -> Result<(), RepoError>;

    /// Create embedded items in one call, returning their new ids in order.
    async fn create_embedded(
        &self,
        actor: &ActorId,
        items: Vec<NewItem>,
    ) -> Result<Vec<ItemId>, RepoError>;
}

// =============================================================================
// Flag Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlagRepo: Send + Sync {
    async fn get_flag(
        &self,
        actor: &ActorId,
        namespace: &str,
        key: &str,
    ) -> Result<Option<Value>, RepoError>;

    async fn set_flag(
        &self,
        actor: &ActorId,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> Result<(), RepoError>;

    async fn unset_flag(&self, actor: &ActorId, namespace: &str, key: &str)
        -> Result<(), RepoError>;
}

// =============================================================================
// Settings Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, RepoError>;
}
