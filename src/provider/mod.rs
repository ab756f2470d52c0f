//! Entity providers: the CRUD surface consumed by the admin UI.
//!
//! [`EntityProvider`] serves file-collection resources with full CRUD;
//! [`RemoteCollectionProvider`] serves the specialized read-only
//! collections. Both are handed out as [`DataProvider`] trait objects by
//! the resource dispatcher.

// Internal modules
mod collection;
mod entity;

// Public exports
pub use collection::RemoteCollectionProvider;
pub use entity::EntityProvider;

use async_trait::async_trait;

use crate::core::{Entity, EntityPage, Result, StoreError};

/// The uniform per-resource interface consumed by the UI.
///
/// Write operations default to rejecting the call, so read-only strategies
/// implement only the read side. All operations are fail-fast: any error in
/// a concurrent fan-out fails the whole call and no partial data is
/// returned.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// One page of the collection plus the collection's total size
    async fn list(&self, page: u64, per_page: u64) -> Result<EntityPage>;

    /// A single entity by id
    async fn get_one(&self, id: &str) -> Result<Entity>;

    /// Several entities by id, in input order
    async fn get_many(&self, ids: &[String]) -> Result<Vec<Entity>>;

    /// Store a new entity under a freshly generated id
    async fn create(&self, _data: Entity) -> Result<Entity> {
        Err(StoreError::ReadOnly(
            "this resource does not support create".to_string(),
        ))
    }

    /// Overwrite the entity at `id`
    async fn update(&self, _id: &str, _data: Entity) -> Result<Entity> {
        Err(StoreError::ReadOnly(
            "this resource does not support update".to_string(),
        ))
    }

    /// Remove the entity at `id`, returning the caller-supplied previous
    /// representation
    async fn delete(&self, _id: &str, _previous_data: Entity) -> Result<Entity> {
        Err(StoreError::ReadOnly(
            "this resource does not support delete".to_string(),
        ))
    }

    /// Remove several entities in one atomic commit, returning the ids
    async fn delete_many(&self, _ids: &[String]) -> Result<Vec<String>> {
        Err(StoreError::ReadOnly(
            "this resource does not support delete".to_string(),
        ))
    }
}
