//! Remote store access.
//!
//! The [`RemoteStore`] trait is the seam between providers and the hosting
//! service: read a tree page, read a file, write a commit of file actions,
//! plus paged access to the specialized read-only collections. The one real
//! implementation talks to GitLab REST v4; tests substitute an in-memory
//! store.

// Internal modules
mod gitlab;

// Public exports
pub use gitlab::GitlabStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::core::{CollectionPage, CommitAction, FileRecord, RemoteCollection, Result, TreePage};

/// Credential source for bearer authentication.
///
/// The store client never looks tokens up from ambient state; whoever
/// constructs it supplies this capability. Token acquisition and refresh
/// live in the authentication collaborator outside this crate.
pub trait TokenProvider: Send + Sync {
    /// The current bearer token
    fn token(&self) -> String;
}

/// A fixed token known at construction time
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> String {
        self.0.clone()
    }
}

/// Minimal authenticated calls against the remote store.
///
/// No business logic and no retries live here; any non-2xx response
/// surfaces as [`crate::core::StoreError::Remote`].
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// List one page of the tree under `path` for the configured ref.
    ///
    /// `total_pages` in the result is 0 when the response carried no usable
    /// page-count metadata.
    async fn list_tree_page(&self, path: &str, page: u64) -> Result<TreePage>;

    /// Read one file at `path` for the configured ref.
    ///
    /// A missing file surfaces as [`crate::core::StoreError::NotFound`].
    async fn read_file(&self, path: &str) -> Result<FileRecord>;

    /// Apply all `actions` to the configured ref as one atomic commit
    async fn write_commit(&self, message: &str, actions: &[CommitAction]) -> Result<()>;

    /// List one page of a specialized read-only collection
    async fn list_collection_page(
        &self,
        collection: RemoteCollection,
        page: u64,
        per_page: u64,
    ) -> Result<CollectionPage>;

    /// Read one record of a specialized read-only collection by its id.
    ///
    /// A missing record surfaces as [`crate::core::StoreError::NotFound`].
    async fn read_collection_item(
        &self,
        collection: RemoteCollection,
        id: &str,
    ) -> Result<Map<String, Value>>;
}
