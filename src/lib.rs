//! GitStore: expose a GitLab-hosted repository as a paginated, atomically
//! mutable entity store for admin UIs.
//!
//! Collections of JSON entities live as one file each inside a
//! version-controlled repository. This crate is the translation layer that
//! makes that repository behave like a document store: it aggregates paged
//! tree listings, fetches and decodes files concurrently, folds independent
//! mutations into single atomic commits and dispatches each named resource
//! to the backing strategy that serves it.

pub mod codec;
pub mod commit;
pub mod core;
pub mod dispatch;
pub mod provider;
pub mod store;
pub mod tree;

// Re-export main components for easier consumption
pub use crate::core::{
    CollectionPage, CommitAction, ConfigError, Entity, EntityPage, EntryKind, FileRecord,
    OauthConfig, RemoteCollection, Result, StoreConfig, StoreError, TransferEncoding, TreeEntry,
    TreePage,
};
pub use commit::CommitBatch;
pub use dispatch::{ResourceBinding, ResourceDispatcher};
pub use provider::{DataProvider, EntityProvider, RemoteCollectionProvider};
pub use store::{GitlabStore, RemoteStore, StaticToken, TokenProvider};
pub use tree::aggregate_tree;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
