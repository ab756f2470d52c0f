// Internal modules
mod config;
mod error;
mod types;

// Public exports
pub use config::{ConfigError, OauthConfig, StoreConfig};
pub use error::{Result, StoreError};
pub use types::{
    CollectionPage, CommitAction, Entity, EntityPage, EntryKind, FileRecord, RemoteCollection,
    TransferEncoding, TreeEntry, TreePage,
};
