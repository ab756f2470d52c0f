use serde_json::{Map, Value};

use super::error::{Result, StoreError};

/// A decoded structured record exposed to the UI, one per stored file.
///
/// Entities are free-form JSON objects plus one required `id` field. The id
/// always equals the file's repository path and is injected at decode time;
/// it is the sole join key between storage and domain model.
pub type Entity = Map<String, Value>;

/// One window of a listed collection: the requested page of entities plus
/// the total number of entities in the collection.
#[derive(Clone, Debug, Default)]
pub struct EntityPage {
    pub data: Vec<Entity>,
    pub total: usize,
}

/// Kinds of entries a repository tree listing can contain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// File content
    Blob,
    /// Directory
    Tree,
}

impl EntryKind {
    /// Convert to the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Blob => "blob",
            EntryKind::Tree => "tree",
        }
    }

    /// Convert from the wire representation
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(EntryKind::Blob),
            "tree" => Ok(EntryKind::Tree),
            _ => Err(StoreError::Decode(format!("invalid tree entry kind: {}", s))),
        }
    }
}

/// One row of a repository tree listing.
///
/// Produced by the store client, consumed by tree aggregation and the entity
/// provider; never persisted, its lifetime is a single list operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path of the entry relative to the repository root
    pub path: String,

    /// Whether the entry is a file or a directory
    pub kind: EntryKind,

    /// File mode bits as reported by the repository
    pub mode: String,
}

/// One page of a tree listing together with the page count the store
/// reported for the whole listing.
///
/// `total_pages` is 0 when the response carried no usable page-count
/// metadata; callers treat that as "no additional pages".
#[derive(Clone, Debug, Default)]
pub struct TreePage {
    pub entries: Vec<TreeEntry>,
    pub total_pages: u64,
}

/// Transfer encoding of fetched file content
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferEncoding {
    /// Content is base64 text, possibly wrapped in whitespace
    Base64,
    /// Content is plain UTF-8 text
    Text,
}

impl TransferEncoding {
    /// Convert from the wire representation
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "base64" => Ok(TransferEncoding::Base64),
            "text" => Ok(TransferEncoding::Text),
            _ => Err(StoreError::Decode(format!(
                "unsupported transfer encoding: {}",
                s
            ))),
        }
    }
}

/// A raw fetched file, as returned by the store client.
///
/// Ephemeral: produced by a read call and consumed immediately by the codec.
#[derive(Clone, Debug)]
pub struct FileRecord {
    /// Path of the file relative to the repository root
    pub path: String,

    /// Encoded file content
    pub content: String,

    /// How `content` is encoded
    pub encoding: TransferEncoding,

    /// Blob id of the content, when the store reports it
    pub blob_id: Option<String>,

    /// Id of the last commit that touched the file, when reported
    pub last_commit_id: Option<String>,
}

/// A pending write against the repository.
///
/// Every list of actions handed to the commit batcher is applied as one
/// atomic commit: either all actions land or none do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitAction {
    /// Create a new file with the given content
    Create { path: String, content: String },
    /// Overwrite an existing file with the given content
    Update { path: String, content: String },
    /// Remove a file
    Delete { path: String },
}

impl CommitAction {
    /// Path the action applies to
    pub fn path(&self) -> &str {
        match self {
            CommitAction::Create { path, .. } => path,
            CommitAction::Update { path, .. } => path,
            CommitAction::Delete { path } => path,
        }
    }
}

/// The specialized read-only collections a resource name can be bound to.
///
/// These are backed by remote collections other than the file tree (CI
/// pipelines, the ref list, the commit log) and expose only read semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemoteCollection {
    Pipelines,
    Branches,
    Commits,
}

impl RemoteCollection {
    /// The upstream field that becomes the entity id for this collection
    pub fn id_field(&self) -> &'static str {
        match self {
            RemoteCollection::Pipelines => "id",
            RemoteCollection::Branches => "name",
            RemoteCollection::Commits => "id",
        }
    }
}

/// One page of a specialized remote collection: the raw records plus the
/// totals the store reported in response metadata.
///
/// `total` is absent when the store omitted it (keyset-paginated listings);
/// `total_pages` falls back to 0 as for tree listings.
#[derive(Clone, Debug, Default)]
pub struct CollectionPage {
    pub records: Vec<Map<String, Value>>,
    pub total: Option<u64>,
    pub total_pages: u64,
}
