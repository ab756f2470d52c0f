//! Atomic write batching.
//!
//! A batch collects any number of independent file actions and issues them
//! as exactly one commit against the configured ref. Atomicity of the
//! multi-action commit is the store's contract; this layer only guarantees
//! that a logical mutation is never split across commits.

use crate::core::{CommitAction, Result};
use crate::store::RemoteStore;

/// Builder for one atomic multi-file commit
#[derive(Clone, Debug)]
pub struct CommitBatch {
    message: String,
    actions: Vec<CommitAction>,
}

impl CommitBatch {
    /// Start an empty batch with the given commit message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            actions: Vec::new(),
        }
    }

    /// Add a file creation
    pub fn create(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.actions.push(CommitAction::Create {
            path: path.into(),
            content: content.into(),
        });
        self
    }

    /// Add a file overwrite
    pub fn update(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.actions.push(CommitAction::Update {
            path: path.into(),
            content: content.into(),
        });
        self
    }

    /// Add a file removal
    pub fn delete(mut self, path: impl Into<String>) -> Self {
        self.actions.push(CommitAction::Delete { path: path.into() });
        self
    }

    /// Number of actions collected so far
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the batch holds no actions
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Issue the batch as a single commit.
    ///
    /// Exactly one write call reaches the store per batch; any error aborts
    /// the whole logical mutation.
    pub async fn send(self, store: &dyn RemoteStore) -> Result<()> {
        log::info!(
            "committing {} file action(s): {}",
            self.actions.len(),
            self.message
        );
        store.write_commit(&self.message, &self.actions).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_collects_actions_in_order() {
        let batch = CommitBatch::new("Delete many")
            .delete("data/users/a")
            .delete("data/users/b")
            .create("data/users/c", "{}");

        assert_eq!(batch.len(), 3);
        assert!(!batch.is_empty());
        assert_eq!(batch.actions[0].path(), "data/users/a");
        assert_eq!(batch.actions[1].path(), "data/users/b");
        assert!(matches!(batch.actions[2], CommitAction::Create { .. }));
    }

    #[test]
    fn new_batch_is_empty() {
        assert!(CommitBatch::new("Create").is_empty());
    }
}
