use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde_json::Value;
use uuid::Uuid;

use crate::codec;
use crate::commit::CommitBatch;
use crate::core::{Entity, EntityPage, Result};
use crate::store::RemoteStore;
use crate::tree::aggregate_tree;
use super::DataProvider;

/// Provider for a collection of entities stored as one file each under a
/// base path.
///
/// Listing fetches the whole tree and paginates client-side: the store only
/// paginates the listing itself, not arbitrary entity windows, so one full
/// tree read per list call buys a flat list that can be sliced by absolute
/// offset. Entity ids are repository paths; new ids are
/// `<base_path>/<uuid>` with no existence check, an accepted collision risk
/// that keeps creation a single write.
pub struct EntityProvider {
    store: Arc<dyn RemoteStore>,
    base_path: String,
}

impl EntityProvider {
    /// Create a provider rooted at `base_path`
    pub fn new(store: Arc<dyn RemoteStore>, base_path: impl Into<String>) -> Self {
        Self {
            store,
            base_path: base_path.into(),
        }
    }

    /// The directory prefix this collection lives under
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn fresh_id(&self) -> String {
        format!("{}/{}", self.base_path, Uuid::new_v4())
    }
}

#[async_trait]
impl DataProvider for EntityProvider {
    async fn list(&self, page: u64, per_page: u64) -> Result<EntityPage> {
        let tree = aggregate_tree(self.store.as_ref(), &self.base_path).await?;
        let total = tree.len();

        // Window clamped to bounds: a page past the end is an empty slice,
        // not an error
        let start = (page.saturating_sub(1).saturating_mul(per_page) as usize).min(total);
        let end = start.saturating_add(per_page as usize).min(total);
        let window = &tree[start..end];

        let files = try_join_all(window.iter().map(|entry| self.store.read_file(&entry.path)))
            .await?;
        let data = files
            .iter()
            .map(codec::decode_entity)
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "listed {} of {} entities under {}",
            data.len(),
            total,
            self.base_path
        );
        Ok(EntityPage { data, total })
    }

    async fn get_one(&self, id: &str) -> Result<Entity> {
        let file = self.store.read_file(id).await?;
        codec::decode_entity(&file)
    }

    async fn get_many(&self, ids: &[String]) -> Result<Vec<Entity>> {
        let files = try_join_all(ids.iter().map(|id| self.store.read_file(id))).await?;
        files.iter().map(codec::decode_entity).collect()
    }

    async fn create(&self, data: Entity) -> Result<Entity> {
        let id = self.fresh_id();
        let mut entity = data;
        entity.insert("id".to_string(), Value::String(id.clone()));

        let content = codec::encode_entity(&entity)?;
        CommitBatch::new("Create")
            .create(id, content)
            .send(self.store.as_ref())
            .await?;
        Ok(entity)
    }

    async fn update(&self, id: &str, data: Entity) -> Result<Entity> {
        // Last writer wins: no revision check against a previously read
        // state
        let mut entity = data;
        entity.insert("id".to_string(), Value::String(id.to_string()));

        let content = codec::encode_entity(&entity)?;
        CommitBatch::new("Update")
            .update(id, content)
            .send(self.store.as_ref())
            .await?;
        Ok(entity)
    }

    async fn delete(&self, id: &str, previous_data: Entity) -> Result<Entity> {
        CommitBatch::new("Delete")
            .delete(id)
            .send(self.store.as_ref())
            .await?;
        Ok(previous_data)
    }

    async fn delete_many(&self, ids: &[String]) -> Result<Vec<String>> {
        let batch = ids
            .iter()
            .fold(CommitBatch::new("Delete many"), |batch, id| batch.delete(id));
        batch.send(self.store.as_ref()).await?;
        Ok(ids.to_vec())
    }
}
