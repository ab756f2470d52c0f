use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde_json::{Map, Value};

use crate::codec;
use crate::core::{Entity, EntityPage, RemoteCollection, Result, StoreError};
use crate::store::RemoteStore;
use super::DataProvider;

/// Read-only provider over a specialized remote collection (CI pipelines,
/// the ref list, the commit log).
///
/// Pagination is passed through to the store. Records keep their own field
/// shapes, normalized to camelCase; the entity id comes from the
/// collection's id field. Write operations are rejected via the trait's
/// defaults.
pub struct RemoteCollectionProvider {
    store: Arc<dyn RemoteStore>,
    collection: RemoteCollection,
}

impl RemoteCollectionProvider {
    pub fn new(store: Arc<dyn RemoteStore>, collection: RemoteCollection) -> Self {
        Self { store, collection }
    }

    /// Turn one upstream record into an entity: camelCase the fields and
    /// inject the id
    fn to_entity(&self, record: Map<String, Value>) -> Result<Entity> {
        let id = match record.get(self.collection.id_field()) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(StoreError::Decode(format!(
                    "collection record has no usable {} field",
                    self.collection.id_field()
                )))
            }
        };

        let mut fields = codec::camel_case_keys(record);
        fields.insert("id".to_string(), Value::String(id));
        Ok(fields)
    }
}

#[async_trait]
impl DataProvider for RemoteCollectionProvider {
    async fn list(&self, page: u64, per_page: u64) -> Result<EntityPage> {
        let listed = self
            .store
            .list_collection_page(self.collection, page, per_page)
            .await?;

        // Keyset-paginated listings omit the total; estimate from the
        // window already consumed
        let total = listed.total.unwrap_or_else(|| {
            page.saturating_sub(1).saturating_mul(per_page) + listed.records.len() as u64
        }) as usize;

        let data = listed
            .records
            .into_iter()
            .map(|record| self.to_entity(record))
            .collect::<Result<Vec<_>>>()?;
        Ok(EntityPage { data, total })
    }

    async fn get_one(&self, id: &str) -> Result<Entity> {
        let record = self.store.read_collection_item(self.collection, id).await?;
        self.to_entity(record)
    }

    async fn get_many(&self, ids: &[String]) -> Result<Vec<Entity>> {
        let records = try_join_all(
            ids.iter()
                .map(|id| self.store.read_collection_item(self.collection, id)),
        )
        .await?;
        records
            .into_iter()
            .map(|record| self.to_entity(record))
            .collect()
    }
}
