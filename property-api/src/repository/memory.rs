//! Process-local repository backed by an ordered map

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::Pagination;
use super::predicate::CompiledPredicate;
use super::traits::{PropertyRepository, RepositoryResult};
use crate::models::{Property, PropertyFields, PropertyId};

#[derive(Debug, Default)]
struct Store {
    rows: BTreeMap<PropertyId, Property>,
    last_id: PropertyId,
}

/// In-memory [`PropertyRepository`]
///
/// Clones share the same underlying store. Ids are assigned from a
/// monotonically increasing sequence that never reuses deleted ids.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPropertyRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryPropertyRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.store.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.rows.is_empty()
    }
}

impl PropertyRepository for InMemoryPropertyRepository {
    async fn find_and_count(
        &self,
        predicate: &CompiledPredicate,
        pagination: Pagination,
    ) -> RepositoryResult<(Vec<Property>, u64)> {
        let store = self.store.read().await;
        let matching: Vec<&Property> = store
            .rows
            .values()
            .filter(|property| predicate.matches(property))
            .collect();

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.limit())
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn find_one_or_fail(&self, id: PropertyId) -> RepositoryResult<Property> {
        self.store
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("Property", id.to_string()))
    }

    async fn exists(&self, id: PropertyId) -> RepositoryResult<bool> {
        Ok(self.store.read().await.rows.contains_key(&id))
    }

    async fn save(
        &self,
        id: Option<PropertyId>,
        fields: PropertyFields,
    ) -> RepositoryResult<Property> {
        let mut store = self.store.write().await;
        let id = match id {
            Some(id) => id,
            None => store.last_id.checked_add(1).ok_or_else(|| {
                RepositoryError::database_error(RepositoryOperation::Save, "id sequence exhausted")
            })?,
        };
        store.last_id = store.last_id.max(id);

        let property = fields.with_id(id);
        store.rows.insert(id, property.clone());
        Ok(property)
    }

    async fn delete(&self, id: PropertyId) -> RepositoryResult<()> {
        self.store.write().await.rows.remove(&id);
        Ok(())
    }
}
