//! Runtime selection between storage backends

use super::memory::InMemoryPropertyRepository;
use super::pagination::Pagination;
use super::predicate::CompiledPredicate;
use super::sqlite::SqlitePropertyRepository;
use super::traits::{PropertyRepository, RepositoryResult};
use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;
use crate::models::{Property, PropertyFields, PropertyId};

/// The repository chosen by `storage.backend`
#[derive(Debug, Clone)]
pub enum PropertyStore {
    Memory(InMemoryPropertyRepository),
    Sqlite(SqlitePropertyRepository),
}

impl PropertyStore {
    /// Open the configured backend
    pub async fn open(config: &StorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory property store");
                Ok(Self::Memory(InMemoryPropertyRepository::new()))
            }
            StorageBackend::Sqlite => Ok(Self::Sqlite(SqlitePropertyRepository::connect(config).await?)),
        }
    }

    /// Release backend resources; a no-op for the in-memory store
    pub async fn close(&self) {
        if let Self::Sqlite(repository) = self {
            repository.close().await;
            tracing::info!("SQLite connection pool closed");
        }
    }
}

impl PropertyRepository for PropertyStore {
    async fn find_and_count(
        &self,
        predicate: &CompiledPredicate,
        pagination: Pagination,
    ) -> RepositoryResult<(Vec<Property>, u64)> {
        match self {
            Self::Memory(r) => r.find_and_count(predicate, pagination).await,
            Self::Sqlite(r) => r.find_and_count(predicate, pagination).await,
        }
    }

    async fn find_one_or_fail(&self, id: PropertyId) -> RepositoryResult<Property> {
        match self {
            Self::Memory(r) => r.find_one_or_fail(id).await,
            Self::Sqlite(r) => r.find_one_or_fail(id).await,
        }
    }

    async fn exists(&self, id: PropertyId) -> RepositoryResult<bool> {
        match self {
            Self::Memory(r) => r.exists(id).await,
            Self::Sqlite(r) => r.exists(id).await,
        }
    }

    async fn save(
        &self,
        id: Option<PropertyId>,
        fields: PropertyFields,
    ) -> RepositoryResult<Property> {
        match self {
            Self::Memory(r) => r.save(id, fields).await,
            Self::Sqlite(r) => r.save(id, fields).await,
        }
    }

    async fn delete(&self, id: PropertyId) -> RepositoryResult<()> {
        match self {
            Self::Memory(r) => r.delete(id).await,
            Self::Sqlite(r) => r.delete(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_default_is_memory() {
        let store = PropertyStore::open(&StorageConfig::default()).await.unwrap();
        assert!(matches!(store, PropertyStore::Memory(_)));
        store.close().await;
    }

    #[tokio::test]
    async fn test_open_sqlite_delegates() {
        let config = StorageConfig {
            backend: StorageBackend::Sqlite,
            ..StorageConfig::default()
        };
        let store = PropertyStore::open(&config).await.unwrap();
        assert!(matches!(store, PropertyStore::Sqlite(_)));

        let fields = PropertyFields {
            address: "9 Oak".to_string(),
            price: 5.0,
            bedrooms: 1,
            bathrooms: 1,
            property_type: None,
        };
        let created = store.save(None, fields).await.unwrap();
        assert!(store.exists(created.id).await.unwrap());
        store.close().await;
    }
}
