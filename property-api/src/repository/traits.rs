//! Repository trait definition
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) so implementations can
//! be plain `async fn`s without `async_trait`.
//!
//! # Example
//!
//! ```rust,ignore
//! use property_api::repository::{CompiledPredicate, Pagination, PropertyRepository};
//!
//! let (page, total) = repo
//!     .find_and_count(&CompiledPredicate::new(), Pagination::page(1, 10))
//!     .await?;
//! ```

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::Pagination;
use super::predicate::CompiledPredicate;
use crate::models::{Property, PropertyFields, PropertyId};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Storage port for property records
///
/// Listings are ordered by ascending id so pagination is stable.
pub trait PropertyRepository: Send + Sync {
    /// Load one page of records matching `predicate`, plus the number of
    /// matching records before pagination
    fn find_and_count(
        &self,
        predicate: &CompiledPredicate,
        pagination: Pagination,
    ) -> impl Future<Output = RepositoryResult<(Vec<Property>, u64)>> + Send;

    /// Load a record by id
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` with `NotFound` kind when no record has `id`.
    fn find_one_or_fail(
        &self,
        id: PropertyId,
    ) -> impl Future<Output = RepositoryResult<Property>> + Send;

    fn exists(&self, id: PropertyId) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Persist `fields`
    ///
    /// With `id: None` a new id is assigned. With `Some(id)` the record with
    /// that id is replaced, or inserted under that id if absent.
    fn save(
        &self,
        id: Option<PropertyId>,
        fields: PropertyFields,
    ) -> impl Future<Output = RepositoryResult<Property>> + Send;

    /// Remove the record with `id`; removing a missing record is not an error
    fn delete(&self, id: PropertyId) -> impl Future<Output = RepositoryResult<()>> + Send;
}
