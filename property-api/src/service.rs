//! Property service: validation, filter compilation and repository calls
//!
//! Every operation validates first and only then touches storage, except
//! `update` and `delete`, which confirm the record exists before anything else.
//! Failures come back as [`PropertyError`]: classified errors are returned as
//! they are, storage failures stay unclassified for the HTTP boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::config::PaginationConfig;
use crate::handlers::{HttpError, PropertyError, BODY_VALIDATION_MESSAGE, FILTER_VALIDATION_MESSAGE};
use crate::models::{PageRequest, Property, PropertyFields, PropertyFilter, PropertyId};
use crate::repository::{Pagination, PropertyRepository};

/// Result type for service operations
pub type ServiceResult<T> = std::result::Result<T, PropertyError>;

/// One page of a filtered listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult {
    pub properties: Vec<Property>,
    /// Matches before pagination
    pub total: u64,
    pub page: i64,
    pub per_page: i64,
}

/// Body returned by a successful delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
}

/// Business operations over a [`PropertyRepository`]
#[derive(Debug, Clone)]
pub struct PropertyService<R> {
    repository: R,
    pagination: PaginationConfig,
}

impl<R: PropertyRepository> PropertyService<R> {
    pub fn new(repository: R, pagination: PaginationConfig) -> Self {
        Self {
            repository,
            pagination,
        }
    }

    /// List properties from raw query parameters
    ///
    /// Filter violations come first, then pagination violations, all in a
    /// single `"Bad request"` validation error.
    #[instrument(skip(self))]
    pub async fn list_from_query(&self, query: &HashMap<String, String>) -> ServiceResult<PaginatedResult> {
        let filter = PropertyFilter::from_query(query);
        let page = PageRequest::from_query(query);

        let (filter, page) = match (filter, page) {
            (Ok(filter), Ok(page)) => (filter, page),
            (filter, page) => {
                let violations: Vec<String> = filter
                    .err()
                    .into_iter()
                    .chain(page.err())
                    .flatten()
                    .collect();
                return Err(HttpError::validation(FILTER_VALIDATION_MESSAGE, violations).into());
            }
        };

        self.list(&filter, page.page, page.per_page).await
    }

    /// List properties matching an already validated filter
    ///
    /// `page` and `per_page` default from configuration and are echoed back
    /// unchanged.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &PropertyFilter,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> ServiceResult<PaginatedResult> {
        let page = page.unwrap_or(self.pagination.default_page);
        let per_page = per_page.unwrap_or(self.pagination.default_per_page);

        let predicate = filter.compile();
        tracing::debug!(%predicate, page, per_page, "Listing properties");

        let (properties, total) = self
            .repository
            .find_and_count(&predicate, Pagination::page(page, per_page))
            .await?;

        Ok(PaginatedResult {
            properties,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: PropertyId) -> ServiceResult<Property> {
        match self.repository.find_one_or_fail(id).await {
            Ok(property) => Ok(property),
            Err(err) if err.is_not_found() => Err(HttpError::property_not_found(id).into()),
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &Map<String, Value>) -> ServiceResult<Property> {
        let fields = validate_body(input)?;
        let property = self.repository.save(None, fields).await?;

        tracing::info!(id = property.id, "Created property");
        Ok(property)
    }

    /// Replace the property `id`
    ///
    /// The existence check runs before validation, so a missing id is a 404
    /// even when the body is invalid. Any `id` in the body is ignored; the
    /// record is always stored under the path id.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: PropertyId, input: &Map<String, Value>) -> ServiceResult<Property> {
        self.ensure_exists(id).await?;
        let fields = validate_body(input)?;

        let property = self.repository.save(Some(id), fields).await?;
        tracing::info!(id, "Updated property");
        Ok(property)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: PropertyId) -> ServiceResult<DeleteResult> {
        self.ensure_exists(id).await?;
        self.repository.delete(id).await?;

        tracing::info!(id, "Deleted property");
        Ok(DeleteResult { success: true })
    }

    async fn ensure_exists(&self, id: PropertyId) -> ServiceResult<()> {
        if self.repository.exists(id).await? {
            Ok(())
        } else {
            Err(HttpError::property_not_found(id).into())
        }
    }
}

fn validate_body(input: &Map<String, Value>) -> ServiceResult<PropertyFields> {
    PropertyFields::from_input(input)
        .map_err(|violations| HttpError::validation(BODY_VALIDATION_MESSAGE, violations).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HttpErrorKind;
    use crate::repository::{
        CompiledPredicate, InMemoryPropertyRepository, RepositoryError, RepositoryOperation,
        RepositoryResult,
    };
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn service() -> PropertyService<InMemoryPropertyRepository> {
        PropertyService::new(InMemoryPropertyRepository::new(), PaginationConfig::default())
    }

    fn valid_body() -> Map<String, Value> {
        object(json!({
            "address": "Test property",
            "price": 20000,
            "bedrooms": 1,
            "bathrooms": 1,
            "type": "Apartment",
        }))
    }

    fn invalid_body() -> Map<String, Value> {
        object(json!({
            "address": "Test property",
            "price": "price",
            "bedrooms": -1,
            "bathrooms": -1,
            "type": "Apartment",
        }))
    }

    fn classified(err: PropertyError) -> HttpError {
        match err {
            PropertyError::Classified(error) => error,
            PropertyError::Unclassified(source) => panic!("expected classified error, got {source}"),
        }
    }

    /// Repository whose every call fails, or reports records as present
    struct FailingRepository {
        exists: bool,
    }

    impl PropertyRepository for FailingRepository {
        async fn find_and_count(
            &self,
            _predicate: &CompiledPredicate,
            _pagination: Pagination,
        ) -> RepositoryResult<(Vec<Property>, u64)> {
            Err(RepositoryError::database_error(RepositoryOperation::FindAndCount, "table is locked"))
        }

        async fn find_one_or_fail(&self, _id: PropertyId) -> RepositoryResult<Property> {
            Err(RepositoryError::database_error(RepositoryOperation::FindById, "table is locked"))
        }

        async fn exists(&self, _id: PropertyId) -> RepositoryResult<bool> {
            Ok(self.exists)
        }

        async fn save(&self, _id: Option<PropertyId>, _fields: PropertyFields) -> RepositoryResult<Property> {
            Err(RepositoryError::database_error(RepositoryOperation::Save, "disk full"))
        }

        async fn delete(&self, _id: PropertyId) -> RepositoryResult<()> {
            Err(RepositoryError::database_error(RepositoryOperation::Delete, "disk full"))
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let service = service();
        let property = service.create(&valid_body()).await.unwrap();

        assert_eq!(property.id, 1);
        assert_eq!(service.get_by_id(1).await.unwrap(), property);
    }

    #[tokio::test]
    async fn test_create_reports_all_violations() {
        let error = classified(service().create(&invalid_body()).await.unwrap_err());

        assert_eq!(error.kind, HttpErrorKind::Validation);
        assert_eq!(error.to_string(), "Error 400: Bad Request");
        assert_eq!(
            error.errors,
            vec![
                "price must be a positive number",
                "bedrooms must be a positive number",
                "bathrooms must be a positive number",
            ]
        );
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let error = classified(service().get_by_id(42).await.unwrap_err());
        assert_eq!(error, HttpError::not_found("Property with id 42 not found"));
    }

    #[tokio::test]
    async fn test_update_missing_precedes_validation() {
        let error = classified(service().update(7, &invalid_body()).await.unwrap_err());
        assert_eq!(error.kind, HttpErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_pins_path_id() {
        let service = service();
        let created = service.create(&valid_body()).await.unwrap();

        let mut body = valid_body();
        body.insert("id".to_string(), json!(999));
        body.insert("bedrooms".to_string(), json!(4));

        let updated = service.update(created.id, &body).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.bedrooms, 4);
        assert!(classified(service.get_by_id(999).await.unwrap_err()).kind == HttpErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_ignores_malformed_body_id() {
        let service = service();
        let created = service.create(&valid_body()).await.unwrap();

        let mut body = valid_body();
        body.insert("id".to_string(), json!("not-a-number"));

        let updated = service.update(created.id, &body).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(service.repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_existing_with_invalid_body() {
        let service = service();
        let created = service.create(&valid_body()).await.unwrap();

        let error = classified(service.update(created.id, &invalid_body()).await.unwrap_err());
        assert_eq!(error.kind, HttpErrorKind::Validation);
        assert_eq!(error.errors.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let service = service();
        let created = service.create(&valid_body()).await.unwrap();

        assert_eq!(service.delete(created.id).await.unwrap(), DeleteResult { success: true });
        let error = classified(service.delete(created.id).await.unwrap_err());
        assert_eq!(error.kind, HttpErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_echoes_pagination() {
        let service = service();
        for _ in 0..3 {
            service.create(&valid_body()).await.unwrap();
        }

        let result = service
            .list(&PropertyFilter::default(), Some(2), Some(2))
            .await
            .unwrap();
        assert_eq!(result.total, 3);
        assert_eq!(result.properties.len(), 1);
        assert_eq!((result.page, result.per_page), (2, 2));

        let result = service.list(&PropertyFilter::default(), None, None).await.unwrap();
        assert_eq!((result.page, result.per_page), (1, 10));
    }

    #[tokio::test]
    async fn test_list_from_query_merges_violations() {
        let query: HashMap<String, String> = [("minPrice", "abc"), ("perPage", "x")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let error = classified(service().list_from_query(&query).await.unwrap_err());
        assert_eq!(error.to_string(), "Error 400: Bad request");
        assert_eq!(
            error.errors,
            vec!["minPrice must be a positive number", "perPage must be an integer number"]
        );
    }

    #[tokio::test]
    async fn test_storage_failures_stay_unclassified() {
        let service = PropertyService::new(FailingRepository { exists: true }, PaginationConfig::default());

        let err = service.list(&PropertyFilter::default(), None, None).await.unwrap_err();
        assert!(matches!(err, PropertyError::Unclassified(_)));

        let err = service.get_by_id(1).await.unwrap_err();
        assert!(matches!(err, PropertyError::Unclassified(_)));

        let err = service.create(&valid_body()).await.unwrap_err();
        assert!(matches!(err, PropertyError::Unclassified(_)));

        let err = service.delete(1).await.unwrap_err();
        assert!(matches!(err, PropertyError::Unclassified(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_with_failing_repository_is_not_found() {
        let service = PropertyService::new(FailingRepository { exists: false }, PaginationConfig::default());
        let error = classified(service.delete(1).await.unwrap_err());
        assert_eq!(error.kind, HttpErrorKind::NotFound);
    }
}
