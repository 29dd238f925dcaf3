//! HTTP routes for the property resource
//!
//! | Method   | Path               | Success body                         |
//! |----------|--------------------|--------------------------------------|
//! | `GET`    | `/properties`      | `{properties, total, page, perPage}` |
//! | `GET`    | `/properties/{id}` | property                             |
//! | `POST`   | `/properties`      | created property                     |
//! | `PUT`    | `/properties/{id}` | updated property                     |
//! | `DELETE` | `/properties/{id}` | `{success: true}`                    |
//!
//! All successes are `200 OK`; failures render through [`HttpError`].

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use tower_http::catch_panic::CatchPanicLayer;

use super::error::{panic_response, HttpError, BODY_VALIDATION_MESSAGE, FILTER_VALIDATION_MESSAGE};
use crate::models::{Property, PropertyId};
use crate::repository::PropertyRepository;
use crate::service::{DeleteResult, PaginatedResult, PropertyService};
use crate::validation::coerce_number;

type HandlerResult<T> = std::result::Result<Json<T>, HttpError>;

type ServiceState<R> = State<Arc<PropertyService<R>>>;

/// Property routes without any middleware
pub fn router<R>(service: Arc<PropertyService<R>>) -> Router
where
    R: PropertyRepository + 'static,
{
    Router::new()
        .route(
            "/properties",
            get(list_properties::<R>).post(create_property::<R>),
        )
        .route(
            "/properties/{id}",
            get(get_property::<R>)
                .put(update_property::<R>)
                .delete(delete_property::<R>),
        )
        .with_state(service)
}

/// Property routes with panics rendered as the generic internal error
pub fn app<R>(service: Arc<PropertyService<R>>) -> Router
where
    R: PropertyRepository + 'static,
{
    router(service).layer(CatchPanicLayer::custom(panic_response))
}

async fn list_properties<R: PropertyRepository>(
    State(service): ServiceState<R>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> HandlerResult<PaginatedResult> {
    let Query(query) = query.map_err(|rejection| {
        HttpError::validation(FILTER_VALIDATION_MESSAGE, vec![rejection.body_text()])
    })?;

    Ok(Json(service.list_from_query(&query).await?))
}

async fn get_property<R: PropertyRepository>(
    State(service): ServiceState<R>,
    Path(id): Path<String>,
) -> HandlerResult<Property> {
    let id = parse_id(&id)?;
    Ok(Json(service.get_by_id(id).await?))
}

async fn create_property<R: PropertyRepository>(
    State(service): ServiceState<R>,
    body: Result<Json<Value>, JsonRejection>,
) -> HandlerResult<Property> {
    let input = json_object(body)?;
    Ok(Json(service.create(&input).await?))
}

async fn update_property<R: PropertyRepository>(
    State(service): ServiceState<R>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> HandlerResult<Property> {
    let id = parse_id(&id)?;
    let input = json_object(body)?;
    Ok(Json(service.update(id, &input).await?))
}

async fn delete_property<R: PropertyRepository>(
    State(service): ServiceState<R>,
    Path(id): Path<String>,
) -> HandlerResult<DeleteResult> {
    let id = parse_id(&id)?;
    Ok(Json(service.delete(id).await?))
}

/// Path ids are read as numbers, so `1.0` addresses record 1
///
/// Anything that is not a whole number in id range can never match a record.
fn parse_id(raw: &str) -> Result<PropertyId, HttpError> {
    coerce_number(&Value::String(raw.to_string()))
        .filter(|n| n.fract() == 0.0 && *n >= PropertyId::MIN as f64 && *n < PropertyId::MAX as f64)
        .map(|n| n as PropertyId)
        .ok_or_else(|| HttpError::property_not_found(raw))
}

fn json_object(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, HttpError> {
    match body {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(_) => Err(body_error()),
        Err(rejection) => {
            tracing::debug!(rejection = %rejection.body_text(), "Rejected request body");
            Err(body_error())
        }
    }
}

fn body_error() -> HttpError {
    HttpError::validation(
        BODY_VALIDATION_MESSAGE,
        vec!["body must be a JSON object".to_string()],
    )
}
