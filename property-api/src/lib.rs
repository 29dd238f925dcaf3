//! # property-api
//!
//! HTTP API for listing, filtering and maintaining property records.
//!
//! ## Features
//!
//! - **Validation**: declarative per-field rule tables with aggregated, ordered violations
//! - **Filtering**: query parameters compiled into equality and range predicates
//! - **Error taxonomy**: validation (400), not found (404) and a generic internal error (500)
//!   that never leaks the underlying cause
//! - **Storage**: in-memory or SQLite repositories behind one trait
//! - **Operations**: layered configuration, JSON tracing, request IDs, graceful shutdown
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use property_api::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let store = PropertyStore::open(&config.storage).await?;
//!     let service = Arc::new(PropertyService::new(store, config.pagination));
//!
//!     Server::new(config).serve(router(service)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repository;
pub mod seed;
pub mod server;
pub mod service;
pub mod validation;

/// Commonly used types
pub mod prelude {
    pub use crate::config::{Config, PaginationConfig, StorageBackend, StorageConfig};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{app, router, HttpError, HttpErrorKind, PropertyError};
    pub use crate::models::{PageRequest, Property, PropertyFields, PropertyFilter, PropertyId};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::repository::{
        CompiledPredicate, InMemoryPropertyRepository, Pagination, Predicate, PropertyRepository,
        PropertyStore, RepositoryError, SqlitePropertyRepository,
    };
    pub use crate::seed::{load_seed, seed_repository};
    pub use crate::server::Server;
    pub use crate::service::{DeleteResult, PaginatedResult, PropertyService};

    pub use axum::Router;
    pub use tracing::{debug, error, info, instrument, warn};
}
