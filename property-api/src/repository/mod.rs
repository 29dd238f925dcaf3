//! Storage abstraction for property records
//!
//! # Features
//!
//! - **Port**: [`PropertyRepository`] with find-and-count, lookup, existence,
//!   upsert and delete operations
//! - **Predicates**: [`CompiledPredicate`] built from validated filters
//! - **Pagination**: [`Pagination`] skip/take derived from 1-indexed pages
//! - **Adapters**: [`InMemoryPropertyRepository`] and [`SqlitePropertyRepository`],
//!   selected at runtime through [`PropertyStore`]

mod backend;
mod error;
mod memory;
mod pagination;
mod predicate;
mod sqlite;
mod traits;

pub use backend::PropertyStore;
pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryPropertyRepository;
pub use pagination::Pagination;
pub use predicate::{CompiledPredicate, FilterValue, Predicate, PropertyField};
pub use sqlite::SqlitePropertyRepository;
pub use traits::{PropertyRepository, RepositoryResult};
