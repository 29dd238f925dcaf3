//! Infrastructure error types
//!
//! These cover process-level failures (configuration, storage connections,
//! seed files). Request-level failures use the HTTP taxonomy in
//! [`crate::handlers::HttpError`] instead.

use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type alias using the infrastructure error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for startup and shutdown paths
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Database connection or schema error
    #[error("Database error: {0}")]
    Database(Box<sqlx::Error>),

    /// Repository operation failed outside of a request
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Seed file could not be read or parsed
    #[error("Seed error: {0}")]
    Seed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Database(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Seed(err.to_string())
    }
}
