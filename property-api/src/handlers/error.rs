//! HTTP-facing error taxonomy
//!
//! [`HttpError`] is the closed set of failures a client can observe. Service
//! operations return [`PropertyError`], which is either already classified or
//! an unclassified storage failure; the `From<PropertyError> for HttpError`
//! conversion is the only place the latter is rewritten to a generic 500.
//!
//! # Example
//!
//! ```rust
//! use property_api::handlers::{HttpError, HttpErrorKind};
//!
//! let error = HttpError::not_found("Property with id 9 not found");
//! assert_eq!(error.kind, HttpErrorKind::NotFound);
//! assert_eq!(error.to_string(), "Error 404: Property with id 9 not found");
//! ```

use std::any::Any;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::repository::RepositoryError;

/// Message used for invalid list filters
pub const FILTER_VALIDATION_MESSAGE: &str = "Bad request";

/// Message used for invalid create / update bodies
pub const BODY_VALIDATION_MESSAGE: &str = "Bad Request";

/// The only message an internal error ever exposes
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Category of HTTP error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpErrorKind {
    /// Input failed validation
    Validation,
    /// Addressed record does not exist
    NotFound,
    /// Anything else
    Internal,
}

impl fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

impl HttpErrorKind {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Numeric status code as reported in response bodies
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }
}

/// A classified failure with a stable status code and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    pub kind: HttpErrorKind,
    /// User-facing message, without the `Error <code>:` prefix
    pub message: String,
    /// Ordered violations; only ever non-empty for validation errors
    pub errors: Vec<String>,
}

impl HttpError {
    /// Validation failure carrying every violation
    pub fn validation(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            kind: HttpErrorKind::Validation,
            message: message.into(),
            errors,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: HttpErrorKind::NotFound,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Generic internal error; never carries detail about the cause
    #[must_use]
    pub fn internal() -> Self {
        Self {
            kind: HttpErrorKind::Internal,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            errors: Vec::new(),
        }
    }

    /// Not-found error for a property id as written by the client
    pub fn property_not_found(id: impl fmt::Display) -> Self {
        Self::not_found(format!("Property with id {} not found", id))
    }

    #[must_use]
    pub const fn code(&self) -> u16 {
        self.kind.code()
    }

    /// JSON body for this error
    ///
    /// `errors` is only present for validation errors.
    #[must_use]
    pub fn to_response_body(&self) -> HttpErrorBody {
        HttpErrorBody {
            code: self.code(),
            message: self.to_string(),
            errors: (self.kind == HttpErrorKind::Validation).then(|| self.errors.clone()),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {}: {}", self.code(), self.message)
    }
}

impl std::error::Error for HttpError {}

/// Serialized error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub errors: Option<Vec<String>>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        match self.kind {
            HttpErrorKind::Internal => tracing::error!(kind = %self.kind, "{}", self),
            _ => tracing::warn!(
                kind = %self.kind,
                violations = self.errors.len(),
                "{}", self
            ),
        }

        (status, Json(self.to_response_body())).into_response()
    }
}

/// Outcome of a failed service operation
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    /// Already mapped to a client-facing error
    #[error(transparent)]
    Classified(#[from] HttpError),

    /// Storage failure the service could not classify
    #[error(transparent)]
    Unclassified(#[from] RepositoryError),
}

impl From<PropertyError> for HttpError {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::Classified(error) => error,
            PropertyError::Unclassified(source) => {
                tracing::error!(
                    operation = %source.operation,
                    kind = %source.kind,
                    "Unclassified failure rewritten to internal error: {}", source
                );
                Self::internal()
            }
        }
    }
}

impl IntoResponse for PropertyError {
    fn into_response(self) -> Response {
        HttpError::from(self).into_response()
    }
}

/// Render a handler panic as the generic internal error
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "Handler panicked");

    HttpError::internal().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryOperation;

    #[test]
    fn test_status_codes() {
        assert_eq!(HttpErrorKind::Validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(HttpErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(HttpErrorKind::Internal.code(), 500);
    }

    #[test]
    fn test_validation_body_includes_errors() {
        let error = HttpError::validation(
            BODY_VALIDATION_MESSAGE,
            vec!["price must be a positive number".to_string()],
        );

        let body = serde_json::to_value(error.to_response_body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "code": 400,
                "message": "Error 400: Bad Request",
                "errors": ["price must be a positive number"],
            })
        );
    }

    #[test]
    fn test_not_found_body_omits_errors() {
        let body = serde_json::to_value(HttpError::property_not_found(12).to_response_body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "code": 404,
                "message": "Error 404: Property with id 12 not found",
            })
        );
    }

    #[test]
    fn test_classified_error_passes_through() {
        let original = HttpError::validation(FILTER_VALIDATION_MESSAGE, vec!["x".to_string()]);
        let converted = HttpError::from(PropertyError::from(original.clone()));
        assert_eq!(converted, original);
    }

    #[test]
    fn test_unclassified_error_discards_detail() {
        let source = RepositoryError::database_error(
            RepositoryOperation::FindAndCount,
            "connection to 10.0.0.3 refused",
        );
        let converted = HttpError::from(PropertyError::from(source));

        assert_eq!(converted, HttpError::internal());
        assert_eq!(converted.to_string(), "Error 500: Internal server error");
        assert!(converted.errors.is_empty());
    }

    #[test]
    fn test_panic_response_is_internal_error() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
