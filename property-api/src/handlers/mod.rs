//! HTTP boundary: error taxonomy and property routes

mod error;
mod routes;

pub use error::{
    panic_response, HttpError, HttpErrorBody, HttpErrorKind, PropertyError,
    BODY_VALIDATION_MESSAGE, FILTER_VALIDATION_MESSAGE, INTERNAL_ERROR_MESSAGE,
};
pub use routes::{app, router};
