//! Error types for the Petfinder client.
//!
//! # Design
//! `Unauthorized` and `NotFound` get dedicated variants: the host invalidates
//! its cached token on the former, and the detail view reports the latter.
//! Every other non-2xx response lands in `HttpError` with the raw status and
//! body for debugging.

use thiserror::Error;

/// Errors returned by `PetfinderClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 401: credentials rejected or bearer token expired.
    #[error("unauthorized")]
    Unauthorized,

    /// The server returned 404: the requested animal does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 401 or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
