//! Error types for the Observer API server.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use storesim_core::{AccidentError, StoreError};

/// Errors that can occur in the Observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request body or path was malformed or incomplete.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request conflicts with the current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ObserverError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateCustomer { .. } => Self::Conflict(err.to_string()),
            StoreError::IntakeClosed { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<AccidentError> for ObserverError {
    fn from(err: AccidentError) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use storesim_types::CustomerId;

    use super::*;

    fn status_of(err: ObserverError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn store_errors_map_to_status_codes() {
        let duplicate = StoreError::DuplicateCustomer {
            id: CustomerId::new(1),
        };
        let closed = StoreError::IntakeClosed {
            id: CustomerId::new(1),
        };
        assert_eq!(status_of(duplicate.into()), StatusCode::CONFLICT);
        assert_eq!(status_of(closed.into()), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn every_variant_has_a_status() {
        assert_eq!(status_of(ObserverError::NotFound("x".to_owned())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ObserverError::InvalidRequest("x".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AccidentError::AlreadyRunning.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ObserverError::Internal("x".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
