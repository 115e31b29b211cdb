//! Error types for the meetup API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use whenfree_store::AccessError;

/// Errors that can occur in the meetup API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request carried no usable `X-User-Token` header.
    #[error("missing user token")]
    Unauthenticated,

    /// The requested meetup does not exist (or is being concealed).
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller's token is not on the meetup's invite list.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The request body could not be decoded.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The route exists but has no defined behavior yet.
    #[error("not implemented: {0}")]
    Unsupported(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<AccessError> for ApiError {
    fn from(error: AccessError) -> Self {
        match error {
            AccessError::NotFound(id) => Self::NotFound(format!("meetup {id}")),
            AccessError::Forbidden(id) => Self::Forbidden(format!("meetup {id}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Self::MalformedInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Unsupported(msg) => (StatusCode::NOT_IMPLEMENTED, msg.clone()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
