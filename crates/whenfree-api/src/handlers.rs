//! REST endpoint handlers for the meetup API.
//!
//! Handlers decode requests, call into the shared [`Storage`] and encode
//! the outcome. Token presence on meetup routes has already been checked
//! by [`crate::auth::require_user_token`] by the time they run.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness probe, no token needed |
//! | `POST` | `/meetup` | Create a meetup with the caller as creator |
//! | `GET` | `/meetup/{uuid}` | Fetch a meetup the caller is invited to |
//! | `PATCH` | `/meetup/{uuid}` | Not implemented |
//! | `DELETE` | `/meetup/{uuid}` | Not implemented |
//!
//! [`Storage`]: whenfree_store::Storage

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use whenfree_types::{Meetup, MeetupId};

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;
use crate::views::{CreateMeetupRequest, CreatedMeetup, HealthResponse};

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ---------------------------------------------------------------------------
// POST /meetup
// ---------------------------------------------------------------------------

/// Create a meetup.
///
/// The body is `{"meetup": {...}, "person": {...}}`. Whatever invite list
/// the meetup carries is discarded; the stored meetup lists only `person`,
/// bound to the caller's `X-User-Token`. Responds with the stored meetup
/// and its new `uuid`.
///
/// The body is decoded here rather than through the `Json` extractor so
/// that a missing content type is accepted and every decoding failure
/// maps onto the same `400` error shape.
pub async fn create_meetup(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = auth::user_token(&headers).ok_or(ApiError::Unauthenticated)?;
    let request: CreateMeetupRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::MalformedInput(format!("invalid meetup request: {e}")))?;

    let (id, meetup) = state
        .storage
        .create_meetup(request.meetup, request.person, token)
        .await;

    let view = CreatedMeetup::new(id, meetup);
    Ok(Json(serde_json::to_value(view)?))
}

// ---------------------------------------------------------------------------
// /meetup/{uuid}
// ---------------------------------------------------------------------------

/// Fetch one meetup.
///
/// Only callers whose token is on the invite list may see it; an unknown
/// identifier is `404`, a known one with the wrong token `403` unless the
/// access policy conceals existence.
pub async fn get_meetup(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(uuid): Path<String>,
) -> Result<Json<Meetup>, ApiError> {
    let token = auth::user_token(&headers).ok_or(ApiError::Unauthenticated)?;
    let id = MeetupId::from(uuid);

    state
        .storage
        .get_meetup(&id, &token)
        .await
        .map(Json)
        .map_err(|e| state.access.refine(e.into()))
}

/// `PATCH /meetup/{uuid}`: updates are not supported.
pub async fn update_meetup(Path(uuid): Path<String>) -> ApiError {
    ApiError::Unsupported(format!("updating meetup {uuid}"))
}

/// `DELETE /meetup/{uuid}`: deletion is not supported.
pub async fn delete_meetup(Path(uuid): Path<String>) -> ApiError {
    ApiError::Unsupported(format!("deleting meetup {uuid}"))
}
