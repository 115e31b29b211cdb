//! Axum router construction for the meetup API.
//!
//! Assembles the routes into a single [`Router`] with CORS for browser
//! clients on any http(s) origin and token checking on meetup routes.

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the meetup server.
///
/// The router includes:
/// - `GET /health` -- liveness probe
/// - `POST /meetup` -- create a meetup
/// - `GET /meetup/{uuid}` -- fetch a meetup
/// - `PATCH /meetup/{uuid}` -- `501`
/// - `DELETE /meetup/{uuid}` -- `501`
///
/// Every `/meetup` route requires a non-empty `X-User-Token` header.
pub fn build_router(state: Arc<AppState>) -> Router {
    let meetups = Router::new()
        .route("/meetup", post(handlers::create_meetup))
        .route(
            "/meetup/{uuid}",
            get(handlers::get_meetup)
                .patch(handlers::update_meetup)
                .delete(handlers::delete_meetup),
        )
        .route_layer(middleware::from_fn(auth::require_user_token));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(meetups)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for browser clients served from any http or https origin.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            is_web_origin(origin.as_bytes())
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            HeaderName::from_static(auth::USER_TOKEN_HEADER),
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .allow_credentials(false)
}

fn is_web_origin(origin: &[u8]) -> bool {
    origin.starts_with(b"https://") || origin.starts_with(b"http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_origins_are_allowed() {
        assert!(is_web_origin(b"https://example.com"));
        assert!(is_web_origin(b"http://localhost:3000"));
        assert!(!is_web_origin(b"null"));
        assert!(!is_web_origin(b"file://"));
    }
}
