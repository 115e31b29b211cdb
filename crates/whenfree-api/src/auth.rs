//! Bearer-token authentication for meetup routes.
//!
//! Every meetup request must carry a non-empty `X-User-Token` header.
//! [`require_user_token`] rejects requests without one before any handler
//! runs. It only checks presence; whether the token may see a particular
//! meetup is decided by the store.
//!
//! Tokens are limited to visible ASCII. A header value containing any
//! other byte is treated as if no token had been sent.

use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use whenfree_types::UserToken;

use crate::error::ApiError;

/// Header carrying the caller's capability token.
pub const USER_TOKEN_HEADER: &str = "x-user-token";

/// Extract the caller's token, if a usable one was sent.
///
/// Missing headers, empty values, and values that are not visible ASCII
/// all count as no token.
pub fn user_token(headers: &HeaderMap) -> Option<UserToken> {
    headers
        .get(USER_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
        .map(UserToken::from)
}

/// Middleware rejecting requests that carry no user token with `401`.
pub async fn require_user_token(request: Request, next: Next) -> Result<Response, ApiError> {
    if user_token(request.headers()).is_none() {
        tracing::debug!(uri = %request.uri(), "Rejected request without user token");
        return Err(ApiError::Unauthenticated);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn reads_the_token_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-User-Token", HeaderValue::from_static("t1"));
        assert_eq!(user_token(&headers), Some(UserToken::from("t1")));
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(user_token(&headers), None);
        headers.insert(USER_TOKEN_HEADER, HeaderValue::from_static(""));
        assert_eq!(user_token(&headers), None);
    }

    #[test]
    fn opaque_bytes_are_not_a_token() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_TOKEN_HEADER, HeaderValue::from_bytes(b"t\xff1").unwrap());
        assert_eq!(user_token(&headers), None);
    }
}
