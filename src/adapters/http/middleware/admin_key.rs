//! Shared-key guard for operator endpoints.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use super::super::billing::dto::ErrorResponse;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Rejects requests whose `X-Admin-Key` header does not match the
/// configured key.
pub async fn require_admin_key(
    State(expected): State<SecretString>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();

    if keys_match(presented, expected.expose_secret()) {
        next.run(request).await
    } else {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request");
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("UNAUTHENTICATED", "Admin key required")),
        )
            .into_response()
    }
}

fn keys_match(presented: &str, expected: &str) -> bool {
    !presented.is_empty() && presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
