//! Access gate middleware and extractor.
//!
//! ```text
//! Request → access_gate → validates token, resolves staff + organization
//!                         + entitlement, injects AccessContext
//!                                      ↓
//!                          Handler → RequireAccess reads from extensions
//! ```
//!
//! The session token is read from `Authorization: Bearer <token>` or,
//! when that header is absent, from a `token` query parameter.

use std::collections::HashMap;

use axum::{
    extract::{Query, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::billing::{AccessContext, ResolveAccessQuery};
use crate::domain::billing::BillingError;
use crate::domain::foundation::AuthError;

use super::super::billing::{BillingApiError, BillingAppState};

/// Pulls the session token out of the request.
///
/// The Authorization header wins over the query string.
pub fn extract_session_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = from_header {
        return Some(token.to_string());
    }

    Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(mut params)| params.remove("token"))
        .filter(|t| !t.is_empty())
}

/// Middleware guarding routes that need a paying, unblocked organization
/// context.
///
/// - Missing, invalid or expired token: 401
/// - Unknown staff member or organization: 401
/// - Blocked organization: 403
/// - Session backend unavailable: 503
///
/// On success the request carries an [`AccessContext`] in its extensions.
pub async fn access_gate(
    State(state): State<BillingAppState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let Some(token) = extract_session_token(&parts) else {
        return AccessRejection::Auth(AuthError::MissingToken).into_response();
    };

    let user = match state.sessions.validate(&token).await {
        Ok(user) => user,
        Err(e) => return AccessRejection::Auth(e).into_response(),
    };

    let access = state
        .entitlement_handler()
        .resolve_access(ResolveAccessQuery { staff_id: user.id })
        .await;

    match access {
        Ok(context) => {
            parts.extensions.insert(context);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(BillingError::NotFound { entity, .. }) => {
            tracing::debug!(%entity, "Session refers to a missing record");
            AccessRejection::Auth(AuthError::UserNotFound).into_response()
        }
        Err(e) => BillingApiError(e).into_response(),
    }
}

/// Extractor for the context the access gate resolved.
///
/// Fails with 401 on routes that are not behind [`access_gate`].
#[derive(Debug, Clone)]
pub struct RequireAccess(pub AccessContext);

impl<S> axum::extract::FromRequestParts<S> for RequireAccess
where
    S: Send + Sync,
{
    type Rejection = AccessRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AccessContext>()
                .cloned()
                .map(RequireAccess)
                .ok_or(AccessRejection::Auth(AuthError::MissingToken))
        })
    }
}

/// Rejection type for the access gate.
#[derive(Debug, Clone)]
pub enum AccessRejection {
    Auth(AuthError),
}

impl IntoResponse for AccessRejection {
    fn into_response(self) -> Response {
        let AccessRejection::Auth(err) = self;
        let (status, message) = match &err {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::UserNotFound | AuthError::OrganizationNotFound => {
                (StatusCode::UNAUTHORIZED, "User not found")
            }
            AuthError::ServiceUnavailable(msg) => {
                tracing::error!("Auth service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Authentication service unavailable",
                )
            }
        };

        (
            status,
            Json(serde_json::json!({
                "code": "UNAUTHENTICATED",
                "message": message
            })),
        )
            .into_response()
    }
}
