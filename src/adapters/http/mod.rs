//! HTTP adapters - REST API implementations.
//!
//! `app_router` assembles the billing routes under `/api` together with the
//! cross-cutting layers (tracing, request timeout, CORS).

pub mod billing;
pub mod middleware;

use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub use billing::{billing_router, BillingApiError, BillingAppState, BillingSettings};

/// Router-level settings that are not billing specific.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

/// Build the full application router.
pub fn app_router(state: BillingAppState, settings: &HttpSettings) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", billing_router(state.clone()))
        .with_state(state)
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(middleware::ADMIN_KEY_HEADER),
        ]);

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
