//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health            - Liveness check
//! GET  /health/ready      - Readiness check (configuration store)
//!
//! GET  /categories        - Flattened leaf categories
//! POST /configurations    - Register a shop configuration
//! PUT  /products          - Create or update a product, then sync quantity
//! ```
//!
//! Catalog routes require the `X-STORE` and `X-SOURCE` headers and answer
//! with the [`ApiResponse`] envelope.

pub mod categories;
pub mod configurations;
pub mod envelope;
pub mod health;
pub mod products;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub use envelope::ApiResponse;

use crate::middleware::correlation_id_middleware;
use crate::state::AppState;

/// Create the catalog routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::list))
        .route("/configurations", post(configurations::register))
        .route("/products", put(products::upsert))
}

/// Build the full application: health checks, catalog routes, correlation
/// IDs and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .layer(middleware::from_fn(correlation_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        correlation_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
