//! Correlation ID middleware for request tracing.
//!
//! Uses the caller's `x-correlation-id` when it is a well-formed id (at most
//! [`MAX_CORRELATION_ID_LEN`] ASCII letters, digits, `-` or `_`), otherwise
//! generates a UUID v4. The ID is recorded in the current tracing span, added to the
//! Sentry scope, and echoed in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for correlation IDs.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Longest inbound correlation ID that is reused as-is.
pub const MAX_CORRELATION_ID_LEN: usize = 128;

fn is_valid_correlation_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_CORRELATION_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Middleware that ensures every request carries a correlation ID.
pub async fn correlation_id_middleware(request: Request, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| is_valid_correlation_id(id))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("correlation_id", &correlation_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("correlation_id", &correlation_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}
