//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, per-request hub)
//! 2. `TraceLayer` (request tracing)
//! 3. Correlation ID (add unique ID to each request)
//!
//! Tenant headers are read per handler by the [`TenantHeaders`] extractor.

pub mod correlation_id;
pub mod tenant;

pub use correlation_id::{CORRELATION_ID_HEADER, correlation_id_middleware};
pub use tenant::{CallerToken, SOURCE_HEADER, STORE_HEADER, TenantHeaders};
