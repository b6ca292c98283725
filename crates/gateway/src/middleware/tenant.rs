//! Tenant and credential extractors.
//!
//! Provides extractors for the `X-STORE` / `X-SOURCE` tenant headers and the
//! optional caller `Authorization` header.

use std::convert::Infallible;
use std::str::FromStr;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use catalog_gateway_core::{SourceId, StoreId, TenantKey};

use crate::error::AppError;

/// Header carrying the caller's store id.
pub const STORE_HEADER: &str = "x-store";

/// Header carrying the caller's source id.
pub const SOURCE_HEADER: &str = "x-source";

/// Extractor for the required numeric tenant headers.
///
/// Rejects with `AppError::MissingField` when a header is missing, blank or
/// not an integer.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(TenantHeaders(tenant): TenantHeaders) -> String {
///     tenant.to_string()
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TenantHeaders(pub TenantKey);

impl<S> FromRequestParts<S> for TenantHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let store_id: StoreId = numeric_header(parts, STORE_HEADER)?;
        let source: SourceId = numeric_header(parts, SOURCE_HEADER)?;

        Ok(Self(TenantKey::new(store_id, source)))
    }
}

fn numeric_header<T: FromStr>(parts: &Parts, name: &str) -> Result<T, AppError> {
    let value = parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::MissingField(format!("{} header", name.to_uppercase())))?;

    value.parse().map_err(|_| {
        AppError::MissingField(format!("{} header must be numeric", name.to_uppercase()))
    })
}

/// Extractor for the optional caller `Authorization` header.
///
/// Blank or non-UTF-8 values count as absent.
#[derive(Clone, Default)]
pub struct CallerToken(Option<String>);

impl std::fmt::Debug for CallerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CallerToken")
            .field(&self.0.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl CallerToken {
    /// The header value, if one was sent.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for CallerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        Ok(Self(token))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;
    use crate::error::ErrorCode;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_extracts_tenant() {
        let mut parts = parts(&[("X-STORE", "1"), ("X-SOURCE", " 10124 ")]);
        let TenantHeaders(tenant) = TenantHeaders::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(tenant, TenantKey::new(StoreId::new(1), SourceId::new(10124)));
    }

    #[tokio::test]
    async fn test_missing_header_is_missing_field() {
        let mut parts = parts(&[("X-STORE", "1")]);
        let err = TenantHeaders::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::MissingRequiredField);
        assert!(err.to_string().contains("X-SOURCE"));
    }

    #[tokio::test]
    async fn test_non_numeric_header_is_missing_field() {
        let mut parts = parts(&[("X-STORE", "abc"), ("X-SOURCE", "1")]);
        let err = TenantHeaders::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::MissingRequiredField);
    }

    #[tokio::test]
    async fn test_caller_token() {
        let mut with = parts(&[("Authorization", "Bearer X")]);
        let token = CallerToken::from_request_parts(&mut with, &()).await.unwrap();
        assert_eq!(token.as_deref(), Some("Bearer X"));

        let mut blank = parts(&[("Authorization", "  ")]);
        let token = CallerToken::from_request_parts(&mut blank, &()).await.unwrap();
        assert_eq!(token.as_deref(), None);
    }

    #[test]
    fn test_caller_token_debug_redacts() {
        let token = CallerToken(Some("secret".to_string()));
        assert!(!format!("{token:?}").contains("secret"));
    }
}
