//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side failures to
//! Sentry before answering with the response envelope. Every failure maps to
//! one stable [`ErrorCode`]; internal details never reach the caller.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::routes::ApiResponse;
use crate::services::{
    CategoryError, ProductError, RegistrationError, TokenError,
};

/// Stable numeric error codes carried in the envelope's `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    Generic = 1,
    MissingRequiredField = 2,
    ConfigurationNotValid = 3,
    ProductNotCreated = 4,
    ProductNotUpdated = 5,
    ConfigurationNotFound = 6,
    InvalidToken = 7,
}

impl ErrorCode {
    /// Numeric value sent to callers.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// HTTP status paired with this code.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Generic => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingRequiredField => StatusCode::BAD_REQUEST,
            Self::ConfigurationNotValid => StatusCode::CONFLICT,
            Self::ProductNotCreated | Self::ProductNotUpdated => StatusCode::BAD_GATEWAY,
            Self::ConfigurationNotFound => StatusCode::NOT_FOUND,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Application-level error type for the gateway.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed header, body or field.
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Category error: {0}")]
    Categories(#[from] CategoryError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Product error: {0}")]
    Product(#[from] ProductError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MissingField(rejection.body_text())
    }
}

impl AppError {
    /// Envelope code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingField(_)
            | Self::Product(ProductError::InvalidTarget(_)) => ErrorCode::MissingRequiredField,
            Self::Token(_)
            | Self::Categories(CategoryError::Token(_))
            | Self::Product(ProductError::Token(_)) => ErrorCode::InvalidToken,
            Self::Registration(RegistrationError::AlreadyExists(_)) => {
                ErrorCode::ConfigurationNotValid
            }
            Self::Registration(RegistrationError::ShopNotFound(_)) => {
                ErrorCode::ConfigurationNotFound
            }
            Self::Product(ProductError::NotCreated(_)) => ErrorCode::ProductNotCreated,
            Self::Product(ProductError::NotUpdated(_)) => ErrorCode::ProductNotUpdated,
            Self::Categories(CategoryError::Upstream(_))
            | Self::Registration(RegistrationError::Upstream(_) | RegistrationError::Store(_))
            | Self::Internal(_) => ErrorCode::Generic,
        }
    }

    /// Caller-facing message; never includes internal detail.
    fn public_message(&self) -> String {
        match self.code() {
            ErrorCode::Generic => "Internal error".to_string(),
            ErrorCode::MissingRequiredField => self.to_string(),
            ErrorCode::ConfigurationNotValid => "Configuration already exists".to_string(),
            ErrorCode::ConfigurationNotFound => match self {
                Self::Registration(RegistrationError::ShopNotFound(shop_id)) => {
                    format!("Shop {shop_id} not found")
                }
                _ => "Configuration not found".to_string(),
            },
            ErrorCode::ProductNotCreated => "Product not created".to_string(),
            ErrorCode::ProductNotUpdated => "Product not updated".to_string(),
            ErrorCode::InvalidToken => "Invalid token".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        // Capture server errors to Sentry
        if matches!(
            code,
            ErrorCode::Generic | ErrorCode::ProductNotCreated | ErrorCode::ProductNotUpdated
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                code = code.code(),
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, code = code.code(), "Request rejected");
        }

        let body = ApiResponse::<()>::failure(code.code(), self.public_message());
        (code.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
