//! Uniform response envelope.
//!
//! Every endpoint answers with
//! `{ "success": bool, "error": int, "message": string | null, "data": T | null }`,
//! where `error` is `0` on success.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Response envelope shared by all endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub error: u16,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            error: 0,
            message: None,
            data: Some(data),
        }
    }

    /// A failed response with a stable error code.
    #[must_use]
    pub const fn failure(error: u16, message: String) -> Self {
        Self {
            success: false,
            error,
            message: Some(message),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
