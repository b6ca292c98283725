//! Configuration route handlers.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use secrecy::SecretString;
use serde::Deserialize;

use catalog_gateway_core::{ShopId, lenient};

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::middleware::TenantHeaders;
use crate::state::AppState;

/// Registration request body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterConfigurationRequest {
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_string_or_number")]
    pub shop_id: Option<String>,
}

/// Register a shop configuration for the tenant.
///
/// Returns the registered shop id.
pub async fn register(
    State(state): State<AppState>,
    TenantHeaders(tenant): TenantHeaders,
    payload: std::result::Result<Json<RegisterConfigurationRequest>, JsonRejection>,
) -> Result<ApiResponse<String>> {
    let Json(request) = payload?;

    let api_token = required(request.api_token, "apiToken")?;
    let shop_id = required(request.shop_id, "shopId")?;

    let stored = state
        .registrar()
        .register(tenant, SecretString::from(api_token), ShopId::new(shop_id))
        .await?;

    Ok(ApiResponse::ok(stored.shop_id.into_inner()))
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::MissingField(field.to_string()))
}
