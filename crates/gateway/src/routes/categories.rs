//! Category route handlers.

use axum::extract::State;

use catalog_gateway_core::FlatCategory;

use super::ApiResponse;
use crate::error::Result;
use crate::middleware::{CallerToken, TenantHeaders};
use crate::state::AppState;

/// List leaf categories for the tenant.
pub async fn list(
    State(state): State<AppState>,
    TenantHeaders(tenant): TenantHeaders,
    caller: CallerToken,
) -> Result<ApiResponse<Vec<FlatCategory>>> {
    let categories = state.categories().list(tenant, caller.as_deref()).await?;
    Ok(ApiResponse::ok(categories))
}
