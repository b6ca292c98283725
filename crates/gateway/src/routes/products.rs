//! Product route handlers.

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use catalog_gateway_core::{ProductDraft, ProductSummary};

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::middleware::{CallerToken, TenantHeaders};
use crate::state::AppState;

/// Create or update a product for the tenant, then sync its quantity.
pub async fn upsert(
    State(state): State<AppState>,
    TenantHeaders(tenant): TenantHeaders,
    caller: CallerToken,
    payload: std::result::Result<Json<ProductDraft>, JsonRejection>,
) -> Result<ApiResponse<ProductSummary>> {
    let Json(draft) = payload?;

    if draft.title.trim().is_empty() {
        return Err(AppError::MissingField("title".to_string()));
    }
    if draft.category_source_id.trim().is_empty() {
        return Err(AppError::MissingField("categorySourceId".to_string()));
    }

    let summary = state
        .products()
        .upsert(draft, tenant, caller.as_deref())
        .await?;

    Ok(ApiResponse::ok(summary))
}
