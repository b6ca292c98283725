//! Registered shop configuration.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use catalog_gateway_core::{ShopId, TenantKey};

/// A shop configuration accepted by the registrar (domain type).
///
/// Rows are immutable once written; re-registration of the same tenant is
/// rejected rather than merged.
#[derive(Debug, Clone)]
pub struct ShopConfiguration {
    /// Database ID (`None` for rows that never touched a database).
    pub id: Option<i64>,
    /// Tenant owning this configuration.
    pub tenant: TenantKey,
    /// Upstream API token validated during registration.
    pub api_token: SecretString,
    /// Upstream shop the tenant is bound to.
    pub shop_id: ShopId,
    /// When the configuration was registered.
    pub created_at: DateTime<Utc>,
}

/// A configuration about to be persisted.
#[derive(Debug, Clone)]
pub struct NewShopConfiguration {
    pub tenant: TenantKey,
    pub api_token: SecretString,
    pub shop_id: ShopId,
}
