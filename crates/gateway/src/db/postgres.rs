//! `PostgreSQL` configuration store.
//!
//! Uses runtime-checked queries so the crate builds without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use catalog_gateway_core::{ShopId, SourceId, StoreId, TenantKey};

use super::{ConfigurationStore, StoreError};
use crate::models::{NewShopConfiguration, ShopConfiguration};

type ConfigurationRow = (i64, StoreId, SourceId, String, String, DateTime<Utc>);

/// Configuration store backed by the `gateway.configuration` table.
#[derive(Debug, Clone)]
pub struct PgConfigurationStore {
    pool: PgPool,
}

impl PgConfigurationStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigurationStore for PgConfigurationStore {
    async fn find(&self, tenant: &TenantKey) -> Result<Option<ShopConfiguration>, StoreError> {
        let row = sqlx::query_as::<_, ConfigurationRow>(
            r"
            SELECT id, store_id, source, api_token, shop_id, created_at
            FROM gateway.configuration
            WHERE store_id = $1 AND source = $2
            ",
        )
        .bind(tenant.store_id)
        .bind(tenant.source)
        .fetch_optional(&self.pool)
        .await?;

        row.map(from_row).transpose()
    }

    async fn insert(
        &self,
        config: NewShopConfiguration,
    ) -> Result<ShopConfiguration, StoreError> {
        let tenant = config.tenant;
        let row = sqlx::query_as::<_, ConfigurationRow>(
            r"
            INSERT INTO gateway.configuration (store_id, source, api_token, shop_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, store_id, source, api_token, shop_id, created_at
            ",
        )
        .bind(tenant.store_id)
        .bind(tenant.source)
        .bind(config.api_token.expose_secret())
        .bind(config.shop_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Conflict(tenant);
            }
            StoreError::Database(e)
        })?;

        from_row(row)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn from_row(
    (id, store_id, source, api_token, shop_id, created_at): ConfigurationRow,
) -> Result<ShopConfiguration, StoreError> {
    if shop_id.is_empty() {
        return Err(StoreError::DataCorruption(format!(
            "empty shop_id for configuration {id}"
        )));
    }

    Ok(ShopConfiguration {
        id: Some(id),
        tenant: TenantKey::new(store_id, source),
        api_token: SecretString::from(api_token),
        shop_id: ShopId::new(shop_id),
        created_at,
    })
}
