//! In-memory configuration store.
//!
//! Not durable: all registrations are lost on restart. Used when no database
//! URL is configured and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use catalog_gateway_core::TenantKey;

use super::{ConfigurationStore, StoreError};
use crate::models::{NewShopConfiguration, ShopConfiguration};

/// Configuration store backed by a `HashMap` behind a `tokio` `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryConfigurationStore {
    configurations: RwLock<HashMap<TenantKey, ShopConfiguration>>,
}

impl InMemoryConfigurationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn find(&self, tenant: &TenantKey) -> Result<Option<ShopConfiguration>, StoreError> {
        Ok(self.configurations.read().await.get(tenant).cloned())
    }

    async fn insert(
        &self,
        config: NewShopConfiguration,
    ) -> Result<ShopConfiguration, StoreError> {
        // Check and insert under one write lock, mirroring the unique constraint
        let mut configurations = self.configurations.write().await;
        if configurations.contains_key(&config.tenant) {
            return Err(StoreError::Conflict(config.tenant));
        }

        let stored = ShopConfiguration {
            id: None,
            tenant: config.tenant,
            api_token: config.api_token,
            shop_id: config.shop_id,
            created_at: Utc::now(),
        };
        configurations.insert(stored.tenant, stored.clone());
        Ok(stored)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
