//! Shop configuration registration.
//!
//! Registration is check-then-act: look the tenant up, validate the shop
//! against the upstream account, then insert. Two concurrent registrations
//! can both pass the lookup, so the store's uniqueness constraint decides,
//! and a conflicting insert is reported exactly like the lookup hit.

use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;
use tracing::instrument;

use catalog_gateway_core::{ShopId, TenantKey};

use crate::db::{ConfigurationStore, StoreError};
use crate::models::{NewShopConfiguration, ShopConfiguration};
use crate::upstream::{AuthToken, CatalogGateway, UpstreamError};

/// Errors that can occur when registering a configuration.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The tenant already has a configuration.
    #[error("configuration already exists for {0}")]
    AlreadyExists(TenantKey),

    /// The upstream account has no shop with the requested id.
    #[error("shop {0} not found on upstream account")]
    ShopNotFound(ShopId),

    /// The account lookup failed.
    #[error("upstream unavailable: {0}")]
    Upstream(#[from] UpstreamError),

    /// Persistence failed for a reason other than a duplicate.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(tenant) => Self::AlreadyExists(tenant),
            other => Self::Store(other),
        }
    }
}

/// Validates and persists shop configurations.
#[derive(Clone)]
pub struct ConfigurationRegistrar {
    store: Arc<dyn ConfigurationStore>,
    gateway: Arc<dyn CatalogGateway>,
}

impl ConfigurationRegistrar {
    #[must_use]
    pub fn new(store: Arc<dyn ConfigurationStore>, gateway: Arc<dyn CatalogGateway>) -> Self {
        Self { store, gateway }
    }

    /// Register `shop_id` for `tenant` after checking the account owns it.
    ///
    /// # Errors
    ///
    /// - `RegistrationError::AlreadyExists` if the tenant is registered, either
    ///   before the upstream call or by a concurrent insert
    /// - `RegistrationError::Upstream` if the account lookup fails
    /// - `RegistrationError::ShopNotFound` if the account has no such shop
    /// - `RegistrationError::Store` if persistence fails
    #[instrument(skip(self, api_token), fields(tenant = %tenant, shop_id = %shop_id))]
    pub async fn register(
        &self,
        tenant: TenantKey,
        api_token: SecretString,
        shop_id: ShopId,
    ) -> Result<ShopConfiguration, RegistrationError> {
        if self.store.find(&tenant).await?.is_some() {
            return Err(RegistrationError::AlreadyExists(tenant));
        }

        let account = self
            .gateway
            .account_info(&AuthToken::bearer(api_token.clone()))
            .await?;

        if !account.active {
            tracing::info!("Upstream account is not active");
        }

        if account.find_shop(&shop_id).is_none() {
            return Err(RegistrationError::ShopNotFound(shop_id));
        }

        let stored = self
            .store
            .insert(NewShopConfiguration {
                tenant,
                api_token,
                shop_id,
            })
            .await?;

        tracing::info!(backend = self.store.backend_name(), "Configuration registered");
        Ok(stored)
    }
}
