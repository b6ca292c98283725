//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::db::ConfigurationStore;
use crate::services::{CategoryService, ConfigurationRegistrar, ProductService, TokenResolver};
use crate::upstream::CatalogGateway;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store and the upstream
/// gateway are trait objects so tests can substitute fakes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn ConfigurationStore>,
    categories: CategoryService,
    registrar: ConfigurationRegistrar,
    products: ProductService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Gateway configuration; its token lists feed the resolver
    /// * `store` - Configuration store backend
    /// * `gateway` - Upstream API implementation
    #[must_use]
    pub fn new(
        config: GatewayConfig,
        store: Arc<dyn ConfigurationStore>,
        gateway: Arc<dyn CatalogGateway>,
    ) -> Self {
        let tokens = Arc::new(TokenResolver::new(config.tokens));

        Self {
            inner: Arc::new(AppStateInner {
                categories: CategoryService::new(gateway.clone(), tokens.clone()),
                registrar: ConfigurationRegistrar::new(store.clone(), gateway.clone()),
                products: ProductService::new(gateway, tokens),
                store,
            }),
        }
    }

    /// Get a reference to the configuration store.
    #[must_use]
    pub fn store(&self) -> &dyn ConfigurationStore {
        self.inner.store.as_ref()
    }

    #[must_use]
    pub fn categories(&self) -> &CategoryService {
        &self.inner.categories
    }

    #[must_use]
    pub fn registrar(&self) -> &ConfigurationRegistrar {
        &self.inner.registrar
    }

    #[must_use]
    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }
}
