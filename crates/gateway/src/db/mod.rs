//! Persistence for registered shop configurations.
//!
//! # Tables
//!
//! - `gateway.configuration` - One row per `(store_id, source)` tenant
//!
//! The uniqueness constraint on `(store_id, source)` is the authority on
//! duplicate registrations; both backends report a duplicate insert as
//! [`StoreError::Conflict`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/gateway/migrations/` and are applied by
//! the deployment, e.g.:
//! ```bash
//! sqlx migrate run --source crates/gateway/migrations
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use catalog_gateway_core::TenantKey;

use crate::models::{NewShopConfiguration, ShopConfiguration};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryConfigurationStore;
pub use postgres::PgConfigurationStore;

/// Errors that can occur during configuration store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Uniqueness violation on the tenant key.
    #[error("configuration already exists for {0}")]
    Conflict(TenantKey),
}

/// Storage for shop configurations, keyed by tenant.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Look up the configuration registered for `tenant`.
    async fn find(&self, tenant: &TenantKey) -> Result<Option<ShopConfiguration>, StoreError>;

    /// Persist a new configuration.
    ///
    /// Returns `StoreError::Conflict` if the tenant is already registered.
    async fn insert(&self, config: NewShopConfiguration)
    -> Result<ShopConfiguration, StoreError>;

    /// Probe backend connectivity.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Human-readable backend identifier used in logs.
    fn backend_name(&self) -> &'static str;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
