//! Upstream e-commerce platform API.
//!
//! This module provides:
//! - [`CatalogGateway`], the seam the services call through
//! - [`UpstreamClient`], its `reqwest` implementation
//! - Wire types for the account, category and product endpoints
//! - [`AuthToken`], the credential attached to each outbound call

mod client;
mod error;
mod token;
mod types;

use async_trait::async_trait;

use catalog_gateway_core::CategoryNode;

pub use client::UpstreamClient;
pub use error::UpstreamError;
pub use token::{AuthToken, TokenScheme};
pub use types::{
    AccountInfo, ProductInformation, ProductOffer, ProductRef, ProductWrite, QuantityAck,
    QuantityUpdate, Shop,
};

/// Calls the gateway makes against the upstream API.
///
/// Every call either completes or fails; non-2xx responses surface as
/// [`UpstreamError::Status`].
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Fetch the account's shop list.
    async fn account_info(&self, token: &AuthToken) -> Result<AccountInfo, UpstreamError>;

    /// Fetch the full category tree.
    async fn categories(&self, token: &AuthToken) -> Result<Vec<CategoryNode>, UpstreamError>;

    /// Create a product, returning its upstream id.
    async fn create_product(
        &self,
        token: &AuthToken,
        product: &ProductWrite,
    ) -> Result<ProductRef, UpstreamError>;

    /// Update the product with the given upstream id.
    async fn update_product(
        &self,
        token: &AuthToken,
        product_id: &str,
        product: &ProductWrite,
    ) -> Result<ProductRef, UpstreamError>;

    /// Set the stock quantity of the product with the given upstream id.
    async fn update_quantity(
        &self,
        token: &AuthToken,
        product_id: &str,
        update: &QuantityUpdate,
    ) -> Result<QuantityAck, UpstreamError>;
}
