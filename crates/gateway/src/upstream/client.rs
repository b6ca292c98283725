//! `reqwest` implementation of [`CatalogGateway`].

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, RequestBuilder};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use catalog_gateway_core::CategoryNode;

use super::error::UpstreamError;
use super::token::AuthToken;
use super::types::{AccountInfo, ProductRef, ProductWrite, QuantityAck, QuantityUpdate};
use super::CatalogGateway;
use crate::config::{UpstreamConfig, UrlTemplate};

/// Upstream API client.
///
/// Holds one pooled `reqwest::Client`; cheap to clone.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    account_info_url: Url,
    categories_url: Url,
    product_create_url: Url,
    product_update_url: UrlTemplate,
    product_quantity_url: UrlTemplate,
}

impl UpstreamClient {
    /// Create a new upstream client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            account_info_url: config.account_info_url.clone(),
            categories_url: config.categories_url.clone(),
            product_create_url: config.product_create_url.clone(),
            product_update_url: config.product_update_url.clone(),
            product_quantity_url: config.product_quantity_url.clone(),
        })
    }

    /// Attach the credential, send, and decode a JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: &AuthToken,
    ) -> Result<T, UpstreamError> {
        let mut auth = HeaderValue::from_str(token.header_value().expose_secret())
            .map_err(|e| UpstreamError::InvalidRequest(format!("authorization header: {e}")))?;
        auth.set_sensitive(true);

        let response = request.header(AUTHORIZATION, auth).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Upstream returned an error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        decode(&body)
    }

    fn render(template: &UrlTemplate, product_id: &str) -> Result<Url, UpstreamError> {
        template
            .render(product_id)
            .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))
    }
}

/// Decode a JSON body of any nesting depth.
///
/// Category trees have no depth bound, so serde_json's recursion limit is
/// lifted and `serde_stacker` grows the stack on demand instead.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, UpstreamError> {
    let mut json = serde_json::Deserializer::from_str(body);
    json.disable_recursion_limit();

    let value = T::deserialize(serde_stacker::Deserializer::new(&mut json))
        .map_err(|e| UpstreamError::Decode(e.to_string()))?;
    json.end().map_err(|e| UpstreamError::Decode(e.to_string()))?;

    Ok(value)
}

#[async_trait]
impl CatalogGateway for UpstreamClient {
    #[instrument(skip(self, token))]
    async fn account_info(&self, token: &AuthToken) -> Result<AccountInfo, UpstreamError> {
        let info: AccountInfo = self
            .execute(self.client.get(self.account_info_url.clone()), token)
            .await?;

        debug!(shops = info.shops().len(), active = info.active, "Fetched account info");
        Ok(info)
    }

    #[instrument(skip(self, token))]
    async fn categories(&self, token: &AuthToken) -> Result<Vec<CategoryNode>, UpstreamError> {
        let tree: Vec<CategoryNode> = self
            .execute(self.client.get(self.categories_url.clone()), token)
            .await?;

        debug!(roots = tree.len(), "Fetched category tree");
        Ok(tree)
    }

    #[instrument(skip(self, token, product), fields(shop_id = product.shop_id))]
    async fn create_product(
        &self,
        token: &AuthToken,
        product: &ProductWrite,
    ) -> Result<ProductRef, UpstreamError> {
        let request = self
            .client
            .post(self.product_create_url.clone())
            .json(product);

        self.execute(request, token).await
    }

    #[instrument(skip(self, token, product), fields(shop_id = product.shop_id))]
    async fn update_product(
        &self,
        token: &AuthToken,
        product_id: &str,
        product: &ProductWrite,
    ) -> Result<ProductRef, UpstreamError> {
        let url = Self::render(&self.product_update_url, product_id)?;
        let request = self.client.put(url).json(product);

        self.execute(request, token).await
    }

    #[instrument(skip(self, token, update), fields(shop_id = update.shop_id, quantity = update.quantity))]
    async fn update_quantity(
        &self,
        token: &AuthToken,
        product_id: &str,
        update: &QuantityUpdate,
    ) -> Result<QuantityAck, UpstreamError> {
        let url = Self::render(&self.product_quantity_url, product_id)?;
        let request = self.client.put(url).json(update);

        self.execute(request, token).await
    }
}
