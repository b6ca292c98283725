//! Product create-or-update with quantity sync.
//!
//! A draft without an upstream product id is created in the tenant's source
//! shop; a draft with one updates that product. Either way a second call then
//! sets the stock quantity on the product id the first call returned, with the
//! same credential. A failed quantity call does not undo the first write.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use catalog_gateway_core::{ProductDraft, ProductSummary, ProductTarget, ProductTargetError, TenantKey};

use super::tokens::{TokenError, TokenPurpose, TokenResolver};
use crate::upstream::{CatalogGateway, ProductWrite, QuantityUpdate, UpstreamError};

/// Errors that can occur when upserting a product.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error(transparent)]
    InvalidTarget(#[from] ProductTargetError),

    #[error(transparent)]
    Token(#[from] TokenError),

    /// The create call failed; no quantity call was made.
    #[error("product not created: {0}")]
    NotCreated(#[source] UpstreamError),

    /// The update call, or the quantity call after a successful write, failed.
    #[error("product not updated: {0}")]
    NotUpdated(#[source] UpstreamError),
}

/// Orchestrates product writes against the upstream API.
#[derive(Clone)]
pub struct ProductService {
    gateway: Arc<dyn CatalogGateway>,
    tokens: Arc<TokenResolver>,
}

impl ProductService {
    #[must_use]
    pub fn new(gateway: Arc<dyn CatalogGateway>, tokens: Arc<TokenResolver>) -> Self {
        Self { gateway, tokens }
    }

    /// Create or update `draft`, then sync its quantity.
    ///
    /// The fallback token is chosen by the shop the write is addressed to.
    ///
    /// # Errors
    ///
    /// - `ProductError::InvalidTarget` if the draft's product id is not numeric
    /// - `ProductError::Token` if no credential can be resolved
    /// - `ProductError::NotCreated` if the create call fails
    /// - `ProductError::NotUpdated` if the update or quantity call fails
    #[instrument(skip(self, draft, caller_token), fields(tenant = %tenant))]
    pub async fn upsert(
        &self,
        draft: ProductDraft,
        tenant: TenantKey,
        caller_token: Option<&str>,
    ) -> Result<ProductSummary, ProductError> {
        let target = draft.target(tenant.source)?;
        let shop_id = target.shop_id();
        let token = self.tokens.resolve(
            caller_token,
            Some(&shop_id.to_string()),
            TokenPurpose::ProductWrite,
        )?;

        let body = ProductWrite::from_draft(&draft, shop_id);
        let product = match &target {
            ProductTarget::Create { .. } => self
                .gateway
                .create_product(&token, &body)
                .await
                .map_err(|e| {
                    log_write_failure(&e, "Product create failed");
                    ProductError::NotCreated(e)
                })?,
            ProductTarget::Update { product_id, .. } => self
                .gateway
                .update_product(&token, product_id, &body)
                .await
                .map_err(|e| {
                    log_write_failure(&e, "Product update failed");
                    ProductError::NotUpdated(e)
                })?,
        };

        tracing::info!(
            product_id = %product.id,
            shop_id,
            created = target.is_create(),
            "Product written"
        );

        let ack = self
            .gateway
            .update_quantity(
                &token,
                &product.id,
                &QuantityUpdate {
                    quantity: draft.quantity,
                    shop_id,
                },
            )
            .await
            .map_err(|e| {
                log_write_failure(&e, "Quantity sync failed after product write");
                ProductError::NotUpdated(e)
            })?;

        Ok(ProductSummary {
            title: draft.title,
            category_source_id: draft.category_source_id,
            price: draft.price,
            vat_rate: draft.vat_rate,
            quantity: ack.quantity.unwrap_or(draft.quantity),
            source_id: shop_id,
            product_id: product.id,
        })
    }
}

fn log_write_failure(error: &UpstreamError, context: &str) {
    tracing::warn!(upstream_status = error.status(), error = %error, "{context}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use catalog_gateway_core::{Price, SourceId, StoreId, VatRate};
    use rust_decimal::Decimal;
    use secrecy::SecretString;

    use super::*;
    use crate::config::TokenConfig;
    use crate::services::testing::FakeGateway;

    fn service(gateway: Arc<FakeGateway>) -> ProductService {
        let tokens = TokenResolver::new(TokenConfig {
            default_token: SecretString::from("DEFAULT"),
            source_tokens: TokenConfig::parse_list("T1,T2"),
            category_tokens: Vec::new(),
        });
        ProductService::new(gateway, Arc::new(tokens))
    }

    fn tenant(source: i64) -> TenantKey {
        TenantKey::new(StoreId::new(1), SourceId::new(source))
    }

    fn draft(upstream_product_id: Option<&str>) -> ProductDraft {
        ProductDraft {
            title: "Product A".to_string(),
            category_source_id: "Category1".to_string(),
            price: Price::new(Decimal::new(100, 0)),
            vat_rate: VatRate::new(Decimal::new(22, 0)),
            quantity: 10,
            upstream_product_id: upstream_product_id.map(String::from),
        }
    }

    fn creating_gateway() -> Arc<FakeGateway> {
        Arc::new(FakeGateway {
            created_id: "555".to_string(),
            ..FakeGateway::default()
        })
    }

    #[tokio::test]
    async fn test_create_calls_create_then_quantity() {
        let gateway = creating_gateway();

        let summary = service(gateway.clone())
            .upsert(draft(None), tenant(10124), None)
            .await
            .unwrap();

        assert_eq!(FakeGateway::count(&gateway.create_calls), 1);
        assert_eq!(FakeGateway::count(&gateway.quantity_calls), 1);
        assert_eq!(FakeGateway::count(&gateway.update_calls), 0);

        assert_eq!(summary.source_id, 10124);
        assert_eq!(summary.product_id, "555");
        assert_eq!(summary.quantity, 10);
        assert_eq!(*gateway.addressed.lock().unwrap(), vec!["555".to_string()]);
        assert_eq!(gateway.writes.lock().unwrap()[0].shop_id, 10124);
    }

    #[tokio::test]
    async fn test_update_calls_update_then_quantity() {
        let gateway = creating_gateway();

        let summary = service(gateway.clone())
            .upsert(draft(Some("10205")), tenant(10124), None)
            .await
            .unwrap();

        assert_eq!(FakeGateway::count(&gateway.update_calls), 1);
        assert_eq!(FakeGateway::count(&gateway.quantity_calls), 1);
        assert_eq!(FakeGateway::count(&gateway.create_calls), 0);

        // Product id doubles as the target shop id
        assert_eq!(summary.source_id, 10205);
        assert_eq!(gateway.quantity_updates.lock().unwrap()[0].shop_id, 10205);
    }

    #[tokio::test]
    async fn test_fallback_token_follows_target_shop() {
        let gateway = creating_gateway();
        let service = service(gateway.clone());

        service
            .upsert(draft(None), tenant(10124), None)
            .await
            .unwrap();
        service
            .upsert(draft(Some("10205")), tenant(10124), None)
            .await
            .unwrap();
        service.upsert(draft(None), tenant(42), None).await.unwrap();

        assert_eq!(
            *gateway.headers.lock().unwrap(),
            vec![
                "Bearer T1", "Bearer T1", "Bearer T2", "Bearer T2", "Bearer DEFAULT",
                "Bearer DEFAULT",
            ]
        );
    }

    #[tokio::test]
    async fn test_caller_token_is_used_for_both_calls() {
        let gateway = creating_gateway();

        service(gateway.clone())
            .upsert(draft(None), tenant(10124), Some("Bearer caller"))
            .await
            .unwrap();

        assert_eq!(
            *gateway.headers.lock().unwrap(),
            vec!["Bearer caller", "Bearer caller"]
        );
    }

    #[tokio::test]
    async fn test_acknowledged_quantity_wins() {
        let gateway = Arc::new(FakeGateway {
            created_id: "1".to_string(),
            acked_quantity: Some(7),
            ..FakeGateway::default()
        });

        let summary = service(gateway)
            .upsert(draft(None), tenant(10124), None)
            .await
            .unwrap();
        assert_eq!(summary.quantity, 7);
    }

    #[tokio::test]
    async fn test_create_failure_skips_quantity() {
        let gateway = Arc::new(FakeGateway {
            fail_create: Some(400),
            ..FakeGateway::default()
        });

        let err = service(gateway.clone())
            .upsert(draft(None), tenant(10124), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotCreated(_)));
        assert_eq!(FakeGateway::count(&gateway.quantity_calls), 0);
    }

    #[tokio::test]
    async fn test_update_failure_skips_quantity() {
        let gateway = Arc::new(FakeGateway {
            fail_update: Some(500),
            ..FakeGateway::default()
        });

        let err = service(gateway.clone())
            .upsert(draft(Some("3")), tenant(10124), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotUpdated(_)));
        assert_eq!(FakeGateway::count(&gateway.quantity_calls), 0);
    }

    #[tokio::test]
    async fn test_quantity_failure_after_create_is_not_updated() {
        let gateway = Arc::new(FakeGateway {
            created_id: "9".to_string(),
            fail_quantity: Some(502),
            ..FakeGateway::default()
        });

        let err = service(gateway.clone())
            .upsert(draft(None), tenant(10124), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotUpdated(_)));
        assert_eq!(FakeGateway::count(&gateway.create_calls), 1);
    }

    #[tokio::test]
    async fn test_non_numeric_product_id_makes_no_calls() {
        let gateway = creating_gateway();

        let err = service(gateway.clone())
            .upsert(draft(Some("abc")), tenant(10124), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::InvalidTarget(_)));
        assert_eq!(FakeGateway::count(&gateway.update_calls), 0);
        assert_eq!(FakeGateway::count(&gateway.quantity_calls), 0);
    }
}
