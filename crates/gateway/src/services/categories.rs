//! Category lookup.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use catalog_gateway_core::{FlatCategory, TenantKey, flatten};

use super::tokens::{TokenError, TokenPurpose, TokenResolver};
use crate::upstream::{CatalogGateway, UpstreamError};

/// Errors that can occur when listing categories.
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("category tree unavailable: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Fetches the upstream category tree and flattens it to leaves.
#[derive(Clone)]
pub struct CategoryService {
    gateway: Arc<dyn CatalogGateway>,
    tokens: Arc<TokenResolver>,
}

impl CategoryService {
    #[must_use]
    pub fn new(gateway: Arc<dyn CatalogGateway>, tokens: Arc<TokenResolver>) -> Self {
        Self { gateway, tokens }
    }

    /// List the leaf categories visible to `tenant`.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Token` if the caller token is rejected and
    /// `CategoryError::Upstream` if the tree cannot be fetched.
    #[instrument(skip(self, caller_token), fields(tenant = %tenant))]
    pub async fn list(
        &self,
        tenant: TenantKey,
        caller_token: Option<&str>,
    ) -> Result<Vec<FlatCategory>, CategoryError> {
        let source = tenant.source.to_string();
        let token = self
            .tokens
            .resolve(caller_token, Some(&source), TokenPurpose::CategoryRead)?;

        let tree = self.gateway.categories(&token).await?;
        let leaves = flatten(&tree);

        tracing::debug!(leaves = leaves.len(), "Flattened category tree");
        Ok(leaves)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use catalog_gateway_core::{CategoryNode, SourceId, StoreId};
    use secrecy::SecretString;

    use super::*;
    use crate::config::TokenConfig;
    use crate::services::testing::FakeGateway;

    fn service(gateway: Arc<FakeGateway>) -> CategoryService {
        let tokens = TokenResolver::new(TokenConfig {
            default_token: SecretString::from("DEFAULT"),
            source_tokens: TokenConfig::parse_list("T1,T2"),
            category_tokens: TokenConfig::parse_list("X"),
        });
        CategoryService::new(gateway, Arc::new(tokens))
    }

    fn tenant() -> TenantKey {
        TenantKey::new(StoreId::new(1), SourceId::new(10124))
    }

    #[tokio::test]
    async fn test_lists_flattened_leaves_with_default_token() {
        let gateway = Arc::new(FakeGateway {
            tree: vec![CategoryNode::branch(
                "1",
                "A",
                vec![CategoryNode::leaf("2", "B")],
            )],
            ..FakeGateway::default()
        });

        let leaves = service(gateway.clone()).list(tenant(), None).await.unwrap();

        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].path, "root/A/B");
        assert_eq!(*gateway.headers.lock().unwrap(), vec!["DEFAULT".to_string()]);
    }

    #[tokio::test]
    async fn test_rejected_token_skips_upstream() {
        let gateway = Arc::new(FakeGateway::default());

        let err = service(gateway.clone())
            .list(tenant(), Some("Bearer nope"))
            .await
            .unwrap_err();

        assert!(matches!(err, CategoryError::Token(TokenError::InvalidToken)));
        assert_eq!(FakeGateway::count(&gateway.category_calls), 0);
    }

    #[tokio::test]
    async fn test_allowed_caller_token_is_forwarded() {
        let gateway = Arc::new(FakeGateway::default());

        let leaves = service(gateway.clone())
            .list(tenant(), Some("Bearer X"))
            .await
            .unwrap();

        assert!(leaves.is_empty());
        assert_eq!(*gateway.headers.lock().unwrap(), vec!["Bearer X".to_string()]);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let gateway = Arc::new(FakeGateway {
            fail_categories: Some(503),
            ..FakeGateway::default()
        });

        let err = service(gateway).list(tenant(), None).await.unwrap_err();
        assert!(matches!(err, CategoryError::Upstream(_)));
    }
}
