//! Business logic services.
//!
//! # Services
//!
//! - `tokens` - Outbound credential resolution
//! - `categories` - Category tree lookup and flattening
//! - `configurations` - Shop configuration registration
//! - `products` - Product create/update and quantity sync

pub mod categories;
pub mod configurations;
pub mod products;
pub mod tokens;

pub use categories::{CategoryError, CategoryService};
pub use configurations::{ConfigurationRegistrar, RegistrationError};
pub use products::{ProductError, ProductService};
pub use tokens::{TokenError, TokenPurpose, TokenResolver};

#[cfg(test)]
pub(crate) mod testing {
    //! Counting fake of the upstream API for service tests.

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use secrecy::ExposeSecret;

    use catalog_gateway_core::CategoryNode;

    use crate::upstream::{
        AccountInfo, AuthToken, CatalogGateway, ProductRef, ProductWrite, QuantityAck,
        QuantityUpdate, UpstreamError,
    };

    #[derive(Default)]
    pub struct FakeGateway {
        pub account: AccountInfo,
        pub tree: Vec<CategoryNode>,
        pub created_id: String,
        pub acked_quantity: Option<i32>,
        pub fail_account: Option<u16>,
        pub fail_categories: Option<u16>,
        pub fail_create: Option<u16>,
        pub fail_update: Option<u16>,
        pub fail_quantity: Option<u16>,

        pub account_calls: AtomicUsize,
        pub category_calls: AtomicUsize,
        pub create_calls: AtomicUsize,
        pub update_calls: AtomicUsize,
        pub quantity_calls: AtomicUsize,
        /// `Authorization` header values, in call order.
        pub headers: Mutex<Vec<String>>,
        /// Product ids addressed by update and quantity calls, in call order.
        pub addressed: Mutex<Vec<String>>,
        pub writes: Mutex<Vec<ProductWrite>>,
        pub quantity_updates: Mutex<Vec<QuantityUpdate>>,
    }

    impl FakeGateway {
        pub fn with_shops(ids: &[&str]) -> Self {
            let shops = ids
                .iter()
                .map(|id| serde_json::json!({ "id": id }))
                .collect::<Vec<_>>();
            let account = serde_json::from_value(serde_json::json!({
                "active": true,
                "shops": shops,
            }))
            .unwrap_or_default();

            Self {
                account,
                ..Self::default()
            }
        }

        pub fn count(counter: &AtomicUsize) -> usize {
            counter.load(Ordering::SeqCst)
        }

        fn record(&self, counter: &AtomicUsize, token: &AuthToken) {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut headers) = self.headers.lock() {
                headers.push(token.header_value().expose_secret().to_owned());
            }
        }

        fn address(&self, product_id: &str) {
            if let Ok(mut addressed) = self.addressed.lock() {
                addressed.push(product_id.to_owned());
            }
        }

        fn check(fail: Option<u16>) -> Result<(), UpstreamError> {
            match fail {
                Some(status) => Err(UpstreamError::Status {
                    status,
                    body: "upstream failure".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl CatalogGateway for FakeGateway {
        async fn account_info(&self, token: &AuthToken) -> Result<AccountInfo, UpstreamError> {
            self.record(&self.account_calls, token);
            Self::check(self.fail_account)?;
            Ok(self.account.clone())
        }

        async fn categories(
            &self,
            token: &AuthToken,
        ) -> Result<Vec<CategoryNode>, UpstreamError> {
            self.record(&self.category_calls, token);
            Self::check(self.fail_categories)?;
            Ok(self.tree.clone())
        }

        async fn create_product(
            &self,
            token: &AuthToken,
            product: &ProductWrite,
        ) -> Result<ProductRef, UpstreamError> {
            self.record(&self.create_calls, token);
            Self::check(self.fail_create)?;
            if let Ok(mut writes) = self.writes.lock() {
                writes.push(product.clone());
            }
            Ok(ProductRef {
                id: self.created_id.clone(),
            })
        }

        async fn update_product(
            &self,
            token: &AuthToken,
            product_id: &str,
            product: &ProductWrite,
        ) -> Result<ProductRef, UpstreamError> {
            self.record(&self.update_calls, token);
            self.address(product_id);
            Self::check(self.fail_update)?;
            if let Ok(mut writes) = self.writes.lock() {
                writes.push(product.clone());
            }
            Ok(ProductRef {
                id: product_id.to_owned(),
            })
        }

        async fn update_quantity(
            &self,
            token: &AuthToken,
            product_id: &str,
            update: &QuantityUpdate,
        ) -> Result<QuantityAck, UpstreamError> {
            self.record(&self.quantity_calls, token);
            self.address(product_id);
            Self::check(self.fail_quantity)?;
            if let Ok(mut updates) = self.quantity_updates.lock() {
                updates.push(*update);
            }
            Ok(QuantityAck {
                id: Some(product_id.to_owned()),
                quantity: self.acked_quantity,
            })
        }
    }
}
