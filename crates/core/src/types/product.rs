//! Product drafts, write targets and summaries.
//!
//! A [`ProductDraft`] is what the caller sends; a [`ProductTarget`] decides
//! whether the draft creates a new upstream product or updates an existing
//! one, and which shop the write addresses; a [`ProductSummary`] is what the
//! caller gets back once both upstream writes succeeded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::SourceId;
use super::price::{Price, VatRate};

/// Product fields supplied by the caller for a create-or-update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Product title.
    pub title: String,
    /// Upstream id of the (leaf) category the product belongs to.
    pub category_source_id: String,
    /// Selling price.
    pub price: Price,
    /// VAT percentage.
    pub vat_rate: VatRate,
    /// Stock quantity to synchronize after the write.
    pub quantity: i32,
    /// Upstream product id; absent or empty means "create".
    #[serde(default, rename = "sourceId", alias = "productId")]
    pub upstream_product_id: Option<String>,
}

impl ProductDraft {
    /// Decide the write target for this draft.
    ///
    /// # Errors
    ///
    /// Returns `ProductTargetError::NonNumericProductId` if the draft carries
    /// an upstream product id that cannot address a shop.
    pub fn target(&self, source: SourceId) -> Result<ProductTarget, ProductTargetError> {
        ProductTarget::resolve(self.upstream_product_id.as_deref(), source)
    }
}

/// Errors that can occur when deciding a product write target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductTargetError {
    /// The upstream product id is not numeric.
    #[error("product id must be numeric, got {0:?}")]
    NonNumericProductId(String),
}

/// Where a product write goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductTarget {
    /// No upstream product yet: create it in the tenant's source shop.
    Create {
        /// Shop receiving the new product.
        shop_id: i64,
    },
    /// Update an existing upstream product.
    ///
    /// The upstream product id doubles as the target shop id. This is the only
    /// place that equivalence is encoded.
    Update {
        /// Upstream product id, used verbatim in the update URL.
        product_id: String,
        /// Shop id derived from `product_id`.
        shop_id: i64,
    },
}

impl ProductTarget {
    /// Build the target from an optional upstream product id.
    ///
    /// Blank ids are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `ProductTargetError::NonNumericProductId` when an update is
    /// requested with a product id that is not a valid shop number.
    pub fn resolve(
        upstream_product_id: Option<&str>,
        source: SourceId,
    ) -> Result<Self, ProductTargetError> {
        match upstream_product_id.map(str::trim).filter(|id| !id.is_empty()) {
            None => Ok(Self::Create {
                shop_id: source.as_i64(),
            }),
            Some(id) => {
                let shop_id = id
                    .parse::<i64>()
                    .map_err(|_| ProductTargetError::NonNumericProductId(id.to_owned()))?;
                Ok(Self::Update {
                    product_id: id.to_owned(),
                    shop_id,
                })
            }
        }
    }

    /// Numeric shop id the write is addressed to.
    #[must_use]
    pub const fn shop_id(&self) -> i64 {
        match self {
            Self::Create { shop_id } | Self::Update { shop_id, .. } => *shop_id,
        }
    }

    /// Whether this target creates a new product.
    #[must_use]
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Create { .. })
    }
}

/// Finalized product as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub title: String,
    pub category_source_id: String,
    pub price: Price,
    pub vat_rate: VatRate,
    /// Quantity acknowledged by the upstream quantity sync.
    pub quantity: i32,
    /// Numeric shop id the product was written to.
    pub source_id: i64,
    /// Upstream product id returned by the create/update call.
    pub product_id: String,
}
