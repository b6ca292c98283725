//! Upstream API wire types.

use serde::{Deserialize, Serialize};

use catalog_gateway_core::lenient;
use catalog_gateway_core::{Price, ProductDraft, ShopId, VatRate};

// =============================================================================
// Account
// =============================================================================

/// Response of the account info endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub active: bool,
    /// `null` and a missing key both mean "no shops".
    #[serde(default)]
    pub shops: Option<Vec<Shop>>,
}

impl AccountInfo {
    /// Shops on the account.
    #[must_use]
    pub fn shops(&self) -> &[Shop] {
        self.shops.as_deref().unwrap_or_default()
    }

    /// Find the shop with exactly this id.
    #[must_use]
    pub fn find_shop(&self, id: &ShopId) -> Option<&Shop> {
        self.shops().iter().find(|shop| shop.id == id.as_str())
    }
}

/// A shop on the upstream account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub vat_number: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

/// Body of the create and update product calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWrite {
    pub information: ProductInformation,
    pub offer: ProductOffer,
    pub shop_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductInformation {
    pub title: String,
    /// Upstream category id.
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProductOffer {
    pub price: Price,
    pub vat: VatRate,
}

impl ProductWrite {
    /// Build the write body for `draft` addressed to `shop_id`.
    #[must_use]
    pub fn from_draft(draft: &ProductDraft, shop_id: i64) -> Self {
        Self {
            information: ProductInformation {
                title: draft.title.clone(),
                category: draft.category_source_id.clone(),
            },
            offer: ProductOffer {
                price: draft.price,
                vat: draft.vat_rate,
            },
            shop_id,
        }
    }
}

/// Body of the quantity update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityUpdate {
    pub quantity: i32,
    pub shop_id: i64,
}

/// Product reference returned by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductRef {
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub id: String,
}

/// Response of the quantity update call; both fields are optional upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuantityAck {
    #[serde(default, deserialize_with = "lenient::option_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i32>,
}
