//! Tenant and shop identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::{SourceId, StoreId};

/// Composite key identifying one registered shop configuration.
///
/// A `(store_id, source)` pair may be registered at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantKey {
    /// Caller's store identifier (`X-STORE`).
    pub store_id: StoreId,
    /// Caller's source identifier (`X-SOURCE`).
    pub source: SourceId,
}

impl TenantKey {
    /// Create a new tenant key.
    #[must_use]
    pub const fn new(store_id: StoreId, source: SourceId) -> Self {
        Self { store_id, source }
    }
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store={} source={}", self.store_id, self.source)
    }
}

/// Identifier of a shop on the upstream account.
///
/// Kept as the string the upstream returns; comparison is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopId(String);

impl ShopId {
    /// Create a new shop id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the shop id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ShopId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ShopId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
