//! Core types for the catalog gateway.
//!
//! This module provides type-safe wrappers for tenant, shop, category and
//! product concepts.

pub mod category;
pub mod id;
pub mod lenient;
pub mod price;
pub mod product;
pub mod shop;

pub use category::{CategoryNode, FlatCategory, ROOT_SEGMENT, flatten};
pub use id::*;
pub use price::{Price, VatRate};
pub use product::{ProductDraft, ProductSummary, ProductTarget, ProductTargetError};
pub use shop::{ShopId, TenantKey};
