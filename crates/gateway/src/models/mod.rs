//! Domain models for the gateway.

pub mod configuration;

pub use configuration::{NewShopConfiguration, ShopConfiguration};
