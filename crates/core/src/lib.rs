//! Catalog Gateway Core - Shared types library.
//!
//! This crate provides the domain types used by the gateway and its tests:
//! - tenant identifiers (`StoreId`, `SourceId`, `TenantKey`)
//! - upstream shop identifiers (`ShopId`)
//! - category trees and their flattened leaf view
//! - product drafts, write targets, and the finalized product summary
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Category flattening lives here because it is a pure
//! transformation over upstream data.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers and catalog models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
