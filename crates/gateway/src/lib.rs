//! Catalog gateway library.
//!
//! Brokers catalog operations between callers and the upstream e-commerce
//! API: category lookup, shop configuration registration, and product
//! create/update with quantity sync. The binary in `main.rs` wires these
//! modules to configuration, logging and the HTTP listener; the library
//! form lets the integration tests drive the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod upstream;
