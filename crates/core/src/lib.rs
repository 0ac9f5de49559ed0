//! ShopEZ Core - Shared domain types.
//!
//! This crate provides the types used across all ShopEZ components:
//! - `storefront` - Gateway client, state store, and account/checkout services
//! - `cli` - Terminal client built on the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no HTTP
//! clients, no locking. The cart, favorites, and order history invariants
//! live here so they can be tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Ids, prices, emails, statuses, and the catalog/cart/order model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
