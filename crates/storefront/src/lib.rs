//! ShopEZ storefront client library.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`gateway`] - Remote Data Gateway for the REST backend (customer + admin)
//! - [`store`] - Session & Catalog Store, the single owner of client state
//! - [`services`] - Gateway calls paired with store updates (login, checkout, ...)
//! - [`error`] - Crate-level error and Sentry helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use shopez_storefront::config::StorefrontConfig;
//! use shopez_storefront::gateway::GatewayClient;
//! use shopez_storefront::store::Store;
//!
//! # async fn run() -> shopez_storefront::Result<()> {
//! let config = StorefrontConfig::from_env()?;
//! let gateway = GatewayClient::new(&config.gateway)?;
//! let (store, initial_load) = Store::connect(gateway.clone());
//! let _ = initial_load.await;
//!
//! store.set_category_filter("electronics");
//! for product in store.visible_products() {
//!     tracing::info!(title = %product.title, price = %product.price, "product");
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod services;
pub mod store;

pub use error::{Error, Result};
