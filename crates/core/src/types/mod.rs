//! Core types for ShopEZ.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod cart;
pub mod category;
pub mod email;
pub mod favorites;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;
pub mod user;

pub use address::ShippingAddress;
pub use cart::{Cart, CartLine, CartTotals, SHIPPING_FEE, TAX_RATE};
pub use category::{CategoryFilter, categories, resolve_category_slug, search};
pub use email::{Email, EmailError};
pub use favorites::FavoriteSet;
pub use id::*;
pub use order::{NewOrder, Order, OrderHistory, PaymentMethod, order_number};
pub use price::Price;
pub use product::{Product, Rating};
pub use status::*;
pub use user::User;
