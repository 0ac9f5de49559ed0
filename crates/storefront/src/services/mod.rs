//! Operations that pair a gateway call with a store update.
//!
//! # Services
//!
//! - `account` - Login, registration, logout
//! - `checkout` - Submit the cart as an order
//! - `orders` - Refresh order history from the backend
//!
//! The store is only updated after the gateway call succeeds.

pub mod account;
pub mod checkout;
pub mod orders;

pub use account::{AccountError, Registration};
pub use checkout::{CheckoutDetails, CheckoutError};
