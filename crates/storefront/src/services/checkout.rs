//! Checkout: submit the cart as an order.

use chrono::Utc;
use shopez_core::{NewOrder, Order, PaymentMethod, ShippingAddress};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::error::add_breadcrumb;
use crate::gateway::{GatewayClient, GatewayError};
use crate::store::Store;

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to buy.
    #[error("cart is empty")]
    EmptyCart,

    /// Required shipping fields are blank.
    #[error("shipping address is missing: {}", .0.join(", "))]
    IncompleteAddress(Vec<&'static str>),

    /// The backend call failed; the cart is untouched.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Checkout form input.
#[derive(Debug, Clone, Default)]
pub struct CheckoutDetails {
    pub shipping_address: ShippingAddress,
    /// Defaults to "Credit Card".
    pub payment_method: Option<PaymentMethod>,
}

/// Submit the cart as an order.
///
/// The payload is the cart's current lines and total. On success the
/// backend's order is recorded at the front of the history and the
/// purchased lines leave the cart; anything added while the request was in
/// flight stays. On failure nothing in the store changes.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` or `IncompleteAddress` before any
/// request, or `CheckoutError::Gateway` if submission fails.
#[instrument(skip_all)]
pub async fn place_order(
    gateway: &GatewayClient,
    store: &Store,
    details: CheckoutDetails,
) -> Result<Order, CheckoutError> {
    let cart = store.cart();
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let missing = details.shipping_address.missing_fields();
    if !missing.is_empty() {
        return Err(CheckoutError::IncompleteAddress(missing));
    }

    let user_id = store.user().map(|user| user.id);
    let new_order = NewOrder::from_cart(
        &cart,
        user_id,
        details.shipping_address,
        details.payment_method.unwrap_or_default(),
        Utc::now(),
    );

    let order = match gateway.submit_order(&new_order).await {
        Ok(order) => order,
        Err(e) => {
            warn!(error = %e, order_number = %new_order.order_number, "Order submission failed");
            return Err(e.into());
        }
    };

    store.add_order(order.clone());
    store.remove_purchased(&new_order.items);
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_number", order.order_number.as_str())]),
    );

    info!(
        order_id = %order.id,
        order_number = %order.order_number,
        total = %order.total,
        "Order placed"
    );
    Ok(order)
}
