//! Validate backend wire shapes into `shopez_core` types.
//!
//! Required fields that are absent, blank, or out of range become
//! [`GatewayError::Validation`] naming the entity and field. Optional
//! presentation fields (image, description, rating) fall back to empty or
//! zero values.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopez_core::{
    CartLine, Email, Order, OrderId, OrderStatus, PaymentMethod, Price, Product, ProductId,
    Rating, ShippingAddress, User, UserId,
};

use super::GatewayError;
use super::admin::AdminOrder;
use super::wire::{WireAddress, WireCartLine, WireOrder, WireProduct, WireRating, WireUser};

fn missing(entity: &str, field: &str) -> GatewayError {
    GatewayError::Validation(format!("{entity} is missing `{field}`"))
}

fn invalid(entity: &str, field: &str, reason: impl std::fmt::Display) -> GatewayError {
    GatewayError::Validation(format!("{entity} has invalid `{field}`: {reason}"))
}

/// A required string that must not be blank.
fn required(value: Option<String>, entity: &str, field: &str) -> Result<String, GatewayError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| missing(entity, field))
}

fn price(value: Option<Decimal>, entity: &str) -> Result<Price, GatewayError> {
    let amount = value.ok_or_else(|| missing(entity, "price"))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(invalid(entity, "price", "must not be negative"));
    }
    Ok(Price::new(amount))
}

// =============================================================================
// Users
// =============================================================================

pub(super) fn convert_user(wire: WireUser) -> Result<User, GatewayError> {
    let id = required(wire.id, "user", "_id")?;
    let name = wire.name.unwrap_or_default();
    let email = required(wire.email, "user", "email")?;
    let email = Email::parse(&email).map_err(|e| invalid("user", "email", e))?;

    Ok(User {
        id: UserId::new(id),
        name,
        email,
    })
}

pub(super) fn convert_users(wire: Vec<WireUser>) -> Result<Vec<User>, GatewayError> {
    wire.into_iter().map(convert_user).collect()
}

// =============================================================================
// Products
// =============================================================================

fn convert_rating(wire: Option<WireRating>) -> Result<Rating, GatewayError> {
    let wire = wire.unwrap_or_default();
    let rate = wire.rate.unwrap_or(0.0);
    if !rate.is_finite() {
        return Err(invalid("product", "rating.rate", "not a finite number"));
    }

    Ok(Rating {
        rate,
        count: wire.count.unwrap_or(0),
    })
}

pub(super) fn convert_product(wire: WireProduct) -> Result<Product, GatewayError> {
    Ok(Product {
        id: ProductId::new(required(wire.id, "product", "_id")?),
        title: required(wire.title, "product", "title")?,
        price: price(wire.price, "product")?,
        image: wire.image.unwrap_or_default(),
        category: required(wire.category, "product", "category")?,
        rating: convert_rating(wire.rating)?,
        description: wire.description.unwrap_or_default(),
    })
}

pub(super) fn convert_products(wire: Vec<WireProduct>) -> Result<Vec<Product>, GatewayError> {
    wire.into_iter().map(convert_product).collect()
}

// =============================================================================
// Orders
// =============================================================================

fn convert_line(wire: WireCartLine) -> Result<CartLine, GatewayError> {
    let quantity = wire.quantity.ok_or_else(|| missing("order item", "quantity"))?;
    let quantity = u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| invalid("order item", "quantity", "must be a positive integer"))?;

    Ok(CartLine {
        product_id: ProductId::new(required(wire.id, "order item", "id")?),
        title: wire.title.unwrap_or_default(),
        price: price(wire.price, "order item")?,
        image: wire.image.unwrap_or_default(),
        quantity,
    })
}

fn convert_address(wire: Option<WireAddress>) -> ShippingAddress {
    let wire = wire.unwrap_or_default();
    ShippingAddress {
        first_name: wire.first_name.unwrap_or_default(),
        last_name: wire.last_name.unwrap_or_default(),
        address: wire.address.unwrap_or_default(),
        city: wire.city.unwrap_or_default(),
        state: wire.state.unwrap_or_default(),
        zip_code: wire.zip_code.unwrap_or_default(),
        country: wire.country.unwrap_or_default(),
    }
}

fn convert_status(wire: Option<String>) -> Result<OrderStatus, GatewayError> {
    match wire {
        None => Ok(OrderStatus::default()),
        Some(s) => s.parse().map_err(|e: String| invalid("order", "status", e)),
    }
}

/// Convert an order, also returning the populated purchaser name if any.
fn convert_order_with_purchaser(
    wire: WireOrder,
) -> Result<(Order, Option<String>), GatewayError> {
    let id = required(wire.id, "order", "_id")?;
    let order_number = required(wire.order_number, "order", "orderNumber")?;
    let created_at: DateTime<Utc> = wire
        .order_date
        .or(wire.created_at)
        .ok_or_else(|| missing("order", "orderDate"))?;
    let total = wire.total.ok_or_else(|| missing("order", "total"))?;
    let items = wire
        .items
        .into_iter()
        .map(convert_line)
        .collect::<Result<Vec<_>, _>>()?;
    let payment_method = wire
        .payment_method
        .filter(|m| !m.trim().is_empty())
        .map_or_else(PaymentMethod::default, PaymentMethod::new);
    let purchaser_name = wire
        .user
        .as_ref()
        .and_then(|u| u.name())
        .map(str::to_owned);
    let user_id = wire
        .user
        .as_ref()
        .and_then(|u| u.id())
        .filter(|id| !id.is_empty())
        .map(UserId::new);

    let order = Order {
        id: OrderId::new(id),
        order_number,
        created_at,
        status: convert_status(wire.status)?,
        items,
        total: price(Some(total), "order")?,
        shipping_address: convert_address(wire.shipping_address),
        payment_method,
        user_id,
    };

    Ok((order, purchaser_name))
}

pub(super) fn convert_order(wire: WireOrder) -> Result<Order, GatewayError> {
    convert_order_with_purchaser(wire).map(|(order, _)| order)
}

pub(super) fn convert_orders(wire: Vec<WireOrder>) -> Result<Vec<Order>, GatewayError> {
    wire.into_iter().map(convert_order).collect()
}

pub(super) fn convert_admin_orders(wire: Vec<WireOrder>) -> Result<Vec<AdminOrder>, GatewayError> {
    wire.into_iter()
        .map(|order| {
            convert_order_with_purchaser(order).map(|(order, purchaser_name)| AdminOrder {
                order,
                purchaser_name,
            })
        })
        .collect()
}
