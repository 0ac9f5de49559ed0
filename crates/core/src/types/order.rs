//! Orders, checkout payloads, and the session's order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cart, CartLine, OrderId, OrderStatus, Price, ShippingAddress, UserId};

/// Prefix for human-readable order numbers.
const ORDER_NUMBER_PREFIX: &str = "SE";

/// Payment method label shown on the order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self("Credit Card".to_owned())
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A placed order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Human-readable number, e.g. `SE482913`.
    pub order_number: String,
    pub created_at: DateTime<Utc>,
    /// Backend-owned lifecycle status.
    pub status: OrderStatus,
    /// Cart lines as they were at purchase time.
    pub items: Vec<CartLine>,
    pub total: Price,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    /// Purchasing user, when the order was placed while logged in.
    pub user_id: Option<UserId>,
}

impl Order {
    /// Total units across all items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Checkout payload submitted to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: Option<UserId>,
    pub order_number: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: Vec<CartLine>,
    pub total: Price,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

impl NewOrder {
    /// Build a payload from the current cart contents.
    ///
    /// The items are a copy of the cart lines and the total is the cart's
    /// derived total (subtotal + shipping + tax) at `now`.
    #[must_use]
    pub fn from_cart(
        cart: &Cart,
        user_id: Option<UserId>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            order_number: order_number(now),
            order_date: now,
            status: OrderStatus::Pending,
            items: cart.lines().to_vec(),
            total: cart.totals().total,
            shipping_address,
            payment_method,
        }
    }
}

/// Generate an order number from a timestamp: `SE` followed by the last six
/// digits of the Unix time in milliseconds.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use shopez_core::order_number;
///
/// let at = Utc.timestamp_millis_opt(1_700_000_123_456).unwrap();
/// assert_eq!(order_number(at), "SE123456");
/// ```
#[must_use]
pub fn order_number(at: DateTime<Utc>) -> String {
    let suffix = at.timestamp_millis().rem_euclid(1_000_000);
    format!("{ORDER_NUMBER_PREFIX}{suffix:06}")
}

/// Orders known to this session, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    #[must_use]
    pub const fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// Record a newly placed order at the front of the history.
    pub fn record(&mut self, order: Order) {
        self.orders.insert(0, order);
    }

    /// Replace the history with fetched orders, newest first.
    ///
    /// Orders with equal timestamps keep their fetched relative order.
    pub fn replace(&mut self, mut orders: Vec<Order>) {
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.orders = orders;
    }

    /// Look up an order by id.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
