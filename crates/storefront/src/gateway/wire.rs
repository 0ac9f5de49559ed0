//! Backend JSON shapes.
//!
//! Every field is optional here; [`super::conversions`] decides what is
//! required. The backend uses `_id` for document ids and camelCase for
//! multi-word fields.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopez_core::{CartLine, NewOrder, ShippingAddress};

#[derive(Debug, Deserialize)]
pub(super) struct WireErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct WireRating {
    pub rate: Option<f64>,
    pub count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireProduct {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub rating: Option<WireRating>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireCartLine {
    pub id: Option<String>,
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireAddress {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// The purchaser field is an id when unpopulated and a user document when
/// the backend populates it (admin listings).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum WireUserRef {
    Id(String),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: Option<String>,
        name: Option<String>,
    },
}

impl WireUserRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::Populated { id, .. } => id.as_deref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Populated { name, .. } => name.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireOrder {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub order_number: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
    /// Document timestamp, used when `orderDate` is absent.
    pub created_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    #[serde(default)]
    pub items: Vec<WireCartLine>,
    pub total: Option<Decimal>,
    pub shipping_address: Option<WireAddress>,
    pub payment_method: Option<String>,
    pub user: Option<WireUserRef>,
}

// =============================================================================
// Outgoing payloads
// =============================================================================

#[derive(Debug, Serialize)]
pub(super) struct WireCartLineOut<'a> {
    pub id: &'a str,
    pub title: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: &'a str,
    pub quantity: u32,
}

impl<'a> From<&'a CartLine> for WireCartLineOut<'a> {
    fn from(line: &'a CartLine) -> Self {
        Self {
            id: line.product_id.as_str(),
            title: &line.title,
            price: line.price.amount(),
            image: &line.image,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireAddressOut<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub zip_code: &'a str,
    pub country: &'a str,
}

impl<'a> From<&'a ShippingAddress> for WireAddressOut<'a> {
    fn from(address: &'a ShippingAddress) -> Self {
        Self {
            first_name: &address.first_name,
            last_name: &address.last_name,
            address: &address.address,
            city: &address.city,
            state: &address.state,
            zip_code: &address.zip_code,
            country: &address.country,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireNewOrder<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<&'a str>,
    pub order_number: &'a str,
    pub order_date: DateTime<Utc>,
    pub status: &'static str,
    pub items: Vec<WireCartLineOut<'a>>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub shipping_address: WireAddressOut<'a>,
    pub payment_method: &'a str,
}

impl<'a> From<&'a NewOrder> for WireNewOrder<'a> {
    fn from(order: &'a NewOrder) -> Self {
        Self {
            user: order.user_id.as_ref().map(|id| id.as_str()),
            order_number: &order.order_number,
            order_date: order.order_date,
            status: order.status.as_str(),
            items: order.items.iter().map(WireCartLineOut::from).collect(),
            total: order.total.amount(),
            shipping_address: WireAddressOut::from(&order.shipping_address),
            payment_method: order.payment_method.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct WireRatingOut {
    pub rate: f64,
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct WireProductOut<'a> {
    pub title: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: &'a str,
    pub category: &'a str,
    pub description: &'a str,
    pub rating: WireRatingOut,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use shopez_core::{Cart, PaymentMethod, Price, Product, ProductId, Rating, UserId};

    use super::*;

    #[test]
    fn test_product_accepts_underscore_id() {
        let json = r#"{"_id":"64f1","title":"Ring","price":9.5,"rating":{"rate":4.1,"count":3}}"#;
        let product: WireProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_deref(), Some("64f1"));
        assert_eq!(product.price, Some(Decimal::new(95, 1)));
        assert!(product.image.is_none());
    }

    #[test]
    fn test_user_ref_shapes() {
        let plain: WireUserRef = serde_json::from_str(r#""u1""#).unwrap();
        assert_eq!(plain.id(), Some("u1"));
        assert_eq!(plain.name(), None);

        let populated: WireUserRef =
            serde_json::from_str(r#"{"_id":"u2","name":"Ada Lovelace"}"#).unwrap();
        assert_eq!(populated.id(), Some("u2"));
        assert_eq!(populated.name(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_new_order_serializes_camel_case_numbers() {
        let product = Product {
            id: ProductId::new("p1"),
            title: "Backpack".to_string(),
            price: Price::from_cents(10995),
            image: "https://img.test/p1.png".to_string(),
            category: "bags".to_string(),
            rating: Rating::default(),
            description: String::new(),
        };
        let mut cart = Cart::new();
        cart.add(&product, 1);
        let order = NewOrder::from_cart(
            &cart,
            Some(UserId::new("u1")),
            ShippingAddress {
                first_name: "Ada".into(),
                zip_code: "10001".into(),
                ..ShippingAddress::default()
            },
            PaymentMethod::default(),
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        );

        let value = serde_json::to_value(WireNewOrder::from(&order)).unwrap();
        assert_eq!(value["user"], "u1");
        assert_eq!(value["orderNumber"], "SE000000");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["items"][0]["id"], "p1");
        assert_eq!(value["items"][0]["price"], 109.95);
        assert_eq!(value["shippingAddress"]["zipCode"], "10001");
        assert_eq!(value["paymentMethod"], "Credit Card");
        assert!(value["total"].is_number());
    }
}
