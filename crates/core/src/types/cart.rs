//! Shopping cart lines and derived totals.
//!
//! The cart holds at most one line per product. A line's title, price and
//! image are a snapshot taken when the line is created and do not follow
//! later catalog changes. Totals are never stored: [`Cart::totals`] derives
//! them from the current lines on every call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// Flat shipping fee charged on any non-empty cart ($9.99).
pub const SHIPPING_FEE: Price = Price::new(Decimal::from_parts(999, 0, 0, false, 2));

/// Sales tax rate applied to the subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// One product's accumulated quantity and price snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    /// Unit price at the time the line was created.
    pub price: Price,
    pub image: String,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl CartLine {
    /// Snapshot a product into a new line.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Totals derived from a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

/// Ordered collection of cart lines, unique by product.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing line for the product has its quantity increased and keeps
    /// its original snapshot; otherwise a new line is appended. Adding zero
    /// units changes nothing.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine::from_product(product, quantity));
        }
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product_id != product_id);
        self.lines.len() != before
    }

    /// Set the quantity for `product_id` to exactly `quantity`.
    ///
    /// A quantity of zero or less removes the line. Quantities above
    /// `u32::MAX` are clamped to it. Products without a line are left alone.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    /// Take purchased `lines` out of the cart.
    ///
    /// Each line's quantity drops by the purchased amount and lines that
    /// reach zero are removed. Units added after the purchase snapshot stay.
    /// Returns whether anything changed.
    pub fn remove_purchased(&mut self, purchased: &[CartLine]) -> bool {
        let mut changed = false;
        for bought in purchased {
            let Some(line) = self.line_mut(&bought.product_id) else {
                continue;
            };
            changed = true;
            if line.quantity > bought.quantity {
                line.quantity -= bought.quantity;
            } else {
                self.remove(&bought.product_id);
            }
        }
        changed
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Line for a product, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Compute subtotal, shipping, tax and total from the current lines.
    ///
    /// ```
    /// use shopez_core::{Cart, Price};
    ///
    /// let totals = Cart::new().totals();
    /// assert_eq!(totals.total, Price::ZERO);
    /// ```
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let subtotal: Price = self.lines.iter().map(CartLine::line_total).sum();
        let shipping = if self.is_empty() {
            Price::ZERO
        } else {
            SHIPPING_FEE
        };
        let tax = subtotal.scale(TAX_RATE).round_to_cents();

        CartTotals {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Consume the cart and return its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Rating;

    fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            image: format!("https://img.example/{id}.png"),
            category: "electronics".to_string(),
            rating: Rating::default(),
            description: String::new(),
        }
    }

    #[test]
    fn test_add_accumulates_into_one_line() {
        let p = product("1", 1000);
        let mut cart = Cart::new();
        cart.add(&p, 1);
        cart.add(&p, 2);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line(&p.id).unwrap().quantity, 3);
    }

    #[test]
    fn test_add_keeps_original_snapshot() {
        let mut p = product("1", 1000);
        let mut cart = Cart::new();
        cart.add(&p, 1);

        p.price = Price::from_cents(1500);
        p.title = "Renamed".to_string();
        cart.add(&p, 1);

        let line = cart.line(&p.id).unwrap();
        assert_eq!(line.price, Price::from_cents(1000));
        assert_eq!(line.title, "Product 1");
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product("1", 1000), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_zero_matches_remove() {
        let a = product("a", 100);
        let b = product("b", 200);
        let mut updated = Cart::new();
        updated.add(&a, 2);
        updated.add(&b, 1);
        let mut removed = updated.clone();

        updated.update_quantity(&a.id, 0);
        removed.remove(&a.id);

        assert_eq!(updated, removed);
        assert!(updated.line(&a.id).is_none());
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let a = product("a", 100);
        let mut cart = Cart::new();
        cart.add(&a, 4);
        cart.update_quantity(&a.id, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_exact_value() {
        let a = product("a", 100);
        let mut cart = Cart::new();
        cart.add(&a, 4);
        cart.update_quantity(&a.id, 2);
        assert_eq!(cart.line(&a.id).unwrap().quantity, 2);
    }

    #[test]
    fn test_update_quantity_absent_line_is_noop() {
        let mut cart = Cart::new();
        cart.update_quantity(&ProductId::new("ghost"), 5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_scenario() {
        let mut cart = Cart::new();
        cart.add(&product("1", 1000), 2);
        cart.add(&product("2", 2000), 1);

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Price::from_cents(4000));
        assert_eq!(totals.shipping, Price::from_cents(999));
        assert_eq!(totals.tax, Price::from_cents(320));
        assert_eq!(totals.total, Price::from_cents(5319));
    }

    #[test]
    fn test_totals_empty_cart_are_zero() {
        let totals = Cart::new().totals();
        assert_eq!(totals, CartTotals::default());
    }

    #[test]
    fn test_totals_follow_mutations() {
        let p = product("1", 1000);
        let mut cart = Cart::new();
        cart.add(&p, 1);
        assert_eq!(cart.totals().subtotal, Price::from_cents(1000));

        cart.update_quantity(&p.id, 3);
        assert_eq!(cart.totals().subtotal, Price::from_cents(3000));

        cart.clear();
        assert_eq!(cart.totals().total, Price::ZERO);
    }

    #[test]
    fn test_totals_saturate_instead_of_panicking() {
        let mut p = product("big", 0);
        p.price = Price::new(Decimal::from(i64::MAX) * Decimal::from(10_000_000_u32));
        let mut cart = Cart::new();
        cart.add(&p, u32::MAX);

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Price::new(Decimal::MAX));
        assert_eq!(totals.total, Price::new(Decimal::MAX));
    }

    #[test]
    fn test_update_quantity_clamps_to_u32_max() {
        let a = product("a", 100);
        let mut cart = Cart::new();
        cart.add(&a, 1);
        cart.update_quantity(&a.id, i64::MAX);
        assert_eq!(cart.line(&a.id).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_remove_purchased_keeps_later_additions() {
        let a = product("a", 100);
        let b = product("b", 200);
        let mut cart = Cart::new();
        cart.add(&a, 2);
        cart.add(&b, 1);
        let purchased = cart.lines().to_vec();

        cart.add(&a, 3);
        let late = product("late", 300);
        cart.add(&late, 1);

        assert!(cart.remove_purchased(&purchased));
        assert_eq!(cart.line(&a.id).unwrap().quantity, 3);
        assert!(cart.line(&b.id).is_none());
        assert_eq!(cart.line(&late.id).unwrap().quantity, 1);
        assert_eq!(cart.line_count(), 2);
    }

    #[test]
    fn test_counts() {
        let mut cart = Cart::new();
        cart.add(&product("1", 1000), 2);
        cart.add(&product("2", 500), 3);
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.item_count(), 5);
    }
}
