//! Catalog products.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Highest star rating a product can display.
const MAX_STARS: u8 = 5;

/// Aggregate review rating for a product.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating in `[0, 5]`.
    pub rate: f64,
    /// Number of reviews behind the average.
    pub count: u32,
}

impl Rating {
    /// Number of filled stars to render: the average rounded down, clamped
    /// to `0..=5`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn filled_stars(&self) -> u8 {
        if self.rate.is_nan() {
            return 0;
        }
        // Clamped to [0, 5] before the cast, so truncation cannot occur.
        self.rate.floor().clamp(0.0, f64::from(MAX_STARS)) as u8
    }
}

/// A catalog entry.
///
/// Immutable from the client's point of view: the store replaces its whole
/// product collection and never edits a product in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
    /// Free-form category label.
    pub category: String,
    pub rating: Rating,
    pub description: String,
}
