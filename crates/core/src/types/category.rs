//! Category filtering, slug resolution, and title search over a catalog.
//!
//! Everything here is a pure function of its inputs; the store calls these
//! on every read instead of caching filtered lists.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Product;

/// Sentinel label meaning "no category filter".
const ALL: &str = "all";

/// The active category filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Whether a product passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(label) => product.category == *label,
        }
    }

    /// Products passing the filter, in catalog order.
    #[must_use]
    pub fn apply(&self, catalog: &[Product]) -> Vec<Product> {
        catalog
            .iter()
            .filter(|product| self.matches(product))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Category(label) => label,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Category(value.to_owned())
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Category(value)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => ALL.to_owned(),
            CategoryFilter::Category(label) => label,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distinct category labels in order of first appearance.
#[must_use]
pub fn categories(catalog: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    catalog
        .iter()
        .filter(|product| seen.insert(product.category.as_str()))
        .map(|product| product.category.clone())
        .collect()
}

/// Map a route slug such as `jewelery` or `home-and-garden` back to a
/// known category label.
///
/// Hyphens become spaces and the word `and` becomes `&`; the result is
/// compared case-insensitively against each label with runs of whitespace
/// collapsed. Unknown slugs are returned unchanged, which simply yields an
/// empty filtered list downstream.
///
/// ```
/// use shopez_core::resolve_category_slug;
///
/// let known = vec!["Home & Garden".to_string(), "electronics".to_string()];
/// assert_eq!(resolve_category_slug("home-and-garden", &known), "Home & Garden");
/// assert_eq!(resolve_category_slug("toys", &known), "toys");
/// ```
#[must_use]
pub fn resolve_category_slug(slug: &str, categories: &[String]) -> String {
    let wanted = slug
        .split('-')
        .flat_map(str::split_whitespace)
        .map(|word| {
            if word.eq_ignore_ascii_case("and") {
                "&".to_owned()
            } else {
                word.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    categories
        .iter()
        .find(|label| collapse_whitespace(&label.to_lowercase()) == wanted)
        .cloned()
        .unwrap_or_else(|| slug.to_owned())
}

/// Products whose title contains `query`, ignoring case, in catalog order.
///
/// A blank query matches nothing; callers treat it as "no search".
#[must_use]
pub fn search(catalog: &[Product], query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    catalog
        .iter()
        .filter(|product| product.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Price, ProductId, Rating};

    fn product(id: &str, title: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(100),
            image: String::new(),
            category: category.to_string(),
            rating: Rating::default(),
            description: String::new(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Fjallraven Backpack", "men's clothing"),
            product("2", "Gold Ring", "jewelery"),
            product("3", "Slim Fit T-Shirt", "men's clothing"),
            product("4", "SSD 1TB", "electronics"),
        ]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_all_returns_catalog_in_order() {
        let catalog = catalog();
        assert_eq!(CategoryFilter::All.apply(&catalog), catalog);
    }

    #[test]
    fn test_category_keeps_relative_order() {
        let filter = CategoryFilter::from("men's clothing");
        assert_eq!(ids(&filter.apply(&catalog())), vec!["1", "3"]);
    }

    #[test]
    fn test_unmatched_category_is_empty() {
        let filter = CategoryFilter::from("garden");
        assert!(filter.apply(&catalog()).is_empty());
    }

    #[test]
    fn test_filter_parses_all_sentinel() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("All"),
            CategoryFilter::Category("All".to_string())
        );
        let json = serde_json::to_string(&CategoryFilter::All).unwrap();
        assert_eq!(json, "\"all\"");
    }

    #[test]
    fn test_categories_first_appearance() {
        assert_eq!(
            categories(&catalog()),
            vec!["men's clothing", "jewelery", "electronics"]
        );
    }

    #[test]
    fn test_resolve_slug() {
        let known = categories(&catalog());
        assert_eq!(resolve_category_slug("jewelery", &known), "jewelery");
        assert_eq!(resolve_category_slug("Electronics", &known), "electronics");
        assert_eq!(resolve_category_slug("men's-clothing", &known), "men's clothing");
        assert_eq!(resolve_category_slug("unknown-slug", &known), "unknown-slug");
    }

    #[test]
    fn test_search_case_insensitive() {
        assert_eq!(ids(&search(&catalog(), "  backPACK ")), vec!["1"]);
        assert_eq!(ids(&search(&catalog(), "s")), vec!["3", "4"]);
        assert!(search(&catalog(), "   ").is_empty());
    }
}
