//! Session & Catalog Store.
//!
//! The single owner of catalog, session user, favorites, cart, order history
//! and the active category filter for one storefront session.
//!
//! # Concurrency
//!
//! [`Store`] is a cheap-to-clone handle. Every mutation takes the write lock,
//! runs to completion, releases it, and then bumps a revision counter on a
//! `tokio::sync::watch` channel. Readers never observe a half-applied update.
//! Views call [`Store::subscribe`] and re-read on each revision.
//!
//! Derived values (visible products, favorites, cart totals) are computed from
//! the current state on every call and never stored.
//!
//! # Catalog loads
//!
//! Each load takes a generation number; [`Store::replace_catalog`] advances
//! the generation too. A load that completes after a newer load or replace
//! has started is discarded, and only the newest load clears `loading`.

mod loader;

pub use loader::CatalogLoad;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shopez_core::{
    Cart, CartLine, CartTotals, CategoryFilter, FavoriteSet, Order, OrderHistory, OrderId, Product,
    ProductId, User, categories, search,
};
use tokio::sync::watch;
use tracing::debug;

/// Everything the store owns, as one owned value for rendering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreSnapshot {
    pub catalog: Vec<Product>,
    pub loading: bool,
    pub user: Option<User>,
    pub favorites: FavoriteSet,
    pub cart: Cart,
    pub orders: OrderHistory,
    pub category_filter: CategoryFilter,
}

#[derive(Debug, Default)]
struct StoreState {
    data: StoreSnapshot,
    /// Advanced by every load start and every catalog replacement.
    catalog_generation: u64,
    /// Generation of the most recently started load.
    latest_load: u64,
}

struct StoreInner {
    state: RwLock<StoreState>,
    revision: watch::Sender<u64>,
}

/// Shared handle to the session store.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Create a store in its initial state: empty everything, `loading` set,
    /// filter `all`.
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        let state = StoreState {
            data: StoreSnapshot {
                loading: true,
                ..StoreSnapshot::default()
            },
            ..StoreState::default()
        };

        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(state),
                revision,
            }),
        }
    }

    // =========================================================================
    // Lock plumbing
    // =========================================================================

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        // Mutations write whole fields, so a poisoned lock still holds valid state.
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a mutation and notify subscribers if it reports a change.
    fn mutate<R>(&self, f: impl FnOnce(&mut StoreState) -> (R, bool)) -> R {
        let (result, changed) = {
            let mut state = self.write();
            f(&mut state)
        };
        if changed {
            self.notify();
        }
        result
    }

    fn notify(&self) {
        self.inner.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    // =========================================================================
    // Change notification
    // =========================================================================

    /// Receiver that sees a new revision after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Current revision number.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Owned copy of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.read().data.clone()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Replace the catalog wholesale. Cart, favorites and orders are
    /// untouched. Any load still in flight is superseded.
    pub fn replace_catalog(&self, products: Vec<Product>) {
        self.mutate(|state| {
            state.catalog_generation += 1;
            state.data.catalog = products;
            ((), true)
        });
    }

    /// Narrow the catalog to products whose title contains `query`.
    ///
    /// A blank query leaves the catalog alone. Returns the number of products
    /// in the catalog afterwards.
    pub fn apply_search(&self, query: &str) -> usize {
        if query.trim().is_empty() {
            return self.read().data.catalog.len();
        }

        let count = self.mutate(|state| {
            let results = search(&state.data.catalog, query);
            let count = results.len();
            state.catalog_generation += 1;
            state.data.catalog = results;
            (count, true)
        });
        debug!(query, count, "Applied search to catalog");
        count
    }

    #[must_use]
    pub fn catalog(&self) -> Vec<Product> {
        self.read().data.catalog.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read().data.loading
    }

    /// Look up a catalog product by id.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<Product> {
        self.read()
            .data
            .catalog
            .iter()
            .find(|product| &product.id == id)
            .cloned()
    }

    /// Distinct category labels in catalog order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        categories(&self.read().data.catalog)
    }

    // =========================================================================
    // Category filter
    // =========================================================================

    /// Set the active filter. Unknown labels are accepted and simply match
    /// nothing.
    pub fn set_category_filter(&self, filter: impl Into<CategoryFilter>) {
        let filter = filter.into();
        self.mutate(|state| {
            let changed = state.data.category_filter != filter;
            state.data.category_filter = filter;
            ((), changed)
        });
    }

    #[must_use]
    pub fn category_filter(&self) -> CategoryFilter {
        self.read().data.category_filter.clone()
    }

    /// Catalog products passing the active filter, in catalog order.
    #[must_use]
    pub fn visible_products(&self) -> Vec<Product> {
        let state = self.read();
        state.data.category_filter.apply(&state.data.catalog)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Replace the session identity. `None` logs out; cart, favorites and
    /// orders are independent of identity and stay as they are.
    pub fn set_user(&self, user: Option<User>) {
        self.mutate(|state| {
            let changed = state.data.user != user;
            state.data.user = user;
            ((), changed)
        });
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read().data.user.clone()
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Add a favorite. Adding an existing favorite changes nothing.
    pub fn add_favorite(&self, id: ProductId) {
        self.mutate(|state| ((), state.data.favorites.insert(id)));
    }

    /// Remove a favorite. Removing an absent id changes nothing.
    pub fn remove_favorite(&self, id: &ProductId) {
        self.mutate(|state| ((), state.data.favorites.remove(id)));
    }

    #[must_use]
    pub fn is_favorite(&self, id: &ProductId) -> bool {
        self.read().data.favorites.contains(id)
    }

    #[must_use]
    pub fn favorites(&self) -> FavoriteSet {
        self.read().data.favorites.clone()
    }

    /// Catalog products that are favorites, in catalog order.
    #[must_use]
    pub fn favorite_products(&self) -> Vec<Product> {
        let state = self.read();
        state
            .data
            .catalog
            .iter()
            .filter(|product| state.data.favorites.contains(&product.id))
            .cloned()
            .collect()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add `quantity` units of `product` to the cart. Zero is a no-op.
    pub fn add_to_cart(&self, product: &Product, quantity: u32) {
        self.mutate(|state| {
            state.data.cart.add(product, quantity);
            ((), quantity > 0)
        });
    }

    pub fn remove_from_cart(&self, id: &ProductId) {
        self.mutate(|state| ((), state.data.cart.remove(id)));
    }

    /// Set a line's quantity exactly; zero or less removes the line.
    pub fn update_cart_quantity(&self, id: &ProductId, quantity: i64) {
        self.mutate(|state| {
            let before = state.data.cart.line(id).map(|line| line.quantity);
            state.data.cart.update_quantity(id, quantity);
            let after = state.data.cart.line(id).map(|line| line.quantity);
            ((), before != after)
        });
    }

    /// Take purchased lines out of the cart in one update, keeping anything
    /// added since the purchase snapshot was taken.
    pub fn remove_purchased(&self, purchased: &[CartLine]) {
        self.mutate(|state| ((), state.data.cart.remove_purchased(purchased)));
    }

    pub fn clear_cart(&self) {
        self.mutate(|state| {
            let changed = !state.data.cart.is_empty();
            state.data.cart.clear();
            ((), changed)
        });
    }

    #[must_use]
    pub fn cart(&self) -> Cart {
        self.read().data.cart.clone()
    }

    /// Subtotal, shipping, tax and total for the current cart.
    #[must_use]
    pub fn cart_totals(&self) -> CartTotals {
        self.read().data.cart.totals()
    }

    /// Number of distinct cart lines.
    #[must_use]
    pub fn cart_line_count(&self) -> usize {
        self.read().data.cart.line_count()
    }

    /// Units across all cart lines.
    #[must_use]
    pub fn cart_item_count(&self) -> u64 {
        self.read().data.cart.item_count()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Record a placed order at the front of the history.
    pub fn add_order(&self, order: Order) {
        self.mutate(|state| {
            state.data.orders.record(order);
            ((), true)
        });
    }

    /// Replace the history with orders fetched from the backend.
    pub fn replace_orders(&self, orders: Vec<Order>) {
        self.mutate(|state| {
            state.data.orders.replace(orders);
            ((), true)
        });
    }

    #[must_use]
    pub fn get_order(&self, id: &OrderId) -> Option<Order> {
        self.read().data.orders.get(id).cloned()
    }

    /// Orders, most recent first.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.read().data.orders.as_slice().to_vec()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use shopez_core::{
        Email, OrderStatus, PaymentMethod, Price, Rating, ShippingAddress, UserId,
    };

    use super::*;

    fn product(id: &str, cents: i64, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            image: String::new(),
            category: category.to_string(),
            rating: Rating::default(),
            description: String::new(),
        }
    }

    fn order(id: &str, millis: i64) -> Order {
        Order {
            id: OrderId::new(id),
            order_number: format!("SE{id}"),
            created_at: Utc.timestamp_millis_opt(millis).unwrap(),
            status: OrderStatus::Pending,
            items: Vec::new(),
            total: Price::ZERO,
            shipping_address: ShippingAddress::default(),
            payment_method: PaymentMethod::default(),
            user_id: None,
        }
    }

    fn user() -> User {
        User {
            id: UserId::new("u1"),
            name: "Ada Lovelace".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
        }
    }

    #[test]
    fn test_initial_state() {
        let store = Store::new();
        let snapshot = store.snapshot();

        assert!(snapshot.catalog.is_empty());
        assert!(snapshot.loading);
        assert!(snapshot.user.is_none());
        assert!(snapshot.favorites.is_empty());
        assert!(snapshot.cart.is_empty());
        assert!(snapshot.orders.is_empty());
        assert_eq!(snapshot.category_filter, CategoryFilter::All);
    }

    #[test]
    fn test_add_to_cart_accumulates() {
        let store = Store::new();
        let p = product("1", 1000, "a");
        store.add_to_cart(&p, 1);
        store.add_to_cart(&p, 2);

        let cart = store.cart();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line(&p.id).unwrap().quantity, 3);
    }

    #[test]
    fn test_favorites_idempotent() {
        let store = Store::new();
        store.add_favorite(ProductId::new("1"));
        let once = store.favorites();
        store.add_favorite(ProductId::new("1"));
        assert_eq!(store.favorites(), once);

        let before = store.revision();
        store.remove_favorite(&ProductId::new("absent"));
        assert_eq!(store.favorites(), once);
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn test_remove_present_favorite() {
        let store = Store::new();
        store.add_favorite(ProductId::new("1"));
        store.add_favorite(ProductId::new("2"));

        let before = store.revision();
        store.remove_favorite(&ProductId::new("1"));

        assert!(!store.is_favorite(&ProductId::new("1")));
        assert!(store.is_favorite(&ProductId::new("2")));
        assert_eq!(store.favorites().len(), 1);
        assert!(store.revision() > before);
    }

    #[test]
    fn test_remove_purchased_keeps_late_items() {
        let store = Store::new();
        let bought = product("1", 1000, "a");
        store.add_to_cart(&bought, 1);
        let snapshot = store.cart().into_lines();

        let late = product("late", 500, "a");
        store.add_to_cart(&late, 2);

        let before = store.revision();
        store.remove_purchased(&snapshot);

        let cart = store.cart();
        assert!(cart.line(&bought.id).is_none());
        assert_eq!(cart.line(&late.id).unwrap().quantity, 2);
        assert!(store.revision() > before);
    }

    #[test]
    fn test_update_quantity_zero_matches_remove() {
        let a = product("a", 100, "x");
        let b = product("b", 200, "x");

        let updated = Store::new();
        updated.add_to_cart(&a, 2);
        updated.add_to_cart(&b, 1);
        updated.update_cart_quantity(&a.id, 0);

        let removed = Store::new();
        removed.add_to_cart(&a, 2);
        removed.add_to_cart(&b, 1);
        removed.remove_from_cart(&a.id);

        assert_eq!(updated.cart(), removed.cart());
        assert!(updated.cart().line(&a.id).is_none());
    }

    #[test]
    fn test_visible_products_follow_filter() {
        let store = Store::new();
        store.replace_catalog(vec![
            product("1", 100, "men's clothing"),
            product("2", 100, "jewelery"),
            product("3", 100, "men's clothing"),
        ]);

        assert_eq!(store.visible_products(), store.catalog());

        store.set_category_filter("men's clothing");
        let ids: Vec<String> = store
            .visible_products()
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);

        store.set_category_filter("garden");
        assert!(store.visible_products().is_empty());
        assert_eq!(store.categories(), vec!["men's clothing", "jewelery"]);
    }

    #[test]
    fn test_cart_totals_scenario() {
        let store = Store::new();
        let one = product("1", 1000, "a");
        let two = product("2", 2000, "a");
        store.replace_catalog(vec![one.clone(), two.clone()]);

        store.add_to_cart(&one, 2);
        store.add_to_cart(&two, 1);

        let totals = store.cart_totals();
        assert_eq!(totals.subtotal, Price::from_cents(4000));
        assert_eq!(totals.shipping, Price::from_cents(999));
        assert_eq!(totals.tax, Price::from_cents(320));
        assert_eq!(totals.total, Price::from_cents(5319));
        assert_eq!(store.cart_line_count(), 2);
        assert_eq!(store.cart_item_count(), 3);
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let store = Store::new();
        assert_eq!(store.cart_totals(), CartTotals::default());
    }

    #[test]
    fn test_orders_most_recent_first() {
        let store = Store::new();
        let o1 = order("1", 1_000);
        let o2 = order("2", 2_000);
        store.add_order(o1.clone());
        store.add_order(o2.clone());

        assert_eq!(store.orders(), vec![o2, o1.clone()]);
        assert_eq!(store.get_order(&o1.id), Some(o1));
        assert!(store.get_order(&OrderId::new("missing")).is_none());
    }

    #[test]
    fn test_replace_orders_sorts_newest_first() {
        let store = Store::new();
        store.replace_orders(vec![order("old", 1_000), order("new", 3_000)]);
        let ids: Vec<String> = store.orders().into_iter().map(|o| o.id.into_inner()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_logout_leaves_cart_favorites_orders() {
        let store = Store::new();
        let p = product("1", 1000, "a");
        store.set_user(Some(user()));
        store.add_to_cart(&p, 1);
        store.add_favorite(p.id.clone());
        store.add_order(order("o1", 1_000));
        let before = store.snapshot();

        store.set_user(None);

        let after = store.snapshot();
        assert!(after.user.is_none());
        assert_eq!(after.cart, before.cart);
        assert_eq!(after.favorites, before.favorites);
        assert_eq!(after.orders, before.orders);
    }

    #[test]
    fn test_favorite_products_in_catalog_order() {
        let store = Store::new();
        store.replace_catalog(vec![product("1", 1, "a"), product("2", 1, "a"), product("3", 1, "a")]);
        store.add_favorite(ProductId::new("3"));
        store.add_favorite(ProductId::new("1"));
        store.add_favorite(ProductId::new("gone"));

        let ids: Vec<String> = store
            .favorite_products()
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(store.is_favorite(&ProductId::new("gone")));
    }

    #[test]
    fn test_apply_search_narrows_catalog() {
        let store = Store::new();
        let mut ring = product("1", 100, "jewelery");
        ring.title = "Gold Ring".to_string();
        let mut ssd = product("2", 100, "electronics");
        ssd.title = "SSD 1TB".to_string();
        store.replace_catalog(vec![ring, ssd]);
        store.add_to_cart(&store.product(&ProductId::new("2")).unwrap(), 1);

        assert_eq!(store.apply_search("   "), 2);
        assert_eq!(store.apply_search("ring"), 1);
        assert_eq!(store.catalog()[0].id.as_str(), "1");
        assert_eq!(store.cart_line_count(), 1);
    }

    #[test]
    fn test_add_zero_is_noop_without_notification() {
        let store = Store::new();
        let before = store.revision();
        store.add_to_cart(&product("1", 100, "a"), 0);
        assert!(store.cart().is_empty());
        assert_eq!(store.revision(), before);
    }

    #[tokio::test]
    async fn test_subscribers_see_mutations() {
        let store = Store::new();
        let mut rx = store.subscribe();

        store.add_favorite(ProductId::new("1"));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
        assert!(store.snapshot().favorites.contains(&ProductId::new("1")));
    }
}
