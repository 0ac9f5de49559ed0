//! Live storefront flows: catalog, accounts, checkout, order history.
//!
//! These tests require a running backend with a seeded catalog at
//! `SHOPEZ_API_URL`.
//!
//! Run with: cargo test -p shopez-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use shopez_core::{OrderStatus, ShippingAddress};
use shopez_integration_tests::{TEST_PASSWORD, TestContext, registration, unique_email};
use shopez_storefront::gateway::GatewayError;
use shopez_storefront::services::{AccountError, CheckoutDetails, account, checkout, orders};
use shopez_storefront::store::{CatalogLoad, Store};

fn address() -> ShippingAddress {
    ShippingAddress {
        first_name: "Integration".to_string(),
        last_name: "Tester".to_string(),
        address: "1 Test Way".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip_code: "62701".to_string(),
        country: "USA".to_string(),
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_initial_catalog_load() {
    let ctx = TestContext::from_env();
    let (store, handle) = Store::connect(ctx.gateway.clone());

    let outcome = handle.await.unwrap().unwrap();
    assert!(matches!(outcome, CatalogLoad::Applied(n) if n > 0));
    assert!(!store.is_loading());
    assert!(!store.categories().is_empty());
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_product_detail_matches_catalog() {
    let ctx = TestContext::from_env();
    let catalog = ctx.gateway.fetch_catalog().await.unwrap();
    let first = catalog.first().unwrap();

    let product = ctx.gateway.fetch_product(&first.id).await.unwrap();
    assert_eq!(product.id, first.id);
    assert_eq!(product.title, first.title);
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_category_listing_is_filtered() {
    let ctx = TestContext::from_env();
    let catalog = ctx.gateway.fetch_catalog().await.unwrap();
    let category = catalog.first().unwrap().category.clone();

    let products = ctx
        .gateway
        .fetch_products_by_category(&category)
        .await
        .unwrap();
    assert!(!products.is_empty());
    assert!(products.iter().all(|p| p.category == category));
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_register_then_login() {
    let ctx = TestContext::from_env();
    let email = unique_email();
    let store = Store::new();

    let registered = account::register(&ctx.gateway, &store, &registration(&email))
        .await
        .unwrap();
    assert_eq!(registered.name, "Integration Tester");
    assert_eq!(store.user().map(|u| u.id), Some(registered.id.clone()));

    account::logout(&store);
    let password = SecretString::from(TEST_PASSWORD);
    let user = account::login(&ctx.gateway, &store, &email, &password)
        .await
        .unwrap();
    assert_eq!(user.id, registered.id);
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_login_with_wrong_password_is_auth_error() {
    let ctx = TestContext::from_env();
    let email = unique_email();
    let store = Store::new();
    account::register(&ctx.gateway, &store, &registration(&email))
        .await
        .unwrap();
    account::logout(&store);

    let wrong = SecretString::from("definitely-not-it");
    let err = account::login(&ctx.gateway, &store, &email, &wrong)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Gateway(GatewayError::Auth(_))));
    assert!(store.user().is_none());
}

// ============================================================================
// Checkout & history
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_checkout_appears_in_history() {
    let ctx = TestContext::from_env();
    let (store, handle) = Store::connect(ctx.gateway.clone());
    handle.await.unwrap().unwrap();

    account::register(&ctx.gateway, &store, &registration(&unique_email()))
        .await
        .unwrap();

    let product = store.catalog().into_iter().next().unwrap();
    store.add_to_cart(&product, 2);
    let expected_total = store.cart_totals().total;

    let details = CheckoutDetails {
        shipping_address: address(),
        payment_method: None,
    };
    let order = checkout::place_order(&ctx.gateway, &store, details)
        .await
        .unwrap();
    assert_eq!(order.total, expected_total);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(store.cart().is_empty());

    store.replace_orders(Vec::new());
    let count = orders::refresh_history(&ctx.gateway, &store).await.unwrap();
    assert_eq!(count, 1);
    assert!(store.get_order(&order.id).is_some());

    let fetched = ctx.gateway.fetch_order(&order.id).await.unwrap();
    assert_eq!(fetched.order_number, order.order_number);
}
