//! Remote Data Gateway for the ShopEZ REST backend.
//!
//! # Architecture
//!
//! - One `reqwest` client per gateway, cloned cheaply through an `Arc`
//! - Stateless: no response caching, no retries (retry is a caller decision)
//! - Backend JSON is parsed into private wire structs ([`wire`]) and then
//!   validated into `shopez_core` types ([`conversions`]); missing or
//!   malformed fields surface as [`GatewayError::Validation`]
//! - Every request carries a fresh `x-request-id` for log correlation
//!
//! # Endpoints
//!
//! | method | path | operation |
//! |---|---|---|
//! | POST | `/auth/register` | [`GatewayClient::register_user`] |
//! | POST | `/auth/login` | [`GatewayClient::login_user`] |
//! | GET | `/products` | [`GatewayClient::fetch_catalog`] |
//! | GET | `/products/:id` | [`GatewayClient::fetch_product`] |
//! | GET | `/products/category/:category` | [`GatewayClient::fetch_products_by_category`] |
//! | POST | `/orders` | [`GatewayClient::submit_order`] |
//! | GET | `/orders/user/:userId` | [`GatewayClient::fetch_user_orders`] |
//! | GET | `/orders/:id` | [`GatewayClient::fetch_order`] |
//!
//! Admin endpoints under `/admin/*` live in [`admin::AdminClient`].

pub mod admin;
mod conversions;
mod wire;

pub use admin::{ADMIN_TOKEN_HEADER, AdminClient, AdminOrder, ProductDraft};

use std::future::Future;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use shopez_core::{Email, NewOrder, Order, OrderId, Product, ProductId, User, UserId};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::{GatewayConfig, expose};

use conversions::{convert_order, convert_orders, convert_product, convert_products, convert_user};
use wire::{WireErrorBody, WireNewOrder, WireOrder, WireProduct, WireUser};

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest backend body excerpt kept in logs.
const LOG_BODY_LIMIT: usize = 500;

/// Errors surfaced by the gateway.
///
/// The four kinds are distinguishable so callers can present them
/// differently (e.g. re-prompt for credentials on `Auth`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request failed in transit, or the backend answered non-2xx
    /// without anything more specific to say.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the payload, or answered with a body that does
    /// not match the expected schema.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Credentials were rejected.
    #[error("Auth error: {0}")]
    Auth(String),

    /// The requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl GatewayError {
    /// Whether this error came from the transport or an unhealthy backend.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Human-readable message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Network(m) | Self::Validation(m) | Self::Auth(m) | Self::NotFound(m) => m,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("request timed out: {err}"))
        } else if err.is_builder() {
            Self::Validation(format!("invalid request: {err}"))
        } else {
            Self::Network(format!("request failed: {err}"))
        }
    }
}

/// How a non-2xx answer maps onto [`GatewayError`] for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureMode {
    Registration,
    Login,
    ProductLookup,
    OrderLookup,
    OrderSubmission,
    ProductListing,
    OrderListing,
    /// Admin console request; carries the fallback message.
    Admin(&'static str),
}

impl FailureMode {
    const fn default_message(self) -> &'static str {
        match self {
            Self::Registration => "Registration failed",
            Self::Login => "Login failed",
            Self::ProductLookup => "Failed to fetch product",
            Self::OrderLookup => "Failed to fetch order",
            Self::OrderSubmission => "Failed to create order",
            Self::ProductListing => "Failed to fetch products",
            Self::OrderListing => "Failed to fetch orders",
            Self::Admin(message) => message,
        }
    }

    /// Classify a non-success status, preferring the backend's own message.
    pub(crate) fn classify(self, status: StatusCode, backend_message: Option<String>) -> GatewayError {
        let has_body = backend_message.is_some();
        let message = backend_message.unwrap_or_else(|| self.default_message().to_owned());
        let code = status.as_u16();

        match self {
            Self::Registration if status.is_client_error() || has_body => {
                GatewayError::Validation(message)
            }
            Self::Login if matches!(code, 400 | 401 | 403) => GatewayError::Auth(message),
            Self::ProductLookup | Self::OrderLookup if status == StatusCode::NOT_FOUND => {
                GatewayError::NotFound(message)
            }
            Self::OrderSubmission if status.is_client_error() => GatewayError::Validation(message),
            Self::Admin(_) if matches!(code, 401 | 403) => GatewayError::Auth(message),
            Self::Admin(_) if status == StatusCode::NOT_FOUND => GatewayError::NotFound(message),
            Self::Admin(_) if status.is_client_error() => GatewayError::Validation(message),
            _ => GatewayError::Network(format!("HTTP {code}: {message}")),
        }
    }
}

/// Source the store loads its catalog from.
///
/// Implemented by [`GatewayClient`]; tests substitute in-memory sources.
pub trait CatalogSource: Send + Sync {
    /// Fetch the full product catalog.
    fn fetch_catalog(&self) -> impl Future<Output = Result<Vec<Product>, GatewayError>> + Send;
}

// =============================================================================
// GatewayClient
// =============================================================================

/// Client for the customer-facing backend endpoints.
#[derive(Clone)]
pub struct GatewayClient {
    inner: Arc<GatewayClientInner>,
}

struct GatewayClientInner {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    /// Create a new gateway client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = build_http_client(config)?;

        Ok(Self {
            inner: Arc::new(GatewayClientInner {
                client,
                config: config.clone(),
            }),
        })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    fn url(&self, path: &str) -> String {
        self.inner.config.endpoint(path)
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Validation` when the backend rejects the
    /// payload (the backend's message is kept), or `Network` on transport
    /// failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register_user(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
    ) -> Result<User, GatewayError> {
        let body = serde_json::json!({
            "name": name,
            "email": email.as_str(),
            "password": expose(password),
        });

        let request = self.inner.client.post(self.url("auth/register")).json(&body);
        let user: WireUser = send(request, FailureMode::Registration).await?;
        convert_user(user)
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Auth` on invalid credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login_user(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<User, GatewayError> {
        let body = serde_json::json!({
            "email": email.as_str(),
            "password": expose(password),
        });

        let request = self.inner.client.post(self.url("auth/login")).json(&body);
        let user: WireUser = send(request, FailureMode::Login).await?;
        convert_user(user)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Network` on a non-success response.
    #[instrument(skip(self))]
    pub async fn fetch_catalog(&self) -> Result<Vec<Product>, GatewayError> {
        let request = self.inner.client.get(self.url("products"));
        let products: Vec<WireProduct> = send(request, FailureMode::ProductListing).await?;
        let products = convert_products(products)?;
        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_product(&self, id: &ProductId) -> Result<Product, GatewayError> {
        let path = format!("products/{}", urlencoding::encode(id.as_str()));
        let request = self.inner.client.get(self.url(&path));
        let product: WireProduct = send(request, FailureMode::ProductLookup).await?;
        convert_product(product)
    }

    /// Fetch the products in one category.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Network` on a non-success response.
    #[instrument(skip(self))]
    pub async fn fetch_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, GatewayError> {
        let path = format!("products/category/{}", urlencoding::encode(category));
        let request = self.inner.client.get(self.url(&path));
        let products: Vec<WireProduct> = send(request, FailureMode::ProductListing).await?;
        convert_products(products)
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Submit a checkout and return the backend's persisted order.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Validation` if the backend rejects the order,
    /// `Network` otherwise.
    #[instrument(skip(self, order), fields(order_number = %order.order_number))]
    pub async fn submit_order(&self, order: &NewOrder) -> Result<Order, GatewayError> {
        let body = WireNewOrder::from(order);
        let request = self.inner.client.post(self.url("orders")).json(&body);
        let created: WireOrder = send(request, FailureMode::OrderSubmission).await?;
        convert_order(created)
    }

    /// Fetch every order placed by a user.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Network` on a non-success response.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn fetch_user_orders(&self, user_id: &UserId) -> Result<Vec<Order>, GatewayError> {
        let path = format!("orders/user/{}", urlencoding::encode(user_id.as_str()));
        let request = self.inner.client.get(self.url(&path));
        let orders: Vec<WireOrder> = send(request, FailureMode::OrderListing).await?;
        convert_orders(orders)
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn fetch_order(&self, id: &OrderId) -> Result<Order, GatewayError> {
        let path = format!("orders/{}", urlencoding::encode(id.as_str()));
        let request = self.inner.client.get(self.url(&path));
        let order: WireOrder = send(request, FailureMode::OrderLookup).await?;
        convert_order(order)
    }
}

impl CatalogSource for GatewayClient {
    fn fetch_catalog(&self) -> impl Future<Output = Result<Vec<Product>, GatewayError>> + Send {
        Self::fetch_catalog(self)
    }
}

// =============================================================================
// Shared request plumbing
// =============================================================================

/// Build the underlying HTTP client with the configured timeout.
pub(crate) fn build_http_client(config: &GatewayConfig) -> Result<reqwest::Client, GatewayError> {
    Ok(reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(concat!("shopez-storefront/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Send a request and decode a 2xx JSON body.
///
/// Non-success statuses are classified by `mode`; bodies that fail to
/// decode are validation errors.
pub(crate) async fn send<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    mode: FailureMode,
) -> Result<T, GatewayError> {
    let body = send_raw(request, mode).await?;

    serde_json::from_str(&body).map_err(|e| {
        warn!(
            error = %e,
            body = %excerpt(&body),
            "Backend response did not match the expected schema"
        );
        GatewayError::Validation(format!("malformed response: {e}"))
    })
}

/// Send a request, returning the raw 2xx body.
pub(crate) async fn send_raw(
    request: reqwest::RequestBuilder,
    mode: FailureMode,
) -> Result<String, GatewayError> {
    let request_id = Uuid::new_v4().to_string();

    let response = request
        .header(REQUEST_ID_HEADER, &request_id)
        .header(ACCEPT, "application/json")
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let error = mode.classify(status, backend_message(&body));
        warn!(
            request_id = %request_id,
            status = %status,
            error = %error,
            "Backend returned non-success status"
        );
        return Err(error);
    }

    debug!(request_id = %request_id, status = %status, "Backend request succeeded");
    Ok(body)
}

/// Extract the `{error}` (or `{message}`) string from an error body.
fn backend_message(body: &str) -> Option<String> {
    let parsed: WireErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty())
}

fn excerpt(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
