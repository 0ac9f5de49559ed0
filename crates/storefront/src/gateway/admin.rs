//! Admin console client for the `/admin/*` endpoints.
//!
//! Every request carries the configured admin token in `x-admin-token`. The
//! token is opaque here; the backend decides what it grants.

use std::sync::Arc;

use reqwest::Method;
use secrecy::SecretString;
use shopez_core::{Order, Price, Product, ProductId, Rating, User};
use tracing::{info, instrument};

use super::conversions::{convert_admin_orders, convert_product, convert_products, convert_users};
use super::wire::{WireOrder, WireProduct, WireProductOut, WireRatingOut, WireUser};
use super::{FailureMode, GatewayError, build_http_client, send, send_raw};
use crate::config::{GatewayConfig, expose};

/// Header carrying the admin credential.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// An order as listed in the admin console, with the purchaser's name when
/// the backend populated it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminOrder {
    pub order: Order,
    pub purchaser_name: Option<String>,
}

/// Fields for creating or replacing a catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: Rating,
}

impl ProductDraft {
    /// Check the draft before sending it.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Validation` for a blank title or category.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.title.trim().is_empty() {
            return Err(GatewayError::Validation("title must not be blank".into()));
        }
        if self.category.trim().is_empty() {
            return Err(GatewayError::Validation("category must not be blank".into()));
        }
        Ok(())
    }

    fn to_wire(&self) -> WireProductOut<'_> {
        WireProductOut {
            title: &self.title,
            price: self.price.amount(),
            image: &self.image,
            category: &self.category,
            description: &self.description,
            rating: WireRatingOut {
                rate: self.rating.rate,
                count: self.rating.count,
            },
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            rating: product.rating,
        }
    }
}

/// Client for the admin endpoints.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    config: GatewayConfig,
    token: SecretString,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Create a new admin client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &GatewayConfig, token: SecretString) -> Result<Self, GatewayError> {
        let client = build_http_client(config)?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                config: config.clone(),
                token,
            }),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.inner
            .client
            .request(method, self.inner.config.endpoint(path))
            .header(ADMIN_TOKEN_HEADER, expose(&self.inner.token))
    }

    fn product_path(id: &ProductId) -> String {
        format!("admin/products/{}", urlencoding::encode(id.as_str()))
    }

    /// List every registered user.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Auth` if the token is rejected.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        let request = self.request(Method::GET, "admin/users");
        let users: Vec<WireUser> = send(request, FailureMode::Admin("Failed to fetch users")).await?;
        convert_users(users)
    }

    /// List the full catalog as the admin sees it.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Auth` if the token is rejected.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, GatewayError> {
        let request = self.request(Method::GET, "admin/products");
        let products: Vec<WireProduct> =
            send(request, FailureMode::Admin("Failed to fetch products")).await?;
        convert_products(products)
    }

    /// Create a product and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Validation` if the draft or the backend rejects it.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, GatewayError> {
        draft.validate()?;

        let request = self
            .request(Method::POST, "admin/products")
            .json(&draft.to_wire());
        let product: WireProduct = send(request, FailureMode::Admin("Save failed")).await?;
        let product = convert_product(product)?;

        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` if the product does not exist.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, GatewayError> {
        draft.validate()?;

        let request = self
            .request(Method::PUT, &Self::product_path(id))
            .json(&draft.to_wire());
        let product: WireProduct = send(request, FailureMode::Admin("Save failed")).await?;
        convert_product(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), GatewayError> {
        let request = self.request(Method::DELETE, &Self::product_path(id));
        send_raw(request, FailureMode::Admin("Delete failed")).await?;

        info!("Product deleted");
        Ok(())
    }

    /// List every order with purchaser names.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Auth` if the token is rejected.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<AdminOrder>, GatewayError> {
        let request = self.request(Method::GET, "admin/orders");
        let orders: Vec<WireOrder> = send(request, FailureMode::Admin("Failed to fetch orders")).await?;
        convert_admin_orders(orders)
    }
}
