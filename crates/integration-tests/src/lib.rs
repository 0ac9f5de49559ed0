//! Integration tests for ShopEZ against a running backend.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a backend with a seeded catalog
//! export SHOPEZ_API_URL=http://localhost:5000/api
//!
//! # Admin tests also need the console token
//! export SHOPEZ_ADMIN_TOKEN=...
//!
//! cargo test -p shopez-integration-tests -- --ignored
//! ```
//!
//! Every test is `#[ignore]`d so the default test run stays offline.

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::SecretString;
use shopez_storefront::config::StorefrontConfig;
use shopez_storefront::gateway::GatewayClient;
use shopez_storefront::services::Registration;

/// Password used for throwaway accounts.
pub const TEST_PASSWORD: &str = "integration-Pa55word";

/// Gateway plus configuration for one test.
pub struct TestContext {
    pub config: StorefrontConfig,
    pub gateway: GatewayClient,
}

impl TestContext {
    /// Build from `SHOPEZ_*` environment variables.
    ///
    /// # Panics
    ///
    /// Panics if configuration is invalid; tests should fail loudly.
    #[must_use]
    pub fn from_env() -> Self {
        let config = StorefrontConfig::from_env().expect("Failed to load SHOPEZ_* configuration");
        let gateway = GatewayClient::new(&config.gateway).expect("Failed to create gateway client");
        Self { config, gateway }
    }
}

/// Unique address so reruns never collide with an existing account.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", uuid::Uuid::new_v4().simple())
}

/// Registration for a fresh throwaway account.
#[must_use]
pub fn registration(email: &str) -> Registration {
    Registration {
        first_name: "Integration".to_string(),
        last_name: "Tester".to_string(),
        email: email.to_string(),
        password: SecretString::from(TEST_PASSWORD),
        confirm_password: SecretString::from(TEST_PASSWORD),
        accept_terms: true,
    }
}
