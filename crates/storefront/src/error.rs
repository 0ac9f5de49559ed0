//! Unified error handling with Sentry integration.
//!
//! Provides a crate-level `Error` that callers (the CLI, a UI shell) report
//! once at the edge, plus helpers for the Sentry user context and
//! breadcrumbs.

use thiserror::Error;

use crate::config::ConfigError;
use crate::gateway::GatewayError;
use crate::services::{AccountError, CheckoutError};

/// Storefront client error.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A backend request failed.
    #[error("{0}")]
    Gateway(#[from] GatewayError),

    /// Login or registration failed.
    #[error("{0}")]
    Account(#[from] AccountError),

    /// Checkout failed.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    /// Requested entity is not in the store or backend.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// The gateway error underneath, if any.
    #[must_use]
    pub const fn gateway(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(e)
            | Self::Account(AccountError::Gateway(e))
            | Self::Checkout(CheckoutError::Gateway(e)) => Some(e),
            _ => None,
        }
    }

    /// Whether this error points at infrastructure rather than user input.
    ///
    /// Network failures and bad configuration are worth an error report;
    /// rejected credentials or an empty cart are not.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Config(_) => true,
            _ => matches!(self.gateway(), Some(GatewayError::Network(_))),
        }
    }

    /// Log the error and send it to Sentry when it is reportable.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront request rejected");
        }
    }
}

/// Result type alias for `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Set the Sentry user context.
///
/// Call this after successful login to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a user action.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Order placed", Some(&[("order_number", "SE123456")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
