//! Login, registration and logout.

use secrecy::{ExposeSecret, SecretString};
use shopez_core::{Email, EmailError, User};
use thiserror::Error;
use tracing::{info, instrument};

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::gateway::{GatewayClient, GatewayError};
use crate::store::Store;

/// Errors from account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Email failed local validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// First or last name is blank.
    #[error("first and last name are required")]
    MissingName,

    /// Password is blank.
    #[error("password is required")]
    MissingPassword,

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Terms and conditions were not accepted.
    #[error("please agree to the terms and conditions")]
    TermsNotAccepted,

    /// The backend call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Registration form input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub accept_terms: bool,
}

impl Registration {
    /// Display name sent to the backend.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Run the checks that need no backend round trip.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate(&self) -> Result<Email, AccountError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(AccountError::MissingName);
        }
        if self.password.expose_secret().is_empty() {
            return Err(AccountError::MissingPassword);
        }
        if self.password.expose_secret() != self.confirm_password.expose_secret() {
            return Err(AccountError::PasswordMismatch);
        }
        if !self.accept_terms {
            return Err(AccountError::TermsNotAccepted);
        }
        Ok(Email::parse(&self.email)?)
    }
}

fn start_session(store: &Store, user: &User) {
    store.set_user(Some(user.clone()));
    set_sentry_user(&user.id, Some(user.email.as_str()));
}

/// Log in and make the user the session identity.
///
/// # Errors
///
/// Returns `AccountError::Gateway(GatewayError::Auth(_))` on bad credentials.
#[instrument(skip(gateway, store, password))]
pub async fn login(
    gateway: &GatewayClient,
    store: &Store,
    email: &str,
    password: &SecretString,
) -> Result<User, AccountError> {
    let email = Email::parse(email)?;
    if password.expose_secret().is_empty() {
        return Err(AccountError::MissingPassword);
    }

    let user = gateway.login_user(&email, password).await?;
    start_session(store, &user);
    add_breadcrumb("auth", "Logged in", None);

    info!(user_id = %user.id, "User logged in");
    Ok(user)
}

/// Create an account and make it the session identity.
///
/// # Errors
///
/// Returns a local validation error before any request is made, or
/// `AccountError::Gateway` if the backend rejects the registration.
#[instrument(skip_all, fields(email = %registration.email))]
pub async fn register(
    gateway: &GatewayClient,
    store: &Store,
    registration: &Registration,
) -> Result<User, AccountError> {
    let email = registration.validate()?;

    let user = gateway
        .register_user(&registration.display_name(), &email, &registration.password)
        .await?;
    start_session(store, &user);
    add_breadcrumb("auth", "Registered", None);

    info!(user_id = %user.id, "User registered");
    Ok(user)
}

/// End the session. Cart, favorites and orders stay.
pub fn logout(store: &Store) {
    store.set_user(None);
    clear_sentry_user();
    add_breadcrumb("auth", "Logged out", None);
    info!("User logged out");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            first_name: "Ada".to_string(),
            last_name: " Lovelace ".to_string(),
            email: "ada@example.com".to_string(),
            password: SecretString::from("analytical-engine"),
            confirm_password: SecretString::from("analytical-engine"),
            accept_terms: true,
        }
    }

    #[test]
    fn test_valid_registration() {
        let reg = registration();
        assert_eq!(reg.validate().unwrap().as_str(), "ada@example.com");
        assert_eq!(reg.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_password_mismatch() {
        let reg = Registration {
            confirm_password: SecretString::from("difference-engine"),
            ..registration()
        };
        assert!(matches!(reg.validate(), Err(AccountError::PasswordMismatch)));
    }

    #[test]
    fn test_terms_required() {
        let reg = Registration {
            accept_terms: false,
            ..registration()
        };
        assert!(matches!(reg.validate(), Err(AccountError::TermsNotAccepted)));
    }

    #[test]
    fn test_bad_email() {
        let reg = Registration {
            email: "ada-at-example.com".to_string(),
            ..registration()
        };
        assert!(matches!(reg.validate(), Err(AccountError::InvalidEmail(_))));
    }

    #[test]
    fn test_logout_keeps_cart() {
        use shopez_core::{Price, Product, ProductId, Rating, UserId};

        let store = Store::new();
        store.set_user(Some(User {
            id: UserId::new("u1"),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
        }));
        store.add_to_cart(
            &Product {
                id: ProductId::new("1"),
                title: "Ring".to_string(),
                price: Price::from_cents(100),
                image: String::new(),
                category: "jewelery".to_string(),
                rating: Rating::default(),
                description: String::new(),
            },
            1,
        );

        logout(&store);

        assert!(store.user().is_none());
        assert_eq!(store.cart_line_count(), 1);
    }
}
