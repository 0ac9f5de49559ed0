//! Authenticated storefront users.

use serde::{Deserialize, Serialize};

use super::{Email, UserId};

/// The identity behind a logged-in session.
///
/// Set wholesale on login or registration and cleared wholesale on logout;
/// there are no partial updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Display name.
    pub name: String,
    pub email: Email,
}
