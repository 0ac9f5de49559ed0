//! Account commands.
//!
//! # Environment Variables
//!
//! - `SHOPEZ_PASSWORD` - Account password (never taken as a flag)
//! - `SHOPEZ_PASSWORD_CONFIRM` - Confirmation for `register` (defaults to `SHOPEZ_PASSWORD`)

use shopez_storefront::services::{Registration, account};
use shopez_storefront::store::Store;

use super::{CommandResult, Context, env_secret, stdout};
use crate::render;

const PASSWORD_VAR: &str = "SHOPEZ_PASSWORD";
const PASSWORD_CONFIRM_VAR: &str = "SHOPEZ_PASSWORD_CONFIRM";

/// Log in and print the session user.
pub async fn login(ctx: &Context, email: &str) -> CommandResult {
    let store = Store::new();
    let password = env_secret(PASSWORD_VAR)?;

    let user = account::login(&ctx.gateway, &store, email, &password).await?;
    render::user(&mut stdout(), &user)?;
    Ok(())
}

/// Register a new account and print it.
pub async fn register(
    ctx: &Context,
    first_name: String,
    last_name: String,
    email: String,
    accept_terms: bool,
) -> CommandResult {
    let store = Store::new();
    let password = env_secret(PASSWORD_VAR)?;
    let confirm_password = env_secret(PASSWORD_CONFIRM_VAR).unwrap_or_else(|_| password.clone());

    let registration = Registration {
        first_name,
        last_name,
        email,
        password,
        confirm_password,
        accept_terms,
    };

    let user = account::register(&ctx.gateway, &store, &registration).await?;
    render::user(&mut stdout(), &user)?;
    Ok(())
}
