//! Order history commands.

use shopez_core::OrderId;
use shopez_storefront::services::{account, orders};
use shopez_storefront::store::Store;

use super::{CommandResult, Context, env_secret, stdout};
use crate::render;

/// Log in as `email` and list that user's orders, newest first.
pub async fn history(ctx: &Context, email: &str) -> CommandResult {
    let store = Store::new();
    let password = env_secret("SHOPEZ_PASSWORD")?;

    account::login(&ctx.gateway, &store, email, &password).await?;
    orders::refresh_history(&ctx.gateway, &store).await?;

    render::order_list(&mut stdout(), &store.orders())?;
    Ok(())
}

/// Show one order in detail.
pub async fn show(ctx: &Context, id: &str) -> CommandResult {
    let order = ctx.gateway.fetch_order(&OrderId::new(id)).await?;
    render::order_detail(&mut stdout(), &order)?;
    Ok(())
}
