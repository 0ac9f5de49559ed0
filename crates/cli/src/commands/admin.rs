//! Admin console commands.
//!
//! # Usage
//!
//! ```bash
//! SHOPEZ_ADMIN_TOKEN=... shopez admin users
//! SHOPEZ_ADMIN_TOKEN=... shopez admin products
//! SHOPEZ_ADMIN_TOKEN=... shopez admin orders
//! SHOPEZ_ADMIN_TOKEN=... shopez admin delete-product 64f1c2
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPEZ_ADMIN_TOKEN` - Token sent as `x-admin-token`

use shopez_core::ProductId;
use shopez_storefront::gateway::AdminClient;
use tracing::info;

use super::{CommandError, CommandResult, Context, stdout};
use crate::render;

fn client(ctx: &Context) -> Result<AdminClient, CommandError> {
    let token = ctx.config.require_admin_token()?.clone();
    Ok(AdminClient::new(&ctx.config.gateway, token)?)
}

pub async fn users(ctx: &Context) -> CommandResult {
    let users = client(ctx)?.list_users().await?;
    render::users(&mut stdout(), &users)?;
    Ok(())
}

pub async fn products(ctx: &Context) -> CommandResult {
    let products = client(ctx)?.list_products().await?;
    render::product_list(&mut stdout(), &products)?;
    Ok(())
}

pub async fn orders(ctx: &Context) -> CommandResult {
    let orders = client(ctx)?.list_orders().await?;
    render::admin_orders(&mut stdout(), &orders)?;
    Ok(())
}

pub async fn delete_product(ctx: &Context, id: &str) -> CommandResult {
    client(ctx)?.delete_product(&ProductId::new(id)).await?;
    info!(product_id = id, "Deleted product");
    Ok(())
}
