//! Catalog browsing commands.

use shopez_core::{ProductId, resolve_category_slug};
use tracing::debug;

use super::{CommandError, CommandResult, Context, stdout};
use crate::render;

/// List products, optionally narrowed to a category label or route slug.
pub async fn products(ctx: &Context, category: Option<&str>) -> CommandResult {
    let store = ctx.loaded_store().await?;

    if let Some(slug) = category {
        let label = resolve_category_slug(slug, &store.categories());
        debug!(slug, label = %label, "Resolved category");
        store.set_category_filter(label);
    }

    render::product_list(&mut stdout(), &store.visible_products())?;
    Ok(())
}

/// Show one product.
pub async fn product(ctx: &Context, id: &str) -> CommandResult {
    let product = ctx.gateway.fetch_product(&ProductId::new(id)).await?;
    render::product_detail(&mut stdout(), &product)?;
    Ok(())
}

/// List the distinct categories in the catalog.
pub async fn categories(ctx: &Context) -> CommandResult {
    let store = ctx.loaded_store().await?;
    render::categories(&mut stdout(), &store.categories())?;
    Ok(())
}

/// Search product titles.
pub async fn search(ctx: &Context, query: &str) -> CommandResult {
    let store = ctx.loaded_store().await?;
    store.apply_search(query);
    render::product_list(&mut stdout(), &store.catalog())?;
    Ok(())
}

/// Parse `ID[=QTY]`; quantity defaults to 1.
fn parse_item(item: &str) -> Result<(ProductId, u32), CommandError> {
    let (id, quantity) = match item.split_once('=') {
        Some((id, qty)) => {
            let qty = qty.trim().parse::<u32>().map_err(|e| {
                CommandError::InvalidArgument(format!("quantity in '{item}': {e}"))
            })?;
            (id, qty)
        }
        None => (item, 1),
    };

    let id = id.trim();
    if id.is_empty() {
        return Err(CommandError::InvalidArgument(format!(
            "missing product id in '{item}'"
        )));
    }
    Ok((ProductId::new(id), quantity))
}

/// Build a cart from catalog products and print its totals.
pub async fn quote(ctx: &Context, items: &[String]) -> CommandResult {
    let parsed = items
        .iter()
        .map(|item| parse_item(item))
        .collect::<Result<Vec<_>, _>>()?;

    let store = ctx.loaded_store().await?;
    for (id, quantity) in parsed {
        let product = store.product(&id).ok_or_else(|| {
            CommandError::Storefront(shopez_storefront::Error::NotFound(format!("product {id}")))
        })?;
        store.add_to_cart(&product, quantity);
    }

    render::cart(&mut stdout(), &store.cart(), &store.cart_totals())?;
    Ok(())
}
