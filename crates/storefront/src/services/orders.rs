//! Order history refresh.

use tracing::{debug, instrument};

use crate::gateway::{GatewayClient, GatewayError};
use crate::store::Store;

/// Replace the session's order history with the logged-in user's orders.
///
/// Returns the number of orders fetched. Without a session user no request
/// is made and 0 is returned.
///
/// # Errors
///
/// Returns `GatewayError::Network` if the listing fails; the history is left
/// as it was.
#[instrument(skip_all)]
pub async fn refresh_history(gateway: &GatewayClient, store: &Store) -> Result<usize, GatewayError> {
    let Some(user) = store.user() else {
        debug!("No session user, skipping order history refresh");
        return Ok(0);
    };

    let orders = gateway.fetch_user_orders(&user.id).await?;
    let count = orders.len();
    store.replace_orders(orders);

    debug!(count, user_id = %user.id, "Order history refreshed");
    Ok(count)
}
