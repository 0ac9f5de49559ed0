//! Catalog loading with generation sequencing.

use shopez_core::Product;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::Store;
use crate::gateway::{CatalogSource, GatewayError};

/// Outcome of a catalog load that reached the backend successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogLoad {
    /// The catalog was replaced with this many products.
    Applied(usize),
    /// A newer load or catalog replacement started first; the result was
    /// dropped.
    Superseded,
}

impl Store {
    /// Create a store and immediately start loading the catalog in the
    /// background.
    ///
    /// The returned handle resolves to the load's result; dropping it does
    /// not cancel the load.
    pub fn connect<S>(source: S) -> (Self, JoinHandle<Result<CatalogLoad, GatewayError>>)
    where
        S: CatalogSource + 'static,
    {
        let store = Self::new();
        let task_store = store.clone();

        info!("Spawning background catalog load");
        let handle = tokio::spawn(async move {
            let result = task_store.load_catalog(&source).await;
            match &result {
                Ok(CatalogLoad::Applied(count)) => info!(count, "Catalog loaded"),
                Ok(CatalogLoad::Superseded) => debug!("Initial catalog load superseded"),
                Err(e) => warn!(error = %e, "Initial catalog load failed"),
            }
            result
        });

        (store, handle)
    }

    /// Fetch the catalog from `source` and apply it.
    ///
    /// Sets `loading` while the fetch is in flight. On failure the catalog is
    /// left as it was and the error is returned; nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns the source's `GatewayError`.
    #[instrument(skip_all)]
    pub async fn load_catalog<S: CatalogSource>(
        &self,
        source: &S,
    ) -> Result<CatalogLoad, GatewayError> {
        let generation = self.begin_load();
        let result = source.fetch_catalog().await;
        self.finish_load(generation, result)
    }

    fn begin_load(&self) -> u64 {
        self.mutate(|state| {
            state.catalog_generation += 1;
            state.latest_load = state.catalog_generation;
            state.data.loading = true;
            (state.catalog_generation, true)
        })
    }

    fn finish_load(
        &self,
        generation: u64,
        result: Result<Vec<Product>, GatewayError>,
    ) -> Result<CatalogLoad, GatewayError> {
        self.mutate(|state| {
            let newest = state.latest_load == generation;
            if newest {
                state.data.loading = false;
            }

            let outcome = match result {
                Ok(products) if state.catalog_generation == generation => {
                    let count = products.len();
                    state.data.catalog = products;
                    Ok(CatalogLoad::Applied(count))
                }
                Ok(_) => {
                    debug!(
                        generation,
                        current = state.catalog_generation,
                        "Discarding stale catalog load"
                    );
                    Ok(CatalogLoad::Superseded)
                }
                Err(e) => Err(e),
            };

            let changed = newest || matches!(outcome, Ok(CatalogLoad::Applied(_)));
            (outcome, changed)
        })
    }
}
