//! Fan-out search across all store adapters.

use std::sync::Arc;

use futures::future::join_all;
use localize_core::{merge_results, AppConfig, SearchResponse, StoreAddressMap};

use crate::adapter::StoreAdapter;
use crate::error::{SearchError, StoreError};
use crate::registry::default_stores;

#[derive(Debug, Clone)]
pub struct SearchEngine {
    stores: Vec<Arc<dyn StoreAdapter>>,
}

impl SearchEngine {
    /// Creates an engine over `stores`; their order is the merge order.
    #[must_use]
    pub fn new(stores: Vec<Arc<dyn StoreAdapter>>) -> Self {
        Self { stores }
    }

    /// # Errors
    ///
    /// See [`default_stores`].
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        Ok(Self::new(default_stores(config)?))
    }

    #[must_use]
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// Searches every store concurrently and merges the results by GTIN.
    ///
    /// An empty query returns an empty response without contacting any store.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Merge`] if an adapter hands over a product that
    /// cannot be merged.
    pub async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        if query.is_empty() {
            return Ok(SearchResponse::empty());
        }

        let store_addresses = StoreAddressMap::new();

        let results = join_all(
            self.stores
                .iter()
                .map(|store| store.product_search(query, &store_addresses)),
        )
        .await;

        for (store, products) in self.stores.iter().zip(&results) {
            tracing::debug!(
                store = store.name(),
                count = products.len(),
                "store returned products"
            );
        }

        let products = merge_results(results)?;
        let store_addresses = store_addresses.into_inner();

        tracing::info!(
            query,
            products = products.len(),
            stores = store_addresses.len(),
            "search complete"
        );

        Ok(SearchResponse {
            products,
            store_addresses,
        })
    }
}
