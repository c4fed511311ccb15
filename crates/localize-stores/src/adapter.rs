//! The contract every drugstore chain implements.

use std::fmt::Debug;

use async_trait::async_trait;
use localize_core::{NormalizedProduct, StoreAddressMap};

/// One drugstore chain's product search.
///
/// `product_search` never fails: upstream errors are logged and turned into
/// an empty list. For every store that ends up in a returned availability
/// feature, the adapter records the store's address in `store_addresses`.
#[async_trait]
pub trait StoreAdapter: Send + Sync + Debug {
    /// Short chain name used in logs.
    fn name(&self) -> &'static str;

    async fn product_search(
        &self,
        query: &str,
        store_addresses: &StoreAddressMap,
    ) -> Vec<NormalizedProduct>;
}

/// Drops products that would violate the merger's input contract.
pub(crate) fn keep_valid(
    store: &'static str,
    products: Vec<NormalizedProduct>,
) -> Vec<NormalizedProduct> {
    products
        .into_iter()
        .filter(|product| match product.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(store, error = %e, "dropping invalid product");
                false
            }
        })
        .collect()
}
