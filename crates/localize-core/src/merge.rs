//! Folds per-chain product lists into one deduplicated catalog.
//!
//! Products are keyed by `gtin`. The first chain to report a product fixes its
//! `title`, `image_url`, and position in the output; every later report only
//! widens the price range and appends its store features. Products that are
//! not in stock anywhere are dropped before they reach the map.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::error::MergeError;
use crate::products::{MergedProduct, NormalizedProduct};

/// Accumulates [`NormalizedProduct`]s into [`MergedProduct`]s.
///
/// The merge is order-sensitive: feed chains in registry order to get a
/// deterministic result.
#[derive(Debug, Default)]
pub struct ProductMerger {
    products: IndexMap<String, MergedProduct>,
}

impl ProductMerger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one product into the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError`] if `product` breaks the adapter contract (see
    /// [`NormalizedProduct::validate`]). The catalog is left unchanged.
    pub fn merge_product(&mut self, product: NormalizedProduct) -> Result<(), MergeError> {
        if product.available_at.is_empty() {
            return Ok(());
        }

        product.validate()?;

        match self.products.entry(product.gtin.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(MergedProduct::from(product));
            }
            Entry::Occupied(mut existing) => existing.get_mut().absorb(product),
        }

        Ok(())
    }

    /// Folds every product of one chain's result list, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first product that fails validation.
    pub fn merge_products<I>(&mut self, products: I) -> Result<(), MergeError>
    where
        I: IntoIterator<Item = NormalizedProduct>,
    {
        products
            .into_iter()
            .try_for_each(|product| self.merge_product(product))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Merged products in the order their `gtin` was first seen.
    #[must_use]
    pub fn finish(self) -> Vec<MergedProduct> {
        self.products.into_values().collect()
    }
}

/// Merges the result lists of all chains, given in registry order.
///
/// # Errors
///
/// Returns [`MergeError`] on the first product that breaks the adapter
/// contract.
pub fn merge_results(
    results: Vec<Vec<NormalizedProduct>>,
) -> Result<Vec<MergedProduct>, MergeError> {
    let mut merger = ProductMerger::new();
    for products in results {
        merger.merge_products(products)?;
    }
    Ok(merger.finish())
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
