//! Rossmann adapter.
//!
//! The storefinder only answers "which stores near this postcode carry the
//! product", so availability is assembled from one call per configured
//! postcode and folded into a single per-product store map.

mod types;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use localize_core::{
    AppConfig, AvailabilityFeature, FeatureProperties, NormalizedProduct, Price, StoreAddressMap,
    StoreDirectory,
};
use reqwest::Url;

use crate::adapter::{keep_valid, StoreAdapter};
use crate::client::{endpoint, StoreHttpClient};
use crate::error::StoreError;

use self::types::{RossmannProduct, RossmannSearchResponse, RossmannStore, RossmannStoreResponse};

const STORE: &str = "rossmann";
const PRODUCT_PAGE_ORIGIN: &str = "https://www.rossmann.de/de";
const IMAGE_SIZE_QUERY: &str = "?width=310&height=140&fit=bounds";

#[derive(Debug, Clone)]
pub struct RossmannSettings {
    pub product_search_api: String,
    pub store_availability_api: String,
    /// Stores outside this city are ignored even if the storefinder returns them.
    pub city: String,
    pub max_concurrent_requests: usize,
}

impl From<&AppConfig> for RossmannSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            product_search_api: config.rossmann_product_search_api.clone(),
            store_availability_api: config.rossmann_store_availability_api.clone(),
            city: config.rossmann_city.clone(),
            max_concurrent_requests: config.max_concurrent_requests,
        }
    }
}

#[derive(Debug)]
pub struct RossmannAdapter {
    client: StoreHttpClient,
    settings: RossmannSettings,
    directory: StoreDirectory,
    postcodes: Vec<String>,
}

/// Everything a storefinder result needs to become a feature.
struct ProductContext<'a> {
    price: &'a Price,
    product_url: &'a str,
}

impl RossmannAdapter {
    #[must_use]
    pub fn new(
        client: StoreHttpClient,
        settings: RossmannSettings,
        directory: StoreDirectory,
        postcodes: Vec<String>,
    ) -> Self {
        Self {
            client,
            settings,
            directory,
            postcodes,
        }
    }

    async fn search(
        &self,
        query: &str,
        store_addresses: &StoreAddressMap,
    ) -> Result<Vec<NormalizedProduct>, StoreError> {
        let url = self.search_url(query)?;
        let response: Option<RossmannSearchResponse> =
            self.client.get_json(url, "rossmann product search").await?;
        let products = response
            .and_then(|r| r.products)
            .and_then(|page| page.results)
            .unwrap_or_default();

        tracing::debug!(store = STORE, count = products.len(), "product search returned");

        let normalized = stream::iter(products)
            .map(|product| self.normalize(product, store_addresses))
            .buffered(self.concurrency())
            .collect::<Vec<_>>()
            .await;

        Ok(normalized)
    }

    async fn normalize(
        &self,
        product: RossmannProduct,
        store_addresses: &StoreAddressMap,
    ) -> NormalizedProduct {
        let product_url = format!("{PRODUCT_PAGE_ORIGIN}{}", product.url);
        let dan = product.dan.to_string();
        let mut normalized = NormalizedProduct {
            gtin: product.code.map(|c| c.to_string()).unwrap_or_default(),
            title: product.name,
            image_url: format!("{}{IMAGE_SIZE_QUERY}", product.teaserimageurl),
            price: Price::from(product.price),
            available_at: Vec::new(),
        };

        // Invalid products are dropped later; their stores must not be registered.
        if normalized.validate().is_err() {
            return normalized;
        }

        normalized.available_at = self
            .product_availability(
                &dan,
                &ProductContext {
                    price: &normalized.price,
                    product_url: &product_url,
                },
                store_addresses,
            )
            .await;

        normalized
    }

    /// Queries every postcode and folds the answers in postcode order.
    async fn product_availability(
        &self,
        dan: &str,
        product: &ProductContext<'_>,
        store_addresses: &StoreAddressMap,
    ) -> Vec<AvailabilityFeature> {
        let lookups: Vec<_> = self
            .postcodes
            .iter()
            .map(|postcode| self.postcode_stores(dan, postcode))
            .collect();
        let per_postcode = stream::iter(lookups)
            .buffered(self.concurrency())
            .collect::<Vec<_>>()
            .await;

        let mut features = IndexMap::new();
        for stores in per_postcode.into_iter().flatten() {
            fold_stores(
                &mut features,
                stores,
                &self.directory,
                &self.settings.city,
                product,
                store_addresses,
            );
        }
        features.into_values().collect()
    }

    /// One postcode's storefinder answer; `None` if the lookup failed.
    async fn postcode_stores(&self, dan: &str, postcode: &str) -> Option<Vec<RossmannStore>> {
        match self.fetch_stores(dan, postcode).await {
            Ok(stores) => Some(stores),
            Err(e) => {
                tracing::warn!(
                    store = STORE,
                    dan,
                    postcode,
                    error = %e,
                    "storefinder lookup failed"
                );
                None
            }
        }
    }

    async fn fetch_stores(
        &self,
        dan: &str,
        postcode: &str,
    ) -> Result<Vec<RossmannStore>, StoreError> {
        let url = self.availability_url(dan, postcode)?;
        let response: Option<RossmannStoreResponse> =
            self.client.get_json(url, "rossmann storefinder").await?;
        Ok(response.and_then(|r| r.store).unwrap_or_default())
    }

    fn search_url(&self, query: &str) -> Result<Url, StoreError> {
        let mut url = endpoint(&self.settings.product_search_api, &["de", "search", "suggest"])?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    fn availability_url(&self, dan: &str, postcode: &str) -> Result<Url, StoreError> {
        let mut url = endpoint(
            &self.settings.store_availability_api,
            &["storefinder", ".rest", "store"],
        )?;
        url.query_pairs_mut()
            .append_pair("dan", dan)
            .append_pair("q", postcode);
        Ok(url)
    }

    fn concurrency(&self) -> usize {
        self.settings.max_concurrent_requests.max(1)
    }
}

#[async_trait]
impl StoreAdapter for RossmannAdapter {
    fn name(&self) -> &'static str {
        STORE
    }

    async fn product_search(
        &self,
        query: &str,
        store_addresses: &StoreAddressMap,
    ) -> Vec<NormalizedProduct> {
        match self.search(query, store_addresses).await {
            Ok(products) => keep_valid(STORE, products),
            Err(e) => {
                tracing::warn!(store = STORE, error = %e, "product search failed");
                Vec::new()
            }
        }
    }
}

/// Adds one postcode's storefinder answer to the product's feature map.
///
/// A store already in the map keeps its first feature.
fn fold_stores(
    features: &mut IndexMap<String, AvailabilityFeature>,
    stores: Vec<RossmannStore>,
    directory: &StoreDirectory,
    city: &str,
    product: &ProductContext<'_>,
    store_addresses: &StoreAddressMap,
) {
    for store in stores {
        if !store.available() || store.city != city {
            continue;
        }

        let raw_id = store.id.to_string();
        let store_id = format!("ROSSMANN_{raw_id}");
        if features.contains_key(&store_id) {
            continue;
        }

        let Some(record) = directory.get(&raw_id) else {
            tracing::debug!(store = STORE, store_id = %raw_id, "unknown store, skipping");
            continue;
        };

        store_addresses.insert_if_absent(&store_id, record);

        let feature = AvailabilityFeature::at(
            FeatureProperties {
                store_id: store_id.clone(),
                in_stock: true,
                formatted_price: product.price.formatted_value.clone(),
                stock_level: None,
                url: product.product_url.to_owned(),
            },
            &record.location,
        );
        features.insert(store_id, feature);
    }
}
