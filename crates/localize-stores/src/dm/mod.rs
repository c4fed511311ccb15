//! dm-drogerie markt adapter.
//!
//! One product search call, then one availability call per product that asks
//! for every store in the dm directory at once.

mod types;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use localize_core::{
    AppConfig, AvailabilityFeature, FeatureProperties, NormalizedProduct, Price, StoreAddressMap,
    StoreDirectory,
};
use reqwest::Url;

use crate::adapter::{keep_valid, StoreAdapter};
use crate::client::{endpoint, StoreHttpClient};
use crate::error::StoreError;

use self::types::{DmAvailabilityResponse, DmProduct, DmSearchResponse, DmStoreAvailability};

const STORE: &str = "dm";
const PRODUCT_PAGE_ORIGIN: &str = "https://www.dm.de";
const IMAGE_TRANSFORMATIONS: &str = "f_auto,q_auto,c_fit,h_270,w_260";

#[derive(Debug, Clone)]
pub struct DmSettings {
    pub product_search_api: String,
    pub store_availability_api: String,
    pub max_concurrent_requests: usize,
}

impl From<&AppConfig> for DmSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            product_search_api: config.dm_product_search_api.clone(),
            store_availability_api: config.dm_store_availability_api.clone(),
            max_concurrent_requests: config.max_concurrent_requests,
        }
    }
}

#[derive(Debug)]
pub struct DmAdapter {
    client: StoreHttpClient,
    settings: DmSettings,
    directory: StoreDirectory,
    /// Comma-joined store numbers of the whole directory, sent with every
    /// availability request.
    store_numbers: String,
}

impl DmAdapter {
    #[must_use]
    pub fn new(client: StoreHttpClient, settings: DmSettings, directory: StoreDirectory) -> Self {
        let store_numbers = directory.store_ids().collect::<Vec<_>>().join(",");
        Self {
            client,
            settings,
            directory,
            store_numbers,
        }
    }

    async fn search(
        &self,
        query: &str,
        store_addresses: &StoreAddressMap,
    ) -> Result<Vec<NormalizedProduct>, StoreError> {
        let url = self.search_url(query)?;
        let response: Option<DmSearchResponse> =
            self.client.get_json(url, "dm product search").await?;
        let products = response.and_then(|r| r.products).unwrap_or_default();

        tracing::debug!(store = STORE, count = products.len(), "product search returned");

        let normalized = stream::iter(products)
            .map(|product| self.normalize(product, store_addresses))
            .buffered(self.settings.max_concurrent_requests.max(1))
            .collect::<Vec<_>>()
            .await;

        Ok(normalized)
    }

    async fn normalize(
        &self,
        product: DmProduct,
        store_addresses: &StoreAddressMap,
    ) -> NormalizedProduct {
        let product_url = format!("{PRODUCT_PAGE_ORIGIN}{}", product.relative_product_url);
        let dan = product.dan.to_string();
        let mut normalized = NormalizedProduct {
            gtin: product.gtin.map(|g| g.to_string()).unwrap_or_default(),
            image_url: image_url(&product.image_url_templates),
            title: product.title,
            price: Price::from(product.price),
            available_at: Vec::new(),
        };

        // Invalid products are dropped later; their stores must not be registered.
        if normalized.validate().is_err() {
            return normalized;
        }

        normalized.available_at = match self.fetch_availability(&dan).await {
            Ok(entries) => availability_features(
                &self.directory,
                entries,
                &normalized.price,
                &product_url,
                store_addresses,
            ),
            Err(e) => {
                tracing::warn!(store = STORE, dan = %dan, error = %e, "availability lookup failed");
                Vec::new()
            }
        };

        normalized
    }

    async fn fetch_availability(
        &self,
        dan: &str,
    ) -> Result<Vec<DmStoreAvailability>, StoreError> {
        let url = self.availability_url(dan)?;
        let response: Option<DmAvailabilityResponse> =
            self.client.get_json(url, "dm store availability").await?;
        Ok(response
            .and_then(|r| r.store_availability)
            .unwrap_or_default())
    }

    fn search_url(&self, query: &str) -> Result<Url, StoreError> {
        let mut url = endpoint(&self.settings.product_search_api, &["de", "search"])?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("searchType", "product")
            .append_pair("type", "search");
        Ok(url)
    }

    fn availability_url(&self, dan: &str) -> Result<Url, StoreError> {
        let mut url = endpoint(
            &self.settings.store_availability_api,
            &[
                "store-availability",
                "DE",
                "products",
                "dans",
                dan,
                "availability-with-listing",
            ],
        )?;
        url.query_pairs_mut()
            .append_pair("storeNumbers", &self.store_numbers)
            .append_pair("view", "basic");
        Ok(url)
    }
}

#[async_trait]
impl StoreAdapter for DmAdapter {
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

fn image_url(templates: &[String]) -> String {
    templates
        .first()
        .map(|template| template.replace("{transformations}", IMAGE_TRANSFORMATIONS))
        .unwrap_or_default()
}

/// Turns in-stock availability entries into features and registers each
/// store's address.
fn availability_features(
    directory: &StoreDirectory,
    entries: Vec<DmStoreAvailability>,
    price: &Price,
    product_url: &str,
    store_addresses: &StoreAddressMap,
) -> Vec<AvailabilityFeature> {
    let mut features = Vec::new();

    for entry in entries {
        if !entry.in_stock {
            continue;
        }

        let store_number = entry.store.store_number.to_string();
        let Some(record) = directory.get(&store_number) else {
            tracing::debug!(store = STORE, store_number = %store_number, "unknown store, skipping");
            continue;
        };

        let store_id = format!("DM_{store_number}");
        store_addresses.insert_if_absent(&store_id, record);

        features.push(AvailabilityFeature::at(
            FeatureProperties {
                store_id,
                in_stock: true,
                formatted_price: price.formatted_value.clone(),
                stock_level: entry.stock_level,
                url: product_url.to_owned(),
            },
            &record.location,
        ));
    }

    features
}
