//! Wire types for the dm product search and store availability APIs.

use serde::Deserialize;

use crate::types::{FlexibleId, VendorPrice};

#[derive(Debug, Deserialize)]
pub(crate) struct DmSearchResponse {
    #[serde(default)]
    pub products: Option<Vec<DmProduct>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DmProduct {
    pub dan: FlexibleId,
    #[serde(default)]
    pub gtin: Option<FlexibleId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url_templates: Vec<String>,
    pub price: VendorPrice,
    #[serde(default)]
    pub relative_product_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DmAvailabilityResponse {
    #[serde(default)]
    pub store_availability: Option<Vec<DmStoreAvailability>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DmStoreAvailability {
    pub store: DmStoreRef,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub stock_level: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DmStoreRef {
    pub store_number: FlexibleId,
}
