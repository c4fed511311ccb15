//! Wire types for the Rossmann search suggest and storefinder APIs.

use serde::Deserialize;

use crate::types::{FlexibleId, VendorPrice};

#[derive(Debug, Deserialize)]
pub(crate) struct RossmannSearchResponse {
    #[serde(default)]
    pub products: Option<RossmannProductPage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RossmannProductPage {
    #[serde(default)]
    pub results: Option<Vec<RossmannProduct>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RossmannProduct {
    /// The product's GTIN.
    #[serde(default)]
    pub code: Option<FlexibleId>,
    pub dan: FlexibleId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub teaserimageurl: String,
    pub price: VendorPrice,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RossmannStoreResponse {
    #[serde(default)]
    pub store: Option<Vec<RossmannStore>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RossmannStore {
    pub id: FlexibleId,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub product_info: Vec<RossmannProductInfo>,
}

impl RossmannStore {
    /// Availability of the queried product, read from the first info entry.
    pub fn available(&self) -> bool {
        self.product_info.first().is_some_and(|info| info.available)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RossmannProductInfo {
    #[serde(default)]
    pub available: bool,
}
