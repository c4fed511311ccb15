//! Product and availability shapes shared by every store adapter and the
//! merger.
//!
//! Availability is carried as `GeoJSON` so the response can be handed straight
//! to a map layer: each store is a `Feature` with a `Point` geometry whose
//! coordinates are `[longitude, latitude]`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::MergeError;
use crate::stores::{StoreLocation, StoreRecord};

/// A price as reported by a retailer, e.g. `{ value: 1.95, formattedValue: "1,95 €" }`.
///
/// Both vendors already return this exact shape, so it is deserialized
/// directly from their search responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub value: f64,
    pub formatted_value: String,
}

/// One product as reported by a single store adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProduct {
    /// Global Trade Item Number; identical products share it across chains.
    pub gtin: String,
    pub title: String,
    pub image_url: String,
    pub price: Price,
    /// Stores of this chain that have the product in stock. May be empty.
    pub available_at: Vec<AvailabilityFeature>,
}

impl NormalizedProduct {
    /// Checks the invariants every store adapter must uphold before handing a
    /// product to the merger.
    ///
    /// # Errors
    ///
    /// - [`MergeError::EmptyGtin`] if `gtin` is blank.
    /// - [`MergeError::InvalidPrice`] if the price is `NaN` or infinite.
    pub fn validate(&self) -> Result<(), MergeError> {
        if self.gtin.trim().is_empty() {
            return Err(MergeError::EmptyGtin {
                title: self.title.clone(),
            });
        }
        if !self.price.value.is_finite() {
            return Err(MergeError::InvalidPrice {
                gtin: self.gtin.clone(),
                value: self.price.value,
            });
        }
        Ok(())
    }
}

/// Stock status of one product at one store location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct AvailabilityFeature {
    pub properties: FeatureProperties,
    pub geometry: PointGeometry,
}

impl AvailabilityFeature {
    /// Builds a feature positioned at `location`.
    #[must_use]
    pub fn at(properties: FeatureProperties, location: &StoreLocation) -> Self {
        Self {
            properties,
            geometry: PointGeometry::from(location),
        }
    }

    #[must_use]
    pub fn store_id(&self) -> &str {
        &self.properties.store_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    /// Chain-prefixed store identifier, e.g. `"DM_1000"` or `"ROSSMANN_330"`.
    pub store_id: String,
    pub in_stock: bool,
    pub formatted_price: String,
    /// Units on the shelf, when the chain reports it (dm does, Rossmann does not).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_level: Option<i64>,
    /// Product page on the chain's web shop.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Point")]
pub struct PointGeometry {
    /// `[longitude, latitude]`, in that order.
    pub coordinates: [f64; 2],
}

impl From<&StoreLocation> for PointGeometry {
    fn from(location: &StoreLocation) -> Self {
        Self {
            coordinates: [location.lon, location.lat],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<AvailabilityFeature>,
}

/// Lowest and highest price seen for a product across all chains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min: f64,
    pub formatted_min: String,
    pub max: f64,
    pub formatted_max: String,
}

impl PriceRange {
    /// A degenerate range where both bounds are `price`.
    #[must_use]
    pub fn single(price: &Price) -> Self {
        Self {
            min: price.value,
            formatted_min: price.formatted_value.clone(),
            max: price.value,
            formatted_max: price.formatted_value.clone(),
        }
    }

    /// Extends the range to include `price`.
    ///
    /// A price equal to a bound leaves that bound's formatted text untouched,
    /// so the first chain to report a given price keeps its formatting.
    pub fn widen(&mut self, price: &Price) {
        if price.value < self.min {
            self.min = price.value;
            self.formatted_min.clone_from(&price.formatted_value);
        } else if price.value > self.max {
            self.max = price.value;
            self.formatted_max.clone_from(&price.formatted_value);
        }
    }
}

/// The cross-chain view of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedProduct {
    pub gtin: String,
    pub title: String,
    pub image_url: String,
    pub price_range: PriceRange,
    pub available_at: FeatureCollection,
}

impl From<NormalizedProduct> for MergedProduct {
    fn from(product: NormalizedProduct) -> Self {
        Self {
            price_range: PriceRange::single(&product.price),
            gtin: product.gtin,
            title: product.title,
            image_url: product.image_url,
            available_at: FeatureCollection {
                features: product.available_at,
            },
        }
    }
}

impl MergedProduct {
    /// Folds a later chain's report of the same product into this one.
    ///
    /// Availability is appended in arrival order; `title` and `image_url`
    /// stay as first reported.
    pub fn absorb(&mut self, product: NormalizedProduct) {
        self.price_range.widen(&product.price);
        self.available_at.features.extend(product.available_at);
    }
}

/// Response body of a product search.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub products: Vec<MergedProduct>,
    /// Every store referenced by a feature in `products`, keyed by its
    /// chain-prefixed store id.
    pub store_addresses: IndexMap<String, StoreRecord>,
}

impl SearchResponse {
    /// `{ "products": [], "storeAddresses": {} }`
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}
