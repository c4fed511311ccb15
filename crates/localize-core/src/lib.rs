//! Shared domain types, configuration, and the result merger for localize.

pub mod address_map;
pub mod app_config;
pub mod config;
pub mod error;
pub mod merge;
pub mod products;
pub mod stores;

pub use address_map::StoreAddressMap;
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, MergeError};
pub use merge::{merge_results, ProductMerger};
pub use products::{
    AvailabilityFeature, FeatureCollection, FeatureProperties, MergedProduct, NormalizedProduct,
    PointGeometry, Price, PriceRange, SearchResponse,
};
pub use stores::{load_postcodes, StoreDirectory, StoreLocation, StoreRecord};
