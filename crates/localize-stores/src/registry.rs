use std::sync::Arc;

use localize_core::{load_postcodes, AppConfig, StoreDirectory};

use crate::adapter::StoreAdapter;
use crate::client::StoreHttpClient;
use crate::dm::{DmAdapter, DmSettings};
use crate::error::StoreError;
use crate::rossmann::{RossmannAdapter, RossmannSettings};

/// Builds the adapters for every supported chain, in merge order.
///
/// Rossmann comes first, so its titles and images win for products both
/// chains carry. Store directories and postcodes are read from the paths in
/// `config`; all adapters share one HTTP client.
///
/// # Errors
///
/// - [`StoreError::Http`] if the HTTP client cannot be built.
/// - [`StoreError::Config`] if a reference data file is missing or malformed.
pub fn default_stores(config: &AppConfig) -> Result<Vec<Arc<dyn StoreAdapter>>, StoreError> {
    let client = StoreHttpClient::from_config(config)?;

    let rossmann_stores = StoreDirectory::load(&config.rossmann_stores_path)?;
    let postcodes = load_postcodes(&config.rossmann_postcodes_path)?;
    let dm_stores = StoreDirectory::load(&config.dm_stores_path)?;

    tracing::info!(
        rossmann_stores = rossmann_stores.len(),
        rossmann_postcodes = postcodes.len(),
        dm_stores = dm_stores.len(),
        "loaded store reference data"
    );

    Ok(vec![
        Arc::new(RossmannAdapter::new(
            client.clone(),
            RossmannSettings::from(config),
            rossmann_stores,
            postcodes,
        )),
        Arc::new(DmAdapter::new(client, DmSettings::from(config), dm_stores)),
    ])
}
