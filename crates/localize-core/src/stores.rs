//! Static store reference data.
//!
//! Each chain ships a JSON object mapping its internal store id to an address
//! and a coordinate, e.g.
//!
//! ```json
//! { "1000": { "address": { "street": "Alexanderplatz 1", "zip": "10178", "city": "Berlin" },
//!             "location": { "lat": 52.5219, "lon": 13.4132 } } }
//! ```
//!
//! The tables are loaded once at startup and never mutated afterwards.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoreLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Address and coordinate of one physical store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    /// The chain's address object, passed through to clients verbatim.
    pub address: serde_json::Value,
    pub location: StoreLocation,
}

/// All known stores of one chain, keyed by the chain's raw store id.
///
/// Iteration follows the order of the source file.
#[derive(Debug, Clone, Default)]
pub struct StoreDirectory {
    stores: IndexMap<String, StoreRecord>,
}

impl StoreDirectory {
    /// Reads a store table from a JSON file.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DataFileIo`] if the file cannot be read.
    /// - [`ConfigError::DataFileParse`] if it is not a JSON object of store records.
    /// - [`ConfigError::Validation`] if a store has out-of-range coordinates.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DataFileIo {
            path: path.display().to_string(),
            source: e,
        })?;

        let directory = Self::from_json(&content).map_err(|e| match e {
            ConfigError::DataFileParse { source, .. } => ConfigError::DataFileParse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;

        tracing::debug!(
            path = %path.display(),
            stores = directory.len(),
            "loaded store directory"
        );
        Ok(directory)
    }

    /// Parses a store table from a JSON string.
    ///
    /// # Errors
    ///
    /// Same as [`StoreDirectory::load`], minus I/O.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let stores: IndexMap<String, StoreRecord> =
            serde_json::from_str(content).map_err(|e| ConfigError::DataFileParse {
                path: "<inline>".to_string(),
                source: e,
            })?;

        validate_stores(&stores)?;

        Ok(Self { stores })
    }

    #[must_use]
    pub fn get(&self, store_id: &str) -> Option<&StoreRecord> {
        self.stores.get(store_id)
    }

    /// Raw store ids in file order.
    pub fn store_ids(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl FromIterator<(String, StoreRecord)> for StoreDirectory {
    fn from_iter<I: IntoIterator<Item = (String, StoreRecord)>>(iter: I) -> Self {
        Self {
            stores: iter.into_iter().collect(),
        }
    }
}

fn validate_stores(stores: &IndexMap<String, StoreRecord>) -> Result<(), ConfigError> {
    for (id, store) in stores {
        if id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store id must be non-empty".to_string(),
            ));
        }

        let StoreLocation { lat, lon } = store.location;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ConfigError::Validation(format!(
                "store '{id}' has out-of-range coordinates ({lat}, {lon})"
            )));
        }
    }

    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPostcode {
    Text(String),
    Number(u64),
}

/// Reads the list of postcodes used to sweep a chain's store finder.
///
/// The file is a JSON array; entries may be strings (`"10115"`) or bare
/// numbers (`10115`). Numbers shorter than five digits are zero-padded.
///
/// # Errors
///
/// - [`ConfigError::DataFileIo`] if the file cannot be read.
/// - [`ConfigError::DataFileParse`] if it is not a JSON array of postcodes.
/// - [`ConfigError::Validation`] if a postcode is blank.
pub fn load_postcodes(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DataFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let raw: Vec<RawPostcode> =
        serde_json::from_str(&content).map_err(|e| ConfigError::DataFileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    let postcodes = parse_postcodes(raw)?;
    tracing::debug!(
        path = %path.display(),
        postcodes = postcodes.len(),
        "loaded postcodes"
    );
    Ok(postcodes)
}

fn parse_postcodes(raw: Vec<RawPostcode>) -> Result<Vec<String>, ConfigError> {
    raw.into_iter()
        .map(|postcode| match postcode {
            RawPostcode::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Err(ConfigError::Validation(
                        "postcode must be non-empty".to_string(),
                    ))
                } else {
                    Ok(trimmed.to_string())
                }
            }
            RawPostcode::Number(n) => Ok(format!("{n:05}")),
        })
        .collect()
}
