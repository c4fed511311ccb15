use localize_core::{ConfigError, MergeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("store reference data: {0}")]
    Config(#[from] ConfigError),
}

/// Failure of a whole search request.
///
/// Upstream failures never show up here; adapters absorb them.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("store adapter broke the product contract: {0}")]
    Merge(#[from] MergeError),
}
