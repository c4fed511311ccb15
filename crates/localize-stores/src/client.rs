//! Shared HTTP client for all vendor APIs.

use std::time::Duration;

use localize_core::AppConfig;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Thin wrapper around `reqwest::Client` that turns vendor responses into
/// typed values or [`StoreError`]s.
///
/// Every request is a single attempt bounded by the configured timeout.
/// Cloning is cheap; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct StoreHttpClient {
    client: Client,
}

impl StoreHttpClient {
    /// Creates a client with the given per-request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(5)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// # Errors
    ///
    /// See [`StoreHttpClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        Self::new(config.request_timeout_secs, &config.user_agent)
    }

    /// GETs `url` and deserializes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Http`] on network failure or timeout.
    /// - [`StoreError::UnexpectedStatus`] on any non-2xx status.
    /// - [`StoreError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, StoreError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| StoreError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Appends `segments` to the path of `base_url`, percent-encoding each one.
///
/// # Errors
///
/// Returns [`StoreError::InvalidBaseUrl`] if `base_url` is not an absolute
/// URL that can carry a path.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, StoreError> {
    let mut url = Url::parse(base_url).map_err(|e| StoreError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;

    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| StoreError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be a base".to_string(),
            })?;
        path.pop_if_empty().extend(segments);
    }

    Ok(url)
}
