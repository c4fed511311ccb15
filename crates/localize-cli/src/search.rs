//! `search` command: one engine run, JSON on stdout.

use localize_core::{AppConfig, SearchResponse};
use localize_stores::SearchEngine;

/// Loads the store reference data, runs `query` and prints the payload.
///
/// Logs go to stderr so stdout stays valid JSON.
///
/// # Errors
///
/// Returns an error if reference data cannot be loaded, the search fails, or
/// the payload cannot be serialized.
pub(crate) async fn run_search(
    config: &AppConfig,
    query: &str,
    pretty: bool,
) -> anyhow::Result<()> {
    let engine = SearchEngine::from_config(config)?;
    let response = engine.search(query).await?;

    tracing::info!(
        query,
        products = response.products.len(),
        stores = response.store_addresses.len(),
        "search finished"
    );

    println!("{}", render(&response, pretty)?);
    Ok(())
}

pub(crate) fn render(response: &SearchResponse, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    }
}
