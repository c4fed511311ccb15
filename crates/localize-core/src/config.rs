use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let base_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "base URL must be non-empty".to_string(),
            });
        }
        Ok(trimmed.to_string())
    };

    let env = parse_environment(&or_default("LOCALIZE_ENV", "development"));

    let bind_addr = parse_addr("LOCALIZE_BIND_ADDR", "0.0.0.0:8787")?;
    let log_level = or_default("LOCALIZE_LOG_LEVEL", "info");

    let dm_product_search_api = base_url(
        "DM_PRODUCT_SEARCH_API",
        "https://product-search.services.dmtech.com",
    )?;
    let dm_store_availability_api =
        base_url("DM_STORE_AVAILABILITY_API", "https://products.dm.de")?;
    let rossmann_product_search_api =
        base_url("ROSSMANN_PRODUCT_SEARCH_API", "https://www.rossmann.de")?;
    let rossmann_store_availability_api =
        base_url("ROSSMANN_STORE_AVAILABILITY_API", "https://www.rossmann.de")?;

    let dm_stores_path = PathBuf::from(or_default(
        "LOCALIZE_DM_STORES_PATH",
        "./data/dm/stores_berlin.json",
    ));
    let rossmann_stores_path = PathBuf::from(or_default(
        "LOCALIZE_ROSSMANN_STORES_PATH",
        "./data/rossmann/stores_berlin.json",
    ));
    let rossmann_postcodes_path = PathBuf::from(or_default(
        "LOCALIZE_ROSSMANN_POSTCODES_PATH",
        "./data/rossmann/postcodes.json",
    ));
    let rossmann_city = or_default("LOCALIZE_ROSSMANN_CITY", "Berlin");

    let request_timeout_secs = parse_u64("LOCALIZE_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("LOCALIZE_USER_AGENT", "localize/0.1 (product-search)");
    let max_concurrent_requests = parse_usize("LOCALIZE_MAX_CONCURRENT_REQUESTS", "16")?;
    if max_concurrent_requests == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOCALIZE_MAX_CONCURRENT_REQUESTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        dm_product_search_api,
        dm_store_availability_api,
        rossmann_product_search_api,
        rossmann_store_availability_api,
        dm_stores_path,
        rossmann_stores_path,
        rossmann_postcodes_path,
        rossmann_city,
        request_timeout_secs,
        user_agent,
        max_concurrent_requests,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
