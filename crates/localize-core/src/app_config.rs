use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Base URL of dm's product search service, without trailing slash.
    pub dm_product_search_api: String,
    /// Base URL of dm's per-store availability service.
    pub dm_store_availability_api: String,
    pub rossmann_product_search_api: String,
    pub rossmann_store_availability_api: String,
    pub dm_stores_path: PathBuf,
    pub rossmann_stores_path: PathBuf,
    pub rossmann_postcodes_path: PathBuf,
    /// Rossmann's store finder returns stores around a postcode regardless of
    /// city; only stores in this city are kept.
    pub rossmann_city: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Upper bound on in-flight availability requests per adapter call.
    pub max_concurrent_requests: usize,
}
