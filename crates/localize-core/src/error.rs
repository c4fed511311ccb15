use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read data file {path}: {source}")]
    DataFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse data file {path}: {source}")]
    DataFileParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid reference data: {0}")]
    Validation(String),
}

/// A store adapter handed the merger a product that breaks the
/// [`NormalizedProduct`](crate::NormalizedProduct) contract.
#[derive(Debug, Error, PartialEq)]
pub enum MergeError {
    #[error("product \"{title}\" has an empty gtin")]
    EmptyGtin { title: String },

    #[error("product {gtin} has a non-finite price ({value})")]
    InvalidPrice { gtin: String, value: f64 },
}
