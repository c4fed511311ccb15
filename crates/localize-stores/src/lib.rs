//! Store adapters for the drugstore chains and the search engine that fans
//! out to them.

pub mod adapter;
pub mod client;
pub mod dm;
pub mod engine;
pub mod error;
pub mod registry;
pub mod rossmann;

mod types;

pub use adapter::StoreAdapter;
pub use client::StoreHttpClient;
pub use dm::{DmAdapter, DmSettings};
pub use engine::SearchEngine;
pub use error::{SearchError, StoreError};
pub use registry::default_stores;
pub use rossmann::{RossmannAdapter, RossmannSettings};
