//! Product catalog client: resolves barcodes to category and reference price.
//!
//! This crate is the single source of truth for the catalog wire contract:
//! credential acquisition, batched product lookup, dual-key indexing.
//!
//! No retries. A failed batch is reported, never escalated.

mod auth;
mod client;
mod config;
mod error;
mod lookup;
mod product;
mod snapshot;

pub use auth::{fetch_token, AccessToken};
pub use client::CatalogClient;
pub use config::{
    CatalogConfig, CatalogSettings, DEFAULT_BATCH_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
    ENV_API_BASE, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_RETAILER_ID, ENV_TOKEN_URL,
};
pub use error::CatalogError;
pub use lookup::{dedup_barcodes, BatchFailure, LookupReport, ProductLookup};
pub use product::{index_products, parse_products, CatalogProduct};
pub use snapshot::CatalogSnapshot;
