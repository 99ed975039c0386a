//! Catalog HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). Batches run
//! sequentially, one request in flight at a time.

use std::collections::HashSet;

use stockrecon_core::MetadataMap;

use crate::auth::{fetch_token, AccessToken};
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::lookup::{dedup_barcodes, BatchFailure, LookupReport, ProductLookup};
use crate::product::{index_products, parse_products, CatalogProduct};

/// Authenticated catalog client (blocking).
pub struct CatalogClient {
    http: reqwest::blocking::Client,
    config: CatalogConfig,
    token: AccessToken,
}

impl CatalogClient {
    /// Build the HTTP client and acquire a credential.
    ///
    /// Fails when the token cannot be obtained; nothing is looked up then.
    pub fn connect(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("stockrecon/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Network(format!("cannot build HTTP client: {e}")))?;

        let token = fetch_token(&http, &config)?;
        tracing::info!(retailer_id = %config.retailer_id, api_base = %config.api_base, "catalog connected");

        Ok(Self { http, config, token })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Query one batch of codes.
    pub fn fetch_batch(&self, codes: &[String]) -> Result<Vec<CatalogProduct>, CatalogError> {
        let limit = self.config.page_size.to_string();
        let joined = codes.join(",");

        let response = self
            .http
            .get(self.config.products_url())
            .bearer_auth(&self.token.access_token)
            .header("X-Retailer-Id", &self.config.retailer_id)
            .query(&[("codes", joined.as_str()), ("limit", limit.as_str())])
            .send()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CatalogError::Http { status, body });
        }

        let json: serde_json::Value = response
            .json()
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        parse_products(&json).map_err(CatalogError::Parse)
    }
}

impl ProductLookup for CatalogClient {
    fn lookup(&self, barcodes: &[String]) -> LookupReport {
        let codes = dedup_barcodes(barcodes);
        let mut metadata = MetadataMap::new();
        let mut failed_batches = Vec::new();

        for (index, chunk) in codes.chunks(self.config.batch_size.max(1)).enumerate() {
            match self.fetch_batch(chunk) {
                Ok(products) => {
                    tracing::debug!(batch = index, requested = chunk.len(), returned = products.len(), "catalog batch");
                    index_products(products, &mut metadata);
                }
                Err(e) => {
                    tracing::warn!(batch = index, size = chunk.len(), error = %e, "catalog batch failed; continuing");
                    failed_batches.push(BatchFailure {
                        index,
                        barcodes: chunk.to_vec(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        // Aliases the catalog volunteered but nobody asked about are dropped.
        let requested: HashSet<&str> = codes.iter().map(String::as_str).collect();
        metadata.retain(|key, _| requested.contains(key.as_str()));

        tracing::info!(
            requested = codes.len(),
            resolved = metadata.len(),
            failed_batches = failed_batches.len(),
            "catalog lookup finished"
        );

        LookupReport {
            metadata,
            failed_batches,
            requested: codes.len(),
        }
    }
}
