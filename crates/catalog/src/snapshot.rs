//! Offline catalog: a JSON export of the catalog answered from memory.
//!
//! Accepts the same shapes as a live response (bare array, `products`,
//! `data`), indexed the same way.

use std::path::Path;

use stockrecon_core::MetadataMap;

use crate::error::CatalogError;
use crate::lookup::{dedup_barcodes, LookupReport, ProductLookup};
use crate::product::{index_products, parse_products};

#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    metadata: MetadataMap,
}

impl CatalogSnapshot {
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let body: serde_json::Value =
            serde_json::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let products = parse_products(&body).map_err(CatalogError::Parse)?;

        let mut metadata = MetadataMap::new();
        index_products(products, &mut metadata);
        Ok(Self { metadata })
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;
        let snapshot = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), keys = snapshot.len(), "catalog snapshot loaded");
        Ok(snapshot)
    }

    /// Number of indexed keys (codes and aliases).
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }
}

impl ProductLookup for CatalogSnapshot {
    fn lookup(&self, barcodes: &[String]) -> LookupReport {
        let codes = dedup_barcodes(barcodes);
        let metadata = codes
            .iter()
            .filter_map(|c| self.metadata.get(c).map(|m| (c.clone(), m.clone())))
            .collect();

        LookupReport {
            metadata,
            failed_batches: Vec::new(),
            requested: codes.len(),
        }
    }
}
