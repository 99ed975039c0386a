use std::collections::HashSet;

use serde::Serialize;
use stockrecon_core::MetadataMap;

/// A batch the catalog could not answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    /// Zero-based batch position
    pub index: usize,
    pub barcodes: Vec<String>,
    pub reason: String,
}

/// Result of resolving a set of barcodes.
///
/// `metadata` holds whatever resolved; barcodes from failed batches are
/// simply absent, exactly like barcodes the catalog does not know.
#[derive(Debug, Clone, Default)]
pub struct LookupReport {
    pub metadata: MetadataMap,
    pub failed_batches: Vec<BatchFailure>,
    /// Distinct barcodes asked for
    pub requested: usize,
}

impl LookupReport {
    /// True when every batch was answered.
    pub fn is_complete(&self) -> bool {
        self.failed_batches.is_empty()
    }

    /// Requested barcodes absent from `metadata`, in request order.
    pub fn not_found<'a>(&self, barcodes: &'a [String]) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        barcodes
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty() && seen.insert(*b))
            .filter(|b| !self.metadata.contains_key(*b))
            .collect()
    }

    /// Barcodes that went unanswered because their batch failed.
    pub fn unanswered(&self) -> usize {
        self.failed_batches.iter().map(|f| f.barcodes.len()).sum()
    }
}

/// Anything that can turn barcodes into product metadata.
///
/// Implementations never fail as a whole: per-batch problems go into
/// `LookupReport::failed_batches`. The returned map is keyed only by the
/// requested (trimmed) barcodes.
pub trait ProductLookup {
    fn lookup(&self, barcodes: &[String]) -> LookupReport;
}

/// Trim, drop blanks and duplicates. Keeps first-seen order.
pub fn dedup_barcodes<S: AsRef<str>>(barcodes: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    barcodes
        .iter()
        .map(|b| b.as_ref().trim())
        .filter(|b| !b.is_empty())
        .filter(|b| seen.insert(*b))
        .map(String::from)
        .collect()
}
