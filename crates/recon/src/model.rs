use serde::Serialize;
use stockrecon_core::{DiscrepancyEntry, MatchedPair};

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Raw matcher output: annotated copies of both lists plus the pairs found.
#[derive(Debug, Clone)]
pub struct OffsetMatchOutput {
    pub missing: Vec<DiscrepancyEntry>,
    pub over: Vec<DiscrepancyEntry>,
    pub pairs: Vec<MatchedPair>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconSummary {
    pub missing_total: usize,
    pub over_total: usize,
    /// Entries that arrived already offset by an earlier run.
    pub missing_already_offset: usize,
    pub over_already_offset: usize,
    /// Entries with no catalog metadata (never eligible).
    pub missing_unresolved: usize,
    pub over_unresolved: usize,
    pub matched: usize,
    /// Eligible entries left without a partner.
    pub missing_unmatched: usize,
    pub over_unmatched: usize,
}

#[derive(Debug, Clone)]
pub struct ReconOutcome {
    /// Missing list in input order, matched entries annotated.
    pub missing: Vec<DiscrepancyEntry>,
    /// Over list in input order, matched entries annotated.
    pub over: Vec<DiscrepancyEntry>,
    /// Pairs in discovery (missing-list) order.
    pub pairs: Vec<MatchedPair>,
    pub summary: ReconSummary,
}

impl ReconOutcome {
    pub fn matched_count(&self) -> usize {
        self.pairs.len()
    }
}
