//! Reconciliation request handling.
//!
//! Input is `{missingItems, overItems}`; output is the
//! `{success, data | error}` payload. Configuration and credential
//! problems produce a failure payload. Batch failures do not: their
//! barcodes simply stay unmatched and are listed in `failedBatches`.

use serde::{Deserialize, Serialize};
use stockrecon_catalog::{
    BatchFailure, CatalogClient, CatalogConfig, CatalogError, CatalogSettings, ProductLookup,
};
use stockrecon_core::{DiscrepancyEntry, MatchedPair};
use stockrecon_recon::ReconSummary;
use thiserror::Error;

use crate::exit_codes::{EXIT_CONFIG_INVALID, EXIT_CREDENTIAL, EXIT_OVERSIZE};
use crate::settings::RequestLimits;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconRequest {
    #[serde(default)]
    pub missing_items: Vec<DiscrepancyEntry>,
    #[serde(default)]
    pub over_items: Vec<DiscrepancyEntry>,
}

impl ReconRequest {
    pub fn entry_count(&self) -> usize {
        self.missing_items.len() + self.over_items.len()
    }

    /// Barcodes worth asking the catalog about: entries not yet offset.
    fn lookup_barcodes(&self) -> Vec<String> {
        self.missing_items
            .iter()
            .chain(&self.over_items)
            .filter(|e| !e.is_offset())
            .map(|e| e.barcode().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMeta {
    pub run_id: String,
    pub run_at: String,
    pub engine_version: &'static str,
}

impl RunMeta {
    fn now() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            run_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            engine_version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconData {
    pub analyzed_missing: Vec<DiscrepancyEntry>,
    pub matched_count: usize,
    pub matched_pairs: Vec<MatchedPair>,
    pub analyzed_over: Vec<DiscrepancyEntry>,
    pub summary: ReconSummary,
    pub failed_batches: Vec<BatchFailure>,
    pub meta: RunMeta,
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    Config(CatalogError),
    #[error("{0}")]
    Credential(CatalogError),
    #[error("request has {count} entries, limit is {max}")]
    TooLarge { count: usize, max: usize },
}

impl RequestError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RequestError::Config(_) => EXIT_CONFIG_INVALID,
            RequestError::Credential(_) => EXIT_CREDENTIAL,
            RequestError::TooLarge { .. } => EXIT_OVERSIZE,
        }
    }
}

/// Wire payload.
#[derive(Debug, Clone, Serialize)]
pub struct ReconResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ReconData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReconResponse {
    pub fn ok(data: ReconData) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(message.into()) }
    }
}

impl From<Result<ReconData, RequestError>> for ReconResponse {
    fn from(result: Result<ReconData, RequestError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

fn check_size(request: &ReconRequest, limits: &RequestLimits) -> Result<(), RequestError> {
    let count = request.entry_count();
    if count > limits.max_entries {
        return Err(RequestError::TooLarge { count, max: limits.max_entries });
    }
    Ok(())
}

/// Reconcile against any metadata source.
pub fn reconcile_with(
    lookup: &dyn ProductLookup,
    request: &ReconRequest,
    limits: &RequestLimits,
) -> Result<ReconData, RequestError> {
    check_size(request, limits)?;
    Ok(reconcile_unchecked(lookup, request))
}

/// Size already checked by the caller.
fn reconcile_unchecked(lookup: &dyn ProductLookup, request: &ReconRequest) -> ReconData {
    let report = lookup.lookup(&request.lookup_barcodes());
    if !report.is_complete() {
        tracing::warn!(
            failed_batches = report.failed_batches.len(),
            unanswered = report.unanswered(),
            "catalog coverage incomplete; affected entries stay unmatched"
        );
    }

    let outcome = stockrecon_recon::run(&request.missing_items, &request.over_items, &report.metadata);

    ReconData {
        matched_count: outcome.matched_count(),
        analyzed_missing: outcome.missing,
        matched_pairs: outcome.pairs,
        analyzed_over: outcome.over,
        summary: outcome.summary,
        failed_batches: report.failed_batches,
        meta: RunMeta::now(),
    }
}

/// Validate settings, connect to the catalog, reconcile.
///
/// The size limit is checked before any network access.
pub fn try_handle(
    settings: &CatalogSettings,
    request: &ReconRequest,
    limits: &RequestLimits,
) -> Result<ReconData, RequestError> {
    check_size(request, limits)?;
    let config = CatalogConfig::from_settings(settings).map_err(RequestError::Config)?;
    let client = CatalogClient::connect(config).map_err(RequestError::Credential)?;
    Ok(reconcile_unchecked(&client, request))
}

pub fn handle(settings: &CatalogSettings, request: &ReconRequest, limits: &RequestLimits) -> ReconResponse {
    try_handle(settings, request, limits).into()
}
