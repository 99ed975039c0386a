use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::product::{deserialize_code, deserialize_optional_code};

/// One stock-count anomaly for one product at one store on one audit date.
///
/// The same type is used for both sides of a reconciliation: on the missing
/// list `quantity_delta` is the missing quantity, on the over list it is the
/// surplus quantity.
///
/// `is_offset` and `offset_partner_barcode` only change together through
/// [`DiscrepancyEntry::mark_offset`], and there is no way to clear them.
/// Barcodes are stored trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawEntry")]
pub struct DiscrepancyEntry {
    barcode: String,
    quantity_delta: i64,
    is_offset: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset_partner_barcode: Option<String>,
    /// Caller-owned fields (store, audit date, product name, ...) carried
    /// through untouched.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Wire shape, before normalization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(deserialize_with = "deserialize_code")]
    barcode: String,
    #[serde(alias = "qty", alias = "quantity")]
    quantity_delta: i64,
    #[serde(default)]
    is_offset: bool,
    #[serde(default, deserialize_with = "deserialize_optional_code")]
    offset_partner_barcode: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RawEntry> for DiscrepancyEntry {
    type Error = String;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let barcode = raw.barcode.trim();
        if barcode.is_empty() {
            return Err("barcode must not be empty".into());
        }

        let mut entry = DiscrepancyEntry::new(barcode, raw.quantity_delta);
        entry.extra = raw.extra;

        // A partner without the flag is dropped.
        if raw.is_offset {
            let partner = raw
                .offset_partner_barcode
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty());
            entry = entry.with_persisted_offset(partner);
        }
        Ok(entry)
    }
}

impl DiscrepancyEntry {
    pub fn new(barcode: impl Into<String>, quantity_delta: i64) -> Self {
        Self {
            barcode: barcode.into().trim().to_string(),
            quantity_delta,
            is_offset: false,
            offset_partner_barcode: None,
            extra: Map::new(),
        }
    }

    /// Restore an entry that a previous run already offset.
    ///
    /// Older records may have the flag without a partner barcode; they are
    /// still treated as matched.
    pub fn with_persisted_offset(mut self, partner: Option<String>) -> Self {
        self.is_offset = true;
        self.offset_partner_barcode = partner;
        self
    }

    /// Attach a pass-through field.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn quantity_delta(&self) -> i64 {
        self.quantity_delta
    }

    pub fn is_offset(&self) -> bool {
        self.is_offset
    }

    pub fn offset_partner(&self) -> Option<&str> {
        self.offset_partner_barcode.as_deref()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Mark this entry as offset against `partner`.
    ///
    /// A second call on an already-offset entry is ignored; the first
    /// partner sticks for the lifetime of the entry.
    pub fn mark_offset(&mut self, partner: impl Into<String>) {
        if self.is_offset {
            return;
        }
        self.is_offset = true;
        self.offset_partner_barcode = Some(partner.into());
    }
}

/// A missing entry paired with the over entry believed to offset it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPair {
    pub missing_barcode: String,
    pub over_barcode: String,
}
