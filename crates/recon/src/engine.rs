use serde_json::Value;
use stockrecon_core::{DiscrepancyEntry, MetadataMap};

use crate::config::CsvColumns;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::matcher::match_offsets;
use crate::model::ReconOutcome;

/// Run one reconciliation pass. Returns annotated lists, pairs and summary.
///
/// Never fails: missing metadata and unmatched entries are ordinary outcomes.
pub fn run(
    missing: &[DiscrepancyEntry],
    over: &[DiscrepancyEntry],
    metadata: &MetadataMap,
) -> ReconOutcome {
    let output = match_offsets(missing, over, metadata);
    let summary = compute_summary(missing, over, &output, metadata);

    tracing::info!(
        missing = summary.missing_total,
        over = summary.over_total,
        matched = summary.matched,
        missing_unresolved = summary.missing_unresolved,
        over_unresolved = summary.over_unresolved,
        "reconciliation finished"
    );

    ReconOutcome {
        missing: output.missing,
        over: output.over,
        pairs: output.pairs,
        summary,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" | "n" => Some(false),
        "true" | "1" | "yes" | "y" => Some(true),
        _ => None,
    }
}

/// Load a discrepancy list from CSV, applying the column mapping.
///
/// `list` names the list in error messages ("missing", "over", a file name).
/// Columns other than the mapped ones become pass-through string fields.
pub fn load_csv_entries(
    list: &str,
    csv_data: &str,
    columns: &CsvColumns,
) -> Result<Vec<DiscrepancyEntry>, ReconError> {
    let csv_err = |source: csv::Error| ReconError::Csv {
        list: list.into(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let find = |name: &str| headers.iter().position(|h| h == name);
    let require = |name: &str| -> Result<usize, ReconError> {
        find(name).ok_or_else(|| ReconError::MissingColumn {
            list: list.into(),
            column: name.into(),
        })
    };

    let barcode_idx = require(&columns.barcode)?;
    let quantity_idx = require(&columns.quantity)?;
    let offset_idx = find(&columns.is_offset);
    let partner_idx = find(&columns.offset_partner);

    let mut entries = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        // Header is line 1.
        let row = i + 2;

        let barcode = record.get(barcode_idx).unwrap_or("").to_string();
        if barcode.is_empty() {
            return Err(ReconError::EmptyBarcode { list: list.into(), row });
        }

        let qty_str = record.get(quantity_idx).unwrap_or("");
        let quantity: i64 = qty_str.parse().map_err(|_| ReconError::QuantityParse {
            list: list.into(),
            row,
            barcode: barcode.clone(),
            value: qty_str.into(),
        })?;

        let is_offset = match offset_idx.and_then(|idx| record.get(idx)) {
            Some(raw) => parse_flag(raw).ok_or_else(|| ReconError::FlagParse {
                list: list.into(),
                row,
                barcode: barcode.clone(),
                value: raw.into(),
            })?,
            None => false,
        };

        let mut entry = DiscrepancyEntry::new(barcode, quantity);

        if is_offset {
            let partner = partner_idx
                .and_then(|idx| record.get(idx))
                .filter(|p| !p.is_empty())
                .map(String::from);
            entry = entry.with_persisted_offset(partner);
        }

        for (idx, header) in headers.iter().enumerate() {
            if idx == barcode_idx
                || idx == quantity_idx
                || Some(idx) == offset_idx
                || Some(idx) == partner_idx
            {
                continue;
            }
            if let Some(val) = record.get(idx) {
                entry = entry.with_extra(header.clone(), Value::String(val.to_string()));
            }
        }

        entries.push(entry);
    }

    Ok(entries)
}
