use stockrecon_core::{DiscrepancyEntry, MetadataMap};

use crate::matcher::is_resolvable;
use crate::model::{OffsetMatchOutput, ReconSummary};

#[derive(Default)]
struct SideCounts {
    already_offset: usize,
    unresolved: usize,
    unmatched: usize,
}

/// Classify every input entry as already offset, unresolved, matched in this
/// run, or eligible but unmatched.
fn count_side(
    input: &[DiscrepancyEntry],
    output: &[DiscrepancyEntry],
    metadata: &MetadataMap,
) -> SideCounts {
    let mut counts = SideCounts::default();
    for (before, after) in input.iter().zip(output) {
        if before.is_offset() {
            counts.already_offset += 1;
        } else if !is_resolvable(before, metadata) {
            counts.unresolved += 1;
        } else if !after.is_offset() {
            counts.unmatched += 1;
        }
    }
    counts
}

/// Compute summary statistics for one reconciliation run.
pub fn compute_summary(
    missing: &[DiscrepancyEntry],
    over: &[DiscrepancyEntry],
    output: &OffsetMatchOutput,
    metadata: &MetadataMap,
) -> ReconSummary {
    let m = count_side(missing, &output.missing, metadata);
    let o = count_side(over, &output.over, metadata);

    ReconSummary {
        missing_total: missing.len(),
        over_total: over.len(),
        missing_already_offset: m.already_offset,
        over_already_offset: o.already_offset,
        missing_unresolved: m.unresolved,
        over_unresolved: o.unresolved,
        matched: output.pairs.len(),
        missing_unmatched: m.unmatched,
        over_unmatched: o.unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_offsets;
    use stockrecon_core::ProductMeta;

    #[test]
    fn summary_counts() {
        let missing = vec![
            DiscrepancyEntry::new("A1", 1),
            DiscrepancyEntry::new("A2", 1),
            DiscrepancyEntry::new("X", 4),
            DiscrepancyEntry::new("Z", 2).with_persisted_offset(Some("Q".into())),
        ];
        let over = vec![
            DiscrepancyEntry::new("B", 1),
            DiscrepancyEntry::new("C", 9),
            DiscrepancyEntry::new("Y", 3),
        ];
        let mut md = MetadataMap::new();
        md.insert("A1".into(), ProductMeta::new(1, 100.0));
        md.insert("A2".into(), ProductMeta::new(1, 100.0));
        md.insert("Z".into(), ProductMeta::new(1, 100.0));
        md.insert("B".into(), ProductMeta::new(1, 100.0));
        md.insert("C".into(), ProductMeta::new(3, 5.0));

        let out = match_offsets(&missing, &over, &md);
        let summary = compute_summary(&missing, &over, &out, &md);

        assert_eq!(summary.missing_total, 4);
        assert_eq!(summary.over_total, 3);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.missing_already_offset, 1);
        assert_eq!(summary.missing_unresolved, 1); // X
        assert_eq!(summary.missing_unmatched, 1); // A2
        assert_eq!(summary.over_already_offset, 0);
        assert_eq!(summary.over_unresolved, 1); // Y
        assert_eq!(summary.over_unmatched, 1); // C
    }
}
