use std::collections::{HashMap, VecDeque};

use ordered_float::OrderedFloat;
use stockrecon_core::{CategoryId, DiscrepancyEntry, MatchedPair, MetadataMap, ProductMeta};

use crate::model::OffsetMatchOutput;

/// (category, exact base price). Two entries can offset only on equal keys.
type OffsetKey = (CategoryId, OrderedFloat<f64>);

fn offset_key(meta: &ProductMeta) -> Option<OffsetKey> {
    // NaN never equals anything, including itself.
    if meta.base_price.is_nan() {
        return None;
    }
    Some((meta.category_id.clone(), OrderedFloat(meta.base_price)))
}

fn eligible_key(entry: &DiscrepancyEntry, metadata: &MetadataMap) -> Option<OffsetKey> {
    if entry.is_offset() {
        return None;
    }
    metadata.get(entry.barcode()).and_then(offset_key)
}

/// True when the barcode resolves to metadata with a comparable price.
pub fn is_resolvable(entry: &DiscrepancyEntry, metadata: &MetadataMap) -> bool {
    metadata.get(entry.barcode()).and_then(offset_key).is_some()
}

/// Pair missing entries with over entries of the same category and price.
///
/// Greedy first-fit: missing entries are visited in list order and each
/// takes the earliest still-unclaimed over entry with an equal key. This is
/// not a maximum matching. Inputs are not touched; annotated copies are
/// returned.
///
/// The over pool is indexed per key as a queue of positions in list order,
/// so popping the front of a queue yields exactly the entry a linear
/// first-fit scan would have found.
pub fn match_offsets(
    missing: &[DiscrepancyEntry],
    over: &[DiscrepancyEntry],
    metadata: &MetadataMap,
) -> OffsetMatchOutput {
    let mut missing_out = missing.to_vec();
    let mut over_out = over.to_vec();

    let mut pool: HashMap<OffsetKey, VecDeque<usize>> = HashMap::new();
    for (idx, entry) in over_out.iter().enumerate() {
        if let Some(key) = eligible_key(entry, metadata) {
            pool.entry(key).or_default().push_back(idx);
        }
    }

    let mut pairs = Vec::new();

    for entry in missing_out.iter_mut() {
        let Some(key) = eligible_key(entry, metadata) else {
            continue;
        };
        let Some(over_idx) = pool.get_mut(&key).and_then(VecDeque::pop_front) else {
            continue;
        };

        let partner = &mut over_out[over_idx];
        entry.mark_offset(partner.barcode());
        partner.mark_offset(entry.barcode());

        pairs.push(MatchedPair {
            missing_barcode: entry.barcode().to_string(),
            over_barcode: partner.barcode().to_string(),
        });
    }

    OffsetMatchOutput {
        missing: missing_out,
        over: over_out,
        pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(barcode: &str, qty: i64) -> DiscrepancyEntry {
        DiscrepancyEntry::new(barcode, qty)
    }

    fn meta(pairs: &[(&str, i64, f64)]) -> MetadataMap {
        pairs
            .iter()
            .map(|(code, cat, price)| (code.to_string(), ProductMeta::new(*cat, *price)))
            .collect()
    }

    #[test]
    fn same_category_same_price_matches() {
        let missing = vec![entry("A", 2)];
        let over = vec![entry("B", 1)];
        let md = meta(&[("A", 1, 1000.0), ("B", 1, 1000.0)]);

        let out = match_offsets(&missing, &over, &md);
        assert_eq!(out.pairs.len(), 1);
        assert!(out.missing[0].is_offset());
        assert_eq!(out.missing[0].offset_partner(), Some("B"));
        assert!(out.over[0].is_offset());
        assert_eq!(out.over[0].offset_partner(), Some("A"));
    }

    #[test]
    fn price_difference_blocks_match() {
        let missing = vec![entry("A", 2)];
        let over = vec![entry("B", 1)];
        let md = meta(&[("A", 1, 1000.0), ("B", 1, 1500.0)]);

        let out = match_offsets(&missing, &over, &md);
        assert!(out.pairs.is_empty());
        assert!(!out.missing[0].is_offset());
        assert!(out.missing[0].offset_partner().is_none());
    }

    #[test]
    fn tiny_price_difference_blocks_match() {
        let missing = vec![entry("A", 1)];
        let over = vec![entry("B", 1)];
        let md = meta(&[("A", 1, 19.99), ("B", 1, 19.990000001)]);

        let out = match_offsets(&missing, &over, &md);
        assert!(out.pairs.is_empty());
    }

    #[test]
    fn category_difference_blocks_match() {
        let missing = vec![entry("A", 1)];
        let over = vec![entry("B", 1)];
        let md = meta(&[("A", 1, 500.0), ("B", 2, 500.0)]);

        let out = match_offsets(&missing, &over, &md);
        assert!(out.pairs.is_empty());
    }

    #[test]
    fn int_and_text_category_do_not_match() {
        let missing = vec![entry("A", 1)];
        let over = vec![entry("B", 1)];
        let mut md = MetadataMap::new();
        md.insert("A".into(), ProductMeta::new(1, 500.0));
        md.insert("B".into(), ProductMeta::new("1", 500.0));

        let out = match_offsets(&missing, &over, &md);
        assert!(out.pairs.is_empty());
    }

    #[test]
    fn first_missing_wins_single_over() {
        let missing = vec![entry("A1", 1), entry("A2", 1)];
        let over = vec![entry("B", 1)];
        let md = meta(&[("A1", 1, 1000.0), ("A2", 1, 1000.0), ("B", 1, 1000.0)]);

        let out = match_offsets(&missing, &over, &md);
        assert_eq!(out.pairs.len(), 1);
        assert_eq!(out.pairs[0].missing_barcode, "A1");
        assert!(out.missing[0].is_offset());
        assert!(!out.missing[1].is_offset());
    }

    #[test]
    fn earliest_over_wins_tie() {
        let missing = vec![entry("A", 1)];
        let over = vec![entry("B1", 1), entry("B2", 1)];
        let md = meta(&[("A", 1, 10.0), ("B1", 1, 10.0), ("B2", 1, 10.0)]);

        let out = match_offsets(&missing, &over, &md);
        assert_eq!(out.pairs[0].over_barcode, "B1");
        assert!(!out.over[1].is_offset());
    }

    #[test]
    fn over_pool_skips_non_matching_head() {
        // First over entry is a different key; the scan continues past it.
        let missing = vec![entry("A", 1), entry("C", 1)];
        let over = vec![entry("D", 1), entry("B", 1)];
        let md = meta(&[("A", 1, 10.0), ("B", 1, 10.0), ("C", 2, 7.0), ("D", 2, 7.0)]);

        let out = match_offsets(&missing, &over, &md);
        assert_eq!(out.pairs.len(), 2);
        assert_eq!(out.pairs[0].missing_barcode, "A");
        assert_eq!(out.pairs[0].over_barcode, "B");
        assert_eq!(out.pairs[1].missing_barcode, "C");
        assert_eq!(out.pairs[1].over_barcode, "D");
    }

    #[test]
    fn unresolved_entries_pass_through() {
        let missing = vec![entry("A", 2), entry("X", 5)];
        let over = vec![entry("B", 1), entry("Y", 3)];
        let md = meta(&[("A", 1, 1000.0), ("B", 1, 1000.0)]);

        let out = match_offsets(&missing, &over, &md);
        assert_eq!(out.pairs.len(), 1);
        assert_eq!(out.missing[1], missing[1]);
        assert_eq!(out.over[1], over[1]);
    }

    #[test]
    fn already_offset_entries_are_skipped() {
        let missing = vec![entry("A", 1).with_persisted_offset(Some("Z".into()))];
        let over = vec![entry("B", 1)];
        let md = meta(&[("A", 1, 10.0), ("B", 1, 10.0)]);

        let out = match_offsets(&missing, &over, &md);
        assert!(out.pairs.is_empty());
        assert_eq!(out.missing[0].offset_partner(), Some("Z"));
        assert!(!out.over[0].is_offset());
    }

    #[test]
    fn already_offset_over_is_not_claimed() {
        let missing = vec![entry("A", 1)];
        let over = vec![entry("B1", 1).with_persisted_offset(None), entry("B2", 1)];
        let md = meta(&[("A", 1, 10.0), ("B1", 1, 10.0), ("B2", 1, 10.0)]);

        let out = match_offsets(&missing, &over, &md);
        assert_eq!(out.pairs[0].over_barcode, "B2");
    }

    #[test]
    fn nan_price_never_matches() {
        let missing = vec![entry("A", 1)];
        let over = vec![entry("B", 1)];
        let md = meta(&[("A", 1, f64::NAN), ("B", 1, f64::NAN)]);

        let out = match_offsets(&missing, &over, &md);
        assert!(out.pairs.is_empty());
    }

    #[test]
    fn empty_inputs() {
        let out = match_offsets(&[], &[], &MetadataMap::new());
        assert!(out.missing.is_empty());
        assert!(out.over.is_empty());
        assert!(out.pairs.is_empty());
    }

    #[test]
    fn inputs_are_not_mutated() {
        let missing = vec![entry("A", 2)];
        let over = vec![entry("B", 1)];
        let md = meta(&[("A", 1, 1000.0), ("B", 1, 1000.0)]);

        let _ = match_offsets(&missing, &over, &md);
        assert!(!missing[0].is_offset());
        assert!(!over[0].is_offset());
    }
}
