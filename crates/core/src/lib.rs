//! `stockrecon-core`: shared data model for stock-count reconciliation.
//!
//! Plain types only: no IO, no HTTP, no matching logic.

pub mod entry;
pub mod product;

pub use entry::{DiscrepancyEntry, MatchedPair};
pub use product::{CategoryId, MetadataMap, ProductMeta};
