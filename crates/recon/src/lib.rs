//! `stockrecon-recon`: discrepancy reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded discrepancy lists and resolved
//! product metadata, returns annotated copies plus the pairs it found.
//! No HTTP, no catalog access.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod matcher;
pub mod model;

pub use config::CsvColumns;
pub use engine::{load_csv_entries, run};
pub use error::ReconError;
pub use model::{ReconOutcome, ReconSummary};
