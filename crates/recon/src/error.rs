use thiserror::Error;

/// Errors raised while loading discrepancy lists.
///
/// Matching itself cannot fail; only input parsing can.
#[derive(Debug, Error)]
pub enum ReconError {
    /// Missing required column in the CSV header.
    #[error("{list}: missing column '{column}'")]
    MissingColumn { list: String, column: String },
    /// Quantity cell is not a whole number.
    #[error("{list}, row {row} (barcode '{barcode}'): cannot parse quantity '{value}'")]
    QuantityParse {
        list: String,
        row: usize,
        barcode: String,
        value: String,
    },
    /// Offset flag cell is not a recognised boolean.
    #[error("{list}, row {row} (barcode '{barcode}'): cannot parse offset flag '{value}'")]
    FlagParse {
        list: String,
        row: usize,
        barcode: String,
        value: String,
    },
    /// Row without a barcode.
    #[error("{list}, row {row}: empty barcode")]
    EmptyBarcode { list: String, row: usize },
    /// Malformed CSV (ragged rows, bad quoting, IO).
    #[error("{list}: {source}")]
    Csv {
        list: String,
        #[source]
        source: csv::Error,
    },
}
