use serde::Deserialize;

/// Column names used when reading a discrepancy list from CSV.
///
/// `barcode` and `quantity` must be present. The offset columns are read
/// only when the header contains them, so freshly exported audit sheets
/// (which never have them) load without extra configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CsvColumns {
    pub barcode: String,
    pub quantity: String,
    pub is_offset: String,
    pub offset_partner: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            barcode: "barcode".into(),
            quantity: "quantity".into(),
            is_offset: "is_offset".into(),
            offset_partner: "offset_partner".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let cols: CsvColumns = toml::from_str("quantity = \"qty\"").unwrap();
        assert_eq!(cols.barcode, "barcode");
        assert_eq!(cols.quantity, "qty");
        assert_eq!(cols.is_offset, "is_offset");
    }
}
