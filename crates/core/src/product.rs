use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Catalog category identifier.
///
/// Catalogs hand out either integers or strings. The two forms never compare
/// equal: category `1` and category `"1"` are different categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    Int(i64),
    Text(String),
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for CategoryId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Catalog snapshot for one barcode at reconciliation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMeta {
    pub category_id: CategoryId,
    pub base_price: f64,
}

impl ProductMeta {
    pub fn new(category_id: impl Into<CategoryId>, base_price: f64) -> Self {
        Self {
            category_id: category_id.into(),
            base_price,
        }
    }
}

/// Barcode -> metadata, built fresh for every reconciliation request.
pub type MetadataMap = HashMap<String, ProductMeta>;

/// Accept a product code written either as a JSON string or a bare integer.
///
/// EAN/UPC codes are all digits, and some exports emit them unquoted.
pub fn deserialize_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Text(String),
        Int(u64),
    }

    Ok(match RawCode::deserialize(deserializer)? {
        RawCode::Text(s) => s,
        RawCode::Int(n) => n.to_string(),
    })
}

/// Like [`deserialize_code`], for optional fields. `null` stays `None`.
pub fn deserialize_optional_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Text(String),
        Int(u64),
    }

    Ok(Option::<RawCode>::deserialize(deserializer)?.map(|raw| match raw {
        RawCode::Text(s) => s,
        RawCode::Int(n) => n.to_string(),
    }))
}
