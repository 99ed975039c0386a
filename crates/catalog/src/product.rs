use serde::{Deserialize, Deserializer};
use serde_json::Value;
use stockrecon_core::product::deserialize_optional_code;
use stockrecon_core::{CategoryId, MetadataMap, ProductMeta};

/// One product as the catalog returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    /// Primary product code
    #[serde(default, deserialize_with = "deserialize_optional_code")]
    pub code: Option<String>,
    /// Secondary barcode alias (EAN printed on the pack)
    #[serde(default, deserialize_with = "deserialize_optional_code")]
    pub bar_code: Option<String>,
    pub category_id: CategoryId,
    #[serde(deserialize_with = "deserialize_price")]
    pub base_price: f64,
}

/// Prices arrive as JSON numbers, occasionally as decimal strings.
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(n) => Ok(n),
        RawPrice::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid price \"{s}\""))),
    }
}

fn non_empty(code: Option<String>) -> Option<String> {
    code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
}

/// Extract the product list from a catalog response body.
///
/// Accepts a bare array or an object wrapping it under `products` or `data`.
/// Malformed products are skipped; only a body with no list at all is an
/// error.
pub fn parse_products(body: &Value) -> Result<Vec<CatalogProduct>, String> {
    let items = body
        .as_array()
        .or_else(|| body["products"].as_array())
        .or_else(|| body["data"].as_array())
        .ok_or_else(|| "response does not contain a product list".to_string())?;

    let mut products = Vec::with_capacity(items.len());
    for item in items {
        match CatalogProduct::deserialize(item) {
            Ok(product) => products.push(product),
            Err(e) => {
                tracing::debug!(error = %e, code = %item["code"], "skipping malformed catalog product");
            }
        }
    }
    Ok(products)
}

/// Index products under both their primary code and barcode alias.
///
/// Each non-empty key gets its own insertion. A key seen twice keeps the
/// later product.
pub fn index_products(products: impl IntoIterator<Item = CatalogProduct>, metadata: &mut MetadataMap) {
    for product in products {
        if !product.base_price.is_finite() {
            tracing::debug!(code = ?product.code, "skipping product with non-finite price");
            continue;
        }

        let meta = ProductMeta {
            category_id: product.category_id,
            base_price: product.base_price,
        };

        if let Some(code) = non_empty(product.code) {
            metadata.insert(code, meta.clone());
        }
        if let Some(bar_code) = non_empty(product.bar_code) {
            metadata.insert(bar_code, meta);
        }
    }
}
