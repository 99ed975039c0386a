//! Catalog settings and the validated config the client is built from.
//!
//! `CatalogSettings` is the loose, file/env shape where everything is
//! optional. `CatalogConfig` is what the client accepts: every credential
//! present, sizes non-zero. Conversion fails fast on the first gap.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::CatalogError;

// ── Constants ───────────────────────────────────────────────────────

/// Barcodes per catalog request. The catalog rejects long code lists.
pub const DEFAULT_BATCH_SIZE: usize = 20;
/// Result cap requested per batch.
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_RETAILER_ID: &str = "STOCKRECON_RETAILER_ID";
pub const ENV_CLIENT_ID: &str = "STOCKRECON_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "STOCKRECON_CLIENT_SECRET";
pub const ENV_API_BASE: &str = "STOCKRECON_API_BASE";
pub const ENV_TOKEN_URL: &str = "STOCKRECON_TOKEN_URL";

// ── Settings (file + env) ───────────────────────────────────────────

/// Raw catalog settings as read from the `[catalog]` config table.
#[derive(Clone, Default, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub retailer_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Catalog API base URL (e.g., "https://catalog.example.net/api/v1")
    #[serde(default)]
    pub api_base: Option<String>,
    /// Token endpoint; defaults to `{api_base}/oauth/token`
    #[serde(default)]
    pub token_url: Option<String>,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl CatalogSettings {
    /// Overlay environment variables on top of file values.
    ///
    /// `get` is usually `|k| std::env::var(k).ok()`; tests pass a map lookup.
    pub fn with_env(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        // Blank variables count as unset.
        let pick = |key: &str, current: Option<String>| {
            get(key).filter(|v| !v.trim().is_empty()).or(current)
        };
        self.retailer_id = pick(ENV_RETAILER_ID, self.retailer_id);
        self.client_id = pick(ENV_CLIENT_ID, self.client_id);
        self.client_secret = pick(ENV_CLIENT_SECRET, self.client_secret);
        self.api_base = pick(ENV_API_BASE, self.api_base);
        self.token_url = pick(ENV_TOKEN_URL, self.token_url);
        self
    }

    /// Settings from the process environment only.
    pub fn from_env() -> Self {
        Self::default().with_env(|k| std::env::var(k).ok())
    }
}

impl fmt::Debug for CatalogSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogSettings")
            .field("retailer_id", &self.retailer_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("token_url", &self.token_url)
            .field("batch_size", &self.batch_size)
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// ── Validated config ────────────────────────────────────────────────

/// Everything the catalog client needs, already validated.
#[derive(Clone)]
pub struct CatalogConfig {
    pub retailer_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub token_url: String,
    pub batch_size: usize,
    pub page_size: usize,
    pub timeout: Duration,
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, CatalogError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or(CatalogError::MissingSetting(name))
}

fn non_zero(value: Option<usize>, default: usize, name: &'static str) -> Result<usize, CatalogError> {
    match value {
        Some(0) => Err(CatalogError::InvalidSetting {
            name,
            reason: "must be greater than zero".into(),
        }),
        Some(n) => Ok(n),
        None => Ok(default),
    }
}

impl CatalogConfig {
    pub fn from_settings(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let retailer_id = required(&settings.retailer_id, "retailer_id")?;
        let client_id = required(&settings.client_id, "client_id")?;
        let client_secret = required(&settings.client_secret, "client_secret")?;
        let api_base = required(&settings.api_base, "api_base")?
            .trim_end_matches('/')
            .to_string();

        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(CatalogError::InvalidSetting {
                name: "api_base",
                reason: format!("expected an http(s) URL, got \"{api_base}\""),
            });
        }

        let token_url = settings
            .token_url
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("{api_base}/oauth/token"));

        let timeout_secs = match settings.timeout_secs {
            Some(0) => {
                return Err(CatalogError::InvalidSetting {
                    name: "timeout_secs",
                    reason: "must be greater than zero".into(),
                })
            }
            Some(n) => n,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            retailer_id,
            client_id,
            client_secret,
            api_base,
            token_url,
            batch_size: non_zero(settings.batch_size, DEFAULT_BATCH_SIZE, "batch_size")?,
            page_size: non_zero(settings.page_size, DEFAULT_PAGE_SIZE, "page_size")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Product query endpoint.
    pub fn products_url(&self) -> String {
        format!("{}/products", self.api_base)
    }
}

impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("retailer_id", &self.retailer_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("token_url", &self.token_url)
            .field("batch_size", &self.batch_size)
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full() -> CatalogSettings {
        CatalogSettings {
            retailer_id: Some("R-100".into()),
            client_id: Some("cid".into()),
            client_secret: Some("csec".into()),
            api_base: Some("https://catalog.test/api/".into()),
            ..CatalogSettings::default()
        }
    }

    #[test]
    fn defaults_fill_in() {
        let cfg = CatalogConfig::from_settings(&full()).unwrap();
        assert_eq!(cfg.api_base, "https://catalog.test/api");
        assert_eq!(cfg.token_url, "https://catalog.test/api/oauth/token");
        assert_eq!(cfg.products_url(), "https://catalog.test/api/products");
        assert_eq!(cfg.batch_size, 20);
        assert_eq!(cfg.page_size, 100);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_credentials_fail_in_order() {
        let mut s = full();
        s.retailer_id = None;
        s.client_secret = None;
        let err = CatalogConfig::from_settings(&s).unwrap_err();
        assert!(matches!(err, CatalogError::MissingSetting("retailer_id")));

        let mut s = full();
        s.client_secret = Some("   ".into());
        let err = CatalogConfig::from_settings(&s).unwrap_err();
        assert!(matches!(err, CatalogError::MissingSetting("client_secret")));
        assert_eq!(err.to_string(), "catalog is not configured: missing client_secret");
    }

    #[test]
    fn zero_batch_size_rejected() {
        let mut s = full();
        s.batch_size = Some(0);
        let err = CatalogConfig::from_settings(&s).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSetting { name: "batch_size", .. }));
    }

    #[test]
    fn non_http_base_rejected() {
        let mut s = full();
        s.api_base = Some("catalog.test".into());
        let err = CatalogConfig::from_settings(&s).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSetting { name: "api_base", .. }));
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            (ENV_CLIENT_SECRET, "from-env"),
            (ENV_TOKEN_URL, "https://auth.test/token"),
            (ENV_RETAILER_ID, "  "),
        ]
        .into_iter()
        .collect();

        let s = full().with_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(s.client_secret.as_deref(), Some("from-env"));
        assert_eq!(s.retailer_id.as_deref(), Some("R-100"));

        let cfg = CatalogConfig::from_settings(&s).unwrap();
        assert_eq!(cfg.token_url, "https://auth.test/token");
    }

    #[test]
    fn settings_from_toml_table() {
        let s: CatalogSettings = toml::from_str(
            r#"
retailer_id = "R-7"
client_id = "cid"
client_secret = "csec"
api_base = "http://localhost:9000"
batch_size = 10
"#,
        )
        .unwrap();
        let cfg = CatalogConfig::from_settings(&s).unwrap();
        assert_eq!(cfg.batch_size, 10);
        assert_eq!(cfg.retailer_id, "R-7");
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = CatalogConfig::from_settings(&full()).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("csec"));
        assert!(dbg.contains("<redacted>"));
    }
}
