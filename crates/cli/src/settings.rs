//! Config file discovery and loading.
//!
//! Lookup order: `--config` flag, `STOCKRECON_CONFIG`, then
//! `<config_dir>/stockrecon/config.toml` when it exists. With none of those
//! the environment alone supplies catalog settings.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use stockrecon_catalog::CatalogSettings;
use stockrecon_recon::CsvColumns;
use thiserror::Error;

pub const ENV_CONFIG: &str = "STOCKRECON_CONFIG";

/// Upper bound on missing + over entries per request.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// `[request]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestLimits {
    pub max_entries: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self { max_entries: DEFAULT_MAX_ENTRIES }
    }
}

/// Whole config file.
///
/// ```toml
/// [catalog]
/// retailer_id = "R-100"
/// api_base = "https://catalog.example.net/api/v1"
///
/// [csv]
/// barcode = "ean"
///
/// [request]
/// max_entries = 5000
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub csv: CsvColumns,
    #[serde(default)]
    pub request: RequestLimits,
    /// Where this config came from, if a file was read.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, SettingsError> {
        let mut config: FileConfig = toml::from_str(text).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }
}

/// Pick the config file to read, if any.
///
/// An explicit path (flag or env) is returned whether or not it exists so
/// the read error surfaces; the default location only when present.
pub fn discover_config_path(
    flag: Option<&Path>,
    get: &impl Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    if let Some(path) = get(ENV_CONFIG).filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("stockrecon").join("config.toml"))
        .filter(|p| p.is_file())
}

/// Discover, read, and overlay environment variables.
pub fn load_with_env(
    flag: Option<&Path>,
    get: impl Fn(&str) -> Option<String>,
) -> Result<FileConfig, SettingsError> {
    let mut config = match discover_config_path(flag, &get) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading config");
            FileConfig::from_path(&path)?
        }
        None => FileConfig::default(),
    };
    config.catalog = config.catalog.with_env(&get);
    Ok(config)
}

pub fn load(flag: Option<&Path>) -> Result<FileConfig, SettingsError> {
    load_with_env(flag, |k| std::env::var(k).ok())
}
