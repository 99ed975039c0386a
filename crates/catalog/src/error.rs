use thiserror::Error;

/// Error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Required setting absent (or blank) in file and environment
    #[error("catalog is not configured: missing {0}")]
    MissingSetting(&'static str),
    /// Setting present but unusable
    #[error("invalid catalog setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
    /// Credential endpoint refused the client
    #[error("credential request failed (HTTP {status}): {message}")]
    Auth { status: u16, message: String },
    /// Transport failure, including timeouts
    #[error("network error: {0}")]
    Network(String),
    /// Non-success status on a catalog request
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// Response body did not have the expected shape
    #[error("parse error: {0}")]
    Parse(String),
    /// Local file error (snapshots)
    #[error("I/O error: {0}")]
    Io(String),
}
