//! Credential acquisition via the OAuth2 client-credentials grant.
//!
//! One attempt per request. Any failure here stops the whole
//! reconciliation: without a token no batch can be issued.

use std::fmt;

use serde::Deserialize;

use crate::config::CatalogConfig;
use crate::error::CatalogError;

/// Bearer credential returned by the token endpoint.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

fn extract_error(body: &serde_json::Value, status: u16) -> String {
    body["error_description"]
        .as_str()
        .or_else(|| body["error"].as_str())
        .or_else(|| body["message"].as_str())
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP {status}"))
}

/// Exchange client id/secret for a bearer token.
pub fn fetch_token(
    http: &reqwest::blocking::Client,
    config: &CatalogConfig,
) -> Result<AccessToken, CatalogError> {
    let resp = http
        .post(&config.token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()
        .map_err(|e| CatalogError::Network(format!("token request failed: {e}")))?;

    let status = resp.status().as_u16();
    if !resp.status().is_success() {
        let body: serde_json::Value = resp.json().unwrap_or(serde_json::Value::Null);
        return Err(CatalogError::Auth {
            status,
            message: extract_error(&body, status),
        });
    }

    let token: AccessToken = resp
        .json()
        .map_err(|e| CatalogError::Parse(format!("token response invalid: {e}")))?;

    if token.access_token.trim().is_empty() {
        return Err(CatalogError::Parse("token response has empty access_token".into()));
    }

    tracing::debug!(
        token_type = token.token_type.as_deref().unwrap_or("bearer"),
        expires_in = token.expires_in,
        "catalog credential acquired"
    );

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_deserializes_with_optional_fields() {
        let tok: AccessToken = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(tok.access_token, "abc");
        assert!(tok.token_type.is_none());
        assert!(tok.expires_in.is_none());
    }

    #[test]
    fn token_debug_is_redacted() {
        let tok: AccessToken =
            serde_json::from_str(r#"{"access_token":"s3cret","expires_in":3600}"#).unwrap();
        let dbg = format!("{tok:?}");
        assert!(!dbg.contains("s3cret"));
        assert!(dbg.contains("3600"));
    }

    #[test]
    fn error_message_prefers_description() {
        let body = serde_json::json!({
            "error": "invalid_client",
            "error_description": "Client authentication failed"
        });
        assert_eq!(extract_error(&body, 401), "Client authentication failed");
        assert_eq!(extract_error(&serde_json::Value::Null, 503), "HTTP 503");
    }
}
