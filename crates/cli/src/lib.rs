//! `stockrecon` command-line front end: config discovery, the
//! reconciliation request handler, and the exit-code contract.

pub mod exit_codes;
pub mod logging;
pub mod request;
pub mod settings;

use thiserror::Error;

use exit_codes::{EXIT_ERROR, EXIT_INPUT_PARSE, EXIT_OUTPUT_WRITE, EXIT_USAGE};

/// Error surfaced to the shell: message, optional hint, exit code.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT_PARSE, msg)
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self::new(EXIT_OUTPUT_WRITE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<settings::SettingsError> for CliError {
    fn from(err: settings::SettingsError) -> Self {
        Self::new(exit_codes::EXIT_CONFIG_INVALID, err.to_string())
    }
}

impl From<request::RequestError> for CliError {
    fn from(err: request::RequestError) -> Self {
        let hint = match &err {
            request::RequestError::Config(_) => Some(
                "set it in the [catalog] table of the config file or via STOCKRECON_* environment variables"
                    .to_string(),
            ),
            request::RequestError::Credential(_) => {
                Some("check client_id / client_secret and token_url".to_string())
            }
            request::RequestError::TooLarge { .. } => {
                Some("split the audit or raise [request] max_entries".to_string())
            }
        };
        Self { code: err.exit_code(), message: err.to_string(), hint }
    }
}
