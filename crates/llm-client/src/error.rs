//! Errors raised by the completion/embedding adapter and by credential loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to the model provider
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP 429. The only error the backoff loop retries.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from model service: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ClientError::RateLimited(_))
    }
}

/// Errors raised while reading the credential file. Always fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Credential file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Failed to read credential file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credential file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Credential file {} has no '{key}' token", path.display())]
    MissingKey { path: PathBuf, key: String },
}
