//! Credentials and connection settings for the model provider.
//!
//! The API token lives in a small YAML file keyed by provider name:
//!
//! ```yaml
//! openai: sk-...
//! ```

use crate::backoff::BackoffPolicy;
use crate::error::ConfigError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the credential file, relative to the working directory
pub const DEFAULT_TOKEN_FILE: &str = "token.yaml";

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// An API token read from the credential file
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Read the token stored under `key` from a YAML credential file
    pub fn from_file(path: &Path, key: &str) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text, key, path)
    }

    /// Parse credential YAML; `path` is only used for error messages
    pub fn from_yaml(text: &str, key: &str, path: &Path) -> Result<Self, ConfigError> {
        let doc: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let token = doc
            .get(key)
            .and_then(serde_yaml::Value::as_str)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ConfigError::MissingKey {
                path: path.to_path_buf(),
                key: key.to_string(),
            })?;

        Ok(Self::new(token))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Endpoint, model and retry settings for the HTTP adapter
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_base: String,
    pub completion_model: String,
    pub embedding_model: String,
    pub request_timeout: Duration,
    pub backoff: BackoffPolicy,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            request_timeout: Duration::from_secs(120),
            backoff: BackoffPolicy::default(),
        }
    }
}

impl LlmSettings {
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_completion_model(mut self, model: impl Into<String>) -> Self {
        self.completion_model = model.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }
}

/// Resolve the credential path, falling back to [`DEFAULT_TOKEN_FILE`]
pub fn token_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE))
}
