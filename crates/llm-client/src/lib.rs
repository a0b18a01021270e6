//! Client for the external text-completion and embedding service.
//!
//! This crate provides:
//! - `CompletionService` / `EmbeddingService`: the narrow contract the agents
//!   depend on
//! - `OpenAiClient`: an implementation over an OpenAI-compatible HTTP API
//! - Exponential backoff for rate-limited requests
//! - Credential loading from the token file

use async_trait::async_trait;
use data_loader::{ChatMessage, Role};
use serde::{Deserialize, Serialize};

pub mod backoff;
pub mod config;
pub mod error;
pub mod openai;

pub use backoff::{retry_on_rate_limit, BackoffPolicy};
pub use config::{Credentials, LlmSettings, DEFAULT_TOKEN_FILE};
pub use error::{ClientError, ConfigError};
pub use openai::OpenAiClient;

/// Response of a chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
}

/// Message returned by the model. `content` is absent for tool-call replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Build a single-choice completion (handy for stubs)
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: Some(Role::Assistant),
                    content: Some(text.into()),
                },
            }],
        }
    }

    /// Text of the first choice, if any
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

/// Chat completion endpoint.
///
/// Implementations handle transport-level retries themselves; whatever error
/// they return is final.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, ClientError>;
}

/// Text embedding endpoint
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, ClientError>;
}
