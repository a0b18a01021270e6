//! OpenAI-compatible HTTP adapter.
//!
//! POSTs `{api_base}/chat/completions` and `{api_base}/embeddings` with a
//! bearer token. HTTP 429 maps to [`ClientError::RateLimited`] and goes
//! through the backoff loop; any other non-success status is returned as-is.

use crate::backoff::retry_on_rate_limit;
use crate::config::{Credentials, LlmSettings};
use crate::error::ClientError;
use crate::{ChatCompletion, CompletionService, EmbeddingService};
use async_trait::async_trait;
use data_loader::ChatMessage;
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct OpenAiClient {
    http_client: HttpClient,
    api_key: String,
    settings: LlmSettings,
}

impl OpenAiClient {
    pub fn new(credentials: &Credentials, settings: LlmSettings) -> Result<Self, ClientError> {
        let http_client = HttpClient::builder()
            .timeout(settings.request_timeout)
            .build()?;

        info!(
            "OpenAI client ready (base: {}, completion model: {}, embedding model: {})",
            settings.api_base, settings.completion_model, settings.embedding_model
        );

        Ok(Self {
            http_client,
            api_key: credentials.api_key().to_string(),
            settings,
        })
    }

    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::RateLimited(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, ClientError> {
        let request = ChatRequest {
            model: &self.settings.completion_model,
            messages,
        };
        let request = &request;

        retry_on_rate_limit(&self.settings.backoff, move || {
            self.post_json::<_, ChatCompletion>("chat/completions", request)
        })
        .await
    }
}

#[async_trait]
impl EmbeddingService for OpenAiClient {
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, ClientError> {
        let request = EmbeddingRequest {
            model,
            input: [text],
        };
        let request = &request;

        let response: EmbeddingResponse = retry_on_rate_limit(&self.settings.backoff, move || {
            self.post_json("embeddings", request)
        })
        .await?;

        response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| ClientError::InvalidResponse("embedding response has no data".into()))
    }
}
