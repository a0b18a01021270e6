//! Embeds profile descriptions into vectors.

use crate::description::DescriptionAgent;
use crate::error::AgentError;
use data_loader::{Description, Profile};
use llm_client::EmbeddingService;
use llm_client::config::DEFAULT_EMBEDDING_MODEL;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Memoizing wrapper around an [`EmbeddingService`].
///
/// Newlines are replaced with spaces before the text is sent; the cache is
/// keyed by the description as given.
pub struct EmbeddingAgent {
    service: Arc<dyn EmbeddingService>,
    model: String,
    cache: HashMap<String, Vec<f32>>,
}

impl EmbeddingAgent {
    pub fn new(service: Arc<dyn EmbeddingService>) -> Self {
        Self::with_model(service, DEFAULT_EMBEDDING_MODEL)
    }

    pub fn with_model(service: Arc<dyn EmbeddingService>, model: impl Into<String>) -> Self {
        Self {
            service,
            model: model.into(),
            cache: HashMap::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn encode(&mut self, description: &str) -> Result<Vec<f32>, AgentError> {
        if let Some(cached) = self.cache.get(description) {
            debug!("Embedding cache hit ({} chars)", description.len());
            return Ok(cached.clone());
        }

        let text = description.replace('\n', " ");
        let vector = self.service.embed(&text, &self.model).await?;
        debug!("Embedded {} chars into {} dimensions", text.len(), vector.len());

        self.cache.insert(description.to_string(), vector.clone());
        Ok(vector)
    }

    /// Describe `user` with `describer`, then embed the description text
    pub async fn encode_user<P: Profile>(
        &mut self,
        describer: &mut DescriptionAgent,
        user: &P,
    ) -> Result<(Description, Vec<f32>), AgentError> {
        let description = describer.describe(user, false).await?;
        let text = description.as_text().ok_or(AgentError::EmptyResponse)?;
        let vector = self.encode(text).await?;
        Ok((description, vector))
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
