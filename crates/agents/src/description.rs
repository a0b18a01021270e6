//! Turns a user's rendered ratings into a natural-language profile.

use crate::error::AgentError;
use crate::instructions::system_instruction;
use data_loader::{ChatMessage, Description, Profile, UserKey};
use llm_client::CompletionService;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type CacheKey = (UserKey, String, bool);

/// Builds `[system, user]` prompts and asks the completion service for a
/// description, memoizing every result it hands out.
///
/// The cache lives as long as the agent and is never evicted.
pub struct DescriptionAgent {
    service: Arc<dyn CompletionService>,
    cache: HashMap<CacheKey, Description>,
}

impl DescriptionAgent {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self {
            service,
            cache: HashMap::new(),
        }
    }

    /// The messages sent for `user`: domain instruction, then the rendered ratings
    pub fn build_prompt<P: Profile>(user: &P) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(system_instruction(P::DOMAIN)),
            ChatMessage::user(user.prompt()),
        ]
    }

    /// Describe `user`.
    ///
    /// With `test` set the prompt itself is returned and the service is never
    /// called. Repeated calls for the same user, prompt and flag are served
    /// from the cache.
    pub async fn describe<P: Profile>(
        &mut self,
        user: &P,
        test: bool,
    ) -> Result<Description, AgentError> {
        let messages = Self::build_prompt(user);
        let key = (user.key(), messages[1].content.clone(), test);

        if let Some(cached) = self.cache.get(&key) {
            debug!("Description cache hit for user {}", key.0);
            return Ok(cached.clone());
        }

        let description = if test {
            Description::Prompt(messages)
        } else {
            debug!("Requesting description for user {}", key.0);
            let completion = self.service.complete(&messages).await?;
            let text = completion.first_text().ok_or(AgentError::EmptyResponse)?;
            Description::Text(text.to_string())
        };

        self.cache.insert(key, description.clone());
        Ok(description)
    }

    /// Number of memoized descriptions
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
