//! # Profile Orchestrator
//!
//! Drives every user of a dataset through the pipeline:
//! 1. Describe the user's ratings with the completion service
//! 2. Embed the description (skipped in test mode)
//! 3. Attach both to the user and append a `UserRecord`
//!
//! A failure at any step is recorded in the error ledger under the user's id
//! and the run moves on to the next user.

use std::fmt;
use std::time::Instant;

use agents::{AgentError, DescriptionAgent, EmbeddingAgent};
use data_loader::Profile;
use tracing::{debug, error, info};

use crate::report::{RunReport, UserRecord};

const PROGRESS_EVERY: usize = 100;

/// Where a user is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStage {
    Pending,
    Described,
    Embedded,
    Recorded,
    Failed,
}

impl fmt::Display for UserStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserStage::Pending => "pending",
            UserStage::Described => "described",
            UserStage::Embedded => "embedded",
            UserStage::Recorded => "recorded",
            UserStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

pub struct ProfileOrchestrator {
    description_agent: DescriptionAgent,
    embedding_agent: EmbeddingAgent,
    test_mode: bool,
    limit: Option<usize>,
}

impl ProfileOrchestrator {
    pub fn new(description_agent: DescriptionAgent, embedding_agent: EmbeddingAgent) -> Self {
        Self {
            description_agent,
            embedding_agent,
            test_mode: false,
            limit: None,
        }
    }

    /// In test mode descriptions are the raw prompts and nothing is embedded
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Stop after this many users
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Process users in iteration order.
    ///
    /// Never fails as a whole: per-user errors end up in `RunReport::errors`.
    pub async fn process<'a, P, I>(&mut self, users: I) -> RunReport
    where
        P: Profile + 'a,
        I: IntoIterator<Item = &'a mut P>,
    {
        let start_time = Instant::now();
        let limit = self.limit.unwrap_or(usize::MAX);
        let mut report = RunReport::default();
        let mut seen = 0;

        if self.test_mode {
            info!("Processing {:?} users in test mode", P::DOMAIN);
        } else {
            info!(
                "Processing {:?} users (embedding model: {})",
                P::DOMAIN,
                self.embedding_agent.model()
            );
        }

        for user in users.into_iter().take(limit) {
            seen += 1;
            let key = user.key();

            match self.process_user(user).await {
                Ok(record) => report.records.push(record),
                Err(e) => {
                    error!(
                        "Error processing user {} ({} -> {}): {}",
                        key,
                        UserStage::Pending,
                        UserStage::Failed,
                        e
                    );
                    report.errors.insert(key.to_string(), e.to_string());
                }
            }

            if seen % PROGRESS_EVERY == 0 {
                info!(
                    "Processed {} users ({} ok, {} failed)",
                    seen,
                    report.records.len(),
                    report.errors.len()
                );
            }
        }

        info!(
            "Finished {} users in {:.2?}: {} records, {} errors",
            seen,
            start_time.elapsed(),
            report.records.len(),
            report.errors.len()
        );
        report
    }

    /// Run one user through the pipeline. The description and embedding are
    /// attached to the user only once every step has succeeded.
    async fn process_user<P: Profile>(&mut self, user: &mut P) -> Result<UserRecord, AgentError> {
        let key = user.key();

        let (description, embedding) = if self.test_mode {
            let description = self.description_agent.describe(&*user, true).await?;
            debug!("User {} {}", key, UserStage::Described);
            (description, None)
        } else {
            let (description, vector) = self
                .embedding_agent
                .encode_user(&mut self.description_agent, &*user)
                .await?;
            debug!("User {} {} ({} dims)", key, UserStage::Embedded, vector.len());
            (description, Some(vector))
        };

        user.set_description(description.clone());
        if let Some(vector) = &embedding {
            user.set_embedding(vector.clone());
        }

        let record = UserRecord {
            id: key,
            ratings: user.rating_entries(),
            prompt: user.prompt(),
            description,
            embedding,
        };
        debug!("User {} {}", record.id, UserStage::Recorded);
        Ok(record)
    }
}
