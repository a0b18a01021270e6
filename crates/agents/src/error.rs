use llm_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The completion came back without choices, or its first choice has no text
    #[error("Completion service returned no description text")]
    EmptyResponse,
}
